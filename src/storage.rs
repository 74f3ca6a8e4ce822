use std::collections::HashMap;
use std::path::{Path, PathBuf};
use dashmap::DashMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, info};
use crate::entities::{NewTag, PostTagCount, Tag, TagId};
use crate::error::StoreError;

#[async_trait::async_trait]
pub trait TagStore: Send + Sync {
    async fn insert(&self, tag: NewTag) -> Result<Tag, StoreError>;

    /// Tags ordered by `created_at` descending, ties broken by id ascending.
    /// `post_id == None` selects every tag.
    async fn find_sorted_by_desc_time(&self, post_id: Option<i64>, skip: u64, limit: u64) -> Result<Vec<Tag>, StoreError>;

    /// One entry per requested post id that has at least one tag.
    async fn count_by_post_ids(&self, post_ids: &[i64]) -> Result<Vec<PostTagCount>, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryTagStore {
    tags_map: DashMap<TagId, Tag>,
}

impl InMemoryTagStore {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.tags_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags_map.is_empty()
    }

    pub fn get(&self, id: &TagId) -> Option<Tag> {
        self.tags_map.get(id).map(|x| x.value().clone())
    }

    fn put(&self, tag: Tag) {
        self.tags_map.insert(tag.id, tag);
    }
}

#[async_trait::async_trait]
impl TagStore for InMemoryTagStore {
    async fn insert(&self, tag: NewTag) -> Result<Tag, StoreError> {
        let tag = tag.into_tag(TagId::new());
        self.put(tag.clone());
        Ok(tag)
    }

    async fn find_sorted_by_desc_time(&self, post_id: Option<i64>, skip: u64, limit: u64) -> Result<Vec<Tag>, StoreError> {
        let tags = self.tags_map.iter()
            .filter(|x| post_id.map_or(true, |id| x.value().post_id == id))
            .map(|x| x.value().clone())
            .sorted_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)))
            .skip(usize::try_from(skip).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .collect();
        Ok(tags)
    }

    async fn count_by_post_ids(&self, post_ids: &[i64]) -> Result<Vec<PostTagCount>, StoreError> {
        let mut counts: HashMap<i64, u64> = HashMap::new();
        for entry in self.tags_map.iter() {
            let post_id = entry.value().post_id;
            if post_ids.contains(&post_id) {
                *counts.entry(post_id).or_default() += 1;
            }
        }
        let result = counts.into_iter()
            .sorted_by_key(|(post_id, _)| *post_id)
            .map(|(post_id, count)| PostTagCount { post_id, count })
            .collect();
        Ok(result)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum DbOperation {
    CreateTag { tag: Tag },
}

/// Append-only JSON-lines log of [`DbOperation`]s, replayed into an
/// [`InMemoryTagStore`] when opened.
pub struct FileTagStore {
    db_path: PathBuf,
    index: InMemoryTagStore,
    wal: Mutex<()>,
}

impl FileTagStore {
    pub async fn open(db_path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref().to_path_buf();
        if !tokio::fs::try_exists(&db_path).await.map_err(StoreError::DbIOError)? {
            tokio::fs::write(&db_path, "").await.map_err(StoreError::DbIOError)?;
        }

        info!("Starting DB import from {}...", db_path.display());
        let index = InMemoryTagStore::new();
        for operation in Self::read_all(&db_path).await? {
            match operation {
                DbOperation::CreateTag { tag } => index.put(tag),
            }
        }
        info!("DB Imported! {} tags loaded", index.len());

        Ok(Self { db_path, index, wal: Mutex::new(()) })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn get(&self, id: &TagId) -> Option<Tag> {
        self.index.get(id)
    }

    async fn read_all(db_path: &Path) -> Result<Vec<DbOperation>, StoreError> {
        let file_str = tokio::fs::read_to_string(db_path).await
            .map_err(StoreError::DbIOError)?;
        file_str.split('\n')
            .filter(|x| !x.is_empty())
            .map(|x| serde_json::from_str(x).map_err(StoreError::DbSerializationError))
            .collect()
    }

    async fn write(&self, operation: &DbOperation) -> Result<(), StoreError> {
        let serialized_operation = serde_json::to_string(operation)
            .map_err(StoreError::DbSerializationError)?;
        let line = format!("{}\n", serialized_operation);
        let _guard = self.wal.lock().await;
        let mut file = tokio::fs::OpenOptions::new().append(true).open(&self.db_path).await
            .map_err(StoreError::DbIOError)?;
        file.write_all(line.as_bytes()).await
            .map_err(StoreError::DbIOError)?;
        file.flush().await.map_err(StoreError::DbIOError)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl TagStore for FileTagStore {
    async fn insert(&self, tag: NewTag) -> Result<Tag, StoreError> {
        let tag = tag.into_tag(TagId::new());
        self.write(&DbOperation::CreateTag { tag: tag.clone() }).await?;
        self.index.put(tag.clone());
        debug!("tag {} stored for post {}", tag.id, tag.post_id);
        Ok(tag)
    }

    async fn find_sorted_by_desc_time(&self, post_id: Option<i64>, skip: u64, limit: u64) -> Result<Vec<Tag>, StoreError> {
        self.index.find_sorted_by_desc_time(post_id, skip, limit).await
    }

    async fn count_by_post_ids(&self, post_ids: &[i64]) -> Result<Vec<PostTagCount>, StoreError> {
        self.index.count_by_post_ids(post_ids).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn new_tag(name: &str, post_id: i64, created_at: &str) -> NewTag {
        NewTag { name: name.to_string(), post_id, created_at: at(created_at) }
    }

    async fn seeded(store: &dyn TagStore) {
        store.insert(new_tag("Tag 1", 1, "2024-05-22T15:49:10.778Z")).await.unwrap();
        store.insert(new_tag("Tag 2", 1, "2020-06-22T15:49:10.778Z")).await.unwrap();
        store.insert(new_tag("Tag 3", 2, "2019-06-22T15:49:10.778Z")).await.unwrap();
    }

    #[tokio::test]
    async fn find_filters_sorts_and_pages() {
        let store = InMemoryTagStore::new();
        seeded(&store).await;

        let names = |tags: Vec<Tag>| tags.into_iter().map(|x| x.name).collect::<Vec<_>>();
        assert_eq!(names(store.find_sorted_by_desc_time(Some(1), 0, 10).await.unwrap()), ["Tag 1", "Tag 2"]);
        assert_eq!(names(store.find_sorted_by_desc_time(None, 0, 10).await.unwrap()), ["Tag 1", "Tag 2", "Tag 3"]);
        assert_eq!(names(store.find_sorted_by_desc_time(None, 1, 1).await.unwrap()), ["Tag 2"]);
        assert!(store.find_sorted_by_desc_time(None, 5, 10).await.unwrap().is_empty());
        assert!(store.find_sorted_by_desc_time(Some(1), 0, 0).await.unwrap().is_empty());
        assert!(store.find_sorted_by_desc_time(Some(42), 0, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn equal_timestamps_are_ordered_by_id() {
        let store = InMemoryTagStore::new();
        for name in ["a", "b", "c", "d"] {
            store.insert(new_tag(name, 1, "2024-01-01T00:00:00Z")).await.unwrap();
        }

        let tags = store.find_sorted_by_desc_time(Some(1), 0, 10).await.unwrap();
        let ids = tags.iter().map(|x| x.id).collect::<Vec<_>>();
        let mut sorted_ids = ids.clone();
        sorted_ids.sort();
        assert_eq!(ids, sorted_ids);

        let first_page = store.find_sorted_by_desc_time(Some(1), 0, 2).await.unwrap();
        let second_page = store.find_sorted_by_desc_time(Some(1), 2, 2).await.unwrap();
        assert_eq!([first_page, second_page].concat(), tags);
    }

    #[tokio::test]
    async fn count_only_returns_requested_groups() {
        let store = InMemoryTagStore::new();
        seeded(&store).await;

        let counts = store.count_by_post_ids(&[1, 3]).await.unwrap();
        assert_eq!(counts, vec![PostTagCount { post_id: 1, count: 2 }]);
    }

    #[tokio::test]
    async fn file_store_replays_log_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("tags.db.json");

        let store = FileTagStore::open(&db_path).await.unwrap();
        assert!(store.is_empty());
        seeded(&store).await;
        let stored = store.find_sorted_by_desc_time(None, 0, 10).await.unwrap();
        drop(store);

        let reopened = FileTagStore::open(&db_path).await.unwrap();
        assert_eq!(reopened.len(), 3);
        assert_eq!(reopened.find_sorted_by_desc_time(None, 0, 10).await.unwrap(), stored);
        assert_eq!(reopened.get(&stored[0].id), Some(stored[0].clone()));
        assert_eq!(
            reopened.count_by_post_ids(&[2]).await.unwrap(),
            vec![PostTagCount { post_id: 2, count: 1 }],
        );
    }

    #[tokio::test]
    async fn file_store_rejects_corrupt_log() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("tags.db.json");
        std::fs::write(&db_path, "not json\n").unwrap();

        let result = FileTagStore::open(&db_path).await;
        assert!(matches!(result, Err(StoreError::DbSerializationError(_))));
    }
}
