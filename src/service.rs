use std::collections::BTreeMap;
use std::sync::Arc;
use chrono::Utc;
use serde_json::Value;
use tracing::debug;
use crate::entities::{NewTag, Tag, TagDraft, TagId};
use crate::error::TagError;
use crate::posts::PostExistenceChecker;
use crate::storage::TagStore;
use crate::utils::str_utils::StringExtensions;

pub const DEFAULT_PAGE_SIZE: &str = "5";
pub const DEFAULT_PAGE_FROM: &str = "0";

pub type TagCounts = BTreeMap<String, u64>;

#[derive(Clone)]
pub struct TagService {
    store: Arc<dyn TagStore>,
    posts: Arc<dyn PostExistenceChecker>,
}

impl TagService {
    pub fn new(store: Arc<dyn TagStore>, posts: Arc<dyn PostExistenceChecker>) -> Self {
        Self { store, posts }
    }

    /// Stores a tag for an existing post and returns the id assigned to it.
    pub async fn save(&self, draft: TagDraft) -> Result<TagId, TagError> {
        let tag = Self::validate_draft(draft)?;
        self.posts.check(tag.post_id).await?;
        let tag = self.store.insert(tag).await?;
        debug!("created tag {} for post {}", tag.id, tag.post_id);
        Ok(tag.id)
    }

    /// Lists tags newest first. A `post_id` of zero lists tags of every post.
    pub async fn list_sorted_by_desc_time(&self, post_id: &str, size: &str, from: &str) -> Result<Vec<Tag>, TagError> {
        let (post_id, size, from) = Self::validate_list_params(post_id, size, from)?;
        let filter = (post_id != 0).then_some(post_id);
        let tags = self.store.find_sorted_by_desc_time(filter, from, size).await?;
        Ok(tags)
    }

    /// Counts tags per requested post id, keyed `"id{post_id}"`. Ids without
    /// tags are reported with a count of zero.
    pub async fn count_tags(&self, post_ids: &Value) -> Result<TagCounts, TagError> {
        let post_ids = Self::validate_post_ids(post_ids)?;
        let counts = self.store.count_by_post_ids(&post_ids).await?;

        let mut result: TagCounts = post_ids.iter().map(|id| (count_key(*id), 0)).collect();
        for item in counts {
            result.insert(count_key(item.post_id), item.count);
        }
        Ok(result)
    }

    fn validate_draft(draft: TagDraft) -> Result<NewTag, TagError> {
        let post_id = draft.post_id.filter(|id| *id != 0);
        let name = draft.name.filter(|name| !name.is_empty());
        match (post_id, name) {
            (Some(post_id), Some(name)) => Ok(NewTag {
                name,
                post_id,
                created_at: draft.created_at.unwrap_or_else(Utc::now),
            }),
            _ => Err(TagError::validation("Missing required fields")),
        }
    }

    fn validate_list_params(post_id: &str, size: &str, from: &str) -> Result<(i64, u64, u64), TagError> {
        let (Some(post_id), Some(size), Some(from)) = (post_id.parse_int_prefix(), size.parse_int_prefix(), from.parse_int_prefix()) else {
            return Err(TagError::bad_request("Invalid postId, size, or from parameters"));
        };
        match (u64::try_from(size), u64::try_from(from)) {
            (Ok(size), Ok(from)) => Ok((post_id, size, from)),
            _ => Err(TagError::bad_request("Size and from must be non-negative")),
        }
    }

    fn validate_post_ids(post_ids: &Value) -> Result<Vec<i64>, TagError> {
        let Value::Array(post_ids) = post_ids else {
            return Err(TagError::bad_request("Invalid input, postIds should be an array"));
        };
        post_ids.iter()
            .map(|id| {
                let parsed_id = match id {
                    Value::String(s) => s.parse_int_prefix(),
                    Value::Number(n) => n.as_i64().or_else(|| n.to_string().parse_int_prefix()),
                    _ => None,
                };
                parsed_id.ok_or_else(|| TagError::bad_request("Invalid input, all values in postIds should be numbers"))
            })
            .collect()
    }
}

fn count_key(post_id: i64) -> String {
    format!("id{post_id}")
}
