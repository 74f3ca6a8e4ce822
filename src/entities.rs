use std::fmt::{Display, Formatter};
use std::str::FromStr;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct TagId(Uuid);

impl TagId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TagId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TagId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TagId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// A persisted tag. Tags are never mutated after the store assigns their id.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub post_id: i64,
    pub created_at: DateTime<Utc>,
}

/// A validated tag that has not been stored yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTag {
    pub name: String,
    pub post_id: i64,
    pub created_at: DateTime<Utc>,
}

impl NewTag {
    pub fn into_tag(self, id: TagId) -> Tag {
        Tag {
            id,
            name: self.name,
            post_id: self.post_id,
            created_at: self.created_at,
        }
    }
}

/// Save request as it arrives from a caller; every field may be absent.
#[derive(Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TagDraft {
    pub name: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub post_id: Option<i64>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct PostTagCount {
    pub post_id: i64,
    pub count: u64,
}
