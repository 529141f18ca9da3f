use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Essay {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub college_id: Option<ObjectId>,
    pub title: String,
    pub prompt: Option<String>,
    #[serde(default)]
    pub content: String,
    pub word_limit: Option<u32>,
    #[serde(default)]
    pub status: EssayStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EssayStatus {
    #[default]
    Draft,
    InReview,
    Final,
}

impl Essay {
    pub const COLLECTION: &'static str = "essays";
}
