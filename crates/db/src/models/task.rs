use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    /// Optional association with one college (e.g. "request transcript for X").
    pub college_id: Option<ObjectId>,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime>,
    #[serde(default)]
    pub status: TaskStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

impl Task {
    pub const COLLECTION: &'static str = "tasks";
}
