use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct College {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Owning student. Every query is scoped by this field.
    pub user_id: ObjectId,
    pub name: String,
    pub location: Option<String>,
    pub deadline: Option<DateTime>,
    #[serde(default)]
    pub status: CollegeStatus,
    pub notes: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CollegeStatus {
    #[default]
    Considering,
    Applying,
    Submitted,
    Accepted,
    Rejected,
    Waitlisted,
}

impl College {
    pub const COLLECTION: &'static str = "colleges";
}
