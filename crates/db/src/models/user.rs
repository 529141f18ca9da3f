use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub role: Role,
    /// None for placeholder accounts created by an invitation before the
    /// collaborator has registered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    /// Last-selected student context. Only meaningful for counselor/parent
    /// accounts; students never have one.
    pub active_student_id: Option<ObjectId>,
    pub intake_year: Option<i32>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Role is fixed at registration and never changes afterwards.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    #[default]
    Student,
    Counselor,
    Parent,
}

impl Role {
    pub fn is_collaborator(self) -> bool {
        matches!(self, Role::Counselor | Role::Parent)
    }
}

impl User {
    pub const COLLECTION: &'static str = "users";
}
