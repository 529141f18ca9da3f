use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

use super::permission::PermissionSet;

/// A directed relationship granting a counselor or parent scoped access to
/// one student's workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollaboratorLink {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub student_id: ObjectId,
    pub collaborator_id: ObjectId,
    pub relationship: Relationship,
    #[serde(default)]
    pub status: LinkStatus,
    #[serde(default)]
    pub permissions: PermissionSet,
    /// Email the invitation was addressed to, kept for the management view.
    pub invited_email: String,
    pub accepted_at: Option<DateTime>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    Counselor,
    Parent,
}

/// `revoked` is terminal: a revoked link never authorizes anything again
/// and is excluded from every active-link query.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    #[default]
    Pending,
    Active,
    Revoked,
}

impl CollaboratorLink {
    pub const COLLECTION: &'static str = "collaborator_links";
}
