use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

/// Metadata record for an application document. The file itself lives
/// wherever `url` points; Compass does not store blobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub doc_type: DocumentType,
    pub url: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Transcript,
    Recommendation,
    TestScore,
    Financial,
    #[default]
    Other,
}

impl Document {
    pub const COLLECTION: &'static str = "documents";
}
