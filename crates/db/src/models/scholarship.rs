use bson::{DateTime, oid::ObjectId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scholarship {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub name: String,
    pub amount_cents: Option<i64>,
    pub deadline: Option<DateTime>,
    #[serde(default)]
    pub status: ScholarshipStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScholarshipStatus {
    #[default]
    Researching,
    Applying,
    Submitted,
    Awarded,
    Declined,
}

impl Scholarship {
    pub const COLLECTION: &'static str = "scholarships";
}
