use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;

use compass_db::models::{College, CollegeStatus};

use super::base::{BaseDao, DaoResult};

pub struct CollegeDao {
    pub base: BaseDao<College>,
}

impl CollegeDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, College::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        user_id: ObjectId,
        name: String,
        location: Option<String>,
        deadline: Option<DateTime>,
        status: CollegeStatus,
        notes: Option<String>,
    ) -> DaoResult<College> {
        let now = DateTime::now();
        let college = College {
            id: None,
            user_id,
            name,
            location,
            deadline,
            status,
            notes,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&college).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_for_student(&self, user_id: ObjectId) -> DaoResult<Vec<College>> {
        self.base
            .find_many(doc! { "user_id": user_id }, Some(doc! { "created_at": -1 }))
            .await
    }

    /// Colleges with a deadline set, soonest first. Feeds the calendar.
    pub async fn find_with_deadlines(&self, user_id: ObjectId) -> DaoResult<Vec<College>> {
        self.base
            .find_many(
                doc! { "user_id": user_id, "deadline": { "$ne": null } },
                Some(doc! { "deadline": 1 }),
            )
            .await
    }

    pub async fn update(
        &self,
        user_id: ObjectId,
        college_id: ObjectId,
        name: Option<String>,
        location: Option<String>,
        deadline: Option<DateTime>,
        status: Option<CollegeStatus>,
        notes: Option<String>,
    ) -> DaoResult<College> {
        // Ownership check doubles as existence check.
        self.base.find_by_id_for_owner(user_id, college_id).await?;

        let mut update = bson::Document::new();
        if let Some(name) = name {
            update.insert("name", name);
        }
        if let Some(location) = location {
            update.insert("location", location);
        }
        if let Some(deadline) = deadline {
            update.insert("deadline", deadline);
        }
        if let Some(status) = status {
            update.insert("status", bson::to_bson(&status)?);
        }
        if let Some(notes) = notes {
            update.insert("notes", notes);
        }

        if !update.is_empty() {
            self.base
                .update_by_id(college_id, doc! { "$set": update })
                .await?;
        }

        self.base.find_by_id(college_id).await
    }

    pub async fn delete(&self, user_id: ObjectId, college_id: ObjectId) -> DaoResult<()> {
        self.base.delete_by_id_for_owner(user_id, college_id).await
    }
}
