use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;

use compass_db::models::{Scholarship, ScholarshipStatus};

use super::base::{BaseDao, DaoResult};

pub struct ScholarshipDao {
    pub base: BaseDao<Scholarship>,
}

impl ScholarshipDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Scholarship::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        user_id: ObjectId,
        name: String,
        amount_cents: Option<i64>,
        deadline: Option<DateTime>,
    ) -> DaoResult<Scholarship> {
        let now = DateTime::now();
        let scholarship = Scholarship {
            id: None,
            user_id,
            name,
            amount_cents,
            deadline,
            status: ScholarshipStatus::Researching,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&scholarship).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_for_student(&self, user_id: ObjectId) -> DaoResult<Vec<Scholarship>> {
        self.base
            .find_many(doc! { "user_id": user_id }, Some(doc! { "created_at": -1 }))
            .await
    }

    pub async fn find_with_deadlines(&self, user_id: ObjectId) -> DaoResult<Vec<Scholarship>> {
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
        scholarship_id: ObjectId,
        name: Option<String>,
        amount_cents: Option<i64>,
        deadline: Option<DateTime>,
        status: Option<ScholarshipStatus>,
    ) -> DaoResult<Scholarship> {
        self.base
            .find_by_id_for_owner(user_id, scholarship_id)
            .await?;

        let mut update = bson::Document::new();
        if let Some(name) = name {
            update.insert("name", name);
        }
        if let Some(amount) = amount_cents {
            update.insert("amount_cents", amount);
        }
        if let Some(deadline) = deadline {
            update.insert("deadline", deadline);
        }
        if let Some(status) = status {
            update.insert("status", bson::to_bson(&status)?);
        }

        if !update.is_empty() {
            self.base
                .update_by_id(scholarship_id, doc! { "$set": update })
                .await?;
        }

        self.base.find_by_id(scholarship_id).await
    }

    pub async fn delete(&self, user_id: ObjectId, scholarship_id: ObjectId) -> DaoResult<()> {
        self.base
            .delete_by_id_for_owner(user_id, scholarship_id)
            .await
    }
}
