use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;

use compass_db::models::{Essay, EssayStatus};

use super::base::{BaseDao, DaoResult};

pub struct EssayDao {
    pub base: BaseDao<Essay>,
}

impl EssayDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Essay::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        user_id: ObjectId,
        title: String,
        prompt: Option<String>,
        content: String,
        word_limit: Option<u32>,
        college_id: Option<ObjectId>,
    ) -> DaoResult<Essay> {
        let now = DateTime::now();
        let essay = Essay {
            id: None,
            user_id,
            college_id,
            title,
            prompt,
            content,
            word_limit,
            status: EssayStatus::Draft,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&essay).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_for_student(&self, user_id: ObjectId) -> DaoResult<Vec<Essay>> {
        self.base
            .find_many(doc! { "user_id": user_id }, Some(doc! { "created_at": -1 }))
            .await
    }

    pub async fn count_by_status(&self, user_id: ObjectId, status: EssayStatus) -> DaoResult<u64> {
        self.base
            .count(doc! { "user_id": user_id, "status": bson::to_bson(&status)? })
            .await
    }

    pub async fn update(
        &self,
        user_id: ObjectId,
        essay_id: ObjectId,
        title: Option<String>,
        prompt: Option<String>,
        content: Option<String>,
        word_limit: Option<u32>,
        status: Option<EssayStatus>,
        college_id: Option<ObjectId>,
    ) -> DaoResult<Essay> {
        self.base.find_by_id_for_owner(user_id, essay_id).await?;

        let mut update = bson::Document::new();
        if let Some(title) = title {
            update.insert("title", title);
        }
        if let Some(prompt) = prompt {
            update.insert("prompt", prompt);
        }
        if let Some(content) = content {
            update.insert("content", content);
        }
        if let Some(word_limit) = word_limit {
            update.insert("word_limit", word_limit);
        }
        if let Some(status) = status {
            update.insert("status", bson::to_bson(&status)?);
        }
        if let Some(college_id) = college_id {
            update.insert("college_id", college_id);
        }

        if !update.is_empty() {
            self.base
                .update_by_id(essay_id, doc! { "$set": update })
                .await?;
        }

        self.base.find_by_id(essay_id).await
    }

    pub async fn delete(&self, user_id: ObjectId, essay_id: ObjectId) -> DaoResult<()> {
        self.base.delete_by_id_for_owner(user_id, essay_id).await
    }
}
