use bson::{doc, oid::ObjectId, DateTime};
use mongodb::Database;

use compass_db::models::{Document, DocumentType};

use super::base::{BaseDao, DaoResult};

pub struct DocumentDao {
    pub base: BaseDao<Document>,
}

impl DocumentDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Document::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        user_id: ObjectId,
        name: String,
        doc_type: DocumentType,
        url: Option<String>,
        notes: Option<String>,
    ) -> DaoResult<Document> {
        let now = DateTime::now();
        let document = Document {
            id: None,
            user_id,
            name,
            doc_type,
            url,
            notes,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&document).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_for_student(&self, user_id: ObjectId) -> DaoResult<Vec<Document>> {
        self.base
            .find_many(doc! { "user_id": user_id }, Some(doc! { "created_at": -1 }))
            .await
    }

    pub async fn update(
        &self,
        user_id: ObjectId,
        document_id: ObjectId,
        name: Option<String>,
        doc_type: Option<DocumentType>,
        url: Option<String>,
        notes: Option<String>,
    ) -> DaoResult<Document> {
        self.base.find_by_id_for_owner(user_id, document_id).await?;

        let mut update = bson::Document::new();
        if let Some(name) = name {
            update.insert("name", name);
        }
        if let Some(doc_type) = doc_type {
            update.insert("doc_type", bson::to_bson(&doc_type)?);
        }
        if let Some(url) = url {
            update.insert("url", url);
        }
        if let Some(notes) = notes {
            update.insert("notes", notes);
        }

        if !update.is_empty() {
            self.base
                .update_by_id(document_id, doc! { "$set": update })
                .await?;
        }

        self.base.find_by_id(document_id).await
    }

    pub async fn delete(&self, user_id: ObjectId, document_id: ObjectId) -> DaoResult<()> {
        self.base.delete_by_id_for_owner(user_id, document_id).await
    }
}
