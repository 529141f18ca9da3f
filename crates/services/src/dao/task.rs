use bson::{DateTime, doc, oid::ObjectId};
use mongodb::Database;

use compass_db::models::{Task, TaskStatus};

use super::base::{BaseDao, DaoResult, PaginatedResult, PaginationParams};

pub struct TaskDao {
    pub base: BaseDao<Task>,
}

impl TaskDao {
    pub fn new(db: &Database) -> Self {
        Self {
            base: BaseDao::new(db, Task::COLLECTION),
        }
    }

    pub async fn create(
        &self,
        user_id: ObjectId,
        title: String,
        description: Option<String>,
        due_date: Option<DateTime>,
        college_id: Option<ObjectId>,
    ) -> DaoResult<Task> {
        let now = DateTime::now();
        let task = Task {
            id: None,
            user_id,
            college_id,
            title,
            description,
            due_date,
            status: TaskStatus::Todo,
            created_at: now,
            updated_at: now,
        };

        let id = self.base.insert_one(&task).await?;
        self.base.find_by_id(id).await
    }

    pub async fn find_for_student(
        &self,
        user_id: ObjectId,
        status: Option<TaskStatus>,
        college_id: Option<ObjectId>,
        params: &PaginationParams,
    ) -> DaoResult<PaginatedResult<Task>> {
        let mut filter = doc! { "user_id": user_id };
        if let Some(status) = status {
            filter.insert("status", bson::to_bson(&status)?);
        }
        if let Some(college_id) = college_id {
            filter.insert("college_id", college_id);
        }

        self.base
            .find_paginated(filter, Some(doc! { "created_at": -1 }), params)
            .await
    }

    /// Tasks with a due date set, soonest first. Feeds the calendar.
    pub async fn find_with_due_dates(&self, user_id: ObjectId) -> DaoResult<Vec<Task>> {
        self.base
            .find_many(
                doc! { "user_id": user_id, "due_date": { "$ne": null } },
                Some(doc! { "due_date": 1 }),
            )
            .await
    }

    pub async fn count_by_status(&self, user_id: ObjectId, status: TaskStatus) -> DaoResult<u64> {
        self.base
            .count(doc! { "user_id": user_id, "status": bson::to_bson(&status)? })
            .await
    }

    pub async fn update(
        &self,
        user_id: ObjectId,
        task_id: ObjectId,
        title: Option<String>,
        description: Option<String>,
        due_date: Option<DateTime>,
        status: Option<TaskStatus>,
        college_id: Option<ObjectId>,
    ) -> DaoResult<Task> {
        self.base.find_by_id_for_owner(user_id, task_id).await?;

        let mut update = bson::Document::new();
        if let Some(title) = title {
            update.insert("title", title);
        }
        if let Some(description) = description {
            update.insert("description", description);
        }
        if let Some(due_date) = due_date {
            update.insert("due_date", due_date);
        }
        if let Some(status) = status {
            update.insert("status", bson::to_bson(&status)?);
        }
        if let Some(college_id) = college_id {
            update.insert("college_id", college_id);
        }

        if !update.is_empty() {
            self.base.update_by_id(task_id, doc! { "$set": update }).await?;
        }

        self.base.find_by_id(task_id).await
    }

    pub async fn delete(&self, user_id: ObjectId, task_id: ObjectId) -> DaoResult<()> {
        self.base.delete_by_id_for_owner(user_id, task_id).await
    }
}
