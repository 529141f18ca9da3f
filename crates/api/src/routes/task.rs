use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use compass_db::models::{PermissionKey, Task, TaskStatus};
use compass_services::dao::base::{PaginatedResult, PaginationParams};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    extractors::{auth::AuthUser, student::StudentScope},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub college_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub status: Option<TaskStatus>,
    pub college_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListTasksQuery {
    pub status: Option<TaskStatus>,
    pub college_id: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub due_date: Option<String>,
    pub status: TaskStatus,
    pub college_id: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
    Query(query): Query<ListTasksQuery>,
) -> Result<Json<PaginatedResult<TaskResponse>>, ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ViewTasks)
        .await?;

    let college_id = parse_optional_id(query.college_id.as_deref(), "college_id")?;
    let mut pagination = PaginationParams::default();
    if let Some(page) = query.page {
        pagination.page = page;
    }
    if let Some(per_page) = query.per_page {
        pagination.per_page = per_page;
    }

    let page = state
        .tasks
        .find_for_student(ctx.target_user_id, query.status, college_id, &pagination)
        .await?;

    Ok(Json(PaginatedResult {
        items: page.items.into_iter().map(to_response).collect(),
        total: page.total,
        page: page.page,
        per_page: page.per_page,
        total_pages: page.total_pages,
    }))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
    Json(body): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ManageTasks)
        .await?;

    if body.title.trim().is_empty() {
        return Err(ApiError::Validation("Task title is required".to_string()));
    }

    let college_id = parse_optional_id(body.college_id.as_deref(), "college_id")?;
    let task = state
        .tasks
        .create(
            ctx.target_user_id,
            body.title,
            body.description,
            body.due_date.map(bson::DateTime::from_chrono),
            college_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(task))))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
    Path(task_id): Path<String>,
) -> Result<Json<TaskResponse>, ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ViewTasks)
        .await?;

    let tid = parse_object_id(&task_id)?;
    let task = state
        .tasks
        .base
        .find_by_id_for_owner(ctx.target_user_id, tid)
        .await?;

    Ok(Json(to_response(task)))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
    Path(task_id): Path<String>,
    Json(body): Json<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ManageTasks)
        .await?;

    let tid = parse_object_id(&task_id)?;
    let college_id = parse_optional_id(body.college_id.as_deref(), "college_id")?;
    let task = state
        .tasks
        .update(
            ctx.target_user_id,
            tid,
            body.title,
            body.description,
            body.due_date.map(bson::DateTime::from_chrono),
            body.status,
            college_id,
        )
        .await?;

    Ok(Json(to_response(task)))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
    Path(task_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ManageTasks)
        .await?;

    let tid = parse_object_id(&task_id)?;
    state.tasks.delete(ctx.target_user_id, tid).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}

fn parse_object_id(value: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(value).map_err(|_| ApiError::BadRequest("Invalid task_id".to_string()))
}

fn parse_optional_id(value: Option<&str>, field: &str) -> Result<Option<ObjectId>, ApiError> {
    value
        .map(ObjectId::parse_str)
        .transpose()
        .map_err(|_| ApiError::BadRequest(format!("Invalid {field}")))
}

fn to_response(task: Task) -> TaskResponse {
    TaskResponse {
        id: task.id.expect("stored task has an id").to_hex(),
        title: task.title,
        description: task.description,
        due_date: task
            .due_date
            .map(|dt| dt.try_to_rfc3339_string().unwrap_or_default()),
        status: task.status,
        college_id: task.college_id.map(|id| id.to_hex()),
    }
}
