use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use compass_db::models::{Essay, EssayStatus, PermissionKey};
use compass_services::critique::CritiqueResult;
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    extractors::{auth::AuthUser, student::StudentScope},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateEssayRequest {
    pub title: String,
    pub prompt: Option<String>,
    #[serde(default)]
    pub content: String,
    pub word_limit: Option<u32>,
    pub college_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEssayRequest {
    pub title: Option<String>,
    pub prompt: Option<String>,
    pub content: Option<String>,
    pub word_limit: Option<u32>,
    pub status: Option<EssayStatus>,
    pub college_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EssayResponse {
    pub id: String,
    pub title: String,
    pub prompt: Option<String>,
    pub content: String,
    pub word_limit: Option<u32>,
    pub status: EssayStatus,
    pub college_id: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
) -> Result<Json<Vec<EssayResponse>>, ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ViewEssays)
        .await?;

    let essays = state.essays.find_for_student(ctx.target_user_id).await?;
    Ok(Json(essays.into_iter().map(to_response).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
    Json(body): Json<CreateEssayRequest>,
) -> Result<(StatusCode, Json<EssayResponse>), ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ManageEssays)
        .await?;

    if body.title.trim().is_empty() {
        return Err(ApiError::Validation("Essay title is required".to_string()));
    }

    let college_id = parse_optional_id(body.college_id.as_deref())?;
    let essay = state
        .essays
        .create(
            ctx.target_user_id,
            body.title,
            body.prompt,
            body.content,
            body.word_limit,
            college_id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(essay))))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
    Path(essay_id): Path<String>,
) -> Result<Json<EssayResponse>, ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ViewEssays)
        .await?;

    let eid = parse_object_id(&essay_id)?;
    let essay = state
        .essays
        .base
        .find_by_id_for_owner(ctx.target_user_id, eid)
        .await?;

    Ok(Json(to_response(essay)))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
    Path(essay_id): Path<String>,
    Json(body): Json<UpdateEssayRequest>,
) -> Result<Json<EssayResponse>, ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ManageEssays)
        .await?;

    let eid = parse_object_id(&essay_id)?;
    let essay = state
        .essays
        .update(
            ctx.target_user_id,
            eid,
            body.title,
            body.prompt,
            body.content,
            body.word_limit,
            body.status,
            parse_optional_id(body.college_id.as_deref())?,
        )
        .await?;

    Ok(Json(to_response(essay)))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
    Path(essay_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ManageEssays)
        .await?;

    let eid = parse_object_id(&essay_id)?;
    state.essays.delete(ctx.target_user_id, eid).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Read-only analysis, so viewing rights suffice. Falls back to local
/// heuristics when the model is unavailable.
pub async fn critique(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
    Path(essay_id): Path<String>,
) -> Result<Json<CritiqueResult>, ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ViewEssays)
        .await?;

    let eid = parse_object_id(&essay_id)?;
    let essay = state
        .essays
        .base
        .find_by_id_for_owner(ctx.target_user_id, eid)
        .await?;

    let result = state.critique.critique(&essay).await;
    Ok(Json(result))
}

fn parse_object_id(value: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(value).map_err(|_| ApiError::BadRequest("Invalid essay_id".to_string()))
}

fn parse_optional_id(value: Option<&str>) -> Result<Option<ObjectId>, ApiError> {
    value
        .map(ObjectId::parse_str)
        .transpose()
        .map_err(|_| ApiError::BadRequest("Invalid college_id".to_string()))
}

fn to_response(essay: Essay) -> EssayResponse {
    EssayResponse {
        id: essay.id.expect("stored essay has an id").to_hex(),
        title: essay.title,
        prompt: essay.prompt,
        content: essay.content,
        word_limit: essay.word_limit,
        status: essay.status,
        college_id: essay.college_id.map(|id| id.to_hex()),
    }
}
