use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use compass_db::models::{PermissionKey, Scholarship, ScholarshipStatus};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    extractors::{auth::AuthUser, student::StudentScope},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateScholarshipRequest {
    pub name: String,
    pub amount_cents: Option<i64>,
    pub deadline: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateScholarshipRequest {
    pub name: Option<String>,
    pub amount_cents: Option<i64>,
    pub deadline: Option<DateTime<Utc>>,
    pub status: Option<ScholarshipStatus>,
}

#[derive(Debug, Serialize)]
pub struct ScholarshipResponse {
    pub id: String,
    pub name: String,
    pub amount_cents: Option<i64>,
    pub deadline: Option<String>,
    pub status: ScholarshipStatus,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
) -> Result<Json<Vec<ScholarshipResponse>>, ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ViewScholarships)
        .await?;

    let scholarships = state
        .scholarships
        .find_for_student(ctx.target_user_id)
        .await?;
    Ok(Json(scholarships.into_iter().map(to_response).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
    Json(body): Json<CreateScholarshipRequest>,
) -> Result<(StatusCode, Json<ScholarshipResponse>), ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ManageScholarships)
        .await?;

    if body.name.trim().is_empty() {
        return Err(ApiError::Validation(
            "Scholarship name is required".to_string(),
        ));
    }

    let scholarship = state
        .scholarships
        .create(
            ctx.target_user_id,
            body.name,
            body.amount_cents,
            body.deadline.map(bson::DateTime::from_chrono),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(scholarship))))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
    Path(scholarship_id): Path<String>,
) -> Result<Json<ScholarshipResponse>, ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ViewScholarships)
        .await?;

    let sid = parse_object_id(&scholarship_id)?;
    let scholarship = state
        .scholarships
        .base
        .find_by_id_for_owner(ctx.target_user_id, sid)
        .await?;

    Ok(Json(to_response(scholarship)))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
    Path(scholarship_id): Path<String>,
    Json(body): Json<UpdateScholarshipRequest>,
) -> Result<Json<ScholarshipResponse>, ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ManageScholarships)
        .await?;

    let sid = parse_object_id(&scholarship_id)?;
    let scholarship = state
        .scholarships
        .update(
            ctx.target_user_id,
            sid,
            body.name,
            body.amount_cents,
            body.deadline.map(bson::DateTime::from_chrono),
            body.status,
        )
        .await?;

    Ok(Json(to_response(scholarship)))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
    Path(scholarship_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ManageScholarships)
        .await?;

    let sid = parse_object_id(&scholarship_id)?;
    state.scholarships.delete(ctx.target_user_id, sid).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}

fn parse_object_id(value: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(value)
        .map_err(|_| ApiError::BadRequest("Invalid scholarship_id".to_string()))
}

fn to_response(scholarship: Scholarship) -> ScholarshipResponse {
    ScholarshipResponse {
        id: scholarship.id.expect("stored scholarship has an id").to_hex(),
        name: scholarship.name,
        amount_cents: scholarship.amount_cents,
        deadline: scholarship
            .deadline
            .map(|dt| dt.try_to_rfc3339_string().unwrap_or_default()),
        status: scholarship.status,
    }
}
