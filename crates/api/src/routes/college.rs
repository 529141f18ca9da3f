use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use compass_db::models::{College, CollegeStatus, PermissionKey};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    extractors::{auth::AuthUser, student::StudentScope},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateCollegeRequest {
    pub name: String,
    pub location: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: CollegeStatus,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCollegeRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
    pub status: Option<CollegeStatus>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CollegeResponse {
    pub id: String,
    pub name: String,
    pub location: Option<String>,
    pub deadline: Option<String>,
    pub status: CollegeStatus,
    pub notes: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
) -> Result<Json<Vec<CollegeResponse>>, ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ViewColleges)
        .await?;

    let colleges = state.colleges.find_for_student(ctx.target_user_id).await?;
    Ok(Json(colleges.into_iter().map(to_response).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
    Json(body): Json<CreateCollegeRequest>,
) -> Result<(StatusCode, Json<CollegeResponse>), ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ManageColleges)
        .await?;

    if body.name.trim().is_empty() {
        return Err(ApiError::Validation("College name is required".to_string()));
    }

    let college = state
        .colleges
        .create(
            ctx.target_user_id,
            body.name,
            body.location,
            body.deadline.map(bson::DateTime::from_chrono),
            body.status,
            body.notes,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(college))))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
    Path(college_id): Path<String>,
) -> Result<Json<CollegeResponse>, ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ViewColleges)
        .await?;

    let cid = parse_object_id(&college_id)?;
    let college = state
        .colleges
        .base
        .find_by_id_for_owner(ctx.target_user_id, cid)
        .await?;

    Ok(Json(to_response(college)))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
    Path(college_id): Path<String>,
    Json(body): Json<UpdateCollegeRequest>,
) -> Result<Json<CollegeResponse>, ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ManageColleges)
        .await?;

    let cid = parse_object_id(&college_id)?;
    let college = state
        .colleges
        .update(
            ctx.target_user_id,
            cid,
            body.name,
            body.location,
            body.deadline.map(bson::DateTime::from_chrono),
            body.status,
            body.notes,
        )
        .await?;

    Ok(Json(to_response(college)))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
    Path(college_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ManageColleges)
        .await?;

    let cid = parse_object_id(&college_id)?;
    state.colleges.delete(ctx.target_user_id, cid).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}

fn parse_object_id(value: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(value).map_err(|_| ApiError::BadRequest("Invalid college_id".to_string()))
}

fn to_response(college: College) -> CollegeResponse {
    CollegeResponse {
        id: college.id.expect("stored college has an id").to_hex(),
        name: college.name,
        location: college.location,
        deadline: college
            .deadline
            .map(|dt| dt.try_to_rfc3339_string().unwrap_or_default()),
        status: college.status,
        notes: college.notes,
    }
}
