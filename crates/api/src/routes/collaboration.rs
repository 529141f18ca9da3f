use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use compass_db::models::{
    CollaboratorLink, LinkStatus, PermissionPatch, PermissionSet, Relationship, Role,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct InviteRequest {
    #[validate(email)]
    pub email: String,
    pub relationship: Relationship,
}

#[derive(Debug, Deserialize)]
pub struct ActiveStudentRequest {
    pub student_id: String,
}

#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub id: String,
    pub student_id: String,
    pub collaborator_id: String,
    pub relationship: Relationship,
    pub status: LinkStatus,
    pub permissions: PermissionSet,
    pub invited_email: String,
    pub accepted_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StudentSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub intake_year: Option<i32>,
    pub relationship: Relationship,
}

/// Student-side: every link the student owns, revoked history included.
pub async fn list_links(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<LinkResponse>>, ApiError> {
    let links = state.collaborations.links_for_student(auth.user_id).await?;
    Ok(Json(links.into_iter().map(to_link_response).collect()))
}

/// Student-side: invite a counselor or parent by email.
pub async fn invite(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<InviteRequest>,
) -> Result<(StatusCode, Json<LinkResponse>), ApiError> {
    body.validate()
        .map_err(|_| ApiError::Validation("A valid email address is required".to_string()))?;

    if auth.role != Role::Student {
        return Err(ApiError::Forbidden(
            "Only students can invite collaborators".to_string(),
        ));
    }

    let link = state
        .collaborations
        .create_link(auth.user_id, &body.email, body.relationship)
        .await?;

    Ok((StatusCode::CREATED, Json(to_link_response(link))))
}

/// Student-side: adjust a link's capability flags.
pub async fn update_permissions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(link_id): Path<String>,
    Json(patch): Json<PermissionPatch>,
) -> Result<Json<LinkResponse>, ApiError> {
    let link_id = parse_object_id(&link_id, "link_id")?;

    if patch.is_empty() {
        return Err(ApiError::Validation(
            "The patch names no known permission".to_string(),
        ));
    }

    let link = state
        .collaborations
        .update_permissions(link_id, auth.user_id, &patch)
        .await?;

    Ok(Json(to_link_response(link)))
}

/// Student-side revocation. DELETE is logical: the link flips to revoked
/// and stays on record; it never authorizes again.
pub async fn revoke(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(link_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let link_id = parse_object_id(&link_id, "link_id")?;

    state
        .collaborations
        .revoke_link(link_id, auth.user_id)
        .await?;

    Ok(Json(serde_json::json!({ "revoked": true })))
}

/// Collaborator-side: invitations awaiting acceptance.
pub async fn pending_invites(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<LinkResponse>>, ApiError> {
    let links = state
        .collaborations
        .pending_for_collaborator(auth.user_id)
        .await?;
    Ok(Json(links.into_iter().map(to_link_response).collect()))
}

/// Collaborator-side: accept a pending invitation.
pub async fn accept_invite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(link_id): Path<String>,
) -> Result<Json<LinkResponse>, ApiError> {
    let link_id = parse_object_id(&link_id, "link_id")?;

    let link = state
        .collaborations
        .accept_link(link_id, auth.user_id)
        .await?;

    Ok(Json(to_link_response(link)))
}

/// Collaborator-side: the students this user has an active link to.
pub async fn list_students(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<StudentSummary>>, ApiError> {
    let links = state
        .collaborations
        .active_for_collaborator(auth.user_id)
        .await?;

    let student_ids: Vec<ObjectId> = links.iter().map(|l| l.student_id).collect();
    if student_ids.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let students = state
        .users
        .base
        .find_many(
            bson::doc! { "_id": { "$in": student_ids } },
            Some(bson::doc! { "name": 1 }),
        )
        .await?;

    let summaries = students
        .into_iter()
        .filter_map(|student| {
            let id = student.id?;
            let relationship = links
                .iter()
                .find(|l| l.student_id == id)
                .map(|l| l.relationship)?;
            Some(StudentSummary {
                id: id.to_hex(),
                name: student.name,
                email: student.email,
                intake_year: student.intake_year,
                relationship,
            })
        })
        .collect();

    Ok(Json(summaries))
}

/// Collaborator-side: remember the selected student for future requests
/// that omit `?student_id=`.
pub async fn set_active_student(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(body): Json<ActiveStudentRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let student_id = parse_object_id(&body.student_id, "student_id")?;

    if !auth.role.is_collaborator() {
        return Err(ApiError::Forbidden(
            "Only counselors and parents select a student context".to_string(),
        ));
    }

    state
        .collaborations
        .set_active_student(auth.user_id, student_id)
        .await?;

    Ok(Json(serde_json::json!({ "active_student_id": body.student_id })))
}

fn parse_object_id(value: &str, field: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(value).map_err(|_| ApiError::BadRequest(format!("Invalid {field}")))
}

fn to_link_response(link: CollaboratorLink) -> LinkResponse {
    LinkResponse {
        id: link.id.expect("stored link has an id").to_hex(),
        student_id: link.student_id.to_hex(),
        collaborator_id: link.collaborator_id.to_hex(),
        relationship: link.relationship,
        status: link.status,
        permissions: link.permissions,
        invited_email: link.invited_email,
        accepted_at: link
            .accepted_at
            .map(|dt| dt.try_to_rfc3339_string().unwrap_or_default()),
    }
}
