use axum::{Json, extract::State};
use bson::oid::ObjectId;
use compass_db::models::{EssayStatus, PermissionKey, TaskStatus};
use compass_services::authz::AuthzError;
use serde::Serialize;

use crate::{
    error::ApiError,
    extractors::{auth::AuthUser, student::StudentScope},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct WorkspaceResponse {
    pub student_id: String,
    /// Sections the viewer lacks a `view*` capability for are omitted
    /// rather than failing the whole dashboard.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<TasksSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colleges: Option<CollegesSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub essays: Option<EssaysSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scholarships: Option<ScholarshipsSummary>,
}

#[derive(Debug, Serialize)]
pub struct TasksSummary {
    pub total: u64,
    pub todo: u64,
    pub in_progress: u64,
    pub done: u64,
}

#[derive(Debug, Serialize)]
pub struct CollegesSummary {
    pub total: u64,
    pub upcoming_deadlines: Vec<DeadlineEntry>,
}

#[derive(Debug, Serialize)]
pub struct EssaysSummary {
    pub total: u64,
    pub drafts: u64,
    pub finals: u64,
}

#[derive(Debug, Serialize)]
pub struct ScholarshipsSummary {
    pub total: u64,
    pub upcoming_deadlines: Vec<DeadlineEntry>,
}

#[derive(Debug, Serialize)]
pub struct DeadlineEntry {
    pub id: String,
    pub name: String,
    pub deadline: String,
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
) -> Result<Json<WorkspaceResponse>, ApiError> {
    // Each section carries its own capability, so the resolver runs once
    // per section; the first non-permission denial fails the request.
    let tasks_target = section_target(&state, auth.user_id, scope.0, PermissionKey::ViewTasks).await?;
    let colleges_target =
        section_target(&state, auth.user_id, scope.0, PermissionKey::ViewColleges).await?;
    let essays_target =
        section_target(&state, auth.user_id, scope.0, PermissionKey::ViewEssays).await?;
    let scholarships_target =
        section_target(&state, auth.user_id, scope.0, PermissionKey::ViewScholarships).await?;

    let student_id = tasks_target
        .or(colleges_target)
        .or(essays_target)
        .or(scholarships_target)
        .ok_or_else(|| {
            ApiError::Forbidden("You have no viewing access to this student's workspace".to_string())
        })?;

    let tasks = match tasks_target {
        Some(target) => Some(tasks_summary(&state, target).await?),
        None => None,
    };
    let colleges = match colleges_target {
        Some(target) => Some(colleges_summary(&state, target).await?),
        None => None,
    };
    let essays = match essays_target {
        Some(target) => Some(essays_summary(&state, target).await?),
        None => None,
    };
    let scholarships = match scholarships_target {
        Some(target) => Some(scholarships_summary(&state, target).await?),
        None => None,
    };

    Ok(Json(WorkspaceResponse {
        student_id: student_id.to_hex(),
        tasks,
        colleges,
        essays,
        scholarships,
    }))
}

async fn section_target(
    state: &AppState,
    actor_id: ObjectId,
    scope: Option<ObjectId>,
    required: PermissionKey,
) -> Result<Option<ObjectId>, ApiError> {
    match state.resolver.resolve(actor_id, scope, required).await {
        Ok(ctx) => Ok(Some(ctx.target_user_id)),
        Err(AuthzError::MissingPermission(_)) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

async fn tasks_summary(state: &AppState, student_id: ObjectId) -> Result<TasksSummary, ApiError> {
    let todo = state
        .tasks
        .count_by_status(student_id, TaskStatus::Todo)
        .await?;
    let in_progress = state
        .tasks
        .count_by_status(student_id, TaskStatus::InProgress)
        .await?;
    let done = state
        .tasks
        .count_by_status(student_id, TaskStatus::Done)
        .await?;

    Ok(TasksSummary {
        total: todo + in_progress + done,
        todo,
        in_progress,
        done,
    })
}

async fn colleges_summary(
    state: &AppState,
    student_id: ObjectId,
) -> Result<CollegesSummary, ApiError> {
    let all = state.colleges.find_for_student(student_id).await?;
    let with_deadlines = state.colleges.find_with_deadlines(student_id).await?;

    let upcoming_deadlines = with_deadlines
        .into_iter()
        .take(5)
        .filter_map(|c| {
            Some(DeadlineEntry {
                id: c.id?.to_hex(),
                name: c.name,
                deadline: c.deadline?.try_to_rfc3339_string().ok()?,
            })
        })
        .collect();

    Ok(CollegesSummary {
        total: all.len() as u64,
        upcoming_deadlines,
    })
}

async fn essays_summary(state: &AppState, student_id: ObjectId) -> Result<EssaysSummary, ApiError> {
    let drafts = state
        .essays
        .count_by_status(student_id, EssayStatus::Draft)
        .await?;
    let in_review = state
        .essays
        .count_by_status(student_id, EssayStatus::InReview)
        .await?;
    let finals = state
        .essays
        .count_by_status(student_id, EssayStatus::Final)
        .await?;

    Ok(EssaysSummary {
        total: drafts + in_review + finals,
        drafts,
        finals,
    })
}

async fn scholarships_summary(
    state: &AppState,
    student_id: ObjectId,
) -> Result<ScholarshipsSummary, ApiError> {
    let all = state.scholarships.find_for_student(student_id).await?;
    let with_deadlines = state.scholarships.find_with_deadlines(student_id).await?;

    let upcoming_deadlines = with_deadlines
        .into_iter()
        .take(5)
        .filter_map(|s| {
            Some(DeadlineEntry {
                id: s.id?.to_hex(),
                name: s.name,
                deadline: s.deadline?.try_to_rfc3339_string().ok()?,
            })
        })
        .collect();

    Ok(ScholarshipsSummary {
        total: all.len() as u64,
        upcoming_deadlines,
    })
}
