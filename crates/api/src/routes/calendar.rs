use axum::{
    extract::State,
    http::{HeaderMap, header},
};
use compass_db::models::PermissionKey;
use compass_services::calendar;

use crate::{
    error::ApiError,
    extractors::{auth::AuthUser, student::StudentScope},
    state::AppState,
};

/// ICS feed of the student's college deadlines and task due dates.
/// The feed spans two feature areas, so both view capabilities are
/// required.
pub async fn feed(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
) -> Result<(HeaderMap, String), ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ViewColleges)
        .await?;
    state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ViewTasks)
        .await?;

    let colleges = state.colleges.find_with_deadlines(ctx.target_user_id).await?;
    let tasks = state.tasks.find_with_due_dates(ctx.target_user_id).await?;

    let feed = calendar::build_feed(&colleges, &tasks);

    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        "text/calendar; charset=utf-8".parse().expect("static header value"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        "attachment; filename=\"compass.ics\""
            .parse()
            .expect("static header value"),
    );

    Ok((headers, feed))
}
