use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use bson::oid::ObjectId;
use serde::Deserialize;

use crate::error::ApiError;

/// Optional `?student_id=` query parameter selecting the student context.
/// Absent for students (they are their own context) and for collaborators
/// relying on their stored active student.
#[derive(Debug, Clone, Copy, Default)]
pub struct StudentScope(pub Option<ObjectId>);

#[derive(Debug, Deserialize, Default)]
struct StudentScopeParams {
    #[serde(default, alias = "studentId")]
    student_id: Option<String>,
}

impl<S> FromRequestParts<S> for StudentScope
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let params = match Query::<StudentScopeParams>::from_request_parts(parts, state).await {
            Ok(Query(params)) => params,
            Err(_) => StudentScopeParams::default(),
        };

        let student_id = params
            .student_id
            .as_deref()
            .map(ObjectId::parse_str)
            .transpose()
            .map_err(|_| ApiError::BadRequest("Invalid student_id format".to_string()))?;

        Ok(StudentScope(student_id))
    }
}
