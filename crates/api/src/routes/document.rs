use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use compass_db::models::{Document, DocumentType, PermissionKey};
use serde::{Deserialize, Serialize};

use crate::{
    error::ApiError,
    extractors::{auth::AuthUser, student::StudentScope},
    state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    pub name: String,
    #[serde(default)]
    pub doc_type: DocumentType,
    pub url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDocumentRequest {
    pub name: Option<String>,
    pub doc_type: Option<DocumentType>,
    pub url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub id: String,
    pub name: String,
    pub doc_type: DocumentType,
    pub url: Option<String>,
    pub notes: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
) -> Result<Json<Vec<DocumentResponse>>, ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ViewDocuments)
        .await?;

    let documents = state.documents.find_for_student(ctx.target_user_id).await?;
    Ok(Json(documents.into_iter().map(to_response).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
    Json(body): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<DocumentResponse>), ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ManageDocuments)
        .await?;

    if body.name.trim().is_empty() {
        return Err(ApiError::Validation(
            "Document name is required".to_string(),
        ));
    }

    let document = state
        .documents
        .create(
            ctx.target_user_id,
            body.name,
            body.doc_type,
            body.url,
            body.notes,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(document))))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
    Path(document_id): Path<String>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ViewDocuments)
        .await?;

    let did = parse_object_id(&document_id)?;
    let document = state
        .documents
        .base
        .find_by_id_for_owner(ctx.target_user_id, did)
        .await?;

    Ok(Json(to_response(document)))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
    Path(document_id): Path<String>,
    Json(body): Json<UpdateDocumentRequest>,
) -> Result<Json<DocumentResponse>, ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ManageDocuments)
        .await?;

    let did = parse_object_id(&document_id)?;
    let document = state
        .documents
        .update(
            ctx.target_user_id,
            did,
            body.name,
            body.doc_type,
            body.url,
            body.notes,
        )
        .await?;

    Ok(Json(to_response(document)))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    scope: StudentScope,
    Path(document_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let ctx = state
        .resolver
        .resolve(auth.user_id, scope.0, PermissionKey::ManageDocuments)
        .await?;

    let did = parse_object_id(&document_id)?;
    state.documents.delete(ctx.target_user_id, did).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}

fn parse_object_id(value: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(value).map_err(|_| ApiError::BadRequest("Invalid document_id".to_string()))
}

fn to_response(document: Document) -> DocumentResponse {
    DocumentResponse {
        id: document.id.expect("stored document has an id").to_hex(),
        name: document.name,
        doc_type: document.doc_type,
        url: document.url,
        notes: document.notes,
    }
}
