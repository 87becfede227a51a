//! Document routes.
//!
//! This module implements the document-related HTTP endpoints:
//! - GET /documents - List the caller's documents
//! - POST /documents - Create a new document
//! - GET /documents/{id} - Fetch a single document
//! - PATCH /documents/{id} - Update title/content/placement
//! - DELETE /documents/{id} - Delete a document and its history
//! - POST /documents/{id}/publish - Freeze and publish the current draft
//! - POST /documents/{id}/unpublish - Return to draft status
//! - GET /documents/{id}/preview - Bounded structural preview

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use jotter_core::{DocumentId, DocumentStatus, PreviewElement, extract_structural_elements};
use jotter_store::{DocumentPatch, DocumentRow, NewDocument, NewUser, VersionService};

use crate::error::{ApiError, ApiResult};
use crate::extract::UserIdentity;
use crate::routes::double_option;
use crate::state::AppState;

/// Default element budget for document previews.
const DEFAULT_PREVIEW_ELEMENTS: usize = 8;

/// Upper bound for requested preview sizes.
const MAX_PREVIEW_ELEMENTS: usize = 50;

// ============================================================================
// Request/Response Types
// ============================================================================

/// A document in API responses.
#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub id: Uuid,
    pub folder_id: Option<Uuid>,
    pub parent_document_id: Option<Uuid>,
    pub title: String,
    pub content: Option<Value>,
    pub status: DocumentStatus,
    pub is_pinned: bool,
    pub pin_order: Option<i32>,
    pub published_content: Option<Value>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DocumentRow> for DocumentResponse {
    fn from(row: DocumentRow) -> Self {
        let status = row.status();
        Self {
            id: row.id,
            folder_id: row.folder_id,
            parent_document_id: row.parent_document_id,
            title: row.title,
            content: row.content,
            status,
            is_pinned: row.is_pinned,
            pin_order: row.pin_order,
            published_content: row.published_content,
            published_at: row.published_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Response for GET /documents.
#[derive(Debug, Serialize)]
pub struct ListDocumentsResponse {
    pub documents: Vec<DocumentResponse>,
}

/// Query parameters for GET /documents.
#[derive(Debug, Deserialize)]
pub struct ListDocumentsQuery {
    /// Restrict the listing to one folder.
    pub folder_id: Option<Uuid>,
}

/// Request body for POST /documents.
#[derive(Debug, Deserialize)]
pub struct CreateDocumentRequest {
    pub title: String,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default)]
    pub folder_id: Option<Uuid>,
    #[serde(default)]
    pub parent_document_id: Option<Uuid>,
}

/// Request body for PATCH /documents/{id}.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateDocumentRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<Value>,
    #[serde(default, deserialize_with = "double_option")]
    pub folder_id: Option<Option<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_document_id: Option<Option<Uuid>>,
    #[serde(default)]
    pub is_pinned: Option<bool>,
}

/// Envelope for single-document responses.
#[derive(Debug, Serialize)]
pub struct DocumentEnvelope {
    pub document: DocumentResponse,
}

/// Response for DELETE /documents/{id}.
#[derive(Debug, Serialize)]
pub struct DeleteDocumentResponse {
    pub success: bool,
}

/// Response for GET /documents/{id}/preview.
#[derive(Debug, Serialize)]
pub struct PreviewResponse {
    pub elements: Vec<PreviewElement>,
}

/// Query parameters for GET /documents/{id}/preview.
#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub max_elements: Option<usize>,
}

// ============================================================================
// Validation
// ============================================================================

/// Titles must be 1..=255 characters.
fn validate_title(title: &str) -> Result<(), ApiError> {
    if title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title cannot be empty".to_string()));
    }
    if title.chars().count() > 255 {
        return Err(ApiError::BadRequest(
            "Title cannot exceed 255 characters".to_string(),
        ));
    }
    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /documents - List the caller's documents, newest-updated first.
async fn list_documents(
    State(state): State<AppState>,
    identity: UserIdentity,
    Query(query): Query<ListDocumentsQuery>,
) -> ApiResult<Json<ListDocumentsResponse>> {
    let rows = state
        .store()
        .list_documents(identity.user_id.as_str(), query.folder_id)
        .await?;

    tracing::debug!(count = rows.len(), "Listed documents");

    Ok(Json(ListDocumentsResponse {
        documents: rows.into_iter().map(DocumentResponse::from).collect(),
    }))
}

/// GET /documents/{id} - Fetch a single owned document.
async fn get_document(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DocumentEnvelope>> {
    let row = state
        .store()
        .get_owned_document(id, identity.user_id.as_str())
        .await?;

    Ok(Json(DocumentEnvelope {
        document: row.into(),
    }))
}

/// POST /documents - Create a new document.
async fn create_document(
    State(state): State<AppState>,
    identity: UserIdentity,
    Json(request): Json<CreateDocumentRequest>,
) -> ApiResult<(StatusCode, Json<DocumentEnvelope>)> {
    validate_title(&request.title)?;

    // First write from this user: make sure the user row exists so
    // ownership and created_by foreign keys resolve
    state
        .store()
        .upsert_user(&NewUser {
            id: identity.user_id.as_str().to_string(),
            email: identity.email.clone(),
            name: identity.name.clone(),
        })
        .await?;

    if let Some(folder_id) = request.folder_id {
        // Placing into a missing or foreign folder is a 404, like the
        // folder routes themselves
        state
            .store()
            .get_folder(folder_id, identity.user_id.as_str())
            .await?;
    }

    let row = state
        .store()
        .insert_document(&NewDocument {
            user_id: identity.user_id.as_str().to_string(),
            title: request.title,
            content: request.content,
            folder_id: request.folder_id,
            parent_document_id: request.parent_document_id,
        })
        .await?;

    tracing::info!(document_id = %row.id, "Document created");

    Ok((
        StatusCode::CREATED,
        Json(DocumentEnvelope {
            document: row.into(),
        }),
    ))
}

/// PATCH /documents/{id} - Update an owned document.
async fn update_document(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateDocumentRequest>,
) -> ApiResult<Json<DocumentEnvelope>> {
    if let Some(title) = &request.title {
        validate_title(title)?;
    }

    let row = state
        .store()
        .update_document(
            id,
            identity.user_id.as_str(),
            &DocumentPatch {
                title: request.title,
                content: request.content,
                folder_id: request.folder_id,
                parent_document_id: request.parent_document_id,
                is_pinned: request.is_pinned,
            },
        )
        .await?;

    Ok(Json(DocumentEnvelope {
        document: row.into(),
    }))
}

/// DELETE /documents/{id} - Delete a document.
///
/// Versions, shares, and comments cascade with it.
async fn delete_document(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteDocumentResponse>> {
    state
        .store()
        .delete_document(id, identity.user_id.as_str())
        .await?;

    tracing::info!(document_id = %id, "Document deleted");

    Ok(Json(DeleteDocumentResponse { success: true }))
}

/// POST /documents/{id}/publish - Publish the current draft.
///
/// Snapshots the draft as the next version and freezes it as the
/// shareable published content.
async fn publish_document(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DocumentEnvelope>> {
    let outcome = VersionService::publish(
        state.store().pool(),
        DocumentId::from_uuid(id),
        &identity.user_id,
    )
    .await?;

    Ok(Json(DocumentEnvelope {
        document: outcome.document.into(),
    }))
}

/// POST /documents/{id}/unpublish - Return a document to draft status.
async fn unpublish_document(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DocumentEnvelope>> {
    let row = VersionService::unpublish(
        state.store().pool(),
        DocumentId::from_uuid(id),
        &identity.user_id,
    )
    .await?;

    Ok(Json(DocumentEnvelope {
        document: row.into(),
    }))
}

/// GET /documents/{id}/preview - Bounded structural preview of the draft.
async fn preview_document(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(id): Path<Uuid>,
    Query(query): Query<PreviewQuery>,
) -> ApiResult<Json<PreviewResponse>> {
    let max_elements = query
        .max_elements
        .unwrap_or(DEFAULT_PREVIEW_ELEMENTS)
        .min(MAX_PREVIEW_ELEMENTS);

    let row = state
        .store()
        .get_owned_document(id, identity.user_id.as_str())
        .await?;

    let elements = extract_structural_elements(row.content.as_ref(), max_elements);

    Ok(Json(PreviewResponse { elements }))
}

/// Build document routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/documents", get(list_documents).post(create_document))
        .route(
            "/documents/{id}",
            get(get_document)
                .patch(update_document)
                .delete(delete_document),
        )
        .route("/documents/{id}/publish", post(publish_document))
        .route("/documents/{id}/unpublish", post(unpublish_document))
        .route("/documents/{id}/preview", get(preview_document))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_title_rejects_empty_and_blank() {
        assert!(validate_title("").is_err());
        assert!(validate_title("   ").is_err());
        assert!(validate_title("Notes").is_ok());
    }

    #[test]
    fn test_validate_title_rejects_overlong() {
        let long = "x".repeat(256);
        assert!(validate_title(&long).is_err());
        let max = "x".repeat(255);
        assert!(validate_title(&max).is_ok());
    }

    #[test]
    fn test_update_request_distinguishes_absent_from_null() {
        let absent: UpdateDocumentRequest = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(absent.folder_id, None);

        let cleared: UpdateDocumentRequest =
            serde_json::from_str(r#"{"folder_id": null}"#).unwrap();
        assert_eq!(cleared.folder_id, Some(None));

        let set: UpdateDocumentRequest = serde_json::from_str(
            r#"{"folder_id": "00000000-0000-0000-0000-000000000000"}"#,
        )
        .unwrap();
        assert_eq!(set.folder_id, Some(Some(Uuid::nil())));
    }

    #[test]
    fn test_create_request_deserialize() {
        let request: CreateDocumentRequest =
            serde_json::from_str(r#"{"title": "My Notes"}"#).unwrap();
        assert_eq!(request.title, "My Notes");
        assert!(request.content.is_none());
    }

    #[test]
    fn test_document_response_serializes_status_lowercase() {
        let response = DocumentResponse {
            id: Uuid::nil(),
            folder_id: None,
            parent_document_id: None,
            title: "T".to_string(),
            content: None,
            status: DocumentStatus::Published,
            is_pinned: false,
            pin_order: Some(0),
            published_content: None,
            published_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""status":"published""#));
    }
}
