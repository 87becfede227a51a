//! Version history routes.
//!
//! This module implements the version-related HTTP endpoints:
//! - GET /documents/{id}/versions - List snapshots, newest first
//! - POST /documents/{id}/versions/{version_id}/restore - Restore a snapshot
//! - PATCH /documents/{id}/versions/{version_id} - Annotate a snapshot
//! - GET /documents/{id}/versions/{version_id}/diff - Word-level diff
//!   between a snapshot and the current draft

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use jotter_core::{DiffSegment, DocumentId, VersionId, diff_texts, extract_text};
use jotter_store::{VersionService, VersionWithCreator};

use crate::error::{ApiError, ApiResult};
use crate::extract::UserIdentity;
use crate::routes::documents::DocumentEnvelope;
use crate::state::AppState;

/// Annotations are free-text labels, capped to keep listings readable.
const MAX_ANNOTATION_CHARS: usize = 500;

// ============================================================================
// Request/Response Types
// ============================================================================

/// A version snapshot in API responses.
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub id: Uuid,
    pub document_id: Uuid,
    pub content: Option<Value>,
    pub title: String,
    pub version_number: i32,
    pub annotation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub created_by_name: Option<String>,
}

impl From<VersionWithCreator> for VersionResponse {
    fn from(row: VersionWithCreator) -> Self {
        Self {
            id: row.id,
            document_id: row.document_id,
            content: row.content,
            title: row.title,
            version_number: row.version_number,
            annotation: row.annotation,
            created_at: row.created_at,
            created_by: row.created_by,
            created_by_name: row.created_by_name,
        }
    }
}

/// Response for GET /documents/{id}/versions.
#[derive(Debug, Serialize)]
pub struct ListVersionsResponse {
    pub versions: Vec<VersionResponse>,
}

/// Request body for PATCH /documents/{id}/versions/{version_id}.
///
/// A null annotation clears the label.
#[derive(Debug, Deserialize)]
pub struct AnnotateVersionRequest {
    pub annotation: Option<String>,
}

/// Envelope for single-version responses.
#[derive(Debug, Serialize)]
pub struct VersionEnvelope {
    pub version: VersionResponse,
}

/// Response for GET /documents/{id}/versions/{version_id}/diff.
///
/// Segments describe the edit from the snapshot's extracted text (old)
/// to the current draft's extracted text (new).
#[derive(Debug, Serialize)]
pub struct VersionDiffResponse {
    pub version_number: i32,
    pub segments: Vec<DiffSegment>,
}

// ============================================================================
// Validation
// ============================================================================

fn validate_annotation(annotation: Option<&str>) -> Result<(), ApiError> {
    if let Some(annotation) = annotation {
        if annotation.chars().count() > MAX_ANNOTATION_CHARS {
            return Err(ApiError::BadRequest(format!(
                "Annotation cannot exceed {} characters",
                MAX_ANNOTATION_CHARS
            )));
        }
    }
    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /documents/{id}/versions - List snapshots, newest first.
///
/// Entries carry the creator's display name when the user record has one.
async fn list_versions(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ListVersionsResponse>> {
    let rows = VersionService::list(
        state.store().pool(),
        DocumentId::from_uuid(id),
        &identity.user_id,
    )
    .await?;

    tracing::debug!(document_id = %id, count = rows.len(), "Listed versions");

    Ok(Json(ListVersionsResponse {
        versions: rows.into_iter().map(VersionResponse::from).collect(),
    }))
}

/// POST /documents/{id}/versions/{version_id}/restore - Restore a snapshot.
///
/// The current draft is snapshotted as a new version before being
/// overwritten, so the restore is recoverable. Status is unchanged.
async fn restore_version(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path((id, version_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<DocumentEnvelope>> {
    let row = VersionService::restore(
        state.store().pool(),
        DocumentId::from_uuid(id),
        VersionId::from_uuid(version_id),
        &identity.user_id,
    )
    .await?;

    Ok(Json(DocumentEnvelope {
        document: row.into(),
    }))
}

/// PATCH /documents/{id}/versions/{version_id} - Set or clear the annotation.
async fn annotate_version(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path((id, version_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<AnnotateVersionRequest>,
) -> ApiResult<Json<VersionEnvelope>> {
    validate_annotation(request.annotation.as_deref())?;

    let row = VersionService::annotate(
        state.store().pool(),
        DocumentId::from_uuid(id),
        VersionId::from_uuid(version_id),
        &identity.user_id,
        request.annotation.as_deref(),
    )
    .await?;

    Ok(Json(VersionEnvelope {
        version: VersionResponse {
            id: row.id,
            document_id: row.document_id,
            content: row.content,
            title: row.title,
            version_number: row.version_number,
            annotation: row.annotation,
            created_at: row.created_at,
            created_by: row.created_by,
            created_by_name: None,
        },
    }))
}

/// GET /documents/{id}/versions/{version_id}/diff - Compare a snapshot
/// with the current draft.
async fn diff_version(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path((id, version_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<VersionDiffResponse>> {
    let document_id = DocumentId::from_uuid(id);

    let version = VersionService::get(
        state.store().pool(),
        document_id,
        VersionId::from_uuid(version_id),
        &identity.user_id,
    )
    .await?;

    let document = state
        .store()
        .get_owned_document(id, identity.user_id.as_str())
        .await?;

    let old_text = extract_text(version.content.as_ref());
    let new_text = extract_text(document.content.as_ref());
    let segments = diff_texts(&old_text, &new_text);

    Ok(Json(VersionDiffResponse {
        version_number: version.version_number,
        segments,
    }))
}

/// Build version routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/documents/{id}/versions", get(list_versions))
        .route(
            "/documents/{id}/versions/{version_id}",
            axum::routing::patch(annotate_version),
        )
        .route(
            "/documents/{id}/versions/{version_id}/restore",
            post(restore_version),
        )
        .route("/documents/{id}/versions/{version_id}/diff", get(diff_version))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_annotation_accepts_none_and_short() {
        assert!(validate_annotation(None).is_ok());
        assert!(validate_annotation(Some("before the rewrite")).is_ok());
    }

    #[test]
    fn test_validate_annotation_rejects_overlong() {
        let long = "x".repeat(MAX_ANNOTATION_CHARS + 1);
        assert!(validate_annotation(Some(&long)).is_err());
        let max = "x".repeat(MAX_ANNOTATION_CHARS);
        assert!(validate_annotation(Some(&max)).is_ok());
    }

    #[test]
    fn test_annotate_request_null_clears() {
        let request: AnnotateVersionRequest =
            serde_json::from_str(r#"{"annotation": null}"#).unwrap();
        assert!(request.annotation.is_none());

        let request: AnnotateVersionRequest =
            serde_json::from_str(r#"{"annotation": "v1 final"}"#).unwrap();
        assert_eq!(request.annotation.as_deref(), Some("v1 final"));
    }

    #[test]
    fn test_version_response_serializes_creator_name() {
        let response = VersionResponse {
            id: Uuid::nil(),
            document_id: Uuid::nil(),
            content: None,
            title: "Draft".to_string(),
            version_number: 3,
            annotation: None,
            created_at: Utc::now(),
            created_by: "user_abc".to_string(),
            created_by_name: Some("Ada".to_string()),
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains(r#""version_number":3"#));
        assert!(json.contains(r#""created_by_name":"Ada""#));
    }
}
