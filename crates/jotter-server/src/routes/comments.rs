//! Owner-side comment routes.
//!
//! This module implements the comment-related HTTP endpoints:
//! - GET /documents/{id}/comments - List a document's comments
//! - POST /documents/{id}/comments - Comment as the owner
//! - PATCH /comments/{id} - Edit content or resolve
//! - DELETE /comments/{id} - Delete a comment
//!
//! PATCH and DELETE look the comment up first, then check the parent
//! document's owner: a missing comment is 404, a foreign parent is 403.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use jotter_store::{CommentPatch, CommentRow, NewComment, StoreError};

use crate::error::{ApiError, ApiResult};
use crate::extract::UserIdentity;
use crate::state::AppState;

/// Comment content cap.
const MAX_CONTENT_CHARS: usize = 10_000;

/// Author name cap.
const MAX_AUTHOR_NAME_CHARS: usize = 100;

/// Quoted selection cap.
const MAX_SELECTION_TEXT_CHARS: usize = 1_000;

// ============================================================================
// Request/Response Types
// ============================================================================

/// A comment in API responses.
#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub document_id: Uuid,
    pub share_id: Option<Uuid>,
    pub author_name: String,
    pub author_email: Option<String>,
    pub content: String,
    pub selection_start: i32,
    pub selection_end: i32,
    pub selection_text: String,
    pub resolved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CommentRow> for CommentResponse {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            document_id: row.document_id,
            share_id: row.share_id,
            author_name: row.author_name,
            author_email: row.author_email,
            content: row.content,
            selection_start: row.selection_start,
            selection_end: row.selection_end,
            selection_text: row.selection_text,
            resolved: row.resolved,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Response for GET /documents/{document_id}/comments.
#[derive(Debug, Serialize)]
pub struct ListCommentsResponse {
    pub comments: Vec<CommentResponse>,
}

/// Request body for POST /documents/{document_id}/comments.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub author_name: String,
    #[serde(default)]
    pub author_email: Option<String>,
    pub content: String,
    pub selection_start: i32,
    pub selection_end: i32,
    pub selection_text: String,
}

/// Request body for PATCH /comments/{id}.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateCommentRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub resolved: Option<bool>,
}

/// Envelope for single-comment responses.
#[derive(Debug, Serialize)]
pub struct CommentEnvelope {
    pub comment: CommentResponse,
}

/// Response for DELETE /comments/{id}.
#[derive(Debug, Serialize)]
pub struct DeleteCommentResponse {
    pub success: bool,
}

// ============================================================================
// Validation
// ============================================================================

/// Check the field limits on a new comment.
///
/// Shared with the public comment route, which builds the same input.
pub(crate) fn validate_new_comment(comment: &NewComment) -> Result<(), ApiError> {
    if comment.author_name.trim().is_empty() {
        return Err(ApiError::BadRequest("Author name cannot be empty".to_string()));
    }
    if comment.author_name.chars().count() > MAX_AUTHOR_NAME_CHARS {
        return Err(ApiError::BadRequest(format!(
            "Author name cannot exceed {} characters",
            MAX_AUTHOR_NAME_CHARS
        )));
    }
    validate_content(&comment.content)?;
    if comment.selection_start < 0 || comment.selection_end < 0 {
        return Err(ApiError::BadRequest(
            "Selection offsets must be non-negative".to_string(),
        ));
    }
    if comment.selection_text.chars().count() > MAX_SELECTION_TEXT_CHARS {
        return Err(ApiError::BadRequest(format!(
            "Selection text cannot exceed {} characters",
            MAX_SELECTION_TEXT_CHARS
        )));
    }
    Ok(())
}

fn validate_content(content: &str) -> Result<(), ApiError> {
    if content.trim().is_empty() {
        return Err(ApiError::BadRequest("Comment cannot be empty".to_string()));
    }
    if content.chars().count() > MAX_CONTENT_CHARS {
        return Err(ApiError::BadRequest(format!(
            "Comment cannot exceed {} characters",
            MAX_CONTENT_CHARS
        )));
    }
    Ok(())
}

/// Load a comment and check the caller owns its parent document.
async fn get_comment_for_owner(
    state: &AppState,
    comment_id: Uuid,
    identity: &UserIdentity,
) -> ApiResult<CommentRow> {
    let comment = state.store().get_comment(comment_id).await?;

    state
        .store()
        .get_owned_document(comment.document_id, identity.user_id.as_str())
        .await
        .map_err(|e| match e {
            StoreError::DocumentNotFound(_) => ApiError::Forbidden("Unauthorized".to_string()),
            other => ApiError::Store(other),
        })?;

    Ok(comment)
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /documents/{document_id}/comments - List comments, newest first.
async fn list_comments(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(document_id): Path<Uuid>,
) -> ApiResult<Json<ListCommentsResponse>> {
    state
        .store()
        .get_owned_document(document_id, identity.user_id.as_str())
        .await?;

    let rows = state.store().list_comments(document_id).await?;

    Ok(Json(ListCommentsResponse {
        comments: rows.into_iter().map(CommentResponse::from).collect(),
    }))
}

/// POST /documents/{document_id}/comments - Comment on an owned document.
async fn create_comment(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(document_id): Path<Uuid>,
    Json(request): Json<CreateCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentEnvelope>)> {
    state
        .store()
        .get_owned_document(document_id, identity.user_id.as_str())
        .await?;

    let comment = NewComment {
        document_id,
        share_id: None,
        author_name: request.author_name,
        author_email: request.author_email,
        content: request.content,
        selection_start: request.selection_start,
        selection_end: request.selection_end,
        selection_text: request.selection_text,
    };
    validate_new_comment(&comment)?;

    let row = state.store().insert_comment(&comment).await?;

    tracing::info!(document_id = %document_id, comment_id = %row.id, "Comment created");

    Ok((
        StatusCode::CREATED,
        Json(CommentEnvelope {
            comment: row.into(),
        }),
    ))
}

/// PATCH /comments/{id} - Edit content or flip the resolved flag.
async fn update_comment(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCommentRequest>,
) -> ApiResult<Json<CommentEnvelope>> {
    if let Some(content) = &request.content {
        validate_content(content)?;
    }

    get_comment_for_owner(&state, id, &identity).await?;

    let row = state
        .store()
        .update_comment(
            id,
            &CommentPatch {
                content: request.content,
                resolved: request.resolved,
            },
        )
        .await?;

    Ok(Json(CommentEnvelope {
        comment: row.into(),
    }))
}

/// DELETE /comments/{id} - Delete a comment.
async fn delete_comment(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteCommentResponse>> {
    get_comment_for_owner(&state, id, &identity).await?;

    state.store().delete_comment(id).await?;

    tracing::info!(comment_id = %id, "Comment deleted");

    Ok(Json(DeleteCommentResponse { success: true }))
}

/// Build owner-side comment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/documents/{id}/comments",
            get(list_comments).post(create_comment),
        )
        .route(
            "/comments/{id}",
            delete(delete_comment).patch(update_comment),
        )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_comment() -> NewComment {
        NewComment {
            document_id: Uuid::nil(),
            share_id: None,
            author_name: "Reviewer".to_string(),
            author_email: None,
            content: "Looks good".to_string(),
            selection_start: 0,
            selection_end: 10,
            selection_text: "Hello worl".to_string(),
        }
    }

    #[test]
    fn test_validate_new_comment_accepts_sample() {
        assert!(validate_new_comment(&sample_comment()).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_author_and_content() {
        let mut comment = sample_comment();
        comment.author_name = " ".to_string();
        assert!(validate_new_comment(&comment).is_err());

        let mut comment = sample_comment();
        comment.content = String::new();
        assert!(validate_new_comment(&comment).is_err());
    }

    #[test]
    fn test_validate_rejects_negative_selection() {
        let mut comment = sample_comment();
        comment.selection_start = -1;
        assert!(validate_new_comment(&comment).is_err());
    }

    #[test]
    fn test_validate_field_caps() {
        let mut comment = sample_comment();
        comment.author_name = "x".repeat(MAX_AUTHOR_NAME_CHARS + 1);
        assert!(validate_new_comment(&comment).is_err());

        let mut comment = sample_comment();
        comment.content = "x".repeat(MAX_CONTENT_CHARS + 1);
        assert!(validate_new_comment(&comment).is_err());

        let mut comment = sample_comment();
        comment.selection_text = "x".repeat(MAX_SELECTION_TEXT_CHARS + 1);
        assert!(validate_new_comment(&comment).is_err());
    }

    #[test]
    fn test_update_request_shapes() {
        let resolve: UpdateCommentRequest =
            serde_json::from_str(r#"{"resolved": true}"#).unwrap();
        assert_eq!(resolve.resolved, Some(true));
        assert!(resolve.content.is_none());
    }
}
