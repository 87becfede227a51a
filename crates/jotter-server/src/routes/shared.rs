//! Public, token-gated routes for shared documents.
//!
//! No authentication: possession of the share token is the credential.
//! - GET /shared/{token} - Read the shared document
//! - GET /shared/{token}/comments - List comments (paginated)
//! - POST /shared/{token}/comments - Leave a comment
//!
//! Revoked and expired shares answer 403 so the reader can tell a dead
//! link from a wrong one.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use jotter_core::DocumentStatus;
use jotter_store::{NewComment, Page, ShareRow};

use crate::error::{ApiError, ApiResult};
use crate::routes::comments::{CommentResponse, validate_new_comment};
use crate::state::AppState;

/// Pagination bounds for comment listings.
const MAX_PAGE_LIMIT: i64 = 100;

// ============================================================================
// Request/Response Types
// ============================================================================

/// The shared view of a document: published snapshot when present,
/// current draft otherwise.
#[derive(Debug, Serialize)]
pub struct SharedDocument {
    pub id: Uuid,
    pub title: String,
    pub content: Option<Value>,
    pub status: DocumentStatus,
    pub published_at: Option<DateTime<Utc>>,
}

/// The reader-facing view of the share itself (no token echo).
#[derive(Debug, Serialize)]
pub struct SharedShareInfo {
    pub id: Uuid,
    pub email: String,
}

/// Response for GET /shared/{token}.
#[derive(Debug, Serialize)]
pub struct SharedDocumentResponse {
    pub document: SharedDocument,
    pub share: SharedShareInfo,
}

/// Request body for POST /shared/{token}/comments.
#[derive(Debug, Deserialize)]
pub struct CreateSharedCommentRequest {
    pub author_name: String,
    #[serde(default)]
    pub author_email: Option<String>,
    pub content: String,
    pub selection_start: i32,
    pub selection_end: i32,
    pub selection_text: String,
}

/// Envelope for a created comment.
#[derive(Debug, Serialize)]
pub struct CommentEnvelope {
    pub comment: CommentResponse,
}

/// Query parameters for GET /shared/{token}/comments.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Pagination metadata in comment listings.
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
    pub has_more: bool,
}

/// Response for GET /shared/{token}/comments.
#[derive(Debug, Serialize)]
pub struct SharedCommentsResponse {
    pub comments: Vec<CommentResponse>,
    pub pagination: Pagination,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Resolve a token into a live share.
///
/// Unknown tokens are 404; revoked or expired shares are 403.
async fn resolve_share(state: &AppState, token: &str) -> ApiResult<ShareRow> {
    let share = state
        .store()
        .get_share_by_token(token)
        .await?
        .ok_or_else(|| ApiError::NotFound("Share not found".to_string()))?;

    if share.revoked {
        return Err(ApiError::Forbidden("This share has been revoked".to_string()));
    }

    if share.is_expired(Utc::now()) {
        return Err(ApiError::Forbidden("This share has expired".to_string()));
    }

    Ok(share)
}

fn clamp_page(query: &PageQuery) -> Result<Page, ApiError> {
    let limit = query.limit.unwrap_or(20);
    if !(1..=MAX_PAGE_LIMIT).contains(&limit) {
        return Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_PAGE_LIMIT
        )));
    }

    let offset = query.offset.unwrap_or(0);
    if offset < 0 {
        return Err(ApiError::BadRequest("offset must be non-negative".to_string()));
    }

    Ok(Page { limit, offset })
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /shared/{token} - Read the shared document.
///
/// Serves the frozen published snapshot when one exists, falling back
/// to the current draft for documents shared before their first publish.
async fn get_shared_document(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> ApiResult<Json<SharedDocumentResponse>> {
    let share = resolve_share(&state, &token).await?;

    let document = state.store().get_document(share.document_id).await?;

    let content = document.published_content.or(document.content);
    let status = document.status.parse().unwrap_or_default();

    tracing::debug!(document_id = %document.id, "Shared document read");

    Ok(Json(SharedDocumentResponse {
        document: SharedDocument {
            id: document.id,
            title: document.title,
            content,
            status,
            published_at: document.published_at,
        },
        share: SharedShareInfo {
            id: share.id,
            email: share.email,
        },
    }))
}

/// POST /shared/{token}/comments - Leave a comment on a shared document.
async fn create_shared_comment(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Json(request): Json<CreateSharedCommentRequest>,
) -> ApiResult<(StatusCode, Json<CommentEnvelope>)> {
    let share = resolve_share(&state, &token).await?;

    let comment = NewComment {
        document_id: share.document_id,
        share_id: Some(share.id),
        author_name: request.author_name,
        author_email: request.author_email,
        content: request.content,
        selection_start: request.selection_start,
        selection_end: request.selection_end,
        selection_text: request.selection_text,
    };
    validate_new_comment(&comment)?;

    // Document must still exist behind the share
    state.store().get_document(share.document_id).await?;

    let row = state.store().insert_comment(&comment).await?;

    tracing::info!(
        document_id = %share.document_id,
        comment_id = %row.id,
        "Comment left via shared link"
    );

    Ok((
        StatusCode::CREATED,
        Json(CommentEnvelope {
            comment: row.into(),
        }),
    ))
}

/// GET /shared/{token}/comments - List comments, newest first, paginated.
async fn list_shared_comments(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Json<SharedCommentsResponse>> {
    let share = resolve_share(&state, &token).await?;
    let page = clamp_page(&query)?;

    let total = state.store().count_comments(share.document_id).await?;
    let rows = state
        .store()
        .list_comments_page(share.document_id, page)
        .await?;

    let has_more = page.offset + (rows.len() as i64) < total;

    Ok(Json(SharedCommentsResponse {
        comments: rows.into_iter().map(CommentResponse::from).collect(),
        pagination: Pagination {
            total,
            limit: page.limit,
            offset: page.offset,
            has_more,
        },
    }))
}

/// Build public share routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shared/{token}", get(get_shared_document))
        .route(
            "/shared/{token}/comments",
            get(list_shared_comments).post(create_shared_comment),
        )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_page_defaults() {
        let page = clamp_page(&PageQuery {
            limit: None,
            offset: None,
        })
        .unwrap();
        assert_eq!(page.limit, 20);
        assert_eq!(page.offset, 0);
    }

    #[test]
    fn test_clamp_page_bounds() {
        assert!(clamp_page(&PageQuery { limit: Some(0), offset: None }).is_err());
        assert!(clamp_page(&PageQuery { limit: Some(101), offset: None }).is_err());
        assert!(clamp_page(&PageQuery { limit: Some(100), offset: None }).is_ok());
        assert!(clamp_page(&PageQuery { limit: None, offset: Some(-1) }).is_err());
    }

    #[test]
    fn test_shared_document_falls_back_to_draft_content() {
        // The published ?? current fallback is plain Option::or
        let published: Option<serde_json::Value> = None;
        let current = Some(serde_json::json!({"type": "doc"}));
        assert_eq!(published.or(current.clone()), current);
    }

    #[test]
    fn test_share_info_omits_token() {
        let info = SharedShareInfo {
            id: Uuid::nil(),
            email: "reader@example.com".to_string(),
        };
        let json = serde_json::to_string(&info).unwrap();
        assert!(!json.contains("token"));
    }
}
