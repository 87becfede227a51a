//! Owner-side share management routes.
//!
//! This module implements the share-related HTTP endpoints:
//! - GET /documents/{id}/shares - List a document's shares
//! - POST /documents/{id}/shares - Create a read-only share link
//! - DELETE /shares/{id} - Revoke a share (soft)
//! - POST /shares/{id}/restore - Un-revoke a share
//!
//! The public, token-gated side lives in the `shared` module.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use jotter_store::{NewShare, ShareRow, StoreError};

use crate::error::{ApiError, ApiResult};
use crate::extract::UserIdentity;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// A share in API responses (owner view, token included).
#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub id: Uuid,
    pub document_id: Uuid,
    pub email: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub revoked: bool,
}

impl From<ShareRow> for ShareResponse {
    fn from(row: ShareRow) -> Self {
        Self {
            id: row.id,
            document_id: row.document_id,
            email: row.email,
            token: row.token,
            created_at: row.created_at,
            expires_at: row.expires_at,
            revoked: row.revoked,
        }
    }
}

/// Response for GET /documents/{id}/shares.
#[derive(Debug, Serialize)]
pub struct ListSharesResponse {
    pub shares: Vec<ShareResponse>,
}

/// Request body for POST /documents/{id}/shares.
#[derive(Debug, Deserialize)]
pub struct CreateShareRequest {
    /// Recipient address; recorded with the share and shown to the owner.
    pub email: String,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Envelope for single-share responses.
#[derive(Debug, Serialize)]
pub struct ShareEnvelope {
    pub share: ShareResponse,
}

/// Response for DELETE /shares/{id}.
#[derive(Debug, Serialize)]
pub struct RevokeShareResponse {
    pub success: bool,
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Minimal shape check for recipient addresses.
fn validate_email(email: &str) -> Result<(), ApiError> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(ApiError::BadRequest("Invalid email address".to_string()));
    }
    Ok(())
}

/// Load a share and check the caller owns its parent document.
///
/// An unknown share is a 404; a share whose parent document belongs to
/// someone else is a 403 — the share id alone does not leak which
/// document it points at.
async fn get_share_for_owner(
    state: &AppState,
    share_id: Uuid,
    identity: &UserIdentity,
) -> ApiResult<ShareRow> {
    let share = state.store().get_share(share_id).await?;

    state
        .store()
        .get_owned_document(share.document_id, identity.user_id.as_str())
        .await
        .map_err(|e| match e {
            StoreError::DocumentNotFound(_) => ApiError::Forbidden("Unauthorized".to_string()),
            other => ApiError::Store(other),
        })?;

    Ok(share)
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /documents/{id}/shares - List a document's shares, newest first.
async fn list_shares(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ListSharesResponse>> {
    state
        .store()
        .get_owned_document(id, identity.user_id.as_str())
        .await?;

    let rows = state.store().list_shares(id).await?;

    Ok(Json(ListSharesResponse {
        shares: rows.into_iter().map(ShareResponse::from).collect(),
    }))
}

/// POST /documents/{id}/shares - Create a read-only share link.
///
/// The token is a random UUID; possession of the token grants read
/// access to the published snapshot until the share is revoked or
/// expires.
async fn create_share(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateShareRequest>,
) -> ApiResult<(StatusCode, Json<ShareEnvelope>)> {
    validate_email(&request.email)?;

    state
        .store()
        .get_owned_document(id, identity.user_id.as_str())
        .await?;

    let row = state
        .store()
        .insert_share(&NewShare {
            document_id: id,
            email: request.email,
            token: Uuid::new_v4().to_string(),
            expires_at: request.expires_at,
        })
        .await?;

    tracing::info!(document_id = %id, share_id = %row.id, "Share created");

    Ok((StatusCode::CREATED, Json(ShareEnvelope { share: row.into() })))
}

/// DELETE /shares/{id} - Revoke a share.
///
/// Soft: the row is kept so the link can be restored later.
async fn revoke_share(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<RevokeShareResponse>> {
    get_share_for_owner(&state, id, &identity).await?;

    state.store().set_share_revoked(id, true).await?;

    tracing::info!(share_id = %id, "Share revoked");

    Ok(Json(RevokeShareResponse { success: true }))
}

/// POST /shares/{id}/restore - Un-revoke a share.
async fn restore_share(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ShareEnvelope>> {
    let share = get_share_for_owner(&state, id, &identity).await?;

    if !share.revoked {
        return Err(ApiError::BadRequest("Share is not revoked".to_string()));
    }

    let row = state.store().set_share_revoked(id, false).await?;

    tracing::info!(share_id = %id, "Share restored");

    Ok(Json(ShareEnvelope { share: row.into() }))
}

/// Build owner-side share routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/documents/{id}/shares", get(list_shares).post(create_share))
        .route("/shares/{id}", delete(revoke_share))
        .route("/shares/{id}/restore", post(restore_share))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_email() {
        assert!(validate_email("reader@example.com").is_ok());
        assert!(validate_email("a@b.co").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@nodot").is_err());
    }

    #[test]
    fn test_create_request_deserialize() {
        let request: CreateShareRequest =
            serde_json::from_str(r#"{"email": "reader@example.com"}"#).unwrap();
        assert_eq!(request.email, "reader@example.com");
        assert!(request.expires_at.is_none());
    }

    #[test]
    fn test_share_response_includes_token() {
        let response = ShareResponse {
            id: Uuid::nil(),
            document_id: Uuid::nil(),
            email: "reader@example.com".to_string(),
            token: "token-value".to_string(),
            created_at: Utc::now(),
            expires_at: None,
            revoked: false,
        };
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("token-value"));
    }
}
