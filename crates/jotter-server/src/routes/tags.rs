//! Tag routes.
//!
//! This module implements the tag-related HTTP endpoints:
//! - GET /tags - List the caller's tags
//! - POST /tags - Create a tag
//! - GET /tags/{id} - Fetch a tag
//! - PATCH /tags/{id} - Rename or recolor a tag
//! - DELETE /tags/{id} - Delete a tag
//! - GET /documents/{id}/tags - Tags attached to a document
//! - POST /documents/{id}/tags/{tag_id} - Attach
//! - DELETE /documents/{id}/tags/{tag_id} - Detach

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use jotter_store::{NewTag, NewUser, TagPatch, TagRow};

use crate::error::{ApiError, ApiResult};
use crate::extract::UserIdentity;
use crate::routes::double_option;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// A tag in API responses.
#[derive(Debug, Serialize)]
pub struct TagResponse {
    pub id: Uuid,
    pub name: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<TagRow> for TagResponse {
    fn from(row: TagRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            color: row.color,
            created_at: row.created_at,
        }
    }
}

/// Response for tag listings.
#[derive(Debug, Serialize)]
pub struct ListTagsResponse {
    pub tags: Vec<TagResponse>,
}

/// Request body for POST /tags.
#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

/// Request body for PATCH /tags/{id}.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTagRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub color: Option<Option<String>>,
}

/// Envelope for single-tag responses.
#[derive(Debug, Serialize)]
pub struct TagEnvelope {
    pub tag: TagResponse,
}

/// Response for mutations without a body.
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

// ============================================================================
// Validation
// ============================================================================

/// Tag names must be 1..=50 characters.
fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::BadRequest("Tag name cannot be empty".to_string()));
    }
    if name.chars().count() > 50 {
        return Err(ApiError::BadRequest(
            "Tag name cannot exceed 50 characters".to_string(),
        ));
    }
    Ok(())
}

/// Colors are `#rrggbb` hex strings.
fn validate_color(color: &str) -> Result<(), ApiError> {
    let mut chars = color.chars();
    let valid = chars.next() == Some('#')
        && color.len() == 7
        && chars.all(|c| c.is_ascii_hexdigit());
    if !valid {
        return Err(ApiError::BadRequest(
            "Color must be a #rrggbb hex string".to_string(),
        ));
    }
    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /tags - List the caller's tags.
async fn list_tags(
    State(state): State<AppState>,
    identity: UserIdentity,
) -> ApiResult<Json<ListTagsResponse>> {
    let rows = state.store().list_tags(identity.user_id.as_str()).await?;

    Ok(Json(ListTagsResponse {
        tags: rows.into_iter().map(TagResponse::from).collect(),
    }))
}

/// GET /tags/{id} - Fetch a single owned tag.
async fn get_tag(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TagEnvelope>> {
    let row = state.store().get_tag(id, identity.user_id.as_str()).await?;

    Ok(Json(TagEnvelope { tag: row.into() }))
}

/// POST /tags - Create a tag.
async fn create_tag(
    State(state): State<AppState>,
    identity: UserIdentity,
    Json(request): Json<CreateTagRequest>,
) -> ApiResult<(StatusCode, Json<TagEnvelope>)> {
    validate_name(&request.name)?;
    if let Some(color) = &request.color {
        validate_color(color)?;
    }

    state
        .store()
        .upsert_user(&NewUser {
            id: identity.user_id.as_str().to_string(),
            email: identity.email.clone(),
            name: identity.name.clone(),
        })
        .await?;

    let row = state
        .store()
        .insert_tag(&NewTag {
            user_id: identity.user_id.as_str().to_string(),
            name: request.name,
            color: request.color,
        })
        .await?;

    tracing::info!(tag_id = %row.id, "Tag created");

    Ok((StatusCode::CREATED, Json(TagEnvelope { tag: row.into() })))
}

/// PATCH /tags/{id} - Rename or recolor a tag.
async fn update_tag(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateTagRequest>,
) -> ApiResult<Json<TagEnvelope>> {
    if let Some(name) = &request.name {
        validate_name(name)?;
    }
    if let Some(Some(color)) = &request.color {
        validate_color(color)?;
    }

    let row = state
        .store()
        .update_tag(
            id,
            identity.user_id.as_str(),
            &TagPatch {
                name: request.name,
                color: request.color,
            },
        )
        .await?;

    Ok(Json(TagEnvelope { tag: row.into() }))
}

/// DELETE /tags/{id} - Delete a tag. Attachments cascade.
async fn delete_tag(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SuccessResponse>> {
    state.store().delete_tag(id, identity.user_id.as_str()).await?;

    tracing::info!(tag_id = %id, "Tag deleted");

    Ok(Json(SuccessResponse { success: true }))
}

/// GET /documents/{document_id}/tags - Tags attached to a document.
async fn list_document_tags(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(document_id): Path<Uuid>,
) -> ApiResult<Json<ListTagsResponse>> {
    // Document ownership gates the listing
    state
        .store()
        .get_owned_document(document_id, identity.user_id.as_str())
        .await?;

    let rows = state.store().list_document_tags(document_id).await?;

    Ok(Json(ListTagsResponse {
        tags: rows.into_iter().map(TagResponse::from).collect(),
    }))
}

/// POST /documents/{document_id}/tags/{tag_id} - Attach a tag.
async fn attach_tag(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path((document_id, tag_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<SuccessResponse>> {
    // Both ends must exist and belong to the caller
    state
        .store()
        .get_owned_document(document_id, identity.user_id.as_str())
        .await?;
    state
        .store()
        .get_tag(tag_id, identity.user_id.as_str())
        .await?;

    state.store().attach_tag(document_id, tag_id).await?;

    Ok(Json(SuccessResponse { success: true }))
}

/// DELETE /documents/{document_id}/tags/{tag_id} - Detach a tag.
async fn detach_tag(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path((document_id, tag_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<SuccessResponse>> {
    state
        .store()
        .get_owned_document(document_id, identity.user_id.as_str())
        .await?;

    state.store().detach_tag(document_id, tag_id).await?;

    Ok(Json(SuccessResponse { success: true }))
}

/// Build tag routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tags", get(list_tags).post(create_tag))
        .route(
            "/tags/{id}",
            get(get_tag).patch(update_tag).delete(delete_tag),
        )
        .route("/documents/{id}/tags", get(list_document_tags))
        .route(
            "/documents/{id}/tags/{tag_id}",
            post(attach_tag).delete(detach_tag),
        )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name_limits() {
        assert!(validate_name("reading").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name(&"x".repeat(51)).is_err());
        assert!(validate_name(&"x".repeat(50)).is_ok());
    }

    #[test]
    fn test_validate_color() {
        assert!(validate_color("#aabbcc").is_ok());
        assert!(validate_color("#AABB00").is_ok());
        assert!(validate_color("aabbcc").is_err());
        assert!(validate_color("#abc").is_err());
        assert!(validate_color("#aabbcg").is_err());
        assert!(validate_color("#aabbccdd").is_err());
    }

    #[test]
    fn test_update_request_color_shapes() {
        let clear: UpdateTagRequest = serde_json::from_str(r#"{"color": null}"#).unwrap();
        assert_eq!(clear.color, Some(None));

        let set: UpdateTagRequest = serde_json::from_str(r##"{"color": "#ff0000"}"##).unwrap();
        assert_eq!(set.color, Some(Some("#ff0000".to_string())));
    }
}
