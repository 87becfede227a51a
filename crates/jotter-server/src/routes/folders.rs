//! Folder routes.
//!
//! This module implements the folder-related HTTP endpoints:
//! - GET /folders - List the caller's folders
//! - POST /folders - Create a folder
//! - GET /folders/{id} - Fetch a folder
//! - PATCH /folders/{id} - Rename or reparent a folder
//! - DELETE /folders/{id} - Delete a folder (documents fall out, not away)

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use jotter_store::{FolderPatch, FolderRow, NewFolder, NewUser, StoreError};

use crate::error::{ApiError, ApiResult};
use crate::extract::UserIdentity;
use crate::routes::double_option;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// A folder in API responses.
#[derive(Debug, Serialize)]
pub struct FolderResponse {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<FolderRow> for FolderResponse {
    fn from(row: FolderRow) -> Self {
        Self {
            id: row.id,
            parent_id: row.parent_id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Response for GET /folders.
#[derive(Debug, Serialize)]
pub struct ListFoldersResponse {
    pub folders: Vec<FolderResponse>,
}

/// Request body for POST /folders.
#[derive(Debug, Deserialize)]
pub struct CreateFolderRequest {
    pub name: String,
    #[serde(default)]
    pub parent_id: Option<Uuid>,
}

/// Request body for PATCH /folders/{id}.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateFolderRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<Uuid>>,
}

/// Envelope for single-folder responses.
#[derive(Debug, Serialize)]
pub struct FolderEnvelope {
    pub folder: FolderResponse,
}

/// Response for DELETE /folders/{id}.
#[derive(Debug, Serialize)]
pub struct DeleteFolderResponse {
    pub success: bool,
}

// ============================================================================
// Validation
// ============================================================================

/// Folder names must be 1..=255 characters.
fn validate_name(name: &str) -> Result<(), ApiError> {
    if name.trim().is_empty() {
        return Err(ApiError::BadRequest("Folder name cannot be empty".to_string()));
    }
    if name.chars().count() > 255 {
        return Err(ApiError::BadRequest(
            "Folder name cannot exceed 255 characters".to_string(),
        ));
    }
    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET /folders - List the caller's folders.
async fn list_folders(
    State(state): State<AppState>,
    identity: UserIdentity,
) -> ApiResult<Json<ListFoldersResponse>> {
    let rows = state.store().list_folders(identity.user_id.as_str()).await?;

    Ok(Json(ListFoldersResponse {
        folders: rows.into_iter().map(FolderResponse::from).collect(),
    }))
}

/// GET /folders/{id} - Fetch a single owned folder.
async fn get_folder(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<FolderEnvelope>> {
    let row = state
        .store()
        .get_folder(id, identity.user_id.as_str())
        .await?;

    Ok(Json(FolderEnvelope { folder: row.into() }))
}

/// POST /folders - Create a folder.
async fn create_folder(
    State(state): State<AppState>,
    identity: UserIdentity,
    Json(request): Json<CreateFolderRequest>,
) -> ApiResult<(StatusCode, Json<FolderEnvelope>)> {
    validate_name(&request.name)?;

    state
        .store()
        .upsert_user(&NewUser {
            id: identity.user_id.as_str().to_string(),
            email: identity.email.clone(),
            name: identity.name.clone(),
        })
        .await?;

    if let Some(parent_id) = request.parent_id {
        state
            .store()
            .get_folder(parent_id, identity.user_id.as_str())
            .await
            .map_err(|e| match e {
                StoreError::FolderNotFound(_) => {
                    ApiError::NotFound("Parent folder not found".to_string())
                }
                other => ApiError::Store(other),
            })?;
    }

    let row = state
        .store()
        .insert_folder(&NewFolder {
            user_id: identity.user_id.as_str().to_string(),
            name: request.name,
            parent_id: request.parent_id,
        })
        .await?;

    tracing::info!(folder_id = %row.id, "Folder created");

    Ok((StatusCode::CREATED, Json(FolderEnvelope { folder: row.into() })))
}

/// PATCH /folders/{id} - Rename or reparent a folder.
async fn update_folder(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateFolderRequest>,
) -> ApiResult<Json<FolderEnvelope>> {
    if let Some(name) = &request.name {
        validate_name(name)?;
    }

    if request.parent_id == Some(Some(id)) {
        return Err(ApiError::BadRequest(
            "Folder cannot be its own parent".to_string(),
        ));
    }

    let row = state
        .store()
        .update_folder(
            id,
            identity.user_id.as_str(),
            &FolderPatch {
                name: request.name,
                parent_id: request.parent_id,
            },
        )
        .await?;

    Ok(Json(FolderEnvelope { folder: row.into() }))
}

/// DELETE /folders/{id} - Delete a folder.
///
/// Documents inside the folder keep existing with no folder.
async fn delete_folder(
    State(state): State<AppState>,
    identity: UserIdentity,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<DeleteFolderResponse>> {
    state
        .store()
        .delete_folder(id, identity.user_id.as_str())
        .await?;

    tracing::info!(folder_id = %id, "Folder deleted");

    Ok(Json(DeleteFolderResponse { success: true }))
}

/// Build folder routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/folders", get(list_folders).post(create_folder))
        .route(
            "/folders/{id}",
            get(get_folder).patch(update_folder).delete(delete_folder),
        )
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Projects").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("  ").is_err());
        assert!(validate_name(&"x".repeat(256)).is_err());
    }

    #[test]
    fn test_update_request_reparenting_shapes() {
        let keep: UpdateFolderRequest = serde_json::from_str(r#"{"name": "New"}"#).unwrap();
        assert_eq!(keep.parent_id, None);

        let clear: UpdateFolderRequest = serde_json::from_str(r#"{"parent_id": null}"#).unwrap();
        assert_eq!(clear.parent_id, Some(None));
    }
}
