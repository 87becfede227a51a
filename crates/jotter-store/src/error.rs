//! Error types for the storage layer.

use thiserror::Error;
use uuid::Uuid;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database connection error.
    #[error("database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    /// Document not found, or not owned by the requesting user.
    #[error("document not found: {0}")]
    DocumentNotFound(Uuid),

    /// Version not found, or not belonging to the claimed document.
    #[error("version not found: {0}")]
    VersionNotFound(Uuid),

    /// Folder not found.
    #[error("folder not found: {0}")]
    FolderNotFound(Uuid),

    /// Tag not found.
    #[error("tag not found: {0}")]
    TagNotFound(Uuid),

    /// Share not found.
    #[error("share not found: {0}")]
    ShareNotFound(Uuid),

    /// Comment not found.
    #[error("comment not found: {0}")]
    CommentNotFound(Uuid),

    /// User not found.
    #[error("user not found: {0}")]
    UserNotFound(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}
