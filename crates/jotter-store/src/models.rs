//! Database models for the storage layer.
//!
//! These types map directly to database rows and are used for sqlx
//! queries. Row structs are kept separate from the `New*` insert inputs
//! and `*Patch` update inputs so handlers never bind half-built rows.

use chrono::{DateTime, Utc};
use jotter_core::DocumentStatus;
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Database row for the `users` table.
///
/// The `id` is the opaque subject string asserted by the upstream
/// identity provider; rows are upserted on first authenticated write.
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for upserting a user.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl NewUser {
    /// A bare user record carrying only the auth subject.
    pub fn bare(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// Database row for the `folders` table.
#[derive(Debug, Clone, FromRow)]
pub struct FolderRow {
    pub id: Uuid,
    pub user_id: String,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new folder.
#[derive(Debug, Clone)]
pub struct NewFolder {
    pub user_id: String,
    pub name: String,
    pub parent_id: Option<Uuid>,
}

/// Partial update for a folder. `parent_id` is doubly optional so the
/// parent can be set, cleared, or left alone.
#[derive(Debug, Clone, Default)]
pub struct FolderPatch {
    pub name: Option<String>,
    pub parent_id: Option<Option<Uuid>>,
}

/// Database row for the `documents` table.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentRow {
    pub id: Uuid,
    pub user_id: String,
    pub folder_id: Option<Uuid>,
    pub parent_document_id: Option<Uuid>,
    pub title: String,
    /// Latest working draft as a ContentNode tree.
    pub content: Option<Value>,
    pub status: String,
    pub is_pinned: bool,
    pub pin_order: Option<i32>,
    /// Frozen snapshot of `content` at the last publish.
    pub published_content: Option<Value>,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DocumentRow {
    /// The document's publication status.
    ///
    /// The column carries a CHECK constraint, so the parse only falls
    /// back to `Draft` if the database was modified out of band.
    pub fn status(&self) -> DocumentStatus {
        self.status.parse().unwrap_or_default()
    }
}

/// Input for creating a new document.
#[derive(Debug, Clone)]
pub struct NewDocument {
    pub user_id: String,
    pub title: String,
    pub content: Option<Value>,
    pub folder_id: Option<Uuid>,
    pub parent_document_id: Option<Uuid>,
}

/// Partial update for a document.
///
/// `folder_id` and `parent_document_id` are doubly optional so they can
/// be set, cleared, or left alone. `content` cannot be cleared through a
/// patch, only replaced.
#[derive(Debug, Clone, Default)]
pub struct DocumentPatch {
    pub title: Option<String>,
    pub content: Option<Value>,
    pub folder_id: Option<Option<Uuid>>,
    pub parent_document_id: Option<Option<Uuid>>,
    pub is_pinned: Option<bool>,
}

/// Database row for the `document_versions` table.
///
/// Immutable once written, except for `annotation`.
#[derive(Debug, Clone, FromRow)]
pub struct DocumentVersionRow {
    pub id: Uuid,
    pub document_id: Uuid,
    pub content: Option<Value>,
    pub title: String,
    pub version_number: i32,
    pub annotation: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
}

/// A version row enriched with the creator's display name.
#[derive(Debug, Clone, FromRow)]
pub struct VersionWithCreator {
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

/// Database row for the `tags` table.
#[derive(Debug, Clone, FromRow)]
pub struct TagRow {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new tag.
#[derive(Debug, Clone)]
pub struct NewTag {
    pub user_id: String,
    pub name: String,
    pub color: Option<String>,
}

/// Partial update for a tag.
#[derive(Debug, Clone, Default)]
pub struct TagPatch {
    pub name: Option<String>,
    pub color: Option<Option<String>>,
}

/// Database row for the `shares` table.
#[derive(Debug, Clone, FromRow)]
pub struct ShareRow {
    pub id: Uuid,
    pub document_id: Uuid,
    pub email: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: Option<DateTime<Utc>>,
    pub revoked: bool,
}

impl ShareRow {
    /// Whether the share has passed its expiry instant.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at < now)
    }
}

/// Input for creating a new share.
#[derive(Debug, Clone)]
pub struct NewShare {
    pub document_id: Uuid,
    pub email: String,
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Database row for the `comments` table.
#[derive(Debug, Clone, FromRow)]
pub struct CommentRow {
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

/// Input for creating a new comment.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub document_id: Uuid,
    pub share_id: Option<Uuid>,
    pub author_name: String,
    pub author_email: Option<String>,
    pub content: String,
    pub selection_start: i32,
    pub selection_end: i32,
    pub selection_text: String,
}

/// Partial update for a comment (content and resolved flag only).
#[derive(Debug, Clone, Default)]
pub struct CommentPatch {
    pub content: Option<String>,
    pub resolved: Option<bool>,
}

/// Offset pagination window for comment listings.
#[derive(Debug, Clone, Copy)]
pub struct Page {
    pub limit: i64,
    pub offset: i64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: 20,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    fn share(expires_at: Option<DateTime<Utc>>) -> ShareRow {
        ShareRow {
            id: Uuid::nil(),
            document_id: Uuid::nil(),
            email: "reader@example.com".to_string(),
            token: Uuid::nil().to_string(),
            created_at: Utc::now(),
            expires_at,
            revoked: false,
        }
    }

    #[test]
    fn test_share_without_expiry_never_expires() {
        assert!(!share(None).is_expired(Utc::now()));
    }

    #[test]
    fn test_share_expiry_boundary() {
        let now = Utc::now();
        assert!(share(Some(now - TimeDelta::seconds(1))).is_expired(now));
        assert!(!share(Some(now + TimeDelta::seconds(1))).is_expired(now));
    }

    #[test]
    fn test_new_user_bare() {
        let user = NewUser::bare("user_abc");
        assert_eq!(user.id, "user_abc");
        assert!(user.email.is_none());
        assert!(user.name.is_none());
    }

    #[test]
    fn test_page_default() {
        let page = Page::default();
        assert_eq!(page.limit, 20);
        assert_eq!(page.offset, 0);
    }
}
