//! jotter-store: PostgreSQL storage layer for Jotter
//!
//! This crate provides:
//! - Relational storage for users, folders, documents, tags, shares,
//!   and comments
//! - The version lifecycle service (publish, unpublish, restore,
//!   annotate) with atomic per-document version numbering
//! - Embedded migration management
//! - Type-safe database operations via sqlx
//!
//! # Usage
//!
//! ```rust,ignore
//! use jotter_store::{Store, StoreConfig, VersionService};
//!
//! let config = StoreConfig::from_env()?;
//! let store = Store::connect(config).await?;
//!
//! let outcome = VersionService::publish(store.pool(), document_id, &user_id).await?;
//! ```

pub mod error;
pub mod models;
pub mod schema;
pub mod store;
pub mod versions;

pub use error::{StoreError, StoreResult};
pub use models::*;
pub use store::{Store, StoreConfig};
pub use versions::{PublishOutcome, VersionService};

// Re-export jotter-core for downstream crates
pub use jotter_core;
