//! jotter-server: HTTP API server for Jotter
//!
//! This crate provides:
//! - REST endpoints for documents, versions, folders, tags, shares, and
//!   comments
//! - JWT identity extraction with a dev-mode header fallback
//! - Public token-gated access to shared documents
//!
//! # Architecture
//!
//! The server is built on Axum with a middleware stack for:
//! - Request tracing and logging
//! - CORS handling
//! - Request ID generation
//! - JSON error responses

pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

// Re-exports for convenience
pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use extract::UserIdentity;
pub use state::AppState;

// Re-export dependent crates
pub use jotter_core;
pub use jotter_store;
