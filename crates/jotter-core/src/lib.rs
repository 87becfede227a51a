//! jotter-core: content model and pure document algorithms for Jotter
//!
//! This crate holds everything that operates on documents without
//! touching I/O:
//!
//! - The recursive rich-text [`ContentNode`] tree and its best-effort
//!   JSON conversion
//! - Plain-text extraction ([`extract_text`]) used for previews,
//!   thumbnails, and diffing
//! - The word-level LCS diff ([`diff_texts`])
//! - The bounded structural preview projection
//!   ([`extract_structural_elements`])
//! - Shared identifier and status types
//!
//! All functions here are pure and side-effect free; they are safe to
//! call concurrently from any number of request handlers.

pub mod content;
pub mod diff;
pub mod preview;
pub mod types;

pub use content::{ContentNode, Mark, NodeAttrs, extract_text, parse_content, truncate_text};
pub use diff::{DiffKind, DiffSegment, diff_texts};
pub use preview::{
    HEADING_PREVIEW_CHARS, PARAGRAPH_PREVIEW_CHARS, PreviewElement, extract_structural_elements,
};
pub use types::{DocumentId, DocumentStatus, StatusParseError, UserId, VersionId};
