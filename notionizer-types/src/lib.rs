//! Core type definitions for notionizer.
//!
//! This crate defines the small, service-agnostic vocabulary shared by the
//! rest of the workspace:
//! - Remote object identifiers (UUIDs, dashed or undashed on the wire)
//! - The kind of a top-level remote object (database or page)
//! - ISO-8601 timestamps as reported by the service
//!
//! Property kinds, filters and the entity cache live in their own crates.

mod ids;
mod kind;
mod timestamp;

pub use ids::ObjectId;
pub use kind::ObjectKind;
pub use timestamp::Timestamp;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid object id: {0}")]
    InvalidId(#[from] uuid::Error),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("unknown object kind '{0}'")]
    UnknownObjectKind(String),
}
