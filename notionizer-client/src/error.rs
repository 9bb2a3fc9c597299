//! Error types for the client layer.

use notionizer_model::ModelError;
use notionizer_query::QueryCompileError;
use notionizer_types::{ObjectId, ObjectKind};
use serde_json::Value;
use thiserror::Error;

/// Result type for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// An error object returned by the service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{status}] {code}: {message}")]
pub struct TransportError {
    pub status: u16,
    pub code: String,
    pub message: String,
}

impl TransportError {
    pub fn new(status: u16, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Extracts the error from a body shaped `{"object": "error", ...}`.
    /// `fallback_status` is used when the body has no `status`.
    pub fn from_body(body: &Value, fallback_status: u16) -> Option<Self> {
        if body.get("object").and_then(Value::as_str) != Some("error") {
            return None;
        }
        let status = body
            .get("status")
            .and_then(Value::as_u64)
            .and_then(|s| u16::try_from(s).ok())
            .unwrap_or(fallback_status);
        let text = |key: &str| {
            body.get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Some(Self::new(status, text("code"), text("message")))
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == 429 || self.code == "rate_limited"
    }
}

/// Errors that can occur in client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Query(#[from] QueryCompileError),

    #[error(transparent)]
    Types(#[from] notionizer_types::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("unknown property '{0}'")]
    UnknownProperty(String),

    #[error("{id} is cached as a {cached} but the response describes a {received}")]
    KindMismatch {
        id: ObjectId,
        cached: ObjectKind,
        received: ObjectKind,
    },

    #[error("expected a {expected}, got a {found}")]
    WrongKind {
        expected: ObjectKind,
        found: ObjectKind,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<uuid::Error> for ClientError {
    fn from(err: uuid::Error) -> Self {
        ClientError::Types(err.into())
    }
}

impl ClientError {
    /// Returns true for a 429 from the service.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            ClientError::Transport(e) => e.is_rate_limited(),
            ClientError::Http(e) => e.status().is_some_and(|s| s.as_u16() == 429),
            _ => false,
        }
    }

    /// The service error, when this is one.
    pub fn transport(&self) -> Option<&TransportError> {
        match self {
            ClientError::Transport(e) => Some(e),
            _ => None,
        }
    }
}
