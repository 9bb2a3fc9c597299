use crate::registry::LocalType;

/// Errors raised while building or writing properties.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("unrecognized property type '{wire_type}'")]
    Schema { wire_type: String },

    #[error("property '{name}' is immutable")]
    Immutable { name: String },

    #[error("property '{name}' expects {expected}, got {actual}")]
    Validation {
        name: String,
        expected: String,
        actual: LocalType,
    },

    #[error("properties collection is read-only")]
    ReadOnlyCollection,

    #[error("malformed property '{name}': {reason}")]
    Malformed { name: String, reason: String },
}

pub type ModelResult<T> = Result<T, ModelError>;
