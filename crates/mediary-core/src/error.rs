//! Error types for Mediary.

use crate::value::NodeKind;
use thiserror::Error;

/// Errors that can occur while wrapping, reading or writing a view.
///
/// Reading a missing or deleted key is not an error; it yields an absent
/// value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MediaryError {
    #[error("Type constraint violated: expected {expected}, found {found}")]
    TypeConstraint { expected: String, found: String },

    #[error("Invalid key for {node}: {key}")]
    InvalidKey { key: String, node: NodeKind },

    #[error("Invalid sequence length: {0}")]
    InvalidLength(String),

    #[error("Path not found: {0}")]
    PathNotFound(String),

    #[error("Cyclic write: a view cannot be stored inside itself")]
    Cycle,

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl MediaryError {
    pub fn type_constraint(expected: impl Into<String>, found: impl ToString) -> Self {
        MediaryError::TypeConstraint {
            expected: expected.into(),
            found: found.to_string(),
        }
    }
}

impl From<serde_json::Error> for MediaryError {
    fn from(err: serde_json::Error) -> Self {
        MediaryError::SerializationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MediaryError>;
