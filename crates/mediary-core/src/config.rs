//! Configuration for views.
//!
//! A configuration is attached to a view when it is created and inherited
//! by every child view wrapped beneath it.

use crate::error::{MediaryError, Result};
use serde::{Deserialize, Serialize};

/// How a sequence view treats keys that are neither indices nor `length`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeyPolicy {
    /// Writes and deletes fail with `InvalidKey`.
    #[default]
    Reject,
    /// Writes and deletes are silently dropped.
    Ignore,
}

/// View configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaryConfig {
    /// Emit a TRACE event for every get, set, delete and length change.
    pub trace_operations: bool,

    /// Treatment of non-index keys written to sequences.
    pub foreign_sequence_keys: ForeignKeyPolicy,
}

impl MediaryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration document. Missing fields take their
    /// defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|err| MediaryError::Config(err.to_string()))
    }

    pub fn with_trace_operations(mut self, enabled: bool) -> Self {
        self.trace_operations = enabled;
        self
    }

    pub fn with_foreign_sequence_keys(mut self, policy: ForeignKeyPolicy) -> Self {
        self.foreign_sequence_keys = policy;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MediaryConfig::default();
        assert!(!config.trace_operations);
        assert_eq!(config.foreign_sequence_keys, ForeignKeyPolicy::Reject);
    }

    #[test]
    fn test_from_json_partial() {
        let config = MediaryConfig::from_json(r#"{"foreign_sequence_keys": "ignore"}"#).unwrap();
        assert_eq!(config.foreign_sequence_keys, ForeignKeyPolicy::Ignore);
        assert!(!config.trace_operations);

        let config = MediaryConfig::from_json("{}").unwrap();
        assert_eq!(config, MediaryConfig::default());
    }

    #[test]
    fn test_from_json_invalid() {
        let err = MediaryConfig::from_json(r#"{"foreign_sequence_keys": "maybe"}"#).unwrap_err();
        assert!(matches!(err, MediaryError::Config(_)));
    }

    #[test]
    fn test_builder() {
        let config = MediaryConfig::new()
            .with_trace_operations(true)
            .with_foreign_sequence_keys(ForeignKeyPolicy::Ignore);
        assert!(config.trace_operations);
        assert_eq!(config.foreign_sequence_keys, ForeignKeyPolicy::Ignore);
    }
}
