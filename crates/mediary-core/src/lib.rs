//! # mediary-core
//!
//! Data layer for Mediary copy-on-write views.
//!
//! This crate provides:
//! - Plain value trees with `Arc`-shared, immutable nodes
//! - Keys and dotted key paths
//! - Frozen bases and the serde gate for typed input
//! - Change tracking (`ChangeSet`) and patch storage (`Patch`)
//! - The error taxonomy and view configuration
//!
//! ## Example
//!
//! ```rust
//! use mediary_core::{ChangeSet, Value};
//!
//! let value = Value::from(serde_json::json!({"a": [1, 2]}));
//! assert!(value.is_node());
//!
//! let mut changes = ChangeSet::new();
//! changes.add("a".to_string());
//! changes.delete("a".to_string());
//! assert!(changes.is_disjoint());
//! ```

pub mod changes;
pub mod config;
pub mod error;
pub mod frozen;
pub mod key;
pub mod patch;
pub mod value;

pub use changes::ChangeSet;
pub use config::{ForeignKeyPolicy, MediaryConfig};
pub use error::{MediaryError, Result};
pub use frozen::{freeze, thaw, Base};
pub use key::{parse_index, Key, Path, LENGTH, MAX_INDEX, MAX_LENGTH};
pub use patch::Patch;
pub use value::{MapNode, NodeKind, SeqNode, Value, ValueKind};
