//! # Mediary
//!
//! Copy-on-write views over frozen value trees.
//!
//! A view reads like the tree it wraps, but every write lands in a
//! per-view overlay while the input stays untouched. Realizing a view
//! produces a new tree that shares every untouched subtree with the
//! input.
//!
//! # Quick Start
//!
//! ```rust
//! use mediary::{produce, Value};
//! use serde_json::json;
//!
//! let state = Value::from(json!({"todos": [{"done": false}]}));
//!
//! let next = produce(&state, |v| {
//!     let todos = v.get("todos").into_view().unwrap();
//!     todos.push(json!({"done": true}))?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! assert_eq!(next.to_json(), json!({"todos": [{"done": false}, {"done": true}]}));
//! assert_eq!(state.to_json(), json!({"todos": [{"done": false}]}));
//! ```
//!
//! # Architecture
//!
//! - [`mediary_core`] - values, keys, change sets, patches, errors, config
//! - [`mediary_view`] - the mediator, sequence adapter and realizer
//! - this crate - the façade: [`mediate`], [`realize`], [`clone`],
//!   [`produce`], [`create`] and the configured [`Mediary`] context

pub mod context;

pub use context::{clone, create, mediate, mediate_from, produce, realize, realize_into, Mediary};

// Re-exports for convenience
pub use mediary_core::{
    freeze, thaw, Base, ChangeSet, ForeignKeyPolicy, Key, MapNode, MediaryConfig, MediaryError,
    NodeKind, Patch, Path, Result, SeqNode, Value, ValueKind, LENGTH, MAX_INDEX, MAX_LENGTH,
};
pub use mediary_view::{Item, View, ViewId};
