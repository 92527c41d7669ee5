//! # mediary-view
//!
//! Copy-on-write views over frozen value trees.
//!
//! This crate provides:
//! - [`View`]: a mediator that records writes in a change set and patch
//!   while its base stays untouched
//! - The sequence adapter: `push`, `pop`, `shift`, `unshift`, `splice`,
//!   `reverse`, `copy_within`, `fill`, `sort` and `set_length`, all built
//!   on the same get/set/delete primitives
//! - Read-only sequence queries (`find`, `filter`, `reduce`, `join`, ...)
//! - Realization back into plain values, reusing untouched subtrees
//!
//! ## Example
//!
//! ```rust
//! use mediary_core::{Base, Value};
//! use mediary_view::View;
//!
//! let value = Value::from(serde_json::json!({"list": [1, 2]}));
//! let view = View::new(Base::of(&value).unwrap());
//!
//! let list = view.get("list").into_view().unwrap();
//! list.push(3).unwrap();
//!
//! assert_eq!(view.to_json(), serde_json::json!({"list": [1, 2, 3]}));
//! assert_eq!(value.to_json(), serde_json::json!({"list": [1, 2]}));
//! ```

/// Emit a TRACE event for a view operation when the view's configuration
/// asks for it.
macro_rules! trace_op {
    ($mediator:expr, $op:expr, $key:expr) => {
        if $mediator.config.trace_operations {
            tracing::trace!(view = %$mediator.id, op = $op, key = %$key, "view operation");
        }
    };
}

pub mod mediator;
pub mod query;
pub mod realize;
pub mod sequence;

pub use mediator::{Item, View, ViewId};
pub use realize::realize;
