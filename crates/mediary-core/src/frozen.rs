//! Frozen bases.
//!
//! Every node of a [`Value`] is behind an `Arc` and has no interior
//! mutability, so a tree is frozen as soon as it is built. A [`Base`] is
//! the node a view overlays; it shares the allocation of the value it was
//! taken from and lives for as long as any view (or realized value)
//! still refers to it.
//!
//! [`freeze`] is the entry point for typed Rust data: anything that
//! serializes to plain mappings, sequences and primitives is accepted,
//! everything else is a type-constraint error.

use crate::error::{MediaryError, Result};
use crate::value::{MapNode, NodeKind, SeqNode, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// The frozen node underneath a view.
#[derive(Clone, Debug)]
pub enum Base {
    Map(Arc<MapNode>),
    Seq(Arc<SeqNode>),
}

impl Base {
    /// Take the node of `value` as a base, sharing its allocation.
    pub fn of(value: &Value) -> Option<Base> {
        match value {
            Value::Map(m) => Some(Base::Map(Arc::clone(m))),
            Value::Seq(s) => Some(Base::Seq(Arc::clone(s))),
            _ => None,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Base::Map(_) => NodeKind::Map,
            Base::Seq(_) => NodeKind::Seq,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Base::Map(m) => m.len(),
            Base::Seq(s) => s.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The base as a value, sharing the allocation.
    pub fn to_value(&self) -> Value {
        match self {
            Base::Map(m) => Value::Map(Arc::clone(m)),
            Base::Seq(s) => Value::Seq(Arc::clone(s)),
        }
    }
}

impl TryFrom<Value> for Base {
    type Error = MediaryError;

    fn try_from(value: Value) -> Result<Self> {
        Base::of(&value).ok_or_else(|| MediaryError::type_constraint("mapping or sequence", value.kind()))
    }
}

/// Freeze typed data into a plain value tree.
///
/// Fails with [`MediaryError::TypeConstraint`] when `input` does not
/// serialize to plain data (for example a map with non-string keys).
pub fn freeze<T: Serialize + ?Sized>(input: &T) -> Result<Value> {
    serde_json::to_value(input)
        .map(Value::from)
        .map_err(|err| MediaryError::type_constraint("plain data", err))
}

/// Convert a plain value tree back into typed data.
pub fn thaw<T: DeserializeOwned>(value: &Value) -> Result<T> {
    Ok(serde_json::from_value(value.to_json())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;
    use std::collections::HashMap;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Settings {
        name: String,
        tags: Vec<String>,
    }

    #[test]
    fn test_base_shares_allocation() {
        let value = Value::from(json!({"a": 1}));
        let base = Base::of(&value).unwrap();
        assert!(base.to_value().same(&value));
        assert!(Base::of(&value).unwrap().to_value().same(&base.to_value()));
        assert_eq!(base.kind(), NodeKind::Map);
    }

    #[test]
    fn test_primitive_is_not_a_base() {
        assert!(Base::of(&Value::from(3)).is_none());
        let err = Base::try_from(Value::from("x")).unwrap_err();
        assert!(matches!(err, MediaryError::TypeConstraint { .. }));
    }

    #[test]
    fn test_freeze_and_thaw_typed_data() {
        let settings = Settings {
            name: "app".to_string(),
            tags: vec!["a".to_string(), "b".to_string()],
        };
        let value = freeze(&settings).unwrap();
        assert_eq!(value, Value::from(json!({"name": "app", "tags": ["a", "b"]})));
        let back: Settings = thaw(&value).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_freeze_rejects_non_plain_data() {
        let mut keyed = HashMap::new();
        keyed.insert((1, 2), "pair-keyed");
        let err = freeze(&keyed).unwrap_err();
        assert!(matches!(err, MediaryError::TypeConstraint { .. }));
    }
}
