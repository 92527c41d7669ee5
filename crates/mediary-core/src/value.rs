//! Plain value trees.
//!
//! A [`Value`] is either a primitive or a node. Nodes live behind `Arc`,
//! so a tree can be shared between any number of holders but never
//! changed once it is built: "modifying" a node always means building a
//! new one. That sharing is what lets a realized view reuse untouched
//! subtrees of its base by reference.

use crate::key::Key;
use indexmap::IndexMap;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::Arc;

/// Ordered contents of a mapping node.
pub type MapNode = IndexMap<String, Value>;

/// Elements of a sequence node.
pub type SeqNode = Vec<Value>;

/// A plain value: primitive, mapping node or sequence node.
#[derive(Clone, Debug, Default)]
pub enum Value {
    /// No value. Reads of deleted or never-present keys produce this, and
    /// it fills the holes of sparse sequences.
    #[default]
    Absent,
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value.
    String(Arc<str>),
    /// Mapping node.
    Map(Arc<MapNode>),
    /// Sequence node.
    Seq(Arc<SeqNode>),
}

/// Coarse type of a value, used in error messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Absent,
    Null,
    Bool,
    Number,
    String,
    Map,
    Seq,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Absent => "absent",
            ValueKind::Null => "null",
            ValueKind::Bool => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Map => "mapping",
            ValueKind::Seq => "sequence",
        };
        f.write_str(name)
    }
}

/// The two container shapes a view can overlay.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Map,
    Seq,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Map => f.write_str("mapping"),
            NodeKind::Seq => f.write_str("sequence"),
        }
    }
}

impl Value {
    /// Build a string value.
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::String(Arc::from(s.as_ref()))
    }

    /// Build a mapping node from key/value pairs, keeping their order.
    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(Arc::new(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// Build a sequence node.
    pub fn seq<V: Into<Value>>(items: impl IntoIterator<Item = V>) -> Self {
        Value::Seq(Arc::new(items.into_iter().map(Into::into).collect()))
    }

    pub fn empty_map() -> Self {
        Value::Map(Arc::new(MapNode::new()))
    }

    pub fn empty_seq() -> Self {
        Value::Seq(Arc::new(SeqNode::new()))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Absent => ValueKind::Absent,
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Int(_) | Value::Float(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Map(_) => ValueKind::Map,
            Value::Seq(_) => ValueKind::Seq,
        }
    }

    /// Container shape, or `None` for primitives.
    pub fn node_kind(&self) -> Option<NodeKind> {
        match self {
            Value::Map(_) => Some(NodeKind::Map),
            Value::Seq(_) => Some(NodeKind::Seq),
            _ => None,
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Value::Map(_) | Value::Seq(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&MapNode> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&SeqNode> {
        match self {
            Value::Seq(s) => Some(s),
            _ => None,
        }
    }

    /// Identity comparison: nodes are the same only if they share the
    /// same allocation, primitives if they are equal.
    pub fn same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Map(a), Value::Map(b)) => Arc::ptr_eq(a, b),
            (Value::Seq(a), Value::Seq(b)) => Arc::ptr_eq(a, b),
            (Value::Map(_) | Value::Seq(_), _) | (_, Value::Map(_) | Value::Seq(_)) => false,
            (a, b) => a == b,
        }
    }

    /// Look up a direct child. Mapping keys are matched by their string
    /// form; sequences only answer to indices.
    pub fn get(&self, key: &Key) -> Option<&Value> {
        match self {
            Value::Map(m) => match key {
                Key::Name(name) => m.get(name.as_str()),
                Key::Index(i) => m.get(i.to_string().as_str()),
            },
            Value::Seq(items) => key.as_index().and_then(|i| items.get(i)),
            _ => None,
        }
    }

    /// Walk a sequence of keys from this value.
    pub fn get_in<'a>(&self, keys: impl IntoIterator<Item = &'a Key>) -> Option<&Value> {
        keys.into_iter().try_fold(self, |current, key| current.get(key))
    }

    /// Render as `serde_json::Value`. `Absent` becomes `null` inside
    /// sequences and is dropped from mappings.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Absent | Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int(i) => serde_json::Value::Number((*i).into()),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::String(s) => serde_json::Value::String(s.to_string()),
            Value::Map(m) => serde_json::Value::Object(
                m.iter()
                    .filter(|(_, v)| !v.is_absent())
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Seq(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Absent, Value::Absent) | (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => *a as f64 == *b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => Arc::ptr_eq(a, b) || a == b,
            (Value::Seq(a), Value::Seq(b)) => Arc::ptr_eq(a, b) || a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<usize> for Value {
    fn from(i: usize) -> Self {
        i64::try_from(i)
            .map(Value::Int)
            .unwrap_or(Value::Float(i as f64))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(Arc::from(s))
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

impl<V: Into<Value>> From<Vec<V>> for Value {
    fn from(items: Vec<V>) -> Self {
        Value::seq(items)
    }
}

impl From<MapNode> for Value {
    fn from(map: MapNode) -> Self {
        Value::Map(Arc::new(map))
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::from(s),
            serde_json::Value::Array(items) => {
                Value::Seq(Arc::new(items.into_iter().map(Value::from).collect()))
            }
            serde_json::Value::Object(map) => Value::Map(Arc::new(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            )),
        }
    }
}

impl From<&Value> for serde_json::Value {
    fn from(value: &Value) -> Self {
        value.to_json()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Absent | Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Map(m) => {
                let present = m.values().filter(|v| !v.is_absent()).count();
                let mut map = serializer.serialize_map(Some(present))?;
                for (k, v) in m.iter().filter(|(_, v)| !v.is_absent()) {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
            Value::Seq(items) => serializer.collect_seq(items.iter()),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_json_keeps_order() {
        let value = Value::from(json!({"z": 1, "a": 2, "m": 3}));
        let keys: Vec<_> = value.as_map().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_same_is_identity_for_nodes() {
        let a = Value::from(json!({"x": [1, 2]}));
        let b = Value::from(json!({"x": [1, 2]}));
        assert_eq!(a, b);
        assert!(!a.same(&b));
        assert!(a.same(&a.clone()));
        assert!(Value::from("s").same(&Value::from("s")));
    }

    #[test]
    fn test_numbers_compare_across_representations() {
        assert_eq!(Value::Int(2), Value::Float(2.0));
        assert_ne!(Value::Int(2), Value::Float(2.5));
        assert_eq!(Value::Float(3.0).as_int(), Some(3));
    }

    #[test]
    fn test_absent_rendering() {
        let value = Value::map([("a", Value::Absent), ("b", Value::from(1))]);
        assert_eq!(value.to_json(), json!({"b": 1}));

        let seq = Value::seq([Value::from(1), Value::Absent]);
        assert_eq!(seq.to_json(), json!([1, null]));
        assert_eq!(serde_json::to_value(&seq).unwrap(), json!([1, null]));
    }

    #[test]
    fn test_get_in() {
        let value = Value::from(json!({"a": {"b": ["x", "y"]}}));
        let path = [Key::from("a"), Key::from("b"), Key::Index(1)];
        assert_eq!(value.get_in(path.iter()), Some(&Value::from("y")));
        assert_eq!(value.get(&Key::from("missing")), None);
    }

    #[test]
    fn test_deserialize() {
        let value: Value = serde_json::from_str(r#"{"n": 1.5, "s": "t", "l": [true, null]}"#).unwrap();
        assert_eq!(value, Value::from(json!({"n": 1.5, "s": "t", "l": [true, null]})));
    }
}
