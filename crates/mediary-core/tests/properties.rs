//! Property-based tests for the data layer.
//!
//! These tests verify:
//!  - Change sets keep added and deleted disjoint under any operation order
//!  - The last operation on a key decides its membership
//!  - JSON conversion preserves value trees
//!  - Dotted paths survive a parse/format cycle

use mediary_core::{ChangeSet, Key, Path, Value};
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Clone, Debug)]
enum Op {
    Add(u8),
    Delete(u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u8..16).prop_map(Op::Add),
        (0u8..16).prop_map(Op::Delete),
    ]
}

fn json_strategy() -> impl Strategy<Value = serde_json::Value> {
    let leaf = prop_oneof![
        Just(serde_json::Value::Null),
        any::<bool>().prop_map(serde_json::Value::Bool),
        any::<i64>().prop_map(|i| serde_json::Value::Number(i.into())),
        "[a-z]{0,6}".prop_map(serde_json::Value::String),
    ];
    leaf.prop_recursive(4, 32, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(serde_json::Value::Array),
            prop::collection::vec(("[a-z]{1,4}", inner), 0..6).prop_map(|entries| {
                serde_json::Value::Object(entries.into_iter().collect())
            }),
        ]
    })
}

// ============================================================================
// ChangeSet Property Tests
// ============================================================================

proptest! {
    #[test]
    fn changeset_stays_disjoint(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let mut changes = ChangeSet::new();
        for op in ops {
            match op {
                Op::Add(k) => { changes.add(k); }
                Op::Delete(k) => { changes.delete(k); }
            }
            prop_assert!(changes.is_disjoint());
        }
    }

    #[test]
    fn changeset_last_operation_wins(ops in prop::collection::vec(op_strategy(), 0..64)) {
        let mut changes = ChangeSet::new();
        let mut last: HashMap<u8, bool> = HashMap::new();
        for op in ops {
            match op {
                Op::Add(k) => { changes.add(k); last.insert(k, true); }
                Op::Delete(k) => { changes.delete(k); last.insert(k, false); }
            }
        }
        for (k, added) in last {
            prop_assert_eq!(changes.is_added(&k), added);
            prop_assert_eq!(changes.is_deleted(&k), !added);
        }
    }
}

// ============================================================================
// Value Property Tests
// ============================================================================

proptest! {
    #[test]
    fn json_conversion_preserves_trees(json in json_strategy()) {
        let value = Value::from(json.clone());
        prop_assert_eq!(value.to_json(), json);
    }

    #[test]
    fn cloned_values_share_nodes(json in json_strategy()) {
        let value = Value::from(json);
        let copy = value.clone();
        prop_assert!(value.same(&copy));
        prop_assert_eq!(value, copy);
    }

    #[test]
    fn path_display_roundtrip(segments in prop::collection::vec("[a-z]{1,5}|[1-9][0-9]{0,2}", 0..6)) {
        let text = segments.join(".");
        let path = Path::parse(&text);
        prop_assert_eq!(path.to_string(), text);
        for (key, segment) in path.keys().iter().zip(&segments) {
            let numeric = segment.bytes().all(|b| b.is_ascii_digit());
            prop_assert_eq!(matches!(key, Key::Index(_)), numeric);
        }
    }
}
