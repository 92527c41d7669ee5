//! Realization: turning a view back into a plain value.
//!
//! Only added keys are realized recursively. Every other key takes its
//! base entry by reference, and a node whose realized contents match its
//! base entry for entry is returned as the base itself, so untouched
//! subtrees come out pointer-equal to their inputs.

use crate::mediator::{Item, Layer, Node, Overlay, View};
use mediary_core::{MapNode, SeqNode, Value};
use std::sync::Arc;

/// Realize `item`. Plain values are returned unchanged.
pub fn realize(item: &Item) -> Value {
    item.realize()
}

impl Item {
    pub fn realize(&self) -> Value {
        match self {
            Item::Value(value) => value.clone(),
            Item::View(view) => view.realize(),
        }
    }
}

impl View {
    /// Produce a fresh value tree reflecting every change, sharing
    /// untouched subtrees with the base.
    pub fn realize(&self) -> Value {
        match &self.0.borrow().overlay {
            Overlay::Map(layer) => realize_map(layer),
            Overlay::Seq(layer) => realize_seq(layer),
        }
    }
}

fn realized<N: Node>(layer: &Layer<N>, key: &N::Key) -> Value {
    layer
        .patch
        .get(key)
        .map_or(Value::Absent, Item::realize)
}

fn realize_map(layer: &Layer<MapNode>) -> Value {
    let keys = layer.keys();
    let mut out = MapNode::with_capacity(keys.len());
    for key in keys {
        let value = if layer.changes.is_added(&key) {
            realized(layer, &key)
        } else {
            layer.base.get(&key).cloned().unwrap_or_default()
        };
        out.insert(key, value);
    }

    let unchanged = out.len() == layer.base.len()
        && out
            .iter()
            .all(|(key, value)| layer.base.get(key).is_some_and(|base| base.same(value)));
    if unchanged {
        return Value::Map(Arc::clone(&layer.base));
    }
    Value::Map(Arc::new(out))
}

fn realize_seq(layer: &Layer<SeqNode>) -> Value {
    let len = layer.len();
    let out: SeqNode = (0..len)
        .map(|i| {
            if layer.changes.is_added(&i) {
                realized(layer, &i)
            } else if layer.changes.is_deleted(&i) {
                Value::Absent
            } else {
                layer.base.get(i).cloned().unwrap_or_default()
            }
        })
        .collect();

    let unchanged = out.len() == layer.base.len()
        && out
            .iter()
            .zip(layer.base.iter())
            .all(|(value, base)| base.same(value));
    if unchanged {
        return Value::Seq(Arc::clone(&layer.base));
    }
    Value::Seq(Arc::new(out))
}
