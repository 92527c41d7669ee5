//! Change tracking for one overlay level.
//!
//! A [`ChangeSet`] records which keys of a node were added (written, or
//! read and wrapped) and which were deleted. The two sets are always
//! disjoint: adding a key removes it from the deleted set and deleting it
//! removes it from the added set.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::hash::Hash;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Serialize + Hash + Eq",
    deserialize = "K: Deserialize<'de> + Hash + Eq"
))]
pub struct ChangeSet<K> {
    /// Added keys, in the order they were first added.
    added: IndexSet<K>,
    deleted: IndexSet<K>,
}

impl<K: Hash + Eq> ChangeSet<K> {
    pub fn new() -> Self {
        Self {
            added: IndexSet::new(),
            deleted: IndexSet::new(),
        }
    }

    /// Mark `key` as added. Returns `false` if it already was.
    pub fn add(&mut self, key: K) -> bool {
        self.deleted.shift_remove(&key);
        self.added.insert(key)
    }

    /// Mark `key` as deleted. Returns `false` if it already was.
    pub fn delete(&mut self, key: K) -> bool {
        self.added.shift_remove(&key);
        self.deleted.insert(key)
    }

    pub fn is_added(&self, key: &K) -> bool {
        self.added.contains(key)
    }

    pub fn is_deleted(&self, key: &K) -> bool {
        self.deleted.contains(key)
    }

    pub fn added(&self) -> impl Iterator<Item = &K> + '_ {
        self.added.iter()
    }

    pub fn deleted(&self) -> impl Iterator<Item = &K> + '_ {
        self.deleted.iter()
    }

    pub fn added_len(&self) -> usize {
        self.added.len()
    }

    pub fn deleted_len(&self) -> usize {
        self.deleted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty()
    }

    /// `added ∩ deleted = ∅`. Always true; exposed for tests.
    pub fn is_disjoint(&self) -> bool {
        self.added.is_disjoint(&self.deleted)
    }
}

impl<K: Hash + Eq + Ord> ChangeSet<K> {
    /// Largest added key.
    pub fn max_added(&self) -> Option<&K> {
        self.added.iter().max()
    }
}

impl<K: Hash + Eq> Default for ChangeSet<K> {
    fn default() -> Self {
        Self::new()
    }
}
