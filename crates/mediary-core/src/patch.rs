//! Patch storage: replacement values for added keys, one level deep.
//!
//! A patch never flattens nested structure. Whatever the caller stores
//! (in a view, a child view) is kept as-is and handed back by reference.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Clone, Debug)]
pub struct Patch<K, V> {
    entries: HashMap<K, V>,
}

impl<K: Hash + Eq, V> Patch<K, V> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Store `value` for `key`, returning the replaced entry.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.entries.insert(key, value)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.entries.values()
    }
}

impl<K: Hash + Eq, V> Default for Patch<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V: PartialEq> PartialEq for Patch<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replace_remove() {
        let mut patch = Patch::new();
        assert_eq!(patch.insert("a", 1), None);
        assert_eq!(patch.insert("a", 2), Some(1));
        assert_eq!(patch.get(&"a"), Some(&2));
        assert_eq!(patch.remove(&"a"), Some(2));
        assert_eq!(patch.get(&"a"), None);
        assert_eq!(patch, Patch::default());
    }
}
