//! Keys and key paths.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the synthetic key that sequences expose for their length.
pub const LENGTH: &str = "length";

/// Largest sequence index, `2^32 - 2`. Larger numbers are not indices.
pub const MAX_INDEX: usize = 4_294_967_294;

/// Largest sequence length, one past [`MAX_INDEX`].
pub const MAX_LENGTH: usize = MAX_INDEX + 1;

/// A key into a node: a mapping name or a sequence index.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Key {
    /// Mapping key, or a named key on a sequence (`"length"`, `"3"`).
    Name(String),
    /// Sequence index.
    Index(usize),
}

impl Key {
    /// The index this key denotes, if any. Names count as indices only in
    /// canonical decimal form, so `"3"` does but `"03"` and `"+3"` don't.
    /// Nothing above [`MAX_INDEX`] is an index.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Index(i) => Some(*i).filter(|i| *i <= MAX_INDEX),
            Key::Name(name) => parse_index(name),
        }
    }

    /// Whether this is the synthetic `length` key.
    pub fn is_length(&self) -> bool {
        matches!(self, Key::Name(name) if name == LENGTH)
    }

    /// String form used by mapping nodes.
    pub fn into_name(self) -> String {
        match self {
            Key::Name(name) => name,
            Key::Index(i) => i.to_string(),
        }
    }
}

/// Parse a canonical decimal index no larger than [`MAX_INDEX`].
pub fn parse_index(s: &str) -> Option<usize> {
    let canonical = !s.is_empty()
        && s.bytes().all(|b| b.is_ascii_digit())
        && (s.len() == 1 || !s.starts_with('0'));
    if canonical {
        s.parse().ok().filter(|i| *i <= MAX_INDEX)
    } else {
        None
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => write!(f, "{}", name),
            Key::Index(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<&String> for Key {
    fn from(name: &String) -> Self {
        Key::Name(name.clone())
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

/// A path of keys from a root node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path(Vec<Key>);

impl Path {
    /// Create an empty (root) path.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn new(keys: Vec<Key>) -> Self {
        Self(keys)
    }

    /// Parse a path from dot notation (e.g., "user.name" or "items.0.value").
    pub fn parse(path: &str) -> Self {
        if path.is_empty() {
            return Self::root();
        }
        let keys = path
            .split('.')
            .map(|segment| match parse_index(segment) {
                Some(i) => Key::Index(i),
                None => Key::Name(segment.to_string()),
            })
            .collect();
        Self(keys)
    }

    pub fn keys(&self) -> &[Key] {
        &self.0
    }

    /// Split into the final key and the keys leading to it.
    pub fn split_last(&self) -> Option<(&Key, &[Key])> {
        self.0.split_last()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: Vec<String> = self.0.iter().map(|k| k.to_string()).collect();
        write!(f, "{}", s.join("."))
    }
}

impl From<&str> for Path {
    fn from(path: &str) -> Self {
        Path::parse(path)
    }
}

impl FromIterator<Key> for Path {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
