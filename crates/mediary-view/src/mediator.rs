//! The mediator: a copy-on-write view over a frozen base.
//!
//! Every read, write, delete and enumeration goes through the same
//! per-key decision:
//! - deleted keys read as absent
//! - added keys are served from the patch
//! - anything else falls through to the base; nodes found there are
//!   wrapped into a child view on first touch and memoized as added, so
//!   repeated reads hand back the same child
//!
//! Mappings and sequences share that logic through [`Layer`]. Sequences
//! add the synthetic `length` key, which is derived from the highest
//! present index rather than stored.

use mediary_core::{
    Base, ChangeSet, ForeignKeyPolicy, Key, MapNode, MediaryConfig, MediaryError, NodeKind, Patch,
    Path, Result, SeqNode, Value, LENGTH, MAX_LENGTH,
};
use std::cell::RefCell;
use std::fmt;
use std::hash::Hash;
use std::rc::Rc;
use std::sync::Arc;
use ulid::Ulid;

/// Unique identifier of a view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(Ulid);

impl ViewId {
    fn new() -> Self {
        Self(Ulid::new())
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a read returns and a write accepts: a primitive value or a view.
///
/// Items handed out by a view never hold a raw node; nodes are always
/// wrapped. Items passed in may hold nodes, which the receiving view
/// wraps into a fresh child.
#[derive(Clone, Debug)]
pub enum Item {
    Value(Value),
    View(View),
}

impl Item {
    /// The absent item.
    pub fn absent() -> Self {
        Item::Value(Value::Absent)
    }

    /// Wrap `value`: nodes become fresh views under `config`, primitives
    /// pass through.
    pub fn wrap(value: &Value, config: &Rc<MediaryConfig>) -> Self {
        match Base::of(value) {
            Some(base) => Item::View(View::from_base(base, Rc::clone(config))),
            None => Item::Value(value.clone()),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Item::Value(Value::Absent))
    }

    pub fn is_view(&self) -> bool {
        matches!(self, Item::View(_))
    }

    pub fn as_view(&self) -> Option<&View> {
        match self {
            Item::View(view) => Some(view),
            Item::Value(_) => None,
        }
    }

    pub fn into_view(self) -> Option<View> {
        match self {
            Item::View(view) => Some(view),
            Item::Value(_) => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Item::Value(value) => Some(value),
            Item::View(_) => None,
        }
    }

    /// Identity comparison: views by instance, values by [`Value::same`].
    pub fn same(&self, other: &Item) -> bool {
        match (self, other) {
            (Item::View(a), Item::View(b)) => View::ptr_eq(a, b),
            (Item::Value(a), Item::Value(b)) => a.same(b),
            _ => false,
        }
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Item::View(a), Item::View(b)) => View::ptr_eq(a, b),
            (Item::Value(a), Item::Value(b)) => a == b,
            _ => false,
        }
    }
}

impl From<Value> for Item {
    fn from(value: Value) -> Self {
        Item::Value(value)
    }
}

impl From<&Value> for Item {
    fn from(value: &Value) -> Self {
        Item::Value(value.clone())
    }
}

impl From<View> for Item {
    fn from(view: View) -> Self {
        Item::View(view)
    }
}

impl From<&View> for Item {
    fn from(view: &View) -> Self {
        Item::View(view.clone())
    }
}

impl From<serde_json::Value> for Item {
    fn from(json: serde_json::Value) -> Self {
        Item::Value(Value::from(json))
    }
}

macro_rules! item_from_primitive {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Item {
                fn from(value: $ty) -> Self {
                    Item::Value(Value::from(value))
                }
            }
        )*
    };
}

item_from_primitive!(bool, i32, i64, u32, usize, f64, &str, String, ());

/// Read access to a frozen node, keyed the way its view keys it.
pub(crate) trait Node {
    type Key: Clone + Eq + Hash;

    fn lookup(&self, key: &Self::Key) -> Option<&Value>;

    /// Keys present in the node, in node order.
    fn node_keys(&self) -> Vec<Self::Key>;
}

impl Node for MapNode {
    type Key = String;

    fn lookup(&self, key: &String) -> Option<&Value> {
        self.get(key.as_str())
    }

    fn node_keys(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }
}

impl Node for SeqNode {
    type Key = usize;

    fn lookup(&self, key: &usize) -> Option<&Value> {
        self.get(*key)
    }

    fn node_keys(&self) -> Vec<usize> {
        (0..self.len()).collect()
    }
}

/// One overlay level: a frozen base plus its change set and patch.
pub(crate) struct Layer<N: Node> {
    pub(crate) base: Arc<N>,
    pub(crate) changes: ChangeSet<N::Key>,
    pub(crate) patch: Patch<N::Key, Item>,
}

impl<N: Node> Layer<N> {
    fn new(base: Arc<N>) -> Self {
        Self {
            base,
            changes: ChangeSet::new(),
            patch: Patch::new(),
        }
    }

    pub(crate) fn has(&self, key: &N::Key) -> bool {
        self.changes.is_added(key)
            || (!self.changes.is_deleted(key) && self.base.lookup(key).is_some())
    }

    pub(crate) fn get(&mut self, key: &N::Key, config: &Rc<MediaryConfig>) -> Item {
        if self.changes.is_deleted(key) {
            return Item::absent();
        }
        if let Some(item) = self.patch.get(key) {
            return item.clone();
        }
        let Some(value) = self.base.lookup(key) else {
            return Item::absent();
        };
        match Item::wrap(value, config) {
            Item::View(child) => {
                self.changes.add(key.clone());
                self.patch.insert(key.clone(), Item::View(child.clone()));
                Item::View(child)
            }
            primitive => primitive,
        }
    }

    /// Store an already-wrapped item.
    pub(crate) fn set(&mut self, key: N::Key, item: Item) {
        self.changes.add(key.clone());
        self.patch.insert(key, item);
    }

    pub(crate) fn delete(&mut self, key: N::Key) {
        self.patch.remove(&key);
        self.changes.delete(key);
    }

    /// Base keys that survive deletion, then keys added beyond the base.
    pub(crate) fn keys(&self) -> Vec<N::Key> {
        let mut keys: Vec<N::Key> = self
            .base
            .node_keys()
            .into_iter()
            .filter(|key| !self.changes.is_deleted(key))
            .collect();
        keys.extend(
            self.changes
                .added()
                .filter(|key| self.base.lookup(key).is_none())
                .cloned(),
        );
        keys
    }

    fn spread(&self) -> Self {
        Self {
            base: Arc::clone(&self.base),
            changes: self.changes.clone(),
            patch: self.patch.clone(),
        }
    }
}

impl Layer<SeqNode> {
    /// `1 + max(present index)`, or 0 when nothing is present. Indices
    /// never exceed `MAX_INDEX`, so the result fits in `MAX_LENGTH`.
    pub(crate) fn len(&self) -> usize {
        let base_last = (0..self.base.len())
            .rev()
            .find(|i| !self.changes.is_deleted(i));
        let added_last = self.changes.max_added().copied();
        base_last
            .max(added_last)
            .map_or(0, |last| last.saturating_add(1))
    }

    /// Read index `i`, or `None` for a hole.
    pub(crate) fn slot(&mut self, i: usize, config: &Rc<MediaryConfig>) -> Option<Item> {
        if self.has(&i) {
            Some(self.get(&i, config))
        } else {
            None
        }
    }

    /// Write index `i`; `None` leaves a hole.
    pub(crate) fn put(&mut self, i: usize, slot: Option<Item>) {
        match slot {
            Some(item) => self.set(i, item),
            None => self.delete(i),
        }
    }

    pub(crate) fn set_len(&mut self, len: usize) {
        let old = self.len();
        for i in len..old {
            self.delete(i);
        }
        for i in old..len {
            self.set(i, Item::absent());
        }
    }
}

pub(crate) enum Overlay {
    Map(Layer<MapNode>),
    Seq(Layer<SeqNode>),
}

pub(crate) struct Mediator {
    pub(crate) id: ViewId,
    pub(crate) config: Rc<MediaryConfig>,
    pub(crate) overlay: Overlay,
}

/// How a sequence interprets a key.
enum SeqKey {
    Index(usize),
    Length,
    Foreign(String),
}

/// Out-of-range indices are plain names, as any other non-index key.
impl From<Key> for SeqKey {
    fn from(key: Key) -> Self {
        match key.as_index() {
            Some(i) => SeqKey::Index(i),
            None if key.is_length() => SeqKey::Length,
            None => SeqKey::Foreign(key.into_name()),
        }
    }
}

fn length_of(item: &Item) -> Result<usize> {
    let value = match item {
        Item::Value(value) => value,
        Item::View(view) => return Err(MediaryError::InvalidLength(view.kind().to_string())),
    };
    value
        .as_int()
        .and_then(|n| usize::try_from(n).ok())
        .filter(|len| *len <= MAX_LENGTH)
        .ok_or_else(|| MediaryError::InvalidLength(value.to_string()))
}

/// `len + by`, or [`MediaryError::InvalidLength`] past `MAX_LENGTH`.
pub(crate) fn grow(len: usize, by: usize) -> Result<usize> {
    len.checked_add(by)
        .filter(|next| *next <= MAX_LENGTH)
        .ok_or_else(|| MediaryError::InvalidLength(format!("{} + {}", len, by)))
}

impl Mediator {
    fn kind(&self) -> NodeKind {
        match self.overlay {
            Overlay::Map(_) => NodeKind::Map,
            Overlay::Seq(_) => NodeKind::Seq,
        }
    }

    fn foreign_key(&self, name: String) -> Result<()> {
        match self.config.foreign_sequence_keys {
            ForeignKeyPolicy::Reject => Err(MediaryError::InvalidKey {
                key: name,
                node: NodeKind::Seq,
            }),
            ForeignKeyPolicy::Ignore => Ok(()),
        }
    }

    fn get(&mut self, key: Key) -> Item {
        trace_op!(self, "get", key);
        let config = Rc::clone(&self.config);
        match &mut self.overlay {
            Overlay::Map(layer) => layer.get(&key.into_name(), &config),
            Overlay::Seq(layer) => match SeqKey::from(key) {
                SeqKey::Index(i) => layer.get(&i, &config),
                SeqKey::Length => Item::from(layer.len()),
                SeqKey::Foreign(_) => Item::absent(),
            },
        }
    }

    fn set(&mut self, key: Key, item: Item) -> Result<()> {
        trace_op!(self, "set", key);
        match &mut self.overlay {
            Overlay::Map(layer) => layer.set(key.into_name(), item),
            Overlay::Seq(layer) => match SeqKey::from(key) {
                SeqKey::Index(i) => layer.set(i, item),
                SeqKey::Length => layer.set_len(length_of(&item)?),
                SeqKey::Foreign(name) => return self.foreign_key(name),
            },
        }
        Ok(())
    }

    fn delete(&mut self, key: Key) -> Result<()> {
        trace_op!(self, "delete", key);
        match &mut self.overlay {
            Overlay::Map(layer) => layer.delete(key.into_name()),
            Overlay::Seq(layer) => match SeqKey::from(key) {
                SeqKey::Index(i) => layer.delete(i),
                SeqKey::Length => {
                    return Err(MediaryError::InvalidKey {
                        key: LENGTH.to_string(),
                        node: NodeKind::Seq,
                    })
                }
                SeqKey::Foreign(name) => return self.foreign_key(name),
            },
        }
        Ok(())
    }

    fn has(&self, key: Key) -> bool {
        match &self.overlay {
            Overlay::Map(layer) => layer.has(&key.into_name()),
            Overlay::Seq(layer) => match SeqKey::from(key) {
                SeqKey::Index(i) => layer.has(&i),
                SeqKey::Length => true,
                SeqKey::Foreign(_) => false,
            },
        }
    }
}

/// A copy-on-write view over a frozen base.
///
/// `View` is a shared handle: cloning it yields the same mediator, and
/// [`View::ptr_eq`] is the identity test. A view is meant for one
/// sequential writer and is not `Send`.
#[derive(Clone)]
pub struct View(pub(crate) Rc<RefCell<Mediator>>);

impl View {
    /// Wrap `base` with the default configuration.
    pub fn new(base: Base) -> Self {
        Self::from_base(base, Rc::new(MediaryConfig::default()))
    }

    pub fn with_config(base: Base, config: MediaryConfig) -> Self {
        Self::from_base(base, Rc::new(config))
    }

    /// Wrap `base` with a shared configuration.
    pub fn from_base(base: Base, config: Rc<MediaryConfig>) -> Self {
        let overlay = match base {
            Base::Map(node) => Overlay::Map(Layer::new(node)),
            Base::Seq(node) => Overlay::Seq(Layer::new(node)),
        };
        let mediator = Mediator {
            id: ViewId::new(),
            config,
            overlay,
        };
        trace_op!(mediator, "wrap", mediator.kind());
        View(Rc::new(RefCell::new(mediator)))
    }

    pub fn id(&self) -> ViewId {
        self.0.borrow().id
    }

    pub fn kind(&self) -> NodeKind {
        self.0.borrow().kind()
    }

    pub fn is_sequence(&self) -> bool {
        self.kind() == NodeKind::Seq
    }

    pub fn config(&self) -> Rc<MediaryConfig> {
        Rc::clone(&self.0.borrow().config)
    }

    /// Whether both handles refer to the same mediator.
    pub fn ptr_eq(a: &View, b: &View) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Read `key`. Missing and deleted keys read as absent.
    pub fn get(&self, key: impl Into<Key>) -> Item {
        self.0.borrow_mut().get(key.into())
    }

    /// Write `key`. Nodes are wrapped into a fresh child view; views are
    /// stored as given.
    pub fn set(&self, key: impl Into<Key>, value: impl Into<Item>) -> Result<()> {
        let item = self.adopt(value.into())?;
        self.0.borrow_mut().set(key.into(), item)
    }

    pub fn delete(&self, key: impl Into<Key>) -> Result<()> {
        self.0.borrow_mut().delete(key.into())
    }

    pub fn has(&self, key: impl Into<Key>) -> bool {
        self.0.borrow().has(key.into())
    }

    /// Present keys. Mappings list surviving base keys in base order and
    /// then added keys in add order; sequences list indices ascending
    /// followed by `length`.
    pub fn keys(&self) -> Vec<Key> {
        match &self.0.borrow().overlay {
            Overlay::Map(layer) => layer.keys().into_iter().map(Key::Name).collect(),
            Overlay::Seq(layer) => {
                let mut indices = layer.keys();
                indices.sort_unstable();
                indices
                    .into_iter()
                    .map(Key::Index)
                    .chain(std::iter::once(Key::from(LENGTH)))
                    .collect()
            }
        }
    }

    /// Derived length for sequences, key count for mappings.
    pub fn len(&self) -> usize {
        match &self.0.borrow().overlay {
            Overlay::Map(layer) => layer.keys().len(),
            Overlay::Seq(layer) => layer.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read along `path`. Traversing a primitive reads as absent.
    pub fn get_in(&self, path: &Path) -> Item {
        let mut current = Item::View(self.clone());
        for key in path.keys() {
            current = match current {
                Item::View(view) => view.get(key.clone()),
                Item::Value(_) => return Item::absent(),
            };
        }
        current
    }

    pub fn set_in(&self, path: &Path, value: impl Into<Item>) -> Result<()> {
        let (parent, key) = self.parent_of(path)?;
        parent.set(key, value)
    }

    pub fn delete_in(&self, path: &Path) -> Result<()> {
        let (parent, key) = self.parent_of(path)?;
        parent.delete(key)
    }

    fn parent_of(&self, path: &Path) -> Result<(View, Key)> {
        let (last, parents) = path
            .split_last()
            .ok_or_else(|| MediaryError::PathNotFound("cannot address the root".to_string()))?;
        let mut current = self.clone();
        for (depth, key) in parents.iter().enumerate() {
            current = current.get(key.clone()).into_view().ok_or_else(|| {
                MediaryError::PathNotFound(Path::new(parents[..=depth].to_vec()).to_string())
            })?;
        }
        Ok((current, last.clone()))
    }

    /// A new view over the same base carrying a copy of this view's
    /// changes. Memoized children are shared, so subtrees that were only
    /// read keep their identity.
    pub fn spread(&self) -> View {
        let inner = self.0.borrow();
        let overlay = match &inner.overlay {
            Overlay::Map(layer) => Overlay::Map(layer.spread()),
            Overlay::Seq(layer) => Overlay::Seq(layer.spread()),
        };
        let mediator = Mediator {
            id: ViewId::new(),
            config: Rc::clone(&inner.config),
            overlay,
        };
        trace_op!(mediator, "spread", inner.id);
        View(Rc::new(RefCell::new(mediator)))
    }

    /// [`View::spread`] followed by a write per entry.
    pub fn merge<K, V>(&self, entries: impl IntoIterator<Item = (K, V)>) -> Result<View>
    where
        K: Into<Key>,
        V: Into<Item>,
    {
        let merged = self.spread();
        for (key, value) in entries {
            merged.set(key, value)?;
        }
        Ok(merged)
    }

    /// The frozen base, sharing its allocation.
    pub fn base(&self) -> Value {
        match &self.0.borrow().overlay {
            Overlay::Map(layer) => Value::Map(Arc::clone(&layer.base)),
            Overlay::Seq(layer) => Value::Seq(Arc::clone(&layer.base)),
        }
    }

    /// Added keys, in add order.
    pub fn added(&self) -> Vec<Key> {
        match &self.0.borrow().overlay {
            Overlay::Map(layer) => layer.changes.added().cloned().map(Key::Name).collect(),
            Overlay::Seq(layer) => layer.changes.added().copied().map(Key::Index).collect(),
        }
    }

    /// Deleted keys, in delete order.
    pub fn deleted(&self) -> Vec<Key> {
        match &self.0.borrow().overlay {
            Overlay::Map(layer) => layer.changes.deleted().cloned().map(Key::Name).collect(),
            Overlay::Seq(layer) => layer.changes.deleted().copied().map(Key::Index).collect(),
        }
    }

    /// Patch entries, in add order.
    pub fn patch(&self) -> Vec<(Key, Item)> {
        fn entries<N: Node>(layer: &Layer<N>, key: impl Fn(&N::Key) -> Key) -> Vec<(Key, Item)> {
            layer
                .changes
                .added()
                .filter_map(|k| layer.patch.get(k).map(|item| (key(k), item.clone())))
                .collect()
        }
        match &self.0.borrow().overlay {
            Overlay::Map(layer) => entries(layer, |k| Key::Name(k.clone())),
            Overlay::Seq(layer) => entries(layer, |k| Key::Index(*k)),
        }
    }

    /// Check the change set invariant (`added ∩ deleted = ∅`) on this
    /// view and every materialized child.
    pub fn is_consistent(&self) -> bool {
        let inner = self.0.borrow();
        let (disjoint, children): (bool, Vec<View>) = match &inner.overlay {
            Overlay::Map(layer) => (layer.changes.is_disjoint(), child_views(layer)),
            Overlay::Seq(layer) => (layer.changes.is_disjoint(), child_views(layer)),
        };
        drop(inner);
        disjoint && children.iter().all(View::is_consistent)
    }

    pub fn to_json(&self) -> serde_json::Value {
        self.realize().to_json()
    }

    /// Wrap an incoming item for storage in this view.
    pub(crate) fn adopt(&self, item: Item) -> Result<Item> {
        match item {
            Item::View(view) => {
                if view.contains(self) {
                    return Err(MediaryError::Cycle);
                }
                Ok(Item::View(view))
            }
            Item::Value(value) => Ok(Item::wrap(&value, &self.config())),
        }
    }

    /// Whether `target` is this view or is reachable through its patch.
    fn contains(&self, target: &View) -> bool {
        if View::ptr_eq(self, target) {
            return true;
        }
        let children = match &self.0.borrow().overlay {
            Overlay::Map(layer) => child_views(layer),
            Overlay::Seq(layer) => child_views(layer),
        };
        children.iter().any(|child| child.contains(target))
    }

    /// Run `f` against the sequence layer, or fail on a mapping.
    pub(crate) fn with_seq<R>(
        &self,
        op: &'static str,
        f: impl FnOnce(&mut Layer<SeqNode>, &Rc<MediaryConfig>) -> R,
    ) -> Result<R> {
        let mut inner = self.0.borrow_mut();
        trace_op!(inner, op, NodeKind::Seq);
        let Mediator {
            config, overlay, ..
        } = &mut *inner;
        match overlay {
            Overlay::Seq(layer) => Ok(f(layer, config)),
            Overlay::Map(_) => Err(MediaryError::type_constraint("sequence", NodeKind::Map)),
        }
    }
}

fn child_views<N: Node>(layer: &Layer<N>) -> Vec<View> {
    layer
        .patch
        .values()
        .filter_map(|item| item.as_view().cloned())
        .collect()
}

impl PartialEq for View {
    fn eq(&self, other: &Self) -> bool {
        View::ptr_eq(self, other)
    }
}

impl Eq for View {}

impl fmt::Debug for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(inner) => f
                .debug_struct("View")
                .field("id", &inner.id)
                .field("kind", &inner.kind())
                .finish(),
            Err(_) => f.debug_struct("View").finish_non_exhaustive(),
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediary_core::MAX_INDEX;
    use serde_json::json;

    fn view(json: serde_json::Value) -> View {
        let value = Value::from(json);
        View::new(Base::of(&value).unwrap())
    }

    #[test]
    fn test_basic_get_set() {
        let v = view(json!({"a": "b"}));
        v.set("a", "c").unwrap();
        v.set("b", "d").unwrap();
        assert_eq!(v.get("a"), Item::from("c"));
        assert_eq!(v.get("b"), Item::from("d"));
        assert_eq!(v.added(), vec![Key::from("a"), Key::from("b")]);
        assert_eq!(v.base().to_json(), json!({"a": "b"}));
    }

    #[test]
    fn test_child_identity_is_stable() {
        let v = view(json!({"a": {"b": 1}}));
        let first = v.get("a").into_view().unwrap();
        let second = v.get("a").into_view().unwrap();
        assert!(View::ptr_eq(&first, &second));
        assert_eq!(v.added(), vec![Key::from("a")]);
    }

    #[test]
    fn test_primitive_reads_are_not_recorded() {
        let v = view(json!({"a": 1}));
        assert_eq!(v.get("a"), Item::from(1));
        assert!(v.added().is_empty());
        assert!(v.patch().is_empty());
    }

    #[test]
    fn test_missing_reads_absent() {
        let v = view(json!({"a": 1}));
        assert!(v.get("zzz").is_absent());
        assert!(!v.has("zzz"));
    }

    #[test]
    fn test_delete_then_readd() {
        let v = view(json!({"a": "a", "b": "b"}));
        v.delete("b").unwrap();
        assert!(!v.has("b"));
        assert!(v.get("b").is_absent());
        assert_eq!(v.deleted(), vec![Key::from("b")]);

        v.set("b", "again").unwrap();
        assert!(v.has("b"));
        assert!(v.deleted().is_empty());
        assert_eq!(v.keys(), vec![Key::from("a"), Key::from("b")]);
    }

    #[test]
    fn test_map_key_order() {
        let v = view(json!({"x": 1, "y": 2, "z": 3}));
        v.set("new", 4).unwrap();
        v.delete("y").unwrap();
        v.set("x", 10).unwrap();
        assert_eq!(
            v.keys(),
            vec![Key::from("x"), Key::from("z"), Key::from("new")]
        );
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn test_map_index_keys_are_names() {
        let v = view(json!({"0": "zero"}));
        assert_eq!(v.get(0usize), Item::from("zero"));
        v.set(1usize, "one").unwrap();
        assert_eq!(v.get("1"), Item::from("one"));
    }

    #[test]
    fn test_sequence_keys_and_length() {
        let v = view(json!(["a", "b"]));
        v.set(4usize, "e").unwrap();
        assert_eq!(v.len(), 5);
        assert_eq!(v.get(LENGTH), Item::from(5usize));
        assert_eq!(
            v.keys(),
            vec![Key::Index(0), Key::Index(1), Key::Index(4), Key::from(LENGTH)]
        );
        assert!(!v.has(2usize));
        assert!(v.has(LENGTH));
    }

    #[test]
    fn test_sequence_accepts_numeric_names() {
        let v = view(json!(["a"]));
        assert_eq!(v.get("0"), Item::from("a"));
        v.set("1", "b").unwrap();
        assert_eq!(v.len(), 2);
    }

    #[test]
    fn test_length_write() {
        let v = view(json!([1, 2, 3]));
        v.set(LENGTH, 1).unwrap();
        assert_eq!(v.len(), 1);
        assert!(!v.has(1usize));

        v.set(LENGTH, 3).unwrap();
        assert_eq!(v.len(), 3);
        assert!(v.has(2usize));
        assert!(v.get(2usize).is_absent());

        let err = v.set(LENGTH, -1).unwrap_err();
        assert!(matches!(err, MediaryError::InvalidLength(_)));
        let err = v.set(LENGTH, 1.5).unwrap_err();
        assert!(matches!(err, MediaryError::InvalidLength(_)));
    }

    #[test]
    fn test_out_of_range_indices_rejected() {
        let v = view(json!([]));
        let err = v.set(usize::MAX, 1).unwrap_err();
        assert_eq!(
            err,
            MediaryError::InvalidKey {
                key: usize::MAX.to_string(),
                node: NodeKind::Seq,
            }
        );
        assert!(v.set("18446744073709551615", 1).is_err());
        assert!(v.set(MAX_LENGTH, 1).is_err());
        assert!(v.delete(usize::MAX).is_err());
        assert!(v.get(usize::MAX).is_absent());
        assert!(!v.has(usize::MAX));
        assert_eq!(v.len(), 0);

        assert_eq!(v.push(2).unwrap(), 1);
        assert_eq!(v.to_json(), json!([2]));
    }

    #[test]
    fn test_highest_index_and_length() {
        let v = view(json!([]));
        v.set(MAX_INDEX, "last").unwrap();
        assert_eq!(v.len(), MAX_LENGTH);
        assert_eq!(v.get(LENGTH), Item::from(MAX_LENGTH));

        let err = v.push(1).unwrap_err();
        assert!(matches!(err, MediaryError::InvalidLength(_)));
        assert!(v.unshift(1).is_err());
        assert_eq!(v.len(), MAX_LENGTH);

        v.delete(MAX_INDEX).unwrap();
        assert_eq!(v.len(), 0);
    }

    #[test]
    fn test_length_write_is_bounded() {
        let v = view(json!([1]));
        let err = v.set(LENGTH, 1e15).unwrap_err();
        assert!(matches!(err, MediaryError::InvalidLength(_)));
        assert!(v.set(LENGTH, 4_294_967_296i64).is_err());
        assert!(v.set_length(MAX_LENGTH + 1).is_err());
        assert_eq!(v.to_json(), json!([1]));
    }

    #[test]
    fn test_grow() {
        assert_eq!(grow(3, 2).unwrap(), 5);
        assert_eq!(grow(MAX_LENGTH - 1, 1).unwrap(), MAX_LENGTH);
        assert!(grow(MAX_LENGTH, 1).is_err());
        assert!(grow(usize::MAX, 1).is_err());
    }

    #[test]
    fn test_length_cannot_be_deleted() {
        let v = view(json!([1]));
        let err = v.delete(LENGTH).unwrap_err();
        assert!(matches!(err, MediaryError::InvalidKey { .. }));
    }

    #[test]
    fn test_foreign_sequence_keys() {
        let v = view(json!([1]));
        let err = v.set("name", "x").unwrap_err();
        assert!(matches!(err, MediaryError::InvalidKey { .. }));
        assert!(v.get("name").is_absent());

        let value = Value::from(json!([1]));
        let lenient = View::with_config(
            Base::of(&value).unwrap(),
            MediaryConfig::default().with_foreign_sequence_keys(ForeignKeyPolicy::Ignore),
        );
        lenient.set("name", "x").unwrap();
        lenient.delete("name").unwrap();
        assert!(!lenient.has("name"));
        assert_eq!(lenient.len(), 1);
    }

    #[test]
    fn test_children_inherit_config() {
        let value = Value::from(json!({"list": [1]}));
        let config = MediaryConfig::default().with_foreign_sequence_keys(ForeignKeyPolicy::Ignore);
        let v = View::with_config(Base::of(&value).unwrap(), config.clone());
        let list = v.get("list").into_view().unwrap();
        assert_eq!(*list.config(), config);
        list.set("name", "x").unwrap();
    }

    #[test]
    fn test_set_node_wraps_fresh_view() {
        let v = view(json!({}));
        let node = Value::from(json!({"k": "v"}));
        v.set("child", node.clone()).unwrap();
        let child = v.get("child").into_view().unwrap();
        child.set("k", "changed").unwrap();
        assert_eq!(node.to_json(), json!({"k": "v"}));
        assert_eq!(v.to_json(), json!({"child": {"k": "changed"}}));
    }

    #[test]
    fn test_primitive_over_node_replaces() {
        let v = view(json!({"a": {"deep": true}}));
        let _ = v.get("a");
        v.set("a", 5).unwrap();
        assert_eq!(v.get("a"), Item::from(5));
        assert_eq!(v.to_json(), json!({"a": 5}));
    }

    #[test]
    fn test_cycle_rejected() {
        let v = view(json!({"a": {"b": {}}}));
        let a = v.get("a").into_view().unwrap();
        let b = a.get("b").into_view().unwrap();
        assert_eq!(v.set("self", v.clone()).unwrap_err(), MediaryError::Cycle);
        assert_eq!(b.set("up", v.clone()).unwrap_err(), MediaryError::Cycle);
        b.set("sibling", a.spread()).unwrap_err();
    }

    #[test]
    fn test_path_access() {
        let v = view(json!({"user": {"tags": ["a", "b"]}}));
        assert_eq!(v.get_in(&Path::parse("user.tags.1")), Item::from("b"));
        v.set_in(&Path::parse("user.tags.2"), "c").unwrap();
        v.delete_in(&Path::parse("user.tags.0")).unwrap();
        assert_eq!(v.to_json(), json!({"user": {"tags": [null, "b", "c"]}}));

        let err = v.set_in(&Path::parse("user.tags.1.x"), 1).unwrap_err();
        assert_eq!(err, MediaryError::PathNotFound("user.tags.1".to_string()));
        assert!(v.get_in(&Path::parse("user.missing.deeper")).is_absent());
        assert!(v.set_in(&Path::root(), 1).is_err());
    }

    #[test]
    fn test_spread_keeps_children() {
        let v = view(json!({"a": {"x": 1}, "b": {"y": 2}}));
        let a = v.get("a").into_view().unwrap();
        let copy = v.merge([("c", 3)]).unwrap();
        assert!(View::ptr_eq(&copy.get("a").into_view().unwrap(), &a));
        assert!(!View::ptr_eq(&copy, &v));
        assert!(!v.has("c"));
        assert_eq!(copy.to_json(), json!({"a": {"x": 1}, "b": {"y": 2}, "c": 3}));
    }

    #[test]
    fn test_consistency_check() {
        let v = view(json!({"a": {"b": [1, 2]}}));
        let b = v.get_in(&Path::parse("a.b")).into_view().unwrap();
        b.delete(0usize).unwrap();
        b.set(0usize, 9).unwrap();
        v.delete("a").unwrap();
        v.set("a", 1).unwrap();
        assert!(v.is_consistent());
        assert!(b.is_consistent());
    }
}
