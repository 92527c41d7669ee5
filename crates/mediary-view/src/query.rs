//! Read-only sequence queries.
//!
//! Queries read through [`View::get`], so node elements come back as the
//! same child views a direct read would return.

use crate::mediator::{Item, View};
use crate::sequence::relative;
use mediary_core::{MediaryError, NodeKind, Result, Value};
use std::cmp::Ordering;

/// Default element ordering: compare string forms.
pub(crate) fn compare_default(a: &Item, b: &Item) -> Ordering {
    display(a).cmp(&display(b))
}

fn display_float(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        // `Display` for f64 prints integral values without a fraction.
        f.to_string()
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Absent => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => display_float(*f),
        Value::String(s) => s.to_string(),
        Value::Map(_) => "[object Object]".to_string(),
        Value::Seq(items) => items
            .iter()
            .map(join_part)
            .collect::<Vec<_>>()
            .join(","),
    }
}

fn join_part(value: &Value) -> String {
    match value {
        Value::Absent | Value::Null => String::new(),
        other => display_value(other),
    }
}

/// String form of an element, as used by `sort` and `join`.
fn display(item: &Item) -> String {
    match item {
        Item::Value(value) => display_value(value),
        Item::View(view) => match view.kind() {
            NodeKind::Map => "[object Object]".to_string(),
            NodeKind::Seq => view.join(",").unwrap_or_default(),
        },
    }
}

impl View {
    fn seq_len(&self) -> Result<usize> {
        match self.kind() {
            NodeKind::Seq => Ok(self.len()),
            NodeKind::Map => Err(MediaryError::type_constraint("sequence", NodeKind::Map)),
        }
    }

    /// Present indices with their elements, skipping holes.
    fn present(&self) -> Result<Vec<(usize, Item)>> {
        let len = self.seq_len()?;
        Ok((0..len)
            .filter(|&i| self.has(i))
            .map(|i| (i, self.get(i)))
            .collect())
    }

    /// Every element in index order; holes read as absent.
    pub fn values(&self) -> Result<Vec<Item>> {
        let len = self.seq_len()?;
        Ok((0..len).map(|i| self.get(i)).collect())
    }

    pub fn entries(&self) -> Result<Vec<(usize, Item)>> {
        let len = self.seq_len()?;
        Ok((0..len).map(|i| (i, self.get(i))).collect())
    }

    /// `0..len`, holes included.
    pub fn indices(&self) -> Result<Vec<usize>> {
        Ok((0..self.seq_len()?).collect())
    }

    pub fn slice(&self, start: isize, end: Option<isize>) -> Result<Vec<Item>> {
        let len = self.seq_len()?;
        let from = relative(start, len);
        let to = end.map_or(len, |end| relative(end, len));
        Ok((from..to.max(from)).map(|i| self.get(i)).collect())
    }

    pub fn includes(&self, needle: impl Into<Item>) -> Result<bool> {
        Ok(self.index_of(needle)?.is_some())
    }

    /// First index whose element is [`Item::same`] as `needle`.
    pub fn index_of(&self, needle: impl Into<Item>) -> Result<Option<usize>> {
        let needle = needle.into();
        Ok(self
            .present()?
            .into_iter()
            .find(|(_, item)| item.same(&needle))
            .map(|(i, _)| i))
    }

    pub fn last_index_of(&self, needle: impl Into<Item>) -> Result<Option<usize>> {
        let needle = needle.into();
        Ok(self
            .present()?
            .into_iter()
            .rev()
            .find(|(_, item)| item.same(&needle))
            .map(|(i, _)| i))
    }

    pub fn find<F>(&self, mut predicate: F) -> Result<Option<Item>>
    where
        F: FnMut(&Item, usize) -> bool,
    {
        Ok(self
            .entries()?
            .into_iter()
            .find(|(i, item)| predicate(item, *i))
            .map(|(_, item)| item))
    }

    pub fn find_index<F>(&self, mut predicate: F) -> Result<Option<usize>>
    where
        F: FnMut(&Item, usize) -> bool,
    {
        Ok(self
            .entries()?
            .into_iter()
            .find(|(i, item)| predicate(item, *i))
            .map(|(i, _)| i))
    }

    /// True when `predicate` holds for every present element.
    pub fn every<F>(&self, mut predicate: F) -> Result<bool>
    where
        F: FnMut(&Item, usize) -> bool,
    {
        Ok(self.present()?.iter().all(|(i, item)| predicate(item, *i)))
    }

    pub fn some<F>(&self, mut predicate: F) -> Result<bool>
    where
        F: FnMut(&Item, usize) -> bool,
    {
        Ok(self.present()?.iter().any(|(i, item)| predicate(item, *i)))
    }

    pub fn filter<F>(&self, mut predicate: F) -> Result<Vec<Item>>
    where
        F: FnMut(&Item, usize) -> bool,
    {
        Ok(self
            .present()?
            .into_iter()
            .filter(|(i, item)| predicate(item, *i))
            .map(|(_, item)| item)
            .collect())
    }

    pub fn map<T, F>(&self, mut f: F) -> Result<Vec<T>>
    where
        F: FnMut(&Item, usize) -> T,
    {
        Ok(self
            .entries()?
            .iter()
            .map(|(i, item)| f(item, *i))
            .collect())
    }

    pub fn for_each<F>(&self, mut f: F) -> Result<()>
    where
        F: FnMut(&Item, usize),
    {
        for (i, item) in self.present()? {
            f(&item, i);
        }
        Ok(())
    }

    pub fn reduce<T, F>(&self, init: T, mut f: F) -> Result<T>
    where
        F: FnMut(T, &Item, usize) -> T,
    {
        Ok(self
            .present()?
            .into_iter()
            .fold(init, |acc, (i, item)| f(acc, &item, i)))
    }

    pub fn reduce_right<T, F>(&self, init: T, mut f: F) -> Result<T>
    where
        F: FnMut(T, &Item, usize) -> T,
    {
        Ok(self
            .present()?
            .into_iter()
            .rev()
            .fold(init, |acc, (i, item)| f(acc, &item, i)))
    }

    /// Join string forms with `separator`. Holes, absent and null
    /// elements contribute empty strings.
    pub fn join(&self, separator: &str) -> Result<String> {
        let parts: Vec<String> = self
            .values()?
            .iter()
            .map(|item| match item {
                Item::Value(value) => join_part(value),
                view => display(view),
            })
            .collect();
        Ok(parts.join(separator))
    }

    /// Flatten nested sequences up to `depth` levels. Holes are dropped.
    pub fn flat(&self, depth: usize) -> Result<Vec<Item>> {
        let mut out = Vec::new();
        for (_, item) in self.present()? {
            match item.as_view() {
                Some(view) if depth > 0 && view.is_sequence() => out.extend(view.flat(depth - 1)?),
                _ => out.push(item),
            }
        }
        Ok(out)
    }

    /// A new view holding this sequence followed by `others`. Sequence
    /// arguments contribute their elements; anything else is appended
    /// as one element.
    pub fn concat<I>(&self, others: impl IntoIterator<Item = I>) -> Result<View>
    where
        I: Into<Item>,
    {
        self.seq_len()?;
        let out = self.spread();
        for other in others {
            match other.into() {
                Item::View(view) if view.is_sequence() => {
                    for item in view.values()? {
                        out.push(item)?;
                    }
                }
                Item::Value(Value::Seq(items)) => {
                    for value in items.iter() {
                        out.push(value.clone())?;
                    }
                }
                item => {
                    out.push(item)?;
                }
            }
        }
        Ok(out)
    }
}
