//! Sequence mutators.
//!
//! Every mutator is expressed through the view's index-level get, set and
//! delete, so the change set and patch stay the only record of what
//! happened. Holes are carried along: moving a hole deletes the target
//! index instead of writing an absent value.

use crate::mediator::{grow, Item, View};
use crate::query::compare_default;
use mediary_core::{MediaryError, Result, MAX_LENGTH};
use std::cmp::Ordering;

/// Resolve a relative index against `len`: negatives count from the end,
/// and the result is clamped to `0..=len`.
pub(crate) fn relative(index: isize, len: usize) -> usize {
    if index < 0 {
        len.saturating_sub(index.unsigned_abs())
    } else {
        index.unsigned_abs().min(len)
    }
}

impl View {
    /// Append at index `len`. Returns the new length.
    pub fn push(&self, value: impl Into<Item>) -> Result<usize> {
        let item = self.adopt(value.into())?;
        self.with_seq("push", |layer, _| {
            let len = layer.len();
            let next = grow(len, 1)?;
            layer.set(len, item);
            Ok(next)
        })?
    }

    /// Remove and return the last element, or absent when empty.
    pub fn pop(&self) -> Result<Item> {
        self.with_seq("pop", |layer, config| {
            let len = layer.len();
            if len == 0 {
                return Item::absent();
            }
            let last = layer.get(&(len - 1), config);
            layer.delete(len - 1);
            last
        })
    }

    /// Remove and return the first element, moving the rest down by one.
    pub fn shift(&self) -> Result<Item> {
        self.with_seq("shift", |layer, config| {
            let len = layer.len();
            if len == 0 {
                return Item::absent();
            }
            let first = layer.get(&0, config);
            for i in 1..len {
                let slot = layer.slot(i, config);
                layer.put(i - 1, slot);
            }
            layer.delete(len - 1);
            first
        })
    }

    /// Insert at the front, moving everything up by one. Returns the new
    /// length.
    pub fn unshift(&self, value: impl Into<Item>) -> Result<usize> {
        let item = self.adopt(value.into())?;
        self.with_seq("unshift", |layer, config| {
            let len = layer.len();
            let next = grow(len, 1)?;
            for i in (0..len).rev() {
                let slot = layer.slot(i, config);
                layer.put(i + 1, slot);
            }
            layer.set(0, item);
            Ok(next)
        })?
    }

    /// Reverse in place.
    pub fn reverse(&self) -> Result<View> {
        self.with_seq("reverse", |layer, config| {
            let len = layer.len();
            let slots: Vec<_> = (0..len).map(|i| layer.slot(i, config)).collect();
            for (i, slot) in slots.into_iter().rev().enumerate() {
                layer.put(i, slot);
            }
        })?;
        Ok(self.clone())
    }

    /// Remove `delete_count` elements at `start` (all remaining when
    /// `None`) and insert `items` in their place. Returns the removed
    /// elements.
    pub fn splice(
        &self,
        start: isize,
        delete_count: Option<usize>,
        items: Vec<Item>,
    ) -> Result<Vec<Item>> {
        let items = items
            .into_iter()
            .map(|item| self.adopt(item))
            .collect::<Result<Vec<_>>>()?;
        self.with_seq("splice", |layer, config| {
            let len = layer.len();
            let start = relative(start, len);
            let count = delete_count.map_or(len - start, |n| n.min(len - start));

            let new_len = grow(len - count, items.len())?;
            let mut removed: Vec<_> = (start..len).map(|i| layer.slot(i, config)).collect();
            let kept = removed.split_off(count);

            let mut i = start;
            for item in items {
                layer.set(i, item);
                i += 1;
            }
            for slot in kept {
                layer.put(i, slot);
                i += 1;
            }
            for j in new_len..len {
                layer.delete(j);
            }
            Ok(removed
                .into_iter()
                .map(|slot| slot.unwrap_or_else(Item::absent))
                .collect())
        })?
    }

    /// Copy the range `start..end` over the elements starting at `target`.
    /// The length never changes.
    pub fn copy_within(&self, target: isize, start: isize, end: Option<isize>) -> Result<View> {
        self.with_seq("copy_within", |layer, config| {
            let len = layer.len();
            let to = relative(target, len);
            let from = relative(start, len);
            let end = end.map_or(len, |end| relative(end, len));
            let count = end.saturating_sub(from).min(len - to);

            let slots: Vec<_> = (from..from + count)
                .map(|i| layer.slot(i, config))
                .collect();
            for (offset, slot) in slots.into_iter().enumerate() {
                layer.put(to + offset, slot);
            }
        })?;
        Ok(self.clone())
    }

    /// Write `value` to every index in `start..end`. A node value is
    /// wrapped once and the same child view is stored at each index.
    pub fn fill(&self, value: impl Into<Item>, start: isize, end: Option<isize>) -> Result<View> {
        let item = self.adopt(value.into())?;
        self.with_seq("fill", |layer, _| {
            let len = layer.len();
            let from = relative(start, len);
            let end = end.map_or(len, |end| relative(end, len));
            for i in from..end {
                layer.set(i, item.clone());
            }
        })?;
        Ok(self.clone())
    }

    /// Truncate or extend. New slots hold absent values.
    pub fn set_length(&self, len: usize) -> Result<()> {
        if len > MAX_LENGTH {
            return Err(MediaryError::InvalidLength(len.to_string()));
        }
        self.with_seq("set_length", |layer, _| layer.set_len(len))
    }

    /// Sort by the default string ordering.
    pub fn sort(&self) -> Result<View> {
        self.sort_by(compare_default)
    }

    /// Stable sort with `compare`. Absent values go after all others and
    /// holes go last.
    pub fn sort_by<F>(&self, mut compare: F) -> Result<View>
    where
        F: FnMut(&Item, &Item) -> Ordering,
    {
        let slots = self.with_seq("sort", |layer, config| {
            let len = layer.len();
            (0..len).map(|i| layer.slot(i, config)).collect::<Vec<_>>()
        })?;

        let mut present = Vec::with_capacity(slots.len());
        let mut absent = 0;
        let mut holes = 0;
        for slot in slots {
            match slot {
                Some(item) if item.is_absent() => absent += 1,
                Some(item) => present.push(item),
                None => holes += 1,
            }
        }
        present.sort_by(|a, b| compare(a, b));

        self.with_seq("sort", |layer, _| {
            let sorted = present.into_iter().map(Some);
            let tail = std::iter::repeat_with(|| Some(Item::absent()))
                .take(absent)
                .chain(std::iter::repeat_with(|| None).take(holes));
            for (i, slot) in sorted.chain(tail).enumerate() {
                layer.put(i, slot);
            }
        })?;
        Ok(self.clone())
    }
}
