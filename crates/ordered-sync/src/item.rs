//! Ordered Item Contract
//!
//! The trait every reorderable entity implements, plus helpers that keep
//! `display_order` dense after any permutation.

use std::fmt::{Debug, Display};
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};

/// Core trait for items living in an ordered collection
pub trait OrderedItem: Clone + PartialEq {
    /// Stable, unique identifier
    type Id: Clone + Eq + Hash + Debug + Display + Send + Sync + 'static;

    fn id(&self) -> Self::Id;

    /// Position shown to end users
    fn display_order(&self) -> i32;

    fn set_display_order(&mut self, order: i32);
}

/// Where the dense `display_order` sequence starts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderBase {
    #[default]
    Zero,
    One,
}

impl OrderBase {
    pub fn first(self) -> i32 {
        match self {
            OrderBase::Zero => 0,
            OrderBase::One => 1,
        }
    }
}

/// One `{id, order}` pair of a bulk reorder request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderEntry<Id> {
    pub id: Id,
    pub order: i32,
}

/// Rewrite every `display_order` as `base, base+1, ...` following slice order
pub fn renumber<T: OrderedItem>(items: &mut [T], base: OrderBase) {
    let first = base.first();
    for (pos, item) in items.iter_mut().enumerate() {
        item.set_display_order(first + pos as i32);
    }
}

/// True when orders are exactly `base..base+len` in slice order
pub fn is_dense<T: OrderedItem>(items: &[T], base: OrderBase) -> bool {
    let first = base.first();
    items
        .iter()
        .enumerate()
        .all(|(pos, item)| item.display_order() == first + pos as i32)
}

/// Build the wire payload for a bulk reorder from already-renumbered items
pub fn order_entries<T: OrderedItem>(items: &[T]) -> Vec<OrderEntry<T::Id>> {
    items
        .iter()
        .map(|item| OrderEntry { id: item.id(), order: item.display_order() })
        .collect()
}

/// Remove the element at `from` and reinsert it at `to`.
/// Relative order of every other element is preserved.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> SyncResult<()> {
    let len = items.len();
    if from >= len {
        return Err(SyncError::InvalidIndex { index: from, len });
    }
    if to >= len {
        return Err(SyncError::InvalidIndex { index: to, len });
    }
    if from != to {
        let moved = items.remove(from);
        items.insert(to, moved);
    }
    Ok(())
}

/// Position of `id` in `items`
pub fn index_of<T: OrderedItem>(items: &[T], id: &T::Id) -> Option<usize> {
    items.iter().position(|item| &item.id() == id)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Minimal item used across the crate's tests
    #[derive(Debug, Clone, PartialEq)]
    pub struct Row {
        pub id: String,
        pub order: i32,
    }

    impl OrderedItem for Row {
        type Id = String;

        fn id(&self) -> String {
            self.id.clone()
        }

        fn display_order(&self) -> i32 {
            self.order
        }

        fn set_display_order(&mut self, order: i32) {
            self.order = order;
        }
    }

    /// Rows named by the given ids, ordered from 0
    pub fn rows(ids: &[&str]) -> Vec<Row> {
        ids.iter()
            .enumerate()
            .map(|(pos, id)| Row { id: id.to_string(), order: pos as i32 })
            .collect()
    }

    pub fn ids(items: &[Row]) -> Vec<&str> {
        items.iter().map(|r| r.id.as_str()).collect()
    }
}
