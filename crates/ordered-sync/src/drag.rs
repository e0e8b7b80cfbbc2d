//! Drag Session Tracker
//!
//! Turns drag gestures into a live reorder preview. The tracker works on a
//! private copy of the collection; nothing reaches the store until a drop
//! lands on a different index than the one the drag started from.

use log::debug;

use crate::error::{SyncError, SyncResult};
use crate::item::{index_of, move_item, renumber, OrderBase, OrderedItem};

/// Ephemeral state of one drag gesture
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession<Id> {
    pub dragged_id: Id,
    pub origin_index: usize,
    pub current_index: usize,
}

/// Result of releasing the pointer over a list row
#[derive(Debug, Clone, PartialEq)]
pub enum DropOutcome<T> {
    /// Item ended where it started, nothing to persist
    Unchanged,
    /// New full order, already renumbered
    Reordered(Vec<T>),
}

#[derive(Debug, Clone)]
pub struct DragTracker<T: OrderedItem> {
    base: OrderBase,
    session: Option<DragSession<T::Id>>,
    working: Vec<T>,
    /// Row currently highlighted as drop target
    indicator: Option<usize>,
}

impl<T: OrderedItem> DragTracker<T> {
    pub fn new(base: OrderBase) -> Self {
        Self {
            base,
            session: None,
            working: Vec::new(),
            indicator: None,
        }
    }

    /// Begin dragging the item at `index` of `items`
    pub fn start(&mut self, items: &[T], index: usize) -> SyncResult<()> {
        if self.session.is_some() {
            return Err(SyncError::DragInProgress);
        }
        let item = items
            .get(index)
            .ok_or(SyncError::InvalidIndex { index, len: items.len() })?;

        debug!("drag start: id={} index={}", item.id(), index);
        self.session = Some(DragSession {
            dragged_id: item.id(),
            origin_index: index,
            current_index: index,
        });
        self.working = items.to_vec();
        self.indicator = Some(index);
        Ok(())
    }

    /// Pointer moved over row `target`. Returns true when the preview changed.
    pub fn drag_over(&mut self, target: usize) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if target >= self.working.len() {
            return false;
        }
        self.indicator = Some(target);
        if target == session.current_index {
            return false;
        }
        // Bounds were checked above, so the move cannot fail
        if move_item(&mut self.working, session.current_index, target).is_err() {
            return false;
        }
        renumber(&mut self.working, self.base);
        session.current_index = target;
        true
    }

    /// Finalize the gesture on row `target` and end the session.
    /// A target outside the list cancels the drag like `end`.
    pub fn drop_at(&mut self, target: usize) -> DropOutcome<T> {
        if target >= self.working.len() {
            self.end();
            return DropOutcome::Unchanged;
        }
        self.drag_over(target);
        self.indicator = None;
        let working = std::mem::take(&mut self.working);

        match self.session.take() {
            Some(session) if session.current_index != session.origin_index => {
                debug!(
                    "drop: id={} {} -> {}",
                    session.dragged_id, session.origin_index, session.current_index
                );
                DropOutcome::Reordered(working)
            }
            Some(session) => {
                debug!("drop on origin index {}, nothing to save", session.origin_index);
                DropOutcome::Unchanged
            }
            None => DropOutcome::Unchanged,
        }
    }

    /// Drag ended without a valid drop: discard the preview.
    /// Returns true when a live session was cancelled.
    pub fn end(&mut self) -> bool {
        self.indicator = None;
        match self.session.take() {
            Some(session) => {
                debug!("drag cancelled: id={}", session.dragged_id);
                self.working.clear();
                true
            }
            None => false,
        }
    }

    /// Pointer left a row. Only clears the highlight once it left the list itself.
    pub fn leave(&mut self, still_inside: bool) {
        if !still_inside {
            self.indicator = None;
        }
    }

    pub fn session(&self) -> Option<&DragSession<T::Id>> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_dragging(&self, id: &T::Id) -> bool {
        self.session.as_ref().is_some_and(|s| &s.dragged_id == id)
    }

    pub fn indicator(&self) -> Option<usize> {
        self.indicator
    }

    /// Live working copy, only while a drag is active
    pub fn preview(&self) -> Option<&[T]> {
        self.session.as_ref().map(|_| self.working.as_slice())
    }

    /// Index of `id` in the working copy
    pub fn position_of(&self, id: &T::Id) -> Option<usize> {
        self.preview().and_then(|items| index_of(items, id))
    }

    /// What the list should render: the preview while dragging, else `committed`
    pub fn visible<'a>(&'a self, committed: &'a [T]) -> &'a [T] {
        self.preview().unwrap_or(committed)
    }
}
