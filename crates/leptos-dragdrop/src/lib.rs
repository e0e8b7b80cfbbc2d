//! Leptos DragDrop Utilities
//!
//! Sortable lists for Leptos using native HTML5 drag events.
//! All ordering logic lives in `ordered_sync::DragTracker`; this crate only
//! binds it to signals and `web_sys::DragEvent`s.

use leptos::html;
use leptos::prelude::*;
use ordered_sync::{index_of, DragTracker, DropOutcome, OrderBase, OrderedItem};
use wasm_bindgen::JsCast;

/// Bounds for items that can live inside reactive signals
pub trait SortableItem: OrderedItem + Send + Sync + 'static {}

impl<T: OrderedItem + Send + Sync + 'static> SortableItem for T {}

/// DnD state for one sortable list
pub struct DragList<T: SortableItem> {
    pub tracker: RwSignal<DragTracker<T>>,
    /// Element wrapping all rows; used to tell "left a row" from "left the list"
    pub container: NodeRef<html::Div>,
}

impl<T: SortableItem> Clone for DragList<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: SortableItem> Copy for DragList<T> {}

pub fn create_drag_list<T: SortableItem>(base: OrderBase) -> DragList<T> {
    DragList {
        tracker: RwSignal::new(DragTracker::new(base)),
        container: NodeRef::new(),
    }
}

impl<T: SortableItem> DragList<T> {
    /// Rows to render: live preview while dragging, else `committed`
    pub fn visible(&self, committed: &[T]) -> Vec<T> {
        self.tracker.with(|t| t.visible(committed).to_vec())
    }

    pub fn is_dragging(&self, id: &T::Id) -> bool {
        self.tracker.with(|t| t.is_dragging(id))
    }

    /// A drag is hovering the list; drives the container's drop-zone highlight
    pub fn is_drop_target(&self) -> bool {
        self.tracker.with(|t| t.is_active() && t.indicator().is_some())
    }
}

// Handlers take the row id rather than its index: rows move under the
// pointer while dragging, so the index is looked up when the event fires.

/// Create dragstart handler for row `id`.
/// Refuses to start while `busy` (a save is still in flight).
pub fn make_on_dragstart<T: SortableItem>(
    list: DragList<T>,
    items: Signal<Vec<T>>,
    busy: Signal<bool>,
    id: T::Id,
) -> impl Fn(web_sys::DragEvent) + Clone + 'static {
    move |ev: web_sys::DragEvent| {
        if busy.get_untracked() {
            ev.prevent_default();
            return;
        }
        let started = items.with_untracked(|items| {
            let index = index_of(items, &id)?;
            list.tracker.try_update(|t| t.start(items, index))
        });
        match started {
            Some(Ok(())) => {
                if let Some(dt) = ev.data_transfer() {
                    dt.set_effect_allowed("move");
                    // Firefox will not start a drag without payload
                    let _ = dt.set_data("text/plain", &id.to_string());
                }
            }
            Some(Err(e)) => {
                log::debug!("[DND] drag not started: {}", e);
                ev.prevent_default();
            }
            None => ev.prevent_default(),
        }
    }
}

/// Create dragover handler for row `id`; moves the dragged row to its slot
pub fn make_on_dragover<T: SortableItem>(
    list: DragList<T>,
    id: T::Id,
) -> impl Fn(web_sys::DragEvent) + Clone + 'static {
    move |ev: web_sys::DragEvent| {
        if !list.tracker.with_untracked(|t| t.is_active()) {
            return;
        }
        // Marks this row as a valid drop target
        ev.prevent_default();
        if let Some(dt) = ev.data_transfer() {
            dt.set_drop_effect("move");
        }
        list.tracker.maybe_update(|t| {
            let Some(index) = t.position_of(&id) else {
                return false;
            };
            let before = t.indicator();
            let moved = t.drag_over(index);
            moved || before != t.indicator()
        });
    }
}

/// Create drop handler for row `id`; `on_reorder` receives the new order
/// only when it differs from the order the drag started with
pub fn make_on_drop<T: SortableItem>(
    list: DragList<T>,
    id: T::Id,
    on_reorder: Callback<Vec<T>>,
) -> impl Fn(web_sys::DragEvent) + Clone + 'static {
    move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        let outcome = list.tracker.try_update(|t| match t.position_of(&id) {
            Some(index) => t.drop_at(index),
            None => {
                t.end();
                DropOutcome::Unchanged
            }
        });
        if let Some(DropOutcome::Reordered(order)) = outcome {
            on_reorder.run(order);
        }
    }
}

/// Create dragend handler; reverts the preview when no drop happened
pub fn make_on_dragend<T: SortableItem>(list: DragList<T>) -> impl Fn(web_sys::DragEvent) + Copy + 'static {
    move |_ev: web_sys::DragEvent| {
        list.tracker.maybe_update(|t| t.end());
    }
}

/// Create dragleave handler; clears the highlight once the pointer left the list
pub fn make_on_dragleave<T: SortableItem>(list: DragList<T>) -> impl Fn(web_sys::DragEvent) + Copy + 'static {
    move |ev: web_sys::DragEvent| {
        let still_inside = match (list.container.get_untracked(), ev.related_target()) {
            (Some(container), Some(target)) => target
                .dyn_ref::<web_sys::Node>()
                .is_some_and(|node| container.contains(Some(node))),
            _ => false,
        };
        list.tracker.maybe_update(|t| {
            let before = t.indicator();
            t.leave(still_inside);
            before != t.indicator()
        });
    }
}
