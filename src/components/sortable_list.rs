//! Sortable List
//!
//! Drag-to-reorder list body shared by the links panel and the badge showcase.

use leptos::prelude::*;
use leptos_dragdrop::*;
use ordered_sync::{OrderBackend, OrderedItem};

use crate::controller::OrderedListController;

/// Render the rows of `controller` with drag-and-drop reordering.
/// `render_row` draws the inside of a single row.
pub fn sortable_list<B, F, IV>(
    controller: OrderedListController<B>,
    empty_text: &'static str,
    render_row: F,
) -> impl IntoView
where
    B: OrderBackend + Clone + 'static,
    B::Item: SortableItem,
    F: Fn(B::Item) -> IV + Copy + Send + Sync + 'static,
    IV: IntoView + 'static,
{
    let drag = controller.drag;
    let items = controller.items();
    let busy = controller.busy();
    let on_reorder = Callback::new(move |order: Vec<B::Item>| controller.reorder(order));

    view! {
        <div
            class=move || if drag.is_drop_target() { "sortable-list drop-target" } else { "sortable-list" }
            node_ref=drag.container
            on:dragleave=make_on_dragleave(drag)
        >
            <For
                each=move || controller.visible()
                key=|item| item.id()
                children=move |item| {
                    let id = item.id();

                    let row_class = {
                        let id = id.clone();
                        move || {
                            let mut c = String::from("sortable-row");
                            if drag.is_dragging(&id) { c.push_str(" dragging"); }
                            if busy.get() { c.push_str(" saving"); }
                            c
                        }
                    };

                    view! {
                        <div
                            class=row_class
                            draggable=move || if busy.get() { "false" } else { "true" }
                            on:dragstart=make_on_dragstart(drag, items, busy, id.clone())
                            on:dragover=make_on_dragover(drag, id.clone())
                            on:drop=make_on_drop(drag, id.clone(), on_reorder)
                            on:dragend=make_on_dragend(drag)
                        >
                            <span class="drag-handle">"⋮⋮"</span>
                            {render_row(item)}
                        </div>
                    }
                }
            />

            <Show when=move || items.with(|i| i.is_empty()) && !controller.loading().get()>
                <p class="empty-list">{empty_text}</p>
            </Show>
        </div>
    }
}
