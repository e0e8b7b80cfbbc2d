//! Link List Component
//!
//! The profile's links, reorderable by drag and deletable inline.

use leptos::prelude::*;

use crate::commands::LinkApi;
use crate::components::{sortable_list, DeleteConfirmButton};
use crate::context::use_app_context;
use crate::controller::OrderedListController;
use crate::models::Link;

#[component]
pub fn LinkList() -> impl IntoView {
    let ctx = use_app_context();
    let controller = OrderedListController::new(
        LinkApi::new(ctx.client()),
        ctx.config().link_order_base,
        ctx,
    );

    // Fetch once on mount
    Effect::new(move |_| controller.load());

    let render_row = move |link: Link| {
        let id = link.id.clone();
        let icon = link.icon.clone().unwrap_or_else(|| "🔗".to_string());
        let href = link.url.clone();
        view! {
            <span class="link-icon">{icon}</span>
            <div class="link-body">
                <span class="link-title">{link.title}</span>
                <a class="link-url" href=href target="_blank" rel="noopener">{link.url}</a>
            </div>
            <DeleteConfirmButton
                button_class="link-delete-btn"
                disabled=controller.busy()
                on_confirm=Callback::new(move |_| controller.delete(id.clone()))
            />
        }
    };

    view! {
        <section class="panel links-panel">
            <header class="panel-header">
                <h2>"Links"</h2>
                <button
                    class="refresh-btn"
                    disabled=move || controller.loading().get()
                    on:click=move |_| controller.load()
                >
                    "↻"
                </button>
            </header>
            {sortable_list(controller, "No links yet", render_row)}
        </section>
    }
}
