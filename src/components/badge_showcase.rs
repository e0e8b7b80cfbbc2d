//! Badge Showcase Component
//!
//! Earned badges shown on the public profile, in the user's chosen order.

use leptos::prelude::*;

use crate::commands::BadgeApi;
use crate::components::{sortable_list, DeleteConfirmButton};
use crate::context::use_app_context;
use crate::controller::OrderedListController;
use crate::models::Badge;

#[component]
pub fn BadgeShowcase() -> impl IntoView {
    let ctx = use_app_context();
    let controller = OrderedListController::new(
        BadgeApi::new(ctx.client()),
        ctx.config().badge_order_base,
        ctx,
    );

    Effect::new(move |_| controller.load());

    let render_row = move |badge: Badge| {
        let id = badge.id.clone();
        let slot = badge.showcase_order.map(|n| format!("#{}", n)).unwrap_or_default();
        view! {
            <span class="badge-slot">{slot}</span>
            <span class="badge-icon">{badge.icon.clone().unwrap_or_else(|| "🏅".to_string())}</span>
            <span class="badge-name">{badge.name}</span>
            <DeleteConfirmButton
                button_class="badge-remove-btn"
                disabled=controller.busy()
                prompt="Remove?"
                on_confirm=Callback::new(move |_| controller.delete(id.clone()))
            />
        }
    };

    view! {
        <section class="panel badges-panel">
            <header class="panel-header">
                <h2>"Showcase"</h2>
                <span class="panel-hint">"Drag to reorder"</span>
            </header>
            {sortable_list(controller, "No badges showcased", render_row)}
        </section>
    }
}
