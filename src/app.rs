//! LinkDeck Frontend App
//!
//! Profile editor: links on the left, badge showcase on the right.

use leptos::prelude::*;
use ordered_sync::SyncConfig;

use crate::components::{BadgeShowcase, LinkList, ToastStack};
use crate::context::AppContext;

#[component]
pub fn App(config: SyncConfig) -> impl IntoView {
    provide_context(AppContext::new(config));

    view! {
        <div class="app-layout">
            <main class="main-content">
                <h1>"Your profile"</h1>
                <div class="panels">
                    <LinkList />
                    <BadgeShowcase />
                </div>
            </main>
            <ToastStack />
        </div>
    }
}
