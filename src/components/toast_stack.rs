//! Toast Stack Component
//!
//! Shows transient notices from the app context, newest last.

use leptos::prelude::*;
use ordered_sync::NoticeLevel;

use crate::context::use_app_context;

#[component]
pub fn ToastStack() -> impl IntoView {
    let ctx = use_app_context();

    view! {
        <div class="toast-stack" role="status" aria-live="polite">
            <For
                each=move || ctx.notices()
                key=|notice| notice.id
                children=move |notice| {
                    let class = match notice.level {
                        NoticeLevel::Error => "toast toast-error",
                        NoticeLevel::Info => "toast toast-info",
                    };
                    let id = notice.id;
                    view! {
                        <div class=class>
                            <span class="toast-text">{notice.text}</span>
                            <button class="toast-close" on:click=move |_| ctx.dismiss(id)>"×"</button>
                        </div>
                    }
                }
            />
        </div>
    }
}
