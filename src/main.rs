//! LinkDeck Frontend Entry Point

mod models;
mod commands;
mod context;
mod controller;
mod components;
mod app;

use app::App;
use leptos::prelude::*;
use ordered_sync::SyncConfig;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Debug) {
        web_sys::console::warn_1(&format!("logger init failed: {}", e).into());
    }

    let config = load_config();
    log::info!("[APP] api base: {}", config.api_base);
    mount_to_body(move || view! { <App config=config.clone() /> });
}

/// Defaults, with the API base overridable at build time
fn load_config() -> SyncConfig {
    let config = match option_env!("LINKDECK_API_BASE") {
        Some(base) => SyncConfig::default().with_api_base(base),
        None => SyncConfig::default(),
    };
    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            log::warn!("[APP] {}; falling back to defaults", e);
            SyncConfig::default()
        }
    }
}
