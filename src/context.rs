//! Application Context
//!
//! Shared state provided via Leptos Context API.

#[cfg(target_arch = "wasm32")]
use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use ordered_sync::{Notice, NoticeBoard, NoticeLevel, SyncConfig};

use crate::commands::ApiClient;

/// App-wide state provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Loaded once at startup
    config: StoredValue<SyncConfig>,
    /// Shared REST client
    client: StoredValue<ApiClient, LocalStorage>,
    /// Transient notices shown by the toast stack
    board: RwSignal<NoticeBoard>,
}

impl AppContext {
    pub fn new(config: SyncConfig) -> Self {
        let board = NoticeBoard::new(config.notice_ttl_ms);
        Self {
            client: StoredValue::new_local(ApiClient::new(config.clone())),
            config: StoredValue::new(config),
            board: RwSignal::new(board),
        }
    }

    pub fn config(&self) -> SyncConfig {
        self.config.get_value()
    }

    pub fn client(&self) -> ApiClient {
        self.client.get_value()
    }

    /// Currently visible notices (tracked)
    pub fn notices(&self) -> Vec<Notice> {
        self.board.with(|b| b.active().to_vec())
    }

    /// Flash an error notice; it dismisses itself after the configured TTL
    pub fn notify_error(&self, text: impl Into<String>) {
        self.notify(NoticeLevel::Error, text.into());
    }

    /// Flash an informational notice, e.g. a message the server sent with a successful save
    pub fn notify_info(&self, text: impl Into<String>) {
        self.notify(NoticeLevel::Info, text.into());
    }

    pub fn dismiss(&self, id: u64) {
        self.board.update(|b| {
            b.dismiss(id);
        });
    }

    fn notify(&self, level: NoticeLevel, text: String) {
        log::info!("[NOTICE] {:?}: {}", level, text);
        let Some((id, ttl)) = self
            .board
            .try_update(|b| (b.push(level, text, now_ms()), b.ttl_ms()))
        else {
            return;
        };

        let board = self.board;
        schedule(ttl, move || retire(board, id));
    }
}

/// Timer callback: drop notice `id` by identity, then sweep anything else overdue
fn retire(board: RwSignal<NoticeBoard>, id: u64) {
    // Board may be gone if the app unmounted meanwhile
    board.try_update(|b| {
        b.dismiss(id);
        b.expire(now_ms());
    });
}

#[cfg(target_arch = "wasm32")]
fn now_ms() -> u64 {
    js_sys::Date::now() as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

#[cfg(target_arch = "wasm32")]
fn schedule(ttl_ms: u64, f: impl FnOnce() + 'static) {
    Timeout::new(ttl_ms.min(u32::MAX as u64) as u32, f).forget();
}

// Native builds (tests) have no browser timers; notices stay until dismissed
#[cfg(not(target_arch = "wasm32"))]
fn schedule(_ttl_ms: u64, _f: impl FnOnce() + 'static) {}

/// Get the app context
pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
