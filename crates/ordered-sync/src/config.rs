//! Sync Configuration
//!
//! Where the REST API lives and how the optimistic layer behaves.

use serde::{Deserialize, Serialize};

use crate::error::{SyncError, SyncResult};
use crate::item::OrderBase;

pub const DEFAULT_NOTICE_TTL_MS: u64 = 4000;
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 15_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SyncConfig {
    /// Base URL of the REST API, e.g. `https://api.example.com/v1`
    pub api_base: String,
    /// How long a failure notice stays on screen
    pub notice_ttl_ms: u64,
    /// Give up on a persistence call after this long; `None` waits forever
    pub request_timeout_ms: Option<u64>,
    pub link_order_base: OrderBase,
    pub badge_order_base: OrderBase,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            api_base: "/api".to_string(),
            notice_ttl_ms: DEFAULT_NOTICE_TTL_MS,
            request_timeout_ms: Some(DEFAULT_REQUEST_TIMEOUT_MS),
            link_order_base: OrderBase::Zero,
            badge_order_base: OrderBase::One,
        }
    }
}

impl SyncConfig {
    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> SyncResult<Self> {
        let config: SyncConfig =
            serde_json::from_str(json).map_err(|e| SyncError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn validate(&self) -> SyncResult<()> {
        if self.api_base.trim().is_empty() {
            return Err(SyncError::Config("apiBase must not be empty".to_string()));
        }
        if self.notice_ttl_ms == 0 {
            return Err(SyncError::Config("noticeTtlMs must be positive".to_string()));
        }
        Ok(())
    }

    /// Join `path` onto the API base with exactly one slash between them
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}
