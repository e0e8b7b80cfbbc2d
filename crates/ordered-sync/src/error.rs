//! Sync Errors
//!
//! Error taxonomy shared by the tracker, the store and the backend bindings.

use thiserror::Error;

/// Common result type for sync operations
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors raised while reordering, deleting or persisting items
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// Request never produced a response (fetch rejected, DNS, CORS...)
    #[error("Network error: {0}")]
    Transport(String),

    /// Server answered with a non-2xx status
    #[error("Server returned {code}{}", .message.as_deref().map(|m| format!(": {m}")).unwrap_or_default())]
    Status { code: u16, message: Option<String> },

    /// 2xx answer whose body reports `success: false`
    #[error("{0}")]
    Rejected(String),

    /// Response body could not be decoded
    #[error("Malformed response: {0}")]
    Decode(String),

    /// Another mutation on this collection has not resolved yet
    #[error("Another change is still being saved")]
    MutationInProgress,

    /// Delete already requested for this id
    #[error("Delete already pending for {0}")]
    DuplicateDelete(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Proposed order is not a permutation of the current collection
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Index {index} out of range for {len} items")]
    InvalidIndex { index: usize, len: usize },

    /// A drag session is already live
    #[error("A drag is already in progress")]
    DragInProgress,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for SyncError {
    fn from(e: serde_json::Error) -> Self {
        SyncError::Decode(e.to_string())
    }
}
