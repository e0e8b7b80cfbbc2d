//! Ordered Sync
//!
//! Optimistic reordering for user-visible ordered collections:
//! - drag: live reorder preview for a pointer gesture
//! - store: optimistic apply with snapshot, one mutation in flight at a time
//! - reconcile: commit or roll back once the server answers
//! - backend: the remote calls a collection depends on

mod backend;
mod config;
mod drag;
mod error;
mod item;
mod notice;
mod reconcile;
mod store;


pub use backend::{ItemId, OrderBackend};
pub use config::{SyncConfig, DEFAULT_NOTICE_TTL_MS, DEFAULT_REQUEST_TIMEOUT_MS};
pub use drag::{DragSession, DragTracker, DropOutcome};
pub use error::{SyncError, SyncResult};
pub use item::{index_of, is_dense, move_item, order_entries, renumber, OrderBase, OrderEntry, OrderedItem};
pub use notice::{Notice, NoticeBoard, NoticeLevel};
pub use reconcile::{persist, Ack, FailureReason, MutationPhase, PersistOutcome, Resolution};
pub use store::{MutationKind, MutationTicket, OptimisticOrderedCollection, PendingMutation};

// Re-exported so callers can build tokens without naming tokio-util themselves
pub use tokio_util::sync::CancellationToken;
