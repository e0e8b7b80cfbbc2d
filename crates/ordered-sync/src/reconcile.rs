//! Reconciliation Policy
//!
//! Maps the result of a persistence call onto the store: success commits,
//! anything else restores the snapshot taken before the optimistic change.

use std::fmt;
use std::future::Future;

use futures::future::{select, Either};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::backend::{ItemId, OrderBackend};
use crate::error::{SyncError, SyncResult};
use crate::store::{MutationKind, PendingMutation};

/// `{success, message?}` body returned by the mutation endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Ack {
    pub fn ok() -> Self {
        Self { success: true, message: None }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self { success: false, message: Some(message.into()) }
    }
}

/// Why a persistence call did not succeed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    Transport(String),
    Status { code: u16, message: Option<String> },
    /// 2xx with `success: false`
    Rejected(Option<String>),
    Malformed(String),
    TimedOut,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Transport(msg) => write!(f, "network error ({})", msg),
            FailureReason::Status { message: Some(msg), .. } => write!(f, "{}", msg),
            FailureReason::Status { code, message: None } => write!(f, "server error {}", code),
            FailureReason::Rejected(Some(msg)) => write!(f, "{}", msg),
            FailureReason::Rejected(None) => write!(f, "the server rejected the change"),
            FailureReason::Malformed(msg) => write!(f, "unexpected response ({})", msg),
            FailureReason::TimedOut => write!(f, "the server took too long to answer"),
        }
    }
}

/// Outcome of one persistence call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    Success { message: Option<String> },
    Failure(FailureReason),
    /// Owner went away before the call resolved
    Cancelled,
}

impl PersistOutcome {
    pub fn from_ack(ack: Ack) -> Self {
        if ack.success {
            PersistOutcome::Success { message: ack.message }
        } else {
            PersistOutcome::Failure(FailureReason::Rejected(ack.message))
        }
    }

    pub fn from_result(result: SyncResult<Ack>) -> Self {
        match result {
            Ok(ack) => Self::from_ack(ack),
            Err(SyncError::Transport(msg)) => PersistOutcome::Failure(FailureReason::Transport(msg)),
            Err(SyncError::Status { code, message }) => {
                PersistOutcome::Failure(FailureReason::Status { code, message })
            }
            Err(SyncError::Decode(msg)) => PersistOutcome::Failure(FailureReason::Malformed(msg)),
            Err(SyncError::Rejected(msg)) => PersistOutcome::Failure(FailureReason::Rejected(Some(msg))),
            Err(other) => PersistOutcome::Failure(FailureReason::Rejected(Some(other.to_string()))),
        }
    }
}

/// Lifecycle of the most recent mutation on a collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MutationPhase {
    #[default]
    Idle,
    OptimisticallyApplied,
    Confirmed,
    RolledBack,
}

/// What `resolve` did to the visible collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Server accepted; `message` is whatever it sent along
    Committed { message: Option<String> },
    /// Snapshot restored; `notice` is the text to flash to the user
    RolledBack { reason: FailureReason, notice: String },
    /// Snapshot restored silently after cancellation
    Discarded,
    /// Ticket no longer matches the in-flight mutation (reload happened)
    Stale,
}

impl Resolution {
    pub fn notice(&self) -> Option<&str> {
        match self {
            Resolution::RolledBack { notice, .. } => Some(notice),
            _ => None,
        }
    }
}

/// Run the backend call for `mutation`, racing it against cancellation and
/// `deadline`. Never returns an error: every failure is folded into the outcome.
pub async fn persist<B, D>(
    backend: &B,
    mutation: &PendingMutation<ItemId<B>>,
    cancel: &CancellationToken,
    deadline: D,
) -> PersistOutcome
where
    B: OrderBackend + ?Sized,
    D: Future<Output = ()>,
{
    if cancel.is_cancelled() {
        return PersistOutcome::Cancelled;
    }

    let call = async {
        let result = match &mutation.kind {
            MutationKind::Reorder(entries) => backend.reorder(entries).await,
            MutationKind::Delete(id) => backend.delete(id).await,
        };
        PersistOutcome::from_result(result)
    };
    let cancelled = cancel.cancelled();
    futures::pin_mut!(call, cancelled, deadline);

    match select(call, select(cancelled, deadline)).await {
        Either::Left((outcome, _)) => {
            debug!("mutation #{} resolved: {:?}", mutation.ticket, outcome);
            outcome
        }
        Either::Right((Either::Left(_), _)) => {
            debug!("mutation #{} cancelled", mutation.ticket);
            PersistOutcome::Cancelled
        }
        Either::Right((Either::Right(_), _)) => {
            warn!("mutation #{} timed out", mutation.ticket);
            PersistOutcome::Failure(FailureReason::TimedOut)
        }
    }
}
