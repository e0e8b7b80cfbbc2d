//! Optimistic Mutation Store
//!
//! Holds the visible collection, applies reorders and deletes immediately and
//! keeps a snapshot of the prior state until the matching persistence call
//! resolves. Only one mutation may be in flight per collection; later gestures
//! are rejected with [`SyncError::MutationInProgress`] until it resolves.

use std::collections::HashSet;

use log::{debug, info, warn};

use crate::error::{SyncError, SyncResult};
use crate::item::{index_of, is_dense, order_entries, renumber, OrderBase, OrderEntry, OrderedItem};
use crate::reconcile::{MutationPhase, PersistOutcome, Resolution};

/// Identifies one optimistic mutation
pub type MutationTicket = u64;

/// Network request that must follow an optimistic change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationKind<Id> {
    Reorder(Vec<OrderEntry<Id>>),
    Delete(Id),
}

impl<Id> MutationKind<Id> {
    fn failure_label(&self) -> &'static str {
        match self {
            MutationKind::Reorder(_) => "Couldn't save the new order",
            MutationKind::Delete(_) => "Couldn't delete the item",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingMutation<Id> {
    pub ticket: MutationTicket,
    pub kind: MutationKind<Id>,
}

#[derive(Debug, Clone)]
struct InFlight<T: OrderedItem> {
    ticket: MutationTicket,
    label: &'static str,
    snapshot: Vec<T>,
    deleted: Option<T::Id>,
}

/// Ordered collection with optimistic updates and snapshot rollback
#[derive(Debug, Clone)]
pub struct OptimisticOrderedCollection<T: OrderedItem> {
    items: Vec<T>,
    base: OrderBase,
    in_flight: Option<InFlight<T>>,
    pending_deletes: HashSet<T::Id>,
    next_ticket: MutationTicket,
    phase: MutationPhase,
}

impl<T: OrderedItem> OptimisticOrderedCollection<T> {
    pub fn new(base: OrderBase) -> Self {
        Self {
            items: Vec::new(),
            base,
            in_flight: None,
            pending_deletes: HashSet::new(),
            next_ticket: 1,
            phase: MutationPhase::Idle,
        }
    }

    pub fn with_items(items: Vec<T>, base: OrderBase) -> Self {
        let mut collection = Self::new(base);
        collection.load(items);
        collection
    }

    /// Replace the collection wholesale with freshly fetched items.
    /// A mutation still in flight becomes stale and its resolution is ignored.
    pub fn load(&mut self, mut items: Vec<T>) {
        if let Some(stale) = self.in_flight.take() {
            warn!("reload while mutation #{} in flight, dropping its snapshot", stale.ticket);
        }
        items.sort_by_key(|item| item.display_order());
        renumber(&mut items, self.base);
        self.items = items;
        self.pending_deletes.clear();
        self.phase = MutationPhase::Idle;
        debug!("collection loaded: {} items", self.items.len());
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn base(&self) -> OrderBase {
        self.base
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn phase(&self) -> MutationPhase {
        self.phase
    }

    /// A mutation is waiting on the server
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_pending_delete(&self, id: &T::Id) -> bool {
        self.pending_deletes.contains(id)
    }

    /// State the collection would roll back to
    pub fn snapshot(&self) -> Option<&[T]> {
        self.in_flight.as_ref().map(|f| f.snapshot.as_slice())
    }

    /// Show `new_order` immediately. Returns `None` when the order did not change.
    pub fn apply_reorder(&mut self, new_order: Vec<T>) -> SyncResult<Option<PendingMutation<T::Id>>> {
        if self.is_busy() {
            return Err(SyncError::MutationInProgress);
        }
        self.check_permutation(&new_order)?;

        let unchanged = new_order
            .iter()
            .zip(self.items.iter())
            .all(|(a, b)| a.id() == b.id());
        if unchanged {
            debug!("reorder matches current order, skipping");
            return Ok(None);
        }

        let mut next = new_order;
        renumber(&mut next, self.base);
        let snapshot = std::mem::replace(&mut self.items, next);
        let kind = MutationKind::Reorder(order_entries(&self.items));

        Ok(Some(self.begin(kind, snapshot, None)))
    }

    /// Hide item `id` immediately and mark it pending deletion
    pub fn apply_delete(&mut self, id: &T::Id) -> SyncResult<PendingMutation<T::Id>> {
        if self.pending_deletes.contains(id) {
            return Err(SyncError::DuplicateDelete(id.to_string()));
        }
        if self.is_busy() {
            return Err(SyncError::MutationInProgress);
        }
        let index = index_of(&self.items, id).ok_or_else(|| SyncError::NotFound(id.to_string()))?;

        let snapshot = self.items.clone();
        self.items.remove(index);
        renumber(&mut self.items, self.base);
        self.pending_deletes.insert(id.clone());

        Ok(self.begin(MutationKind::Delete(id.clone()), snapshot, Some(id.clone())))
    }

    /// Apply the reconciliation policy for `ticket`
    pub fn resolve(&mut self, ticket: MutationTicket, outcome: PersistOutcome) -> Resolution {
        let in_flight = match self.in_flight.take() {
            Some(f) if f.ticket == ticket => f,
            other => {
                self.in_flight = other;
                debug!("ignoring resolution of stale mutation #{}", ticket);
                return Resolution::Stale;
            }
        };
        if let Some(id) = &in_flight.deleted {
            self.pending_deletes.remove(id);
        }

        match outcome {
            PersistOutcome::Success { message } => {
                info!("mutation #{} committed", ticket);
                self.phase = MutationPhase::Confirmed;
                Resolution::Committed { message }
            }
            PersistOutcome::Failure(reason) => {
                warn!("mutation #{} failed, rolling back: {}", ticket, reason);
                self.items = in_flight.snapshot;
                self.phase = MutationPhase::RolledBack;
                let notice = format!("{}: {}", in_flight.label, reason);
                Resolution::RolledBack { reason, notice }
            }
            PersistOutcome::Cancelled => {
                debug!("mutation #{} cancelled, discarding", ticket);
                self.items = in_flight.snapshot;
                self.phase = MutationPhase::RolledBack;
                Resolution::Discarded
            }
        }
    }

    /// Restore the in-flight snapshot. No-op (false) once the mutation resolved.
    pub fn rollback(&mut self) -> bool {
        match self.in_flight.take() {
            Some(in_flight) => {
                if let Some(id) = &in_flight.deleted {
                    self.pending_deletes.remove(id);
                }
                self.items = in_flight.snapshot;
                self.phase = MutationPhase::RolledBack;
                true
            }
            None => false,
        }
    }

    fn begin(
        &mut self,
        kind: MutationKind<T::Id>,
        snapshot: Vec<T>,
        deleted: Option<T::Id>,
    ) -> PendingMutation<T::Id> {
        debug_assert!(is_dense(&self.items, self.base));
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight = Some(InFlight {
            ticket,
            label: kind.failure_label(),
            snapshot,
            deleted,
        });
        self.phase = MutationPhase::OptimisticallyApplied;
        debug!("mutation #{} applied optimistically", ticket);
        PendingMutation { ticket, kind }
    }

    fn check_permutation(&self, new_order: &[T]) -> SyncResult<()> {
        if new_order.len() != self.items.len() {
            return Err(SyncError::InvalidOrder(format!(
                "expected {} items, got {}",
                self.items.len(),
                new_order.len()
            )));
        }
        let current: HashSet<T::Id> = self.items.iter().map(|item| item.id()).collect();
        let mut seen = HashSet::with_capacity(new_order.len());
        for item in new_order {
            let id = item.id();
            if !current.contains(&id) {
                return Err(SyncError::InvalidOrder(format!("unknown id {}", id)));
            }
            if !seen.insert(id.clone()) {
                return Err(SyncError::InvalidOrder(format!("duplicate id {}", id)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::test_support::*;
    use crate::reconcile::FailureReason;

    fn abc() -> OptimisticOrderedCollection<Row> {
        OptimisticOrderedCollection::with_items(rows(&["A", "B", "C"]), OrderBase::Zero)
    }

    fn reordered(ids: &[&str]) -> Vec<Row> {
        rows(ids)
    }

    #[test]
    fn test_load_sorts_and_renumbers() {
        let mut items = rows(&["A", "B", "C"]);
        items[0].order = 10;
        items[1].order = 3;
        items[2].order = 5;
        let collection = OptimisticOrderedCollection::with_items(items, OrderBase::One);
        assert_eq!(ids(collection.items()), vec!["B", "C", "A"]);
        assert!(is_dense(collection.items(), OrderBase::One));
    }

    #[test]
    fn test_reorder_then_commit() {
        let mut collection = abc();
        let pending = collection.apply_reorder(reordered(&["B", "C", "A"])).unwrap().unwrap();

        assert_eq!(ids(collection.items()), vec!["B", "C", "A"]);
        assert_eq!(collection.phase(), MutationPhase::OptimisticallyApplied);
        assert_eq!(
            pending.kind,
            MutationKind::Reorder(vec![
                OrderEntry { id: "B".to_string(), order: 0 },
                OrderEntry { id: "C".to_string(), order: 1 },
                OrderEntry { id: "A".to_string(), order: 2 },
            ])
        );

        let resolution = collection.resolve(pending.ticket, PersistOutcome::Success { message: None });
        assert_eq!(resolution, Resolution::Committed { message: None });
        assert_eq!(collection.phase(), MutationPhase::Confirmed);
        assert!(collection.snapshot().is_none());

        // commit discards the snapshot, so rollback has nothing to restore
        assert!(!collection.rollback());
        assert_eq!(ids(collection.items()), vec!["B", "C", "A"]);
    }

    #[test]
    fn test_reorder_failure_restores_exact_snapshot() {
        let mut collection = abc();
        let original = collection.items().to_vec();
        let pending = collection.apply_reorder(reordered(&["C", "A", "B"])).unwrap().unwrap();

        let resolution = collection.resolve(
            pending.ticket,
            PersistOutcome::Failure(FailureReason::Status { code: 500, message: None }),
        );
        assert_eq!(collection.items(), original.as_slice());
        assert_eq!(collection.phase(), MutationPhase::RolledBack);
        assert_eq!(
            resolution.notice(),
            Some("Couldn't save the new order: server error 500")
        );
    }

    #[test]
    fn test_unchanged_reorder_issues_nothing() {
        let mut collection = abc();
        assert_eq!(collection.apply_reorder(reordered(&["A", "B", "C"])), Ok(None));
        assert!(!collection.is_busy());
    }

    #[test]
    fn test_reorder_rejects_non_permutations() {
        let mut collection = abc();
        assert!(matches!(
            collection.apply_reorder(reordered(&["A", "B"])),
            Err(SyncError::InvalidOrder(_))
        ));
        assert!(matches!(
            collection.apply_reorder(reordered(&["A", "A", "C"])),
            Err(SyncError::InvalidOrder(_))
        ));
        assert!(matches!(
            collection.apply_reorder(reordered(&["A", "B", "Z"])),
            Err(SyncError::InvalidOrder(_))
        ));
    }

    #[test]
    fn test_delete_failure_reverts() {
        let mut collection = abc();
        let pending = collection.apply_delete(&"B".to_string()).unwrap();

        assert_eq!(ids(collection.items()), vec!["A", "C"]);
        assert!(is_dense(collection.items(), OrderBase::Zero));
        assert!(collection.is_pending_delete(&"B".to_string()));
        assert_eq!(pending.kind, MutationKind::Delete("B".to_string()));

        let resolution = collection.resolve(
            pending.ticket,
            PersistOutcome::Failure(FailureReason::Rejected(None)),
        );
        assert!(matches!(resolution, Resolution::RolledBack { .. }));
        assert_eq!(ids(collection.items()), vec!["A", "B", "C"]);
        assert!(!collection.is_pending_delete(&"B".to_string()));
    }

    #[test]
    fn test_duplicate_delete_is_suppressed() {
        let mut collection = abc();
        collection.apply_delete(&"B".to_string()).unwrap();
        assert_eq!(
            collection.apply_delete(&"B".to_string()),
            Err(SyncError::DuplicateDelete("B".to_string()))
        );
    }

    #[test]
    fn test_second_mutation_rejected_while_busy() {
        let mut collection = abc();
        let first = collection.apply_delete(&"A".to_string()).unwrap();

        assert_eq!(
            collection.apply_delete(&"C".to_string()),
            Err(SyncError::MutationInProgress)
        );
        assert_eq!(
            collection.apply_reorder(reordered(&["C", "B"])),
            Err(SyncError::MutationInProgress)
        );

        collection.resolve(first.ticket, PersistOutcome::Success { message: None });
        assert!(collection.apply_delete(&"C".to_string()).is_ok());
    }

    #[test]
    fn test_delete_unknown_id() {
        let mut collection = abc();
        assert_eq!(
            collection.apply_delete(&"Q".to_string()),
            Err(SyncError::NotFound("Q".to_string()))
        );
    }

    #[test]
    fn test_cancelled_discards_silently() {
        let mut collection = abc();
        let pending = collection.apply_delete(&"C".to_string()).unwrap();
        let resolution = collection.resolve(pending.ticket, PersistOutcome::Cancelled);
        assert_eq!(resolution, Resolution::Discarded);
        assert_eq!(resolution.notice(), None);
        assert_eq!(ids(collection.items()), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_resolution_after_reload_is_stale() {
        let mut collection = abc();
        let pending = collection.apply_delete(&"A".to_string()).unwrap();
        collection.load(rows(&["X", "Y"]));

        let resolution = collection.resolve(
            pending.ticket,
            PersistOutcome::Failure(FailureReason::TimedOut),
        );
        assert_eq!(resolution, Resolution::Stale);
        assert_eq!(ids(collection.items()), vec!["X", "Y"]);
    }

    #[test]
    fn test_orders_stay_dense_across_mutations() {
        let mut collection = OptimisticOrderedCollection::with_items(rows(&["A", "B", "C", "D"]), OrderBase::One);
        let p = collection.apply_delete(&"B".to_string()).unwrap();
        assert!(is_dense(collection.items(), OrderBase::One));
        collection.resolve(p.ticket, PersistOutcome::Success { message: None });

        let p = collection.apply_reorder(reordered(&["D", "A", "C"])).unwrap().unwrap();
        assert!(is_dense(collection.items(), OrderBase::One));
        collection.resolve(p.ticket, PersistOutcome::Failure(FailureReason::TimedOut));
        assert!(is_dense(collection.items(), OrderBase::One));
        assert_eq!(ids(collection.items()), vec!["A", "C", "D"]);
    }
}
