//! Ordered List Controller
//!
//! Wires one optimistic collection to its drag list, its backend and the
//! notice board. Links and the badge showcase both run through this.

use futures::future::pending;
use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_dragdrop::{create_drag_list, DragList, SortableItem};
use ordered_sync::{
    persist, CancellationToken, OptimisticOrderedCollection, OrderBackend, OrderBase, OrderedItem,
    PendingMutation, Resolution, SyncError,
};

use crate::context::AppContext;

/// Reactive handle for one ordered collection
pub struct OrderedListController<B>
where
    B: OrderBackend + Clone + 'static,
    B::Item: SortableItem,
{
    collection: RwSignal<OptimisticOrderedCollection<B::Item>>,
    pub drag: DragList<B::Item>,
    backend: StoredValue<B, LocalStorage>,
    /// Cancelled when the owning component unmounts
    cancel: StoredValue<CancellationToken>,
    loading: RwSignal<bool>,
    ctx: AppContext,
}

impl<B> Clone for OrderedListController<B>
where
    B: OrderBackend + Clone + 'static,
    B::Item: SortableItem,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<B> Copy for OrderedListController<B>
where
    B: OrderBackend + Clone + 'static,
    B::Item: SortableItem,
{
}

impl<B> OrderedListController<B>
where
    B: OrderBackend + Clone + 'static,
    B::Item: SortableItem,
{
    /// Create a controller owned by the current reactive owner
    pub fn new(backend: B, base: OrderBase, ctx: AppContext) -> Self {
        let cancel = CancellationToken::new();
        let on_unmount = cancel.clone();
        on_cleanup(move || on_unmount.cancel());

        Self {
            collection: RwSignal::new(OptimisticOrderedCollection::new(base)),
            drag: create_drag_list(base),
            backend: StoredValue::new_local(backend),
            cancel: StoredValue::new(cancel),
            loading: RwSignal::new(false),
            ctx,
        }
    }

    /// Committed items (tracked)
    pub fn items(&self) -> Signal<Vec<B::Item>> {
        let collection = self.collection;
        Signal::derive(move || collection.with(|c| c.items().to_vec()))
    }

    /// Rows to render, drag preview included (tracked)
    pub fn visible(&self) -> Vec<B::Item> {
        self.collection.with(|c| self.drag.visible(c.items()))
    }

    /// A save is waiting on the server (tracked)
    pub fn busy(&self) -> Signal<bool> {
        let collection = self.collection;
        Signal::derive(move || collection.with(|c| c.is_busy()))
    }

    pub fn loading(&self) -> Signal<bool> {
        self.loading.into()
    }

    /// Fetch the whole collection and replace local state
    pub fn load(&self) {
        let this = *self;
        this.loading.set(true);
        spawn_local(async move {
            let Some(backend) = this.backend.try_get_value() else {
                return;
            };
            match backend.fetch().await {
                Ok(items) => {
                    log::debug!("[LIST] loaded {} items", items.len());
                    this.collection.try_update(|c| c.load(items));
                }
                Err(e) => {
                    log::warn!("[LIST] load failed: {}", e);
                    this.ctx.notify_error(format!("Couldn't load: {}", e));
                }
            }
            this.loading.try_set(false);
        });
    }

    /// Apply a dropped order and persist it
    pub fn reorder(&self, order: Vec<B::Item>) {
        match self.collection.try_update(|c| c.apply_reorder(order)) {
            Some(Ok(Some(mutation))) => self.save(mutation),
            Some(Ok(None)) => {}
            Some(Err(e)) => self.reject(e),
            None => {}
        }
    }

    /// Hide an item and ask the backend to delete it
    pub fn delete(&self, id: <B::Item as OrderedItem>::Id) {
        match self.collection.try_update(|c| c.apply_delete(&id)) {
            Some(Ok(mutation)) => self.save(mutation),
            Some(Err(e)) => self.reject(e),
            None => {}
        }
    }

    fn reject(&self, e: SyncError) {
        match e {
            // Double click on a row already being deleted
            SyncError::DuplicateDelete(_) => log::debug!("[LIST] {}", e),
            other => {
                log::warn!("[LIST] mutation rejected: {}", other);
                self.ctx.notify_error(other.to_string());
            }
        }
    }

    fn save(&self, mutation: PendingMutation<<B::Item as OrderedItem>::Id>) {
        let this = *self;
        let timeout_ms = self.ctx.config().request_timeout_ms;
        spawn_local(async move {
            // Owner disposed before the task first ran
            let (Some(backend), Some(cancel)) = (this.backend.try_get_value(), this.cancel.try_get_value())
            else {
                return;
            };
            let outcome = persist(&backend, &mutation, &cancel, deadline(timeout_ms)).await;

            match this.collection.try_update(|c| c.resolve(mutation.ticket, outcome)) {
                Some(Resolution::RolledBack { notice, .. }) => this.ctx.notify_error(notice),
                Some(Resolution::Committed { message: Some(text) }) => this.ctx.notify_info(text),
                Some(resolution) => log::debug!("[LIST] mutation #{}: {:?}", mutation.ticket, resolution),
                // Owner disposed; nothing left to update
                None => {}
            }
        });
    }
}

async fn deadline(timeout_ms: Option<u64>) {
    match timeout_ms {
        Some(ms) => TimeoutFuture::new(ms.min(u32::MAX as u64) as u32).await,
        None => pending::<()>().await,
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;
    use std::rc::Rc;

    use any_spawner::Executor;
    use async_trait::async_trait;
    use futures::future::pending;
    use ordered_sync::{Ack, NoticeLevel, OrderEntry, SyncConfig, SyncResult};

    use super::*;
    use crate::models::Link;

    /// Flags the in-flight call as abandoned when its future is dropped
    struct Abandon(Rc<Cell<bool>>);

    impl Drop for Abandon {
        fn drop(&mut self) {
            self.0.set(true);
        }
    }

    #[derive(Clone, Default)]
    struct FakeLinks {
        rows: Rc<RefCell<Vec<Link>>>,
        answers: Rc<RefCell<VecDeque<SyncResult<Ack>>>>,
        /// Mutations never answer
        hang: bool,
        abandoned: Rc<Cell<bool>>,
    }

    impl FakeLinks {
        fn with_links(ids: &[&str]) -> Self {
            let rows = ids
                .iter()
                .enumerate()
                .map(|(i, id)| Link {
                    id: id.to_string(),
                    title: format!("Link {}", id),
                    url: format!("https://example.com/{}", id),
                    icon: None,
                    display_order: i as i32,
                })
                .collect();
            Self {
                rows: Rc::new(RefCell::new(rows)),
                ..Default::default()
            }
        }

        fn hanging(ids: &[&str]) -> Self {
            Self { hang: true, ..Self::with_links(ids) }
        }

        async fn settle(&self) -> SyncResult<Ack> {
            if self.hang {
                let _abandon = Abandon(self.abandoned.clone());
                return pending().await;
            }
            self.answers.borrow_mut().pop_front().unwrap_or_else(|| Ok(Ack::ok()))
        }
    }

    #[async_trait(?Send)]
    impl OrderBackend for FakeLinks {
        type Item = Link;

        async fn fetch(&self) -> SyncResult<Vec<Link>> {
            Ok(self.rows.borrow().clone())
        }

        async fn reorder(&self, _order: &[OrderEntry<String>]) -> SyncResult<Ack> {
            self.settle().await
        }

        async fn delete(&self, _id: &String) -> SyncResult<Ack> {
            self.settle().await
        }
    }

    fn setup() -> (Owner, AppContext) {
        let _ = Executor::init_futures_executor();
        let owner = Owner::new();
        owner.set();
        let mut config = SyncConfig::default();
        config.request_timeout_ms = None;
        (owner, AppContext::new(config))
    }

    fn loaded(backend: FakeLinks, ctx: AppContext) -> OrderedListController<FakeLinks> {
        let controller = OrderedListController::new(backend, OrderBase::Zero, ctx);
        controller.load();
        Executor::poll_local();
        controller
    }

    fn ids(controller: &OrderedListController<FakeLinks>) -> Vec<String> {
        controller.items().get_untracked().into_iter().map(|l| l.id).collect()
    }

    fn reordered(controller: &OrderedListController<FakeLinks>, order: &[&str]) -> Vec<Link> {
        let items = controller.items().get_untracked();
        order
            .iter()
            .filter_map(|id| items.iter().find(|l| l.id == *id).cloned())
            .collect()
    }

    #[test]
    fn test_failed_save_rolls_back_and_flashes_error() {
        let (_owner, ctx) = setup();
        let backend = FakeLinks::with_links(&["A", "B", "C"]);
        backend.answers.borrow_mut().push_back(Ok(Ack::rejected("Link limit reached")));
        let controller = loaded(backend, ctx);
        assert_eq!(ids(&controller), vec!["A", "B", "C"]);

        controller.reorder(reordered(&controller, &["B", "A", "C"]));
        // Visible before the server answers
        assert_eq!(ids(&controller), vec!["B", "A", "C"]);
        assert!(controller.busy().get_untracked());

        Executor::poll_local();
        assert_eq!(ids(&controller), vec!["A", "B", "C"]);
        assert!(!controller.busy().get_untracked());

        let notices = ctx.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert_eq!(notices[0].text, "Couldn't save the new order: Link limit reached");
    }

    #[test]
    fn test_successful_save_is_silent_unless_server_says_something() {
        let (_owner, ctx) = setup();
        let backend = FakeLinks::with_links(&["A", "B"]);
        backend.answers.borrow_mut().push_back(Ok(Ack::ok()));
        backend
            .answers
            .borrow_mut()
            .push_back(Ok(Ack { success: true, message: Some("Link removed".into()) }));
        let controller = loaded(backend, ctx);

        controller.reorder(reordered(&controller, &["B", "A"]));
        Executor::poll_local();
        assert_eq!(ids(&controller), vec!["B", "A"]);
        assert!(ctx.notices().is_empty());

        controller.delete("A".to_string());
        Executor::poll_local();
        assert_eq!(ids(&controller), vec!["B"]);
        let notices = ctx.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Info);
        assert_eq!(notices[0].text, "Link removed");
    }

    #[test]
    fn test_busy_rejection_notifies_but_repeat_delete_does_not() {
        let (_owner, ctx) = setup();
        let controller = loaded(FakeLinks::hanging(&["A", "B", "C"]), ctx);

        controller.delete("A".to_string());
        Executor::poll_local();
        assert_eq!(ids(&controller), vec!["B", "C"]);

        // Second click on the row being deleted
        controller.delete("A".to_string());
        assert!(ctx.notices().is_empty());

        controller.reorder(reordered(&controller, &["C", "B"]));
        let notices = ctx.notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].text, "Another change is still being saved");
        assert_eq!(ids(&controller), vec!["B", "C"]);
    }

    #[test]
    fn test_invalid_order_is_reported() {
        let (_owner, ctx) = setup();
        let controller = loaded(FakeLinks::with_links(&["A", "B"]), ctx);

        controller.reorder(reordered(&controller, &["B"]));
        let notices = ctx.notices();
        assert_eq!(notices.len(), 1);
        assert!(notices[0].text.starts_with("Invalid order"));
        assert_eq!(ids(&controller), vec!["A", "B"]);
        assert!(!controller.busy().get_untracked());
    }

    #[test]
    fn test_unmount_abandons_in_flight_save_without_notice() {
        let (owner, ctx) = setup();
        let backend = FakeLinks::hanging(&["A", "B"]);
        let abandoned = backend.abandoned.clone();

        let list_owner = owner.child();
        let controller = list_owner.with(|| loaded(backend, ctx));
        controller.delete("B".to_string());
        Executor::poll_local();
        assert!(controller.busy().get_untracked());
        assert!(!abandoned.get());

        list_owner.cleanup();
        Executor::poll_local();

        assert!(abandoned.get());
        assert!(ctx.notices().is_empty());
    }
}
