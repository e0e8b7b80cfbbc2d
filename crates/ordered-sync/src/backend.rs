//! Backend Contract
//!
//! The remote calls an ordered collection depends on. Implementations can
//! talk HTTP, or hold rows in memory for tests.

use async_trait::async_trait;

use crate::error::SyncResult;
use crate::item::{OrderEntry, OrderedItem};
use crate::reconcile::Ack;

/// Persistence calls for one kind of ordered collection.
///
/// Futures are not required to be `Send`: browser fetch futures are not.
#[async_trait(?Send)]
pub trait OrderBackend {
    type Item: OrderedItem;

    /// Full collection, in display order
    async fn fetch(&self) -> SyncResult<Vec<Self::Item>>;

    /// Persist a complete new order
    async fn reorder(&self, order: &[OrderEntry<ItemId<Self>>]) -> SyncResult<Ack>;

    /// Remove one item
    async fn delete(&self, id: &ItemId<Self>) -> SyncResult<Ack>;
}

/// Id type of a backend's items
pub type ItemId<B> = <<B as OrderBackend>::Item as OrderedItem>::Id;
