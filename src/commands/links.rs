//! Link Commands
//!
//! Backend bindings for the profile's link list.

use async_trait::async_trait;
use ordered_sync::{Ack, OrderBackend, OrderEntry, SyncResult};

use super::ApiClient;
use crate::models::Link;

#[derive(Clone)]
pub struct LinkApi {
    client: ApiClient,
}

impl LinkApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl OrderBackend for LinkApi {
    type Item = Link;

    async fn fetch(&self) -> SyncResult<Vec<Link>> {
        self.client.get_list("links").await
    }

    async fn reorder(&self, order: &[OrderEntry<String>]) -> SyncResult<Ack> {
        self.client.put_order("links/order", order).await
    }

    async fn delete(&self, id: &String) -> SyncResult<Ack> {
        self.client.delete_id("links", id).await
    }
}
