//! Badge Commands
//!
//! Backend bindings for the badge showcase. Only earned, showcased badges
//! take part in ordering; "delete" takes a badge out of the showcase.

use async_trait::async_trait;
use ordered_sync::{Ack, OrderBackend, OrderEntry, SyncResult};

use super::ApiClient;
use crate::models::Badge;

#[derive(Clone)]
pub struct BadgeApi {
    client: ApiClient,
}

impl BadgeApi {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }
}

#[async_trait(?Send)]
impl OrderBackend for BadgeApi {
    type Item = Badge;

    async fn fetch(&self) -> SyncResult<Vec<Badge>> {
        let badges: Vec<Badge> = self.client.get_list("badges").await?;
        Ok(badges.into_iter().filter(Badge::is_displayable).collect())
    }

    async fn reorder(&self, order: &[OrderEntry<String>]) -> SyncResult<Ack> {
        self.client.put_order("badges/showcase/order", order).await
    }

    async fn delete(&self, id: &String) -> SyncResult<Ack> {
        self.client.delete_id("badges/showcase", id).await
    }
}
