//! REST Command Wrappers
//!
//! Frontend bindings to the profile backend, organized by domain.

mod badges;
mod links;

use ordered_sync::{Ack, OrderEntry, SyncConfig, SyncError, SyncResult};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::models::ListBody;

pub use badges::BadgeApi;
pub use links::LinkApi;

// ========================
// Request Bodies
// ========================

#[derive(Serialize)]
struct ReorderBody<'a, Id: Serialize> {
    order: &'a [OrderEntry<Id>],
}

// ========================
// Client
// ========================

/// Thin HTTP client bound to the configured API base.
/// Every request carries the session cookie.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: SyncConfig,
}

impl ApiClient {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.http.request(method, self.config.endpoint(path));
        #[cfg(target_arch = "wasm32")]
        let req = req.fetch_credentials_include();
        req
    }

    /// GET a collection endpoint
    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> SyncResult<Vec<T>> {
        let resp = self
            .request(Method::GET, path)
            .send()
            .await
            .map_err(|e| SyncError::Transport(e.to_string()))?;
        let resp = check_status(resp).await?;
        let body: ListBody<T> = resp.json().await.map_err(|e| SyncError::Decode(e.to_string()))?;
        list_items(path, body)
    }

    /// PUT a full order to `path`
    async fn put_order<Id: Serialize>(&self, path: &str, order: &[OrderEntry<Id>]) -> SyncResult<Ack> {
        let req = self.request(Method::PUT, path).json(&ReorderBody { order });
        send_for_ack(req).await
    }

    /// DELETE `{path}/{id}`
    async fn delete_id(&self, path: &str, id: &str) -> SyncResult<Ack> {
        let req = self.request(Method::DELETE, &format!("{}/{}", path, encode_segment(id)));
        send_for_ack(req).await
    }
}

/// Unwrap a list body; an envelope with `success: false` is a rejection
fn list_items<T>(path: &str, body: ListBody<T>) -> SyncResult<Vec<T>> {
    match body {
        ListBody::Bare(items) => Ok(items),
        ListBody::Envelope { success: true, data, .. } => Ok(data),
        ListBody::Envelope { success: false, message, .. } => Err(SyncError::Rejected(
            message.unwrap_or_else(|| format!("{} is unavailable", path)),
        )),
    }
}

/// Percent-encode an id for use as a single path segment
pub fn encode_segment(id: &str) -> String {
    utf8_percent_encode(id, NON_ALPHANUMERIC).to_string()
}

async fn send_for_ack(req: RequestBuilder) -> SyncResult<Ack> {
    let resp = req.send().await.map_err(|e| SyncError::Transport(e.to_string()))?;
    let resp = check_status(resp).await?;
    if resp.status() == StatusCode::NO_CONTENT {
        return Ok(Ack::ok());
    }
    resp.json::<Ack>().await.map_err(|e| SyncError::Decode(e.to_string()))
}

/// Turn non-2xx into `SyncError::Status`, keeping the server's message if it sent one
async fn check_status(resp: Response) -> SyncResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let message = resp.json::<Ack>().await.ok().and_then(|ack| ack.message);
    Err(SyncError::Status { code: status.as_u16(), message })
}
