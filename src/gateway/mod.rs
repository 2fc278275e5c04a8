use async_trait::async_trait;
use thiserror::Error;

use crate::domain::inventory::{Category, InventoryPayload, InventoryRecord, RecordKey};

pub mod http;

#[cfg(test)]
pub mod mock;

pub use http::HttpInventoryGateway;

/// Result type returned by gateway calls.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors raised while talking to the remote inventory resource.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never produced a response (network, DNS, TLS, ...),
    /// or a success body could not be decoded.
    #[error("inventory request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The resource answered with a non-2xx status.
    #[error("inventory resource returned {status}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Message decoded from the error body, when it carried one.
        message: Option<String>,
    },
    /// The configured base URL cannot carry path segments.
    #[error("invalid inventory base url `{0}`")]
    InvalidBaseUrl(String),
}

/// Read operations over the remote inventory resource.
#[async_trait]
pub trait InventoryReader: Send + Sync {
    /// `GET /inventory/{product_id}/{condition}`
    async fn retrieve(&self, key: &RecordKey) -> GatewayResult<InventoryRecord>;
    /// `GET /inventory` or `GET /inventory/{category}`
    async fn list(&self, category: Option<Category>) -> GatewayResult<Vec<InventoryRecord>>;
}

/// Write operations over the remote inventory resource.
#[async_trait]
pub trait InventoryWriter: Send + Sync {
    /// `POST /inventory`
    async fn create(&self, payload: &InventoryPayload) -> GatewayResult<InventoryRecord>;
    /// `PUT /inventory/{product_id}/{condition}`
    async fn update(
        &self,
        key: &RecordKey,
        payload: &InventoryPayload,
    ) -> GatewayResult<InventoryRecord>;
    /// `DELETE /inventory/{product_id}/{condition}`
    async fn delete(&self, key: &RecordKey) -> GatewayResult<()>;
    /// `PUT` (allowed) or `DELETE` (not allowed) on
    /// `/inventory/{product_id}/{condition}/active`.
    async fn set_can_update(&self, key: &RecordKey, allowed: bool) -> GatewayResult<()>;
}

/// Full access to the inventory resource, as held by the web shell.
pub trait InventoryGateway: InventoryReader + InventoryWriter {}

impl<T> InventoryGateway for T where T: InventoryReader + InventoryWriter + ?Sized {}
