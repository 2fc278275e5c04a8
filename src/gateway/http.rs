//! reqwest client for the `/inventory` REST resource.
//!
//! Every call is sent once with a JSON content type. Failed responses are
//! decoded with a single policy: a JSON object carrying a string `message`,
//! then a bare JSON string, otherwise no message.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::inventory::{Category, InventoryPayload, InventoryRecord, RecordKey};
use crate::gateway::{GatewayError, GatewayResult, InventoryReader, InventoryWriter};

const RESOURCE: &str = "inventory";
const ACTIVE: &str = "active";
const JSON_CONTENT_TYPE: &str = "application/json";

/// HTTP gateway for one inventory service instance.
#[derive(Clone)]
pub struct HttpInventoryGateway {
    client: Client,
    base_url: Url,
}

impl HttpInventoryGateway {
    /// Create a gateway against `base_url`, e.g. `http://localhost:8000`.
    pub fn new(base_url: &str) -> GatewayResult<Self> {
        Self::with_client(Client::new(), base_url)
    }

    /// Create a gateway reusing an existing [`reqwest::Client`].
    pub fn with_client(client: Client, base_url: &str) -> GatewayResult<Self> {
        let base_url =
            Url::parse(base_url).map_err(|_| GatewayError::InvalidBaseUrl(base_url.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self { client, base_url })
    }

    /// Build `{base}/inventory/{segments...}` with each segment percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> GatewayResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GatewayError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push(RESOURCE)
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.client
            .request(method, url)
            .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
    }

    async fn send(&self, request: RequestBuilder) -> GatewayResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(GatewayError::Status {
            status: status.as_u16(),
            message: decode_error_message(&body),
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> GatewayResult<T> {
        let response = self.send(request).await?;
        Ok(response.json::<T>().await?)
    }
}

/// Extract the operator-facing message from an error body.
pub fn decode_error_message(body: &str) -> Option<String> {
    match serde_json::from_str::<Value>(body).ok()? {
        Value::Object(map) => match map.get("message") {
            Some(Value::String(message)) => Some(message.clone()),
            _ => None,
        },
        Value::String(message) => Some(message),
        _ => None,
    }
}

#[async_trait]
impl InventoryReader for HttpInventoryGateway {
    async fn retrieve(&self, key: &RecordKey) -> GatewayResult<InventoryRecord> {
        let url = self.endpoint(&[key.product_id.as_str(), key.condition.as_str()])?;
        self.send_json(self.request(Method::GET, url)).await
    }

    async fn list(&self, category: Option<Category>) -> GatewayResult<Vec<InventoryRecord>> {
        let url = match category {
            Some(category) => self.endpoint(&[category.as_path_segment()])?,
            None => self.endpoint(&[])?,
        };
        self.send_json(self.request(Method::GET, url)).await
    }
}

#[async_trait]
impl InventoryWriter for HttpInventoryGateway {
    async fn create(&self, payload: &InventoryPayload) -> GatewayResult<InventoryRecord> {
        let url = self.endpoint(&[])?;
        self.send_json(self.request(Method::POST, url).json(payload))
            .await
    }

    async fn update(
        &self,
        key: &RecordKey,
        payload: &InventoryPayload,
    ) -> GatewayResult<InventoryRecord> {
        let url = self.endpoint(&[key.product_id.as_str(), key.condition.as_str()])?;
        self.send_json(self.request(Method::PUT, url).json(payload))
            .await
    }

    async fn delete(&self, key: &RecordKey) -> GatewayResult<()> {
        let url = self.endpoint(&[key.product_id.as_str(), key.condition.as_str()])?;
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    async fn set_can_update(&self, key: &RecordKey, allowed: bool) -> GatewayResult<()> {
        let url = self.endpoint(&[key.product_id.as_str(), key.condition.as_str(), ACTIVE])?;
        let method = if allowed { Method::PUT } else { Method::DELETE };
        self.send(self.request(method, url)).await?;
        Ok(())
    }
}
