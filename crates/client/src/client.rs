//! Inventory backend REST client.
//!
//! Provides access to the lending endpoints of the inventory backend:
//! reading lending orders and their lines, and processing a lending order
//! with a reconciliation command.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;

use lendstock_core::reconcile::ReconciliationCommand;
use lendstock_core::{LentLineItem, LentOrder, OrderId};

use crate::backend::{OrderCommandSink, OrderDirectory, SubmissionReceipt};
use crate::config::ApiConfig;
use crate::error::ApiError;

/// Inventory backend REST client.
///
/// Cheap to clone; clones share the underlying connection pool.
///
/// # Authentication
///
/// When a token is configured it is sent as `Authorization: Bearer <token>`
/// on every request.
#[derive(Clone)]
pub struct InventoryApiClient {
    inner: Arc<InventoryApiClientInner>,
}

struct InventoryApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl std::fmt::Debug for InventoryApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("token", &self.inner.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl InventoryApiClient {
    /// Create a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Http` if the HTTP client cannot be created.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(InventoryApiClientInner {
                client,
                base_url: config.base_url.clone(),
                token: config.token.clone(),
            }),
        })
    }

    // =========================================================================
    // Lending orders
    // =========================================================================

    /// Fetch a lending order header.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the order does not exist, or any other
    /// `ApiError` on transport, auth or decode failures.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_lent_order(&self, order_id: &OrderId) -> Result<LentOrder, ApiError> {
        let url = self.endpoint(&["lent-ids", order_id.as_str()])?;
        let response = self.request(Method::GET, url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(format!("lent order {order_id}")));
        }

        read_json(response).await
    }

    /// Fetch every line of a lending order, including processed ones.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the order does not exist, or any other
    /// `ApiError` on transport, auth or decode failures.
    #[instrument(skip(self), fields(order_id = %order_id))]
    pub async fn get_lent_line_items(
        &self,
        order_id: &OrderId,
    ) -> Result<Vec<LentLineItem>, ApiError> {
        let url = self.endpoint(&["lent-items", "order", order_id.as_str()])?;
        let response = self.request(Method::GET, url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(format!("lent items for order {order_id}")));
        }

        let items: Vec<LentLineItem> = read_json(response).await?;
        tracing::debug!(count = items.len(), "Fetched lent line items");
        Ok(items)
    }

    /// Process a lending order with a reconciliation command.
    ///
    /// The request is sent exactly once. Any non-success response is
    /// returned as-is; the caller decides what to do with it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Rejected` with the backend's status and body on a
    /// non-success response, `ApiError::Unauthorized` on 401/403, or
    /// `ApiError::Http` on transport failures.
    #[instrument(
        skip(self, command),
        fields(
            order_id = %order_id,
            returned = command.return_to_stock.len(),
            sold = command.move_to_sales.len(),
            broken = command.mark_as_broken.len(),
        )
    )]
    pub async fn process_lent_order(
        &self,
        order_id: &OrderId,
        command: &ReconciliationCommand,
    ) -> Result<SubmissionReceipt, ApiError> {
        let url = self.endpoint(&["lent-orders", "orders", order_id.as_str(), "process"])?;
        let response = self
            .request(Method::POST, url)
            .json(command)
            .send()
            .await?;

        let response = check_status(response).await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        let body = if text.trim().is_empty() {
            None
        } else {
            Some(serde_json::from_str(&text).unwrap_or(serde_json::Value::String(text)))
        };

        Ok(SubmissionReceipt { status, body })
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| ApiError::InvalidUrl(self.inner.base_url.to_string()))?;
            path.pop_if_empty().extend(segments);
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self
            .inner
            .client
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");

        match &self.inner.token {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        }
    }
}

/// Turn a non-success response into an error, keeping its body.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ApiError::Unauthorized {
            status: status.as_u16(),
            body,
        });
    }

    Err(ApiError::Rejected {
        status: status.as_u16(),
        body,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl OrderDirectory for InventoryApiClient {
    async fn lent_order(&self, order_id: &OrderId) -> Result<LentOrder, ApiError> {
        self.get_lent_order(order_id).await
    }

    async fn lent_line_items(&self, order_id: &OrderId) -> Result<Vec<LentLineItem>, ApiError> {
        self.get_lent_line_items(order_id).await
    }
}

#[async_trait]
impl OrderCommandSink for InventoryApiClient {
    async fn submit_reconciliation(
        &self,
        order_id: &OrderId,
        command: &ReconciliationCommand,
    ) -> Result<SubmissionReceipt, ApiError> {
        self.process_lent_order(order_id, command).await
    }
}
