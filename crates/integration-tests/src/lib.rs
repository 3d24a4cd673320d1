//! Integration tests for Lendstock.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p lendstock-integration-tests
//! ```
//!
//! The tests run the real HTTP client and reconciliation service against a
//! mocked inventory backend, so no live backend is needed.
//!
//! # Test Categories
//!
//! - `lent_order_processing` - End-to-end reconciliation of lending orders

use lendstock_client::{ApiConfig, InventoryApiClient, ReconciliationService};
use secrecy::SecretString;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Token the mock backend expects.
pub const TEST_TOKEN: &str = "it-token-7f3a";

/// Path prefix the mock backend serves under.
pub const API_PREFIX: &str = "/api";

/// A mocked inventory backend plus a client pointed at it.
pub struct TestContext {
    pub server: MockServer,
    pub client: InventoryApiClient,
}

impl TestContext {
    /// Start a mock backend and build a client for it.
    ///
    /// # Panics
    ///
    /// Panics if the client cannot be created.
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let base_url = Url::parse(&format!("{}{API_PREFIX}", server.uri()))
            .unwrap_or_else(|e| panic!("mock server URI is not a URL: {e}"));
        let config = ApiConfig::new(base_url).with_token(SecretString::from(TEST_TOKEN));
        let client = InventoryApiClient::new(&config)
            .unwrap_or_else(|e| panic!("failed to create client: {e}"));

        Self { server, client }
    }

    /// A reconciliation service backed by the mock.
    #[must_use]
    pub fn service(&self) -> ReconciliationService<InventoryApiClient, InventoryApiClient> {
        ReconciliationService::new(self.client.clone(), self.client.clone())
    }

    /// Serve an order header at `GET /lent-ids/{id}`.
    pub async fn mount_order(&self, order_id: &str) {
        Mock::given(method("GET"))
            .and(path(format!("{API_PREFIX}/lent-ids/{order_id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(order_json(order_id)))
            .mount(&self.server)
            .await;
    }

    /// Serve line items at `GET /lent-items/order/{id}`.
    pub async fn mount_items(&self, order_id: &str, items: Value) {
        Mock::given(method("GET"))
            .and(path(format!("{API_PREFIX}/lent-items/order/{order_id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(items))
            .mount(&self.server)
            .await;
    }

    /// Path of the process endpoint for `order_id`.
    #[must_use]
    pub fn process_path(order_id: &str) -> String {
        format!("{API_PREFIX}/lent-orders/orders/{order_id}/process")
    }
}

/// Backend order header row.
#[must_use]
pub fn order_json(order_id: &str) -> Value {
    json!({
        "lentId": order_id,
        "employeeId": "E-42",
        "shopName": "Harbour Street",
        "timestamp": "2024-05-02T09:30:00",
        "note": "Trade show loan",
        "status": "active"
    })
}

/// Backend row for a serialized item.
#[must_use]
pub fn serialized_row(order_id: &str, name: &str, box_barcode: &str, serial: &str) -> Value {
    json!({
        "lentId": 1,
        "orderId": order_id,
        "productName": name,
        "boxBarcode": box_barcode,
        "productBarcode": serial,
        "employeeId": "E-42",
        "shopName": "Harbour Street",
        "quantity": 1,
        "status": "lent"
    })
}

/// Backend row for a batch of non-serialized units.
#[must_use]
pub fn batch_row(order_id: &str, name: &str, box_barcode: &str, quantity: u32) -> Value {
    json!({
        "lentId": 2,
        "orderId": order_id,
        "productName": name,
        "boxBarcode": box_barcode,
        "productBarcode": "",
        "employeeId": "E-42",
        "shopName": "Harbour Street",
        "quantity": quantity,
        "status": "lent"
    })
}
