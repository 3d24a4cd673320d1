//! Collaborator interfaces for the inventory backend.
//!
//! The reconciliation service only needs two things from the backend: a way
//! to read a lending order and its lines, and a way to hand over the built
//! command. Keeping them as traits lets the service run against the HTTP
//! client in production and against in-memory fakes in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use lendstock_core::reconcile::ReconciliationCommand;
use lendstock_core::{LentLineItem, LentOrder, OrderId};

use crate::error::ApiError;

/// Read access to lending orders.
#[async_trait]
pub trait OrderDirectory: Send + Sync {
    /// Fetch a lending order header.
    async fn lent_order(&self, order_id: &OrderId) -> Result<LentOrder, ApiError>;

    /// Fetch every line of a lending order, whatever its status.
    async fn lent_line_items(&self, order_id: &OrderId) -> Result<Vec<LentLineItem>, ApiError>;
}

/// Accepts reconciliation commands and applies them to inventory.
#[async_trait]
pub trait OrderCommandSink: Send + Sync {
    /// Submit a command once. No retries.
    async fn submit_reconciliation(
        &self,
        order_id: &OrderId,
        command: &ReconciliationCommand,
    ) -> Result<SubmissionReceipt, ApiError>;
}

/// Backend acknowledgement of a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// HTTP status returned by the backend.
    pub status: u16,
    /// Response body, if any. Non-JSON bodies are kept as a string value.
    pub body: Option<serde_json::Value>,
}
