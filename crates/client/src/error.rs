//! Error types for backend access and submission.

use lendstock_core::OrderId;
use lendstock_core::reconcile::ReconcileError;
use thiserror::Error;

/// Errors that can occur when talking to the inventory backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An endpoint URL could not be built from the base URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend refused the credentials.
    #[error("Unauthorized (HTTP {status}): {body}")]
    Unauthorized {
        /// HTTP status code (401 or 403).
        status: u16,
        /// Response body, as sent.
        body: String,
    },

    /// The backend answered with a non-success status.
    #[error("Backend rejected request (HTTP {status}): {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, as sent.
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors from preparing or submitting a reconciliation.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The reconciliation input is invalid; nothing was sent.
    #[error(transparent)]
    Validation(#[from] ReconcileError),

    /// The backend call failed; surfaced as-is.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A submission for this order is already outstanding.
    #[error("A submission for order {0} is already in progress")]
    AlreadyInFlight(OrderId),
}
