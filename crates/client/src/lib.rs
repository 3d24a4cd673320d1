//! Lendstock Client - Inventory backend access and reconciliation submission.
//!
//! # Modules
//!
//! - [`config`] - Backend URL, token and timeout from environment variables
//! - [`client`] - REST client for the lending endpoints
//! - [`backend`] - Collaborator traits the service is written against
//! - [`service`] - Load, validate and submit lent-order reconciliations
//! - [`error`] - API and service errors
//!
//! # Example
//!
//! ```rust,ignore
//! use lendstock_client::{ApiConfig, InventoryApiClient, ReconciliationPlan, ReconciliationService};
//!
//! let client = InventoryApiClient::new(&ApiConfig::from_env()?)?;
//! let service = ReconciliationService::new(client.clone(), client);
//! let outcome = service.process(&"L-100".into(), &ReconciliationPlan::default()).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod client;
pub mod config;
pub mod error;
pub mod service;

pub use backend::{OrderCommandSink, OrderDirectory, SubmissionReceipt};
pub use client::InventoryApiClient;
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ServiceError};
pub use service::{
    PreparedOrder, PreparedReconciliation, ProcessOutcome, ReconciliationPlan,
    ReconciliationService,
};
