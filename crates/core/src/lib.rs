//! Lendstock Core - Shared types and the lent-order reconciliation engine.
//!
//! This crate provides the types used across all Lendstock components:
//! - `client` - HTTP access to the inventory backend and the submission service
//! - `cli` - Command-line tools for inspecting and reconciling lent orders
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. Reconciliation is a single pass over an immutable snapshot of a
//! lending order, which keeps it testable without a backend.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, statuses, line items and wire identifiers
//! - [`reconcile`] - Classification, validation and command assembly

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod reconcile;
pub mod types;

pub use types::*;
