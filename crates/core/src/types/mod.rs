//! Core types for Lendstock.
//!
//! This module provides type-safe wrappers for lending-domain concepts.

pub mod id;
pub mod identifier;
pub mod line_item;
pub mod status;

pub use id::*;
pub use identifier::{Identifier, IdentifierError};
pub use line_item::{LentLineItem, LentOrder};
pub use status::*;
