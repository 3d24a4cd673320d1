//! Lent-order reconciliation.
//!
//! Closing a lending order means deciding, for every item still out on
//! loan, whether it goes back to stock, becomes a sale, or is written off.
//! This module turns those decisions into the three identifier lists the
//! backend expects.
//!
//! # Flow
//!
//! 1. [`default_destinations`] seeds every eligible item with
//!    [`Destination::Return`]; the caller then overrides individual entries.
//! 2. [`validate_and_build_command`] checks the input and assembles a
//!    [`ReconciliationCommand`].
//! 3. The caller submits the command once.
//!
//! [`classify`] and [`group_by_destination`] are the building blocks and are
//! exposed for previews.
//!
//! # Identity
//!
//! An item's destination is looked up by its product barcode when it has
//! one, otherwise by its box barcode. Sales quantities are always keyed by
//! box barcode.
//!
//! # Quantity conservation
//!
//! A non-serialized box sold in part is split: the sold units go to sales
//! and the rest go back to stock, so the two always add up to the lent
//! quantity. Returned and broken boxes always move in full.

use std::collections::HashMap;

use crate::types::{Destination, LentLineItem};

mod classify;
mod command;
mod error;
mod group;

pub use classify::{ClassifiedItem, classify};
pub use command::{DEFAULT_NOTE, ReconciliationCommand, validate_and_build_command};
pub use error::{ReconcileError, SalesQuantityProblem};
pub use group::{DestinationGroups, Grouping, UnitTotals, group_by_destination};

/// Item identity (product or box barcode) to chosen destination.
pub type DestinationMap = HashMap<String, Destination>;

/// Box barcode to number of units sold, for non-serialized sales.
pub type SalesQuantityMap = HashMap<String, u32>;

/// Default every eligible item to [`Destination::Return`].
#[must_use]
pub fn default_destinations(line_items: &[LentLineItem]) -> DestinationMap {
    line_items
        .iter()
        .filter(|item| item.is_eligible())
        .map(|item| (item.identity().to_owned(), Destination::Return))
        .collect()
}
