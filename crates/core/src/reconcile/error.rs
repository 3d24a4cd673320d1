//! Reconciliation validation errors.

use thiserror::Error;

use crate::types::LentLineItem;

/// Why a sales quantity was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SalesQuantityProblem {
    /// No quantity was given, or it was zero.
    #[error("enter a quantity between 1 and {available}")]
    Missing {
        /// Units available on the line.
        available: u32,
    },

    /// More units requested than are on the line.
    #[error("{requested} exceeds the available quantity ({available})")]
    ExceedsAvailable {
        /// Units requested for sale.
        requested: u32,
        /// Units available on the line.
        available: u32,
    },
}

/// Errors raised before a reconciliation command is built.
///
/// All of these are corrected by changing the input and trying again; none
/// is retryable as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// An eligible item has no destination.
    #[error("Please select a destination for {product_name} ({identity})")]
    MissingDestination {
        /// Display name of the offending item.
        product_name: String,
        /// Product or box barcode used as its identity.
        identity: String,
    },

    /// A non-serialized item destined for sales has an unusable quantity.
    #[error("Invalid sales quantity for {product_name} ({box_barcode}): {cause}")]
    InvalidSalesQuantity {
        /// Display name of the offending item.
        product_name: String,
        /// Box barcode of the offending item.
        box_barcode: String,
        /// What is wrong with the quantity.
        cause: SalesQuantityProblem,
    },

    /// Items are destined for sales but no sales order was named.
    #[error("Please enter an invoice number for items marked for sales")]
    MissingSalesOrderId,

    /// Nothing would be submitted.
    #[error("Please select a destination for at least one item")]
    NoItemsSelected,

    /// The same serialized unit appears twice among eligible items.
    #[error("{product_name} ({product_barcode}) is listed more than once")]
    DuplicateSerial {
        /// Display name of the offending item.
        product_name: String,
        /// The repeated product barcode.
        product_barcode: String,
    },

    /// Two eligible non-serialized lines share a box barcode.
    ///
    /// Destinations and sales quantities are keyed by box barcode, so such
    /// lines cannot be told apart.
    #[error("{product_name} ({box_barcode}) shares its box with another lent line")]
    DuplicateBox {
        /// Display name of the second line with the box.
        product_name: String,
        /// The repeated box barcode.
        box_barcode: String,
    },
}

impl ReconcileError {
    pub(crate) fn missing_destination(item: &LentLineItem) -> Self {
        Self::MissingDestination {
            product_name: item.product_name.clone(),
            identity: item.identity().to_owned(),
        }
    }

    pub(crate) fn invalid_sales_quantity(item: &LentLineItem, cause: SalesQuantityProblem) -> Self {
        Self::InvalidSalesQuantity {
            product_name: item.product_name.clone(),
            box_barcode: item.box_barcode.clone(),
            cause,
        }
    }

    /// The product name of the offending item, for item-scoped errors.
    #[must_use]
    pub fn product_name(&self) -> Option<&str> {
        match self {
            Self::MissingDestination { product_name, .. }
            | Self::InvalidSalesQuantity { product_name, .. }
            | Self::DuplicateSerial { product_name, .. }
            | Self::DuplicateBox { product_name, .. } => Some(product_name),
            Self::MissingSalesOrderId | Self::NoItemsSelected => None,
        }
    }
}
