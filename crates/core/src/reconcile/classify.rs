//! Per-item classification.

use crate::types::{Destination, Identifier, LentLineItem};

use super::error::{ReconcileError, SalesQuantityProblem};
use super::{DestinationMap, SalesQuantityMap};

/// Outcome of classifying one eligible line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedItem {
    /// The chosen destination.
    pub destination: Destination,
    /// Identifier emitted under `destination`.
    pub identifier: Identifier,
    /// Units of a partially sold box that go back to stock.
    pub remainder: Option<Identifier>,
}

impl ClassifiedItem {
    /// Every `(destination, identifier)` pair this item contributes, the
    /// chosen destination first.
    pub fn placements(&self) -> impl Iterator<Item = (Destination, &Identifier)> {
        std::iter::once((self.destination, &self.identifier)).chain(
            self.remainder
                .as_ref()
                .map(|remainder| (Destination::Return, remainder)),
        )
    }

    /// Total units across all placements.
    #[must_use]
    pub fn units(&self) -> u32 {
        self.placements().map(|(_, id)| id.quantity()).sum()
    }
}

/// Classify a single line item.
///
/// Returns `Ok(None)` for items that are not eligible (status other than
/// `lent`). An eligible item without a destination is an error, never a
/// silent skip.
///
/// # Errors
///
/// - [`ReconcileError::MissingDestination`] if the item's identity has no
///   entry in `destinations`.
/// - [`ReconcileError::InvalidSalesQuantity`] if a non-serialized item is
///   destined for sales without a quantity in `1..=item.quantity`.
pub fn classify(
    item: &LentLineItem,
    destinations: &DestinationMap,
    sales_quantities: &SalesQuantityMap,
) -> Result<Option<ClassifiedItem>, ReconcileError> {
    if !item.is_eligible() {
        return Ok(None);
    }

    let destination = *destinations
        .get(item.identity())
        .ok_or_else(|| ReconcileError::missing_destination(item))?;

    let Some(barcode) = item.product_barcode() else {
        return classify_non_serialized(item, destination, sales_quantities).map(Some);
    };

    Ok(Some(ClassifiedItem {
        destination,
        identifier: Identifier::serialized(barcode),
        remainder: None,
    }))
}

fn classify_non_serialized(
    item: &LentLineItem,
    destination: Destination,
    sales_quantities: &SalesQuantityMap,
) -> Result<ClassifiedItem, ReconcileError> {
    if destination != Destination::Sales {
        return Ok(ClassifiedItem {
            destination,
            identifier: Identifier::non_serialized(&item.box_barcode, item.quantity),
            remainder: None,
        });
    }

    let sold = sales_quantity(item, sales_quantities)?;
    let remaining = item.quantity - sold;

    Ok(ClassifiedItem {
        destination,
        identifier: Identifier::non_serialized(&item.box_barcode, sold),
        remainder: (remaining > 0).then(|| Identifier::non_serialized(&item.box_barcode, remaining)),
    })
}

/// Look up and range-check the sales quantity of a non-serialized item.
pub(crate) fn sales_quantity(
    item: &LentLineItem,
    sales_quantities: &SalesQuantityMap,
) -> Result<u32, ReconcileError> {
    let available = item.quantity;
    match sales_quantities.get(&item.box_barcode).copied() {
        None | Some(0) => Err(ReconcileError::invalid_sales_quantity(
            item,
            SalesQuantityProblem::Missing { available },
        )),
        Some(requested) if requested > available => Err(ReconcileError::invalid_sales_quantity(
            item,
            SalesQuantityProblem::ExceedsAvailable {
                requested,
                available,
            },
        )),
        Some(sold) => Ok(sold),
    }
}
