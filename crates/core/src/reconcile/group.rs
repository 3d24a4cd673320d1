//! Grouping classified items by destination.

use serde::Serialize;

use crate::types::{Destination, Identifier, LentLineItem};

use super::classify::{ClassifiedItem, classify};
use super::error::ReconcileError;
use super::{DestinationMap, SalesQuantityMap};

/// Identifiers to submit, one list per destination, in line-item order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationGroups {
    /// Back to stock, including remainders of partial sales.
    pub return_to_stock: Vec<Identifier>,
    /// Converted to sales.
    pub move_to_sales: Vec<Identifier>,
    /// Written off.
    pub mark_as_broken: Vec<Identifier>,
}

impl DestinationGroups {
    /// Append an identifier to the list for `destination`.
    pub fn push(&mut self, destination: Destination, identifier: Identifier) {
        match destination {
            Destination::Return => self.return_to_stock.push(identifier),
            Destination::Sales => self.move_to_sales.push(identifier),
            Destination::Broken => self.mark_as_broken.push(identifier),
        }
    }

    /// Append every placement of a classified item.
    pub fn add(&mut self, classified: ClassifiedItem) {
        let ClassifiedItem {
            destination,
            identifier,
            remainder,
        } = classified;

        self.push(destination, identifier);
        if let Some(remainder) = remainder {
            self.push(Destination::Return, remainder);
        }
    }

    /// The list for `destination`.
    #[must_use]
    pub fn list(&self, destination: Destination) -> &[Identifier] {
        match destination {
            Destination::Return => &self.return_to_stock,
            Destination::Sales => &self.move_to_sales,
            Destination::Broken => &self.mark_as_broken,
        }
    }

    /// Whether all three lists are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.return_to_stock.is_empty()
            && self.move_to_sales.is_empty()
            && self.mark_as_broken.is_empty()
    }

    /// Units moved to each destination.
    #[must_use]
    pub fn unit_totals(&self) -> UnitTotals {
        let sum = |ids: &[Identifier]| {
            ids.iter()
                .map(|id| u64::from(id.quantity()))
                .sum::<u64>()
        };
        UnitTotals {
            returned: sum(&self.return_to_stock),
            sold: sum(&self.move_to_sales),
            broken: sum(&self.mark_as_broken),
        }
    }
}

/// Units per destination, for previews.
///
/// Counted in `u64` so that many large boxes cannot overflow the sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UnitTotals {
    pub returned: u64,
    pub sold: u64,
    pub broken: u64,
}

impl UnitTotals {
    /// Units across all destinations.
    #[must_use]
    pub const fn total(&self) -> u64 {
        self.returned + self.sold + self.broken
    }
}

/// Result of grouping: what could be classified, plus every item-level error.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grouping {
    pub groups: DestinationGroups,
    pub errors: Vec<ReconcileError>,
}

impl Grouping {
    /// The groups if no item failed, otherwise the first error.
    ///
    /// # Errors
    ///
    /// Returns the first collected [`ReconcileError`].
    pub fn into_result(self) -> Result<DestinationGroups, ReconcileError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(self.groups),
        }
    }
}

/// Classify every line item and group the identifiers by destination.
///
/// Failing items contribute to no list; their errors are collected and
/// classification carries on with the remaining items. Identifiers keep the
/// order of `line_items`.
#[must_use]
pub fn group_by_destination(
    line_items: &[LentLineItem],
    destinations: &DestinationMap,
    sales_quantities: &SalesQuantityMap,
) -> Grouping {
    let mut grouping = Grouping::default();

    for item in line_items {
        match classify(item, destinations, sales_quantities) {
            Ok(Some(classified)) => grouping.groups.add(classified),
            Ok(None) => {}
            Err(err) => grouping.errors.push(err),
        }
    }

    grouping
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::LineItemStatus;

    fn wire(ids: &[Identifier]) -> Vec<String> {
        ids.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_groups_preserve_input_order() {
        let items = vec![
            LentLineItem::serialized("L-1", "Drill", "B1", "P2"),
            LentLineItem::non_serialized("L-1", "Screws", "B9", 5),
            LentLineItem::serialized("L-1", "Drill", "B1", "P1"),
        ];
        let destinations = DestinationMap::from([
            ("P1".to_string(), Destination::Return),
            ("P2".to_string(), Destination::Return),
            ("B9".to_string(), Destination::Return),
        ]);

        let groups = group_by_destination(&items, &destinations, &SalesQuantityMap::new())
            .into_result()
            .unwrap();

        assert_eq!(wire(&groups.return_to_stock), vec!["P2", "B9:5", "P1"]);
    }

    #[test]
    fn test_errors_are_collected_and_grouping_continues() {
        let items = vec![
            LentLineItem::serialized("L-1", "Drill", "B1", "P1"),
            LentLineItem::non_serialized("L-1", "Screws", "B9", 5),
            LentLineItem::serialized("L-1", "Saw", "B3", "P3"),
        ];
        let destinations = DestinationMap::from([
            ("P3".to_string(), Destination::Broken),
            ("B9".to_string(), Destination::Sales),
        ]);

        let grouping = group_by_destination(&items, &destinations, &SalesQuantityMap::new());

        assert_eq!(grouping.errors.len(), 2);
        assert!(matches!(
            grouping.errors.first(),
            Some(ReconcileError::MissingDestination { .. })
        ));
        assert!(matches!(
            grouping.errors.get(1),
            Some(ReconcileError::InvalidSalesQuantity { .. })
        ));
        assert_eq!(wire(&grouping.groups.mark_as_broken), vec!["P3"]);
        assert!(grouping.into_result().is_err());
    }

    #[test]
    fn test_processed_items_never_grouped() {
        let items = vec![
            LentLineItem::serialized("L-1", "Drill", "B1", "P1").with_status(LineItemStatus::Processed),
        ];
        let destinations = DestinationMap::from([("P1".to_string(), Destination::Sales)]);

        let grouping = group_by_destination(&items, &destinations, &SalesQuantityMap::new());
        assert!(grouping.errors.is_empty());
        assert!(grouping.groups.is_empty());
    }

    #[test]
    fn test_unit_totals() {
        let mut groups = DestinationGroups::default();
        groups.push(Destination::Sales, Identifier::non_serialized("B2", 4));
        groups.push(Destination::Return, Identifier::non_serialized("B2", 6));
        groups.push(Destination::Broken, Identifier::serialized("P1"));

        let totals = groups.unit_totals();
        assert_eq!(
            totals,
            UnitTotals {
                returned: 6,
                sold: 4,
                broken: 1
            }
        );
        assert_eq!(totals.total(), 11);
        assert_eq!(groups.list(Destination::Sales).len(), 1);
    }

    #[test]
    fn test_unit_totals_beyond_u32() {
        let items = vec![
            LentLineItem::non_serialized("L-1", "Washers", "B1", u32::MAX),
            LentLineItem::non_serialized("L-1", "Nuts", "B2", 1),
            LentLineItem::non_serialized("L-1", "Bolts", "B3", u32::MAX),
        ];
        let destinations = DestinationMap::from([
            ("B1".to_string(), Destination::Return),
            ("B2".to_string(), Destination::Return),
            ("B3".to_string(), Destination::Broken),
        ]);

        let totals = group_by_destination(&items, &destinations, &SalesQuantityMap::new())
            .into_result()
            .unwrap()
            .unit_totals();

        assert_eq!(totals.returned, u64::from(u32::MAX) + 1);
        assert_eq!(totals.broken, u64::from(u32::MAX));
        assert_eq!(totals.total(), 2 * u64::from(u32::MAX) + 1);
    }
}
