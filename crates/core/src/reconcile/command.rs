//! Validation and assembly of the outbound reconciliation command.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::types::{Destination, EmployeeId, Identifier, LentLineItem, LentOrder};

use super::classify::{classify, sales_quantity};
use super::error::ReconcileError;
use super::group::DestinationGroups;
use super::{DestinationMap, SalesQuantityMap};

/// Note attached to a reconciliation when the caller gives none.
pub const DEFAULT_NOTE: &str = "Batch processing";

/// Request body for processing a lending order.
///
/// Field names and shapes match the backend's batch-process endpoint. The
/// `sales_order_id` is left out of the JSON entirely when nothing moves to
/// sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationCommand {
    pub employee_id: EmployeeId,
    pub shop_name: String,
    pub note: String,
    pub return_to_stock: Vec<String>,
    pub move_to_sales: Vec<String>,
    pub mark_as_broken: Vec<String>,
    /// Reserved by the backend for broken-item condition; always `null` here.
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sales_order_id: Option<String>,
    pub is_direct_sales: bool,
}

impl ReconciliationCommand {
    fn assemble(order: &LentOrder, groups: &DestinationGroups, sales_order_id: Option<&str>) -> Self {
        let wire = |ids: &[Identifier]| ids.iter().map(ToString::to_string).collect::<Vec<_>>();
        let move_to_sales = wire(&groups.move_to_sales);
        let sales_order_id = if move_to_sales.is_empty() {
            None
        } else {
            sales_order_id.map(str::to_owned)
        };

        Self {
            employee_id: order.employee_id.clone(),
            shop_name: order.shop_name.clone(),
            note: DEFAULT_NOTE.to_owned(),
            return_to_stock: wire(&groups.return_to_stock),
            move_to_sales,
            mark_as_broken: wire(&groups.mark_as_broken),
            condition: None,
            sales_order_id,
            is_direct_sales: false,
        }
    }

    /// Replace the note. Blank notes keep [`DEFAULT_NOTE`].
    #[must_use]
    pub fn with_note(mut self, note: &str) -> Self {
        let note = note.trim();
        if !note.is_empty() {
            note.clone_into(&mut self.note);
        }
        self
    }

    /// Whether every list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.return_to_stock.is_empty()
            && self.move_to_sales.is_empty()
            && self.mark_as_broken.is_empty()
    }
}

/// Validate a reconciliation and build the command to submit.
///
/// Checks run in a fixed order and stop at the first failure:
/// 1. a sales order ID is present if any eligible item goes to sales,
/// 2. every eligible item has a destination, no serial repeats and no box
///    barcode is shared by two non-serialized lines,
/// 3. every partially sold box has a quantity in `1..=quantity`,
/// 4. at least one identifier would be submitted.
///
/// # Errors
///
/// Returns the first [`ReconcileError`] encountered. No command is produced
/// on failure.
pub fn validate_and_build_command(
    order: &LentOrder,
    line_items: &[LentLineItem],
    destinations: &DestinationMap,
    sales_quantities: &SalesQuantityMap,
    sales_order_id: Option<&str>,
) -> Result<ReconciliationCommand, ReconcileError> {
    let sales_order_id = sales_order_id.map(str::trim).filter(|id| !id.is_empty());
    let eligible = || line_items.iter().filter(|item| item.is_eligible());

    let wants_sales = eligible()
        .any(|item| destinations.get(item.identity()) == Some(&Destination::Sales));
    if wants_sales && sales_order_id.is_none() {
        return Err(ReconcileError::MissingSalesOrderId);
    }

    let mut seen_serials = HashSet::new();
    let mut seen_boxes = HashSet::new();
    for item in eligible() {
        if !destinations.contains_key(item.identity()) {
            return Err(ReconcileError::missing_destination(item));
        }
        match item.product_barcode() {
            Some(barcode) if !seen_serials.insert(barcode) => {
                return Err(ReconcileError::DuplicateSerial {
                    product_name: item.product_name.clone(),
                    product_barcode: barcode.to_owned(),
                });
            }
            None if !seen_boxes.insert(item.box_barcode.as_str()) => {
                return Err(ReconcileError::DuplicateBox {
                    product_name: item.product_name.clone(),
                    box_barcode: item.box_barcode.clone(),
                });
            }
            _ => {}
        }
    }

    for item in eligible() {
        if !item.is_serialized()
            && destinations.get(item.identity()) == Some(&Destination::Sales)
        {
            sales_quantity(item, sales_quantities)?;
        }
    }

    let mut groups = DestinationGroups::default();
    for item in line_items {
        if let Some(classified) = classify(item, destinations, sales_quantities)? {
            groups.add(classified);
        }
    }

    if groups.is_empty() {
        return Err(ReconcileError::NoItemsSelected);
    }

    Ok(ReconciliationCommand::assemble(order, &groups, sales_order_id))
}
