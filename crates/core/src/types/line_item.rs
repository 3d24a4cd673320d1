//! Lending order and line item records as returned by the backend.

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use super::id::{EmployeeId, OrderId};
use super::status::{LentOrderStatus, LineItemStatus};

/// Header of a lending order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LentOrder {
    /// Order identifier (the backend's "lent id").
    #[serde(rename = "lentId")]
    pub order_id: OrderId,
    /// Employee the goods were lent out by.
    pub employee_id: EmployeeId,
    /// Shop holding the goods.
    pub shop_name: String,
    /// When the order was created.
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
    /// Free-form note entered at lending time.
    #[serde(default)]
    pub note: Option<String>,
    /// Order status.
    #[serde(default)]
    pub status: Option<LentOrderStatus>,
}

impl LentOrder {
    /// Create an order header with only the fields reconciliation needs.
    #[must_use]
    pub fn new(
        order_id: impl Into<OrderId>,
        employee_id: impl Into<EmployeeId>,
        shop_name: impl Into<String>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            employee_id: employee_id.into(),
            shop_name: shop_name.into(),
            timestamp: None,
            note: None,
            status: Some(LentOrderStatus::Active),
        }
    }
}

/// One line of a lending order.
///
/// Serialized products carry a unique `product_barcode` and always count as
/// a single unit. Non-serialized products are identified only by their box
/// barcode and carry a unit count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LentLineItem {
    /// Backend row ID.
    #[serde(default)]
    pub lent_id: Option<i64>,
    /// Owning lending order.
    pub order_id: OrderId,
    /// Display name.
    pub product_name: String,
    /// Box or batch barcode.
    pub box_barcode: String,
    /// Unique serial barcode, present only for serialized products.
    #[serde(default)]
    pub product_barcode: Option<String>,
    /// Unit count.
    #[serde(default = "one", deserialize_with = "quantity_or_one")]
    pub quantity: u32,
    /// Reconciliation status.
    pub status: LineItemStatus,
    #[serde(default)]
    pub employee_id: Option<EmployeeId>,
    #[serde(default)]
    pub shop_name: Option<String>,
    #[serde(default)]
    pub box_number: Option<i32>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
}

const fn one() -> u32 {
    1
}

fn quantity_or_one<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(1))
}

impl LentLineItem {
    /// A lent serialized unit.
    #[must_use]
    pub fn serialized(
        order_id: impl Into<OrderId>,
        product_name: impl Into<String>,
        box_barcode: impl Into<String>,
        product_barcode: impl Into<String>,
    ) -> Self {
        Self {
            lent_id: None,
            order_id: order_id.into(),
            product_name: product_name.into(),
            box_barcode: box_barcode.into(),
            product_barcode: Some(product_barcode.into()),
            quantity: 1,
            status: LineItemStatus::Lent,
            employee_id: None,
            shop_name: None,
            box_number: None,
            note: None,
            timestamp: None,
        }
    }

    /// A lent batch of non-serialized units.
    #[must_use]
    pub fn non_serialized(
        order_id: impl Into<OrderId>,
        product_name: impl Into<String>,
        box_barcode: impl Into<String>,
        quantity: u32,
    ) -> Self {
        Self {
            product_barcode: None,
            quantity,
            ..Self::serialized(order_id, product_name, box_barcode, String::new())
        }
    }

    /// Replace the status.
    #[must_use]
    pub fn with_status(mut self, status: LineItemStatus) -> Self {
        self.status = status;
        self
    }

    /// The serial barcode, if this item is serialized.
    ///
    /// Blank barcodes are treated as absent.
    #[must_use]
    pub fn product_barcode(&self) -> Option<&str> {
        self.product_barcode
            .as_deref()
            .map(str::trim)
            .filter(|barcode| !barcode.is_empty())
    }

    /// Whether this item is tracked by its own barcode.
    #[must_use]
    pub fn is_serialized(&self) -> bool {
        self.product_barcode().is_some()
    }

    /// The key used to look up this item's destination: the product barcode
    /// when serialized, the box barcode otherwise.
    #[must_use]
    pub fn identity(&self) -> &str {
        self.product_barcode().unwrap_or(&self.box_barcode)
    }

    /// Whether this item can be reconciled.
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        self.status.is_eligible()
    }

    /// Units represented by this line (always 1 for serialized items).
    #[must_use]
    pub fn units(&self) -> u32 {
        if self.is_serialized() { 1 } else { self.quantity }
    }
}
