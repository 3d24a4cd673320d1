//! Status and destination enums for lending orders.

use serde::{Deserialize, Serialize};

/// Status of a single lent line item, as reported by the backend.
///
/// Only [`LineItemStatus::Lent`] items take part in reconciliation. The
/// backend may introduce further terminal states; those are kept verbatim
/// in [`LineItemStatus::Other`] instead of failing deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LineItemStatus {
    /// Out on loan and awaiting reconciliation.
    Lent,
    /// Already reconciled by an earlier submission.
    Processed,
    /// Any other backend state.
    Other(String),
}

impl LineItemStatus {
    /// Whether an item in this status can be reconciled.
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        matches!(self, Self::Lent)
    }

    /// The wire representation of this status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Lent => "lent",
            Self::Processed => "processed",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for LineItemStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "lent" => Self::Lent,
            "processed" => Self::Processed,
            _ => Self::Other(s),
        }
    }
}

impl From<LineItemStatus> for String {
    fn from(status: LineItemStatus) -> Self {
        match status {
            LineItemStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for LineItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a lending order header.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LentOrderStatus {
    /// At least one item is still out on loan.
    Active,
    /// Every item has been reconciled.
    Completed,
    /// Any other backend state.
    Other(String),
}

impl LentOrderStatus {
    /// The wire representation of this status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for LentOrderStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "active" => Self::Active,
            "completed" => Self::Completed,
            _ => Self::Other(s),
        }
    }
}

impl From<LentOrderStatus> for String {
    fn from(status: LentOrderStatus) -> Self {
        match status {
            LentOrderStatus::Other(s) => s,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for LentOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a reconciled lent item ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    /// Back into stock.
    #[default]
    Return,
    /// Converted into a sale on the given sales order.
    Sales,
    /// Written off.
    Broken,
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Return => write!(f, "return"),
            Self::Sales => write!(f, "sales"),
            Self::Broken => write!(f, "broken"),
        }
    }
}

impl std::str::FromStr for Destination {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "return" => Ok(Self::Return),
            "sales" => Ok(Self::Sales),
            "broken" => Ok(Self::Broken),
            _ => Err(format!(
                "invalid destination: {s} (expected return, sales or broken)"
            )),
        }
    }
}
