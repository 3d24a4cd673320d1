//! Outbound item identifiers.
//!
//! The backend addresses reconciled items with plain strings: a serialized
//! item is its bare product barcode, a non-serialized item is
//! `"{box_barcode}:{quantity}"`. Inside the engine identifiers stay typed;
//! the string form is only produced when a command is assembled.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Errors from parsing a wire identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The identifier string is empty.
    #[error("identifier cannot be empty")]
    Empty,

    /// The part before the colon is empty.
    #[error("missing box barcode in identifier: {0}")]
    MissingBoxBarcode(String),

    /// The part after the colon is not a positive integer.
    #[error("invalid quantity in identifier: {0}")]
    InvalidQuantity(String),
}

/// A reconciled item as addressed on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// A uniquely barcoded unit.
    Serialized(String),
    /// A number of interchangeable units from one box.
    NonSerialized {
        /// Box or batch barcode.
        box_barcode: String,
        /// Units covered by this identifier.
        quantity: u32,
    },
}

impl Identifier {
    /// Identifier for a serialized unit.
    #[must_use]
    pub fn serialized(barcode: impl Into<String>) -> Self {
        Self::Serialized(barcode.into())
    }

    /// Identifier for `quantity` units of a box.
    #[must_use]
    pub fn non_serialized(box_barcode: impl Into<String>, quantity: u32) -> Self {
        Self::NonSerialized {
            box_barcode: box_barcode.into(),
            quantity,
        }
    }

    /// Number of units this identifier moves.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        match self {
            Self::Serialized(_) => 1,
            Self::NonSerialized { quantity, .. } => *quantity,
        }
    }

    /// The barcode part of the identifier (product or box barcode).
    #[must_use]
    pub fn barcode(&self) -> &str {
        match self {
            Self::Serialized(barcode) => barcode,
            Self::NonSerialized { box_barcode, .. } => box_barcode,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Serialized(barcode) => f.write_str(barcode),
            Self::NonSerialized {
                box_barcode,
                quantity,
            } => write!(f, "{box_barcode}:{quantity}"),
        }
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(IdentifierError::Empty);
        }

        let Some((box_barcode, quantity)) = s.rsplit_once(':') else {
            return Ok(Self::Serialized(s.to_owned()));
        };

        if box_barcode.is_empty() {
            return Err(IdentifierError::MissingBoxBarcode(s.to_owned()));
        }

        let quantity = quantity
            .parse::<u32>()
            .ok()
            .filter(|q| *q > 0)
            .ok_or_else(|| IdentifierError::InvalidQuantity(s.to_owned()))?;

        Ok(Self::non_serialized(box_barcode, quantity))
    }
}
