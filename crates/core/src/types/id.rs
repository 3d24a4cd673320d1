//! Newtype IDs for type-safe entity references.
//!
//! The inventory backend identifies orders and employees by opaque strings.
//! Use the `define_id!` macro to create wrappers that prevent accidentally
//! passing an employee ID where an order ID is expected.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `AsRef<str>` implementations
///
/// # Example
///
/// ```rust
/// # use lendstock_core::define_id;
/// define_id!(ShopId);
/// define_id!(InvoiceId);
///
/// let shop = ShopId::new("north");
/// let invoice = InvoiceId::new("INV-1");
///
/// // These are different types, so this won't compile:
/// // let _: ShopId = invoice;
/// # let _ = (shop, invoice);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Convert into the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Lending order (the backend calls this the "lent id").
define_id!(OrderId);
define_id!(EmployeeId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_raw_value() {
        let id = OrderId::new("LENT-2024-001");
        assert_eq!(id.to_string(), "LENT-2024-001");
        assert_eq!(id.as_str(), "LENT-2024-001");
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = EmployeeId::from("E42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"E42\"");

        let parsed: EmployeeId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
