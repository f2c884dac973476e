//! Newtype IDs for type-safe catalog references.
//!
//! The catalog API identifies every record with an opaque string (document
//! ids). Use the `define_id!` macro to create wrappers that prevent
//! accidentally mixing, say, a variation axis id with an option id when
//! building a selection.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use verdant_core::define_id;
/// define_id!(ShelfId);
/// define_id!(BinId);
///
/// let shelf = ShelfId::new("a1");
/// let bin = BinId::new("a1");
///
/// // These are different types, so this won't compile:
/// // let _: ShelfId = bin;
/// assert_eq!(shelf.as_str(), bin.as_str());
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

            /// Borrow the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the underlying string.
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
                Self(id.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Catalog record IDs
define_id!(ProductId);
define_id!(BaseProductId);
define_id!(SkuId);
define_id!(ImageId);
define_id!(AxisId);
define_id!(OptionId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_display_is_raw_value() {
        let id = SkuId::new("66f1c0ffee");
        assert_eq!(id.to_string(), "66f1c0ffee");
    }

    #[test]
    fn test_id_serde_is_transparent() {
        let id = AxisId::from("color");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"color\"");

        let back: AxisId = serde_json::from_str("\"size\"").unwrap();
        assert_eq!(back, AxisId::new("size"));
    }
}
