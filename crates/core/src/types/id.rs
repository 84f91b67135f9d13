//! Newtype IDs for type-safe catalog references.
//!
//! Catalog IDs are opaque strings. The upstream search API emits them as JSON
//! numbers, so every ID type accepts either a string or an integer when
//! deserializing and always serializes back as a string.

use core::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize` with `#[serde(transparent)]`
/// - `Deserialize` from either a JSON string or a JSON integer
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Default`
/// - Conversion methods: `new()`, `as_str()`, `is_empty()`
/// - `From<String>`, `From<&str>` and `Into<String>` implementations
///
/// # Example
///
/// ```rust
/// # use catalog_picker_core::define_id;
/// define_id!(ShelfId);
/// define_id!(BinId);
///
/// let shelf = ShelfId::new("12");
/// let bin = BinId::new("12");
///
/// // These are different types, so this won't compile:
/// // let _: ShelfId = bin;
/// assert_eq!(shelf.as_str(), bin.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Default, ::serde::Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether this is the empty placeholder ID.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
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

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> ::core::result::Result<Self, D::Error>
            where
                D: ::serde::Deserializer<'de>,
            {
                $crate::types::id::deserialize_id(deserializer).map(Self)
            }
        }
    };
}

define_id!(ProductId);
define_id!(VariantId);
define_id!(ImageId);

/// Deserialize an ID that may be encoded as a string or an integer.
///
/// Used by [`define_id!`]; not intended to be called directly.
///
/// # Errors
///
/// Returns a deserialization error for any other JSON type.
#[doc(hidden)]
pub fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct IdVisitor;

    impl Visitor<'_> for IdVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string or integer id")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(IdVisitor)
}

/// Stable key for one row of an ordered product list.
///
/// Positions change on every reorder; a `LineKey` does not. Drag gestures
/// refer to rows by key so that a gesture started before a reorder still
/// resolves to the intended row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineKey(u64);

impl LineKey {
    /// Create a new line key.
    #[must_use]
    pub const fn new(key: u64) -> Self {
        Self(key)
    }

    /// The key following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line-{}", self.0)
    }
}

impl From<u64> for LineKey {
    fn from(key: u64) -> Self {
        Self(key)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_json_number() {
        let id: ProductId = serde_json::from_str("77").unwrap();
        assert_eq!(id.as_str(), "77");
    }

    #[test]
    fn test_id_from_json_string() {
        let id: VariantId = serde_json::from_str("\"gid://variant/1\"").unwrap();
        assert_eq!(id.as_str(), "gid://variant/1");
    }

    #[test]
    fn test_id_serializes_as_string() {
        let id = ProductId::new("77");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"77\"");
    }

    #[test]
    fn test_id_rejects_bool() {
        let result: Result<ProductId, _> = serde_json::from_str("true");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_id_is_empty() {
        assert!(ProductId::default().is_empty());
        assert!(!ProductId::new("1").is_empty());
    }

    #[test]
    fn test_line_key_next() {
        let key = LineKey::new(4);
        assert_eq!(key.next(), LineKey::new(5));
        assert_eq!(key.to_string(), "line-4");
    }
}
