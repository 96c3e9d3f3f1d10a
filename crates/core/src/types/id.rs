//! Canonical product identifiers.
//!
//! Every catalog entity is keyed by a UUID in its hyphenated 8-4-4-4-12 form.
//! [`ProductId::parse`] is the one place that decides whether a string has that
//! shape; anything else (display slugs, braced or URN forms, bare hex) is
//! rejected.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Length of a hyphenated UUID string.
const CANONICAL_LEN: usize = 36;

/// Byte offsets of the hyphens in a hyphenated UUID string.
const HYPHEN_POSITIONS: [usize; 4] = [8, 13, 18, 23];

/// Errors that can occur when parsing a [`ProductId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ProductIdError {
    /// The input string is empty.
    #[error("product id cannot be empty")]
    Empty,
    /// The input is not in the hyphenated 8-4-4-4-12 form.
    #[error("product id is not a canonical identifier: {0}")]
    NotCanonical(String),
}

/// A catalog product identifier.
///
/// ## Examples
///
/// ```
/// use shopfront_core::ProductId;
///
/// assert!(ProductId::parse("3f2b8c1e-6a4d-4e7f-9b0a-1c2d3e4f5a6b").is_ok());
///
/// // Legacy slug-keyed records are not canonical
/// assert!(ProductId::parse("shea-butter-500g").is_err());
/// // Neither are the other textual UUID forms
/// assert!(ProductId::parse("3f2b8c1e6a4d4e7f9b0a1c2d3e4f5a6b").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Parse a `ProductId` from its canonical string form.
    ///
    /// Hex digits may be upper or lower case.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or is not a hyphenated UUID.
    pub fn parse(s: &str) -> Result<Self, ProductIdError> {
        if s.is_empty() {
            return Err(ProductIdError::Empty);
        }

        if !is_canonical_shape(s) {
            return Err(ProductIdError::NotCanonical(s.to_owned()));
        }

        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| ProductIdError::NotCanonical(s.to_owned()))
    }

    /// Generate a fresh random identifier.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

/// Check the 8-4-4-4-12 layout without allocating.
fn is_canonical_shape(s: &str) -> bool {
    s.len() == CANONICAL_LEN
        && s.bytes().enumerate().all(|(i, b)| {
            if HYPHEN_POSITIONS.contains(&i) {
                b == b'-'
            } else {
                b.is_ascii_hexdigit()
            }
        })
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ProductId {
    type Err = ProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Uuid> for ProductId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<ProductId> for Uuid {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0.hyphenated())
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const ID: &str = "3f2b8c1e-6a4d-4e7f-9b0a-1c2d3e4f5a6b";

    #[test]
    fn test_parse_canonical() {
        let id = ProductId::parse(ID).unwrap();
        assert_eq!(id.to_string(), ID);
    }

    #[test]
    fn test_parse_uppercase_normalizes() {
        let id = ProductId::parse(&ID.to_uppercase()).unwrap();
        assert_eq!(id.to_string(), ID);
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(ProductId::parse(""), Err(ProductIdError::Empty));
    }

    #[test]
    fn test_parse_slug_rejected() {
        assert!(matches!(
            ProductId::parse("organic-honey"),
            Err(ProductIdError::NotCanonical(_))
        ));
    }

    #[test]
    fn test_parse_other_uuid_forms_rejected() {
        assert!(ProductId::parse("3f2b8c1e6a4d4e7f9b0a1c2d3e4f5a6b").is_err());
        assert!(ProductId::parse("{3f2b8c1e-6a4d-4e7f-9b0a-1c2d3e4f5a6b}").is_err());
        assert!(ProductId::parse("urn:uuid:3f2b8c1e-6a4d-4e7f-9b0a-1c2d3e4f5a6b").is_err());
    }

    #[test]
    fn test_parse_non_hex_rejected() {
        assert!(ProductId::parse("3f2b8c1e-6a4d-4e7f-9b0a-1c2d3e4f5a6g").is_err());
    }

    #[test]
    fn test_serde_transparent_string() {
        let id = ProductId::parse(ID).unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{ID}\""));

        let back: ProductId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_deserialize_rejects_slug() {
        let result: Result<ProductId, _> = serde_json::from_str("\"organic-honey\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_new_v4_is_canonical() {
        let id = ProductId::new_v4();
        assert!(ProductId::parse(&id.to_string()).is_ok());
    }
}
