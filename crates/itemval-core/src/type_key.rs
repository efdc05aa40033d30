//! # Record Type Keys
//!
//! A [`TypeKey`] names the record type a validator is registered for.
//! Matching is by exact key only; there is no notion of subtypes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Reserved key whose validators apply to every record.
pub const UNIVERSAL_TYPE: &str = "UniversalItem";

/// The declared type of a record, as known to the validator registry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeKey(String);

impl TypeKey {
    /// Create a key for a concrete record type.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The reserved universal key.
    pub fn universal() -> Self {
        Self(UNIVERSAL_TYPE.to_string())
    }

    /// Whether this is the reserved universal key.
    pub fn is_universal(&self) -> bool {
        self.0 == UNIVERSAL_TYPE
    }

    /// Access the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeKey {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeKey {
    fn from(name: String) -> Self {
        Self(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn universal_key_is_reserved_name() {
        assert!(TypeKey::universal().is_universal());
        assert_eq!(TypeKey::universal().as_str(), UNIVERSAL_TYPE);
        assert!(!TypeKey::new("Product").is_universal());
    }

    #[test]
    fn keys_compare_by_exact_name() {
        assert_eq!(TypeKey::from("Product"), TypeKey::new("Product"));
        assert_ne!(TypeKey::from("Product"), TypeKey::new("product"));
    }
}
