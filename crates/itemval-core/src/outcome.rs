//! # Validation Outcomes
//!
//! [`FieldErrors`] is the unit of error reporting: a mapping from field
//! name to an ordered list of human-readable messages. A field that is
//! absent from the mapping has no errors.
//!
//! [`Outcome`] pairs a success flag with the errors one validator found
//! for one record.

use std::collections::btree_map;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Plain field → value mapping a record converts to before validation.
pub type FieldMap = serde_json::Map<String, serde_json::Value>;

/// Ordered, append-only messages per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one message to `field`, creating the entry if needed.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Append every message of `other` after the messages already present.
    ///
    /// Fields reported by both collections end up with this collection's
    /// messages first, then `other`'s, each in original order.
    pub fn merge(&mut self, other: &FieldErrors) {
        for (field, messages) in &other.0 {
            self.0
                .entry(field.clone())
                .or_default()
                .extend(messages.iter().cloned());
        }
    }

    /// Messages recorded for `field`, if any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Returns true if no field has an entry.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one entry.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Total number of messages across all fields.
    pub fn message_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// Iterate over `(field, messages)` pairs.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Vec<String>> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a FieldErrors {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = btree_map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<F, M> FromIterator<(F, M)> for FieldErrors
where
    F: Into<String>,
    M: IntoIterator,
    M::Item: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (F, M)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (field, messages) in iter {
            let entry = errors.0.entry(field.into()).or_default();
            entry.extend(messages.into_iter().map(Into::into));
        }
        errors
    }
}

/// The result of running one validator against one record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    ok: bool,
    errors: FieldErrors,
}

impl Outcome {
    /// A passing outcome with no errors.
    pub fn valid() -> Self {
        Self {
            ok: true,
            errors: FieldErrors::new(),
        }
    }

    /// A failing outcome carrying `errors`.
    pub fn invalid(errors: FieldErrors) -> Self {
        Self { ok: false, errors }
    }

    /// Derive the flag from the errors: empty means valid.
    pub fn from_errors(errors: FieldErrors) -> Self {
        Self {
            ok: errors.is_empty(),
            errors,
        }
    }

    /// Whether the record passed this validator.
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    /// Errors reported by the validator.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Consume the outcome and return its parts.
    pub fn into_parts(self) -> (bool, FieldErrors) {
        (self.ok, self.errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn push_appends_in_order() {
        let mut errors = FieldErrors::new();
        errors.push("title", "required");
        errors.push("title", "too short");
        assert_eq!(
            errors.get("title").unwrap(),
            &["required".to_string(), "too short".to_string()]
        );
        assert_eq!(errors.message_count(), 2);
    }

    #[test]
    fn merge_concatenates_shared_fields() {
        let mut first: FieldErrors = [("a", vec!["bad1"])].into_iter().collect();
        let second: FieldErrors = [("a", vec!["bad2"]), ("b", vec!["bad3"])]
            .into_iter()
            .collect();
        first.merge(&second);

        let expected: FieldErrors = [("a", vec!["bad1", "bad2"]), ("b", vec!["bad3"])]
            .into_iter()
            .collect();
        assert_eq!(first, expected);
    }

    #[test]
    fn from_errors_sets_flag() {
        assert!(Outcome::from_errors(FieldErrors::new()).is_ok());
        let mut errors = FieldErrors::new();
        errors.push("price", "must be positive");
        assert!(!Outcome::from_errors(errors).is_ok());
    }

    #[test]
    fn serializes_as_plain_mapping() {
        let errors: FieldErrors = [("title", vec!["required"])].into_iter().collect();
        let value = serde_json::to_value(&errors).unwrap();
        assert_eq!(value, serde_json::json!({"title": ["required"]}));
    }

    proptest! {
        #[test]
        fn merge_never_loses_messages(
            left in proptest::collection::vec(("[a-c]", "[a-z]{1,4}"), 0..8),
            right in proptest::collection::vec(("[a-c]", "[a-z]{1,4}"), 0..8),
        ) {
            let mut merged = FieldErrors::new();
            for (f, m) in &left {
                merged.push(f.clone(), m.clone());
            }
            let mut other = FieldErrors::new();
            for (f, m) in &right {
                other.push(f.clone(), m.clone());
            }
            let before = merged.clone();
            merged.merge(&other);

            prop_assert_eq!(merged.message_count(), left.len() + right.len());
            for (field, messages) in &before {
                let after = merged.get(field).unwrap();
                prop_assert_eq!(&after[..messages.len()], messages.as_slice());
            }
        }
    }
}
