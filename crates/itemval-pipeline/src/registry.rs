//! # Validator Registry
//!
//! Maps a record type key to the ordered validators registered for it,
//! plus one list under the universal key that applies to every record.
//!
//! ## Invariants
//!
//! - Registration appends; nothing is ever replaced.
//! - Registration order is validation order.
//! - [`ValidatorRegistry::lookup`] yields type-specific validators first,
//!   then universal ones.
//! - One validator may be registered under several keys; it is shared,
//!   not copied.

use std::collections::BTreeMap;

use serde::Serialize;

use itemval_core::{JsonSerializable, SharedValidator, TypeKey};

/// Immutable type key → validators mapping used during dispatch.
#[derive(Debug, Clone, Default)]
pub struct ValidatorRegistry {
    validators: BTreeMap<TypeKey, Vec<SharedValidator>>,
}

impl ValidatorRegistry {
    /// Start building a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Validators that apply to records of `type_key`, in validation order.
    ///
    /// Unregistered types yield only the universal validators; with none
    /// registered either, the iterator is empty. The universal key itself
    /// yields the universal list once.
    pub fn lookup<'a>(
        &'a self,
        type_key: &TypeKey,
    ) -> impl Iterator<Item = &'a SharedValidator> + 'a {
        let specific: &[SharedValidator] = if type_key.is_universal() {
            &[][..]
        } else {
            self.validators.get(type_key).map_or(&[][..], Vec::as_slice)
        };
        let universal = self
            .validators
            .get(&TypeKey::universal())
            .map_or(&[][..], Vec::as_slice);
        specific.iter().chain(universal.iter())
    }

    /// Every registered `(type key, validators)` pair.
    pub fn entries(&self) -> impl Iterator<Item = (&TypeKey, &[SharedValidator])> {
        self.validators.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Total number of registrations across all keys.
    pub fn len(&self) -> usize {
        self.validators.values().map(Vec::len).sum()
    }

    /// Returns true if no validator is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validator names per type key.
    pub fn summary(&self) -> RegistrySummary {
        RegistrySummary(
            self.validators
                .iter()
                .map(|(k, v)| (k.to_string(), v.iter().map(|x| x.name().to_string()).collect()))
                .collect(),
        )
    }
}

/// Explicit registration API. Settings adapters call this; the
/// dispatcher only ever sees the finished registry.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    validators: BTreeMap<TypeKey, Vec<SharedValidator>>,
}

impl RegistryBuilder {
    /// Append one validator under `type_key`.
    pub fn register(&mut self, type_key: TypeKey, validator: SharedValidator) -> &mut Self {
        self.validators.entry(type_key).or_default().push(validator);
        self
    }

    /// Append `validators`, in order, under a concrete record type.
    pub fn add_for_type(
        &mut self,
        type_key: TypeKey,
        validators: impl IntoIterator<Item = SharedValidator>,
    ) -> &mut Self {
        self.validators
            .entry(type_key)
            .or_default()
            .extend(validators);
        self
    }

    /// Append `validators`, in order, under the universal key.
    pub fn add_universal(
        &mut self,
        validators: impl IntoIterator<Item = SharedValidator>,
    ) -> &mut Self {
        self.add_for_type(TypeKey::universal(), validators)
    }

    /// Freeze the registrations.
    pub fn build(self) -> ValidatorRegistry {
        ValidatorRegistry {
            validators: self.validators,
        }
    }
}

/// Validator names per type key, for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RegistrySummary(pub BTreeMap<String, Vec<String>>);

impl JsonSerializable for RegistrySummary {}
