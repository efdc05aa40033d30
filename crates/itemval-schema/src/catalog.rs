//! # Object Catalogue
//!
//! Dotted references in settings (`"shop.schemas.PRODUCT"`) resolve
//! against an [`ObjectCatalog`] the host fills at startup. An entry is a
//! JSON value, a serialized JSON string, or a model.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use itemval_core::SharedValidator;

use crate::error::ConfigurationError;
use crate::model::{Model, ModelValidator};

/// Builds a fresh validator for a registered model.
pub type ModelFactory = Arc<dyn Fn() -> SharedValidator + Send + Sync>;

/// One object reachable by dotted reference.
#[derive(Clone)]
pub enum CatalogEntry {
    /// A structured value, typically a schema.
    Value(Value),
    /// A JSON document held as text.
    Text(String),
    /// A model validator factory.
    Model(ModelFactory),
}

impl fmt::Debug for CatalogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Model(_) => f.write_str("Model(..)"),
        }
    }
}

/// Registry of objects addressable by dotted reference.
#[derive(Debug, Clone, Default)]
pub struct ObjectCatalog {
    entries: HashMap<String, CatalogEntry>,
}

impl ObjectCatalog {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a JSON value under `reference`.
    pub fn register_value(&mut self, reference: impl Into<String>, value: Value) -> &mut Self {
        self.entries
            .insert(reference.into(), CatalogEntry::Value(value));
        self
    }

    /// Register a serialized JSON document under `reference`.
    pub fn register_text(&mut self, reference: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.entries
            .insert(reference.into(), CatalogEntry::Text(text.into()));
        self
    }

    /// Register the model `M` under `reference`.
    pub fn register_model<M: Model>(&mut self, reference: impl Into<String>) -> &mut Self {
        let reference = reference.into();
        let name = reference.clone();
        let factory: ModelFactory =
            Arc::new(move || Arc::new(ModelValidator::<M>::new(name.clone())) as SharedValidator);
        self.entries.insert(reference, CatalogEntry::Model(factory));
        self
    }

    /// Look up `reference` without validating its form.
    pub fn get(&self, reference: &str) -> Option<&CatalogEntry> {
        self.entries.get(reference)
    }

    /// Resolve a dotted reference.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidReference` if `reference` is not
    /// a dotted path and `ConfigurationError::UnresolvedReference` if
    /// nothing is registered under it.
    pub fn resolve(&self, reference: &str) -> Result<&CatalogEntry, ConfigurationError> {
        let Some((module, name)) = reference.rsplit_once('.') else {
            return Err(ConfigurationError::InvalidReference {
                reference: reference.to_string(),
                reason: "not a full path".to_string(),
            });
        };
        if module.is_empty() || name.is_empty() {
            return Err(ConfigurationError::InvalidReference {
                reference: reference.to_string(),
                reason: "empty path segment".to_string(),
            });
        }
        self.entries
            .get(reference)
            .ok_or_else(|| ConfigurationError::UnresolvedReference {
                reference: reference.to_string(),
            })
    }

    /// Every JSON object entry, keyed by reference, for `$ref` resolution.
    pub fn documents(&self) -> HashMap<String, Value> {
        self.entries
            .iter()
            .filter_map(|(reference, entry)| match entry {
                CatalogEntry::Value(v) if v.is_object() => Some((reference.clone(), v.clone())),
                CatalogEntry::Text(s) => serde_json::from_str::<Value>(s)
                    .ok()
                    .filter(Value::is_object)
                    .map(|v| (reference.clone(), v)),
                _ => None,
            })
            .collect()
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
