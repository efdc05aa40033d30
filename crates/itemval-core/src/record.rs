//! # Records
//!
//! A record is one structured item flowing through the pipeline. The
//! [`Record`] trait is what the dispatcher needs from it: a type key, a
//! field mapping to validate, and a pre-declared errors container it can
//! fill when annotation is enabled.
//!
//! [`Item`] is the dynamic record used by the CLI and by hosts that do
//! not have a typed struct per record kind. Typed records implement
//! [`Record`] themselves and can use [`field_map_of`] for conversion.

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::error::CoreError;
use crate::outcome::{FieldErrors, FieldMap};
use crate::serialization::value_kind;
use crate::type_key::TypeKey;

/// What the dispatcher needs from a record.
pub trait Record {
    /// The record's declared type.
    fn type_key(&self) -> TypeKey;

    /// Convert the record into a plain field mapping for validation.
    fn to_field_map(&self) -> Result<FieldMap, CoreError>;

    /// The errors container stored under `errors_field`, created empty on
    /// first access.
    fn errors_mut(&mut self, errors_field: &str) -> &mut FieldErrors;
}

/// Convert any serializable value into a field mapping.
///
/// # Errors
///
/// Returns `CoreError::NotAMapping` if `record` does not serialize to a
/// JSON object.
pub fn field_map_of<T: Serialize>(type_key: &TypeKey, record: &T) -> Result<FieldMap, CoreError> {
    let value = serde_json::to_value(record).map_err(|source| CoreError::Conversion {
        type_key: type_key.to_string(),
        source,
    })?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(CoreError::NotAMapping {
            type_key: type_key.to_string(),
            found: value_kind(&other),
        }),
    }
}

/// A dynamically typed record: a type key plus a field mapping.
///
/// Validation errors written by the dispatcher are held apart from the
/// data fields and emitted under their field name on serialization. So is
/// the type tag of items read with [`Item::from_json`].
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    type_key: TypeKey,
    type_field: Option<String>,
    fields: FieldMap,
    annotations: BTreeMap<String, FieldErrors>,
}

impl Item {
    /// Create an item of the given type.
    pub fn new(type_key: impl Into<TypeKey>, fields: FieldMap) -> Self {
        Self {
            type_key: type_key.into(),
            type_field: None,
            fields,
            annotations: BTreeMap::new(),
        }
    }

    /// Create an item that only universal validators apply to.
    pub fn untyped(fields: FieldMap) -> Self {
        Self::new(TypeKey::universal(), fields)
    }

    /// Build an item from a JSON object, reading its type from `type_field`.
    ///
    /// The type field is metadata: it is taken out of the data and written
    /// back first on serialization. Objects without it become untyped
    /// items.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::NotAMapping` if `value` is not an object and
    /// `CoreError::InvalidTypeField` if the type field is not a string.
    pub fn from_json(value: Value, type_field: &str) -> Result<Self, CoreError> {
        let mut fields = match value {
            Value::Object(map) => map,
            other => {
                return Err(CoreError::NotAMapping {
                    type_key: type_field.to_string(),
                    found: value_kind(&other),
                })
            }
        };
        let type_key = match fields.get(type_field) {
            None => None,
            Some(Value::String(name)) => Some(TypeKey::new(name.as_str())),
            Some(other) => {
                return Err(CoreError::InvalidTypeField {
                    field: type_field.to_string(),
                    found: value_kind(other),
                })
            }
        };
        let Some(type_key) = type_key else {
            return Ok(Self::untyped(fields));
        };
        fields.remove(type_field);
        let mut item = Self::new(type_key, fields);
        item.type_field = Some(type_field.to_string());
        Ok(item)
    }

    /// The item's data fields.
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Look up a single data field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// The errors stored under `errors_field`, if annotation happened.
    pub fn errors(&self, errors_field: &str) -> Option<&FieldErrors> {
        self.annotations.get(errors_field)
    }

    /// Whether any errors container has been written.
    pub fn is_annotated(&self) -> bool {
        !self.annotations.is_empty()
    }

    /// Flatten data fields and annotations into one JSON object.
    pub fn to_value(&self) -> Result<Value, CoreError> {
        Ok(serde_json::to_value(self)?)
    }
}

impl Record for Item {
    fn type_key(&self) -> TypeKey {
        self.type_key.clone()
    }

    fn to_field_map(&self) -> Result<FieldMap, CoreError> {
        Ok(self.fields.clone())
    }

    fn errors_mut(&mut self, errors_field: &str) -> &mut FieldErrors {
        self.annotations.entry(errors_field.to_string()).or_default()
    }
}

impl Serialize for Item {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tag = self
            .type_field
            .as_deref()
            .filter(|f| !self.fields.contains_key(*f) && !self.annotations.contains_key(*f));
        let extra = self
            .annotations
            .keys()
            .filter(|k| !self.fields.contains_key(*k))
            .count();
        let len = self.fields.len() + extra + usize::from(tag.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(field) = tag {
            map.serialize_entry(field, self.type_key.as_str())?;
        }
        for (field, value) in &self.fields {
            if let Some(errors) = self.annotations.get(field) {
                map.serialize_entry(field, errors)?;
            } else {
                map.serialize_entry(field, value)?;
            }
        }
        for (field, errors) in &self.annotations {
            if !self.fields.contains_key(field) {
                map.serialize_entry(field, errors)?;
            }
        }
        map.end()
    }
}
