//! # JSON Schema Validator
//!
//! Validates a record's field mapping against a JSON Schema compiled once
//! at load time.
//!
//! ## Error Keys
//!
//! Violations are keyed by the dotted path of the offending value
//! (`/offers/0/price` becomes `offers.0.price`):
//!
//! - a missing required property is reported on the property's own path
//!   with [`REQUIRED_FIELD`];
//! - each unexpected property is reported on its own path with
//!   [`UNEXPECTED_FIELD`];
//! - anything else uses the validator's message, on the value's path, or
//!   on [`ROOT_FIELD`] when the value is the record itself.
//!
//! ## Reference Resolution
//!
//! Cross-schema `$ref` URIs resolve against documents registered with the
//! loader, matched by full URI, by `$id`, or by trailing filename. Unknown
//! URIs resolve to a permissive empty schema, so compilation never reaches
//! the network.

use std::collections::HashMap;
use std::fmt;

use jsonschema::error::ValidationErrorKind;
use jsonschema::{Retrieve, Uri, ValidationError, Validator as CompiledSchema};
use serde_json::Value;

use itemval_core::{FieldErrors, FieldMap, Outcome, Validator, ValidatorError};

use crate::error::ConfigurationError;
use crate::messages::{join_path, REQUIRED_FIELD, ROOT_FIELD, UNEXPECTED_FIELD};

/// Retriever that serves `$ref` targets from memory.
struct LocalSchemaRetriever {
    /// Map from URI string (or bare filename) to schema value.
    schemas_by_uri: HashMap<String, Value>,
}

impl Retrieve for LocalSchemaRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri_str = uri.as_str();

        if let Some(value) = self.schemas_by_uri.get(uri_str) {
            return Ok(value.clone());
        }

        let filename = uri_str.rsplit('/').next().unwrap_or(uri_str);
        if let Some(value) = self.schemas_by_uri.get(filename) {
            return Ok(value.clone());
        }

        Ok(serde_json::json!({}))
    }
}

/// A validator backed by the `jsonschema` crate.
pub struct JsonSchemaValidator {
    schema: Value,
    compiled: CompiledSchema,
}

impl JsonSchemaValidator {
    /// Name reported in statistics.
    pub const NAME: &'static str = "JSONSchema";

    /// Compile `schema` with no external documents.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidSchema` if `schema` is not an
    /// object and `ConfigurationError::SchemaBuild` if it does not compile.
    pub fn new(schema: Value) -> Result<Self, ConfigurationError> {
        Self::with_documents("<inline>", schema, &HashMap::new())
    }

    /// Compile `schema`, resolving `$ref` URIs against `documents`.
    ///
    /// `documents` maps a URI or filename to a schema. Each document is
    /// also reachable through its own `$id`.
    pub fn with_documents(
        reference: &str,
        schema: Value,
        documents: &HashMap<String, Value>,
    ) -> Result<Self, ConfigurationError> {
        if !schema.is_object() {
            return Err(ConfigurationError::InvalidSchema {
                reference: reference.to_string(),
            });
        }

        let mut schemas_by_uri = HashMap::new();
        for (key, value) in documents {
            schemas_by_uri.insert(key.clone(), value.clone());
            if let Some(id) = value.get("$id").and_then(Value::as_str) {
                schemas_by_uri.insert(id.to_string(), value.clone());
            }
        }

        let mut opts = jsonschema::options();
        opts.with_retriever(LocalSchemaRetriever { schemas_by_uri });
        let compiled = opts
            .build(&schema)
            .map_err(|e| ConfigurationError::SchemaBuild {
                reference: reference.to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { schema, compiled })
    }

    /// The schema this validator was compiled from.
    pub fn schema(&self) -> &Value {
        &self.schema
    }
}

impl fmt::Debug for JsonSchemaValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonSchemaValidator")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl Validator for JsonSchemaValidator {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn validate(&self, data: &FieldMap) -> Result<Outcome, ValidatorError> {
        let instance = Value::Object(data.clone());
        let mut errors = FieldErrors::new();
        for error in self.compiled.iter_errors(&instance) {
            record_violation(&mut errors, &error);
        }
        Ok(Outcome::from_errors(errors))
    }
}

/// File one violation under the field(s) it concerns.
fn record_violation(errors: &mut FieldErrors, error: &ValidationError<'_>) {
    let path = dotted_path(&error.instance_path.to_string());
    match &error.kind {
        ValidationErrorKind::Required { property } => {
            let name = match property {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            errors.push(join_path(&path, &name), REQUIRED_FIELD);
        }
        ValidationErrorKind::AdditionalProperties { unexpected } => {
            for name in unexpected {
                errors.push(join_path(&path, name), UNEXPECTED_FIELD);
            }
        }
        _ => {
            let field = if path.is_empty() {
                ROOT_FIELD.to_string()
            } else {
                path
            };
            errors.push(field, error.to_string());
        }
    }
}

/// Convert a JSON Pointer into a dotted path.
fn dotted_path(pointer: &str) -> String {
    pointer
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(".")
}
