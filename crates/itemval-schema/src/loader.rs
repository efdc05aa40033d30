//! # Validator Loader
//!
//! Turns one declaration into one shared validator.
//!
//! ## Schema Declarations
//!
//! | Declaration | Resolution |
//! |---|---|
//! | JSON object | compiled as-is |
//! | string ending in `.json` | file read and parsed, relative to the base directory |
//! | other string | catalogue lookup; a text entry is parsed as JSON |
//!
//! Whatever the route, the result must be a JSON object.
//!
//! ## Model Declarations
//!
//! A string resolved in the catalogue; the entry must be a model.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;

use itemval_core::{value_kind, SharedValidator};

use crate::catalog::{CatalogEntry, ObjectCatalog};
use crate::error::ConfigurationError;
use crate::json_schema::JsonSchemaValidator;

/// File extension that marks a schema declaration as a path.
const SCHEMA_FILE_EXTENSION: &str = ".json";

/// Resolves schema and model declarations into validators.
#[derive(Debug, Clone)]
pub struct ValidatorLoader<'a> {
    catalog: &'a ObjectCatalog,
    base_dir: Option<PathBuf>,
}

impl<'a> ValidatorLoader<'a> {
    /// Create a loader resolving references against `catalog`.
    pub fn new(catalog: &'a ObjectCatalog) -> Self {
        Self {
            catalog,
            base_dir: None,
        }
    }

    /// Resolve relative schema file paths against `dir`.
    pub fn with_base_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.base_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Build a JSON Schema validator from one schema declaration.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if the declaration cannot be resolved
    /// to a JSON object or the schema does not compile.
    pub fn load_schema(&self, declaration: &Value) -> Result<SharedValidator, ConfigurationError> {
        let (reference, schema) = match declaration {
            Value::Object(_) => ("<inline>".to_string(), declaration.clone()),
            Value::String(s) if s.ends_with(SCHEMA_FILE_EXTENSION) => {
                (s.clone(), self.read_schema_file(s)?)
            }
            Value::String(s) => (s.clone(), self.resolve_schema_reference(s)?),
            other => {
                return Err(ConfigurationError::InvalidSchema {
                    reference: format!("<{}>", value_kind(other)),
                })
            }
        };
        if !schema.is_object() {
            return Err(ConfigurationError::InvalidSchema { reference });
        }

        let validator =
            JsonSchemaValidator::with_documents(&reference, schema, &self.catalog.documents())?;
        tracing::debug!(schema = %reference, "loaded JSON schema validator");
        Ok(Arc::new(validator))
    }

    /// Build a model validator from one model declaration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::InvalidModel` if the reference does not
    /// name a registered model.
    pub fn load_model(&self, declaration: &Value) -> Result<SharedValidator, ConfigurationError> {
        let Value::String(reference) = declaration else {
            return Err(ConfigurationError::InvalidModel {
                reference: format!("<{}>", value_kind(declaration)),
            });
        };
        match self.catalog.resolve(reference)? {
            CatalogEntry::Model(factory) => {
                tracing::debug!(model = %reference, "loaded model validator");
                Ok((factory.as_ref())())
            }
            _ => Err(ConfigurationError::InvalidModel {
                reference: reference.clone(),
            }),
        }
    }

    fn read_schema_file(&self, path: &str) -> Result<Value, ConfigurationError> {
        let path = match &self.base_dir {
            Some(dir) if Path::new(path).is_relative() => dir.join(path),
            _ => PathBuf::from(path),
        };
        let content =
            std::fs::read_to_string(&path).map_err(|e| ConfigurationError::SchemaFile {
                path: path.display().to_string(),
                reason: format!("cannot read file: {e}"),
            })?;
        serde_json::from_str(&content).map_err(|e| ConfigurationError::SchemaFile {
            path: path.display().to_string(),
            reason: format!("invalid JSON: {e}"),
        })
    }

    fn resolve_schema_reference(&self, reference: &str) -> Result<Value, ConfigurationError> {
        match self.catalog.resolve(reference)? {
            CatalogEntry::Value(v) => Ok(v.clone()),
            CatalogEntry::Text(text) => {
                serde_json::from_str(text).map_err(|_| ConfigurationError::InvalidSchema {
                    reference: reference.to_string(),
                })
            }
            CatalogEntry::Model(_) => Err(ConfigurationError::InvalidSchema {
                reference: reference.to_string(),
            }),
        }
    }
}
