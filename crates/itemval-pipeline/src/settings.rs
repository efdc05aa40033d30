//! # Validation Settings
//!
//! Reads the `SPIDERMON_VALIDATION_*` keys and turns the schema and model
//! declarations into a [`ValidatorRegistry`].
//!
//! ## Declarations
//!
//! | Shape | Registered under |
//! |---|---|
//! | list | the universal key |
//! | mapping `type → value` | `type`, the value as a one-element list |
//! | mapping `type → list` | `type`, every element in order |
//!
//! A missing, null or otherwise empty declaration registers nothing. Any
//! other shape is a `ConfigurationError`. Schemas are registered before
//! models; both append to the same per-type lists.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use itemval_core::{value_kind, SharedValidator, TypeKey};
use itemval_schema::{ConfigurationError, ValidatorLoader};

use crate::config::{PipelineConfig, DEFAULT_ERRORS_FIELD};
use crate::registry::{RegistryBuilder, ValidatorRegistry};

const SCHEMAS_KEY: &str = "SPIDERMON_VALIDATION_SCHEMAS";
const MODELS_KEY: &str = "SPIDERMON_VALIDATION_MODELS";
const DROP_KEY: &str = "SPIDERMON_VALIDATION_DROP_ITEMS_WITH_ERRORS";
const ANNOTATE_KEY: &str = "SPIDERMON_VALIDATION_ADD_ERRORS_TO_ITEMS";
const ERRORS_FIELD_KEY: &str = "SPIDERMON_VALIDATION_ERRORS_FIELD";

/// The validation keys of a host settings document.
///
/// Unknown keys are ignored, so the whole host document can be loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationSettings {
    /// Schema declarations.
    #[serde(rename = "SPIDERMON_VALIDATION_SCHEMAS", default)]
    pub schemas: Option<Value>,

    /// Model declarations.
    #[serde(rename = "SPIDERMON_VALIDATION_MODELS", default)]
    pub models: Option<Value>,

    #[serde(rename = "SPIDERMON_VALIDATION_DROP_ITEMS_WITH_ERRORS", default)]
    pub drop_items_with_errors: Option<bool>,

    #[serde(rename = "SPIDERMON_VALIDATION_ADD_ERRORS_TO_ITEMS", default)]
    pub add_errors_to_items: Option<bool>,

    #[serde(rename = "SPIDERMON_VALIDATION_ERRORS_FIELD", default)]
    pub errors_field: Option<String>,
}

impl ValidationSettings {
    /// Parse a YAML settings document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::SettingsFile` if the text is not valid
    /// YAML or a key has the wrong type.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigurationError> {
        serde_yaml::from_str(text).map_err(|e| settings_error("<yaml>", e))
    }

    /// Parse a JSON settings document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::SettingsFile` if the text is not valid
    /// JSON or a key has the wrong type.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigurationError> {
        serde_json::from_str(text).map_err(|e| settings_error("<json>", e))
    }

    /// Load a settings file. Files ending in `.json` are parsed as JSON,
    /// anything else as YAML.
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError::SettingsFile` if the file cannot be read
    /// or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigurationError> {
        let shown = path.display().to_string();
        let text = std::fs::read_to_string(path)
            .map_err(|e| settings_error(&shown, format!("cannot read file: {e}")))?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let parsed = if is_json {
            serde_json::from_str(&text).map_err(|e| settings_error(&shown, e))
        } else {
            serde_yaml::from_str(&text).map_err(|e| settings_error(&shown, e))
        }?;
        tracing::debug!(path = %shown, "loaded validation settings");
        Ok(parsed)
    }

    /// Override the scalar keys from `lookup`, keyed by setting name.
    ///
    /// Booleans accept `true`/`false` in any case. Unparseable values are
    /// ignored with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for (key, target) in [
            (DROP_KEY, &mut self.drop_items_with_errors),
            (ANNOTATE_KEY, &mut self.add_errors_to_items),
        ] {
            let Some(raw) = lookup(key) else { continue };
            match parse_bool(&raw) {
                Some(value) => *target = Some(value),
                None => tracing::warn!(key = key, value = %raw, "ignoring non-boolean override"),
            }
        }
        if let Some(field) = lookup(ERRORS_FIELD_KEY) {
            self.errors_field = Some(field);
        }
    }

    /// Override the scalar keys from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// The error policy these settings select.
    ///
    /// An empty errors field falls back to `_validation`.
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            drop_items_with_errors: self.drop_items_with_errors.unwrap_or(false),
            add_errors_to_items: self.add_errors_to_items.unwrap_or(false),
            errors_field: self
                .errors_field
                .clone()
                .filter(|f| !f.is_empty())
                .unwrap_or_else(|| DEFAULT_ERRORS_FIELD.to_string()),
        }
    }
}

fn settings_error(path: &str, reason: impl std::fmt::Display) -> ConfigurationError {
    ConfigurationError::SettingsFile {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Turns one declaration leaf into a validator.
pub trait DeclarationLoader {
    fn load_schema(&self, declaration: &Value) -> Result<SharedValidator, ConfigurationError>;
    fn load_model(&self, declaration: &Value) -> Result<SharedValidator, ConfigurationError>;
}

impl DeclarationLoader for ValidatorLoader<'_> {
    fn load_schema(&self, declaration: &Value) -> Result<SharedValidator, ConfigurationError> {
        ValidatorLoader::load_schema(self, declaration)
    }

    fn load_model(&self, declaration: &Value) -> Result<SharedValidator, ConfigurationError> {
        ValidatorLoader::load_model(self, declaration)
    }
}

/// Build the registry declared by `settings`.
///
/// # Errors
///
/// Returns the first `ConfigurationError` met. Nothing is registered in
/// that case.
pub fn build_registry(
    settings: &ValidationSettings,
    loader: &dyn DeclarationLoader,
) -> Result<ValidatorRegistry, ConfigurationError> {
    let mut builder = ValidatorRegistry::builder();
    if let Some(declaration) = settings.schemas.as_ref() {
        add_declarations(&mut builder, SCHEMAS_KEY, declaration, |leaf| {
            loader.load_schema(leaf)
        })?;
    }
    if let Some(declaration) = settings.models.as_ref() {
        add_declarations(&mut builder, MODELS_KEY, declaration, |leaf| {
            loader.load_model(leaf)
        })?;
    }
    let registry = builder.build();
    for (type_key, validators) in registry.entries() {
        tracing::info!(
            type_key = %type_key,
            validators = validators.len(),
            "registered item validators"
        );
    }
    Ok(registry)
}

fn add_declarations<F>(
    builder: &mut RegistryBuilder,
    setting: &str,
    declaration: &Value,
    load: F,
) -> Result<(), ConfigurationError>
where
    F: Fn(&Value) -> Result<SharedValidator, ConfigurationError>,
{
    if is_unset(declaration) {
        return Ok(());
    }
    match declaration {
        Value::Array(leaves) => {
            let validators = leaves.iter().map(&load).collect::<Result<Vec<_>, _>>()?;
            builder.add_universal(validators);
        }
        Value::Object(per_type) => {
            for (type_name, value) in per_type {
                let leaves = match value {
                    Value::Array(leaves) => leaves.as_slice(),
                    single => std::slice::from_ref(single),
                };
                let validators = leaves.iter().map(&load).collect::<Result<Vec<_>, _>>()?;
                builder.add_for_type(TypeKey::new(type_name.as_str()), validators);
            }
        }
        other => {
            return Err(ConfigurationError::InvalidSettingsType {
                setting: setting.to_string(),
                found: value_kind(other),
            })
        }
    }
    Ok(())
}

fn is_unset(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Number(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;

    use itemval_core::{FieldMap, Outcome, Validator, ValidatorError};
    use serde_json::json;

    /// Names each validator after the declaration it came from.
    #[derive(Debug)]
    struct Labelled(String);

    impl Validator for Labelled {
        fn name(&self) -> &str {
            &self.0
        }

        fn validate(&self, _data: &FieldMap) -> Result<Outcome, ValidatorError> {
            Ok(Outcome::valid())
        }
    }

    struct Echo;

    impl DeclarationLoader for Echo {
        fn load_schema(&self, declaration: &Value) -> Result<SharedValidator, ConfigurationError> {
            Ok(Arc::new(Labelled(format!("schema:{}", declaration.as_str().unwrap_or("?")))))
        }

        fn load_model(&self, declaration: &Value) -> Result<SharedValidator, ConfigurationError> {
            Ok(Arc::new(Labelled(format!("model:{}", declaration.as_str().unwrap_or("?")))))
        }
    }

    fn names(registry: &ValidatorRegistry, type_key: &str) -> Vec<String> {
        registry
            .lookup(&TypeKey::new(type_key))
            .map(|v| v.name().to_string())
            .collect()
    }

    #[test]
    fn list_declarations_are_universal() {
        let settings = ValidationSettings {
            schemas: Some(json!(["a", "b"])),
            ..Default::default()
        };
        let registry = build_registry(&settings, &Echo).unwrap();
        assert_eq!(names(&registry, "Anything"), ["schema:a", "schema:b"]);
    }

    #[test]
    fn mapping_values_are_normalized_to_lists() {
        let settings = ValidationSettings {
            schemas: Some(json!({"Product": "p", "Review": ["r1", "r2"]})),
            ..Default::default()
        };
        let registry = build_registry(&settings, &Echo).unwrap();
        assert_eq!(names(&registry, "Product"), ["schema:p"]);
        assert_eq!(names(&registry, "Review"), ["schema:r1", "schema:r2"]);
    }

    #[test]
    fn schemas_and_models_append_to_the_same_type() {
        let settings = ValidationSettings {
            schemas: Some(json!({"Product": "p"})),
            models: Some(json!({"Product": "m"})),
            ..Default::default()
        };
        let registry = build_registry(&settings, &Echo).unwrap();
        assert_eq!(names(&registry, "Product"), ["schema:p", "model:m"]);
    }

    #[test]
    fn scalar_declaration_is_rejected() {
        let settings = ValidationSettings {
            models: Some(json!("myproject.models.Product")),
            ..Default::default()
        };
        let err = build_registry(&settings, &Echo).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::InvalidSettingsType { ref setting, found: "string" }
                if setting == MODELS_KEY
        ));
        assert!(err.to_string().contains("dict or list/tuple is required"));
    }

    #[test]
    fn empty_declarations_register_nothing() {
        let settings = ValidationSettings {
            schemas: Some(json!([])),
            models: Some(Value::Null),
            ..Default::default()
        };
        assert!(build_registry(&settings, &Echo).unwrap().is_empty());
    }

    #[test]
    fn yaml_settings_parse_and_ignore_unknown_keys() {
        let settings = ValidationSettings::from_yaml_str(
            "BOT_NAME: shop\n\
             SPIDERMON_VALIDATION_ADD_ERRORS_TO_ITEMS: true\n\
             SPIDERMON_VALIDATION_SCHEMAS:\n  - schemas/product.json\n",
        )
        .unwrap();
        assert_eq!(settings.add_errors_to_items, Some(true));
        assert_eq!(settings.schemas, Some(json!(["schemas/product.json"])));
        assert!(settings.models.is_none());
    }

    #[test]
    fn json_settings_with_wrong_types_fail() {
        let err = ValidationSettings::from_json_str(
            r#"{"SPIDERMON_VALIDATION_DROP_ITEMS_WITH_ERRORS": "maybe"}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::SettingsFile { .. }));
    }

    #[test]
    fn pipeline_config_defaults() {
        assert_eq!(
            ValidationSettings::default().pipeline_config(),
            PipelineConfig::default()
        );
        let settings = ValidationSettings {
            errors_field: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(settings.pipeline_config().errors_field, "_validation");
    }

    #[test]
    fn overrides_replace_scalar_keys() {
        let env: HashMap<&str, &str> = [
            (DROP_KEY, "TRUE"),
            (ANNOTATE_KEY, "nope"),
            (ERRORS_FIELD_KEY, "_errors"),
        ]
        .into_iter()
        .collect();
        let mut settings = ValidationSettings {
            add_errors_to_items: Some(true),
            ..Default::default()
        };
        settings.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        let config = settings.pipeline_config();
        assert!(config.drop_items_with_errors);
        assert!(config.add_errors_to_items);
        assert_eq!(config.errors_field, "_errors");
    }
}
