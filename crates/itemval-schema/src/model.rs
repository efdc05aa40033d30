//! # Model Validator
//!
//! Validates a record by deserializing its field mapping into a typed
//! serde model. Structural problems (missing or unknown fields, wrong
//! types) come from deserialization; semantic rules come from
//! [`Model::check`].
//!
//! Deserialization stops at its first error, so a record that fails to
//! parse reports exactly one message, and `check` does not run for it.
//! Field error statistics for such records count that one message only.

use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

use itemval_core::{FieldErrors, FieldMap, Outcome, Validator, ValidatorError};

use crate::messages::{REQUIRED_FIELD, ROOT_FIELD, UNEXPECTED_FIELD};

/// A typed record model.
///
/// Use `#[serde(deny_unknown_fields)]` on the model to reject fields it
/// does not declare.
pub trait Model: DeserializeOwned + 'static {
    /// Semantic checks run after a successful deserialization.
    fn check(&self) -> FieldErrors {
        FieldErrors::new()
    }
}

/// Validator that checks records against the model `M`.
pub struct ModelValidator<M> {
    model_name: String,
    _model: PhantomData<fn() -> M>,
}

impl<M: Model> ModelValidator<M> {
    /// Name reported in statistics.
    pub const NAME: &'static str = "Model";

    /// Create a validator for `M`, described as `model_name` in logs.
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            _model: PhantomData,
        }
    }

    /// The model this validator checks against.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }
}

impl<M> fmt::Debug for ModelValidator<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelValidator")
            .field("model", &self.model_name)
            .finish()
    }
}

impl<M: Model> Validator for ModelValidator<M> {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn validate(&self, data: &FieldMap) -> Result<Outcome, ValidatorError> {
        match serde_json::from_value::<M>(Value::Object(data.clone())) {
            Ok(model) => Ok(Outcome::from_errors(model.check())),
            Err(e) => {
                let (field, message) = describe_serde_error(&e);
                let mut errors = FieldErrors::new();
                errors.push(field, message);
                Ok(Outcome::invalid(errors))
            }
        }
    }
}

/// Map a deserialization error to `(field, message)`.
fn describe_serde_error(error: &serde_json::Error) -> (String, String) {
    let text = error.to_string();
    if let Some(field) = backticked_after(&text, "missing field ") {
        return (field, REQUIRED_FIELD.to_string());
    }
    if let Some(field) = backticked_after(&text, "unknown field ") {
        return (field, UNEXPECTED_FIELD.to_string());
    }
    (ROOT_FIELD.to_string(), text)
}

/// Extract the backtick-quoted name following `prefix`.
fn backticked_after(text: &str, prefix: &str) -> Option<String> {
    let rest = text.strip_prefix(prefix)?.strip_prefix('`')?;
    let end = rest.find('`')?;
    Some(rest[..end].to_string())
}
