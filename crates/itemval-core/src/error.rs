//! # Error Types
//!
//! Errors shared by every crate in the workspace. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Record conversion errors carry the record's type key.
//! - Validator-internal failures keep their original source error so that
//!   callers can inspect it unchanged.

use thiserror::Error;

/// Error raised while turning a record into a field mapping or back.
#[derive(Error, Debug)]
pub enum CoreError {
    /// The record could not be serialized.
    #[error("record conversion failed for type '{type_key}': {source}")]
    Conversion {
        /// Type key of the record being converted.
        type_key: String,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },

    /// The record serialized to something other than a JSON object.
    #[error("record of type '{type_key}' must convert to an object, got {found}")]
    NotAMapping {
        /// Type key of the record being converted.
        type_key: String,
        /// JSON kind the record serialized to.
        found: &'static str,
    },

    /// A record type field held something other than a string.
    #[error("type field '{field}' must be a string, got {found}")]
    InvalidTypeField {
        /// Name of the type field.
        field: String,
        /// JSON kind found in the field.
        found: &'static str,
    },

    /// JSON serialization failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure inside a validator's own `validate` call.
///
/// This is a collaborator defect, not a validation result. The dispatcher
/// passes it through to its caller untouched.
#[derive(Error, Debug)]
#[error("validator '{validator}' failed: {source}")]
pub struct ValidatorError {
    /// Name of the failing validator.
    pub validator: String,
    /// The validator's own error.
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl ValidatorError {
    /// Wrap an arbitrary error raised by the named validator.
    pub fn new(
        validator: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Self {
            validator: validator.into(),
            source: source.into(),
        }
    }
}
