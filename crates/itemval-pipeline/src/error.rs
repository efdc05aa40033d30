//! # Pipeline Errors
//!
//! - `Configuration` is fatal and only happens while building.
//! - `ItemRejected` is per record: the host must not forward it, and the
//!   next record is processed normally.
//! - `Validator` and `Record` carry collaborator failures through
//!   unchanged.

use itemval_core::{CoreError, ValidatorError};
use itemval_schema::ConfigurationError;
use thiserror::Error;

/// Error returned by the dispatcher and its builders.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The validator set could not be built.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// The drop policy rejected the record.
    #[error("Validation failed! item of type '{type_key}' rejected by {validator} validator")]
    ItemRejected {
        /// Type key of the rejected record.
        type_key: String,
        /// Name of the first failing validator.
        validator: String,
    },

    /// A validator broke while validating.
    #[error(transparent)]
    Validator(#[from] ValidatorError),

    /// The record could not be converted to a field mapping.
    #[error(transparent)]
    Record(#[from] CoreError),
}

impl PipelineError {
    /// Whether this error only concerns the current record.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::ItemRejected { .. })
    }
}
