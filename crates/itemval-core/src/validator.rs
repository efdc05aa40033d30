//! # Validator Contract
//!
//! A validator checks one field mapping and reports per-field errors.
//! Schema-based and model-based implementations live in `itemval-schema`;
//! hosts may add their own.

use std::fmt;
use std::sync::Arc;

use crate::error::ValidatorError;
use crate::outcome::{FieldMap, Outcome};

/// A check applied to the field mapping of a record.
///
/// Implementations must be deterministic: the same mapping always yields
/// the same outcome. An `Err` means the validator itself broke, not that
/// the record is invalid.
pub trait Validator: Send + Sync + fmt::Debug {
    /// Short name used in statistics keys (e.g. `JSONSchema`).
    fn name(&self) -> &str;

    /// Validate `data` and report the fields that failed.
    fn validate(&self, data: &FieldMap) -> Result<Outcome, ValidatorError>;
}

/// A validator shared between several registry keys.
pub type SharedValidator = Arc<dyn Validator>;
