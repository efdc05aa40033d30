//! Error policy configuration for the dispatcher.

use serde::{Deserialize, Serialize};

/// Field name errors are written under when annotation is enabled.
pub const DEFAULT_ERRORS_FIELD: &str = "_validation";

/// What the dispatcher does with records that fail validation.
///
/// Both switches off means validation is observational: errors are
/// counted but records are neither changed nor dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Reject a record at its first failing validator.
    pub drop_items_with_errors: bool,
    /// Merge every failing validator's errors onto the record.
    pub add_errors_to_items: bool,
    /// Name of the errors container on annotated records.
    pub errors_field: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            drop_items_with_errors: false,
            add_errors_to_items: false,
            errors_field: DEFAULT_ERRORS_FIELD.to_string(),
        }
    }
}
