//! # Item Validation Pipeline
//!
//! The per-record dispatch loop.
//!
//! ## Algorithm
//!
//! 1. Convert the record to a field mapping.
//! 2. Count the item and its fields.
//! 3. Look up validators: type-specific, then universal.
//! 4. For each validator, in order, on failure:
//!    - count every `(field, message)` pair;
//!    - count the item as having errors, once per failing validator;
//!    - annotate, if enabled, by merging into the record's errors field;
//!    - drop, if enabled: count the drop and reject the record without
//!      running the remaining validators.
//! 5. Hand the record back.
//!
//! ## Concurrency
//!
//! The pipeline holds no per-record state. It is `Send + Sync` and can be
//! shared across threads; each record must be processed by one caller.

use std::sync::Arc;

use itemval_core::{FieldErrors, Record};
use itemval_schema::ValidatorLoader;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::registry::ValidatorRegistry;
use crate::settings::{build_registry, ValidationSettings};
use crate::stats::{StatsSink, ValidationStatsManager};

/// Validates records against the registered validators and applies the
/// error policy.
#[derive(Debug)]
pub struct ItemValidationPipeline {
    registry: ValidatorRegistry,
    config: PipelineConfig,
    stats: ValidationStatsManager,
}

impl ItemValidationPipeline {
    /// Create a pipeline and record every registered validator in `stats`.
    pub fn new(
        registry: ValidatorRegistry,
        stats: Arc<dyn StatsSink>,
        config: PipelineConfig,
    ) -> Self {
        let stats = ValidationStatsManager::new(stats);
        for (type_key, validators) in registry.entries() {
            for validator in validators {
                stats.add_validator(type_key.as_str(), validator.name());
            }
        }
        tracing::info!(
            validators = registry.len(),
            drop_items_with_errors = config.drop_items_with_errors,
            add_errors_to_items = config.add_errors_to_items,
            errors_field = %config.errors_field,
            "item validation pipeline ready"
        );
        Self {
            registry,
            config,
            stats,
        }
    }

    /// Build the registry from `settings` and create the pipeline.
    ///
    /// # Errors
    ///
    /// Returns `PipelineError::Configuration` if any declaration is
    /// malformed or cannot be loaded. No pipeline is built in that case.
    pub fn from_settings(
        settings: &ValidationSettings,
        loader: &ValidatorLoader<'_>,
        stats: Arc<dyn StatsSink>,
    ) -> Result<Self, PipelineError> {
        let registry = build_registry(settings, loader)?;
        Ok(Self::new(registry, stats, settings.pipeline_config()))
    }

    /// The error policy in force.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// The validators in force.
    pub fn registry(&self) -> &ValidatorRegistry {
        &self.registry
    }

    /// Validate `record` in place.
    ///
    /// # Errors
    ///
    /// - `PipelineError::ItemRejected` when the drop policy rejects the
    ///   record. Statistics for the failure are already reported.
    /// - `PipelineError::Validator` when a validator breaks.
    /// - `PipelineError::Record` when the record cannot be converted.
    pub fn process_item<R: Record>(&self, record: &mut R) -> Result<(), PipelineError> {
        let data = record.to_field_map()?;
        self.stats.add_item();
        self.stats.add_fields(data.len());

        let type_key = record.type_key();
        for validator in self.registry.lookup(&type_key) {
            let outcome = validator.validate(&data)?;
            if outcome.is_ok() {
                continue;
            }

            for (field, messages) in outcome.errors() {
                for message in messages {
                    self.stats.add_field_error(field, message);
                }
            }
            self.stats.add_item_with_errors();

            if self.config.add_errors_to_items {
                merge_errors(record, &self.config.errors_field, outcome.errors());
            }

            if self.config.drop_items_with_errors {
                self.stats.add_dropped_item();
                tracing::debug!(
                    type_key = %type_key,
                    validator = validator.name(),
                    errors = outcome.errors().message_count(),
                    "dropping item with validation errors"
                );
                return Err(PipelineError::ItemRejected {
                    type_key: type_key.to_string(),
                    validator: validator.name().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Validate `record` and hand it back, possibly annotated.
    ///
    /// # Errors
    ///
    /// Same as [`process_item`](Self::process_item). A rejected record is
    /// consumed.
    pub fn process<R: Record>(&self, mut record: R) -> Result<R, PipelineError> {
        self.process_item(&mut record)?;
        Ok(record)
    }
}

/// Append `errors` to the errors container `errors_field` of `record`.
///
/// The container is created empty if absent. Messages for a field are
/// appended after those already present; nothing is overwritten.
pub fn merge_errors<R: Record>(record: &mut R, errors_field: &str, errors: &FieldErrors) {
    record.errors_mut(errors_field).merge(errors);
}
