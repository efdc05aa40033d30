//! # itemval-pipeline — Item Validation Dispatch
//!
//! Matches each record to the validators registered for its type, runs
//! them in order, reports per-field error statistics, and applies the
//! configured error policy.
//!
//! ## Components
//!
//! - **Registry** (`registry.rs`): type key → ordered validators, plus one
//!   universal list. Built once, read-only afterwards.
//! - **Statistics** (`stats.rs`): the [`StatsSink`] counter store and the
//!   [`ValidationStatsManager`] that names the counters.
//! - **Dispatcher** (`pipeline.rs`): [`ItemValidationPipeline::process_item`],
//!   the per-record loop, error aggregation, and the annotate/drop policy.
//! - **Settings** (`settings.rs`): reads the `SPIDERMON_VALIDATION_*` keys
//!   and turns schema/model declarations into a registry.
//!
//! ## Flow
//!
//! ```text
//! settings → build_registry → ItemValidationPipeline::new
//! record → to_field_map → stats(items, fields) → lookup(type) →
//!   validate → stats(errors) → annotate? → drop? → record
//! ```

pub mod config;
pub mod error;
pub mod pipeline;
pub mod registry;
pub mod settings;
pub mod stats;

pub use config::{PipelineConfig, DEFAULT_ERRORS_FIELD};
pub use error::PipelineError;
pub use pipeline::{merge_errors, ItemValidationPipeline};
pub use registry::{RegistryBuilder, RegistrySummary, ValidatorRegistry};
pub use settings::{build_registry, DeclarationLoader, ValidationSettings};
pub use stats::{MemoryStats, StatsSink, StatsSnapshot, ValidationStatsManager};
