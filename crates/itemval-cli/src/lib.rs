//! # itemval-cli — Item Validation Command-Line Interface
//!
//! Provides the `itemval` binary.
//!
//! ## Subcommands
//!
//! - `itemval validate` — validate a JSON-lines item stream.
//! - `itemval check-settings` — build the validators a settings file
//!   declares and list them per type.
//!
//! ```bash
//! itemval validate --settings settings.yaml --items items.jl --out valid.jl --stats stats.json
//! itemval check-settings --settings settings.yaml --catalog catalog.yaml
//! ```
//!
//! ## Catalogue Files
//!
//! The binary cannot register Rust models, so dotted references resolve
//! against an optional catalogue file: a YAML or JSON mapping of
//! reference to schema. Object values are registered as schemas, string
//! values as serialized schemas.

pub mod check;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde_json::Value;

use itemval_pipeline::ValidationSettings;
use itemval_schema::ObjectCatalog;

/// Load a settings file and apply environment overrides.
pub fn load_settings(path: &Path) -> Result<ValidationSettings> {
    let mut settings = ValidationSettings::from_file(path)?;
    settings.apply_env();
    Ok(settings)
}

/// Directory relative schema paths in `settings_path` are resolved from.
pub fn settings_base_dir(settings_path: &Path) -> PathBuf {
    match settings_path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Load a catalogue file, or an empty catalogue when `path` is `None`.
pub fn load_catalog(path: Option<&Path>) -> Result<ObjectCatalog> {
    let mut catalog = ObjectCatalog::new();
    let Some(path) = path else {
        return Ok(catalog);
    };

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalogue {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let document: Value = if is_json {
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse catalogue {}", path.display()))?
    } else {
        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse catalogue {}", path.display()))?
    };

    let Value::Object(entries) = document else {
        bail!(
            "catalogue {} must be a mapping of reference to schema",
            path.display()
        );
    };
    for (reference, value) in entries {
        match value {
            Value::String(text) => catalog.register_text(reference, text),
            other => catalog.register_value(reference, other),
        };
    }
    tracing::debug!(path = %path.display(), entries = catalog.len(), "loaded catalogue");
    Ok(catalog)
}
