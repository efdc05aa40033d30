//! # Check-Settings Subcommand
//!
//! Builds every validator a settings file declares and prints the
//! validator names per type key as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use itemval_core::JsonSerializable;
use itemval_pipeline::{build_registry, RegistrySummary};
use itemval_schema::ValidatorLoader;

use crate::{load_catalog, load_settings, settings_base_dir};

/// Arguments for the check-settings subcommand.
#[derive(Args, Debug)]
pub struct CheckSettingsArgs {
    /// Settings file (YAML, or JSON if it ends in `.json`).
    #[arg(long)]
    pub settings: PathBuf,

    /// Catalogue file mapping dotted references to schemas.
    #[arg(long)]
    pub catalog: Option<PathBuf>,
}

/// Execute the check-settings subcommand.
pub fn run_check_settings(args: &CheckSettingsArgs) -> Result<u8> {
    let summary = check_settings(args)?;
    println!("{}", summary.json()?);
    Ok(0)
}

/// Build the declared registry and summarize it.
pub fn check_settings(args: &CheckSettingsArgs) -> Result<RegistrySummary> {
    let settings = load_settings(&args.settings)?;
    let catalog = load_catalog(args.catalog.as_deref())?;
    let loader = ValidatorLoader::new(&catalog).with_base_dir(settings_base_dir(&args.settings));
    let registry = build_registry(&settings, &loader)
        .with_context(|| format!("invalid settings in {}", args.settings.display()))?;
    Ok(registry.summary())
}
