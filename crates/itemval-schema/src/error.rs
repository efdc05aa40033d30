//! # Configuration Errors
//!
//! Every way building the validator set can fail. These are fatal at
//! startup: a partially loaded set of validators is never used.

use thiserror::Error;

/// A malformed or unsupported validator declaration.
#[derive(Error, Debug)]
pub enum ConfigurationError {
    /// A settings value had the wrong container type.
    #[error("Invalid <{found}> type for <{setting}> settings, dict or list/tuple is required")]
    InvalidSettingsType {
        /// Settings key that was misconfigured.
        setting: String,
        /// JSON kind that was found instead.
        found: &'static str,
    },

    /// A schema declaration did not resolve to a JSON object.
    #[error(
        "Invalid schema '{reference}', jsonschemas must be defined as:\n\
         - an inline JSON object.\n\
         - a catalogue reference to a JSON object.\n\
         - a catalogue reference to a JSON string.\n\
         - a path to a JSON file."
    )]
    InvalidSchema {
        /// The declaration as written.
        reference: String,
    },

    /// A model declaration did not resolve to a registered model.
    #[error("Invalid model '{reference}', models must be registered in the catalogue as models")]
    InvalidModel {
        /// The declaration as written.
        reference: String,
    },

    /// A dotted reference is malformed.
    #[error("Error loading object '{reference}': {reason}")]
    InvalidReference {
        /// The reference as written.
        reference: String,
        /// Why the reference is malformed.
        reason: String,
    },

    /// A dotted reference names nothing in the catalogue.
    #[error("Error loading object '{reference}': not found in the object catalogue")]
    UnresolvedReference {
        /// The reference as written.
        reference: String,
    },

    /// A schema file could not be read or parsed.
    #[error("schema file error for '{path}': {reason}")]
    SchemaFile {
        /// Path to the schema file.
        path: String,
        /// Reason the file could not be used.
        reason: String,
    },

    /// The schema parsed but could not be compiled.
    #[error("validator build error for schema '{reference}': {reason}")]
    SchemaBuild {
        /// The declaration as written.
        reference: String,
        /// Compiler error.
        reason: String,
    },

    /// A settings file could not be read or parsed.
    #[error("settings error for '{path}': {reason}")]
    SettingsFile {
        /// Path to the settings file.
        path: String,
        /// Reason the file could not be used.
        reason: String,
    },
}
