//! # itemval-schema — Validators and Validator Loading
//!
//! Provides the concrete validators the pipeline registers and the loader
//! that builds them from declarations.
//!
//! ## Validators
//!
//! - [`JsonSchemaValidator`] — compiles a JSON Schema once and reports
//!   violations keyed by dotted field path.
//! - [`ModelValidator`] — deserializes the field mapping into a serde
//!   [`Model`] and runs the model's own checks.
//!
//! ## Loading (`loader`)
//!
//! [`ValidatorLoader`] resolves a declaration into a validator. A schema
//! declaration is an inline JSON object, a path to a `.json` file, or a
//! dotted reference into the [`ObjectCatalog`]. A model declaration is a
//! dotted reference to a model registered in the catalogue.
//!
//! ## Crate Policy
//!
//! - Depends only on `itemval-core` internally.
//! - All loading happens at construction; `validate` never performs I/O.
//! - Every loading failure is a [`ConfigurationError`].

pub mod catalog;
pub mod error;
pub mod json_schema;
pub mod loader;
pub mod messages;
pub mod model;

pub use catalog::{CatalogEntry, ObjectCatalog};
pub use error::ConfigurationError;
pub use json_schema::JsonSchemaValidator;
pub use loader::ValidatorLoader;
pub use model::{Model, ModelValidator};
