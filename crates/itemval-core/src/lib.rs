//! # itemval-core — Foundational Types for Item Validation
//!
//! Every other crate in the workspace depends on `itemval-core`; it depends
//! on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Explicit type keys.** Records declare a [`TypeKey`] instead of
//!    relying on runtime class names. One reserved key, the universal key,
//!    matches every record.
//!
//! 2. **Ordered error collections.** [`FieldErrors`] maps a field name to an
//!    append-only list of messages. Merging never overwrites.
//!
//! 3. **Pre-declared errors container.** The [`Record`] trait exposes a
//!    mutable errors container addressed by field name, so annotating a
//!    record never changes its shape at runtime.
//!
//! 4. **One validator contract.** [`Validator::validate`] returns an
//!    [`Outcome`]; internal failures surface as [`ValidatorError`] and are
//!    never reinterpreted by callers.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `itemval-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod outcome;
pub mod record;
pub mod serialization;
pub mod type_key;
pub mod validator;

// Re-export primary types for ergonomic imports.
pub use error::{CoreError, ValidatorError};
pub use outcome::{FieldErrors, FieldMap, Outcome};
pub use record::{field_map_of, Item, Record};
pub use serialization::{value_kind, JsonSerializable};
pub use type_key::{TypeKey, UNIVERSAL_TYPE};
pub use validator::{SharedValidator, Validator};
