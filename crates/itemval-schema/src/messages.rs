//! Messages shared by the built-in validators.

/// A required field is absent from the record.
pub const REQUIRED_FIELD: &str = "Missing required field";

/// The record carries a field the schema or model does not allow.
pub const UNEXPECTED_FIELD: &str = "Unexpected field";

/// Key used for errors that do not belong to a single field.
pub const ROOT_FIELD: &str = "(root)";

/// Join a dotted parent path and a child name.
pub(crate) fn join_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{parent}.{child}")
    }
}
