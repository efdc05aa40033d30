//! # JSON Serialization Helpers
//!
//! Reports (statistics snapshots, registry summaries) render as JSON with
//! sorted keys and a four-space indent, so that output is stable across
//! runs and diffs cleanly.

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;

use crate::error::CoreError;

/// Types that render as a stable, human-readable JSON document.
pub trait JsonSerializable: Serialize {
    /// The JSON value of `self`. Object keys come out sorted.
    fn to_json(&self) -> Result<Value, CoreError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Pretty-printed JSON with a four-space indent and sorted keys.
    fn json(&self) -> Result<String, CoreError> {
        // Round-trip through `Value` so map keys are sorted regardless of
        // the source container.
        let value = self.to_json()?;
        let mut out = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        value.serialize(&mut ser)?;
        Ok(String::from_utf8_lossy(&out).into_owned())
    }
}

/// Name of the JSON kind of `value`, for error messages.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
