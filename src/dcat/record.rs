//! Metadata records
//!
//! A record is a JSON object of field → value, where a value is a scalar,
//! a list, or an object carrying a `display_name`.

use serde_json::{Map, Value};
use tracing::warn;

/// Field name → value
pub type Record = Map<String, Value>;

/// Record field holding the language code of literal fields
pub const METADATA_LANGUAGE: &str = "metadata_language";

/// Record field holding the distributions of a dataset
pub const RESOURCES: &str = "resources";

/// Field value as text, or `None` for an absent or null field
pub fn text<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record.get(field).and_then(|v| v.as_str())
}

/// Field value, treating JSON null as absent
pub fn value<'a>(record: &'a Record, field: &str) -> Option<&'a Value> {
    record.get(field).filter(|v| !v.is_null())
}

/// Lexical form of a scalar value.
///
/// Objects yield their `display_name`; arrays and nulls yield nothing.
pub fn lexical(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => map.get("display_name").and_then(lexical),
        Value::Array(_) | Value::Null => None,
    }
}

/// Boolean reading of a value: native `true`, `"true"` or `"True"`
pub fn is_true(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s == "true" || s == "True",
        _ => false,
    }
}

/// Distribution records of a dataset record with their list index, in order.
///
/// A missing field means no distributions. Entries that are not objects
/// are skipped but keep their slot, so indices match the source list.
pub fn resources(record: &Record) -> Vec<(usize, &Record)> {
    match value(record, RESOURCES) {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| match item {
                Value::Object(resource) => Some((index, resource)),
                other => {
                    warn!("Skipping resource {} that is not an object: {}", index, other);
                    None
                }
            })
            .collect(),
        Some(other) => {
            warn!("Ignoring '{}' that is not a list: {}", RESOURCES, other);
            Vec::new()
        }
        None => Vec::new(),
    }
}
