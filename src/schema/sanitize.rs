//! Null stripping

use serde_json::Value;

/// Copy of `value` with every null-valued object entry removed, at any depth.
///
/// Empty objects and arrays are kept, and array elements are never dropped
/// (a null inside an array keeps its position).
pub fn strip_nulls(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, entry)| !entry.is_null())
                .map(|(key, entry)| (key.clone(), strip_nulls(entry)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(strip_nulls).collect()),
        scalar => scalar.clone(),
    }
}
