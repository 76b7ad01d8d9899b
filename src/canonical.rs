// src/canonical.rs

//! Canonical JSON text: object keys sorted recursively by UTF-16 code units.
//!
//! Code-unit order (not code-point order) is what browser-side consumers of
//! persisted caches sort by, so it is reproduced exactly here.

use serde::Serialize;
use serde_json::Value;
use std::cmp::Ordering;

/// Compares two strings by their UTF-16 code units.
pub fn cmp_utf16(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

/// Serializes `value` to canonical JSON.
pub fn to_canonical_string<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<String> {
    let value = serde_json::to_value(value)?;
    Ok(value_to_canonical_string(&value))
}

/// Canonical JSON text of an already built [`Value`].
pub fn value_to_canonical_string(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, &mut out);
    out
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|(a, _), (b, _)| cmp_utf16(a, b));
            out.push('{');
            for (i, (key, item)) in entries.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::from(key.as_str()).to_string());
                out.push(':');
                write_value(item, out);
            }
            out.push('}');
        }
        // Scalars already have a single textual form.
        scalar => out.push_str(&scalar.to_string()),
    }
}
