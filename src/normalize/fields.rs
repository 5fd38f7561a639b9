//! Field alias resolution and value coercion.
//!
//! The external scanner has shipped the same datum under several names over
//! time (`result` vs `status` vs `classification`, `cert_valid_from` vs
//! `cert_not_before`, ...). Each canonical field owns an explicit, ordered
//! alias list here; the first present alias wins. Keeping the precedence in
//! one table makes it auditable and testable in isolation.

use serde_json::Value;

/// Ordered source aliases for the coarse classification verdict.
pub const CLASSIFICATION_ALIASES: &[&str] = &["classification", "result", "status"];

/// Ordered source aliases for the raw status string.
pub const STATUS_ALIASES: &[&str] = &["status", "result", "classification"];

/// Ordered source aliases for the TLS flag.
pub const TLS_ALIASES: &[&str] = &["tls", "tls_enabled"];

/// Ordered source aliases for certificate validity bounds.
pub const CERT_NOT_BEFORE_ALIASES: &[&str] = &["cert_not_before", "cert_valid_from"];
pub const CERT_NOT_AFTER_ALIASES: &[&str] = &["cert_not_after", "cert_valid_to"];

/// Resolve the first present alias on a raw object.
///
/// `Null` counts as absent, matching the scanner's habit of emitting
/// explicit nulls for fields it could not populate.
pub fn resolve_alias<'a>(raw: &'a Value, aliases: &[&str]) -> Option<&'a Value> {
    for alias in aliases {
        if let Some(v) = raw.get(alias) {
            if !v.is_null() {
                return Some(v);
            }
        }
    }
    None
}

/// Convert a JSON value to a string representation.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => value.to_string(), // arrays and objects as JSON strings
    }
}

/// Convert a JSON value to a float if possible.
pub fn value_to_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Convert a JSON value to an integer if possible.
pub fn value_to_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Convert a JSON value to a boolean if possible.
pub fn value_to_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.to_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" => Some(false),
            _ => None,
        },
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        _ => None,
    }
}

/// Integer coercion clamped into u32, defaulting 0. Negative counts from a
/// buggy scanner run are treated as absent.
pub fn value_to_count(value: &Value) -> u32 {
    value_to_int(value)
        .and_then(|i| u32::try_from(i).ok())
        .unwrap_or(0)
}
