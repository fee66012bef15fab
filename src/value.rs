//! Lenient coercion helpers over `serde_json::Value`
//!
//! Graph exports and generic metadata blobs are hand-assembled by many
//! different tools; numbers arrive as numbers or numeric strings, and seeds
//! can exceed what an f64 holds. These helpers centralize the tolerant
//! readings so every caller degrades the same way.

use serde_json::Value;

/// Read a value as an integer. Accepts integer and float JSON numbers
/// (floats truncate) and numeric strings.
pub(crate) fn as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_u64().and_then(|u| i64::try_from(u).ok()))
            .or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => {
            let trimmed = s.trim();
            trimmed
                .parse::<i64>()
                .ok()
                .or_else(|| trimmed.parse::<f64>().ok().map(|f| f as i64))
        }
        _ => None,
    }
}

/// Read a value as a float. Accepts JSON numbers and numeric strings.
pub(crate) fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Read a value as non-empty trimmed text.
pub(crate) fn as_text(value: &Value) -> Option<String> {
    let trimmed = value.as_str()?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Read a value as text, rendering numbers exactly as written.
///
/// Used for seeds: a 64-bit seed rendered through f64 would lose digits,
/// while `serde_json::Number`'s own formatting is exact.
pub(crate) fn number_or_text(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(_) => as_text(value),
        _ => None,
    }
}
