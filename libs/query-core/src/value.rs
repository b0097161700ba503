//! Comparison and formatting helpers over JSON values.

use std::cmp::Ordering;

use serde_json::Value;

/// Largest integer that survives an f64 round trip.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Strict equality, except that numbers compare by value (`15 == 15.0`).
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

fn type_rank(v: Option<&Value>) -> u8 {
    match v {
        None | Some(Value::Null) => 0,
        Some(Value::Bool(_)) => 1,
        Some(Value::Number(_)) => 2,
        Some(Value::String(_)) => 3,
        Some(Value::Array(_)) => 4,
        Some(Value::Object(_)) => 5,
    }
}

/// Natural ordering used by `sort`: missing/null first, then booleans,
/// numbers, strings. Arrays and objects tie with their own kind.
pub fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Bool(x)), Some(Value::Bool(y))) => x.cmp(y),
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let x = x.as_f64().unwrap_or(f64::NAN);
            let y = y.as_f64().unwrap_or(f64::NAN);
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Build a JSON number, keeping integral values as integers.
pub fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Render a number the way a JavaScript client would print it (`1`, not `1.0`).
pub fn display_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Text form of an enum option as it appears in a query string.
pub fn display_option(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n
            .as_f64()
            .map(display_number)
            .unwrap_or_else(|| n.to_string()),
        other => other.to_string(),
    }
}

/// Coerce a raw query string to a number with `Number()` semantics:
/// trimmed, empty means zero, anything unparsable is `None`.
pub fn coerce_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    let parsed = match trimmed {
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        s if s.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') => return None,
        s => s.parse::<f64>().ok()?,
    };
    (!parsed.is_nan()).then_some(parsed)
}
