//! Ordering over JSON values for the in-memory sort stage.

use std::cmp::Ordering;

use serde_json::Value;

/// Total order over JSON values.
///
/// Values of different kinds order by kind rank
/// (null < bool < number < string < array < object); within a kind,
/// numbers compare as f64, strings lexicographically, and composite
/// values by their serialized text. The order exists to make sorting
/// deterministic for heterogeneous fields, not to be meaningful across
/// kinds.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
        (Value::Number(a), Value::Number(b)) => {
            let a = a.as_f64().unwrap_or(f64::NAN);
            let b = b.as_f64().unwrap_or(f64::NAN);
            a.total_cmp(&b)
        }
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Array(_), Value::Array(_)) | (Value::Object(_), Value::Object(_)) => {
            a.to_string().cmp(&b.to_string())
        }
        _ => rank(a).cmp(&rank(b)),
    }
}

fn rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}
