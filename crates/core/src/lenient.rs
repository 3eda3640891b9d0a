//! Lenient number parsing for inventory documents.
//!
//! The ticketing backend is inconsistent about whether ids, rows and seat
//! numbers are JSON numbers or numeric strings, so every numeric field of the
//! wire types goes through these helpers.

use serde::{de, Deserialize, Deserializer};
use serde_json::Value;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(serde_json::Number),
    Text(String),
}

/// Interpret a JSON value as an integer.
///
/// Accepts integers, integral floats and numeric strings (surrounding
/// whitespace ignored). Anything else yields `None`.
pub(crate) fn as_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => number_to_i64(n),
        Value::String(s) => text_to_i64(s),
        _ => None,
    }
}

fn number_to_i64(n: &serde_json::Number) -> Option<i64> {
    if let Some(v) = n.as_i64() {
        return Some(v);
    }
    n.as_f64()
        .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
        .map(|f| f as i64)
}

fn text_to_i64(s: &str) -> Option<i64> {
    let s = s.trim();
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    s.parse::<f64>()
        .ok()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .map(|f| f as i64)
}

/// Deserialize an `i64` from a number or numeric string.
pub(crate) fn i64_from_any<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = NumberOrText::deserialize(deserializer)?;
    let parsed = match &raw {
        NumberOrText::Number(n) => number_to_i64(n),
        NumberOrText::Text(s) => text_to_i64(s),
    };
    parsed.ok_or_else(|| de::Error::custom("expected an integer or numeric string"))
}

/// Deserialize a `u64` from a number or numeric string.
pub(crate) fn u64_from_any<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = i64_from_any(deserializer)?;
    u64::try_from(value).map_err(|_| de::Error::custom("expected a non-negative integer"))
}

/// Deserialize an optional count, treating `null` and garbage as absent.
pub(crate) fn count_from_any<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(as_i64(&value).and_then(|v| u64::try_from(v).ok()))
}
