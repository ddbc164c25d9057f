//! Lenient field decoders for the classifier payload.
//!
//! Each decoder reads a raw `serde_json::Value`. A field of the wrong shape
//! decodes as `None` (or its entry is dropped) so one bad sub-signal never
//! rejects the whole verdict.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::types::{FlagValue, SuspiciousUrl};

fn raw<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Value>, D::Error> {
    Option::<Value>::deserialize(deserializer)
}

/// Finite number from a JSON number or a numeric string
fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite())
}

// ============================================================================
// TOP-LEVEL FIELDS
// ============================================================================

pub fn boolean<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(matches!(raw(deserializer)?, Some(Value::Bool(true))))
}

pub fn score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    Ok(raw(deserializer)?
        .as_ref()
        .and_then(number)
        .map(|n| n.round().clamp(i32::MIN as f64, i32::MAX as f64) as i32)
        .unwrap_or(0))
}

pub fn fraction<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f32, D::Error> {
    Ok(raw(deserializer)?.as_ref().and_then(number).map(|n| n as f32).unwrap_or(0.0))
}

// ============================================================================
// EXPLANATION FIELDS
// ============================================================================

/// Non-negative count; floats are rounded
pub fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    Ok(raw(deserializer)?
        .as_ref()
        .and_then(number)
        .map(|n| n.round().clamp(0.0, u32::MAX as f64) as u32))
}

pub fn ratio<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f32>, D::Error> {
    Ok(raw(deserializer)?.as_ref().and_then(number).map(|n| n as f32))
}

pub fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(match raw(deserializer)? {
        Some(Value::Bool(b)) => Some(b),
        _ => None,
    })
}

/// String list; non-string entries are dropped, non-arrays are `None`
pub fn strings<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<String>>, D::Error> {
    Ok(match raw(deserializer)? {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
        ),
        _ => None,
    })
}

/// Suspicious links; a bare string is a link with zero risk
pub fn links<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<SuspiciousUrl>>, D::Error> {
    Ok(match raw(deserializer)? {
        Some(Value::Array(items)) => Some(items.into_iter().filter_map(link).collect()),
        _ => None,
    })
}

fn link(item: Value) -> Option<SuspiciousUrl> {
    match item {
        Value::String(url) => Some(SuspiciousUrl { url, risk: 0 }),
        Value::Object(ref fields) => {
            let url = fields.get("url")?.as_str()?.to_string();
            let risk = fields.get("risk").and_then(risk_percent).unwrap_or(0);
            Some(SuspiciousUrl { url, risk })
        }
        _ => None,
    }
}

/// Link risk as a 0-100 percentage. A fractional value in 0..=1 is a
/// probability and is scaled.
fn risk_percent(value: &Value) -> Option<i32> {
    let n = number(value)?;
    let percent = if n.fract() != 0.0 && (0.0..=1.0).contains(&n) { n * 100.0 } else { n };
    Some(percent.round().clamp(0.0, 100.0) as i32)
}

pub fn risk<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    Ok(raw(deserializer)?.as_ref().and_then(risk_percent).unwrap_or(0))
}

/// Named flag map; non-objects are `None`
pub fn summary<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<BTreeMap<String, FlagValue>>, D::Error> {
    Ok(match raw(deserializer)? {
        Some(Value::Object(fields)) => Some(
            fields
                .into_iter()
                .map(|(key, value)| (key, FlagValue::from(value)))
                .collect(),
        ),
        _ => None,
    })
}

impl From<Value> for FlagValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Bool(b) => FlagValue::Flag(b),
            Value::Array(items) if items.iter().all(Value::is_string) => FlagValue::Phrases(
                items
                    .into_iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            ),
            other => FlagValue::Other(other),
        }
    }
}
