//! Forgiving field decoders. The backend applies no schema of its own, so
//! nulls and loosely typed values are folded into sensible defaults here.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// JavaScript-style truthiness of a JSON value.
pub fn json_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Decode `null` as `T::default()`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Falsy values become `None`; truthy non-strings keep their JSON text.
pub fn truthy_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(v) if !json_truthy(&v) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
        None => None,
    })
}

/// Decode as `T`, or `T::default()` when the value has an unexpected shape.
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Strings pass through, `null` is empty, other scalars keep their JSON text.
pub fn loose_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_text(Value::deserialize(deserializer)?).unwrap_or_default())
}

/// Like [`loose_string`] but `null` stays absent.
pub fn loose_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_text(Value::deserialize(deserializer)?))
}

pub fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(json_truthy(&Value::deserialize(deserializer)?))
}

pub fn loose_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(count_of(&Value::deserialize(deserializer)?))
}

/// Per-client counts where any value that is not a count reads as zero.
pub fn loose_counts<'de, D>(deserializer: D) -> Result<Option<BTreeMap<String, u64>>, D::Error>
where
    D: Deserializer<'de>,
{
    let counts = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
    Ok(counts.map(|counts| {
        counts
            .into_iter()
            .map(|(client, value)| (client, count_of(&value)))
            .collect()
    }))
}

fn value_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

/// Non-negative integers and floats (truncated), or numeric strings.
fn count_of(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n.as_u64().unwrap_or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map_or(0, |f| f as u64)
        }),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}
