use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::Error;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses an ISO-8601 style timestamp.
///
/// RFC 3339 strings keep their offset (`Z` is UTC) before being normalised to UTC.
/// Date-times without an offset are taken to be UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Custom deserializer for timestamps that accepts RFC3339-like strings and integers (ms).
/// An absent or null field becomes `None`; anything unparseable is an error.
pub fn deserialize_optional_timestamp<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => {
            let ms = n.as_i64().ok_or_else(|| Error::custom("invalid timestamp"))?;
            DateTime::from_timestamp_millis(ms)
                .map(Some)
                .ok_or_else(|| Error::custom("timestamp out of range"))
        }
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => parse_timestamp(&s)
            .map(Some)
            .ok_or_else(|| Error::custom(format!("invalid timestamp: {}", s))),
        _ => Err(Error::custom("timestamp must be a number or string")),
    }
}
