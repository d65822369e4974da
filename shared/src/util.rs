//! Lenient serde helpers
//!
//! The upstream services disagree on identifier and timestamp encodings:
//! the order service speaks integers and naive `datetime.utcnow()` strings,
//! the kitchen service stores identifiers as strings. These helpers accept
//! both so the rest of the workspace works with `i64` and `DateTime<Utc>`.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::{self, Deserializer, Unexpected};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i64),
    Str(String),
}

fn int_from(value: IntOrString) -> Result<i64, String> {
    match value {
        IntOrString::Int(v) => Ok(v),
        IntOrString::Str(s) => s.trim().parse::<i64>().map_err(|_| s),
    }
}

/// Deserialize an `i64` that may arrive as a JSON number or a numeric string
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IntOrString::deserialize(deserializer)?;
    int_from(raw).map_err(|s| de::Error::invalid_value(Unexpected::Str(&s), &"an integer id"))
}

/// Optional variant of [`lenient_i64`]; use with `#[serde(default)]`
pub fn lenient_i64_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<IntOrString>::deserialize(deserializer)?;
    raw.map(int_from)
        .transpose()
        .map_err(|s| de::Error::invalid_value(Unexpected::Str(&s), &"an integer id"))
}

/// Parse an RFC 3339 timestamp, falling back to a naive timestamp read as UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Deserialize an optional timestamp. Unparseable strings become `None`
/// rather than failing the whole record.
pub fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(|s| {
        let parsed = parse_timestamp(s);
        if parsed.is_none() {
            tracing::debug!(value = s, "Ignoring unparseable timestamp");
        }
        parsed
    }))
}
