//! Timestamp wire format: `MM/DD/YYYY HH:MM:SS`, always UTC.
//!
//! Use as `#[serde(default, with = "wire_time")]` on an
//! `Option<DateTime<Utc>>` field. Reading is lenient: `null`, an empty
//! string and an unparseable string all become `None`; the last case is
//! logged.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// `chrono` format string for wire timestamps.
pub const FORMAT: &str = "%m/%d/%Y %H:%M:%S";

/// Render a timestamp in wire format.
#[must_use]
pub fn format(time: &DateTime<Utc>) -> String {
    time.format(FORMAT).to_string()
}

/// Parse a wire-format timestamp.
///
/// # Errors
///
/// Returns `chrono::ParseError` if `s` is not in [`FORMAT`].
pub fn parse(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s.trim(), FORMAT).map(|naive| naive.and_utc())
}

/// Serialize an optional timestamp as a wire string or `null`.
///
/// # Errors
///
/// Propagates serializer errors.
#[allow(clippy::ref_option)]
pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(time) => serializer.serialize_str(&format(time)),
        None => serializer.serialize_none(),
    }
}

/// Deserialize an optional timestamp, mapping anything unusable to `None`.
///
/// # Errors
///
/// Fails only if the value is neither a string nor `null`.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => match parse(&s) {
            Ok(time) => Ok(Some(time)),
            Err(e) => {
                tracing::warn!(value = %s, error = %e, "Ignoring unparseable timestamp");
                Ok(None)
            }
        },
    }
}
