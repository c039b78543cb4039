//! Serde and validation helpers shared by the domain modules.

use serde::{Deserialize, Deserializer};
use stacks_http::field_error;
use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime};

/// Push a detail when a required text field is blank.
pub fn require_text(field: &str, value: &str, details: &mut Vec<serde_json::Value>) {
    if value.trim().is_empty() {
        details.push(field_error(field, "must not be blank"));
    }
}

/// Distinguish an absent field (`None`) from an explicit `null`
/// (`Some(None)`). Pair with `#[serde(default)]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// RFC 3339 timestamps that also accept a bare `YYYY-MM-DD` date as
/// midnight UTC when deserializing.
pub mod timestamp {
    use super::*;
    use serde::de::Error as _;
    use serde::Serializer;

    pub fn parse(raw: &str) -> Result<OffsetDateTime, String> {
        if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
            return Ok(ts);
        }
        Date::parse(raw, format_description!("[year]-[month]-[day]"))
            .map(|date| date.midnight().assume_utc())
            .map_err(|_| format!("`{raw}` is neither an RFC 3339 timestamp nor a YYYY-MM-DD date"))
    }

    pub fn serialize<S: Serializer>(value: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        time::serde::rfc3339::serialize(value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OffsetDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(D::Error::custom)
    }
}
