//! Timestamp kind, backed by `chrono::DateTime<FixedOffset>` so a decoded
//! offset survives re-encoding.

use chrono::{DateTime, Datelike, FixedOffset, SecondsFormat, Utc};

use crate::error::{NullError, Result};
use crate::kind::Kind;
use crate::nullable::Nullable;
use crate::randomize::{random_date, FixtureOptions};
use crate::store::StoreValue;
use crate::NULL_BYTES;

/// Marker for timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Time;

/// A nullable timestamp.
///
/// Structured input must be a bare quoted RFC 3339 string with a `T`
/// separator. Years outside 0..=9999 have no RFC 3339 form and fail to encode.
pub type NullTime = Nullable<Time>;

fn format_rfc3339(value: &DateTime<FixedOffset>) -> Result<String> {
    if !(0..=9999).contains(&value.year()) {
        return Err(NullError::encode(
            Time::NAME,
            format!("year {} outside of range [0,9999]", value.year()),
        ));
    }
    Ok(value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
}

fn parse_rfc3339(text: &str) -> Result<DateTime<FixedOffset>> {
    if text.as_bytes().get(10) != Some(&b'T') {
        return Err(NullError::decode(Time::NAME, "expected 'T' between date and time"));
    }
    DateTime::parse_from_rfc3339(text).map_err(|e| NullError::decode(Time::NAME, e))
}

impl Kind for Time {
    type Value = DateTime<FixedOffset>;
    type Wire = String;

    const NAME: &'static str = "NullTime";

    fn decode_json(data: &[u8]) -> Result<DateTime<FixedOffset>> {
        if data.len() < 2 || data[0] != b'"' || data[data.len() - 1] != b'"' {
            return Err(NullError::decode(Self::NAME, "expected a quoted RFC 3339 string"));
        }
        let text: String =
            serde_json::from_slice(data).map_err(|e| NullError::decode(Self::NAME, e))?;
        parse_rfc3339(&text)
    }

    fn encode_json(value: &DateTime<FixedOffset>) -> Result<Option<Vec<u8>>> {
        serde_json::to_vec(&format_rfc3339(value)?)
            .map(Some)
            .map_err(|e| NullError::encode(Self::NAME, e))
    }

    fn decode_text(text: &[u8]) -> Result<DateTime<FixedOffset>> {
        let text = std::str::from_utf8(text).map_err(|e| NullError::decode(Self::NAME, e))?;
        parse_rfc3339(text)
    }

    fn encode_text(value: &DateTime<FixedOffset>) -> Result<Vec<u8>> {
        format_rfc3339(value).map(String::into_bytes)
    }

    // Unlike the JSON kind, an invalid time writes the null token as text.
    fn text_null() -> Option<Vec<u8>> {
        Some(NULL_BYTES.to_vec())
    }

    fn scan(value: StoreValue) -> Result<DateTime<FixedOffset>> {
        match value {
            StoreValue::Timestamp(t) => Ok(t),
            other => Err(other.reject(Self::NAME)),
        }
    }

    fn to_store(value: &DateTime<FixedOffset>) -> StoreValue {
        StoreValue::Timestamp(*value)
    }

    fn to_wire(value: &DateTime<FixedOffset>) -> Result<Option<String>> {
        format_rfc3339(value).map(Some)
    }

    fn from_wire(wire: String) -> Result<DateTime<FixedOffset>> {
        parse_rfc3339(&wire)
    }

    fn random(
        next_int: &mut dyn FnMut() -> i64,
        field_type: &str,
        opts: &FixtureOptions,
    ) -> DateTime<FixedOffset> {
        random_date(next_int, field_type, opts)
    }
}

impl From<DateTime<FixedOffset>> for NullTime {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Self::from_value(value)
    }
}

impl From<DateTime<Utc>> for NullTime {
    fn from(value: DateTime<Utc>) -> Self {
        Self::from_value(value.fixed_offset())
    }
}
