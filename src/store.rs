//! Store-driver values: the dynamic shapes a relational driver hands to
//! `scan` and accepts from `to_store_value`.

use chrono::{DateTime, FixedOffset, Utc};

use crate::error::NullError;

// ============================================================================
// StoreValue
// ============================================================================

/// A driver-native value. `StoreValue::Null` is the store's null sentinel.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    Null,
    Integer(i64),
    Real(f64),
    Bool(bool),
    Text(String),
    Blob(Vec<u8>),
    Timestamp(DateTime<FixedOffset>),
}

impl StoreValue {
    pub fn is_null(&self) -> bool {
        matches!(self, StoreValue::Null)
    }

    /// Name of the dynamic shape, used in scan diagnostics.
    pub fn shape(&self) -> &'static str {
        match self {
            StoreValue::Null => "null",
            StoreValue::Integer(_) => "integer",
            StoreValue::Real(_) => "real",
            StoreValue::Bool(_) => "bool",
            StoreValue::Text(_) => "text",
            StoreValue::Blob(_) => "blob",
            StoreValue::Timestamp(_) => "timestamp",
        }
    }

    /// Human-readable rendering of the carried value.
    pub fn describe(&self) -> String {
        match self {
            StoreValue::Null => "NULL".to_string(),
            StoreValue::Integer(i) => i.to_string(),
            StoreValue::Real(f) => f.to_string(),
            StoreValue::Bool(b) => b.to_string(),
            StoreValue::Text(s) => format!("{s:?}"),
            StoreValue::Blob(b) => format!("{:?}", String::from_utf8_lossy(b)),
            StoreValue::Timestamp(t) => t.to_rfc3339(),
        }
    }

    /// Build the scan error for a value that `target` cannot accept.
    pub(crate) fn reject(&self, target: &'static str) -> NullError {
        tracing::debug!(target_kind = target, shape = self.shape(), "scan rejected store value");
        NullError::Scan {
            shape: self.shape(),
            target,
            value: self.describe(),
        }
    }
}

impl From<i64> for StoreValue {
    fn from(v: i64) -> Self {
        StoreValue::Integer(v)
    }
}

impl From<f64> for StoreValue {
    fn from(v: f64) -> Self {
        StoreValue::Real(v)
    }
}

impl From<bool> for StoreValue {
    fn from(v: bool) -> Self {
        StoreValue::Bool(v)
    }
}

impl From<&str> for StoreValue {
    fn from(v: &str) -> Self {
        StoreValue::Text(v.to_string())
    }
}

impl From<String> for StoreValue {
    fn from(v: String) -> Self {
        StoreValue::Text(v)
    }
}

impl From<Vec<u8>> for StoreValue {
    fn from(v: Vec<u8>) -> Self {
        StoreValue::Blob(v)
    }
}

impl From<&[u8]> for StoreValue {
    fn from(v: &[u8]) -> Self {
        StoreValue::Blob(v.to_vec())
    }
}

impl From<DateTime<FixedOffset>> for StoreValue {
    fn from(v: DateTime<FixedOffset>) -> Self {
        StoreValue::Timestamp(v)
    }
}

impl From<DateTime<Utc>> for StoreValue {
    fn from(v: DateTime<Utc>) -> Self {
        StoreValue::Timestamp(v.fixed_offset())
    }
}

impl<T: Into<StoreValue>> From<Option<T>> for StoreValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(StoreValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_maps_to_null_sentinel() {
        let v: StoreValue = Option::<i64>::None.into();
        assert!(v.is_null());
        assert_eq!(v.shape(), "null");
    }

    #[test]
    fn reject_names_shape_and_value() {
        let err = StoreValue::from("not-a-timestamp").reject("NullTime");
        let msg = err.to_string();
        assert!(msg.contains("text"), "{msg}");
        assert!(msg.contains("NullTime"), "{msg}");
        assert!(msg.contains("not-a-timestamp"), "{msg}");
    }

    #[test]
    fn describe_renders_blobs_as_text() {
        assert_eq!(StoreValue::from(&b"{}"[..]).describe(), "\"{}\"");
        assert_eq!(StoreValue::Integer(7).describe(), "7");
    }
}
