//! rusqlite integration: bind and read `Nullable<K>` columns.
//!
//! SQLite has five storage classes and no temporal one, so reading goes
//! through `SqliteKind::store_value`, which lets a kind promote column data
//! to a richer `StoreValue` before the generic `scan` rules run.

use chrono::{DateTime, FixedOffset};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef};

use crate::json::Json;
use crate::kind::Kind;
use crate::nullable::Nullable;
use crate::store::StoreValue;
use crate::time::Time;

/// Text layout used when binding timestamps.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f%:z";

// ============================================================================
// SqliteKind
// ============================================================================

/// Maps a raw SQLite column onto the store shapes a kind understands.
pub trait SqliteKind: Kind {
    fn store_value(value: ValueRef<'_>) -> FromSqlResult<StoreValue> {
        raw_store_value(value)
    }
}

fn raw_store_value(value: ValueRef<'_>) -> FromSqlResult<StoreValue> {
    Ok(match value {
        ValueRef::Null => StoreValue::Null,
        ValueRef::Integer(i) => StoreValue::Integer(i),
        ValueRef::Real(f) => StoreValue::Real(f),
        ValueRef::Text(t) => StoreValue::Text(
            std::str::from_utf8(t)
                .map_err(|e| FromSqlError::Other(Box::new(e)))?
                .to_string(),
        ),
        ValueRef::Blob(b) => StoreValue::Blob(b.to_vec()),
    })
}

fn parse_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_str(text, TIMESTAMP_FORMAT))
        .ok()
}

// Payloads are opaque, so text columns are taken as raw bytes.
impl SqliteKind for Json {
    fn store_value(value: ValueRef<'_>) -> FromSqlResult<StoreValue> {
        match value {
            ValueRef::Text(t) => Ok(StoreValue::Blob(t.to_vec())),
            other => raw_store_value(other),
        }
    }
}

impl SqliteKind for Time {
    fn store_value(value: ValueRef<'_>) -> FromSqlResult<StoreValue> {
        let raw = raw_store_value(value)?;
        if let StoreValue::Text(text) = &raw {
            if let Some(ts) = parse_timestamp(text) {
                return Ok(StoreValue::Timestamp(ts));
            }
        }
        Ok(raw)
    }
}

// ============================================================================
// ToSql / FromSql
// ============================================================================

impl From<StoreValue> for Value {
    fn from(value: StoreValue) -> Self {
        match value {
            StoreValue::Null => Value::Null,
            StoreValue::Integer(i) => Value::Integer(i),
            StoreValue::Real(f) => Value::Real(f),
            StoreValue::Bool(b) => Value::Integer(i64::from(b)),
            StoreValue::Text(s) => Value::Text(s),
            StoreValue::Blob(b) => Value::Blob(b),
            StoreValue::Timestamp(t) => Value::Text(t.format(TIMESTAMP_FORMAT).to_string()),
        }
    }
}

impl<K: Kind> ToSql for Nullable<K> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::Owned(self.to_store_value().into()))
    }
}

impl<K: SqliteKind> FromSql for Nullable<K> {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let mut field = Self::default();
        field
            .scan(K::store_value(value)?)
            .map_err(|e| FromSqlError::Other(Box::new(e)))?;
        Ok(field)
    }
}
