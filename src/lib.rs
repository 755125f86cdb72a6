//! Tri-state nullable fields for the Less data layer.
//!
//! A `Nullable<K>` distinguishes a field that was never addressed, one that
//! was explicitly null, and one that holds a value, and keeps that distinction
//! consistent across JSON, plain text, and store (scan/bind) conversions.
//!
//! Two kinds are provided: [`NullJson`] for opaque JSON payloads and
//! [`NullTime`] for timestamps. The SQLite adapter is behind the `sqlite`
//! feature (on by default).

mod error;
mod json;
mod kind;
mod nullable;
mod randomize;
#[cfg(feature = "sqlite")]
pub mod sqlite;
mod store;
mod time;

pub use error::{NullError, Result};
pub use json::{Json, NullJson};
pub use kind::Kind;
pub use nullable::{Nullable, Tristate};
pub use randomize::{random_date, random_token, FixtureOptions};
pub use store::StoreValue;
pub use time::{NullTime, Time};

/// The structured-protocol null token.
pub const NULL_BYTES: &[u8] = b"null";
