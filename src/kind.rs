//! Per-kind strategies injected into `Nullable<K>`.
//!
//! The wrapper owns the tri-state rules (null token, empty input, store null
//! sentinel, failure atomicity). A `Kind` only converts non-null payloads.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::randomize::FixtureOptions;
use crate::store::StoreValue;

/// Strategy set for one scalar kind.
pub trait Kind {
    /// In-memory representation of a present value.
    type Value: Clone + Debug + PartialEq;

    /// Shape used by the serde integration for a present value.
    type Wire: Serialize + DeserializeOwned;

    /// Type name used in error messages.
    const NAME: &'static str;

    /// Whether `value` is this kind's nil sentinel. Used by `from_value`.
    fn is_nil(_value: &Self::Value) -> bool {
        false
    }

    /// Decode a non-null structured token.
    fn decode_json(data: &[u8]) -> Result<Self::Value>;

    /// Encode a present value. `None` means the payload encodes as the null token.
    fn encode_json(value: &Self::Value) -> Result<Option<Vec<u8>>>;

    /// Decode a non-empty plain-text span.
    fn decode_text(text: &[u8]) -> Result<Self::Value>;

    fn encode_text(value: &Self::Value) -> Result<Vec<u8>>;

    /// Plain-text representation of an invalid value. `None` emits nothing.
    fn text_null() -> Option<Vec<u8>>;

    /// Coerce a non-null store value.
    fn scan(value: StoreValue) -> Result<Self::Value>;

    fn to_store(value: &Self::Value) -> StoreValue;

    /// `None` means the present value serializes as none.
    fn to_wire(value: &Self::Value) -> Result<Option<Self::Wire>>;

    fn from_wire(wire: Self::Wire) -> Result<Self::Value>;

    /// Produce a valid pseudo-random value for fixtures.
    fn random(
        next_int: &mut dyn FnMut() -> i64,
        field_type: &str,
        opts: &FixtureOptions,
    ) -> Self::Value;
}
