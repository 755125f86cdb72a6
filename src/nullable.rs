//! `Nullable<K>`: a field that knows whether it was absent, explicitly null,
//! or present with a value, across the structured, plain-text, and store
//! protocols.

use std::fmt;
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{NullError, Result};
use crate::kind::Kind;
use crate::randomize::FixtureOptions;
use crate::store::StoreValue;
use crate::NULL_BYTES;

// ============================================================================
// Tristate
// ============================================================================

/// The three states of a field.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Tristate<T> {
    /// Never addressed by a decode or mutation.
    #[default]
    Absent,
    /// Addressed, holds no value.
    Null,
    Present(T),
}

// ============================================================================
// Nullable
// ============================================================================

/// A nullable scalar of kind `K`.
///
/// `valid` and `set` are views over the tri-state: `Present` is valid and
/// set, `Null` is set only, `Absent` is neither. Mutators take `&mut self`, so
/// a shared instance cannot be mutated concurrently.
pub struct Nullable<K: Kind> {
    state: Tristate<K::Value>,
    _kind: PhantomData<K>,
}

impl<K: Kind> Nullable<K> {
    fn with_state(state: Tristate<K::Value>) -> Self {
        Self {
            state,
            _kind: PhantomData,
        }
    }

    /// Build from the flag triple. A valid value is always set.
    pub fn new(value: K::Value, valid: bool, set: bool) -> Self {
        let state = match (valid, set) {
            (true, _) => Tristate::Present(value),
            (false, true) => Tristate::Null,
            (false, false) => Tristate::Absent,
        };
        Self::with_state(state)
    }

    /// Valid unless `value` is the kind's nil sentinel. Always set.
    pub fn from_value(value: K::Value) -> Self {
        if K::is_nil(&value) {
            Self::null()
        } else {
            Self::with_state(Tristate::Present(value))
        }
    }

    /// `None` yields an explicit null.
    pub fn from_optional(value: Option<&K::Value>) -> Self {
        match value {
            Some(v) => Self::with_state(Tristate::Present(v.clone())),
            None => Self::null(),
        }
    }

    /// An explicit null.
    pub fn null() -> Self {
        Self::with_state(Tristate::Null)
    }

    pub fn state(&self) -> &Tristate<K::Value> {
        &self.state
    }

    pub fn into_state(self) -> Tristate<K::Value> {
        self.state
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.state, Tristate::Present(_))
    }

    /// True once the field has been addressed by a decode or mutation.
    pub fn is_set(&self) -> bool {
        !self.is_absent()
    }

    pub fn is_absent(&self) -> bool {
        matches!(self.state, Tristate::Absent)
    }

    /// True for null or absent values.
    pub fn is_empty(&self) -> bool {
        !self.is_valid()
    }

    pub fn as_option(&self) -> Option<&K::Value> {
        match &self.state {
            Tristate::Present(v) => Some(v),
            _ => None,
        }
    }

    pub fn into_option(self) -> Option<K::Value> {
        match self.state {
            Tristate::Present(v) => Some(v),
            _ => None,
        }
    }

    /// Replace the value and mark it valid.
    pub fn set_valid(&mut self, value: K::Value) {
        self.state = Tristate::Present(value);
    }

    /// Advance `set` without touching validity.
    fn mark_set(&mut self) {
        if self.is_absent() {
            self.state = Tristate::Null;
        }
    }

    // ========================================================================
    // Structured protocol
    // ========================================================================

    /// Decode one structured token. `null` yields an explicit null; an empty
    /// slice is a caller error.
    pub fn unmarshal_json(&mut self, data: &[u8]) -> Result<()> {
        self.mark_set();
        if data.is_empty() {
            return Err(NullError::decode(K::NAME, "no input bytes"));
        }
        if data == NULL_BYTES {
            self.state = Tristate::Null;
            return Ok(());
        }
        let value = K::decode_json(data).inspect_err(|e| {
            tracing::debug!(kind = K::NAME, error = %e, "structured decode failed");
        })?;
        self.state = Tristate::Present(value);
        Ok(())
    }

    pub fn marshal_json(&self) -> Result<Vec<u8>> {
        let encoded = match &self.state {
            Tristate::Present(v) => K::encode_json(v)?,
            _ => None,
        };
        Ok(encoded.unwrap_or_else(|| NULL_BYTES.to_vec()))
    }

    // ========================================================================
    // Plain-text protocol
    // ========================================================================

    /// Decode a text span. Empty input yields an explicit null.
    pub fn unmarshal_text(&mut self, text: &[u8]) -> Result<()> {
        self.mark_set();
        if text.is_empty() {
            self.state = Tristate::Null;
            return Ok(());
        }
        let value = K::decode_text(text).inspect_err(|e| {
            tracing::debug!(kind = K::NAME, error = %e, "text decode failed");
        })?;
        self.state = Tristate::Present(value);
        Ok(())
    }

    /// `None` means the kind writes nothing for an invalid value.
    pub fn marshal_text(&self) -> Result<Option<Vec<u8>>> {
        match &self.state {
            Tristate::Present(v) => K::encode_text(v).map(Some),
            _ => Ok(K::text_null()),
        }
    }

    // ========================================================================
    // Store protocol
    // ========================================================================

    pub fn scan(&mut self, value: StoreValue) -> Result<()> {
        self.mark_set();
        if value.is_null() {
            self.state = Tristate::Null;
            return Ok(());
        }
        self.state = Tristate::Present(K::scan(value)?);
        Ok(())
    }

    pub fn to_store_value(&self) -> StoreValue {
        match &self.state {
            Tristate::Present(v) => K::to_store(v),
            _ => StoreValue::Null,
        }
    }

    // ========================================================================
    // Fixtures
    // ========================================================================

    pub fn randomize(
        &mut self,
        next_int: &mut dyn FnMut() -> i64,
        field_type: &str,
        should_be_null: bool,
    ) {
        self.randomize_with(&FixtureOptions::default(), next_int, field_type, should_be_null);
    }

    pub fn randomize_with(
        &mut self,
        opts: &FixtureOptions,
        next_int: &mut dyn FnMut() -> i64,
        field_type: &str,
        should_be_null: bool,
    ) {
        tracing::trace!(kind = K::NAME, field_type, should_be_null, "randomizing fixture");
        self.state = if should_be_null {
            Tristate::Null
        } else {
            Tristate::Present(K::random(next_int, field_type, opts))
        };
    }
}

// ============================================================================
// Std traits
// ============================================================================

impl<K: Kind> Default for Nullable<K> {
    fn default() -> Self {
        Self::with_state(Tristate::Absent)
    }
}

impl<K: Kind> Clone for Nullable<K> {
    fn clone(&self) -> Self {
        Self::with_state(self.state.clone())
    }
}

impl<K: Kind> PartialEq for Nullable<K> {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

impl<K: Kind> fmt::Debug for Nullable<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(K::NAME).field(&self.state).finish()
    }
}

// ============================================================================
// serde
// ============================================================================

impl<K: Kind> Serialize for Nullable<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let wire = match &self.state {
            Tristate::Present(v) => K::to_wire(v).map_err(serde::ser::Error::custom)?,
            _ => None,
        };
        wire.serialize(serializer)
    }
}

/// Null deserializes to an explicit null. A missing struct field stays
/// absent only when the field carries `#[serde(default)]`.
impl<'de, K: Kind> Deserialize<'de> for Nullable<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let wire = Option::<K::Wire>::deserialize(deserializer)?;
        match wire {
            Some(w) => K::from_wire(w)
                .map(|v| Self::with_state(Tristate::Present(v)))
                .map_err(serde::de::Error::custom),
            None => Ok(Self::null()),
        }
    }
}
