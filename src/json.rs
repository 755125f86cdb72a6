//! Opaque JSON payload kind. Bytes are stored verbatim and never validated.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::value::RawValue;

use crate::error::{NullError, Result};
use crate::kind::Kind;
use crate::nullable::Nullable;
use crate::randomize::{random_token, FixtureOptions};
use crate::store::StoreValue;

/// Marker for raw JSON payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Json;

/// A nullable raw JSON document.
pub type NullJson = Nullable<Json>;

impl Kind for Json {
    type Value = Vec<u8>;
    type Wire = Box<RawValue>;

    const NAME: &'static str = "NullJson";

    fn is_nil(value: &Vec<u8>) -> bool {
        value.is_empty()
    }

    fn decode_json(data: &[u8]) -> Result<Vec<u8>> {
        Ok(data.to_vec())
    }

    // Empty payloads encode as null even when marked valid.
    fn encode_json(value: &Vec<u8>) -> Result<Option<Vec<u8>>> {
        if value.is_empty() {
            return Ok(None);
        }
        Ok(Some(value.clone()))
    }

    fn decode_text(text: &[u8]) -> Result<Vec<u8>> {
        Ok(text.to_vec())
    }

    fn encode_text(value: &Vec<u8>) -> Result<Vec<u8>> {
        Ok(value.clone())
    }

    fn text_null() -> Option<Vec<u8>> {
        None
    }

    fn scan(value: StoreValue) -> Result<Vec<u8>> {
        match value {
            StoreValue::Blob(b) => Ok(b),
            StoreValue::Text(s) => Ok(s.into_bytes()),
            other => Err(other.reject(Self::NAME)),
        }
    }

    fn to_store(value: &Vec<u8>) -> StoreValue {
        StoreValue::Blob(value.clone())
    }

    fn to_wire(value: &Vec<u8>) -> Result<Option<Box<RawValue>>> {
        if value.is_empty() {
            return Ok(None);
        }
        let text =
            String::from_utf8(value.clone()).map_err(|e| NullError::encode(Self::NAME, e))?;
        RawValue::from_string(text)
            .map(Some)
            .map_err(|e| NullError::encode(Self::NAME, e))
    }

    fn from_wire(wire: Box<RawValue>) -> Result<Vec<u8>> {
        Ok(wire.get().as_bytes().to_vec())
    }

    fn random(
        next_int: &mut dyn FnMut() -> i64,
        _field_type: &str,
        opts: &FixtureOptions,
    ) -> Vec<u8> {
        format!("\"{}\"", random_token(next_int, opts)).into_bytes()
    }
}

impl From<Vec<u8>> for NullJson {
    fn from(value: Vec<u8>) -> Self {
        Self::from_value(value)
    }
}

impl From<&[u8]> for NullJson {
    fn from(value: &[u8]) -> Self {
        Self::from_value(value.to_vec())
    }
}

impl NullJson {
    /// Decode the stored payload (or `null` when invalid) into `dest`.
    pub fn unmarshal_into<T: DeserializeOwned>(&self, dest: Option<&mut T>) -> Result<()> {
        let dest = dest.ok_or(NullError::NilDestination)?;
        let bytes = self.marshal_json()?;
        *dest = serde_json::from_slice(&bytes).map_err(|e| NullError::decode(Json::NAME, e))?;
        Ok(())
    }

    /// Serialize `obj` and store the result through `unmarshal_json`, so a
    /// unit or `None` value becomes an explicit null.
    pub fn marshal_from<T: Serialize + ?Sized>(&mut self, obj: &T) -> Result<()> {
        let bytes = serde_json::to_vec(obj).map_err(|e| NullError::encode(Json::NAME, e))?;
        self.unmarshal_json(&bytes)
    }

    /// The payload parsed as a JSON value; `Value::Null` when invalid.
    pub fn to_json_value(&self) -> Result<serde_json::Value> {
        let mut value = serde_json::Value::Null;
        self.unmarshal_into(Some(&mut value))?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NULL_BYTES;
    use serde::Deserialize;
    use serde_json::json;

    #[test]
    fn from_empty_is_null() {
        let j = NullJson::from(Vec::new());
        assert!(!j.is_valid());
        assert!(j.is_set());
        assert_eq!(j.marshal_json().unwrap(), NULL_BYTES);
    }

    #[test]
    fn from_optional_handles_none() {
        let j = NullJson::from_optional(None);
        assert!(j.is_set());
        assert!(j.is_empty());

        let payload = b"[1,2]".to_vec();
        let j = NullJson::from_optional(Some(&payload));
        assert_eq!(j.as_option(), Some(&payload));
    }

    #[test]
    fn new_takes_flags() {
        assert!(NullJson::new(b"1".to_vec(), false, false).is_absent());
        let null = NullJson::new(b"1".to_vec(), false, true);
        assert!(null.is_set() && !null.is_valid());
        assert!(NullJson::new(b"1".to_vec(), true, true).is_valid());
    }

    #[test]
    fn unmarshal_null_token() {
        let mut j = NullJson::default();
        j.unmarshal_json(b"null").unwrap();
        assert!(j.is_set());
        assert!(!j.is_valid());
        assert_eq!(j.marshal_json().unwrap(), b"null");
    }

    #[test]
    fn unmarshal_object_is_stored_verbatim() {
        let mut j = NullJson::default();
        j.unmarshal_json(br#"{"a":1}"#).unwrap();
        assert!(j.is_valid());
        assert_eq!(j.as_option().unwrap(), br#"{"a":1}"#);
        assert_eq!(j.marshal_json().unwrap(), br#"{"a":1}"#);
    }

    #[test]
    fn unmarshal_does_not_validate_structure() {
        let mut j = NullJson::default();
        j.unmarshal_json(b"{not json").unwrap();
        assert_eq!(j.marshal_json().unwrap(), b"{not json");
    }

    #[test]
    fn near_null_tokens_are_values() {
        for token in [&b"NULL"[..], &b" null"[..], &b"\"null\""[..]] {
            let mut j = NullJson::default();
            j.unmarshal_json(token).unwrap();
            assert!(j.is_valid(), "{:?}", String::from_utf8_lossy(token));
        }
    }

    #[test]
    fn unmarshal_empty_input_fails_but_marks_set() {
        let mut j = NullJson::default();
        let err = j.unmarshal_json(b"").unwrap_err();
        assert!(matches!(err, NullError::Decode { .. }));
        assert!(j.is_set());
        assert!(!j.is_valid());
    }

    #[test]
    fn valid_but_empty_encodes_null() {
        let mut j = NullJson::default();
        j.set_valid(Vec::new());
        assert!(j.is_valid());
        assert_eq!(j.marshal_json().unwrap(), b"null");
    }

    #[test]
    fn text_round_trip() {
        let mut j = NullJson::default();
        j.unmarshal_text(b"[true]").unwrap();
        assert!(j.is_valid());
        assert_eq!(j.marshal_text().unwrap(), Some(b"[true]".to_vec()));
    }

    #[test]
    fn text_empty_is_null_and_encodes_nothing() {
        let mut j = NullJson::from(b"1".to_vec());
        j.unmarshal_text(b"").unwrap();
        assert!(j.is_set());
        assert!(!j.is_valid());
        assert_eq!(j.marshal_text().unwrap(), None);
    }

    #[test]
    fn scan_accepts_blob_and_text() {
        let mut j = NullJson::default();
        j.scan(StoreValue::Blob(b"{}".to_vec())).unwrap();
        assert_eq!(j.as_option().unwrap(), b"{}");

        j.scan(StoreValue::from("[1]")).unwrap();
        assert_eq!(j.as_option().unwrap(), b"[1]");
    }

    #[test]
    fn scan_null_sentinel() {
        let mut j = NullJson::from(b"1".to_vec());
        j.scan(StoreValue::Null).unwrap();
        assert!(j.is_set());
        assert!(!j.is_valid());
        assert_eq!(j.to_store_value(), StoreValue::Null);
    }

    #[test]
    fn scan_rejects_other_shapes_and_keeps_value() {
        let mut j = NullJson::from(b"\"keep\"".to_vec());
        let err = j.scan(StoreValue::Integer(3)).unwrap_err();
        assert!(err.to_string().contains("integer"));
        assert_eq!(j.as_option().unwrap(), b"\"keep\"");
    }

    #[test]
    fn bind_emits_blob() {
        let j = NullJson::from(b"{\"k\":2}".to_vec());
        assert_eq!(j.to_store_value(), StoreValue::Blob(b"{\"k\":2}".to_vec()));
        assert_eq!(NullJson::default().to_store_value(), StoreValue::Null);
    }

    #[test]
    fn unmarshal_into_target() {
        #[derive(Debug, Default, Deserialize, PartialEq)]
        struct Doc {
            a: i32,
        }

        let j = NullJson::from(br#"{"a":5}"#.to_vec());
        let mut doc = Doc::default();
        j.unmarshal_into(Some(&mut doc)).unwrap();
        assert_eq!(doc, Doc { a: 5 });
    }

    #[test]
    fn unmarshal_into_missing_destination() {
        let j = NullJson::from(b"1".to_vec());
        let err = j.unmarshal_into::<i32>(None).unwrap_err();
        assert!(matches!(err, NullError::NilDestination));
    }

    #[test]
    fn unmarshal_into_option_from_null() {
        let j = NullJson::null();
        let mut dest = Some(4);
        j.unmarshal_into(Some(&mut dest)).unwrap();
        assert_eq!(dest, None);
    }

    #[test]
    fn marshal_from_serializable() {
        let mut j = NullJson::default();
        j.marshal_from(&json!({"x": [1, 2]})).unwrap();
        assert!(j.is_valid());
        assert_eq!(j.to_json_value().unwrap(), json!({"x": [1, 2]}));

        j.marshal_from(&Option::<u8>::None).unwrap();
        assert!(j.is_set());
        assert!(!j.is_valid());
    }

    #[test]
    fn set_valid_is_idempotent() {
        let mut once = NullJson::default();
        once.set_valid(b"7".to_vec());
        let mut twice = NullJson::default();
        twice.set_valid(b"7".to_vec());
        twice.set_valid(b"7".to_vec());
        assert_eq!(once, twice);
    }

    #[test]
    fn randomize_produces_quoted_token() {
        let mut n: i64 = 0;
        let mut next = move || {
            n += 1;
            n
        };
        let mut j = NullJson::default();
        j.randomize(&mut next, "jsonb", false);
        let value: String = serde_json::from_slice(j.as_option().unwrap()).unwrap();
        assert_eq!(value.len(), 8);

        j.randomize(&mut next, "jsonb", true);
        assert!(j.is_set() && !j.is_valid());
    }
}
