//! # Envelope Codec
//!
//! Every record that crosses the wire (envelopes, proofs, combined proofs,
//! external inputs) is a JSON object rendered compactly and wrapped in
//! standard base64.
//!
//! ## Versioning
//!
//! [`encode`] inserts `formatVersion` into the top-level object. [`decode`]
//! refuses records whose version is missing or different, so a change in
//! record shape fails loudly instead of deserializing into the wrong
//! fields. The version key is removed before the record is handed to the
//! target type, so records may not carry a top-level `formatVersion` of
//! their own.
//!
//! The codec checks shape only. Whether a value or timestamp is sensible is
//! the caller's concern.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::CodecError;

/// Record shape version written and accepted by this codec.
pub const FORMAT_VERSION: u64 = 1;

const VERSION_KEY: &str = "formatVersion";

/// Encode `record` as versioned base64(JSON).
///
/// # Errors
///
/// Returns `CodecError::NotAnObject` if `record` does not serialize to a
/// JSON object, `CodecError::ReservedKey` if it already has a
/// `formatVersion` field, and `CodecError::Shape` if serialization fails.
pub fn encode<T: Serialize>(record: &T) -> Result<String, CodecError> {
    let mut value = serde_json::to_value(record).map_err(|e| CodecError::Shape(e.to_string()))?;
    let object = value.as_object_mut().ok_or(CodecError::NotAnObject)?;
    if object.contains_key(VERSION_KEY) {
        return Err(CodecError::ReservedKey(VERSION_KEY));
    }
    object.insert(VERSION_KEY.to_string(), Value::from(FORMAT_VERSION));
    let json = serde_json::to_string(&value).map_err(|e| CodecError::Shape(e.to_string()))?;
    Ok(BASE64.encode(json))
}

/// Decode a versioned base64(JSON) string into `T`.
pub fn decode<T: DeserializeOwned>(encoded: &str) -> Result<T, CodecError> {
    let bytes = BASE64
        .decode(encoded.trim())
        .map_err(|e| CodecError::Base64(e.to_string()))?;
    let mut value: Value =
        serde_json::from_slice(&bytes).map_err(|e| CodecError::Json(e.to_string()))?;
    let object = value.as_object_mut().ok_or(CodecError::NotAnObject)?;

    match object.remove(VERSION_KEY) {
        None => return Err(CodecError::MissingVersion),
        Some(v) if v.as_u64() == Some(FORMAT_VERSION) => {}
        Some(found) => {
            return Err(CodecError::UnsupportedVersion {
                found,
                supported: FORMAT_VERSION,
            })
        }
    }

    serde_json::from_value(value).map_err(|e| CodecError::Shape(e.to_string()))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Record {
        value: f64,
        timestamp: i64,
        user: String,
        encrypted: bool,
    }

    proptest! {
        /// decode(encode(x)) == x for records of numbers, strings, booleans
        /// and timestamps.
        #[test]
        fn codec_roundtrip(
            value in any::<f64>().prop_filter("finite", |v| v.is_finite()),
            timestamp in any::<i64>(),
            user in ".*",
            encrypted in any::<bool>(),
        ) {
            let record = Record { value, timestamp, user, encrypted };
            let encoded = encode(&record).unwrap();
            prop_assert_eq!(decode::<Record>(&encoded).unwrap(), record);
        }
    }
}
