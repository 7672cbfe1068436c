//! # Canonical Serialization — Digest Input Bytes
//!
//! `CanonicalBytes` is the sole construction path for bytes fed into the
//! commitment, range-attestation and signature digests.
//!
//! ## Security Invariant
//!
//! The inner `Vec<u8>` is private. The only constructor is
//! `CanonicalBytes::new()`, which rejects floats and serializes with
//! RFC 8785 (JCS) rules: sorted keys, compact separators. Two clients that
//! commit to the same value and context therefore hash identical bytes,
//! regardless of field order in the source struct.
//!
//! Floats are rejected because their textual rendering is not stable across
//! serializers. Plaintext values are passed in as decimal strings produced by
//! [`crate::amount::canonical_decimal`].

use serde::Serialize;
use serde_json::Value;

use crate::error::CanonicalizationError;

/// Bytes produced exclusively by JCS canonicalization with float rejection.
///
/// # Invariants
///
/// - The only constructor is `CanonicalBytes::new()`.
/// - No JSON number in the input is a non-integer float.
/// - Object keys are sorted; separators are compact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(Vec<u8>);

impl CanonicalBytes {
    /// Construct canonical bytes from any serializable value.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::FloatRejected` if the value contains a
    /// float. Returns `CanonicalizationError::SerializationFailed` if JSON
    /// serialization fails.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = serde_json::to_value(obj)?;
        reject_floats(&value)?;
        let s = serde_jcs::to_string(&value)?;
        Ok(Self(s.into_bytes()))
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the canonical byte sequence is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Walk the JSON tree and fail on the first non-integer number.
fn reject_floats(value: &Value) -> Result<(), CanonicalizationError> {
    match value {
        Value::Null | Value::Bool(_) | Value::String(_) => Ok(()),
        Value::Number(n) => {
            if n.is_f64() && !n.is_i64() && !n.is_u64() {
                if let Some(f) = n.as_f64() {
                    return Err(CanonicalizationError::FloatRejected(f));
                }
            }
            Ok(())
        }
        Value::Object(map) => map.values().try_for_each(reject_floats),
        Value::Array(items) => items.iter().try_for_each(reject_floats),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct CommitmentInput<'a> {
        domain: &'a str,
        value: &'a str,
        contract: &'a str,
        user: &'a str,
        timestamp: i64,
    }

    #[test]
    fn test_struct_fields_are_sorted() {
        let input = CommitmentInput {
            domain: "commitment",
            value: "1.5",
            contract: "0xabc",
            user: "0xdef",
            timestamp: 1_700_000_000_000,
        };
        let cb = CanonicalBytes::new(&input).expect("should canonicalize");
        let s = std::str::from_utf8(cb.as_bytes()).unwrap();
        assert_eq!(
            s,
            r#"{"contract":"0xabc","domain":"commitment","timestamp":1700000000000,"user":"0xdef","value":"1.5"}"#
        );
    }

    #[test]
    fn test_nested_keys_sorted() {
        let data = serde_json::json!({"proofs": {"risk": "r", "credit": "c"}, "assessor": "0x1"});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(
            cb.as_bytes(),
            br#"{"assessor":"0x1","proofs":{"credit":"c","risk":"r"}}"#
        );
    }

    #[test]
    fn test_plaintext_float_rejected() {
        let data = serde_json::json!({"value": 1.5});
        match CanonicalBytes::new(&data).unwrap_err() {
            CanonicalizationError::FloatRejected(f) => assert_eq!(f, 1.5),
            other => panic!("Expected FloatRejected, got: {other}"),
        }
    }

    #[test]
    fn test_deeply_nested_float_rejected() {
        let data = serde_json::json!({"a": [{"b": {"c": 0.25}}]});
        assert!(CanonicalBytes::new(&data).is_err());
    }

    #[test]
    fn test_integer_timestamp_accepted() {
        let data = serde_json::json!({"timestamp": 1_700_000_000_123i64});
        let cb = CanonicalBytes::new(&data).unwrap();
        assert_eq!(cb.as_bytes(), br#"{"timestamp":1700000000123}"#);
    }

    #[test]
    fn test_empty_object() {
        let cb = CanonicalBytes::new(&serde_json::json!({})).unwrap();
        assert_eq!(cb.as_bytes(), b"{}");
        assert!(!cb.is_empty());
        assert_eq!(cb.len(), 2);
    }
}
