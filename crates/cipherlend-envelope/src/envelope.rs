//! # Envelopes and Proof Records
//!
//! [`EncryptedEnvelope`] is the unit the pipeline moves around: one
//! confidential value, its proof, and the label of the context that
//! produced it. It is immutable once built.
//!
//! The encoded `encrypted_value` holds an [`EnvelopeRecord`]; the encoded
//! `proof` holds a [`ProofRecord`]. Both are written with the versioned
//! codec.

use cipherlend_core::Timestamp;
use serde::{Deserialize, Serialize};

use crate::collateral::CollateralRecord;

/// One confidential value with its proof.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedEnvelope {
    encrypted_value: String,
    proof: String,
    public_key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nonce: Option<String>,
    #[serde(default)]
    fallback: bool,
}

impl EncryptedEnvelope {
    pub(crate) fn new(
        encrypted_value: String,
        proof: String,
        public_key: String,
        nonce: Option<String>,
        fallback: bool,
    ) -> Self {
        Self {
            encrypted_value,
            proof,
            public_key,
            nonce,
            fallback,
        }
    }

    /// Encoded envelope record.
    pub fn encrypted_value(&self) -> &str {
        &self.encrypted_value
    }

    /// Encoded proof record.
    pub fn proof(&self) -> &str {
        &self.proof
    }

    /// Label of the encryption context that produced this envelope.
    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    /// Freshness nonce; present only on the sealed path.
    pub fn nonce(&self) -> Option<&str> {
        self.nonce.as_deref()
    }

    /// `true` if the value is carried in cleartext.
    pub fn fallback(&self) -> bool {
        self.fallback
    }

    /// Inverse of [`fallback`](Self::fallback).
    pub fn is_privacy_preserving(&self) -> bool {
        !self.fallback
    }
}

/// Proof material for one field, consumed by the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofBundle {
    /// Canonical decimal rendering of the plaintext, one per field.
    /// For local validation only; never sent on-chain.
    pub public_inputs: Vec<String>,
    /// Label of the verification context.
    pub verification_key: String,
    /// Encoded [`ProofRecord`].
    pub proof: String,
}

/// Decoded proof record.
///
/// Digest fields are lowercase hex SHA-256 and are absent when hashing was
/// unavailable on the fallback path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofRecord {
    /// Binding commitment over value and context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commitment: Option<String>,
    /// Range attestation stand-in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_proof: Option<String>,
    /// Signature stand-in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    /// When the digests were generated.
    pub timestamp: Timestamp,
    /// Whether the value was really encrypted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encrypted: Option<bool>,
    /// Freshness nonce of the sealed envelope.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nonce: Option<String>,
    /// Set when the accompanying envelope is a plaintext fallback.
    #[serde(default)]
    pub fallback: bool,
}

/// The plaintext an envelope protects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PlaintextValue {
    /// A single number.
    Number(f64),
    /// A collateral record.
    Collateral(CollateralRecord),
}

/// Record inside a sealed ciphertext.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SealedContent {
    pub value: PlaintextValue,
    pub timestamp: Timestamp,
    pub contract_context: String,
    pub user_context: String,
    pub nonce: String,
}

/// Decoded envelope record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum EnvelopeRecord {
    /// AEAD ciphertext under a discarded key.
    Sealed {
        /// AEAD scheme label.
        scheme: String,
        /// Base64 IV.
        iv: String,
        /// Base64 ciphertext with tag.
        ciphertext: String,
        /// When the value was sealed.
        timestamp: Timestamp,
        /// Freshness nonce.
        nonce: String,
    },
    /// Cleartext fallback.
    Plaintext {
        /// The value, in the clear.
        value: PlaintextValue,
        /// When the envelope was built.
        timestamp: Timestamp,
        /// Local uniqueness token.
        nonce: String,
        /// Contract the value is bound to; empty when unbound.
        #[serde(rename = "contractContext")]
        contract_context: String,
        /// User the value is bound to; empty when unbound.
        #[serde(rename = "userContext")]
        user_context: String,
        /// Always `true`.
        fallback: bool,
        /// Always `false`.
        encrypted: bool,
    },
}

impl EnvelopeRecord {
    /// Nonce common to both variants.
    pub fn nonce(&self) -> &str {
        match self {
            Self::Sealed { nonce, .. } | Self::Plaintext { nonce, .. } => nonce,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode, encode};

    #[test]
    fn test_plaintext_record_wire_shape() {
        let record = EnvelopeRecord::Plaintext {
            value: PlaintextValue::Number(750.0),
            timestamp: Timestamp::from_epoch_millis(1).unwrap(),
            nonce: "n".into(),
            contract_context: "0xabc".into(),
            user_context: "".into(),
            fallback: true,
            encrypted: false,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["kind"], "plaintext");
        assert_eq!(json["value"], 750.0);
        assert_eq!(json["contractContext"], "0xabc");
        assert_eq!(json["fallback"], true);
        assert_eq!(json["encrypted"], false);

        let decoded: EnvelopeRecord = decode(&encode(&record).unwrap()).unwrap();
        assert_eq!(decoded, record);
    }

    #[test]
    fn test_proof_record_omits_missing_digests() {
        let record = ProofRecord {
            commitment: None,
            range_proof: None,
            signature: None,
            timestamp: Timestamp::from_epoch_millis(5).unwrap(),
            encrypted: Some(false),
            nonce: None,
            fallback: true,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("commitment").is_none());
        assert!(json.get("rangeProof").is_none());
        assert_eq!(json["timestamp"], 5);
    }

    #[test]
    fn test_envelope_serializes_camel_case() {
        let env = EncryptedEnvelope::new("e".into(), "p".into(), "k".into(), None, true);
        let json = serde_json::to_value(&env).unwrap();
        assert_eq!(json["encryptedValue"], "e");
        assert_eq!(json["publicKey"], "k");
        assert!(json.get("nonce").is_none());
        assert!(!env.is_privacy_preserving());
    }
}
