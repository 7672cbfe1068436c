//! Error types for the envelope codec and encryption service.

use thiserror::Error;

/// Error while encoding or decoding a wire record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The input is not valid standard base64.
    #[error("invalid base64: {0}")]
    Base64(String),

    /// The decoded bytes are not a JSON document.
    #[error("invalid json: {0}")]
    Json(String),

    /// The record is not a JSON object.
    #[error("encoded record must be a JSON object")]
    NotAnObject,

    /// The record already uses a key the codec writes itself.
    #[error("record field {0} is reserved by the codec")]
    ReservedKey(&'static str),

    /// The record carries no `formatVersion`.
    #[error("encoded record has no formatVersion")]
    MissingVersion,

    /// The record was written by an incompatible codec version.
    #[error("unsupported formatVersion {found}, expected {supported}")]
    UnsupportedVersion {
        /// Version found on the wire.
        found: serde_json::Value,
        /// Version this codec reads.
        supported: u64,
    },

    /// The record does not have the expected shape.
    #[error("record shape mismatch: {0}")]
    Shape(String),
}

/// Error from the encryption service and the helpers built on it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EnvelopeError {
    /// A required input is missing, zero, negative or non-finite.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An encoded string could not be decoded.
    #[error("decode error: {0}")]
    Codec(#[from] CodecError),

    /// The envelope was sealed under a discarded key.
    #[error("envelope was sealed on the primary path and cannot be decrypted locally")]
    NotLocallyDecryptable,

    /// The proof does not match the expected value.
    #[error("invalid proof: {0}")]
    InvalidProof(String),

    /// The proof is older than the freshness window.
    #[error("proof expired: age {age_ms} ms exceeds window of {window_ms} ms")]
    ProofExpired {
        /// Age of the proof when it was checked.
        age_ms: i64,
        /// Configured freshness window.
        window_ms: u64,
    },

    /// A cryptographic primitive is missing. The service recovers from this
    /// by emitting a fallback envelope; it is only returned by helpers that
    /// have no fallback.
    #[error("primitive unavailable: {0}")]
    PrimitiveUnavailable(String),
}

impl From<cipherlend_crypto::CryptoError> for EnvelopeError {
    fn from(err: cipherlend_crypto::CryptoError) -> Self {
        Self::PrimitiveUnavailable(err.to_string())
    }
}

impl From<cipherlend_zkp::ProofError> for EnvelopeError {
    fn from(err: cipherlend_zkp::ProofError) -> Self {
        use cipherlend_zkp::ProofError;
        match err {
            ProofError::PrimitiveUnavailable(msg) => Self::PrimitiveUnavailable(msg),
            ProofError::InvalidValue(msg) | ProofError::Canonicalization(msg) => {
                Self::InvalidInput(msg)
            }
        }
    }
}

impl From<cipherlend_zkp::VerifyError> for EnvelopeError {
    fn from(err: cipherlend_zkp::VerifyError) -> Self {
        use cipherlend_zkp::VerifyError;
        match err {
            VerifyError::InvalidProof(msg) => Self::InvalidProof(msg),
            VerifyError::Expired { age_ms, window_ms } => Self::ProofExpired { age_ms, window_ms },
            VerifyError::Unavailable(inner) => inner.into(),
        }
    }
}
