//! # Proof Generator Trait
//!
//! Defines the interface for producing and checking the proof material that
//! accompanies a confidential value.
//!
//! ## Security Invariant
//!
//! The trait requires `Send + Sync` bounds; one generator is shared across
//! concurrent submissions. Generation has no side effects beyond reading the
//! clock.

use cipherlend_core::{ContentDigest, Timestamp, ValueContext};
use cipherlend_crypto::CryptoError;
use thiserror::Error;

/// Error during proof generation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofError {
    /// The hash primitive is missing. Callers degrade instead of failing.
    #[error("proof primitive unavailable: {0}")]
    PrimitiveUnavailable(String),
    /// The value cannot be committed to (non-finite).
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Digest input could not be canonicalized.
    #[error("canonicalization error: {0}")]
    Canonicalization(String),
}

impl From<CryptoError> for ProofError {
    fn from(err: CryptoError) -> Self {
        Self::PrimitiveUnavailable(err.to_string())
    }
}

/// Error during proof verification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifyError {
    /// The proof does not match the claimed value.
    #[error("invalid proof: {0}")]
    InvalidProof(String),
    /// The proof timestamp lies outside the freshness window.
    #[error("proof expired: age {age_ms} ms exceeds window of {window_ms} ms")]
    Expired {
        /// Age of the proof at the time of the check.
        age_ms: i64,
        /// Configured window.
        window_ms: u64,
    },
    /// Recomputing the digest failed.
    #[error("verification could not run: {0}")]
    Unavailable(#[from] ProofError),
}

/// The digests bound to one value, sharing one timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueProof {
    /// Binding commitment over value and context.
    pub commitment: ContentDigest,
    /// Range attestation stand-in over value and timestamp.
    pub range_attestation: ContentDigest,
    /// Signature stand-in over value and context.
    pub signature: ContentDigest,
    /// Captured once per generation and used for all three digests.
    pub timestamp: Timestamp,
}

/// Abstract interface for value proof generation.
///
/// The digest implementation is the only one today. A real range-proof
/// backend would produce its own `range_attestation` and keep the same
/// call sites.
pub trait ProofGenerator: Send + Sync {
    /// Produce the commitment, range attestation and signature digest for
    /// `value`, all stamped with the same freshly captured timestamp.
    fn generate(&self, value: f64, ctx: &ValueContext) -> Result<ValueProof, ProofError>;

    /// Recompute the range attestation for a claimed `value` at `timestamp`
    /// and compare it against `attestation`.
    fn verify_range(
        &self,
        value: f64,
        timestamp: Timestamp,
        attestation: &ContentDigest,
    ) -> Result<bool, VerifyError>;

    /// Recompute the commitment for a claimed `value` and context and
    /// compare it against `commitment`.
    fn verify_commitment(
        &self,
        value: f64,
        ctx: &ValueContext,
        timestamp: Timestamp,
        commitment: &ContentDigest,
    ) -> Result<bool, VerifyError>;
}
