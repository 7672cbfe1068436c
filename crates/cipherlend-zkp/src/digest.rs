//! # Digest Proof Generator
//!
//! Computes three independent SHA-256 digests per value. Each digest input
//! is a canonical JSON record with a `domain` tag, so no two digest kinds
//! can collide for the same value and context:
//!
//! ```text
//! commitment = SHA256(JCS({domain:"commitment", value, contract, user, timestamp}))
//! range      = SHA256(JCS({domain:"range",      value, timestamp}))
//! signature  = SHA256(JCS({domain:"signature",  value, contract, user, timestamp}))
//! ```
//!
//! `value` is the canonical decimal rendering of the plaintext. Unbound
//! context halves are the empty string.

use std::sync::Arc;

use cipherlend_core::{canonical_decimal, CanonicalBytes, ContentDigest, Timestamp, ValueContext};
use cipherlend_crypto::{CryptoProvider, SystemCrypto};
use serde::Serialize;

use crate::traits::{ProofError, ProofGenerator, ValueProof, VerifyError};

/// Domain tag for value commitments.
pub const COMMITMENT_DOMAIN: &str = "commitment";
/// Domain tag for range attestations.
pub const RANGE_DOMAIN: &str = "range";
/// Domain tag for signature digests.
pub const SIGNATURE_DOMAIN: &str = "signature";

#[derive(Serialize)]
struct BoundInput<'a> {
    domain: &'static str,
    value: &'a str,
    contract: &'a str,
    user: &'a str,
    timestamp: Timestamp,
}

#[derive(Serialize)]
struct RangeInput<'a> {
    domain: &'static str,
    value: &'a str,
    timestamp: Timestamp,
}

/// SHA-256 digest proof generator.
#[derive(Clone)]
pub struct DigestProofGenerator {
    crypto: Arc<dyn CryptoProvider>,
}

impl std::fmt::Debug for DigestProofGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DigestProofGenerator")
            .field("crypto", &self.crypto.name())
            .finish()
    }
}

impl Default for DigestProofGenerator {
    fn default() -> Self {
        Self::new(Arc::new(SystemCrypto))
    }
}

impl DigestProofGenerator {
    /// Create a generator hashing through `crypto`.
    pub fn new(crypto: Arc<dyn CryptoProvider>) -> Self {
        Self { crypto }
    }

    /// Binding commitment over value, context and timestamp.
    pub fn commitment(
        &self,
        value: f64,
        ctx: &ValueContext,
        timestamp: Timestamp,
    ) -> Result<ContentDigest, ProofError> {
        self.bound_digest(COMMITMENT_DOMAIN, value, ctx, timestamp)
    }

    /// Range attestation stand-in over value and timestamp.
    pub fn range_attestation(
        &self,
        value: f64,
        timestamp: Timestamp,
    ) -> Result<ContentDigest, ProofError> {
        let value = decimal(value)?;
        let input = RangeInput {
            domain: RANGE_DOMAIN,
            value: &value,
            timestamp,
        };
        self.hash(&input)
    }

    /// Signature stand-in over value, context and timestamp.
    pub fn signature_digest(
        &self,
        value: f64,
        ctx: &ValueContext,
        timestamp: Timestamp,
    ) -> Result<ContentDigest, ProofError> {
        self.bound_digest(SIGNATURE_DOMAIN, value, ctx, timestamp)
    }

    /// Generate all three digests at a caller-chosen timestamp.
    pub fn generate_at(
        &self,
        value: f64,
        ctx: &ValueContext,
        timestamp: Timestamp,
    ) -> Result<ValueProof, ProofError> {
        let proof = ValueProof {
            commitment: self.commitment(value, ctx, timestamp)?,
            range_attestation: self.range_attestation(value, timestamp)?,
            signature: self.signature_digest(value, ctx, timestamp)?,
            timestamp,
        };
        tracing::debug!(
            commitment = %proof.commitment,
            timestamp = proof.timestamp.epoch_millis(),
            "generated value proof"
        );
        Ok(proof)
    }

    fn bound_digest(
        &self,
        domain: &'static str,
        value: f64,
        ctx: &ValueContext,
        timestamp: Timestamp,
    ) -> Result<ContentDigest, ProofError> {
        let value = decimal(value)?;
        let input = BoundInput {
            domain,
            value: &value,
            contract: ctx.contract_str(),
            user: ctx.user_str(),
            timestamp,
        };
        self.hash(&input)
    }

    fn hash(&self, input: &impl Serialize) -> Result<ContentDigest, ProofError> {
        let cb = CanonicalBytes::new(input)
            .map_err(|e| ProofError::Canonicalization(e.to_string()))?;
        Ok(self.crypto.sha256(&cb)?)
    }
}

fn decimal(value: f64) -> Result<String, ProofError> {
    canonical_decimal(value).map_err(|e| ProofError::InvalidValue(e.to_string()))
}

impl ProofGenerator for DigestProofGenerator {
    fn generate(&self, value: f64, ctx: &ValueContext) -> Result<ValueProof, ProofError> {
        self.generate_at(value, ctx, Timestamp::now())
    }

    fn verify_range(
        &self,
        value: f64,
        timestamp: Timestamp,
        attestation: &ContentDigest,
    ) -> Result<bool, VerifyError> {
        Ok(&self.range_attestation(value, timestamp)? == attestation)
    }

    fn verify_commitment(
        &self,
        value: f64,
        ctx: &ValueContext,
        timestamp: Timestamp,
        commitment: &ContentDigest,
    ) -> Result<bool, VerifyError> {
        Ok(&self.commitment(value, ctx, timestamp)? == commitment)
    }
}
