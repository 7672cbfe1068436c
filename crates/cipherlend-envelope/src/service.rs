//! # Encryption Service
//!
//! Produces [`EncryptedEnvelope`]s on one of two paths.
//!
//! **Primary.** The value and its context are serialized, sealed under a
//! call-scoped AES-256-GCM key that is discarded immediately, and paired
//! with a proof record carrying all three digests and the envelope nonce.
//!
//! **Fallback.** If any primitive on the primary path is unavailable, the
//! value is written in cleartext into a `plaintext` record and the proof is
//! marked `fallback`. Digests are still included when hashing works. The
//! service logs a warning; it never returns `PrimitiveUnavailable` from
//! [`EncryptionService::encrypt_number`].
//!
//! ## Decryption
//!
//! Only fallback envelopes can be read back. Sealed envelopes fail with
//! [`EnvelopeError::NotLocallyDecryptable`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use cipherlend_core::{
    canonical_decimal, CanonicalBytes, ContentDigest, Timestamp, ValueContext,
};
use cipherlend_crypto::{CryptoProvider, SystemCrypto};
use cipherlend_zkp::{
    DigestProofGenerator, FreshnessWindow, ProofError, ProofGenerator, VerifyError,
};
use serde::{Deserialize, Serialize};

use crate::codec::{decode, encode};
use crate::collateral::CollateralDescriptor;
use crate::envelope::{
    EncryptedEnvelope, EnvelopeRecord, PlaintextValue, ProofBundle, ProofRecord, SealedContent,
};
use crate::error::{CodecError, EnvelopeError};

const NONCE_LEN: usize = 16;

/// Labels and limits for the encryption service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncryptionConfig {
    /// Label recorded as the envelope `publicKey`.
    pub encryption_context: String,
    /// Label recorded as the proof bundle `verificationKey`.
    pub verification_key: String,
    /// Maximum accepted proof age.
    pub freshness_window: FreshnessWindow,
}

impl Default for EncryptionConfig {
    fn default() -> Self {
        Self {
            encryption_context: "cipherlend-fhe-v1".to_string(),
            verification_key: "cipherlend-verifier-v1".to_string(),
            freshness_window: FreshnessWindow::default(),
        }
    }
}

/// Encoded reference to an envelope, passed to contracts in place of the
/// plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalInput {
    /// Always `"externalEuint32"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Digest of the referenced envelope.
    pub handle: String,
    /// When the reference was built.
    pub timestamp: Timestamp,
    /// Freshness nonce.
    pub nonce: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HandleInput<'a> {
    domain: &'static str,
    encrypted_value: &'a str,
}

#[derive(Clone, Copy)]
enum Subject {
    Number,
    Collateral,
}

/// Encrypts values into envelopes and validates their proofs.
pub struct EncryptionService {
    crypto: Arc<dyn CryptoProvider>,
    proofs: DigestProofGenerator,
    config: EncryptionConfig,
    sequence: AtomicU64,
}

impl std::fmt::Debug for EncryptionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EncryptionService")
            .field("crypto", &self.crypto.name())
            .field("config", &self.config)
            .finish()
    }
}

impl Default for EncryptionService {
    fn default() -> Self {
        Self::new(Arc::new(SystemCrypto), EncryptionConfig::default())
    }
}

impl EncryptionService {
    /// Create a service using `crypto` for every primitive.
    pub fn new(crypto: Arc<dyn CryptoProvider>, config: EncryptionConfig) -> Self {
        Self {
            proofs: DigestProofGenerator::new(Arc::clone(&crypto)),
            crypto,
            config,
            sequence: AtomicU64::new(0),
        }
    }

    /// The service configuration.
    pub fn config(&self) -> &EncryptionConfig {
        &self.config
    }

    /// Encrypt one number bound to `ctx`.
    ///
    /// # Errors
    ///
    /// Only `InvalidInput` for a non-finite value. Missing primitives
    /// produce a fallback envelope instead of an error.
    pub fn encrypt_number(
        &self,
        value: f64,
        ctx: &ValueContext,
    ) -> Result<EncryptedEnvelope, EnvelopeError> {
        if !value.is_finite() {
            return Err(EnvelopeError::InvalidInput(format!(
                "value must be finite, got {value}"
            )));
        }
        self.encrypt_plaintext(
            PlaintextValue::Number(value),
            value,
            ctx,
            Timestamp::now(),
            Subject::Number,
        )
    }

    /// Encrypt a collateral descriptor as one record. The proof commits to
    /// the descriptor's value.
    pub fn encrypt_collateral(
        &self,
        descriptor: CollateralDescriptor,
        ctx: &ValueContext,
    ) -> Result<EncryptedEnvelope, EnvelopeError> {
        descriptor.validate()?;
        let timestamp = Timestamp::now();
        let proof_value = descriptor.value;
        let record = descriptor.into_record(timestamp);
        self.encrypt_plaintext(
            PlaintextValue::Collateral(record),
            proof_value,
            ctx,
            timestamp,
            Subject::Collateral,
        )
    }

    /// Read back the number in a fallback envelope.
    pub fn decrypt_number(&self, encrypted_value: &str) -> Result<f64, EnvelopeError> {
        match decode::<EnvelopeRecord>(encrypted_value)? {
            EnvelopeRecord::Sealed { .. } => Err(EnvelopeError::NotLocallyDecryptable),
            EnvelopeRecord::Plaintext {
                value: PlaintextValue::Number(v),
                ..
            } => Ok(v),
            EnvelopeRecord::Plaintext { .. } => Err(EnvelopeError::InvalidInput(
                "envelope carries a collateral record, not a number".into(),
            )),
        }
    }

    /// Generate a standalone proof bundle for `value`.
    pub fn generate_proof(
        &self,
        value: f64,
        ctx: &ValueContext,
    ) -> Result<ProofBundle, EnvelopeError> {
        self.generate_proof_at(value, ctx, Timestamp::now())
    }

    /// Generate a proof bundle stamped with `timestamp`.
    pub fn generate_proof_at(
        &self,
        value: f64,
        ctx: &ValueContext,
        timestamp: Timestamp,
    ) -> Result<ProofBundle, EnvelopeError> {
        let record = self.digest_record(value, ctx, timestamp)?;
        Ok(ProofBundle {
            public_inputs: vec![public_input(value)?],
            verification_key: self.config.verification_key.clone(),
            proof: encode(&record)?,
        })
    }

    /// Pair an envelope's proof with the plaintext it was built from.
    pub fn bundle_for(
        &self,
        value: f64,
        envelope: &EncryptedEnvelope,
    ) -> Result<ProofBundle, EnvelopeError> {
        Ok(ProofBundle {
            public_inputs: vec![public_input(value)?],
            verification_key: self.config.verification_key.clone(),
            proof: envelope.proof().to_string(),
        })
    }

    /// Check a proof bundle against the value it should attest to.
    ///
    /// The first public input must equal `expected`, the range attestation
    /// (when present) must recompute to the same digest, and the proof must
    /// be inside the freshness window at `now`. Returns the proof age in
    /// milliseconds.
    pub fn validate_proof(
        &self,
        bundle: &ProofBundle,
        expected: f64,
        now: Timestamp,
    ) -> Result<i64, EnvelopeError> {
        let expected_input = public_input(expected)?;
        match bundle.public_inputs.first() {
            Some(input) if *input == expected_input => {}
            Some(input) => {
                return Err(EnvelopeError::InvalidProof(format!(
                    "public input {input} does not match expected value {expected_input}"
                )))
            }
            None => {
                return Err(EnvelopeError::InvalidProof(
                    "proof bundle has no public inputs".into(),
                ))
            }
        }

        let record: ProofRecord = decode(&bundle.proof)?;
        if let Some(range) = &record.range_proof {
            let attestation = ContentDigest::from_hex(range)
                .map_err(|e| EnvelopeError::InvalidProof(e.to_string()))?;
            match self.proofs.verify_range(expected, record.timestamp, &attestation) {
                Ok(true) => {}
                Ok(false) => {
                    return Err(EnvelopeError::InvalidProof(
                        "range attestation does not match expected value".into(),
                    ))
                }
                Err(VerifyError::Unavailable(ProofError::PrimitiveUnavailable(reason))) => {
                    tracing::debug!(%reason, "skipping range attestation check");
                }
                Err(e) => return Err(e.into()),
            }
        }

        Ok(self
            .config
            .freshness_window
            .check(record.timestamp, now)?)
    }

    /// Encode a reference to `envelope` suitable as a contract input.
    pub fn external_input(&self, envelope: &EncryptedEnvelope) -> Result<String, EnvelopeError> {
        let record: EnvelopeRecord = decode(envelope.encrypted_value())?;
        let handle_input = HandleInput {
            domain: "handle",
            encrypted_value: envelope.encrypted_value(),
        };
        let cb = CanonicalBytes::new(&handle_input)
            .map_err(|e| EnvelopeError::Codec(CodecError::Shape(e.to_string())))?;
        let handle = match self.crypto.sha256(&cb) {
            Ok(digest) => digest.to_hex(),
            Err(_) => format!("nonce:{}", record.nonce()),
        };
        let timestamp = Timestamp::now();
        let input = ExternalInput {
            kind: "externalEuint32".to_string(),
            handle,
            timestamp,
            nonce: self.nonce(timestamp),
        };
        Ok(encode(&input)?)
    }

    fn encrypt_plaintext(
        &self,
        value: PlaintextValue,
        proof_value: f64,
        ctx: &ValueContext,
        timestamp: Timestamp,
        subject: Subject,
    ) -> Result<EncryptedEnvelope, EnvelopeError> {
        match self.seal_primary(&value, proof_value, ctx, timestamp, subject) {
            Ok(envelope) => Ok(envelope),
            Err(EnvelopeError::PrimitiveUnavailable(reason)) => {
                tracing::warn!(
                    provider = self.crypto.name(),
                    %reason,
                    "encryption primitive unavailable, emitting plaintext fallback envelope"
                );
                self.plaintext_fallback(value, proof_value, ctx, timestamp, subject)
            }
            Err(e) => Err(e),
        }
    }

    fn seal_primary(
        &self,
        value: &PlaintextValue,
        proof_value: f64,
        ctx: &ValueContext,
        timestamp: Timestamp,
        subject: Subject,
    ) -> Result<EncryptedEnvelope, EnvelopeError> {
        let nonce = self.random_nonce()?;
        let content = SealedContent {
            value: value.clone(),
            timestamp,
            contract_context: ctx.contract_str().to_string(),
            user_context: ctx.user_str().to_string(),
            nonce: nonce.clone(),
        };
        let plaintext = serde_json::to_vec(&content)
            .map_err(|e| EnvelopeError::Codec(CodecError::Shape(e.to_string())))?;
        let sealed = self.crypto.seal(&plaintext)?;
        let proof = self.proofs.generate_at(proof_value, ctx, timestamp)?;

        let record = EnvelopeRecord::Sealed {
            scheme: sealed.scheme().to_string(),
            iv: BASE64.encode(sealed.iv),
            ciphertext: BASE64.encode(&sealed.ciphertext),
            timestamp,
            nonce: nonce.clone(),
        };
        let proof_record = ProofRecord {
            commitment: Some(proof.commitment.to_hex()),
            range_proof: Some(proof.range_attestation.to_hex()),
            signature: Some(proof.signature.to_hex()),
            timestamp,
            encrypted: Some(true),
            nonce: Some(nonce.clone()),
            fallback: false,
        };

        tracing::debug!(
            commitment = %proof.commitment,
            timestamp = timestamp.epoch_millis(),
            "sealed confidential value"
        );
        Ok(EncryptedEnvelope::new(
            encode(&record)?,
            encode(&proof_record)?,
            self.public_key(subject, false),
            Some(nonce),
            false,
        ))
    }

    fn plaintext_fallback(
        &self,
        value: PlaintextValue,
        proof_value: f64,
        ctx: &ValueContext,
        timestamp: Timestamp,
        subject: Subject,
    ) -> Result<EncryptedEnvelope, EnvelopeError> {
        let record = EnvelopeRecord::Plaintext {
            value,
            timestamp,
            nonce: self.nonce(timestamp),
            contract_context: ctx.contract_str().to_string(),
            user_context: ctx.user_str().to_string(),
            fallback: true,
            encrypted: false,
        };
        let mut proof_record = self.digest_record(proof_value, ctx, timestamp)?;
        proof_record.encrypted = Some(false);
        proof_record.fallback = true;

        Ok(EncryptedEnvelope::new(
            encode(&record)?,
            encode(&proof_record)?,
            self.public_key(subject, true),
            None,
            true,
        ))
    }

    /// Proof record with digests when hashing works, a bare fallback
    /// record when it does not.
    fn digest_record(
        &self,
        value: f64,
        ctx: &ValueContext,
        timestamp: Timestamp,
    ) -> Result<ProofRecord, EnvelopeError> {
        match self.proofs.generate_at(value, ctx, timestamp) {
            Ok(proof) => Ok(ProofRecord {
                commitment: Some(proof.commitment.to_hex()),
                range_proof: Some(proof.range_attestation.to_hex()),
                signature: Some(proof.signature.to_hex()),
                timestamp,
                encrypted: None,
                nonce: None,
                fallback: false,
            }),
            Err(ProofError::PrimitiveUnavailable(reason)) => {
                tracing::warn!(%reason, "hashing unavailable, proof carries no digests");
                Ok(ProofRecord {
                    commitment: None,
                    range_proof: None,
                    signature: None,
                    timestamp,
                    encrypted: None,
                    nonce: None,
                    fallback: true,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn random_nonce(&self) -> Result<String, EnvelopeError> {
        let mut bytes = [0u8; NONCE_LEN];
        self.crypto.fill_random(&mut bytes)?;
        Ok(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    /// Random nonce, or a timestamp-and-sequence nonce when randomness is
    /// unavailable. The sequence keeps fallback nonces unique within one
    /// service even inside the same millisecond.
    fn nonce(&self, timestamp: Timestamp) -> String {
        self.random_nonce().unwrap_or_else(|_| {
            let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
            format!("{:x}-{seq:x}", timestamp.epoch_millis())
        })
    }

    fn public_key(&self, subject: Subject, fallback: bool) -> String {
        let base = &self.config.encryption_context;
        match (subject, fallback) {
            (Subject::Number, false) => base.clone(),
            (Subject::Number, true) => format!("{base}:fallback"),
            (Subject::Collateral, false) => format!("{base}:collateral"),
            (Subject::Collateral, true) => format!("{base}:collateral:fallback"),
        }
    }
}

fn public_input(value: f64) -> Result<String, EnvelopeError> {
    canonical_decimal(value).map_err(|e| EnvelopeError::InvalidInput(e.to_string()))
}
