//! # Crypto Provider
//!
//! The seam between the encryption pipeline and the primitives it uses.
//! Production code holds an `Arc<dyn CryptoProvider>`; tests and the
//! `force_fallback` configuration swap in [`UnavailableCrypto`].

use cipherlend_core::{sha256_digest, CanonicalBytes, ContentDigest};
use rand::rngs::OsRng;
use rand::RngCore;

use crate::aead::{seal_ephemeral, SealedPayload};
use crate::error::CryptoError;

/// Source of the primitives the pipeline depends on.
///
/// Implementations must be `Send + Sync`; one provider is shared by every
/// concurrent submission.
pub trait CryptoProvider: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &'static str;

    /// SHA-256 over canonical bytes.
    fn sha256(&self, data: &CanonicalBytes) -> Result<ContentDigest, CryptoError>;

    /// Fill `buf` with cryptographically secure random bytes.
    fn fill_random(&self, buf: &mut [u8]) -> Result<(), CryptoError>;

    /// Seal `plaintext` under a call-scoped key that is never returned.
    fn seal(&self, plaintext: &[u8]) -> Result<SealedPayload, CryptoError>;
}

/// Provider backed by `sha2`, the OS CSPRNG and `aes-gcm`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCrypto;

impl CryptoProvider for SystemCrypto {
    fn name(&self) -> &'static str {
        "system"
    }

    fn sha256(&self, data: &CanonicalBytes) -> Result<ContentDigest, CryptoError> {
        Ok(sha256_digest(data))
    }

    fn fill_random(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
        OsRng.try_fill_bytes(buf).map_err(|e| {
            tracing::warn!(error = %e, "OS randomness unavailable");
            CryptoError::PrimitiveUnavailable(format!("os rng: {e}"))
        })
    }

    fn seal(&self, plaintext: &[u8]) -> Result<SealedPayload, CryptoError> {
        seal_ephemeral(plaintext, |buf| self.fill_random(buf))
    }
}

/// Provider simulating an execution context without working primitives.
///
/// Randomness and sealing always fail. Hashing fails too unless the
/// provider was built with [`UnavailableCrypto::hash_only`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableCrypto {
    hash_available: bool,
}

impl UnavailableCrypto {
    /// Nothing works.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashing works; randomness and sealing do not.
    pub fn hash_only() -> Self {
        Self {
            hash_available: true,
        }
    }
}

impl CryptoProvider for UnavailableCrypto {
    fn name(&self) -> &'static str {
        if self.hash_available {
            "unavailable(hash-only)"
        } else {
            "unavailable"
        }
    }

    fn sha256(&self, data: &CanonicalBytes) -> Result<ContentDigest, CryptoError> {
        if self.hash_available {
            Ok(sha256_digest(data))
        } else {
            Err(CryptoError::PrimitiveUnavailable("sha256".into()))
        }
    }

    fn fill_random(&self, _buf: &mut [u8]) -> Result<(), CryptoError> {
        Err(CryptoError::PrimitiveUnavailable("random".into()))
    }

    fn seal(&self, _plaintext: &[u8]) -> Result<SealedPayload, CryptoError> {
        Err(CryptoError::PrimitiveUnavailable("aes-256-gcm".into()))
    }
}
