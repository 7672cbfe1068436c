//! Error types for cryptographic operations.

use thiserror::Error;

/// Error in cryptographic operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The primitive is missing from this execution context or failed while
    /// running. Callers treat this as a signal to degrade, not to abort.
    #[error("cryptographic primitive unavailable: {0}")]
    PrimitiveUnavailable(String),

    /// The AEAD cipher rejected its input.
    #[error("aead error: {0}")]
    Aead(String),
}

