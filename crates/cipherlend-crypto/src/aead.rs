//! # Ephemeral AEAD Sealing
//!
//! Seals a plaintext under AES-256-GCM with a key that exists only for the
//! duration of one call.
//!
//! ## Security Invariant
//!
//! - The key is drawn from the caller-supplied randomness source and wiped
//!   with `zeroize` before [`seal_ephemeral`] returns, on success and on
//!   failure alike.
//! - A fresh 96-bit IV is drawn per call.
//! - [`SealedPayload`] carries only the IV and ciphertext; the authentication
//!   tag is appended to the ciphertext by `aes-gcm`.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use zeroize::Zeroize;

use crate::error::CryptoError;

/// Scheme label recorded in sealed envelopes.
pub const AEAD_SCHEME: &str = "aes-256-gcm";

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

/// AES-GCM IV length in bytes.
pub const IV_LEN: usize = 12;

/// Output of one ephemeral seal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedPayload {
    /// The IV used for this seal.
    pub iv: [u8; IV_LEN],
    /// Ciphertext with the 16-byte GCM tag appended.
    pub ciphertext: Vec<u8>,
}

impl SealedPayload {
    /// The scheme label for this payload.
    pub fn scheme(&self) -> &'static str {
        AEAD_SCHEME
    }
}

/// Seal `plaintext` under a freshly generated key.
///
/// `fill` supplies random bytes for the key and the IV. Any failure to
/// obtain randomness is reported as `PrimitiveUnavailable`.
pub fn seal_ephemeral<F>(plaintext: &[u8], mut fill: F) -> Result<SealedPayload, CryptoError>
where
    F: FnMut(&mut [u8]) -> Result<(), CryptoError>,
{
    let mut key_bytes = [0u8; KEY_LEN];
    let mut iv = [0u8; IV_LEN];

    let outcome = fill(&mut key_bytes)
        .and_then(|()| fill(&mut iv))
        .and_then(|()| seal_with_key(&key_bytes, &iv, plaintext));
    key_bytes.zeroize();

    outcome.map(|ciphertext| SealedPayload { iv, ciphertext })
}

fn seal_with_key(
    key_bytes: &[u8; KEY_LEN],
    iv: &[u8; IV_LEN],
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let key = Key::<Aes256Gcm>::from_slice(key_bytes);
    let cipher = Aes256Gcm::new(key);
    cipher
        .encrypt(Nonce::from_slice(iv), plaintext)
        .map_err(|e| CryptoError::Aead(e.to_string()))
}
