//! # cipherlend-crypto — Cryptographic Primitives
//!
//! Provides the primitives the encryption pipeline depends on, behind the
//! [`CryptoProvider`] seam:
//!
//! - **SHA-256** digests, computed only from `CanonicalBytes`.
//! - **Randomness** from the operating system CSPRNG for keys, IVs and
//!   freshness nonces.
//! - **Ephemeral sealing**: AES-256-GCM under a key generated for one call
//!   and zeroized before the call returns.
//!
//! ## Security Invariant
//!
//! No API in this crate returns or persists a sealing key. A sealed payload
//! cannot be opened by anyone, including the process that produced it.
//!
//! ## Degraded Execution
//!
//! A provider reports a missing primitive as
//! [`CryptoError::PrimitiveUnavailable`]. Callers decide how to degrade;
//! this crate never falls back on its own. [`UnavailableCrypto`] simulates
//! such an environment.
//!
//! ## Crate Policy
//!
//! - Depends only on `cipherlend-core` internally.
//! - Tests use real SHA-256 and real AES-256-GCM; only the *absence* of
//!   primitives is simulated.

pub mod aead;
pub mod error;
pub mod provider;

pub use aead::{SealedPayload, AEAD_SCHEME, IV_LEN, KEY_LEN};
pub use error::CryptoError;
pub use provider::{CryptoProvider, SystemCrypto, UnavailableCrypto};
