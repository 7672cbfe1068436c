//! # cipherlend-zkp — Commitments and Proof Stand-ins
//!
//! Produces the three digests that accompany every confidential value and
//! the freshness rule that bounds how long they stay acceptable.
//!
//! ## Architecture
//!
//! - **Traits** (`traits.rs`): `ProofGenerator` is the interface a real
//!   range-proof backend would implement. Callers depend on the trait, not
//!   on the digest implementation.
//!
//! - **Digest** (`digest.rs`): `DigestProofGenerator` computes
//!   domain-separated SHA-256 digests over canonical bytes. The range
//!   attestation is a stand-in: it proves nothing about the range of the
//!   value, it only binds value and timestamp.
//!
//! - **Freshness** (`freshness.rs`): `FreshnessWindow` rejects proofs older
//!   than five minutes by default.
//!
//! ## Security Notice
//!
//! None of these digests is zero-knowledge or sound. They exist so that the
//! wire format and call sites are in place for a real proof system.
//!
//! ## Crate Policy
//!
//! - Depends on `cipherlend-core` and `cipherlend-crypto` internally.
//! - Hashing goes through `CryptoProvider`, so an execution context without
//!   SHA-256 surfaces as `ProofError::PrimitiveUnavailable`.

pub mod digest;
pub mod freshness;
pub mod traits;

pub use digest::{DigestProofGenerator, COMMITMENT_DOMAIN, RANGE_DOMAIN, SIGNATURE_DOMAIN};
pub use freshness::{FreshnessWindow, DEFAULT_FRESHNESS_WINDOW_MS};
pub use traits::{ProofError, ProofGenerator, ValueProof, VerifyError};
