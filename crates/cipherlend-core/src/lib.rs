//! # cipherlend-core — Foundational Types for CipherLend
//!
//! This crate is the leaf of the CipherLend workspace. It defines the
//! primitives every other crate builds on: timestamps, identifiers,
//! canonical digest input, and exact decimal handling for amounts.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for identifiers.** `AccountId`, `ContractAddress`,
//!    `PoolId`, `SubmissionId` — validated at construction. An empty account
//!    or contract address cannot exist.
//!
//! 2. **`CanonicalBytes` newtype.** ALL digest computation flows through
//!    `CanonicalBytes::new()`. Floats are rejected, so plaintext values enter
//!    digests as canonical decimal strings (see [`amount::canonical_decimal`]).
//!
//! 3. **Millisecond UTC timestamps.** `Timestamp` travels on the wire as
//!    epoch milliseconds, the unit the proof freshness window is defined in.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cipherlend-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod amount;
pub mod canonical;
pub mod digest;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use amount::{canonical_decimal, to_wei, WEI_DECIMALS};
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest, DigestAlgorithm};
pub use error::{CanonicalizationError, CoreError};
pub use identity::{AccountId, ContractAddress, PoolId, SubmissionId, ValueContext};
pub use temporal::Timestamp;
