//! # cipherlend-envelope — Confidential Value Envelopes
//!
//! Turns plaintext numbers into encrypted envelopes with accompanying
//! proofs, and back again where that is possible.
//!
//! ## Modules
//!
//! - **Codec** (`codec.rs`): versioned base64(JSON) encoding for every
//!   record that crosses the wire.
//! - **Envelope** (`envelope.rs`): `EncryptedEnvelope`, `ProofBundle` and
//!   the record shapes inside them.
//! - **Service** (`service.rs`): `EncryptionService` with the sealed
//!   primary path and the plaintext fallback path.
//! - **Collateral** (`collateral.rs`): collateral descriptors encrypted as
//!   one record.
//! - **Risk** (`risk.rs`): risk score derivation.
//! - **Ops** (`ops.rs`): placeholder confidential arithmetic.
//!
//! ## Security Invariant
//!
//! An envelope with `fallback() == true` carries its value in cleartext
//! inside the encoded string. Such envelopes are never privacy-preserving,
//! and every layer above this crate must surface that fact.
//!
//! Sealed envelopes are one-way: the sealing key is discarded, so
//! [`EncryptionService::decrypt_number`] refuses them with
//! [`EnvelopeError::NotLocallyDecryptable`].

pub mod codec;
pub mod collateral;
pub mod envelope;
pub mod error;
pub mod ops;
pub mod risk;
pub mod service;

pub use codec::{decode, encode, FORMAT_VERSION};
pub use collateral::{CollateralDescriptor, CollateralRecord};
pub use envelope::{EncryptedEnvelope, EnvelopeRecord, PlaintextValue, ProofBundle, ProofRecord};
pub use error::{CodecError, EnvelopeError};
pub use risk::{assess_risk, assess_risk_encrypted, risk_score};
pub use service::{EncryptionConfig, EncryptionService, ExternalInput};
