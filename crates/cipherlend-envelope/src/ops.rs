//! # Placeholder Confidential Arithmetic
//!
//! Envelope × envelope operations in the shape a homomorphic backend would
//! expose. Today each one decrypts, computes in the clear and re-encrypts,
//! so only fallback envelopes are accepted as operands; a sealed operand
//! fails with `NotLocallyDecryptable`.
//!
//! Results are unbound (no contract or user context).

use std::cmp::Ordering;

use cipherlend_core::ValueContext;

use crate::envelope::EncryptedEnvelope;
use crate::error::EnvelopeError;
use crate::service::EncryptionService;

fn operands(
    service: &EncryptionService,
    a: &EncryptedEnvelope,
    b: &EncryptedEnvelope,
) -> Result<(f64, f64), EnvelopeError> {
    Ok((
        service.decrypt_number(a.encrypted_value())?,
        service.decrypt_number(b.encrypted_value())?,
    ))
}

fn reencrypt(service: &EncryptionService, value: f64) -> Result<EncryptedEnvelope, EnvelopeError> {
    service.encrypt_number(value, &ValueContext::default())
}

/// `a + b`.
pub fn add(
    service: &EncryptionService,
    a: &EncryptedEnvelope,
    b: &EncryptedEnvelope,
) -> Result<EncryptedEnvelope, EnvelopeError> {
    let (x, y) = operands(service, a, b)?;
    reencrypt(service, x + y)
}

/// `max(0, a - b)`.
pub fn subtract(
    service: &EncryptionService,
    a: &EncryptedEnvelope,
    b: &EncryptedEnvelope,
) -> Result<EncryptedEnvelope, EnvelopeError> {
    let (x, y) = operands(service, a, b)?;
    reencrypt(service, (x - y).max(0.0))
}

/// `a * b`.
pub fn multiply(
    service: &EncryptionService,
    a: &EncryptedEnvelope,
    b: &EncryptedEnvelope,
) -> Result<EncryptedEnvelope, EnvelopeError> {
    let (x, y) = operands(service, a, b)?;
    reencrypt(service, x * y)
}

/// Order of `a` relative to `b`.
pub fn compare(
    service: &EncryptionService,
    a: &EncryptedEnvelope,
    b: &EncryptedEnvelope,
) -> Result<Ordering, EnvelopeError> {
    let (x, y) = operands(service, a, b)?;
    Ok(x.total_cmp(&y))
}
