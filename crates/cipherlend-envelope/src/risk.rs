//! # Risk Derivation
//!
//! ```text
//! ratio = collateral / loan * 100
//! score = max(0, 100 - 0.5 * ratio - 0.3 * credit)
//! ```
//!
//! Lower is better. The score is rounded to the nearest integer before it
//! is encrypted.

use cipherlend_core::ValueContext;

use crate::envelope::EncryptedEnvelope;
use crate::error::EnvelopeError;
use crate::service::EncryptionService;

/// Unrounded risk score.
///
/// # Errors
///
/// `InvalidInput` if `loan_amount` is not positive, or if any input is
/// non-finite or negative.
pub fn assess_risk(
    collateral_value: f64,
    loan_amount: f64,
    credit_score: f64,
) -> Result<f64, EnvelopeError> {
    for (name, v) in [
        ("collateral value", collateral_value),
        ("loan amount", loan_amount),
        ("credit score", credit_score),
    ] {
        if !v.is_finite() || v < 0.0 {
            return Err(EnvelopeError::InvalidInput(format!(
                "{name} must be a non-negative finite number, got {v}"
            )));
        }
    }
    if loan_amount == 0.0 {
        return Err(EnvelopeError::InvalidInput(
            "loan amount must be non-zero to derive a collateral ratio".into(),
        ));
    }

    let ratio = collateral_value / loan_amount * 100.0;
    Ok((100.0 - ratio * 0.5 - credit_score * 0.3).max(0.0))
}

/// Risk score rounded to the nearest integer, halves away from zero.
pub fn risk_score(
    collateral_value: f64,
    loan_amount: f64,
    credit_score: f64,
) -> Result<u32, EnvelopeError> {
    let score = assess_risk(collateral_value, loan_amount, credit_score)?;
    // score is in [0, 100] for every accepted input.
    Ok(score.round() as u32)
}

/// Derive the risk score and encrypt it. Returns the rounded score so the
/// caller can build a proof bundle for it.
pub fn assess_risk_encrypted(
    service: &EncryptionService,
    collateral_value: f64,
    loan_amount: f64,
    credit_score: f64,
    ctx: &ValueContext,
) -> Result<(u32, EncryptedEnvelope), EnvelopeError> {
    let score = risk_score(collateral_value, loan_amount, credit_score)?;
    let envelope = service.encrypt_number(f64::from(score), ctx)?;
    Ok((score, envelope))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_score() {
        // ratio = 150, score = 100 - 75 - 225 -> floored at 0.
        assert_eq!(risk_score(1500.0, 1000.0, 750.0).unwrap(), 0);
        // ratio = 50, score = 100 - 25 - 30 = 45.
        assert_eq!(risk_score(500.0, 1000.0, 100.0).unwrap(), 45);
    }

    #[test]
    fn test_rounding() {
        // ratio = 10, score = 100 - 5 - 0.3 = 94.7
        assert!((assess_risk(100.0, 1000.0, 1.0).unwrap() - 94.7).abs() < 1e-9);
        assert_eq!(risk_score(100.0, 1000.0, 1.0).unwrap(), 95);
    }

    #[test]
    fn test_zero_loan_rejected() {
        assert!(matches!(
            assess_risk(1500.0, 0.0, 700.0),
            Err(EnvelopeError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_bad_inputs_rejected() {
        assert!(assess_risk(-1.0, 10.0, 1.0).is_err());
        assert!(assess_risk(1.0, f64::NAN, 1.0).is_err());
        assert!(assess_risk(1.0, 10.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_encrypted_score_matches() {
        use cipherlend_crypto::UnavailableCrypto;
        use std::sync::Arc;

        let service = EncryptionService::new(
            Arc::new(UnavailableCrypto::new()),
            crate::service::EncryptionConfig::default(),
        );
        let (score, env) =
            assess_risk_encrypted(&service, 500.0, 1000.0, 100.0, &ValueContext::default())
                .unwrap();
        assert_eq!(score, 45);
        assert_eq!(service.decrypt_number(env.encrypted_value()).unwrap(), 45.0);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The score stays in [0, 100] for positive amounts and credit in [0, 850].
        #[test]
        fn score_is_bounded(
            collateral in 0.0f64..1.0e12,
            loan in 1.0e-6f64..1.0e12,
            credit in 0.0f64..=850.0,
        ) {
            let score = assess_risk(collateral, loan, credit).unwrap();
            prop_assert!((0.0..=100.0).contains(&score));
            prop_assert!(risk_score(collateral, loan, credit).unwrap() <= 100);
        }
    }
}
