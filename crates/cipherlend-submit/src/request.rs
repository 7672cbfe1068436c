//! Submission requests as entered by the user.
//!
//! Numeric fields must be finite and strictly positive. The orchestrator
//! calls [`SubmissionRequest::validate`] before any encryption starts.

use cipherlend_core::{AccountId, PoolId};
use serde::{Deserialize, Serialize};

use crate::error::SubmitError;

/// Borrow against pledged collateral.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanRequest {
    /// Requested loan amount.
    pub amount: f64,
    /// Appraised value of the collateral.
    pub collateral_amount: f64,
    /// Asset class of the collateral.
    pub collateral_type: String,
    /// Where the collateral is held.
    pub collateral_location: String,
    /// Borrower credit score.
    pub credit_score: f64,
    /// Target pool.
    pub pool_id: PoolId,
}

/// Supply liquidity to a pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityRequest {
    /// Amount supplied, in whole tokens.
    pub amount: f64,
    /// Target pool.
    pub pool_id: PoolId,
}

/// Confidential risk assessment of a borrower.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessmentRequest {
    /// Borrower being assessed.
    pub user_address: AccountId,
    /// Risk score.
    pub risk_score: f64,
    /// Credit score.
    pub credit_score: f64,
    /// Collateral value.
    pub collateral_value: f64,
    /// Debt ratio.
    pub debt_ratio: f64,
}

/// Any request the orchestrator accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum SubmissionRequest {
    /// See [`LoanRequest`].
    Loan(LoanRequest),
    /// See [`LiquidityRequest`].
    Liquidity(LiquidityRequest),
    /// See [`RiskAssessmentRequest`].
    RiskAssessment(RiskAssessmentRequest),
}

fn require_positive(name: &str, value: f64) -> Result<(), SubmitError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SubmitError::InvalidInput(format!(
            "{name} must be a positive number, got {value}"
        )))
    }
}

impl LoanRequest {
    /// Check every numeric field and the collateral type.
    pub fn validate(&self) -> Result<(), SubmitError> {
        require_positive("amount", self.amount)?;
        require_positive("collateral amount", self.collateral_amount)?;
        require_positive("credit score", self.credit_score)?;
        if self.collateral_type.trim().is_empty() {
            return Err(SubmitError::InvalidInput(
                "collateral type must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl LiquidityRequest {
    /// Check the amount.
    pub fn validate(&self) -> Result<(), SubmitError> {
        require_positive("amount", self.amount)
    }
}

impl RiskAssessmentRequest {
    /// Check every numeric field.
    pub fn validate(&self) -> Result<(), SubmitError> {
        require_positive("risk score", self.risk_score)?;
        require_positive("credit score", self.credit_score)?;
        require_positive("collateral value", self.collateral_value)?;
        require_positive("debt ratio", self.debt_ratio)
    }
}

impl SubmissionRequest {
    /// Validate whichever request this is.
    pub fn validate(&self) -> Result<(), SubmitError> {
        match self {
            Self::Loan(r) => r.validate(),
            Self::Liquidity(r) => r.validate(),
            Self::RiskAssessment(r) => r.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan() -> LoanRequest {
        LoanRequest {
            amount: 1.5,
            collateral_amount: 3.0,
            collateral_type: "real_estate".into(),
            collateral_location: "Berlin".into(),
            credit_score: 750.0,
            pool_id: PoolId(1),
        }
    }

    #[test]
    fn test_valid_loan() {
        assert!(loan().validate().is_ok());
        assert!(SubmissionRequest::Loan(loan()).validate().is_ok());
    }

    #[test]
    fn test_zero_and_non_finite_rejected() {
        let mut r = loan();
        r.amount = 0.0;
        assert!(matches!(r.validate(), Err(SubmitError::InvalidInput(_))));

        let mut r = loan();
        r.credit_score = f64::NAN;
        assert!(r.validate().is_err());

        let liquidity = LiquidityRequest {
            amount: -1.0,
            pool_id: PoolId(0),
        };
        assert!(liquidity.validate().is_err());
    }

    #[test]
    fn test_blank_collateral_type_rejected() {
        let mut r = loan();
        r.collateral_type = "  ".into();
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_assessment_requires_every_field() {
        let mut r = RiskAssessmentRequest {
            user_address: AccountId::new("0xborrower").unwrap(),
            risk_score: 20.0,
            credit_score: 700.0,
            collateral_value: 5000.0,
            debt_ratio: 0.3,
        };
        assert!(r.validate().is_ok());
        r.debt_ratio = 0.0;
        assert!(r.validate().is_err());
    }

    #[test]
    fn test_request_json_shape() {
        let json = serde_json::to_value(SubmissionRequest::Liquidity(LiquidityRequest {
            amount: 10.0,
            pool_id: PoolId(2),
        }))
        .unwrap();
        assert_eq!(json["kind"], "liquidity");
        assert_eq!(json["poolId"], 2);
    }
}
