//! Combined records assembled from per-field proofs.
//!
//! Each record is written with the envelope codec and handed to the
//! contract (loan, liquidity) or returned to the caller (assessment).

use cipherlend_core::{AccountId, PoolId, Timestamp};
use serde::{Deserialize, Serialize};

/// Combined proof for `createLoan`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanProof {
    /// Proof of the loan amount envelope.
    pub amount_proof: String,
    /// Proof of the collateral amount envelope.
    pub collateral_proof: String,
    /// Proof of the risk score envelope.
    pub risk_proof: String,
    /// Encrypted collateral descriptor.
    pub collateral_data: String,
    /// When the record was assembled.
    pub timestamp: Timestamp,
    /// Submitting account.
    pub user_address: AccountId,
}

/// Combined proof for `addLiquidity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiquidityProof {
    /// Proof of the amount envelope.
    pub amount_proof: String,
    /// Target pool.
    pub pool_id: PoolId,
    /// When the record was assembled.
    pub timestamp: Timestamp,
    /// Submitting account.
    pub user_address: AccountId,
}

/// Per-field proofs of a risk assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssessmentProofs {
    /// Risk score proof.
    pub risk: String,
    /// Credit score proof.
    pub credit: String,
    /// Collateral value proof.
    pub collateral: String,
    /// Debt ratio proof.
    pub debt: String,
}

/// Encrypted risk assessment returned to the caller.
///
/// Value fields hold the encoded envelope records, never plaintext.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessmentRecord {
    /// Encrypted risk score.
    pub risk_score: String,
    /// Encrypted credit score.
    pub credit_score: String,
    /// Encrypted collateral value.
    pub collateral_value: String,
    /// Encrypted debt ratio.
    pub debt_ratio: String,
    /// Per-field proofs.
    pub proofs: AssessmentProofs,
    /// When the record was assembled.
    pub timestamp: Timestamp,
    /// Account that produced the assessment.
    pub assessor: AccountId,
}
