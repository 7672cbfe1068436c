//! # Submission Orchestrator
//!
//! Runs one request through the pipeline and records every step in the
//! caller's [`SubmissionState`].
//!
//! ```text
//! Idle ─► Encrypting ─► Submitting ─► Confirming ─► Succeeded
//!   │          │             │             │
//!   └──────────┴─────────────┴─────────────┴──────► Failed
//! ```
//!
//! Risk assessments have no contract write and go straight from
//! `Encrypting` to `Succeeded`.
//!
//! ## Security Invariant
//!
//! No field is encrypted before an account is known, and no combined
//! record is built from a proof that failed validation or fell outside the
//! freshness window.

use std::sync::Arc;

use cipherlend_core::{to_wei, AccountId, SubmissionId, Timestamp, ValueContext};
use cipherlend_envelope::{
    assess_risk_encrypted, encode, CollateralDescriptor, EncryptedEnvelope, EncryptionService,
};
use cipherlend_state::{SubmissionPhase, SubmissionState};
use serde::Serialize;

use crate::collaborators::{
    AccountContext, ConfirmationWaiter, ContractArg, ContractCall, ContractOperation,
    ContractWriter, Notification, Notifier, TransactionReceipt,
};
use crate::error::SubmitError;
use crate::payload::{AssessmentProofs, LiquidityProof, LoanProof, RiskAssessmentRecord};
use crate::request::{LiquidityRequest, LoanRequest, RiskAssessmentRequest, SubmissionRequest};

/// Everything outside the pipeline the orchestrator talks to.
#[derive(Clone)]
pub struct Collaborators {
    /// Connected account and target contract.
    pub account: Arc<dyn AccountContext>,
    /// Issues contract writes.
    pub writer: Arc<dyn ContractWriter>,
    /// Waits for writes to finalize.
    pub confirmations: Arc<dyn ConfirmationWaiter>,
    /// Receives user-facing notifications.
    pub notifier: Arc<dyn Notifier>,
}

/// Which entry point produced a receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SubmissionOperation {
    /// `submit_loan`.
    Loan,
    /// `submit_liquidity`.
    Liquidity,
    /// `submit_risk_assessment`.
    RiskAssessment,
}

impl SubmissionOperation {
    /// Short name used in logs and notifications.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loan => "loan",
            Self::Liquidity => "liquidity",
            Self::RiskAssessment => "risk assessment",
        }
    }
}

impl std::fmt::Display for SubmissionOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of a successful submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmissionReceipt {
    /// Identifier of this call.
    pub submission_id: SubmissionId,
    /// Entry point that produced the receipt.
    pub operation: SubmissionOperation,
    /// Hash of the confirmed transaction. `None` for risk assessments.
    pub transaction_hash: Option<String>,
    /// Block the transaction was included in. `None` for risk assessments.
    pub block_number: Option<u64>,
    /// Encoded combined record: the combined proof sent to the contract,
    /// or the assessment record for risk assessments.
    pub payload: String,
    /// `false` if any field took the plaintext fallback path.
    pub privacy_preserving: bool,
}

struct Prepared {
    payload: String,
    privacy_preserving: bool,
}

/// Drives submissions. Holds no per-call state; share it freely.
pub struct SubmissionOrchestrator {
    encryption: Arc<EncryptionService>,
    collaborators: Collaborators,
}

impl std::fmt::Debug for SubmissionOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionOrchestrator")
            .field("encryption", &self.encryption)
            .finish_non_exhaustive()
    }
}

impl SubmissionOrchestrator {
    /// Create an orchestrator over `encryption` and `collaborators`.
    pub fn new(encryption: Arc<EncryptionService>, collaborators: Collaborators) -> Self {
        Self {
            encryption,
            collaborators,
        }
    }

    /// Dispatch any request to its entry point.
    pub async fn submit(
        &self,
        request: &SubmissionRequest,
        state: &mut SubmissionState,
    ) -> Result<SubmissionReceipt, SubmitError> {
        match request {
            SubmissionRequest::Loan(r) => self.submit_loan(r, state).await,
            SubmissionRequest::Liquidity(r) => self.submit_liquidity(r, state).await,
            SubmissionRequest::RiskAssessment(r) => self.submit_risk_assessment(r, state).await,
        }
    }

    /// Encrypt a loan request and submit it via `createLoan`.
    pub async fn submit_loan(
        &self,
        request: &LoanRequest,
        state: &mut SubmissionState,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let id = self.start(SubmissionOperation::Loan, state);
        let result = self.run_loan(request, state).await;
        self.settle(id, SubmissionOperation::Loan, state, result)
    }

    /// Encrypt a liquidity deposit and submit it via `addLiquidity`.
    pub async fn submit_liquidity(
        &self,
        request: &LiquidityRequest,
        state: &mut SubmissionState,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let id = self.start(SubmissionOperation::Liquidity, state);
        let result = self.run_liquidity(request, state).await;
        self.settle(id, SubmissionOperation::Liquidity, state, result)
    }

    /// Encrypt a risk assessment and return it as an encoded record.
    /// Nothing is written to the contract.
    pub async fn submit_risk_assessment(
        &self,
        request: &RiskAssessmentRequest,
        state: &mut SubmissionState,
    ) -> Result<SubmissionReceipt, SubmitError> {
        let id = self.start(SubmissionOperation::RiskAssessment, state);
        let result = self.run_risk_assessment(request, state);
        self.settle(id, SubmissionOperation::RiskAssessment, state, result)
    }

    // ── Per-operation flows ─────────────────────────────────────────

    async fn run_loan(
        &self,
        request: &LoanRequest,
        state: &mut SubmissionState,
    ) -> Result<(Prepared, Option<TransactionReceipt>), SubmitError> {
        let (user, ctx) = self.authenticate()?;
        request.validate()?;

        self.enter(state, SubmissionPhase::Encrypting, "encrypting loan fields")?;
        let amount = self.seal_field("amount", request.amount, &ctx)?;
        let collateral = self.seal_field("collateral amount", request.collateral_amount, &ctx)?;
        let (score, risk) = assess_risk_encrypted(
            &self.encryption,
            request.collateral_amount,
            request.amount,
            request.credit_score,
            &ctx,
        )?;
        self.check_field("risk score", f64::from(score), &risk)?;
        let collateral_data = self.encryption.encrypt_collateral(
            CollateralDescriptor {
                asset_type: request.collateral_type.clone(),
                value: request.collateral_amount,
                location: request.collateral_location.clone(),
            },
            &ctx,
        )?;
        self.check_field("collateral data", request.collateral_amount, &collateral_data)?;

        let privacy_preserving =
            self.report_privacy(&[&amount, &collateral, &risk, &collateral_data]);
        let payload = encode(&LoanProof {
            amount_proof: amount.proof().to_string(),
            collateral_proof: collateral.proof().to_string(),
            risk_proof: risk.proof().to_string(),
            collateral_data: collateral_data.encrypted_value().to_string(),
            timestamp: Timestamp::now(),
            user_address: user,
        })?;

        let call = ContractCall {
            operation: ContractOperation::CreateLoan,
            args: vec![
                ContractArg::Uint(request.pool_id.0),
                ContractArg::Bytes(self.encryption.external_input(&amount)?),
                ContractArg::Bytes(self.encryption.external_input(&collateral)?),
                ContractArg::Bytes(payload.clone()),
            ],
            value: None,
        };
        let receipt = self.write_and_confirm(state, call).await?;
        Ok((
            Prepared {
                payload,
                privacy_preserving,
            },
            Some(receipt),
        ))
    }

    async fn run_liquidity(
        &self,
        request: &LiquidityRequest,
        state: &mut SubmissionState,
    ) -> Result<(Prepared, Option<TransactionReceipt>), SubmitError> {
        let (user, ctx) = self.authenticate()?;
        request.validate()?;
        let wei = to_wei(request.amount)?;

        self.enter(state, SubmissionPhase::Encrypting, "encrypting liquidity amount")?;
        let amount = self.seal_field("amount", request.amount, &ctx)?;

        let privacy_preserving = self.report_privacy(&[&amount]);
        let payload = encode(&LiquidityProof {
            amount_proof: amount.proof().to_string(),
            pool_id: request.pool_id,
            timestamp: Timestamp::now(),
            user_address: user,
        })?;

        let call = ContractCall {
            operation: ContractOperation::AddLiquidity,
            args: vec![
                ContractArg::Uint(request.pool_id.0),
                ContractArg::Bytes(self.encryption.external_input(&amount)?),
                ContractArg::Bytes(payload.clone()),
            ],
            value: Some(wei),
        };
        let receipt = self.write_and_confirm(state, call).await?;
        Ok((
            Prepared {
                payload,
                privacy_preserving,
            },
            Some(receipt),
        ))
    }

    fn run_risk_assessment(
        &self,
        request: &RiskAssessmentRequest,
        state: &mut SubmissionState,
    ) -> Result<(Prepared, Option<TransactionReceipt>), SubmitError> {
        let (assessor, _) = self.authenticate()?;
        request.validate()?;
        let ctx = ValueContext::bound(
            self.collaborators.account.contract_address(),
            request.user_address.clone(),
        );

        self.enter(state, SubmissionPhase::Encrypting, "encrypting risk assessment")?;
        let risk = self.seal_field("risk score", request.risk_score, &ctx)?;
        let credit = self.seal_field("credit score", request.credit_score, &ctx)?;
        let collateral = self.seal_field("collateral value", request.collateral_value, &ctx)?;
        let debt = self.seal_field("debt ratio", request.debt_ratio, &ctx)?;

        let privacy_preserving = self.report_privacy(&[&risk, &credit, &collateral, &debt]);
        let payload = encode(&RiskAssessmentRecord {
            risk_score: risk.encrypted_value().to_string(),
            credit_score: credit.encrypted_value().to_string(),
            collateral_value: collateral.encrypted_value().to_string(),
            debt_ratio: debt.encrypted_value().to_string(),
            proofs: AssessmentProofs {
                risk: risk.proof().to_string(),
                credit: credit.proof().to_string(),
                collateral: collateral.proof().to_string(),
                debt: debt.proof().to_string(),
            },
            timestamp: Timestamp::now(),
            assessor,
        })?;

        self.enter(state, SubmissionPhase::Succeeded, "risk assessment encrypted")?;
        Ok((
            Prepared {
                payload,
                privacy_preserving,
            },
            None,
        ))
    }

    // ── Shared steps ────────────────────────────────────────────────

    fn start(&self, operation: SubmissionOperation, state: &mut SubmissionState) -> SubmissionId {
        state.begin();
        let id = SubmissionId::new();
        tracing::info!(submission = %id, %operation, "submission started");
        id
    }

    fn authenticate(&self) -> Result<(AccountId, ValueContext), SubmitError> {
        let user = self
            .collaborators
            .account
            .account_id()
            .ok_or(SubmitError::NotAuthenticated)?;
        let ctx = ValueContext::bound(self.collaborators.account.contract_address(), user.clone());
        Ok((user, ctx))
    }

    fn enter(
        &self,
        state: &mut SubmissionState,
        phase: SubmissionPhase,
        message: impl Into<String>,
    ) -> Result<(), SubmitError> {
        let message = message.into();
        state.try_transition(phase, Some(message.clone()))?;
        tracing::info!(phase = %phase, "{message}");
        self.collaborators.notifier.notify(Notification::info(message));
        Ok(())
    }

    fn seal_field(
        &self,
        field: &str,
        value: f64,
        ctx: &ValueContext,
    ) -> Result<EncryptedEnvelope, SubmitError> {
        let envelope = self.encryption.encrypt_number(value, ctx)?;
        self.check_field(field, value, &envelope)?;
        Ok(envelope)
    }

    fn check_field(
        &self,
        field: &str,
        value: f64,
        envelope: &EncryptedEnvelope,
    ) -> Result<(), SubmitError> {
        let bundle = self.encryption.bundle_for(value, envelope)?;
        let age_ms = self
            .encryption
            .validate_proof(&bundle, value, Timestamp::now())?;
        tracing::debug!(field, age_ms, fallback = envelope.fallback(), "field proof validated");
        Ok(())
    }

    fn report_privacy(&self, envelopes: &[&EncryptedEnvelope]) -> bool {
        let fallback = envelopes.iter().filter(|e| e.fallback()).count();
        if fallback == 0 {
            return true;
        }
        tracing::warn!(
            fallback,
            total = envelopes.len(),
            "fields carried in cleartext; submission is not privacy-preserving"
        );
        self.collaborators.notifier.notify(Notification::warning(format!(
            "{fallback} of {} fields could not be encrypted and are submitted in cleartext",
            envelopes.len()
        )));
        false
    }

    async fn write_and_confirm(
        &self,
        state: &mut SubmissionState,
        call: ContractCall,
    ) -> Result<TransactionReceipt, SubmitError> {
        let operation = call.operation;
        self.enter(state, SubmissionPhase::Submitting, format!("calling {operation}"))?;
        let pending = self.collaborators.writer.write(call).await?;

        self.enter(
            state,
            SubmissionPhase::Confirming,
            format!("waiting for confirmation of {}", pending.hash),
        )?;
        let receipt = self.collaborators.confirmations.wait(&pending).await?;

        self.enter(
            state,
            SubmissionPhase::Succeeded,
            format!("{operation} confirmed in block {}", receipt.block_number),
        )?;
        Ok(receipt)
    }

    fn settle(
        &self,
        id: SubmissionId,
        operation: SubmissionOperation,
        state: &mut SubmissionState,
        result: Result<(Prepared, Option<TransactionReceipt>), SubmitError>,
    ) -> Result<SubmissionReceipt, SubmitError> {
        match result {
            Ok((prepared, tx)) => {
                tracing::info!(
                    submission = %id,
                    %operation,
                    privacy_preserving = prepared.privacy_preserving,
                    "submission succeeded"
                );
                Ok(SubmissionReceipt {
                    submission_id: id,
                    operation,
                    transaction_hash: tx.as_ref().map(|r| r.hash.clone()),
                    block_number: tx.map(|r| r.block_number),
                    payload: prepared.payload,
                    privacy_preserving: prepared.privacy_preserving,
                })
            }
            Err(err) => {
                let reason = err.reason();
                if !state.is_settled() {
                    if let Err(e) = state.fail(reason, err.to_string()) {
                        tracing::error!(submission = %id, error = %e, "could not record failure");
                    }
                }
                tracing::error!(submission = %id, %operation, %reason, error = %err, "submission failed");
                self.collaborators
                    .notifier
                    .notify(Notification::error(format!("{operation} failed: {err}")));
                Err(err)
            }
        }
    }
}
