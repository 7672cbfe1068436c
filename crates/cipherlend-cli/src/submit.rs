//! # Submission Subcommands (dry run)
//!
//! `loan`, `liquidity` and `assess` run the real orchestrator against the
//! in-process contract writer and confirmation waiter, then print the
//! receipt, the phase log and every notification as one JSON report.
//!
//! `--reject-write` and `--revert` script the mock chain to fail so the
//! failure paths can be exercised from the shell.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use cipherlend_core::{AccountId, PoolId};
use cipherlend_state::SubmissionState;
use cipherlend_submit::{
    Collaborators, ContractCall, LiquidityRequest, LoanRequest, MockConfirmationWaiter,
    MockContractWriter, Notification, PipelineConfig, RecordingNotifier, RiskAssessmentRequest,
    SubmissionOrchestrator, SubmissionReceipt, SubmissionRequest,
};
use serde::Serialize;

use crate::config::encryption_service;

/// Chain behaviour shared by every submission subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ChainArgs {
    /// Connected account (default: configured account).
    #[arg(long)]
    pub account: Option<String>,
    /// Make the mock writer reject the contract call with this reason.
    #[arg(long)]
    pub reject_write: Option<String>,
    /// Make the mock waiter revert the transaction with this reason.
    #[arg(long)]
    pub revert: Option<String>,
}

/// Arguments for `cipherlend loan`.
#[derive(Args, Debug)]
pub struct LoanArgs {
    /// Loan amount.
    #[arg(long)]
    pub amount: f64,
    /// Collateral value.
    #[arg(long)]
    pub collateral: f64,
    /// Collateral asset type.
    #[arg(long, default_value = "real_estate")]
    pub collateral_type: String,
    /// Where the collateral is held.
    #[arg(long, default_value = "")]
    pub collateral_location: String,
    /// Borrower credit score.
    #[arg(long)]
    pub credit: f64,
    /// Target pool.
    #[arg(long, default_value_t = 1)]
    pub pool: u64,
    #[command(flatten)]
    pub chain: ChainArgs,
}

/// Arguments for `cipherlend liquidity`.
#[derive(Args, Debug)]
pub struct LiquidityArgs {
    /// Amount supplied.
    #[arg(long)]
    pub amount: f64,
    /// Target pool.
    #[arg(long, default_value_t = 1)]
    pub pool: u64,
    #[command(flatten)]
    pub chain: ChainArgs,
}

/// Arguments for `cipherlend assess`.
#[derive(Args, Debug)]
pub struct AssessArgs {
    /// Borrower being assessed.
    #[arg(long)]
    pub borrower: String,
    /// Risk score.
    #[arg(long)]
    pub risk: f64,
    /// Credit score.
    #[arg(long)]
    pub credit: f64,
    /// Collateral value.
    #[arg(long)]
    pub collateral: f64,
    /// Debt ratio.
    #[arg(long)]
    pub debt_ratio: f64,
    #[command(flatten)]
    pub chain: ChainArgs,
}

/// What a dry run prints.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DryRunReport {
    /// Receipt of a successful submission.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<SubmissionReceipt>,
    /// Final submission state with its transition log.
    pub state: SubmissionState,
    /// Contract calls the mock writer received.
    pub calls: Vec<ContractCall>,
    /// Notifications raised during the run.
    pub notifications: Vec<Notification>,
}

/// Execute `loan`.
pub fn run_loan(args: &LoanArgs, config: &PipelineConfig) -> Result<u8> {
    let request = SubmissionRequest::Loan(LoanRequest {
        amount: args.amount,
        collateral_amount: args.collateral,
        collateral_type: args.collateral_type.clone(),
        collateral_location: args.collateral_location.clone(),
        credit_score: args.credit,
        pool_id: PoolId(args.pool),
    });
    report(dry_run(&request, &args.chain, config)?)
}

/// Execute `liquidity`.
pub fn run_liquidity(args: &LiquidityArgs, config: &PipelineConfig) -> Result<u8> {
    let request = SubmissionRequest::Liquidity(LiquidityRequest {
        amount: args.amount,
        pool_id: PoolId(args.pool),
    });
    report(dry_run(&request, &args.chain, config)?)
}

/// Execute `assess`.
pub fn run_assess(args: &AssessArgs, config: &PipelineConfig) -> Result<u8> {
    let request = SubmissionRequest::RiskAssessment(RiskAssessmentRequest {
        user_address: AccountId::new(&args.borrower).context("invalid borrower address")?,
        risk_score: args.risk,
        credit_score: args.credit,
        collateral_value: args.collateral,
        debt_ratio: args.debt_ratio,
    });
    report(dry_run(&request, &args.chain, config)?)
}

fn report(report: DryRunReport) -> Result<u8> {
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(if report.receipt.is_some() { 0 } else { 1 })
}

/// Run `request` through the orchestrator on a current-thread runtime.
pub fn dry_run(
    request: &SubmissionRequest,
    chain: &ChainArgs,
    config: &PipelineConfig,
) -> Result<DryRunReport> {
    let mut config = config.clone();
    if let Some(account) = &chain.account {
        config.account_id = Some(account.clone());
    }
    let account = config.account().context("invalid account configuration")?;

    let writer = Arc::new(match &chain.reject_write {
        Some(reason) => MockContractWriter::rejecting(reason.clone()),
        None => MockContractWriter::new(),
    });
    let waiter = Arc::new(match &chain.revert {
        Some(reason) => MockConfirmationWaiter::reverting(reason.clone()),
        None => MockConfirmationWaiter::new(),
    });
    let notifier = Arc::new(RecordingNotifier::new());
    let orchestrator = SubmissionOrchestrator::new(
        Arc::new(encryption_service(&config)),
        Collaborators {
            account: Arc::new(account),
            writer: writer.clone(),
            confirmations: waiter,
            notifier: notifier.clone(),
        },
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let mut state = SubmissionState::new();
    let result = runtime.block_on(orchestrator.submit(request, &mut state));
    if let Err(e) = &result {
        tracing::warn!(error = %e, "dry run ended in failure");
    }

    Ok(DryRunReport {
        receipt: result.ok(),
        state,
        calls: writer.calls(),
        notifications: notifier.notifications(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cipherlend_state::{FailureReason, SubmissionPhase};

    fn connected() -> ChainArgs {
        ChainArgs {
            account: Some("0xuser".into()),
            ..ChainArgs::default()
        }
    }

    fn liquidity(amount: f64) -> SubmissionRequest {
        SubmissionRequest::Liquidity(LiquidityRequest {
            amount,
            pool_id: PoolId(3),
        })
    }

    #[test]
    fn liquidity_dry_run_succeeds() {
        let report = dry_run(&liquidity(1.25), &connected(), &PipelineConfig::default()).unwrap();
        assert!(report.receipt.is_some());
        assert_eq!(report.state.phase(), SubmissionPhase::Succeeded);
        assert_eq!(report.calls.len(), 1);
        assert_eq!(report.calls[0].value, Some(1_250_000_000_000_000_000));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["state"]["phase"], "SUCCEEDED");
        assert_eq!(json["calls"][0]["value"], "1250000000000000000");
    }

    #[test]
    fn dry_run_without_account_fails_unauthenticated() {
        let report =
            dry_run(&liquidity(1.0), &ChainArgs::default(), &PipelineConfig::default()).unwrap();
        assert!(report.receipt.is_none());
        assert_eq!(
            report.state.error_reason(),
            Some(FailureReason::NotAuthenticated)
        );
        assert!(report.calls.is_empty());
    }

    #[test]
    fn scripted_revert_fails_confirmation() {
        let chain = ChainArgs {
            revert: Some("pool paused".into()),
            ..connected()
        };
        let request = SubmissionRequest::Loan(LoanRequest {
            amount: 1.5,
            collateral_amount: 3.0,
            collateral_type: "real_estate".into(),
            collateral_location: String::new(),
            credit_score: 750.0,
            pool_id: PoolId(1),
        });
        let report = dry_run(&request, &chain, &PipelineConfig::default()).unwrap();
        assert_eq!(
            report.state.error_reason(),
            Some(FailureReason::ConfirmationFailed)
        );
        assert_eq!(report.calls.len(), 1);
    }

    #[test]
    fn assess_exit_code_reflects_outcome() {
        let mut args = AssessArgs {
            borrower: "0xborrower".into(),
            risk: 30.0,
            credit: 700.0,
            collateral: 10_000.0,
            debt_ratio: 0.4,
            chain: connected(),
        };
        assert_eq!(run_assess(&args, &PipelineConfig::default()).unwrap(), 0);
        args.debt_ratio = 0.0;
        assert_eq!(run_assess(&args, &PipelineConfig::default()).unwrap(), 1);
    }
}
