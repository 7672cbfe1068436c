//! # Risk Subcommand
//!
//! Derives the risk score for a prospective loan and, with `--encrypt`,
//! prints the envelope the score would be submitted as.

use anyhow::{Context, Result};
use clap::Args;
use cipherlend_envelope::{assess_risk, assess_risk_encrypted};
use cipherlend_submit::PipelineConfig;
use serde_json::{json, Value};

use crate::config::{encryption_service, value_context};

/// Arguments for `cipherlend risk`.
#[derive(Args, Debug)]
pub struct RiskArgs {
    /// Appraised collateral value.
    #[arg(long)]
    pub collateral: f64,
    /// Requested loan amount.
    #[arg(long)]
    pub loan: f64,
    /// Borrower credit score.
    #[arg(long)]
    pub credit: f64,
    /// Also encrypt the rounded score.
    #[arg(long)]
    pub encrypt: bool,
}

/// Execute `risk`.
pub fn run_risk(args: &RiskArgs, config: &PipelineConfig) -> Result<u8> {
    println!("{}", serde_json::to_string_pretty(&derive(args, config)?)?);
    Ok(0)
}

fn derive(args: &RiskArgs, config: &PipelineConfig) -> Result<Value> {
    let raw = assess_risk(args.collateral, args.loan, args.credit).context("risk derivation failed")?;
    if !args.encrypt {
        return Ok(json!({ "score": raw.round(), "unrounded": raw }));
    }
    let ctx = value_context(config, None, None)?;
    let (score, envelope) = assess_risk_encrypted(
        &encryption_service(config),
        args.collateral,
        args.loan,
        args.credit,
        &ctx,
    )
    .context("risk encryption failed")?;
    Ok(json!({ "score": score, "unrounded": raw, "envelope": envelope }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_score() {
        let args = RiskArgs {
            collateral: 500.0,
            loan: 1000.0,
            credit: 100.0,
            encrypt: false,
        };
        let out = derive(&args, &PipelineConfig::default()).unwrap();
        assert_eq!(out["score"], 45.0);
    }

    #[test]
    fn encrypts_score() {
        let args = RiskArgs {
            collateral: 1500.0,
            loan: 1000.0,
            credit: 750.0,
            encrypt: true,
        };
        let out = derive(&args, &PipelineConfig::default()).unwrap();
        assert_eq!(out["score"], 0);
        assert_eq!(out["envelope"]["fallback"], false);
    }

    #[test]
    fn zero_loan_fails() {
        let args = RiskArgs {
            collateral: 1500.0,
            loan: 0.0,
            credit: 700.0,
            encrypt: false,
        };
        assert!(run_risk(&args, &PipelineConfig::default()).is_err());
    }
}
