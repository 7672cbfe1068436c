//! # Proof Subcommands
//!
//! `proof` prints a standalone proof bundle for a value. `verify-proof`
//! checks a bundle against the value it should attest to and the
//! configured freshness window.

use anyhow::{Context, Result};
use clap::Args;
use cipherlend_core::Timestamp;
use cipherlend_envelope::{EnvelopeError, ProofBundle};
use cipherlend_submit::PipelineConfig;
use serde_json::{json, Value};

use crate::config::{encryption_service, value_context};

/// Arguments for `cipherlend proof`.
#[derive(Args, Debug)]
pub struct ProofArgs {
    /// Value to prove.
    #[arg(long)]
    pub value: f64,
    /// Account the proof is bound to (default: configured account).
    #[arg(long)]
    pub user: Option<String>,
    /// Contract the proof is bound to (default: configured contract).
    #[arg(long)]
    pub contract: Option<String>,
}

/// Arguments for `cipherlend verify-proof`.
#[derive(Args, Debug)]
pub struct VerifyProofArgs {
    /// Proof bundle as JSON, as printed by `cipherlend proof`.
    #[arg(long)]
    pub bundle: String,
    /// Value the bundle should attest to.
    #[arg(long)]
    pub expected: f64,
}

/// Execute `proof`.
pub fn run_proof(args: &ProofArgs, config: &PipelineConfig) -> Result<u8> {
    let ctx = value_context(config, args.user.as_deref(), args.contract.as_deref())?;
    let bundle = encryption_service(config)
        .generate_proof(args.value, &ctx)
        .context("proof generation failed")?;
    println!("{}", serde_json::to_string_pretty(&bundle)?);
    Ok(0)
}

/// Execute `verify-proof`. Exit code 1 means the bundle was rejected.
pub fn run_verify_proof(args: &VerifyProofArgs, config: &PipelineConfig) -> Result<u8> {
    let (code, report) = verify(args, config, Timestamp::now())?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(code)
}

fn verify(args: &VerifyProofArgs, config: &PipelineConfig, now: Timestamp) -> Result<(u8, Value)> {
    let bundle: ProofBundle =
        serde_json::from_str(&args.bundle).context("bundle is not a valid proof bundle")?;
    match encryption_service(config).validate_proof(&bundle, args.expected, now) {
        Ok(age_ms) => Ok((0, json!({ "valid": true, "ageMs": age_ms }))),
        Err(e @ (EnvelopeError::InvalidProof(_) | EnvelopeError::ProofExpired { .. })) => {
            Ok((1, json!({ "valid": false, "error": e.to_string() })))
        }
        Err(e) => Err(e).context("proof bundle could not be checked"),
    }
}
