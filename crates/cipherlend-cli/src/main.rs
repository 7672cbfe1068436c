//! # cipherlend CLI entry point
//!
//! Parses command-line arguments, loads the pipeline configuration and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cipherlend_cli::config::{load_config, run_config};
use cipherlend_cli::encrypt::{run_decrypt, run_encrypt, DecryptArgs, EncryptArgs};
use cipherlend_cli::proof::{run_proof, run_verify_proof, ProofArgs, VerifyProofArgs};
use cipherlend_cli::risk::{run_risk, RiskArgs};
use cipherlend_cli::submit::{
    run_assess, run_liquidity, run_loan, AssessArgs, LiquidityArgs, LoanArgs,
};

/// CipherLend confidential submission pipeline.
///
/// Encrypts and proves lending values, derives risk scores, and dry-runs
/// loan, liquidity and risk assessment submissions.
#[derive(Parser, Debug)]
#[command(name = "cipherlend", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt one value into an envelope.
    Encrypt(EncryptArgs),

    /// Read back the value of a fallback envelope.
    Decrypt(DecryptArgs),

    /// Generate a standalone proof bundle.
    Proof(ProofArgs),

    /// Check a proof bundle against a value and the freshness window.
    VerifyProof(VerifyProofArgs),

    /// Derive a risk score from collateral, loan amount and credit score.
    Risk(RiskArgs),

    /// Dry-run a loan submission.
    Loan(LoanArgs),

    /// Dry-run a liquidity deposit.
    Liquidity(LiquidityArgs),

    /// Dry-run a confidential risk assessment.
    Assess(AssessArgs),

    /// Print the effective configuration.
    Config,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };
    tracing::debug!(?config, "configuration loaded");

    let result = match &cli.command {
        Commands::Encrypt(args) => run_encrypt(args, &config),
        Commands::Decrypt(args) => run_decrypt(args, &config),
        Commands::Proof(args) => run_proof(args, &config),
        Commands::VerifyProof(args) => run_verify_proof(args, &config),
        Commands::Risk(args) => run_risk(args, &config),
        Commands::Loan(args) => run_loan(args, &config),
        Commands::Liquidity(args) => run_liquidity(args, &config),
        Commands::Assess(args) => run_assess(args, &config),
        Commands::Config => run_config(&config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
