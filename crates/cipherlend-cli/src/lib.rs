//! # cipherlend-cli — CipherLend Command-Line Interface
//!
//! Local driver for the confidential submission pipeline. Every command
//! prints JSON on stdout so its output can be piped into other tools.
//!
//! ## Subcommands
//!
//! - `encrypt` / `decrypt` — Build an envelope; read back a fallback one
//! - `proof` / `verify-proof` — Generate and check standalone proof bundles
//! - `risk` — Derive (and optionally encrypt) a risk score
//! - `loan` / `liquidity` / `assess` — Dry-run a submission against the
//!   in-process contract collaborators
//! - `config` — Print the effective configuration
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers take parsed args and the
//!   loaded [`PipelineConfig`](cipherlend_submit::PipelineConfig).
//! - Handlers return an exit code. `anyhow` is used only in this crate.

pub mod config;
pub mod encrypt;
pub mod proof;
pub mod risk;
pub mod submit;
