//! # Encrypt / Decrypt Subcommands
//!
//! `encrypt` prints the envelope for one value. `decrypt` reads back the
//! value of a fallback envelope; sealed envelopes cannot be read locally.

use anyhow::{Context, Result};
use clap::Args;
use cipherlend_envelope::{decode, EncryptedEnvelope, EnvelopeRecord};
use cipherlend_submit::PipelineConfig;
use serde_json::{json, Value};

use crate::config::{encryption_service, value_context};

/// Arguments for `cipherlend encrypt`.
#[derive(Args, Debug)]
pub struct EncryptArgs {
    /// Value to encrypt.
    #[arg(long, allow_negative_numbers = true)]
    pub value: f64,
    /// Account the value is bound to (default: configured account).
    #[arg(long)]
    pub user: Option<String>,
    /// Contract the value is bound to (default: configured contract).
    #[arg(long)]
    pub contract: Option<String>,
    /// Also print the decoded envelope record.
    #[arg(long)]
    pub inspect: bool,
}

/// Arguments for `cipherlend decrypt`.
#[derive(Args, Debug)]
pub struct DecryptArgs {
    /// Encoded `encryptedValue` of an envelope.
    pub encrypted_value: String,
}

/// Execute `encrypt`.
pub fn run_encrypt(args: &EncryptArgs, config: &PipelineConfig) -> Result<u8> {
    println!("{}", serde_json::to_string_pretty(&encrypt_value(args, config)?)?);
    Ok(0)
}

/// Execute `decrypt`.
pub fn run_decrypt(args: &DecryptArgs, config: &PipelineConfig) -> Result<u8> {
    let value = encryption_service(config)
        .decrypt_number(&args.encrypted_value)
        .context("cannot decrypt envelope")?;
    println!("{}", json!({ "value": value }));
    Ok(0)
}

fn encrypt_value(args: &EncryptArgs, config: &PipelineConfig) -> Result<Value> {
    let ctx = value_context(config, args.user.as_deref(), args.contract.as_deref())?;
    let envelope: EncryptedEnvelope = encryption_service(config)
        .encrypt_number(args.value, &ctx)
        .context("encryption failed")?;
    if envelope.fallback() {
        tracing::warn!("envelope carries its value in cleartext");
    }

    let mut out = serde_json::to_value(&envelope)?;
    if args.inspect {
        let record: EnvelopeRecord =
            decode(envelope.encrypted_value()).context("cannot decode envelope record")?;
        out["record"] = serde_json::to_value(record)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(value: f64) -> EncryptArgs {
        EncryptArgs {
            value,
            user: Some("0xuser".into()),
            contract: None,
            inspect: true,
        }
    }

    #[test]
    fn encrypt_prints_sealed_envelope() {
        let out = encrypt_value(&args(42.0), &PipelineConfig::default()).unwrap();
        assert_eq!(out["fallback"], false);
        assert_eq!(out["publicKey"], "cipherlend-fhe-v1");
        assert_eq!(out["record"]["kind"], "sealed");
    }

    #[test]
    fn forced_fallback_round_trips_through_decrypt() {
        let config = PipelineConfig {
            force_fallback: true,
            ..PipelineConfig::default()
        };
        let out = encrypt_value(&args(42.5), &config).unwrap();
        assert_eq!(out["fallback"], true);
        assert_eq!(out["record"]["value"], 42.5);

        let encrypted = out["encryptedValue"].as_str().unwrap().to_string();
        let code = run_decrypt(&DecryptArgs { encrypted_value: encrypted }, &config).unwrap();
        assert_eq!(code, 0);
    }

    #[test]
    fn decrypt_sealed_envelope_fails() {
        let config = PipelineConfig::default();
        let out = encrypt_value(&args(1.0), &config).unwrap();
        let encrypted = out["encryptedValue"].as_str().unwrap().to_string();
        assert!(run_decrypt(&DecryptArgs { encrypted_value: encrypted }, &config).is_err());
    }

    #[test]
    fn encrypt_rejects_non_finite() {
        assert!(encrypt_value(&args(f64::NAN), &PipelineConfig::default()).is_err());
    }
}
