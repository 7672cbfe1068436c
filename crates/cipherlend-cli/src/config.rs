//! # Config Subcommand
//!
//! Loads the pipeline configuration shared by every subcommand and prints
//! the effective result.

use std::path::Path;

use anyhow::{Context, Result};
use cipherlend_core::{AccountId, ContractAddress, ValueContext};
use cipherlend_envelope::EncryptionService;
use cipherlend_submit::PipelineConfig;

/// Load `path` (or the defaults) and apply `CIPHERLEND_*` overrides.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let mut config = match path {
        Some(p) => PipelineConfig::load(p)
            .with_context(|| format!("failed to load config from {}", p.display()))?,
        None => PipelineConfig::default(),
    };
    config
        .apply_env_overrides()
        .context("invalid CIPHERLEND_* environment override")?;
    Ok(config)
}

/// Encryption service for `config`.
pub fn encryption_service(config: &PipelineConfig) -> EncryptionService {
    EncryptionService::new(config.crypto_provider(), config.encryption_config())
}

/// Value context from explicit flags, falling back to the configuration.
/// A missing account leaves the context unbound on the user side.
pub fn value_context(
    config: &PipelineConfig,
    user: Option<&str>,
    contract: Option<&str>,
) -> Result<ValueContext> {
    let contract = ContractAddress::new(contract.unwrap_or(&config.contract_address))
        .context("invalid contract address")?;
    let user = match user.or(config.account_id.as_deref()) {
        Some(raw) => Some(AccountId::new(raw).context("invalid account id")?),
        None => None,
    };
    Ok(ValueContext {
        contract: Some(contract),
        user,
    })
}

/// Print the effective configuration.
pub fn run_config(config: &PipelineConfig) -> Result<u8> {
    println!("{}", serde_json::to_string_pretty(config)?);
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "contract_address: \"0xc0ffee\"").unwrap();
        writeln!(file, "encryption_context: \"staging-fhe\"").unwrap();
        let config = load_config(Some(file.path())).unwrap();
        assert_eq!(config.contract_address, "0xc0ffee");
        assert_eq!(encryption_service(&config).config().encryption_context, "staging-fhe");
    }

    #[test]
    fn load_config_missing_file_fails() {
        let err = load_config(Some(Path::new("/nonexistent/cipherlend.yaml"))).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load config"));
    }

    #[test]
    fn value_context_prefers_flags() {
        let mut config = PipelineConfig::default();
        config.account_id = Some("0xconfigured".into());
        let ctx = value_context(&config, Some("0xflag"), Some("0xcontract")).unwrap();
        assert_eq!(ctx.user_str(), "0xflag");
        assert_eq!(ctx.contract_str(), "0xcontract");

        let ctx = value_context(&config, None, None).unwrap();
        assert_eq!(ctx.user_str(), "0xconfigured");
    }

    #[test]
    fn value_context_without_account_is_unbound_user() {
        let ctx = value_context(&PipelineConfig::default(), None, None).unwrap();
        assert!(ctx.user.is_none());
        assert_eq!(ctx.user_str(), "");
    }

    #[test]
    fn run_config_succeeds() {
        assert_eq!(run_config(&PipelineConfig::default()).unwrap(), 0);
    }
}
