//! Pipeline configuration.
//!
//! Loaded from YAML, then overridden from the environment:
//!
//! - `CIPHERLEND_ACCOUNT_ID` (default: none, i.e. not connected)
//! - `CIPHERLEND_CONTRACT_ADDRESS` (default: the zero address)
//! - `CIPHERLEND_FRESHNESS_WINDOW_MS` (default: 300000)
//! - `CIPHERLEND_FORCE_FALLBACK` (default: false)

use std::path::Path;
use std::sync::Arc;

use cipherlend_core::{AccountId, ContractAddress};
use cipherlend_crypto::{CryptoProvider, SystemCrypto, UnavailableCrypto};
use cipherlend_envelope::EncryptionConfig;
use cipherlend_zkp::{FreshnessWindow, DEFAULT_FRESHNESS_WINDOW_MS};
use serde::{Deserialize, Serialize};

use crate::mock::StaticAccount;

/// Placeholder contract address used when none is configured.
pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";

/// Configuration for one pipeline instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Connected account. `None` means no wallet is connected.
    pub account_id: Option<String>,
    /// Target lending contract.
    pub contract_address: String,
    /// Maximum accepted proof age in milliseconds.
    pub freshness_window_ms: u64,
    /// Treat every encryption primitive as unavailable, so every envelope
    /// takes the plaintext fallback path. Hashing stays available.
    pub force_fallback: bool,
    /// Label recorded as the envelope `publicKey`.
    pub encryption_context: String,
    /// Label recorded as the proof bundle `verificationKey`.
    pub verification_key: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let encryption = EncryptionConfig::default();
        Self {
            account_id: None,
            contract_address: ZERO_ADDRESS.to_string(),
            freshness_window_ms: DEFAULT_FRESHNESS_WINDOW_MS,
            force_fallback: false,
            encryption_context: encryption.encryption_context,
            verification_key: encryption.verification_key,
        }
    }
}

impl PipelineConfig {
    /// Parse a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Read and parse a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(path.display().to_string(), e.to_string()))?;
        Self::from_yaml_str(&content)
    }

    /// Apply `CIPHERLEND_*` overrides from the process environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply `CIPHERLEND_*` overrides read through `lookup`.
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(account) = lookup("CIPHERLEND_ACCOUNT_ID") {
            self.account_id = Some(account);
        }
        if let Some(contract) = lookup("CIPHERLEND_CONTRACT_ADDRESS") {
            self.contract_address = contract;
        }
        if let Some(raw) = lookup("CIPHERLEND_FRESHNESS_WINDOW_MS") {
            self.freshness_window_ms = raw.trim().parse().map_err(|_| {
                ConfigError::InvalidValue("CIPHERLEND_FRESHNESS_WINDOW_MS".into(), raw.clone())
            })?;
        }
        if let Some(raw) = lookup("CIPHERLEND_FORCE_FALLBACK") {
            self.force_fallback = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => {
                    return Err(ConfigError::InvalidValue(
                        "CIPHERLEND_FORCE_FALLBACK".into(),
                        raw,
                    ))
                }
            };
        }
        Ok(())
    }

    /// Settings for the encryption service.
    pub fn encryption_config(&self) -> EncryptionConfig {
        EncryptionConfig {
            encryption_context: self.encryption_context.clone(),
            verification_key: self.verification_key.clone(),
            freshness_window: FreshnessWindow::from_millis(self.freshness_window_ms),
        }
    }

    /// The crypto provider this configuration selects.
    pub fn crypto_provider(&self) -> Arc<dyn CryptoProvider> {
        if self.force_fallback {
            Arc::new(UnavailableCrypto::hash_only())
        } else {
            Arc::new(SystemCrypto)
        }
    }

    /// Account context built from the configured identifiers.
    pub fn account(&self) -> Result<StaticAccount, ConfigError> {
        let contract = ContractAddress::new(&self.contract_address).map_err(|e| {
            ConfigError::InvalidValue("contract_address".into(), e.to_string())
        })?;
        match &self.account_id {
            Some(raw) => {
                let account = AccountId::new(raw)
                    .map_err(|e| ConfigError::InvalidValue("account_id".into(), e.to_string()))?;
                Ok(StaticAccount::connected(contract, account))
            }
            None => Ok(StaticAccount::disconnected(contract)),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {0}: {1}")]
    Read(String, String),
    #[error("failed to parse config: {0}")]
    Parse(String),
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::AccountContext;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults() {
        let cfg = PipelineConfig::default();
        assert!(cfg.account_id.is_none());
        assert_eq!(cfg.freshness_window_ms, 300_000);
        assert!(!cfg.force_fallback);
        assert_eq!(cfg.encryption_context, "cipherlend-fhe-v1");
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg = PipelineConfig::from_yaml_str("account_id: \"0xabc\"\n").unwrap();
        assert_eq!(cfg.account_id.as_deref(), Some("0xabc"));
        assert_eq!(cfg.contract_address, ZERO_ADDRESS);
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "contract_address: \"0xc0ffee\"").unwrap();
        writeln!(file, "freshness_window_ms: 1000").unwrap();
        let cfg = PipelineConfig::load(file.path()).unwrap();
        assert_eq!(cfg.contract_address, "0xc0ffee");
        assert_eq!(cfg.encryption_config().freshness_window.as_millis(), 1000);
    }

    #[test]
    fn missing_file_is_read_error() {
        let err = PipelineConfig::load(Path::new("/nonexistent/cipherlend.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read(..)));
    }

    #[test]
    fn env_overrides_apply() {
        let mut cfg = PipelineConfig::default();
        cfg.apply_overrides_from(lookup(&[
            ("CIPHERLEND_ACCOUNT_ID", "0xuser"),
            ("CIPHERLEND_FRESHNESS_WINDOW_MS", "5000"),
            ("CIPHERLEND_FORCE_FALLBACK", "true"),
        ]))
        .unwrap();
        assert_eq!(cfg.account_id.as_deref(), Some("0xuser"));
        assert_eq!(cfg.freshness_window_ms, 5000);
        assert!(cfg.force_fallback);
        assert_eq!(cfg.crypto_provider().name(), "unavailable(hash-only)");
    }

    #[test]
    fn bad_override_rejected() {
        let mut cfg = PipelineConfig::default();
        let err = cfg
            .apply_overrides_from(lookup(&[("CIPHERLEND_FRESHNESS_WINDOW_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(..)));
        assert!(cfg
            .apply_overrides_from(lookup(&[("CIPHERLEND_FORCE_FALLBACK", "maybe")]))
            .is_err());
    }

    #[test]
    fn account_context_from_config() {
        let mut cfg = PipelineConfig::default();
        assert!(cfg.account().unwrap().account_id().is_none());
        cfg.account_id = Some("0xuser".into());
        let account = cfg.account().unwrap();
        assert_eq!(account.account_id().unwrap().as_str(), "0xuser");
        assert_eq!(account.contract_address().as_str(), ZERO_ADDRESS);
    }
}
