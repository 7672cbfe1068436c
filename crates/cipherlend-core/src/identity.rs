//! # Identity Newtypes
//!
//! Newtype wrappers for the identifiers that flow through the pipeline.
//! You cannot pass an `AccountId` where a `ContractAddress` is expected,
//! and neither can be constructed empty.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Identifier of the connected account submitting confidential values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

/// Address of the target lending contract.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContractAddress(String);

/// Identifier of a lending pool on the target contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PoolId(pub u64);

/// Unique identifier for one submission call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SubmissionId(pub Uuid);

fn validate_handle(kind: &str, raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidIdentifier(format!("{kind} must not be empty")));
    }
    if trimmed.chars().any(char::is_whitespace) {
        return Err(CoreError::InvalidIdentifier(format!(
            "{kind} must not contain whitespace: {raw:?}"
        )));
    }
    Ok(trimmed.to_string())
}

impl AccountId {
    /// Validate and wrap an account identifier.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CoreError> {
        validate_handle("account id", raw.as_ref()).map(Self)
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ContractAddress {
    /// Validate and wrap a contract address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CoreError> {
        validate_handle("contract address", raw.as_ref()).map(Self)
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl SubmissionId {
    /// Generate a new random submission identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SubmissionId {
    fn default() -> Self {
        Self::new()
    }
}

impl TryFrom<String> for AccountId {
    type Error = CoreError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ContractAddress {
    type Error = CoreError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContractAddress> for String {
    fn from(value: ContractAddress) -> Self {
        value.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::fmt::Display for PoolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pool:{}", self.0)
    }
}

impl std::fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "submission:{}", self.0)
    }
}

/// The contract and user a confidential value is bound to.
///
/// Both halves are optional: a value may be encrypted before a wallet is
/// connected. Digests render an absent half as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueContext {
    /// Target contract, if known.
    pub contract: Option<ContractAddress>,
    /// Submitting account, if connected.
    pub user: Option<AccountId>,
}

impl ValueContext {
    /// Context bound to both a contract and a user.
    pub fn bound(contract: ContractAddress, user: AccountId) -> Self {
        Self {
            contract: Some(contract),
            user: Some(user),
        }
    }

    /// Contract half as a string, empty when unbound.
    pub fn contract_str(&self) -> &str {
        self.contract.as_ref().map(ContractAddress::as_str).unwrap_or("")
    }

    /// User half as a string, empty when unbound.
    pub fn user_str(&self) -> &str {
        self.user.as_ref().map(AccountId::as_str).unwrap_or("")
    }
}
