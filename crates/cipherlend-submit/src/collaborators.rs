//! # Collaborator Traits
//!
//! The orchestrator's view of everything outside the pipeline: who is
//! submitting, where the contract lives, how writes reach the chain, and
//! where user-facing notifications go.
//!
//! ## Security Invariant
//!
//! All traits require `Send + Sync`; one set of collaborators serves every
//! concurrent submission.

use async_trait::async_trait;
use cipherlend_core::{AccountId, ContractAddress};
use serde::{Serialize, Serializer};
use thiserror::Error;

// ─── Account context ────────────────────────────────────────────────

/// Supplies the connected account and the target contract.
pub trait AccountContext: Send + Sync {
    /// Connected account, or `None` when no wallet is connected.
    fn account_id(&self) -> Option<AccountId>;

    /// Address of the lending contract.
    fn contract_address(&self) -> ContractAddress;
}

// ─── Contract writes ────────────────────────────────────────────────

/// Contract entry point targeted by a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ContractOperation {
    /// `createLoan(poolId, amount, collateral, proof)`.
    #[serde(rename = "createLoan")]
    CreateLoan,
    /// `addLiquidity(poolId, amount, proof)`, payable.
    #[serde(rename = "addLiquidity")]
    AddLiquidity,
}

impl ContractOperation {
    /// The contract function name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateLoan => "createLoan",
            Self::AddLiquidity => "addLiquidity",
        }
    }
}

impl std::fmt::Display for ContractOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One positional contract argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ContractArg {
    /// Unsigned integer argument.
    Uint(u64),
    /// Encoded byte-string argument.
    Bytes(String),
}

/// A contract write request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContractCall {
    /// Target function.
    pub operation: ContractOperation,
    /// Ordered arguments.
    pub args: Vec<ContractArg>,
    /// Native value attached to the call, in wei.
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_wei"
    )]
    pub value: Option<u128>,
}

fn serialize_wei<S: Serializer>(value: &Option<u128>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(wei) => serializer.serialize_str(&wei.to_string()),
        None => serializer.serialize_none(),
    }
}

/// Handle for a write accepted for processing but not yet final.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingTransaction {
    /// Transaction hash.
    pub hash: String,
}

/// Outcome of a finalized transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionReceipt {
    /// Transaction hash.
    pub hash: String,
    /// Block the transaction was included in.
    pub block_number: u64,
}

/// The contract write was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WriteError {
    /// The wallet or node rejected the call.
    #[error("write rejected: {0}")]
    Rejected(String),
}

/// The transaction did not finalize.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationError {
    /// Included but reverted.
    #[error("transaction {hash} reverted: {reason}")]
    Reverted {
        /// Transaction hash.
        hash: String,
        /// Revert reason.
        reason: String,
    },
    /// Never included.
    #[error("transaction {0} was dropped")]
    Dropped(String),
}

/// Issues contract writes.
#[async_trait]
pub trait ContractWriter: Send + Sync {
    /// Submit `call`. Returns once the write is accepted for processing.
    async fn write(&self, call: ContractCall) -> Result<PendingTransaction, WriteError>;
}

/// Waits for a pending transaction to settle.
#[async_trait]
pub trait ConfirmationWaiter: Send + Sync {
    /// Wait for `pending` to finalize.
    async fn wait(&self, pending: &PendingTransaction)
        -> Result<TransactionReceipt, ConfirmationError>;
}

// ─── Notifications ──────────────────────────────────────────────────

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    /// Progress or success.
    Info,
    /// Completed with reduced guarantees.
    Warning,
    /// The submission failed.
    Error,
}

/// A user-facing notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    /// Severity.
    pub level: NotificationLevel,
    /// Message text.
    pub message: String,
}

impl Notification {
    /// Info-level notification.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    /// Warning-level notification.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Warning,
            message: message.into(),
        }
    }

    /// Error-level notification.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Receives user-facing notifications.
pub trait Notifier: Send + Sync {
    /// Deliver one notification. Must not block.
    fn notify(&self, notification: Notification);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_serialization() {
        let call = ContractCall {
            operation: ContractOperation::AddLiquidity,
            args: vec![ContractArg::Uint(2), ContractArg::Bytes("abc".into())],
            value: Some(10_000_000_000_000_000_000),
        };
        let json = serde_json::to_value(&call).unwrap();
        assert_eq!(json["operation"], "addLiquidity");
        assert_eq!(json["args"][0]["type"], "uint");
        assert_eq!(json["args"][0]["value"], 2);
        assert_eq!(json["value"], "10000000000000000000");
    }

    #[test]
    fn test_call_without_value_omits_field() {
        let call = ContractCall {
            operation: ContractOperation::CreateLoan,
            args: vec![],
            value: None,
        };
        let json = serde_json::to_value(&call).unwrap();
        assert!(json.get("value").is_none());
    }

    #[test]
    fn test_notification_levels() {
        assert_eq!(Notification::info("a").level, NotificationLevel::Info);
        assert_eq!(Notification::warning("b").level, NotificationLevel::Warning);
        assert_eq!(Notification::error("c").level, NotificationLevel::Error);
    }
}
