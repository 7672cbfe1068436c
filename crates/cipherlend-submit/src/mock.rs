//! # In-Process Collaborators
//!
//! Implementations of the collaborator traits that never leave the
//! process. The CLI dry-run commands use them in place of a wallet and a
//! node; the tests script them to fail on demand.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use cipherlend_core::{AccountId, ContractAddress};
use parking_lot::Mutex;

use crate::collaborators::{
    AccountContext, ConfirmationError, ConfirmationWaiter, ContractCall, ContractWriter,
    Notification, NotificationLevel, Notifier, PendingTransaction, TransactionReceipt, WriteError,
};

// ─── StaticAccount ──────────────────────────────────────────────────

/// Fixed account and contract.
#[derive(Debug, Clone)]
pub struct StaticAccount {
    account: Option<AccountId>,
    contract: ContractAddress,
}

impl StaticAccount {
    /// Connected as `account`.
    pub fn connected(contract: ContractAddress, account: AccountId) -> Self {
        Self {
            account: Some(account),
            contract,
        }
    }

    /// No wallet connected.
    pub fn disconnected(contract: ContractAddress) -> Self {
        Self {
            account: None,
            contract,
        }
    }
}

impl AccountContext for StaticAccount {
    fn account_id(&self) -> Option<AccountId> {
        self.account.clone()
    }

    fn contract_address(&self) -> ContractAddress {
        self.contract.clone()
    }
}

// ─── MockContractWriter ─────────────────────────────────────────────

/// Accepts (or rejects) every write and records it.
///
/// Transaction hashes are sequential: `0x…01`, `0x…02`, ...
#[derive(Debug, Default)]
pub struct MockContractWriter {
    reject_with: Option<String>,
    calls: Mutex<Vec<ContractCall>>,
    next_tx: AtomicU64,
}

impl MockContractWriter {
    /// A writer that accepts every call.
    pub fn new() -> Self {
        Self::default()
    }

    /// A writer that rejects every call with `reason`.
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            reject_with: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Every call received so far, accepted or not.
    pub fn calls(&self) -> Vec<ContractCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl ContractWriter for MockContractWriter {
    async fn write(&self, call: ContractCall) -> Result<PendingTransaction, WriteError> {
        tracing::debug!(operation = %call.operation, args = call.args.len(), "mock write");
        self.calls.lock().push(call);
        if let Some(reason) = &self.reject_with {
            return Err(WriteError::Rejected(reason.clone()));
        }
        let n = self.next_tx.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(PendingTransaction {
            hash: format!("0x{n:064x}"),
        })
    }
}

// ─── MockConfirmationWaiter ─────────────────────────────────────────

/// Confirms (or reverts) every pending transaction immediately.
#[derive(Debug)]
pub struct MockConfirmationWaiter {
    revert_with: Option<String>,
    waited: Mutex<Vec<String>>,
    next_block: AtomicU64,
}

impl Default for MockConfirmationWaiter {
    fn default() -> Self {
        Self {
            revert_with: None,
            waited: Mutex::new(Vec::new()),
            next_block: AtomicU64::new(1),
        }
    }
}

impl MockConfirmationWaiter {
    /// A waiter that confirms every transaction.
    pub fn new() -> Self {
        Self::default()
    }

    /// A waiter that reports every transaction as reverted with `reason`.
    pub fn reverting(reason: impl Into<String>) -> Self {
        Self {
            revert_with: Some(reason.into()),
            ..Self::default()
        }
    }

    /// Hashes waited on so far.
    pub fn waited(&self) -> Vec<String> {
        self.waited.lock().clone()
    }
}

#[async_trait]
impl ConfirmationWaiter for MockConfirmationWaiter {
    async fn wait(
        &self,
        pending: &PendingTransaction,
    ) -> Result<TransactionReceipt, ConfirmationError> {
        self.waited.lock().push(pending.hash.clone());
        if let Some(reason) = &self.revert_with {
            return Err(ConfirmationError::Reverted {
                hash: pending.hash.clone(),
                reason: reason.clone(),
            });
        }
        Ok(TransactionReceipt {
            hash: pending.hash.clone(),
            block_number: self.next_block.fetch_add(1, Ordering::SeqCst),
        })
    }
}

// ─── Notifiers ──────────────────────────────────────────────────────

/// Keeps every notification in memory.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    /// An empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    /// All notifications received so far.
    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.lock().clone()
    }

    /// Notifications at `level`.
    pub fn at_level(&self, level: NotificationLevel) -> Vec<Notification> {
        self.notifications
            .lock()
            .iter()
            .filter(|n| n.level == level)
            .cloned()
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().push(notification);
    }
}

/// Forwards notifications to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Info => tracing::info!(message = %notification.message, "notification"),
            NotificationLevel::Warning => {
                tracing::warn!(message = %notification.message, "notification")
            }
            NotificationLevel::Error => {
                tracing::error!(message = %notification.message, "notification")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::{ContractArg, ContractOperation};

    fn call() -> ContractCall {
        ContractCall {
            operation: ContractOperation::CreateLoan,
            args: vec![ContractArg::Uint(1)],
            value: None,
        }
    }

    #[tokio::test]
    async fn test_writer_issues_sequential_hashes() {
        let writer = MockContractWriter::new();
        let a = writer.write(call()).await.unwrap();
        let b = writer.write(call()).await.unwrap();
        assert_ne!(a.hash, b.hash);
        assert!(a.hash.starts_with("0x"));
        assert_eq!(a.hash.len(), 66);
        assert_eq!(writer.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_rejecting_writer_still_records() {
        let writer = MockContractWriter::rejecting("user denied");
        let err = writer.write(call()).await.unwrap_err();
        assert_eq!(err, WriteError::Rejected("user denied".into()));
        assert_eq!(writer.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_waiter_outcomes() {
        let pending = PendingTransaction { hash: "0x1".into() };
        let ok = MockConfirmationWaiter::new().wait(&pending).await.unwrap();
        assert_eq!(ok.block_number, 1);

        let waiter = MockConfirmationWaiter::reverting("out of gas");
        assert!(waiter.wait(&pending).await.is_err());
        assert_eq!(waiter.waited(), vec!["0x1".to_string()]);
    }

    #[test]
    fn test_static_account() {
        let contract = ContractAddress::new("0xc0ffee").unwrap();
        let connected =
            StaticAccount::connected(contract.clone(), AccountId::new("0xuser").unwrap());
        assert_eq!(connected.account_id().unwrap().as_str(), "0xuser");
        assert!(StaticAccount::disconnected(contract).account_id().is_none());
    }

    #[test]
    fn test_recording_notifier_filters() {
        let notifier = RecordingNotifier::new();
        notifier.notify(Notification::info("a"));
        notifier.notify(Notification::warning("b"));
        assert_eq!(notifier.notifications().len(), 2);
        assert_eq!(notifier.at_level(NotificationLevel::Warning).len(), 1);
    }
}
