//! # cipherlend-submit — Submission Orchestrator
//!
//! Drives one confidential submission from request to confirmed
//! transaction:
//!
//! 1. Require a connected account and validate the request.
//! 2. **Encrypting**: encrypt and prove every field, validating each proof
//!    against the freshness window.
//! 3. Combine the per-field proofs into one encoded record.
//! 4. **Submitting**: hand the combined record and the envelope inputs to
//!    the [`ContractWriter`].
//! 5. **Confirming**: wait on the [`ConfirmationWaiter`] for that write.
//!
//! Every transition is recorded in the caller's
//! [`SubmissionState`](cipherlend_state::SubmissionState) and announced to
//! the [`Notifier`].
//!
//! ## Collaborators
//!
//! The chain side lives behind `Send + Sync` traits in `collaborators.rs`.
//! `mock.rs` provides in-process implementations used by the tests and by
//! the CLI dry-run commands.
//!
//! ## Crate Policy
//!
//! - The orchestrator holds no per-call state. Each call borrows its own
//!   `SubmissionState`, so concurrent calls never share storage.
//! - Every error that reaches the caller has first moved the state to
//!   `Failed` with a recorded reason.

pub mod collaborators;
pub mod config;
pub mod error;
pub mod mock;
pub mod orchestrator;
pub mod payload;
pub mod request;

pub use collaborators::{
    AccountContext, ConfirmationError, ConfirmationWaiter, ContractArg, ContractCall,
    ContractOperation, ContractWriter, Notification, NotificationLevel, Notifier,
    PendingTransaction, TransactionReceipt, WriteError,
};
pub use config::{ConfigError, PipelineConfig};
pub use error::SubmitError;
pub use mock::{
    MockConfirmationWaiter, MockContractWriter, RecordingNotifier, StaticAccount, TracingNotifier,
};
pub use orchestrator::{Collaborators, SubmissionOperation, SubmissionOrchestrator, SubmissionReceipt};
pub use payload::{AssessmentProofs, LiquidityProof, LoanProof, RiskAssessmentRecord};
pub use request::{LiquidityRequest, LoanRequest, RiskAssessmentRequest, SubmissionRequest};
