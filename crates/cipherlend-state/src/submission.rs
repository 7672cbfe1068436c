//! # Submission State
//!
//! Runtime-checked phase machine for one submission call, with an
//! append-only transition log and an optional `watch` channel for callers
//! that render progress.

use cipherlend_core::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::watch;

/// Phase of a submission call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionPhase {
    /// No work in progress.
    #[default]
    Idle,
    /// Fields are being encrypted and proven.
    Encrypting,
    /// The contract write has been issued.
    Submitting,
    /// The write was accepted; waiting for confirmation.
    Confirming,
    /// Terminal: the submission completed.
    Succeeded,
    /// Terminal: the submission stopped with a recorded reason.
    Failed,
}

impl SubmissionPhase {
    /// Returns the canonical phase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Encrypting => "ENCRYPTING",
            Self::Submitting => "SUBMITTING",
            Self::Confirming => "CONFIRMING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
        }
    }

    /// Whether this is a terminal phase.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl std::fmt::Display for SubmissionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Why a submission ended in `Failed`.
///
/// A missing cryptographic primitive is not listed: it is recovered by the
/// fallback envelope path and never fails a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    /// No connected account.
    NotAuthenticated,
    /// A required field is missing, zero or otherwise unusable.
    InvalidInput,
    /// An encoded record could not be decoded.
    DecodeError,
    /// The contract write was rejected.
    WriteRejected,
    /// The transaction did not finalize.
    ConfirmationFailed,
    /// A proof was older than the freshness window.
    ProofExpired,
}

impl FailureReason {
    /// Returns the canonical reason name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NotAuthenticated => "NOT_AUTHENTICATED",
            Self::InvalidInput => "INVALID_INPUT",
            Self::DecodeError => "DECODE_ERROR",
            Self::WriteRejected => "WRITE_REJECTED",
            Self::ConfirmationFailed => "CONFIRMATION_FAILED",
            Self::ProofExpired => "PROOF_EXPIRED",
        }
    }
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Record of a phase transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Phase before the transition.
    pub from_phase: SubmissionPhase,
    /// Phase after the transition.
    pub to_phase: SubmissionPhase,
    /// When the transition happened.
    pub timestamp: Timestamp,
    /// Optional human-readable reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Errors from the submission state machine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Attempted transition is not allowed.
    #[error("invalid submission transition: {from} -> {to}")]
    InvalidTransition {
        /// Current phase.
        from: SubmissionPhase,
        /// Requested phase.
        to: SubmissionPhase,
    },
}

/// Per-call submission state.
#[derive(Debug, Default, Serialize)]
pub struct SubmissionState {
    phase: SubmissionPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_reason: Option<FailureReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_detail: Option<String>,
    transition_log: Vec<TransitionRecord>,
    #[serde(skip)]
    observer: Option<watch::Sender<SubmissionPhase>>,
}

impl SubmissionState {
    /// A fresh `Idle` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh state plus a receiver that sees every phase change.
    pub fn with_observer() -> (Self, watch::Receiver<SubmissionPhase>) {
        let (tx, rx) = watch::channel(SubmissionPhase::Idle);
        let state = Self {
            observer: Some(tx),
            ..Self::default()
        };
        (state, rx)
    }

    /// Reset to `Idle` for the next request, clearing the error and the log.
    pub fn begin(&mut self) {
        self.phase = SubmissionPhase::Idle;
        self.error_reason = None;
        self.error_detail = None;
        self.transition_log.clear();
        self.publish();
    }

    /// Current phase.
    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    /// Reason recorded by the last failure, if any.
    pub fn error_reason(&self) -> Option<FailureReason> {
        self.error_reason
    }

    /// Detail recorded by the last failure, if any.
    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    /// All transitions since the last [`begin`](Self::begin).
    pub fn transition_log(&self) -> &[TransitionRecord] {
        &self.transition_log
    }

    /// `true` while fields are being encrypted.
    pub fn is_encrypting(&self) -> bool {
        self.phase == SubmissionPhase::Encrypting
    }

    /// `true` from the contract write until confirmation settles.
    pub fn is_submitting(&self) -> bool {
        matches!(
            self.phase,
            SubmissionPhase::Submitting | SubmissionPhase::Confirming
        )
    }

    /// `true` once the call has reached a terminal phase.
    pub fn is_settled(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Attempt a phase transition with runtime validation.
    ///
    /// Returns an error if the edge is not allowed; the state is unchanged.
    pub fn try_transition(
        &mut self,
        to: SubmissionPhase,
        reason: Option<String>,
    ) -> Result<(), StateError> {
        use SubmissionPhase::*;

        let valid = matches!(
            (self.phase, to),
            (Idle, Encrypting)
                | (Idle, Failed)
                | (Encrypting, Submitting)
                | (Encrypting, Succeeded)
                | (Encrypting, Failed)
                | (Submitting, Confirming)
                | (Submitting, Failed)
                | (Confirming, Succeeded)
                | (Confirming, Failed)
        );

        if !valid {
            return Err(StateError::InvalidTransition {
                from: self.phase,
                to,
            });
        }

        tracing::debug!(from = %self.phase, to = %to, "submission transition");
        self.transition_log.push(TransitionRecord {
            from_phase: self.phase,
            to_phase: to,
            timestamp: Timestamp::now(),
            reason,
        });
        self.phase = to;
        self.publish();
        Ok(())
    }

    /// Move to `Failed`, recording `reason` and `detail`.
    pub fn fail(
        &mut self,
        reason: FailureReason,
        detail: impl Into<String>,
    ) -> Result<(), StateError> {
        let detail = detail.into();
        self.try_transition(SubmissionPhase::Failed, Some(format!("{reason}: {detail}")))?;
        self.error_reason = Some(reason);
        self.error_detail = Some(detail);
        Ok(())
    }

    fn publish(&self) {
        if let Some(tx) = &self.observer {
            // A dropped receiver is fine; the state still advances.
            let _ = tx.send(self.phase);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use SubmissionPhase::*;

    fn drive(state: &mut SubmissionState, phases: &[SubmissionPhase]) {
        for phase in phases {
            state.try_transition(*phase, None).unwrap();
        }
    }

    // ── Happy paths ─────────────────────────────────────────────────

    #[test]
    fn test_full_write_path() {
        let mut state = SubmissionState::new();
        drive(&mut state, &[Encrypting, Submitting, Confirming, Succeeded]);
        assert_eq!(state.phase(), Succeeded);
        assert_eq!(state.transition_log().len(), 4);
        assert_eq!(state.transition_log()[0].from_phase, Idle);
        assert_eq!(state.transition_log()[3].to_phase, Succeeded);
        assert!(state.is_settled());
    }

    #[test]
    fn test_local_only_path() {
        let mut state = SubmissionState::new();
        drive(&mut state, &[Encrypting, Succeeded]);
        assert_eq!(state.phase(), Succeeded);
    }

    // ── Derived flags ───────────────────────────────────────────────

    #[test]
    fn test_flags_follow_phase() {
        let mut state = SubmissionState::new();
        assert!(!state.is_encrypting() && !state.is_submitting());

        state.try_transition(Encrypting, None).unwrap();
        assert!(state.is_encrypting());
        assert!(!state.is_submitting());

        state.try_transition(Submitting, None).unwrap();
        assert!(!state.is_encrypting());
        assert!(state.is_submitting());

        state.try_transition(Confirming, None).unwrap();
        assert!(state.is_submitting());

        state.fail(FailureReason::ConfirmationFailed, "reverted").unwrap();
        assert!(!state.is_encrypting());
        assert!(!state.is_submitting());
    }

    // ── Failure ─────────────────────────────────────────────────────

    #[test]
    fn test_fail_records_reason() {
        let mut state = SubmissionState::new();
        state.fail(FailureReason::NotAuthenticated, "no account").unwrap();
        assert_eq!(state.phase(), Failed);
        assert_eq!(state.error_reason(), Some(FailureReason::NotAuthenticated));
        assert_eq!(state.error_detail(), Some("no account"));
        assert_eq!(
            state.transition_log()[0].reason.as_deref(),
            Some("NOT_AUTHENTICATED: no account")
        );
    }

    #[test]
    fn test_terminal_phases_reject_transitions() {
        let mut state = SubmissionState::new();
        drive(&mut state, &[Encrypting, Succeeded]);
        assert!(state.try_transition(Failed, None).is_err());

        let mut state = SubmissionState::new();
        state.fail(FailureReason::InvalidInput, "zero").unwrap();
        assert!(state.fail(FailureReason::InvalidInput, "again").is_err());
        assert_eq!(state.error_detail(), Some("zero"));
    }

    #[test]
    fn test_skipping_phases_rejected() {
        let mut state = SubmissionState::new();
        let err = state.try_transition(Submitting, None).unwrap_err();
        assert_eq!(
            err,
            StateError::InvalidTransition {
                from: Idle,
                to: Submitting
            }
        );
        assert_eq!(state.phase(), Idle);
        assert!(state.transition_log().is_empty());

        drive(&mut state, &[Encrypting]);
        assert!(state.try_transition(Confirming, None).is_err());
        assert!(state.try_transition(Idle, None).is_err());
    }

    // ── Reset ───────────────────────────────────────────────────────

    #[test]
    fn test_begin_resets() {
        let mut state = SubmissionState::new();
        state.fail(FailureReason::WriteRejected, "nope").unwrap();
        state.begin();
        assert_eq!(state.phase(), Idle);
        assert!(state.error_reason().is_none());
        assert!(state.transition_log().is_empty());
        assert!(state.try_transition(Encrypting, None).is_ok());
    }

    // ── Observation ─────────────────────────────────────────────────

    #[test]
    fn test_observer_sees_latest_phase() {
        let (mut state, rx) = SubmissionState::with_observer();
        assert_eq!(*rx.borrow(), Idle);
        drive(&mut state, &[Encrypting, Submitting]);
        assert_eq!(*rx.borrow(), Submitting);
    }

    #[test]
    fn test_dropped_observer_does_not_block() {
        let (mut state, rx) = SubmissionState::with_observer();
        drop(rx);
        drive(&mut state, &[Encrypting, Succeeded]);
        assert_eq!(state.phase(), Succeeded);
    }

    // ── Serde ───────────────────────────────────────────────────────

    #[test]
    fn test_serialization() {
        assert_eq!(serde_json::to_string(&Confirming).unwrap(), "\"CONFIRMING\"");
        assert_eq!(
            serde_json::to_string(&FailureReason::ProofExpired).unwrap(),
            "\"PROOF_EXPIRED\""
        );
        let mut state = SubmissionState::new();
        state.fail(FailureReason::DecodeError, "bad").unwrap();
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["phase"], "FAILED");
        assert_eq!(json["error_reason"], "DECODE_ERROR");
        assert_eq!(json["transition_log"].as_array().unwrap().len(), 1);
    }
}
