//! # cipherlend-state — Submission State Machine
//!
//! Tracks one submission call through its phases:
//!
//! ```text
//! Idle → Encrypting → Submitting → Confirming → Succeeded
//!   │        │            │             │
//!   └────────┴────────────┴─────────────┴──────→ Failed
//! ```
//!
//! `Encrypting → Succeeded` is also allowed for operations that end
//! locally without a contract write (risk assessment).
//!
//! ## Design
//!
//! The phase is only ever changed through
//! [`SubmissionState::try_transition()`] or [`SubmissionState::fail()`],
//! which check the edge against the table above and append a
//! [`TransitionRecord`]. The derived flags `is_encrypting()` and
//! `is_submitting()` are computed from the phase, so a terminal phase can
//! never leave an in-progress flag set.
//!
//! Each call owns its own `SubmissionState`; nothing here is shared
//! between concurrent submissions.

pub mod submission;

pub use submission::{
    FailureReason, StateError, SubmissionPhase, SubmissionState, TransitionRecord,
};
