//! # Submission Errors
//!
//! Every variant maps to exactly one [`FailureReason`], which is what the
//! orchestrator records in the caller's state.

use cipherlend_core::CoreError;
use cipherlend_envelope::{CodecError, EnvelopeError};
use cipherlend_state::{FailureReason, StateError};
use thiserror::Error;

use crate::collaborators::{ConfirmationError, WriteError};

/// Error returned by the orchestrator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SubmitError {
    /// No connected account.
    #[error("not authenticated: connect an account first")]
    NotAuthenticated,

    /// A request field or derived value is unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An encoded record could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// The contract write was rejected.
    #[error(transparent)]
    WriteRejected(#[from] WriteError),

    /// The transaction did not finalize.
    #[error(transparent)]
    ConfirmationFailed(#[from] ConfirmationError),

    /// A field proof was outside the freshness window.
    #[error("proof expired: age {age_ms} ms exceeds window of {window_ms} ms")]
    ProofExpired {
        /// Age of the proof when it was checked.
        age_ms: i64,
        /// Configured freshness window.
        window_ms: u64,
    },

    /// The state machine refused a transition.
    #[error("state error: {0}")]
    State(#[from] StateError),
}

impl SubmitError {
    /// The reason recorded in the submission state.
    pub fn reason(&self) -> FailureReason {
        match self {
            Self::NotAuthenticated => FailureReason::NotAuthenticated,
            Self::InvalidInput(_) | Self::State(_) => FailureReason::InvalidInput,
            Self::Decode(_) => FailureReason::DecodeError,
            Self::WriteRejected(_) => FailureReason::WriteRejected,
            Self::ConfirmationFailed(_) => FailureReason::ConfirmationFailed,
            Self::ProofExpired { .. } => FailureReason::ProofExpired,
        }
    }
}

impl From<EnvelopeError> for SubmitError {
    fn from(err: EnvelopeError) -> Self {
        match err {
            EnvelopeError::Codec(e) => Self::Decode(e.to_string()),
            EnvelopeError::ProofExpired { age_ms, window_ms } => {
                Self::ProofExpired { age_ms, window_ms }
            }
            other => Self::InvalidInput(other.to_string()),
        }
    }
}

impl From<CodecError> for SubmitError {
    fn from(err: CodecError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<CoreError> for SubmitError {
    fn from(err: CoreError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_mapping() {
        assert_eq!(
            SubmitError::NotAuthenticated.reason(),
            FailureReason::NotAuthenticated
        );
        assert_eq!(
            SubmitError::from(WriteError::Rejected("denied".into())).reason(),
            FailureReason::WriteRejected
        );
        assert_eq!(
            SubmitError::from(ConfirmationError::Dropped("0x1".into())).reason(),
            FailureReason::ConfirmationFailed
        );
    }

    #[test]
    fn test_envelope_error_mapping() {
        let decode = SubmitError::from(EnvelopeError::Codec(CodecError::MissingVersion));
        assert_eq!(decode.reason(), FailureReason::DecodeError);

        let expired = SubmitError::from(EnvelopeError::ProofExpired {
            age_ms: 301_000,
            window_ms: 300_000,
        });
        assert_eq!(
            expired,
            SubmitError::ProofExpired {
                age_ms: 301_000,
                window_ms: 300_000
            }
        );

        let invalid = SubmitError::from(EnvelopeError::InvalidProof("mismatch".into()));
        assert_eq!(invalid.reason(), FailureReason::InvalidInput);
    }
}
