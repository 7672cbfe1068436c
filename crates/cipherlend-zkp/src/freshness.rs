//! # Proof Freshness Window
//!
//! A proof is acceptable while `now - issued_at <= window`. The comparison
//! uses wall-clock milliseconds taken from the proof record, so a client
//! with a skewed clock can produce proofs that look fresher or older than
//! they are.

use cipherlend_core::Timestamp;
use serde::{Deserialize, Serialize};

use crate::traits::VerifyError;

/// Default freshness window: five minutes.
pub const DEFAULT_FRESHNESS_WINDOW_MS: u64 = 300_000;

/// Maximum accepted proof age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FreshnessWindow(u64);

impl FreshnessWindow {
    /// A window of `millis` milliseconds.
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// The window length in milliseconds.
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Check a proof issued at `issued_at` against `now`.
    ///
    /// Returns the proof age in milliseconds. A proof dated in the future
    /// has a negative age and is accepted.
    pub fn check(&self, issued_at: Timestamp, now: Timestamp) -> Result<i64, VerifyError> {
        let age_ms = now.millis_since(&issued_at);
        let window = i64::try_from(self.0).unwrap_or(i64::MAX);
        if age_ms > window {
            tracing::debug!(age_ms, window_ms = self.0, "proof outside freshness window");
            return Err(VerifyError::Expired {
                age_ms,
                window_ms: self.0,
            });
        }
        Ok(age_ms)
    }
}

impl Default for FreshnessWindow {
    fn default() -> Self {
        Self(DEFAULT_FRESHNESS_WINDOW_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> Timestamp {
        Timestamp::from_epoch_millis(1_760_000_000_000).unwrap()
    }

    #[test]
    fn test_default_is_five_minutes() {
        assert_eq!(FreshnessWindow::default().as_millis(), 300_000);
    }

    #[test]
    fn test_just_inside_window_accepted() {
        let now = now();
        let age = FreshnessWindow::default()
            .check(now.minus_millis(299_000), now)
            .unwrap();
        assert_eq!(age, 299_000);
    }

    #[test]
    fn test_just_outside_window_rejected() {
        let now = now();
        let err = FreshnessWindow::default()
            .check(now.minus_millis(301_000), now)
            .unwrap_err();
        assert_eq!(
            err,
            VerifyError::Expired {
                age_ms: 301_000,
                window_ms: 300_000
            }
        );
    }

    #[test]
    fn test_exact_boundary_accepted() {
        let now = now();
        assert!(FreshnessWindow::default()
            .check(now.minus_millis(300_000), now)
            .is_ok());
    }

    #[test]
    fn test_future_dated_accepted() {
        let now = now();
        let issued = Timestamp::from_epoch_millis(now.epoch_millis() + 5_000).unwrap();
        assert_eq!(FreshnessWindow::default().check(issued, now).unwrap(), -5_000);
    }

    #[test]
    fn test_custom_window() {
        let now = now();
        let window = FreshnessWindow::from_millis(1_000);
        assert!(window.check(now.minus_millis(1_001), now).is_err());
    }
}
