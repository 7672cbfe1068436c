//! # Temporal Types — Millisecond UTC Timestamps
//!
//! `Timestamp` is a UTC instant truncated to millisecond precision. On the
//! wire it is a bare integer of Unix epoch milliseconds, the same unit the
//! encoded envelope and proof records have always carried.
//!
//! ## Invariant
//!
//! Sub-millisecond components are discarded at construction, so a timestamp
//! survives a serialize/deserialize cycle unchanged. Proof freshness is
//! measured as the difference of two `Timestamp`s in milliseconds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// A UTC timestamp with millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Current UTC time, truncated to milliseconds.
    pub fn now() -> Self {
        Self::from_utc(Utc::now())
    }

    /// Create a timestamp from a `chrono::DateTime<Utc>`, truncating
    /// sub-millisecond components.
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        let millis = dt.timestamp_millis();
        Self(DateTime::from_timestamp_millis(millis).unwrap_or(dt))
    }

    /// Create a timestamp from Unix epoch milliseconds.
    pub fn from_epoch_millis(millis: i64) -> Result<Self, CoreError> {
        DateTime::from_timestamp_millis(millis)
            .map(Self)
            .ok_or_else(|| CoreError::InvalidTimestamp(format!("epoch millis out of range: {millis}")))
    }

    /// Unix epoch milliseconds.
    pub fn epoch_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Access the inner `DateTime<Utc>`.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// The timestamp `millis` milliseconds before this one.
    ///
    /// Saturates at the earliest representable instant.
    pub fn minus_millis(&self, millis: i64) -> Self {
        let target = self.epoch_millis().saturating_sub(millis);
        Self::from_epoch_millis(target).unwrap_or(*self)
    }

    /// Milliseconds elapsed from `earlier` to `self`. Negative when
    /// `earlier` lies in the future.
    pub fn millis_since(&self, earlier: &Timestamp) -> i64 {
        self.epoch_millis().saturating_sub(earlier.epoch_millis())
    }

    /// Render as RFC 3339 with millisecond precision and `Z` suffix.
    pub fn to_rfc3339(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.epoch_millis())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let millis = i64::deserialize(deserializer)?;
        Self::from_epoch_millis(millis).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_from_utc_truncates_to_millis() {
        let dt = Utc.with_ymd_and_hms(2026, 1, 15, 12, 30, 45).unwrap();
        let dt = dt.with_nanosecond(123_456_789).unwrap();
        let ts = Timestamp::from_utc(dt);
        assert_eq!(ts.as_datetime().nanosecond(), 123_000_000);
        assert_eq!(ts.to_rfc3339(), "2026-01-15T12:30:45.123Z");
    }

    #[test]
    fn test_epoch_millis_roundtrip() {
        let ts = Timestamp::from_epoch_millis(1_760_000_000_123).unwrap();
        assert_eq!(ts.epoch_millis(), 1_760_000_000_123);
    }

    #[test]
    fn test_serializes_as_integer_millis() {
        let ts = Timestamp::from_epoch_millis(1_700_000_000_001).unwrap();
        assert_eq!(serde_json::to_string(&ts).unwrap(), "1700000000001");
        let parsed: Timestamp = serde_json::from_str("1700000000001").unwrap();
        assert_eq!(parsed, ts);
    }

    #[test]
    fn test_rejects_non_integer_wire_value() {
        assert!(serde_json::from_str::<Timestamp>("\"2026-01-01\"").is_err());
    }

    #[test]
    fn test_minus_and_since() {
        let now = Timestamp::from_epoch_millis(1_000_000).unwrap();
        let earlier = now.minus_millis(301_000);
        assert_eq!(now.millis_since(&earlier), 301_000);
        assert_eq!(earlier.millis_since(&now), -301_000);
    }

    #[test]
    fn test_ordering() {
        let a = Timestamp::from_epoch_millis(10).unwrap();
        let b = Timestamp::from_epoch_millis(11).unwrap();
        assert!(a < b);
    }

    #[test]
    fn test_now_roundtrips_through_json() {
        let ts = Timestamp::now();
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
    }
}
