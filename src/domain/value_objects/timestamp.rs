//! # Timestamp Value Object
//!
//! Millisecond wall-clock instants used for claim bookkeeping.
//!
//! # Examples
//!
//! ```
//! use rupx_faucet::domain::value_objects::timestamp::Timestamp;
//!
//! let claimed = Timestamp::from_millis(1_704_067_200_000).unwrap();
//! let later = claimed.add_millis(60_000);
//!
//! assert!(later.is_after(&claimed));
//! assert_eq!(later.millis_since(&claimed), 60_000);
//! ```

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// A UTC instant with millisecond precision.
///
/// Wraps `chrono::DateTime<Utc>`. Claim records and cooldown arithmetic
/// are expressed in Unix milliseconds, so every constructor and accessor
/// here speaks milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from Unix milliseconds.
    ///
    /// Returns `None` if the value is outside chrono's representable range.
    #[must_use]
    pub fn from_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Self)
    }

    /// Returns the Unix timestamp in milliseconds.
    #[inline]
    #[must_use]
    pub fn timestamp_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    /// Adds milliseconds to the timestamp (negative values move backwards).
    #[must_use]
    pub fn add_millis(&self, millis: i64) -> Self {
        Self(self.0 + Duration::milliseconds(millis))
    }

    /// Milliseconds elapsed from `earlier` to `self`.
    ///
    /// Negative when `earlier` is actually later, which happens if the
    /// wall clock steps backwards between two claims.
    #[must_use]
    pub fn millis_since(&self, earlier: &Self) -> i64 {
        self.timestamp_millis() - earlier.timestamp_millis()
    }

    /// Returns true if this timestamp is after another.
    #[inline]
    #[must_use]
    pub fn is_after(&self, other: &Self) -> bool {
        self.0 > other.0
    }

    /// Formats the timestamp as ISO 8601.
    #[must_use]
    pub fn to_iso8601(&self) -> String {
        self.0.to_rfc3339()
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

impl Add<std::time::Duration> for Timestamp {
    type Output = Self;

    fn add(self, rhs: std::time::Duration) -> Self::Output {
        Self(self.0 + Duration::from_std(rhs).unwrap_or(Duration::zero()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn now_creates_current_time() {
        let before = Utc::now();
        let ts = Timestamp::now();
        let after = Utc::now();

        assert!(ts.0 >= before);
        assert!(ts.0 <= after);
    }

    #[test]
    fn from_millis_roundtrips() {
        let ts = Timestamp::from_millis(1_704_067_200_123).unwrap();
        assert_eq!(ts.timestamp_millis(), 1_704_067_200_123);
    }

    #[test]
    fn add_millis_moves_both_ways() {
        let ts = Timestamp::from_millis(10_000).unwrap();
        assert_eq!(ts.add_millis(500).timestamp_millis(), 10_500);
        assert_eq!(ts.add_millis(-500).timestamp_millis(), 9_500);
    }

    #[test]
    fn millis_since_is_signed() {
        let earlier = Timestamp::from_millis(1_000).unwrap();
        let later = Timestamp::from_millis(4_000).unwrap();
        assert_eq!(later.millis_since(&earlier), 3_000);
        assert_eq!(earlier.millis_since(&later), -3_000);
    }

    #[test]
    fn std_duration_add() {
        let ts = Timestamp::from_millis(1_000).unwrap();
        let later = ts + std::time::Duration::from_secs(60);
        assert_eq!(later.timestamp_millis(), 61_000);
    }

    #[test]
    fn ordering_and_is_after() {
        let ts1 = Timestamp::from_millis(1_000).unwrap();
        let ts2 = Timestamp::from_millis(2_000).unwrap();
        assert!(ts1 < ts2);
        assert!(ts2.is_after(&ts1));
        assert!(!ts1.is_after(&ts2));
    }

    #[test]
    fn iso8601_format() {
        let ts = Timestamp::from_millis(1_704_067_200_000).unwrap();
        let iso = ts.to_iso8601();
        assert!(iso.starts_with("2024-01-01T00:00:00"));
        assert_eq!(ts.to_string(), iso);
    }
}
