//! # Cooldown Policy
//!
//! Decides whether a claimant may claim again, and how long they must wait
//! otherwise.
//!
//! # Examples
//!
//! ```
//! use rupx_faucet::domain::services::cooldown::{ClaimAdmission, CooldownPolicy};
//! use rupx_faucet::domain::entities::ClaimantRecord;
//! use rupx_faucet::domain::value_objects::Timestamp;
//! use std::time::Duration;
//!
//! let policy = CooldownPolicy::new(Duration::from_secs(12 * 60 * 60));
//! let claimed = Timestamp::from_millis(1_704_067_200_000).unwrap();
//! let record = ClaimantRecord { last_claim: Some(claimed), in_flight: false };
//!
//! let admission = policy.admit(&record, &claimed.add_millis(60_000));
//! assert_eq!(admission.remaining_minutes(), Some(719));
//! ```

use crate::domain::entities::ClaimantRecord;
use crate::domain::value_objects::Timestamp;
use std::time::Duration;

/// Milliseconds per minute, the unit of the wait time shown to callers.
pub const MILLIS_PER_MINUTE: u64 = 60_000;

/// Rounds a remaining wait up to whole minutes.
#[must_use]
pub const fn remaining_minutes(remaining_ms: u64) -> u64 {
    remaining_ms.div_ceil(MILLIS_PER_MINUTE)
}

/// Result of asking whether a claimant may claim now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimAdmission {
    /// No claim within the window and nothing in flight.
    Admitted,
    /// Last claim is still within the window.
    CoolingDown {
        /// Time left until the window closes.
        remaining_ms: u64,
    },
    /// Another claim for the same address has been reserved and not yet
    /// completed or aborted.
    InFlight,
}

impl ClaimAdmission {
    /// Returns true if the claim may proceed.
    #[must_use]
    pub const fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted)
    }

    /// Whole minutes left for a cooling-down claimant.
    #[must_use]
    pub const fn remaining_minutes(&self) -> Option<u64> {
        match self {
            Self::CoolingDown { remaining_ms } => Some(remaining_minutes(*remaining_ms)),
            _ => None,
        }
    }
}

/// Fixed-window cooldown between successful claims.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownPolicy {
    window_ms: u64,
}

impl CooldownPolicy {
    /// Default window: 12 hours.
    pub const DEFAULT_WINDOW: Duration = Duration::from_secs(12 * 60 * 60);

    /// Creates a policy with the given window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window_ms: u64::try_from(window.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Returns the window length.
    #[must_use]
    pub const fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }

    /// Time left in the window opened by `last_claim`, or `None` once it
    /// has closed.
    ///
    /// A clock that stepped backwards never yields more than one full
    /// window.
    #[must_use]
    pub fn remaining_ms(&self, last_claim: &Timestamp, now: &Timestamp) -> Option<u64> {
        let elapsed = now.millis_since(last_claim);
        let window = i64::try_from(self.window_ms).unwrap_or(i64::MAX);
        if elapsed >= window {
            return None;
        }
        let remaining = window.saturating_sub(elapsed.max(0));
        u64::try_from(remaining).ok()
    }

    /// Evaluates a claimant record at `now`.
    #[must_use]
    pub fn admit(&self, record: &ClaimantRecord, now: &Timestamp) -> ClaimAdmission {
        if record.in_flight {
            return ClaimAdmission::InFlight;
        }
        match record
            .last_claim
            .and_then(|last| self.remaining_ms(&last, now))
        {
            Some(remaining_ms) => ClaimAdmission::CoolingDown { remaining_ms },
            None => ClaimAdmission::Admitted,
        }
    }
}

impl Default for CooldownPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_WINDOW)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn claimed_at(millis: i64) -> ClaimantRecord {
        ClaimantRecord {
            last_claim: Some(Timestamp::from_millis(millis).unwrap()),
            in_flight: false,
        }
    }

    #[test]
    fn default_window_is_twelve_hours() {
        assert_eq!(
            CooldownPolicy::default().window(),
            Duration::from_secs(43_200)
        );
    }

    #[test]
    fn first_claim_is_admitted() {
        let policy = CooldownPolicy::default();
        let admission = policy.admit(&ClaimantRecord::default(), &Timestamp::now());
        assert!(admission.is_admitted());
    }

    #[test]
    fn one_millisecond_before_expiry_waits_one_minute() {
        let policy = CooldownPolicy::default();
        let t = 1_704_067_200_000;
        let window = policy.window().as_millis() as i64;
        let now = Timestamp::from_millis(t + window - 1).unwrap();

        let admission = policy.admit(&claimed_at(t), &now);
        assert_eq!(admission, ClaimAdmission::CoolingDown { remaining_ms: 1 });
        assert_eq!(admission.remaining_minutes(), Some(1));
    }

    #[test]
    fn admitted_exactly_at_expiry() {
        let policy = CooldownPolicy::default();
        let t = 1_704_067_200_000;
        let window = policy.window().as_millis() as i64;
        let now = Timestamp::from_millis(t + window).unwrap();

        assert!(policy.admit(&claimed_at(t), &now).is_admitted());
    }

    #[test]
    fn immediate_repeat_waits_full_window() {
        let policy = CooldownPolicy::default();
        let t = 1_704_067_200_000;
        let admission = policy.admit(&claimed_at(t), &Timestamp::from_millis(t).unwrap());
        assert_eq!(admission.remaining_minutes(), Some(720));
    }

    #[test]
    fn backwards_clock_is_capped_at_one_window() {
        let policy = CooldownPolicy::new(Duration::from_secs(60));
        let t = 1_704_067_200_000;
        let earlier = Timestamp::from_millis(t - 30_000).unwrap();
        let remaining = policy
            .remaining_ms(&Timestamp::from_millis(t).unwrap(), &earlier)
            .unwrap();
        assert_eq!(remaining, 60_000);
    }

    #[test]
    fn in_flight_takes_precedence() {
        let policy = CooldownPolicy::default();
        let record = ClaimantRecord {
            last_claim: None,
            in_flight: true,
        };
        assert_eq!(
            policy.admit(&record, &Timestamp::now()),
            ClaimAdmission::InFlight
        );
    }

    #[test]
    fn remaining_minutes_rounds_up() {
        assert_eq!(remaining_minutes(0), 0);
        assert_eq!(remaining_minutes(1), 1);
        assert_eq!(remaining_minutes(60_000), 1);
        assert_eq!(remaining_minutes(60_001), 2);
        assert_eq!(remaining_minutes(43_200_000), 720);
    }

    proptest! {
        #[test]
        fn remaining_minutes_stays_within_window(elapsed in 0i64..43_200_000) {
            let policy = CooldownPolicy::default();
            let t = 1_704_067_200_000;
            let now = Timestamp::from_millis(t + elapsed).unwrap();
            let minutes = policy.admit(&claimed_at(t), &now).remaining_minutes().unwrap();
            prop_assert!((1..=720).contains(&minutes));
        }

        #[test]
        fn remaining_minutes_is_ceiling(ms in 0u64..u64::MAX / 2) {
            let minutes = remaining_minutes(ms);
            prop_assert!(minutes * MILLIS_PER_MINUTE >= ms);
            prop_assert!(minutes == 0 || (minutes - 1) * MILLIS_PER_MINUTE < ms);
        }
    }
}
