//! # Clock
//!
//! Source of "now" for cooldown decisions. The claim service reads time
//! only through [`Clock`] so tests can pin it.

use crate::domain::value_objects::Timestamp;
use parking_lot::Mutex;
use std::fmt;

/// Provider of the current wall-clock time.
pub trait Clock: Send + Sync + fmt::Debug {
    /// Returns the current time.
    fn now(&self) -> Timestamp;
}

/// Clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Manually driven clock.
///
/// # Examples
///
/// ```
/// use rupx_faucet::domain::services::clock::{Clock, ManualClock};
/// use rupx_faucet::domain::value_objects::Timestamp;
///
/// let clock = ManualClock::new(Timestamp::from_millis(0).unwrap());
/// clock.advance_millis(1_500);
/// assert_eq!(clock.now().timestamp_millis(), 1_500);
/// ```
#[derive(Debug)]
pub struct ManualClock {
    current: Mutex<Timestamp>,
}

impl ManualClock {
    /// Creates a clock frozen at `start`.
    #[must_use]
    pub fn new(start: Timestamp) -> Self {
        Self {
            current: Mutex::new(start),
        }
    }

    /// Moves the clock forward (or backward, for negative values).
    pub fn advance_millis(&self, millis: i64) {
        let mut current = self.current.lock();
        *current = current.add_millis(millis);
    }

    /// Jumps to an absolute time.
    pub fn set(&self, to: Timestamp) {
        *self.current.lock() = to;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.current.lock()
    }
}
