//! # Domain Services
//!
//! - [`CooldownPolicy`]: per-address claim window
//! - [`Clock`]: injectable time source

pub mod clock;
pub mod cooldown;

pub use clock::{Clock, ManualClock, SystemClock};
pub use cooldown::{ClaimAdmission, CooldownPolicy, remaining_minutes};
