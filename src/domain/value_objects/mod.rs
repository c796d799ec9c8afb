//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! - [`Timestamp`]: millisecond UTC instant
//! - [`WalletAddress`]: validated EVM address

pub mod timestamp;
pub mod wallet_address;

pub use timestamp::Timestamp;
pub use wallet_address::WalletAddress;
