//! # Application Services
//!
//! Use cases exposed to the HTTP layer.
//!
//! - [`ClaimService`]: CAPTCHA, cooldown, balance check and transfer
//! - [`BalanceService`]: faucet balance with source fallback

pub mod balance_service;
pub mod claim_service;

pub use balance_service::{
    BalancePreference, BalanceService, BalanceSource, ChainBalanceSource, ExplorerBalanceSource,
};
pub use claim_service::{ClaimService, ClaimSettings};
