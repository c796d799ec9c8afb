//! # Entities
//!
//! - [`ClaimRequest`] / [`ValidatedClaim`]: inbound claim
//! - [`ClaimReceipt`]: confirmed disbursement
//! - [`ClaimantRecord`]: cooldown bookkeeping per address

pub mod claim;

pub use claim::{ClaimReceipt, ClaimRequest, ClaimantRecord, ValidatedClaim};
