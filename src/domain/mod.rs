//! # Domain Layer
//!
//! Claim rules independent of HTTP, RPC and storage.
//!
//! - [`entities`]: claim request, receipt and claimant record
//! - [`value_objects`]: timestamps and wallet addresses
//! - [`services`]: cooldown policy and clock
//! - [`errors`]: validation errors

pub mod entities;
pub mod errors;
pub mod services;
pub mod value_objects;

pub use errors::{DomainError, DomainResult};
