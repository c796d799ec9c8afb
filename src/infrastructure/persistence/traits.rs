//! # Repository Traits
//!
//! Port definitions for persistence abstraction.
//!
//! The faucet keeps one piece of state: when each address last received
//! funds, plus whether a claim for it is currently underway. The
//! [`CooldownStore`] port hides where that lives; the bundled
//! implementation is in-memory.
//!
//! # Examples
//!
//! ```ignore
//! use rupx_faucet::infrastructure::persistence::traits::CooldownStore;
//!
//! async fn reserve(store: &impl CooldownStore, address: &WalletAddress) {
//!     let admission = store
//!         .begin_claim(address, Timestamp::now(), &CooldownPolicy::default())
//!         .await?;
//!     if admission.is_admitted() {
//!         // send funds, then complete_claim or abort_claim
//!     }
//! }
//! ```

use crate::domain::services::{ClaimAdmission, CooldownPolicy};
use crate::domain::value_objects::{Timestamp, WalletAddress};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No reservation exists for the address being completed.
    #[error("No claim in progress for {address}")]
    NotReserved {
        /// Address the completion was attempted for.
        address: String,
    },

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a not-reserved error.
    #[must_use]
    pub fn not_reserved(address: &WalletAddress) -> Self {
        Self::NotReserved {
            address: address.to_string(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this is a not-reserved error.
    #[must_use]
    pub fn is_not_reserved(&self) -> bool {
        matches!(self, Self::NotReserved { .. })
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Store of per-address claim history.
///
/// Addresses are compared case-insensitively. `begin_claim` is the only
/// admission point: the check and the reservation happen as one step, so
/// two concurrent requests for the same address can never both be
/// admitted.
#[async_trait]
pub trait CooldownStore: Send + Sync + fmt::Debug {
    /// Evaluates `address` against `policy` at `now` and, if admitted,
    /// marks a claim as in flight for it.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read or written.
    async fn begin_claim(
        &self,
        address: &WalletAddress,
        now: Timestamp,
        policy: &CooldownPolicy,
    ) -> RepositoryResult<ClaimAdmission>;

    /// Records a successful claim at `claimed_at` and releases the
    /// reservation.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotReserved` if no claim was in flight
    /// for `address`.
    async fn complete_claim(
        &self,
        address: &WalletAddress,
        claimed_at: Timestamp,
    ) -> RepositoryResult<()>;

    /// Releases the reservation without recording a claim. The previous
    /// last-claim time, if any, is kept.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    async fn abort_claim(&self, address: &WalletAddress) -> RepositoryResult<()>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn not_reserved_names_the_address() {
        let address: WalletAddress = "0x18e5b3dee30232cb8a83e4883e17df34d79e7296".parse().unwrap();
        let err = RepositoryError::not_reserved(&address);
        assert!(err.is_not_reserved());
        assert!(err.to_string().contains("0x18e5b3dee30232CB8a83e4883E17df34d79E7296"));
    }

    #[test]
    fn constructors() {
        assert!(matches!(
            RepositoryError::connection("down"),
            RepositoryError::Connection(_)
        ));
        assert_eq!(RepositoryError::internal("x").to_string(), "Internal error: x");
    }
}
