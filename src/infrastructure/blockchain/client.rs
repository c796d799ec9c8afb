//! # Blockchain Client Trait
//!
//! Port definition for the faucet's chain interactions.
//!
//! This module defines the [`BlockchainClient`] trait that the claim and
//! balance services depend on, along with the transaction types and the
//! error type shared by implementations.

use super::gas::GasPrice;
use crate::domain::value_objects::WalletAddress;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Transaction hash as a `0x`-prefixed hex string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl TxHash {
    /// Creates a new transaction hash.
    #[must_use]
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    /// Returns the hash as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TxHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Transaction receipt with confirmation details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// Transaction hash.
    pub tx_hash: TxHash,
    /// Block number where the transaction was included.
    pub block_number: u64,
    /// Gas used by the transaction.
    pub gas_used: u128,
    /// Effective gas price paid.
    pub effective_gas_price: u128,
    /// Whether the transaction succeeded.
    pub success: bool,
}

/// Error type for blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection error.
    #[error("connection error: {0}")]
    Connection(String),

    /// Transaction submission error.
    #[error("transaction error: {0}")]
    Transaction(String),

    /// Nonce error.
    #[error("nonce error: {0}")]
    Nonce(String),

    /// Timeout waiting for confirmation.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Node reports a different chain than configured.
    #[error("chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch {
        /// Configured chain ID.
        expected: u64,
        /// Chain ID reported by the node.
        actual: u64,
    },

    /// Signing key or other local setup is unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BlockchainError {
    /// Creates a connection error.
    #[must_use]
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a transaction error.
    #[must_use]
    pub fn transaction(msg: impl Into<String>) -> Self {
        Self::Transaction(msg.into())
    }

    /// Creates a nonce error.
    #[must_use]
    pub fn nonce(msg: impl Into<String>) -> Self {
        Self::Nonce(msg.into())
    }

    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if the node could not be reached or answered in time.
    #[must_use]
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::ChainMismatch { .. })
    }
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Trait for the faucet's chain operations.
///
/// Implementations are bound to a single network and a single signing
/// account (the faucet).
#[async_trait]
pub trait BlockchainClient: Send + Sync + fmt::Debug {
    /// Returns the chain ID this client signs for.
    fn chain_id(&self) -> u64;

    /// Returns the faucet account this client signs with.
    fn signer_address(&self) -> WalletAddress;

    /// Returns the balance of an address in wei.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC call fails.
    async fn get_balance(&self, address: &WalletAddress) -> BlockchainResult<u128>;

    /// Returns the network's current gas price.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC call fails.
    async fn get_gas_price(&self) -> BlockchainResult<GasPrice>;

    /// Signs and submits a native-token transfer from the faucet account.
    ///
    /// Implementations must serialize nonce assignment so that concurrent
    /// calls never reuse a nonce.
    ///
    /// # Errors
    ///
    /// Returns an error if signing or submission fails.
    async fn send_transfer(
        &self,
        to: &WalletAddress,
        value: u128,
        gas_price: GasPrice,
    ) -> BlockchainResult<TxHash>;

    /// Waits for a submitted transaction to be included in a block.
    ///
    /// A mined transaction always yields `Ok(Some(receipt))`; a reverted
    /// one has `receipt.success == false`. `Ok(None)` means the node has no
    /// receipt (the transaction was dropped or replaced). On any outcome
    /// other than a mined transaction, implementations must forget cached
    /// nonces so the next transfer re-reads the account's nonce.
    ///
    /// # Errors
    ///
    /// Returns an error on RPC failure or timeout.
    async fn wait_for_confirmation(&self, tx_hash: &TxHash) -> BlockchainResult<Option<TxReceipt>>;

    /// Checks that the node is reachable and serves the expected chain.
    ///
    /// # Errors
    ///
    /// Returns an error if the health check fails.
    async fn health_check(&self) -> BlockchainResult<()>;
}
