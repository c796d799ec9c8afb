//! # Blockchain Clients
//!
//! Client for the faucet's EVM test network.
//!
//! ## Available Components
//!
//! - [`BlockchainClient`]: Trait for chain interactions
//! - [`EthereumClient`]: ethers-rs implementation with a local signer
//! - [`NonceSequencer`]: Serialized nonce assignment
//! - [`GasPrice`] / [`FeeMarkup`]: Legacy gas pricing with a flat markup

pub mod client;
pub mod ethereum;
pub mod gas;
pub mod nonce;

pub use client::{BlockchainClient, BlockchainError, BlockchainResult, TxHash, TxReceipt};
pub use ethereum::{ConfirmationSettings, EthereumClient};
pub use gas::{FeeMarkup, GasPrice};
pub use nonce::NonceSequencer;
