//! # Block Explorer
//!
//! - [`BlockscoutClient`]: balance lookups via a Blockscout API

pub mod blockscout;

pub use blockscout::BlockscoutClient;
