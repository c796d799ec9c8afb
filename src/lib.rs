//! # RUPX Faucet
//!
//! Test-network faucet for the Rupaya chain. A caller submits a wallet
//! address and a solved CAPTCHA; once per cooldown window the faucet signs
//! and sends a fixed amount of RUPX to that address.
//!
//! # Architecture
//!
//! - [`domain`]: claim entities, addresses, cooldown policy
//! - [`application`]: claim and balance use cases, error taxonomy
//! - [`infrastructure`]: chain client, CAPTCHA, explorer, cooldown store
//! - [`api`]: axum REST endpoints
//! - [`config`]: environment configuration
//! - [`bootstrap`]: wiring from configuration to router

pub mod api;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{ConfigError, FaucetConfig};
