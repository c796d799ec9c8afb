//! # Infrastructure Layer
//!
//! Adapters for everything outside the process.
//!
//! - [`blockchain`]: JSON-RPC node and faucet signer
//! - [`captcha`]: hCaptcha / reCAPTCHA verification
//! - [`explorer`]: Blockscout balance lookups
//! - [`http`]: shared outbound HTTP client
//! - [`persistence`]: cooldown store

pub mod blockchain;
pub mod captcha;
pub mod explorer;
pub mod http;
pub mod persistence;
