//! # Outbound HTTP
//!
//! - [`HttpClient`]: reqwest wrapper with timeout and JSON decoding
//! - [`HttpError`]: transport, status and protocol failures

pub mod client;
pub mod error;

pub use client::HttpClient;
pub use error::{HttpError, HttpResult};
