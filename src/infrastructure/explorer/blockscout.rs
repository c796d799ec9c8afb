//! # Blockscout Client
//!
//! Balance lookups through a Blockscout instance's Etherscan-compatible
//! RPC API (`/api?module=account&action=balance&address=...`).

use crate::domain::value_objects::WalletAddress;
use crate::infrastructure::http::{HttpClient, HttpError, HttpResult};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// `status` value Blockscout uses for a successful call.
const STATUS_OK: &str = "1";

/// Envelope returned by the Etherscan-style API.
#[derive(Debug, Deserialize)]
struct ExplorerEnvelope {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    result: Value,
}

/// Blockscout API client.
#[derive(Debug, Clone)]
pub struct BlockscoutClient {
    http: HttpClient,
    base_url: String,
}

impl BlockscoutClient {
    /// Creates a client for the explorer at `base_url`
    /// (e.g. `https://scan.rupaya.io`).
    #[must_use]
    pub fn new(http: HttpClient, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// Returns the explorer base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the balance of `address` in wei.
    ///
    /// # Errors
    ///
    /// Returns an HTTP error if the explorer is unreachable, and
    /// `HttpError::Protocol` if it reports a failure status or a result
    /// that is not an unsigned integer.
    pub async fn balance(&self, address: &WalletAddress) -> HttpResult<u128> {
        let url = format!("{}/api", self.base_url);
        let address = address.to_checksum();
        let params = [
            ("module", "account"),
            ("action", "balance"),
            ("address", address.as_str()),
        ];

        let envelope: ExplorerEnvelope = self.http.get_with_params(&url, &params).await?;

        if envelope.status != STATUS_OK {
            return Err(HttpError::protocol(format!(
                "explorer API error: {}",
                envelope.message.as_deref().unwrap_or("Unknown error")
            )));
        }

        let balance = parse_balance(&envelope.result)?;
        debug!(%address, balance, "Explorer balance");
        Ok(balance)
    }
}

fn parse_balance(result: &Value) -> HttpResult<u128> {
    let text = match result {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(HttpError::protocol(format!(
                "unexpected balance result: {}",
                other
            )));
        }
    };

    text.parse::<u128>()
        .map_err(|_| HttpError::protocol(format!("balance is not an unsigned integer: {}", text)))
}
