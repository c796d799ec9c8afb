//! # Balance Service
//!
//! Reports the faucet balance from an ordered list of sources.
//!
//! Two accounts are reported: the published faucet address
//! (`FAUCET_ADDRESS`) and the signing account that actually pays out. They
//! are normally the same account.
//!
//! Sources are asked in order and the first answer wins. A failing source
//! is logged and skipped; only when every source fails does the query
//! fail.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::value_objects::WalletAddress;
use crate::infrastructure::blockchain::BlockchainClient;
use crate::infrastructure::explorer::BlockscoutClient;
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Which source is asked first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BalancePreference {
    /// The JSON-RPC node, then the explorer.
    #[default]
    Chain,
    /// The block explorer, then the node.
    Explorer,
}

impl FromStr for BalancePreference {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chain" | "rpc" => Ok(Self::Chain),
            "explorer" | "blockscout" => Ok(Self::Explorer),
            other => Err(format!("unknown balance source '{}'", other)),
        }
    }
}

/// A place the faucet balance can be read from.
#[async_trait]
pub trait BalanceSource: Send + Sync + fmt::Debug {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Returns the balance of `address` in wei.
    ///
    /// # Errors
    ///
    /// Returns an error describing why the source could not answer.
    async fn balance_of(&self, address: &WalletAddress) -> ApplicationResult<u128>;
}

/// Balance read from the node.
#[derive(Debug, Clone)]
pub struct ChainBalanceSource {
    client: Arc<dyn BlockchainClient>,
}

impl ChainBalanceSource {
    /// Wraps a blockchain client.
    #[must_use]
    pub fn new(client: Arc<dyn BlockchainClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BalanceSource for ChainBalanceSource {
    fn name(&self) -> &'static str {
        "chain"
    }

    async fn balance_of(&self, address: &WalletAddress) -> ApplicationResult<u128> {
        self.client
            .get_balance(address)
            .await
            .map_err(|e| ApplicationError::balance_unavailable(e.to_string()))
    }
}

/// Balance read from the block explorer.
#[derive(Debug, Clone)]
pub struct ExplorerBalanceSource {
    client: BlockscoutClient,
}

impl ExplorerBalanceSource {
    /// Wraps an explorer client.
    #[must_use]
    pub fn new(client: BlockscoutClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BalanceSource for ExplorerBalanceSource {
    fn name(&self) -> &'static str {
        "explorer"
    }

    async fn balance_of(&self, address: &WalletAddress) -> ApplicationResult<u128> {
        self.client
            .balance(address)
            .await
            .map_err(|e| ApplicationError::balance_unavailable(e.to_string()))
    }
}

/// Faucet balance query.
#[derive(Debug, Clone)]
pub struct BalanceService {
    published: WalletAddress,
    sources: Vec<Arc<dyn BalanceSource>>,
}

impl BalanceService {
    /// Creates a service asking `sources` in the given order. `published`
    /// is the advertised faucet address.
    #[must_use]
    pub fn new(published: WalletAddress, sources: Vec<Arc<dyn BalanceSource>>) -> Self {
        Self { published, sources }
    }

    /// Creates a service over the node and the explorer, ordered by
    /// `preference`.
    #[must_use]
    pub fn with_preference(
        published: WalletAddress,
        preference: BalancePreference,
        chain: Arc<dyn BalanceSource>,
        explorer: Arc<dyn BalanceSource>,
    ) -> Self {
        let sources = match preference {
            BalancePreference::Chain => vec![chain, explorer],
            BalancePreference::Explorer => vec![explorer, chain],
        };
        Self::new(published, sources)
    }

    /// Returns the source names in query order.
    #[must_use]
    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Returns the balance of the published faucet address in wei.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::BalanceUnavailable` if no source answers.
    pub async fn published_balance(&self) -> ApplicationResult<u128> {
        self.balance_of(&self.published).await
    }

    /// Returns the balance of `address` in wei, asking each source in turn.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::BalanceUnavailable` if no source answers.
    pub async fn balance_of(&self, address: &WalletAddress) -> ApplicationResult<u128> {
        let mut failures = Vec::new();

        for source in &self.sources {
            match source.balance_of(address).await {
                Ok(balance) => {
                    debug!(source = source.name(), %address, balance, "Faucet balance");
                    return Ok(balance);
                }
                Err(e) => {
                    warn!(source = source.name(), error = %e, "Balance source failed");
                    failures.push(format!("{}: {}", source.name(), e));
                }
            }
        }

        if failures.is_empty() {
            return Err(ApplicationError::balance_unavailable(
                "no balance source configured",
            ));
        }
        Err(ApplicationError::balance_unavailable(failures.join("; ")))
    }
}
