//! # Ethereum Client
//!
//! JSON-RPC client for the faucet's EVM network using ethers-rs.
//!
//! Reads go straight to the HTTP provider; transfers are signed locally
//! with the faucet key through a `SignerMiddleware` and their nonces are
//! assigned by a [`NonceSequencer`].

use super::client::{BlockchainClient, BlockchainError, BlockchainResult, TxHash, TxReceipt};
use super::gas::GasPrice;
use super::nonce::NonceSequencer;
use crate::domain::value_objects::WalletAddress;
use async_trait::async_trait;
use ethers::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

type FaucetSigner = SignerMiddleware<Arc<Provider<Http>>, LocalWallet>;

/// Confirmation wait parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConfirmationSettings {
    /// Blocks required on top of the inclusion block (1 = included).
    pub confirmations: usize,
    /// Receipt polling interval.
    pub poll_interval: Duration,
    /// Upper bound on the whole wait.
    pub timeout: Duration,
}

impl Default for ConfirmationSettings {
    fn default() -> Self {
        Self {
            confirmations: 1,
            poll_interval: Duration::from_secs(2),
            timeout: Duration::from_secs(120),
        }
    }
}

/// Ethereum-compatible client bound to the faucet signing key.
#[derive(Debug)]
pub struct EthereumClient {
    /// Chain this client signs for.
    chain_id: u64,
    /// Read-only RPC provider.
    provider: Arc<Provider<Http>>,
    /// Provider wrapped with the faucet wallet.
    signer: Arc<FaucetSigner>,
    /// Nonce assignment for the faucet account.
    nonces: NonceSequencer,
    /// Confirmation wait parameters.
    confirmation: ConfirmationSettings,
}

impl EthereumClient {
    /// Connects to `rpc_url` and binds the faucet key.
    ///
    /// When `chain_id` is `None` it is read from the node, which requires
    /// the node to be reachable at startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or key is invalid, or if the chain ID
    /// must be fetched and the node cannot be reached.
    pub async fn connect(
        rpc_url: &str,
        private_key: &str,
        chain_id: Option<u64>,
        confirmation: ConfirmationSettings,
    ) -> BlockchainResult<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .map_err(|e| BlockchainError::configuration(format!("invalid RPC URL: {}", e)))?
            .interval(confirmation.poll_interval);
        let provider = Arc::new(provider);

        let chain_id = match chain_id {
            Some(id) => id,
            None => {
                let reported = provider
                    .get_chainid()
                    .await
                    .map_err(|e| BlockchainError::connection(e.to_string()))?;
                u256_to_u64(reported)?
            }
        };

        let wallet = private_key
            .trim()
            .parse::<LocalWallet>()
            .map_err(|_| BlockchainError::configuration("invalid faucet private key"))?
            .with_chain_id(chain_id);

        info!(
            chain_id,
            signer = %WalletAddress::from(wallet.address()),
            "Connected faucet signer"
        );

        let signer = SignerMiddleware::new(Arc::clone(&provider), wallet);

        Ok(Self {
            chain_id,
            provider,
            signer: Arc::new(signer),
            nonces: NonceSequencer::new(),
            confirmation,
        })
    }

    async fn pending_nonce(&self) -> BlockchainResult<u64> {
        let count = self
            .provider
            .get_transaction_count(self.signer.address(), Some(BlockNumber::Pending.into()))
            .await
            .map_err(|e| BlockchainError::nonce(e.to_string()))?;
        u256_to_u64(count)
    }

    async fn await_receipt(&self, tx_hash: &TxHash) -> BlockchainResult<Option<TransactionReceipt>> {
        let hash: H256 = tx_hash
            .as_str()
            .parse()
            .map_err(|_| BlockchainError::internal("invalid transaction hash"))?;

        let pending = PendingTransaction::new(hash, self.provider.as_ref())
            .interval(self.confirmation.poll_interval)
            .confirmations(self.confirmation.confirmations);

        let receipt = tokio::time::timeout(self.confirmation.timeout, pending)
            .await
            .map_err(|_| {
                BlockchainError::timeout(format!(
                    "no confirmation for {} within {:?}",
                    tx_hash, self.confirmation.timeout
                ))
            })?
            .map_err(|e| BlockchainError::connection(e.to_string()))?;

        if receipt.is_none() {
            warn!(%tx_hash, "Transaction dropped from mempool");
        }
        Ok(receipt)
    }
}

/// Converts a mined receipt; a revert is reported through `success`.
fn to_receipt(tx_hash: &TxHash, receipt: &TransactionReceipt) -> BlockchainResult<TxReceipt> {
    let success = receipt.status.is_some_and(|s| s.as_u64() == 1);
    if !success {
        warn!(%tx_hash, "Transaction reverted");
    }

    Ok(TxReceipt {
        tx_hash: tx_hash.clone(),
        block_number: receipt.block_number.map(|n| n.as_u64()).unwrap_or_default(),
        gas_used: receipt
            .gas_used
            .map(u256_to_u128)
            .transpose()?
            .unwrap_or_default(),
        effective_gas_price: receipt
            .effective_gas_price
            .map(u256_to_u128)
            .transpose()?
            .unwrap_or_default(),
        success,
    })
}

fn u256_to_u64(value: U256) -> BlockchainResult<u64> {
    u64::try_from(value).map_err(|_| BlockchainError::internal(format!("value {} overflows u64", value)))
}

fn u256_to_u128(value: U256) -> BlockchainResult<u128> {
    u128::try_from(value)
        .map_err(|_| BlockchainError::internal(format!("value {} overflows u128", value)))
}

#[async_trait]
impl BlockchainClient for EthereumClient {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn signer_address(&self) -> WalletAddress {
        WalletAddress::from(self.signer.address())
    }

    async fn get_balance(&self, address: &WalletAddress) -> BlockchainResult<u128> {
        let balance = self
            .provider
            .get_balance(address.as_address(), None)
            .await
            .map_err(|e| BlockchainError::connection(e.to_string()))?;
        u256_to_u128(balance)
    }

    async fn get_gas_price(&self) -> BlockchainResult<GasPrice> {
        let price = self
            .provider
            .get_gas_price()
            .await
            .map_err(|e| BlockchainError::connection(e.to_string()))?;
        Ok(GasPrice::from_wei(u256_to_u128(price)?))
    }

    async fn send_transfer(
        &self,
        to: &WalletAddress,
        value: u128,
        gas_price: GasPrice,
    ) -> BlockchainResult<TxHash> {
        let from = self.signer.address();
        let to_addr = to.as_address();

        self.nonces
            .submit_with_next(self.pending_nonce(), |nonce| async move {
                let tx = TransactionRequest::new()
                    .from(from)
                    .to(to_addr)
                    .value(U256::from(value))
                    .gas_price(U256::from(gas_price.as_wei()))
                    .nonce(nonce);

                debug!(nonce, %gas_price, "Submitting faucet transfer");

                let pending = self
                    .signer
                    .send_transaction(tx, None)
                    .await
                    .map_err(|e| BlockchainError::transaction(e.to_string()))?;

                Ok(TxHash::new(format!("{:#x}", pending.tx_hash())))
            })
            .await
    }

    async fn wait_for_confirmation(&self, tx_hash: &TxHash) -> BlockchainResult<Option<TxReceipt>> {
        let outcome = self.await_receipt(tx_hash).await;

        // Dropped, timed out or unknown: the nonce may still be free.
        if !matches!(outcome, Ok(Some(_))) {
            self.nonces.reset().await;
        }

        match outcome? {
            Some(receipt) => to_receipt(tx_hash, &receipt).map(Some),
            None => Ok(None),
        }
    }

    async fn health_check(&self) -> BlockchainResult<()> {
        let reported = self
            .provider
            .get_chainid()
            .await
            .map_err(|e| BlockchainError::connection(e.to_string()))?;
        let actual = u256_to_u64(reported)?;

        if actual != self.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.chain_id,
                actual,
            });
        }

        Ok(())
    }
}
