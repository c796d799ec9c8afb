//! # Claim Service
//!
//! Processes one faucet claim end to end.
//!
//! # Pipeline
//!
//! 1. Validate the request shape and wallet address
//! 2. Verify the CAPTCHA token
//! 3. Check-and-reserve the address in the cooldown store
//! 4. Optionally check the node is reachable
//! 5. Check the faucet holds at least one disbursement
//! 6. Price gas at the network rate plus markup
//! 7. Submit the signed transfer
//! 8. Wait for confirmation
//! 9. Record the confirmation time, or release the reservation on failure
//!
//! Steps 1 and 2 have no side effects. From step 3 on, every exit path
//! either completes or aborts the reservation. Steps 3 to 9 run on their
//! own task, so a caller that disconnects mid-claim does not strand the
//! reservation or lose a confirmed transfer. Nothing is retried.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::{ClaimReceipt, ClaimRequest};
use crate::domain::services::{ClaimAdmission, Clock, CooldownPolicy, remaining_minutes};
use crate::domain::value_objects::WalletAddress;
use crate::infrastructure::blockchain::{BlockchainClient, FeeMarkup, TxReceipt};
use crate::infrastructure::captcha::CaptchaVerifier;
use crate::infrastructure::persistence::CooldownStore;
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{Instrument, error, info, instrument, warn};

/// Tunables for the claim pipeline.
#[derive(Debug, Clone, Copy)]
pub struct ClaimSettings {
    /// Disbursement per claim, in wei.
    pub amount_wei: u128,
    /// Cooldown window.
    pub policy: CooldownPolicy,
    /// Markup applied to the network gas price.
    pub fee_markup: FeeMarkup,
    /// Whether to health-check the node before each transfer.
    pub rpc_preflight: bool,
}

impl ClaimSettings {
    /// Creates settings with the default window, markup and preflight.
    #[must_use]
    pub fn new(amount_wei: u128) -> Self {
        Self {
            amount_wei,
            policy: CooldownPolicy::default(),
            fee_markup: FeeMarkup::default(),
            rpc_preflight: true,
        }
    }
}

/// Claim use case.
#[derive(Debug, Clone)]
pub struct ClaimService {
    chain: Arc<dyn BlockchainClient>,
    captcha: Arc<dyn CaptchaVerifier>,
    cooldowns: Arc<dyn CooldownStore>,
    clock: Arc<dyn Clock>,
    settings: ClaimSettings,
}

impl ClaimService {
    /// Creates a new claim service.
    #[must_use]
    pub fn new(
        chain: Arc<dyn BlockchainClient>,
        captcha: Arc<dyn CaptchaVerifier>,
        cooldowns: Arc<dyn CooldownStore>,
        clock: Arc<dyn Clock>,
        settings: ClaimSettings,
    ) -> Self {
        Self {
            chain,
            captcha,
            cooldowns,
            clock,
            settings,
        }
    }

    /// Returns the pipeline settings.
    #[must_use]
    pub fn settings(&self) -> &ClaimSettings {
        &self.settings
    }

    /// Returns the account transfers are signed with.
    #[must_use]
    pub fn signer_address(&self) -> WalletAddress {
        self.chain.signer_address()
    }

    /// Processes a claim.
    ///
    /// # Errors
    ///
    /// Returns the [`ApplicationError`] for the first step that fails.
    #[instrument(skip_all, fields(address = request.wallet_address.as_deref().unwrap_or_default()))]
    pub async fn claim(
        &self,
        request: &ClaimRequest,
        remote_ip: Option<IpAddr>,
    ) -> ApplicationResult<ClaimReceipt> {
        let claim = request.validate()?;
        let address = claim.address;

        let verdict = self
            .captcha
            .verify(&claim.captcha_token, remote_ip)
            .await
            .map_err(|e| {
                warn!(error = %e, "CAPTCHA verification unavailable");
                ApplicationError::captcha_unavailable(e.to_string())
            })?;
        if !verdict.success {
            info!(error_codes = ?verdict.error_codes, "CAPTCHA rejected");
            return Err(ApplicationError::captcha_rejected(verdict.error_codes));
        }

        let service = self.clone();
        tokio::spawn(async move { service.settle(address).await }.in_current_span())
            .await
            .map_err(|e| {
                error!(error = %e, "Claim task failed");
                ApplicationError::internal(format!("claim task failed: {}", e))
            })?
    }

    /// Steps 3 to 9: reserve, disburse, then complete or abort.
    async fn settle(&self, address: WalletAddress) -> ApplicationResult<ClaimReceipt> {
        let admission = self
            .cooldowns
            .begin_claim(&address, self.clock.now(), &self.settings.policy)
            .await?;
        match admission {
            ClaimAdmission::Admitted => {}
            ClaimAdmission::CoolingDown { remaining_ms } => {
                let minutes = remaining_minutes(remaining_ms);
                info!(remaining_minutes = minutes, "Claim refused: cooldown active");
                return Err(ApplicationError::cooldown_active(minutes));
            }
            ClaimAdmission::InFlight => {
                info!("Claim refused: another claim in progress");
                return Err(ApplicationError::ClaimInProgress);
            }
        }

        let receipt = match self.disburse(&address).await {
            Ok(receipt) => receipt,
            Err(e) => {
                if let Err(abort_err) = self.cooldowns.abort_claim(&address).await {
                    error!(error = %abort_err, "Failed to release claim reservation");
                }
                return Err(e);
            }
        };

        let claimed_at = self.clock.now();
        self.cooldowns.complete_claim(&address, claimed_at).await?;

        info!(
            tx_hash = %receipt.tx_hash,
            block = receipt.block_number,
            amount_wei = self.settings.amount_wei,
            "Claim disbursed"
        );

        Ok(ClaimReceipt {
            address,
            tx_hash: receipt.tx_hash.0,
            block_number: receipt.block_number,
            amount_wei: self.settings.amount_wei,
            claimed_at,
        })
    }

    /// Steps 4 to 8: everything that talks to the node.
    async fn disburse(&self, to: &WalletAddress) -> ApplicationResult<TxReceipt> {
        if self.settings.rpc_preflight {
            self.chain.health_check().await.map_err(|e| {
                error!(error = %e, "RPC health check failed");
                ApplicationError::upstream(e.to_string())
            })?;
        }

        let faucet = self.chain.signer_address();
        let balance = self.chain.get_balance(&faucet).await.map_err(|e| {
            error!(error = %e, "Failed to read faucet balance");
            ApplicationError::upstream(e.to_string())
        })?;
        if balance < self.settings.amount_wei {
            warn!(
                balance,
                required = self.settings.amount_wei,
                "Faucet balance too low"
            );
            return Err(ApplicationError::insufficient_funds(
                balance,
                self.settings.amount_wei,
            ));
        }

        let base = self.chain.get_gas_price().await.map_err(|e| {
            error!(error = %e, "Failed to read gas price");
            ApplicationError::upstream(e.to_string())
        })?;
        let gas_price = self.settings.fee_markup.apply(base);

        let tx_hash = self
            .chain
            .send_transfer(to, self.settings.amount_wei, gas_price)
            .await
            .map_err(|e| {
                error!(error = %e, "Transfer submission failed");
                ApplicationError::transaction(e.to_string())
            })?;
        info!(tx_hash = %tx_hash, %gas_price, "Transfer submitted");

        match self.chain.wait_for_confirmation(&tx_hash).await {
            Ok(Some(receipt)) if receipt.success => Ok(receipt),
            Ok(Some(_)) => {
                error!(tx_hash = %tx_hash, "Transfer reverted");
                Err(ApplicationError::transaction(format!("{} reverted", tx_hash)))
            }
            Ok(None) => {
                error!(tx_hash = %tx_hash, "No receipt for transfer");
                Err(ApplicationError::transaction(format!("no receipt for {}", tx_hash)))
            }
            Err(e) => {
                error!(tx_hash = %tx_hash, error = %e, "Confirmation failed");
                Err(ApplicationError::transaction(e.to_string()))
            }
        }
    }
}
