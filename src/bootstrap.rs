//! # Bootstrap
//!
//! Builds the service graph from a [`FaucetConfig`].

use crate::api::rest::{AppState, claim_rate_limiter, create_router};
use crate::application::services::{
    BalanceService, BalanceSource, ChainBalanceSource, ClaimService, ClaimSettings,
    ExplorerBalanceSource,
};
use crate::config::FaucetConfig;
use crate::domain::services::{CooldownPolicy, SystemClock};
use crate::infrastructure::blockchain::{BlockchainClient, EthereumClient};
use crate::infrastructure::captcha::SiteVerifyClient;
use crate::infrastructure::explorer::BlockscoutClient;
use crate::infrastructure::http::HttpClient;
use crate::infrastructure::persistence::InMemoryCooldownStore;
use anyhow::Context;
use axum::Router;
use std::sync::Arc;
use tracing::{info, warn};

/// Connects to the node and assembles the application state.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built, the RPC URL or key
/// is invalid, or the chain ID must be read from an unreachable node.
pub async fn build_state(config: &FaucetConfig) -> anyhow::Result<Arc<AppState>> {
    let http = HttpClient::new(config.http_timeout_ms).context("building HTTP client")?;

    let chain = EthereumClient::connect(
        &config.rpc_url,
        config.private_key.expose(),
        config.chain_id,
        config.confirmation,
    )
    .await
    .context("connecting to RPC node")?;
    let chain: Arc<dyn BlockchainClient> = Arc::new(chain);

    if chain.signer_address() != config.faucet_address {
        warn!(
            signer = %chain.signer_address(),
            faucet_address = %config.faucet_address,
            "FAUCET_ADDRESS differs from the signing key's address; GET /api/claim reports FAUCET_ADDRESS"
        );
    }

    let captcha = SiteVerifyClient::new(
        http.clone(),
        config.captcha_provider,
        config.captcha_secret.expose(),
        config.captcha_verify_url.clone(),
    );
    info!(
        provider = %config.captcha_provider,
        verify_url = captcha.verify_url(),
        "CAPTCHA verifier ready"
    );

    let settings = ClaimSettings {
        amount_wei: config.amount_wei,
        policy: CooldownPolicy::new(config.cooldown),
        fee_markup: config.fee_markup,
        rpc_preflight: config.rpc_preflight,
    };
    let claims = ClaimService::new(
        Arc::clone(&chain),
        Arc::new(captcha),
        Arc::new(InMemoryCooldownStore::new()),
        Arc::new(SystemClock),
        settings,
    );

    let chain_source: Arc<dyn BalanceSource> = Arc::new(ChainBalanceSource::new(chain));
    let explorer_source: Arc<dyn BalanceSource> = Arc::new(ExplorerBalanceSource::new(
        BlockscoutClient::new(http, config.explorer_url.clone()),
    ));
    let balances = BalanceService::with_preference(
        config.faucet_address,
        config.balance_source,
        chain_source,
        explorer_source,
    );
    info!(sources = ?balances.source_names(), "Balance sources ready");

    let claim_limiter = claim_rate_limiter(config.claim_rate_limit_per_minute);
    if claim_limiter.is_some() {
        info!(
            per_minute = config.claim_rate_limit_per_minute,
            "Per-IP claim limit enabled"
        );
    }

    Ok(Arc::new(AppState {
        claims: Arc::new(claims),
        balances: Arc::new(balances),
        claim_limiter,
    }))
}

/// Builds the HTTP router for `config`.
///
/// # Errors
///
/// Same as [`build_state`].
pub async fn build_router(config: &FaucetConfig) -> anyhow::Result<Router> {
    let state = build_state(config).await?;
    Ok(create_router(state))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn config(extra: &[(&'static str, &'static str)]) -> FaucetConfig {
        let mut vars = vec![
            ("FAUCET_PRIVATE_KEY", KEY),
            ("RPC_URL", "http://127.0.0.1:1"),
            ("HCAPTCHA_SECRET_KEY", "secret"),
            ("FAUCET_ADDRESS", "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
            ("CHAIN_ID", "499"),
        ];
        vars.extend_from_slice(extra);
        FaucetConfig::from_vars(vars).unwrap()
    }

    #[tokio::test]
    async fn builds_with_explicit_chain_id() {
        let state = build_state(&config(&[("CLAIM_RATE_LIMIT_PER_MINUTE", "3")]))
            .await
            .unwrap();
        assert!(state.claim_limiter.is_some());
        assert_eq!(state.balances.source_names(), vec!["chain", "explorer"]);
        assert_eq!(state.claims.settings().amount_wei, 100_000_000_000_000_000);
    }

    #[tokio::test]
    async fn explorer_first_when_configured() {
        let state = build_state(&config(&[("BALANCE_SOURCE", "explorer")]))
            .await
            .unwrap();
        assert_eq!(state.balances.source_names(), vec!["explorer", "chain"]);
        assert!(state.claim_limiter.is_none());
    }

    #[tokio::test]
    async fn unreachable_node_without_chain_id_fails() {
        let vars = vec![
            ("FAUCET_PRIVATE_KEY", KEY),
            ("RPC_URL", "http://127.0.0.1:1"),
            ("HCAPTCHA_SECRET_KEY", "secret"),
            ("FAUCET_ADDRESS", "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
        ];
        let config = FaucetConfig::from_vars(vars).unwrap();
        assert!(build_router(&config).await.is_err());
    }
}
