//! End-to-end claim flow through the HTTP router with an in-process chain.

#![allow(clippy::unwrap_used, missing_docs)]

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use parking_lot::Mutex;
use rupx_faucet::api::rest::{AppState, create_router};
use rupx_faucet::application::services::{
    BalanceService, BalanceSource, ChainBalanceSource, ClaimService, ClaimSettings,
};
use rupx_faucet::domain::services::SystemClock;
use rupx_faucet::domain::value_objects::WalletAddress;
use rupx_faucet::infrastructure::blockchain::{
    BlockchainClient, BlockchainResult, GasPrice, NonceSequencer, TxHash, TxReceipt,
};
use rupx_faucet::infrastructure::captcha::{CaptchaVerdict, CaptchaVerifier};
use rupx_faucet::infrastructure::http::HttpResult;
use rupx_faucet::infrastructure::persistence::InMemoryCooldownStore;
use serde_json::{Value, json};
use std::net::IpAddr;
use std::sync::Arc;
use tokio_test::assert_ok;
use tower::ServiceExt;

const FAUCET: &str = "0x18e5b3dee30232CB8a83e4883E17df34d79E7296";
const AMOUNT: u128 = 100_000_000_000_000_000;

/// Chain simulated in memory: transfers debit the faucet immediately and
/// confirm on the first poll.
#[derive(Debug)]
struct SimulatedChain {
    balance: Mutex<u128>,
    nonces: NonceSequencer,
    submitted: Mutex<Vec<(u64, WalletAddress)>>,
}

impl SimulatedChain {
    fn new(balance: u128) -> Self {
        Self {
            balance: Mutex::new(balance),
            nonces: NonceSequencer::new(),
            submitted: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BlockchainClient for SimulatedChain {
    fn chain_id(&self) -> u64 {
        499
    }

    fn signer_address(&self) -> WalletAddress {
        FAUCET.parse().unwrap()
    }

    async fn get_balance(&self, _address: &WalletAddress) -> BlockchainResult<u128> {
        Ok(*self.balance.lock())
    }

    async fn get_gas_price(&self) -> BlockchainResult<GasPrice> {
        Ok(GasPrice::from_wei(1_000_000_000))
    }

    async fn send_transfer(
        &self,
        to: &WalletAddress,
        value: u128,
        _gas_price: GasPrice,
    ) -> BlockchainResult<TxHash> {
        let to = *to;
        self.nonces
            .submit_with_next(async { Ok(0) }, |nonce| async move {
                *self.balance.lock() -= value;
                self.submitted.lock().push((nonce, to));
                Ok(TxHash::new(format!("0x{:064x}", nonce + 1)))
            })
            .await
    }

    async fn wait_for_confirmation(&self, tx_hash: &TxHash) -> BlockchainResult<Option<TxReceipt>> {
        Ok(Some(TxReceipt {
            tx_hash: tx_hash.clone(),
            block_number: self.submitted.lock().len() as u64,
            gas_used: 21_000,
            effective_gas_price: 1_200_000_000,
            success: true,
        }))
    }

    async fn health_check(&self) -> BlockchainResult<()> {
        Ok(())
    }
}

#[derive(Debug)]
struct AcceptAll;

#[async_trait]
impl CaptchaVerifier for AcceptAll {
    async fn verify(&self, _token: &str, _remote_ip: Option<IpAddr>) -> HttpResult<CaptchaVerdict> {
        Ok(CaptchaVerdict {
            success: true,
            error_codes: Vec::new(),
        })
    }
}

fn app(chain: Arc<SimulatedChain>) -> Router {
    let claims = ClaimService::new(
        chain.clone(),
        Arc::new(AcceptAll),
        Arc::new(InMemoryCooldownStore::new()),
        Arc::new(SystemClock),
        ClaimSettings::new(AMOUNT),
    );
    let sources: Vec<Arc<dyn BalanceSource>> = vec![Arc::new(ChainBalanceSource::new(chain))];
    create_router(Arc::new(AppState {
        claims: Arc::new(claims),
        balances: Arc::new(BalanceService::new(FAUCET.parse().unwrap(), sources)),
        claim_limiter: None,
    }))
}

async fn post_claim(app: &Router, address: &str) -> (StatusCode, Value) {
    let body = json!({"walletAddress": address, "captchaToken": "10000000-aaaa-bbbb-cccc-000000000001"});
    let request = Request::builder()
        .method("POST")
        .uri("/api/claim")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn get_balance(app: &Router) -> String {
    let request = Request::builder()
        .uri("/api/faucet-balance")
        .body(Body::empty())
        .unwrap();
    let response = assert_ok!(app.clone().oneshot(request).await);
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    body["balance"].as_str().unwrap().to_string()
}

fn minutes_in(message: &str) -> u64 {
    message
        .trim_start_matches("Please wait ")
        .split_whitespace()
        .next()
        .unwrap()
        .parse()
        .unwrap()
}

#[tokio::test]
async fn first_claim_pays_and_repeat_is_refused() {
    let chain = Arc::new(SimulatedChain::new(5 * AMOUNT));
    let app = app(chain.clone());
    let claimant = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    assert_eq!(get_balance(&app).await, (5 * AMOUNT).to_string());

    let (status, body) = post_claim(&app, claimant).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Tokens claimed successfully");
    let hash = body["transactionHash"].as_str().unwrap();
    assert!(hash.starts_with("0x"));
    assert_eq!(hash.len(), 66);

    assert_eq!(get_balance(&app).await, (4 * AMOUNT).to_string());

    let (status, body) = post_claim(&app, &claimant.to_lowercase()).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["success"], false);
    let message = body["error"].as_str().unwrap();
    assert!(message.ends_with("minutes before claiming again"));
    let minutes = minutes_in(message);
    assert!((1..=720).contains(&minutes), "got {minutes}");

    assert_eq!(chain.submitted.lock().len(), 1);
}

#[tokio::test]
async fn distinct_claimants_get_consecutive_nonces() {
    let chain = Arc::new(SimulatedChain::new(100 * AMOUNT));
    let app = app(chain.clone());

    let claimants: Vec<String> = (1..=10u8)
        .map(|i| format!("0x{:040x}", u128::from(i) + 0x1000))
        .collect();

    let mut handles = Vec::new();
    for claimant in claimants {
        let app = app.clone();
        handles.push(tokio::spawn(async move { post_claim(&app, &claimant).await }));
    }
    for handle in handles {
        let (status, _) = handle.await.unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    let mut nonces: Vec<u64> = chain.submitted.lock().iter().map(|(n, _)| *n).collect();
    nonces.sort_unstable();
    assert_eq!(nonces, (0..10).collect::<Vec<_>>());
}

#[tokio::test]
async fn empty_faucet_refuses_without_sending() {
    let chain = Arc::new(SimulatedChain::new(AMOUNT - 1));
    let app = app(chain.clone());

    let (status, body) = post_claim(&app, "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Insufficient faucet balance");
    assert!(chain.submitted.lock().is_empty());
}
