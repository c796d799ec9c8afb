//! # REST API
//!
//! HTTP surface consumed by the faucet web page.
//!
//! # Endpoints
//!
//! ## Claims
//! - `POST /api/claim` - Request tokens (`{walletAddress, captchaToken}`)
//!
//! ## Balance
//! - `GET /api/claim` - Faucet balance in wei
//! - `GET /api/faucet-balance` - Same as above
//!
//! ## Health
//! - `GET /api/health` - Liveness and version
//!
//! # Usage
//!
//! ```ignore
//! use rupx_faucet::api::rest::{create_router, AppState};
//! use std::sync::Arc;
//!
//! let state = Arc::new(AppState {
//!     claims: /* ... */,
//!     balances: /* ... */,
//!     claim_limiter: None,
//! });
//!
//! let router = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(
//!     listener,
//!     router.into_make_service_with_connect_info::<std::net::SocketAddr>(),
//! )
//! .await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    AppState, BalanceResponse, ClaimRateLimiter, ClaimResponse, HealthResponse,
    claim_rate_limiter,
};
pub use routes::create_router;
