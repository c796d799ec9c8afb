//! # REST Routes
//!
//! Router assembly for the faucet endpoints.

use super::handlers::{self, AppState};
use axum::Router;
use axum::http::{Method, header};
use axum::routing::{get, post};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Creates the faucet router.
///
/// # Routes
///
/// - `POST /api/claim` - Submit a claim
/// - `GET /api/claim` - Balance of the published faucet address
/// - `GET /api/faucet-balance` - Balance of the signing account
/// - `GET /api/health` - Liveness
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(
            "/api/claim",
            post(handlers::claim).get(handlers::published_balance),
        )
        .route("/api/faucet-balance", get(handlers::faucet_balance))
        .route("/api/health", get(handlers::health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
