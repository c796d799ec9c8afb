//! # REST Handlers
//!
//! Request handlers for the faucet endpoints.
//!
//! Claim replies always carry `success` and `message`; failures repeat the
//! message under `error` because that is the field the browser form reads
//! on non-2xx replies.

use crate::application::error::{ApplicationError, ErrorClass, MSG_INVALID_PARAMS};
use crate::application::services::{BalanceService, ClaimService};
use crate::domain::entities::ClaimRequest;
use axum::Json;
use axum::extract::connect_info::ConnectInfo;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{Extensions, StatusCode};
use axum::response::{IntoResponse, Response};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Public message for a successful claim.
pub const MSG_CLAIM_OK: &str = "Tokens claimed successfully";

/// Public message when the per-IP limit trips.
pub const MSG_RATE_LIMITED: &str = "Too many requests. Please try again later.";

/// Per-client-IP limiter for claim submissions.
pub type ClaimRateLimiter = DefaultKeyedRateLimiter<IpAddr>;

/// Builds a limiter allowing `per_minute` claims per IP, or `None` when
/// `per_minute` is zero.
#[must_use]
pub fn claim_rate_limiter(per_minute: u32) -> Option<Arc<ClaimRateLimiter>> {
    NonZeroU32::new(per_minute).map(|n| Arc::new(RateLimiter::keyed(Quota::per_minute(n))))
}

/// Shared application state for handlers.
#[derive(Clone)]
pub struct AppState {
    /// Claim use case.
    pub claims: Arc<ClaimService>,
    /// Balance query.
    pub balances: Arc<BalanceService>,
    /// Optional per-IP claim limiter.
    pub claim_limiter: Option<Arc<ClaimRateLimiter>>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("claims", &self.claims)
            .field("balances", &self.balances)
            .field("claim_limiter", &self.claim_limiter.is_some())
            .finish()
    }
}

/// Reply to a claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimResponse {
    /// Whether tokens were sent.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Hash of the confirmed transfer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
    /// Same as `message` on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClaimResponse {
    /// Creates a success reply.
    #[must_use]
    pub fn claimed(transaction_hash: impl Into<String>) -> Self {
        Self {
            success: true,
            message: MSG_CLAIM_OK.to_string(),
            transaction_hash: Some(transaction_hash.into()),
            error: None,
        }
    }

    /// Creates a failure reply.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            success: false,
            error: Some(message.clone()),
            message,
            transaction_hash: None,
        }
    }
}

/// Faucet balance reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceResponse {
    /// Balance in wei as a decimal string.
    pub balance: String,
}

impl From<u128> for BalanceResponse {
    fn from(wei: u128) -> Self {
        Self {
            balance: wei.to_string(),
        }
    }
}

/// Health check reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Crate version.
    pub version: String,
}

/// Maps an error class to its HTTP status.
#[must_use]
pub fn status_for(class: ErrorClass) -> StatusCode {
    match class {
        ErrorClass::BadRequest => StatusCode::BAD_REQUEST,
        ErrorClass::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
        ErrorClass::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorClass::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let status = status_for(self.class());
        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "Request failed");
        } else {
            debug!(error = %self, status = status.as_u16(), "Request refused");
        }
        (status, Json(ClaimResponse::failed(self.public_message()))).into_response()
    }
}

fn remote_ip(extensions: &Extensions) -> Option<IpAddr> {
    extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
}

/// `POST /api/claim`
pub async fn claim(
    State(state): State<Arc<AppState>>,
    extensions: Extensions,
    payload: Result<Json<ClaimRequest>, JsonRejection>,
) -> Response {
    let ip = remote_ip(&extensions);

    if let (Some(limiter), Some(ip)) = (&state.claim_limiter, ip)
        && limiter.check_key(&ip).is_err()
    {
        warn!(%ip, "Claim rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(ClaimResponse::failed(MSG_RATE_LIMITED)),
        )
            .into_response();
    }

    let Json(request) = match payload {
        Ok(body) => body,
        Err(rejection) => {
            debug!(error = %rejection, "Unreadable claim body");
            return (
                StatusCode::BAD_REQUEST,
                Json(ClaimResponse::failed(MSG_INVALID_PARAMS)),
            )
                .into_response();
        }
    };

    match state.claims.claim(&request, ip).await {
        Ok(receipt) => {
            info!(
                address = %receipt.address,
                tx_hash = %receipt.tx_hash,
                "Claim succeeded"
            );
            (StatusCode::OK, Json(ClaimResponse::claimed(receipt.tx_hash))).into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// `GET /api/claim`: balance of the published faucet address.
///
/// # Errors
///
/// Returns a 500 reply if no balance source answers.
pub async fn published_balance(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BalanceResponse>, ApplicationError> {
    let balance = state.balances.published_balance().await?;
    Ok(Json(BalanceResponse::from(balance)))
}

/// `GET /api/faucet-balance`: balance of the signing account.
///
/// # Errors
///
/// Returns a 500 reply if no balance source answers.
pub async fn faucet_balance(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BalanceResponse>, ApplicationError> {
    let signer = state.claims.signer_address();
    let balance = state.balances.balance_of(&signer).await?;
    Ok(Json(BalanceResponse::from(balance)))
}

/// `GET /api/health`
#[allow(clippy::unused_async)]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn failure_repeats_message_as_error() {
        let body = serde_json::to_value(ClaimResponse::failed("Invalid captcha")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "success": false,
                "message": "Invalid captcha",
                "error": "Invalid captcha"
            })
        );
    }

    #[test]
    fn success_carries_hash() {
        let body = serde_json::to_value(ClaimResponse::claimed("0xabc")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "success": true,
                "message": MSG_CLAIM_OK,
                "transactionHash": "0xabc"
            })
        );
    }

    #[test]
    fn status_mapping() {
        assert_eq!(status_for(ErrorClass::BadRequest), StatusCode::BAD_REQUEST);
        assert_eq!(status_for(ErrorClass::TooManyRequests), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(status_for(ErrorClass::Unavailable), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(status_for(ErrorClass::Internal), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_response_status() {
        let response = ApplicationError::cooldown_active(3).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let response = ApplicationError::internal("boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn limiter_disabled_at_zero() {
        assert!(claim_rate_limiter(0).is_none());
        let limiter = claim_rate_limiter(1);
        assert!(limiter.is_some());
    }

    #[test]
    fn limiter_is_per_ip() {
        let limiter = claim_rate_limiter(1).unwrap();
        let a: IpAddr = [10, 0, 0, 1].into();
        let b: IpAddr = [10, 0, 0, 2].into();
        assert!(limiter.check_key(&a).is_ok());
        assert!(limiter.check_key(&a).is_err());
        assert!(limiter.check_key(&b).is_ok());
    }
}
