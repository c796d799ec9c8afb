//! # Application Errors
//!
//! Error types for the application layer.
//!
//! These errors represent the ways a claim or a balance query can fail.
//! Each carries detail for the logs, and a separate fixed public message
//! for callers via [`ApplicationError::public_message`]: internal error
//! text never leaves the process.
//!
//! # Error Hierarchy
//!
//! ```text
//! ApplicationError
//! ├── Domain(DomainError)          - Malformed claim request
//! ├── Repository(RepositoryError)  - Cooldown store failures
//! ├── Validation(String)           - Other input validation failures
//! ├── CaptchaRejected              - Provider said the token is invalid
//! ├── CaptchaUnavailable(String)   - Provider could not be asked
//! ├── CooldownActive               - Address claimed within the window
//! ├── ClaimInProgress              - Another claim for the address is underway
//! ├── Upstream(String)             - Node unreachable before submission
//! ├── InsufficientFunds            - Faucet balance below the disbursement
//! ├── Transaction(String)          - Submission or confirmation failed
//! ├── BalanceUnavailable(String)   - No balance source answered
//! └── Internal(String)             - Anything else
//! ```
//!
//! # Examples
//!
//! ```
//! use rupx_faucet::application::error::ApplicationError;
//!
//! let err = ApplicationError::cooldown_active(42);
//! assert_eq!(err.public_message(), "Please wait 42 minutes before claiming again");
//! ```

use crate::domain::errors::DomainError;
use crate::infrastructure::persistence::RepositoryError;
use thiserror::Error;

/// Public message for malformed claim requests.
pub const MSG_INVALID_PARAMS: &str = "Missing or invalid required parameters";

/// Public message for unexpected failures.
pub const MSG_CLAIM_FAILED: &str = "Failed to process claim. Please try again later.";

/// Coarse classification used to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The request itself is unacceptable.
    BadRequest,
    /// The caller must wait before trying again.
    TooManyRequests,
    /// A dependency is down or the faucet is empty.
    Unavailable,
    /// Unexpected failure.
    Internal,
}

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Domain error from request validation.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// Cooldown store failure.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// The CAPTCHA provider rejected the token.
    #[error("captcha rejected: {error_codes:?}")]
    CaptchaRejected {
        /// Provider error codes.
        error_codes: Vec<String>,
    },

    /// The CAPTCHA provider could not be reached or answered garbage.
    #[error("captcha service unavailable: {0}")]
    CaptchaUnavailable(String),

    /// The address claimed within the cooldown window.
    #[error("cooldown active: {remaining_minutes} minutes remaining")]
    CooldownActive {
        /// Whole minutes until the window closes, rounded up.
        remaining_minutes: u64,
    },

    /// A claim for the same address has been admitted and not finished.
    #[error("claim already in progress")]
    ClaimInProgress,

    /// The node could not be used before anything was submitted.
    #[error("upstream unavailable: {0}")]
    Upstream(String),

    /// The faucet holds less than one disbursement.
    #[error("insufficient funds: available {available} wei, required {required} wei")]
    InsufficientFunds {
        /// Current faucet balance in wei.
        available: u128,
        /// Disbursement amount in wei.
        required: u128,
    },

    /// Submission or confirmation of the transfer failed.
    #[error("transaction failed: {0}")]
    Transaction(String),

    /// No balance source could answer.
    #[error("balance unavailable: {0}")]
    BalanceUnavailable(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a CAPTCHA rejection.
    #[must_use]
    pub fn captcha_rejected(error_codes: Vec<String>) -> Self {
        Self::CaptchaRejected { error_codes }
    }

    /// Creates a CAPTCHA unavailable error.
    #[must_use]
    pub fn captcha_unavailable(message: impl Into<String>) -> Self {
        Self::CaptchaUnavailable(message.into())
    }

    /// Creates a cooldown error.
    #[must_use]
    pub const fn cooldown_active(remaining_minutes: u64) -> Self {
        Self::CooldownActive { remaining_minutes }
    }

    /// Creates an upstream error.
    #[must_use]
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    /// Creates an insufficient funds error.
    #[must_use]
    pub const fn insufficient_funds(available: u128, required: u128) -> Self {
        Self::InsufficientFunds {
            available,
            required,
        }
    }

    /// Creates a transaction error.
    #[must_use]
    pub fn transaction(message: impl Into<String>) -> Self {
        Self::Transaction(message.into())
    }

    /// Creates a balance unavailable error.
    #[must_use]
    pub fn balance_unavailable(message: impl Into<String>) -> Self {
        Self::BalanceUnavailable(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns the classification of this error.
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Domain(_) | Self::Validation(_) | Self::CaptchaRejected { .. } => {
                ErrorClass::BadRequest
            }
            Self::CooldownActive { .. } | Self::ClaimInProgress => ErrorClass::TooManyRequests,
            Self::CaptchaUnavailable(_) | Self::Upstream(_) | Self::InsufficientFunds { .. } => {
                ErrorClass::Unavailable
            }
            Self::Repository(_)
            | Self::Transaction(_)
            | Self::BalanceUnavailable(_)
            | Self::Internal(_) => ErrorClass::Internal,
        }
    }

    /// Returns the message shown to callers.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Domain(DomainError::InvalidAddress { .. }) => {
                "Invalid wallet address".to_string()
            }
            Self::Domain(_) | Self::Validation(_) => MSG_INVALID_PARAMS.to_string(),
            Self::CaptchaRejected { .. } => "Invalid captcha".to_string(),
            Self::CaptchaUnavailable(_) => "Captcha verification unavailable".to_string(),
            Self::CooldownActive { remaining_minutes } => format!(
                "Please wait {} minutes before claiming again",
                remaining_minutes
            ),
            Self::ClaimInProgress => {
                "A claim for this address is already in progress".to_string()
            }
            Self::Upstream(_) => "RPC connection failed".to_string(),
            Self::InsufficientFunds { .. } => "Insufficient faucet balance".to_string(),
            Self::BalanceUnavailable(_) => "Failed to fetch faucet balance".to_string(),
            Self::Repository(_) | Self::Transaction(_) | Self::Internal(_) => {
                MSG_CLAIM_FAILED.to_string()
            }
        }
    }

    /// Returns true if resubmitting the same request later may succeed.
    ///
    /// The service itself never retries.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::CaptchaUnavailable(_)
                | Self::Upstream(_)
                | Self::Transaction(_)
                | Self::BalanceUnavailable(_)
        )
    }

    /// Returns true if this is a validation error.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        self.class() == ErrorClass::BadRequest
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
