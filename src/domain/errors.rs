//! # Domain Errors
//!
//! Rule violations detected while building domain values from caller input.

use thiserror::Error;

/// Error type for domain validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A wallet address could not be parsed.
    #[error("invalid wallet address '{input}': {reason}")]
    InvalidAddress {
        /// The rejected input.
        input: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A required request field was absent or empty.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
}

impl DomainError {
    /// Creates an invalid address error.
    #[must_use]
    pub fn invalid_address(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAddress {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Creates a missing field error.
    #[must_use]
    pub const fn missing_field(field: &'static str) -> Self {
        Self::MissingField(field)
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
