//! # HTTP Errors
//!
//! Error type for outbound HTTP calls to third-party APIs (CAPTCHA
//! provider, block explorer).
//!
//! # Examples
//!
//! ```
//! use rupx_faucet::infrastructure::http::error::HttpError;
//!
//! let error = HttpError::timeout("Request timed out");
//! assert!(error.is_retryable());
//!
//! let error = HttpError::protocol("unexpected body");
//! assert!(!error.is_retryable());
//! ```

use thiserror::Error;

/// Error type for outbound HTTP requests.
#[derive(Debug, Clone, Error)]
pub enum HttpError {
    /// Request timed out.
    #[error("http timeout: {message}")]
    Timeout {
        /// Error message.
        message: String,
    },

    /// Network or connection error.
    #[error("http connection error: {message}")]
    Connection {
        /// Error message.
        message: String,
    },

    /// Remote answered with a non-success status.
    #[error("http status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// Response could not be interpreted.
    #[error("http protocol error: {message}")]
    Protocol {
        /// Error message.
        message: String,
    },

    /// Client construction or other local failure.
    #[error("http internal error: {message}")]
    Internal {
        /// Error message.
        message: String,
    },
}

impl HttpError {
    /// Creates a timeout error.
    #[must_use]
    pub fn timeout(message: impl Into<String>) -> Self {
        Self::Timeout {
            message: message.into(),
        }
    }

    /// Creates a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a status error.
    #[must_use]
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Creates a protocol error.
    #[must_use]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this error is transient.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Connection { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Protocol { .. } | Self::Internal { .. } => false,
        }
    }
}

/// Result type for HTTP operations.
pub type HttpResult<T> = Result<T, HttpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_errors_are_retryable() {
        assert!(HttpError::timeout("t").is_retryable());
        assert!(HttpError::connection("c").is_retryable());
    }

    #[test]
    fn server_side_statuses_are_retryable() {
        assert!(HttpError::status(503, "").is_retryable());
        assert!(HttpError::status(429, "").is_retryable());
        assert!(!HttpError::status(400, "").is_retryable());
        assert!(!HttpError::status(404, "").is_retryable());
    }

    #[test]
    fn display_format() {
        let error = HttpError::status(502, "bad gateway");
        assert_eq!(error.to_string(), "http status 502: bad gateway");
    }
}
