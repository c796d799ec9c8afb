//! # HTTP Client
//!
//! Shared `reqwest` wrapper for the CAPTCHA and block-explorer adapters.
//!
//! Provides a configured timeout, JSON decoding of successful responses
//! and a uniform mapping of transport and status failures to
//! [`HttpError`].

use super::error::{HttpError, HttpResult};
use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Maximum number of body bytes kept in a status error.
const ERROR_BODY_LIMIT: usize = 512;

/// HTTP client wrapper.
#[derive(Debug, Clone)]
pub struct HttpClient {
    /// Inner reqwest client.
    client: Client,
    /// Request timeout in milliseconds.
    timeout_ms: u64,
}

impl HttpClient {
    /// Creates a new HTTP client with the specified timeout.
    ///
    /// # Errors
    ///
    /// Returns `HttpError::Internal` if the client cannot be created.
    pub fn new(timeout_ms: u64) -> HttpResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HttpError::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, timeout_ms })
    }

    /// Returns the configured timeout in milliseconds.
    #[inline]
    #[must_use]
    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Makes a GET request with query parameters and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the request fails, `HttpError::Status`
    /// on a non-2xx answer, or `HttpError::Protocol` if the body does not
    /// decode.
    pub async fn get_with_params<T: DeserializeOwned, P: Serialize + ?Sized>(
        &self,
        url: &str,
        params: &P,
    ) -> HttpResult<T> {
        let response = self
            .client
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        handle_response(response).await
    }

    /// Makes a form-encoded POST request and deserializes the JSON response.
    ///
    /// # Errors
    ///
    /// Same as [`HttpClient::get_with_params`].
    pub async fn post_form<T: DeserializeOwned, F: Serialize + ?Sized>(
        &self,
        url: &str,
        form: &F,
    ) -> HttpResult<T> {
        let response = self
            .client
            .post(url)
            .form(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        handle_response(response).await
    }
}

/// Checks the status and decodes the JSON body.
async fn handle_response<T: DeserializeOwned>(response: Response) -> HttpResult<T> {
    let status = response.status();

    if status.is_success() {
        response
            .json::<T>()
            .await
            .map_err(|e| HttpError::protocol(format!("Failed to parse response: {}", e)))
    } else {
        let mut body = response.text().await.unwrap_or_default();
        if body.len() > ERROR_BODY_LIMIT {
            let cut = (0..=ERROR_BODY_LIMIT)
                .rev()
                .find(|i| body.is_char_boundary(*i))
                .unwrap_or(0);
            body.truncate(cut);
        }
        Err(HttpError::status(status.as_u16(), body))
    }
}

/// Maps a reqwest error to an HttpError.
fn map_reqwest_error(error: reqwest::Error) -> HttpError {
    if error.is_timeout() {
        HttpError::timeout("Request timed out")
    } else if error.is_connect() {
        HttpError::connection(format!("Connection failed: {}", error))
    } else {
        HttpError::connection(format!("HTTP request failed: {}", error))
    }
}
