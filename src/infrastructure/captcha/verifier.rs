//! # CAPTCHA Verification
//!
//! Server-side check of widget tokens against the provider's `siteverify`
//! endpoint. hCaptcha and reCAPTCHA share the same protocol: a form POST
//! of `secret`, `response` and optionally `remoteip`, answered with
//! `{"success": bool, "error-codes": [...]}`.

use crate::infrastructure::http::{HttpClient, HttpResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;
use tracing::debug;

/// Supported CAPTCHA providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptchaProvider {
    /// hCaptcha.
    #[default]
    Hcaptcha,
    /// Google reCAPTCHA.
    Recaptcha,
}

impl CaptchaProvider {
    /// Returns the provider's public verification endpoint.
    #[must_use]
    pub const fn default_verify_url(&self) -> &'static str {
        match self {
            Self::Hcaptcha => "https://api.hcaptcha.com/siteverify",
            Self::Recaptcha => "https://www.google.com/recaptcha/api/siteverify",
        }
    }

    /// Returns the environment variable holding this provider's secret.
    #[must_use]
    pub const fn secret_env_var(&self) -> &'static str {
        match self {
            Self::Hcaptcha => "HCAPTCHA_SECRET_KEY",
            Self::Recaptcha => "RECAPTCHA_SECRET_KEY",
        }
    }

    /// Returns the provider name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Hcaptcha => "hcaptcha",
            Self::Recaptcha => "recaptcha",
        }
    }
}

impl fmt::Display for CaptchaProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CaptchaProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hcaptcha" => Ok(Self::Hcaptcha),
            "recaptcha" => Ok(Self::Recaptcha),
            other => Err(format!("unknown captcha provider '{}'", other)),
        }
    }
}

/// Provider's answer for one token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CaptchaVerdict {
    /// Whether the token is valid.
    pub success: bool,
    /// Provider error codes, if any.
    #[serde(default, rename = "error-codes")]
    pub error_codes: Vec<String>,
}

/// Verifies CAPTCHA tokens.
#[async_trait]
pub trait CaptchaVerifier: Send + Sync + fmt::Debug {
    /// Checks a client token.
    ///
    /// `Ok` with `success == false` means the provider rejected the token;
    /// `Err` means the provider could not be asked.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider is unreachable or answers with
    /// something other than a verdict.
    async fn verify(&self, token: &str, remote_ip: Option<IpAddr>) -> HttpResult<CaptchaVerdict>;
}

#[derive(Serialize)]
struct SiteVerifyForm<'a> {
    secret: &'a str,
    response: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    remoteip: Option<String>,
}

/// `siteverify` client for hCaptcha or reCAPTCHA.
#[derive(Clone)]
pub struct SiteVerifyClient {
    http: HttpClient,
    provider: CaptchaProvider,
    verify_url: String,
    secret: String,
}

impl SiteVerifyClient {
    /// Creates a client for `provider`, using `verify_url` instead of the
    /// provider default when given.
    #[must_use]
    pub fn new(
        http: HttpClient,
        provider: CaptchaProvider,
        secret: impl Into<String>,
        verify_url: Option<String>,
    ) -> Self {
        Self {
            http,
            provider,
            verify_url: verify_url.unwrap_or_else(|| provider.default_verify_url().to_string()),
            secret: secret.into(),
        }
    }

    /// Returns the endpoint tokens are sent to.
    #[must_use]
    pub fn verify_url(&self) -> &str {
        &self.verify_url
    }
}

impl fmt::Debug for SiteVerifyClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteVerifyClient")
            .field("provider", &self.provider)
            .field("verify_url", &self.verify_url)
            .field("secret", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl CaptchaVerifier for SiteVerifyClient {
    async fn verify(&self, token: &str, remote_ip: Option<IpAddr>) -> HttpResult<CaptchaVerdict> {
        let form = SiteVerifyForm {
            secret: &self.secret,
            response: token,
            remoteip: remote_ip.map(|ip| ip.to_string()),
        };

        let verdict: CaptchaVerdict = self.http.post_form(&self.verify_url, &form).await?;
        debug!(
            provider = %self.provider,
            success = verdict.success,
            error_codes = ?verdict.error_codes,
            "CAPTCHA verdict"
        );
        Ok(verdict)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::http::HttpError;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> SiteVerifyClient {
        SiteVerifyClient::new(
            HttpClient::new(2000).unwrap(),
            CaptchaProvider::Hcaptcha,
            "server-secret",
            Some(format!("{}/siteverify", server.uri())),
        )
    }

    #[test]
    fn provider_defaults() {
        assert_eq!(
            CaptchaProvider::Hcaptcha.default_verify_url(),
            "https://api.hcaptcha.com/siteverify"
        );
        assert_eq!(CaptchaProvider::Recaptcha.secret_env_var(), "RECAPTCHA_SECRET_KEY");
        assert_eq!(CaptchaProvider::default(), CaptchaProvider::Hcaptcha);
    }

    #[test]
    fn provider_from_str() {
        assert_eq!("reCAPTCHA".parse::<CaptchaProvider>(), Ok(CaptchaProvider::Recaptcha));
        assert_eq!(" hcaptcha ".parse::<CaptchaProvider>(), Ok(CaptchaProvider::Hcaptcha));
        assert!("turnstile".parse::<CaptchaProvider>().is_err());
    }

    #[test]
    fn debug_hides_secret() {
        let client = SiteVerifyClient::new(
            HttpClient::new(1000).unwrap(),
            CaptchaProvider::Recaptcha,
            "top-secret",
            None,
        );
        let shown = format!("{:?}", client);
        assert!(!shown.contains("top-secret"));
        assert_eq!(
            client.verify_url(),
            "https://www.google.com/recaptcha/api/siteverify"
        );
    }

    #[tokio::test]
    async fn valid_token_is_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/siteverify"))
            .and(body_string_contains("secret=server-secret"))
            .and(body_string_contains("response=valid-token"))
            .and(body_string_contains("remoteip=10.0.0.7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "challenge_ts": "2024-01-01T00:00:00Z",
                "hostname": "faucet.rupaya.io"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let verdict = client_for(&server)
            .verify("valid-token", Some("10.0.0.7".parse().unwrap()))
            .await
            .unwrap();
        assert!(verdict.success);
        assert!(verdict.error_codes.is_empty());
    }

    #[tokio::test]
    async fn rejected_token_carries_error_codes() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": false,
                "error-codes": ["invalid-input-response"]
            })))
            .mount(&server)
            .await;

        let verdict = client_for(&server).verify("bad", None).await.unwrap();
        assert!(!verdict.success);
        assert_eq!(verdict.error_codes, vec!["invalid-input-response"]);
    }

    #[tokio::test]
    async fn provider_outage_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client_for(&server).verify("tok", None).await.unwrap_err();
        assert!(matches!(err, HttpError::Status { status: 503, .. }));
    }
}
