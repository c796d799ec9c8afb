//! # Configuration
//!
//! Process-wide faucet settings, read once at startup.
//!
//! Values come from environment variables (optionally seeded from a `.env`
//! file by the binary). The `config` crate layers the defaults below the
//! supplied variables and deserializes the result into a raw struct, which
//! is then validated into [`FaucetConfig`].
//!
//! Empty variables are treated as absent. The first missing required
//! variable is reported by name.

use crate::application::services::BalancePreference;
use crate::domain::value_objects::WalletAddress;
use crate::infrastructure::blockchain::{ConfirmationSettings, FeeMarkup};
use crate::infrastructure::captcha::CaptchaProvider;
use serde::Deserialize;
use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

/// Environment variables the faucet reads.
const KNOWN_VARS: &[&str] = &[
    "FAUCET_PRIVATE_KEY",
    "RPC_URL",
    "HCAPTCHA_SECRET_KEY",
    "RECAPTCHA_SECRET_KEY",
    "FAUCET_ADDRESS",
    "BLOCKSCOUT_API_URL",
    "CAPTCHA_PROVIDER",
    "CAPTCHA_VERIFY_URL",
    "FAUCET_LISTEN_ADDR",
    "FAUCET_AMOUNT",
    "FAUCET_COOLDOWN_SECS",
    "FEE_MARKUP_PERCENT",
    "CHAIN_ID",
    "HTTP_TIMEOUT_MS",
    "CONFIRMATION_TIMEOUT_SECS",
    "CONFIRMATION_POLL_MS",
    "CONFIRMATIONS",
    "RPC_PREFLIGHT_CHECK",
    "BALANCE_SOURCE",
    "CLAIM_RATE_LIMIT_PER_MINUTE",
];

/// Default block explorer.
pub const DEFAULT_EXPLORER_URL: &str = "https://scan.rupaya.io";

/// Default listen address.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

/// Default disbursement, in ether units.
pub const DEFAULT_AMOUNT: &str = "0.1";

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is absent or empty.
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    /// A variable is present but unusable.
    #[error("Invalid value for {var}: {reason}")]
    Invalid {
        /// Variable name.
        var: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The `config` crate could not assemble or deserialize the values.
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),
}

impl ConfigError {
    /// Creates an invalid-value error.
    #[must_use]
    pub fn invalid(var: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            var,
            reason: reason.into(),
        }
    }
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// String whose contents never appear in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wraps a secret value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// Values as they arrive from the environment, before validation.
#[derive(Debug, Deserialize)]
struct RawConfig {
    faucet_private_key: Option<String>,
    rpc_url: Option<String>,
    hcaptcha_secret_key: Option<String>,
    recaptcha_secret_key: Option<String>,
    faucet_address: Option<String>,
    blockscout_api_url: String,
    captcha_provider: String,
    captcha_verify_url: Option<String>,
    faucet_listen_addr: String,
    faucet_amount: String,
    faucet_cooldown_secs: u64,
    fee_markup_percent: u64,
    chain_id: Option<u64>,
    http_timeout_ms: u64,
    confirmation_timeout_secs: u64,
    confirmation_poll_ms: u64,
    confirmations: usize,
    rpc_preflight_check: bool,
    balance_source: String,
    claim_rate_limit_per_minute: u32,
}

/// Faucet configuration.
#[derive(Debug, Clone)]
pub struct FaucetConfig {
    /// Hex private key of the funding account.
    pub private_key: Secret,
    /// JSON-RPC endpoint of the network.
    pub rpc_url: String,
    /// CAPTCHA provider.
    pub captcha_provider: CaptchaProvider,
    /// CAPTCHA server secret.
    pub captcha_secret: Secret,
    /// Verification endpoint override.
    pub captcha_verify_url: Option<String>,
    /// Address whose balance is reported.
    pub faucet_address: WalletAddress,
    /// Block explorer base URL.
    pub explorer_url: String,
    /// HTTP listen address.
    pub listen_addr: SocketAddr,
    /// Disbursement per claim, in wei.
    pub amount_wei: u128,
    /// Minimum time between claims for one address.
    pub cooldown: Duration,
    /// Markup applied to the network gas price.
    pub fee_markup: FeeMarkup,
    /// Expected chain id; read from the node when absent.
    pub chain_id: Option<u64>,
    /// Timeout for outbound HTTP calls.
    pub http_timeout_ms: u64,
    /// Confirmation wait parameters.
    pub confirmation: ConfirmationSettings,
    /// Whether to check node reachability before each transfer.
    pub rpc_preflight: bool,
    /// Which balance source is asked first.
    pub balance_source: BalancePreference,
    /// Claim requests allowed per client IP per minute; 0 disables.
    pub claim_rate_limit_per_minute: u32,
}

impl FaucetConfig {
    /// Loads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` naming the first absent required
    /// variable, or `ConfigError::Invalid` for an unusable value.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_vars(std::env::vars())
    }

    /// Loads configuration from the given name/value pairs.
    ///
    /// Unknown names are ignored.
    ///
    /// # Errors
    ///
    /// Same as [`FaucetConfig::from_env`].
    pub fn from_vars<I, K, V>(vars: I) -> ConfigResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut builder = config::Config::builder()
            .set_default("blockscout_api_url", DEFAULT_EXPLORER_URL)?
            .set_default("captcha_provider", CaptchaProvider::default().name())?
            .set_default("faucet_listen_addr", DEFAULT_LISTEN_ADDR)?
            .set_default("faucet_amount", DEFAULT_AMOUNT)?
            .set_default(
                "faucet_cooldown_secs",
                i64::try_from(crate::domain::services::CooldownPolicy::DEFAULT_WINDOW.as_secs())
                    .unwrap_or(i64::MAX),
            )?
            .set_default("fee_markup_percent", 120_i64)?
            .set_default("http_timeout_ms", 10_000_i64)?
            .set_default("confirmation_timeout_secs", 120_i64)?
            .set_default("confirmation_poll_ms", 2_000_i64)?
            .set_default("confirmations", 1_i64)?
            .set_default("rpc_preflight_check", true)?
            .set_default("balance_source", "chain")?
            .set_default("claim_rate_limit_per_minute", 0_i64)?;

        for (name, value) in vars {
            let name = name.as_ref();
            let value: String = value.into();
            if value.trim().is_empty() || !KNOWN_VARS.contains(&name) {
                continue;
            }
            builder = builder.set_override(name.to_ascii_lowercase(), value.trim())?;
        }

        let raw: RawConfig = builder.build()?.try_deserialize()?;
        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> ConfigResult<Self> {
        let private_key = raw
            .faucet_private_key
            .ok_or(ConfigError::Missing("FAUCET_PRIVATE_KEY"))?;
        let rpc_url = raw.rpc_url.ok_or(ConfigError::Missing("RPC_URL"))?;

        let captcha_provider: CaptchaProvider = raw
            .captcha_provider
            .parse()
            .map_err(|e: String| ConfigError::invalid("CAPTCHA_PROVIDER", e))?;
        let captcha_secret = match captcha_provider {
            CaptchaProvider::Hcaptcha => raw.hcaptcha_secret_key,
            CaptchaProvider::Recaptcha => raw.recaptcha_secret_key,
        }
        .ok_or(ConfigError::Missing(captcha_provider.secret_env_var()))?;

        let faucet_address: WalletAddress = raw
            .faucet_address
            .ok_or(ConfigError::Missing("FAUCET_ADDRESS"))?
            .parse()
            .map_err(|e: crate::domain::DomainError| {
                ConfigError::invalid("FAUCET_ADDRESS", e.to_string())
            })?;

        let listen_addr: SocketAddr = raw
            .faucet_listen_addr
            .parse()
            .map_err(|e: std::net::AddrParseError| {
                ConfigError::invalid("FAUCET_LISTEN_ADDR", e.to_string())
            })?;

        let amount_wei = parse_amount(&raw.faucet_amount)?;

        if raw.faucet_cooldown_secs == 0 {
            return Err(ConfigError::invalid("FAUCET_COOLDOWN_SECS", "must be positive"));
        }
        if raw.fee_markup_percent < 100 {
            return Err(ConfigError::invalid(
                "FEE_MARKUP_PERCENT",
                "must be at least 100",
            ));
        }
        if raw.confirmations == 0 {
            return Err(ConfigError::invalid("CONFIRMATIONS", "must be at least 1"));
        }

        let balance_source: BalancePreference = raw
            .balance_source
            .parse()
            .map_err(|e: String| ConfigError::invalid("BALANCE_SOURCE", e))?;

        Ok(Self {
            private_key: Secret::new(private_key),
            rpc_url,
            captcha_provider,
            captcha_secret: Secret::new(captcha_secret),
            captcha_verify_url: raw.captcha_verify_url,
            faucet_address,
            explorer_url: raw.blockscout_api_url,
            listen_addr,
            amount_wei,
            cooldown: Duration::from_secs(raw.faucet_cooldown_secs),
            fee_markup: FeeMarkup::new(raw.fee_markup_percent),
            chain_id: raw.chain_id,
            http_timeout_ms: raw.http_timeout_ms,
            confirmation: ConfirmationSettings {
                confirmations: raw.confirmations,
                poll_interval: Duration::from_millis(raw.confirmation_poll_ms),
                timeout: Duration::from_secs(raw.confirmation_timeout_secs),
            },
            rpc_preflight: raw.rpc_preflight_check,
            balance_source,
            claim_rate_limit_per_minute: raw.claim_rate_limit_per_minute,
        })
    }
}

/// Parses an ether-denominated amount into wei.
fn parse_amount(value: &str) -> ConfigResult<u128> {
    let wei = ethers::utils::parse_ether(value)
        .map_err(|e| ConfigError::invalid("FAUCET_AMOUNT", e.to_string()))?;
    let wei = u128::try_from(wei)
        .map_err(|_| ConfigError::invalid("FAUCET_AMOUNT", "amount too large"))?;
    if wei == 0 {
        return Err(ConfigError::invalid("FAUCET_AMOUNT", "must be positive"));
    }
    Ok(wei)
}
