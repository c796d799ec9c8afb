//! # Claim Entities
//!
//! The claim request as received over HTTP, its validated form, the
//! receipt of a completed disbursement, and the per-claimant record kept
//! by the cooldown store.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{Timestamp, WalletAddress};
use serde::{Deserialize, Serialize};

/// Raw claim request body.
///
/// Both fields are optional at the wire level so that an absent field is
/// reported as a validation failure rather than a body parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClaimRequest {
    /// Claimant wallet address.
    #[serde(default)]
    pub wallet_address: Option<String>,
    /// Token produced by the CAPTCHA widget.
    #[serde(default)]
    pub captcha_token: Option<String>,
}

impl ClaimRequest {
    /// Creates a request with both fields set.
    #[must_use]
    pub fn new(wallet_address: impl Into<String>, captcha_token: impl Into<String>) -> Self {
        Self {
            wallet_address: Some(wallet_address.into()),
            captcha_token: Some(captcha_token.into()),
        }
    }

    /// Checks presence of both fields and parses the wallet address.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::MissingField`] if a field is absent or blank,
    /// or [`DomainError::InvalidAddress`] if the address does not parse.
    pub fn validate(&self) -> DomainResult<ValidatedClaim> {
        let wallet_address = non_blank(self.wallet_address.as_deref())
            .ok_or(DomainError::missing_field("walletAddress"))?;
        let captcha_token = non_blank(self.captcha_token.as_deref())
            .ok_or(DomainError::missing_field("captchaToken"))?;

        Ok(ValidatedClaim {
            address: wallet_address.parse()?,
            captcha_token: captcha_token.to_string(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

/// A claim request that passed shape validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedClaim {
    /// Parsed claimant address.
    pub address: WalletAddress,
    /// CAPTCHA token to verify.
    pub captcha_token: String,
}

/// Outcome of a confirmed disbursement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimReceipt {
    /// Recipient.
    pub address: WalletAddress,
    /// Hash of the confirmed transfer.
    pub tx_hash: String,
    /// Block the transfer was included in.
    pub block_number: u64,
    /// Amount sent, in wei.
    pub amount_wei: u128,
    /// Server time at which confirmation was observed.
    pub claimed_at: Timestamp,
}

/// Per-claimant bookkeeping held by the cooldown store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimantRecord {
    /// Time of the last confirmed claim, if any.
    pub last_claim: Option<Timestamp>,
    /// Set while a claim for this address is between reservation and
    /// completion.
    pub in_flight: bool,
}

impl ClaimantRecord {
    /// Returns true if the record carries no information worth keeping.
    #[must_use]
    pub fn is_vacant(&self) -> bool {
        self.last_claim.is_none() && !self.in_flight
    }
}
