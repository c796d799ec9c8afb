//! # Wallet Address
//!
//! Validated EVM account address of a claimant or of the faucet itself.
//!
//! # Examples
//!
//! ```
//! use rupx_faucet::domain::value_objects::wallet_address::WalletAddress;
//!
//! let upper: WalletAddress = "0x18E5B3DEE30232CB8A83E4883E17DF34D79E7296".parse().unwrap();
//! let mixed: WalletAddress = "0x18e5b3dee30232CB8a83e4883E17df34d79E7296".parse().unwrap();
//!
//! assert_eq!(upper.cooldown_key(), mixed.cooldown_key());
//! assert_eq!(upper, mixed);
//! ```

use crate::domain::errors::DomainError;
use ethers::types::Address;
use ethers::utils::to_checksum;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of hex digits in a 20-byte address.
const ADDRESS_HEX_LEN: usize = 40;

/// A 20-byte EVM address.
///
/// Equality and hashing are byte-wise, so two spellings that differ only
/// in letter case are the same address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WalletAddress(Address);

impl WalletAddress {
    /// Wraps an already-parsed ethers address.
    #[must_use]
    pub const fn new(address: Address) -> Self {
        Self(address)
    }

    /// Returns the underlying ethers address.
    #[inline]
    #[must_use]
    pub const fn as_address(&self) -> Address {
        self.0
    }

    /// Lowercase `0x`-prefixed hex form used to key cooldown records.
    #[must_use]
    pub fn cooldown_key(&self) -> String {
        format!("{:#x}", self.0)
    }

    /// EIP-55 mixed-case checksum form.
    #[must_use]
    pub fn to_checksum(&self) -> String {
        to_checksum(&self.0, None)
    }
}

impl FromStr for WalletAddress {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| DomainError::invalid_address(s, "missing 0x prefix"))?;

        if hex.len() != ADDRESS_HEX_LEN {
            return Err(DomainError::invalid_address(
                s,
                format!("expected {} hex digits, got {}", ADDRESS_HEX_LEN, hex.len()),
            ));
        }

        hex.parse::<Address>()
            .map(Self)
            .map_err(|_| DomainError::invalid_address(s, "not a hex string"))
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl From<Address> for WalletAddress {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

impl Serialize for WalletAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_checksum())
    }
}

impl<'de> Deserialize<'de> for WalletAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
