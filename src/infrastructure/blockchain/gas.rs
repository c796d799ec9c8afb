//! # Gas Pricing
//!
//! Legacy gas price handling for faucet transfers.
//!
//! The faucet pays a flat markup over the node's reported `eth_gasPrice`
//! so that its transfers are picked up promptly without modelling the fee
//! market.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Gas price in wei for a legacy transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GasPrice(u128);

impl GasPrice {
    /// Creates a gas price from wei.
    #[must_use]
    pub const fn from_wei(wei: u128) -> Self {
        Self(wei)
    }

    /// Returns the price in wei.
    #[inline]
    #[must_use]
    pub const fn as_wei(&self) -> u128 {
        self.0
    }
}

impl fmt::Display for GasPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} wei", self.0)
    }
}

/// Percentage applied to the network gas price.
///
/// # Examples
///
/// ```
/// use rupx_faucet::infrastructure::blockchain::gas::{FeeMarkup, GasPrice};
///
/// let markup = FeeMarkup::default();
/// assert_eq!(markup.apply(GasPrice::from_wei(1_000_000_001)).as_wei(), 1_200_000_001);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeMarkup {
    percent: u64,
}

impl FeeMarkup {
    /// Default markup: 120% of the reported price.
    pub const DEFAULT_PERCENT: u64 = 120;

    /// Creates a markup of `percent` percent of the base price.
    #[must_use]
    pub const fn new(percent: u64) -> Self {
        Self { percent }
    }

    /// Returns the configured percentage.
    #[must_use]
    pub const fn percent(&self) -> u64 {
        self.percent
    }

    /// Applies the markup: `base * percent / 100`, truncating.
    ///
    /// Saturates instead of overflowing on absurd inputs.
    #[must_use]
    pub const fn apply(&self, base: GasPrice) -> GasPrice {
        GasPrice(base.0.saturating_mul(self.percent as u128) / 100)
    }
}

impl Default for FeeMarkup {
    fn default() -> Self {
        Self::new(Self::DEFAULT_PERCENT)
    }
}
