//! Validated wallet address with a canonical cache-key form.

use crate::error::ScreeningError;
use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A validated 20-byte wallet address.
///
/// The canonical form is lowercase `0x`-prefixed hex; this is the only form
/// ever used as a cache or list key, so lookups are case-insensitive by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Parse and normalize an address. Fails with
    /// [`ScreeningError::InvalidAddress`] on anything that is not 20 bytes
    /// of hex.
    pub fn parse(input: &str) -> Result<Self, ScreeningError> {
        let trimmed = input.trim();
        let parsed = Address::from_str(trimmed)
            .map_err(|_| ScreeningError::InvalidAddress(input.to_string()))?;
        Ok(Self(format!("0x{}", hex::encode(parsed.as_slice()))))
    }

    /// Canonical lowercase form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0[2..].bytes().all(|b| b == b'0')
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for WalletAddress {
    type Err = ScreeningError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
