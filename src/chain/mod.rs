//! Chain data source abstraction.
//!
//! The screening engine pulls on-chain signals through [`ChainDataSource`];
//! the concrete adapter in [`explorer`] talks to an Etherscan-style HTTP
//! API, and [`cached`] wraps any source with a short-TTL micro-cache so the
//! analyzers of one screening share a single upstream fetch.
//!
//! Transport failures are [`ScreeningError::Upstream`]; "no data" is an
//! empty `Ok`: a wallet with no history is a signal, not an error.

pub mod cached;
pub mod explorer;

use crate::address::WalletAddress;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

#[allow(unused_imports)]
use crate::error::ScreeningError;

/// One native-token transfer touching the screened address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRecord {
    /// Sender, canonical lowercase form
    pub from: String,
    /// Recipient, canonical lowercase form
    pub to: String,
    pub value_wei: u128,
    /// Unix seconds
    pub timestamp: u64,
    /// Set when the transfer created or targeted a contract
    pub contract_address: Option<String>,
}

impl TransferRecord {
    /// The other side of the transfer, from the owner's perspective.
    pub fn counterparty(&self, owner: &str) -> &str {
        if self.from == owner { &self.to } else { &self.from }
    }
}

/// Source-verification metadata for a contract address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractMetadata {
    pub is_verified: bool,
    pub name: Option<String>,
    pub compiler_version: Option<String>,
}

/// On-chain signals required by the screening engine.
///
/// Implementations must return transfers in chronological order and must
/// not error for an address that simply has no data.
#[async_trait]
pub trait ChainDataSource: Send + Sync {
    /// Full transfer history, oldest first. Empty for unused wallets.
    async fn transactions(&self, address: &WalletAddress) -> Result<Vec<TransferRecord>>;

    /// Current native-token balance in wei.
    async fn native_balance(&self, address: &WalletAddress) -> Result<u128>;

    /// Contract detection via bytecode presence.
    async fn has_code(&self, address: &WalletAddress) -> Result<bool>;

    /// Source-verification metadata for a contract.
    async fn contract_metadata(&self, address: &WalletAddress) -> Result<ContractMetadata>;

    /// Whether the address has ever transacted with any member of `targets`
    /// (canonical lowercase forms).
    async fn has_interacted_with(
        &self,
        address: &WalletAddress,
        targets: &HashSet<String>,
    ) -> Result<bool> {
        let transfers = self.transactions(address).await?;
        let owner = address.as_str();
        Ok(transfers
            .iter()
            .any(|t| targets.contains(t.counterparty(owner))))
    }
}

#[async_trait]
impl<T: ChainDataSource + ?Sized> ChainDataSource for Arc<T> {
    async fn transactions(&self, address: &WalletAddress) -> Result<Vec<TransferRecord>> {
        self.as_ref().transactions(address).await
    }

    async fn native_balance(&self, address: &WalletAddress) -> Result<u128> {
        self.as_ref().native_balance(address).await
    }

    async fn has_code(&self, address: &WalletAddress) -> Result<bool> {
        self.as_ref().has_code(address).await
    }

    async fn contract_metadata(&self, address: &WalletAddress) -> Result<ContractMetadata> {
        self.as_ref().contract_metadata(address).await
    }

    async fn has_interacted_with(
        &self,
        address: &WalletAddress,
        targets: &HashSet<String>,
    ) -> Result<bool> {
        self.as_ref().has_interacted_with(address, targets).await
    }
}
