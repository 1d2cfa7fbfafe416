//! Short-TTL caching decorator over any [`ChainDataSource`].
//!
//! One screening fans out five analyzers over the same address; the mixer
//! check re-reads the transaction history and the contract analyzer probes
//! counterparties. This decorator keeps those reads off the wire within a
//! small window. Only successful responses are cached; a failure is
//! retried on the next call.

use crate::address::WalletAddress;
use crate::chain::{ChainDataSource, ContractMetadata, TransferRecord};
use crate::error::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::{Duration, Instant};

struct TimedEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V: Clone> TimedEntry<V> {
    fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn live(&self) -> Option<V> {
        (self.expires_at > Instant::now()).then(|| self.value.clone())
    }
}

pub struct CachedChainSource<S> {
    inner: S,
    ttl: Duration,
    transactions: DashMap<String, TimedEntry<Vec<TransferRecord>>>,
    balances: DashMap<String, TimedEntry<u128>>,
    code: DashMap<String, TimedEntry<bool>>,
    metadata: DashMap<String, TimedEntry<ContractMetadata>>,
}

impl<S: ChainDataSource> CachedChainSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            transactions: DashMap::new(),
            balances: DashMap::new(),
            code: DashMap::new(),
            metadata: DashMap::new(),
        }
    }

    fn lookup<V: Clone>(map: &DashMap<String, TimedEntry<V>>, key: &str) -> Option<V> {
        // Bind before matching: the shard guard from `get` must be dropped
        // before `remove` touches the same shard.
        let live = map.get(key).and_then(|entry| entry.live());
        if live.is_none() {
            map.remove(key);
        }
        live
    }
}

#[async_trait]
impl<S: ChainDataSource> ChainDataSource for CachedChainSource<S> {
    async fn transactions(&self, address: &WalletAddress) -> Result<Vec<TransferRecord>> {
        let key = address.as_str();
        if let Some(hit) = Self::lookup(&self.transactions, key) {
            return Ok(hit);
        }

        let fresh = self.inner.transactions(address).await?;
        self.transactions
            .insert(key.to_string(), TimedEntry::new(fresh.clone(), self.ttl));
        Ok(fresh)
    }

    async fn native_balance(&self, address: &WalletAddress) -> Result<u128> {
        let key = address.as_str();
        if let Some(hit) = Self::lookup(&self.balances, key) {
            return Ok(hit);
        }

        let fresh = self.inner.native_balance(address).await?;
        self.balances
            .insert(key.to_string(), TimedEntry::new(fresh, self.ttl));
        Ok(fresh)
    }

    async fn has_code(&self, address: &WalletAddress) -> Result<bool> {
        let key = address.as_str();
        if let Some(hit) = Self::lookup(&self.code, key) {
            return Ok(hit);
        }

        let fresh = self.inner.has_code(address).await?;
        self.code
            .insert(key.to_string(), TimedEntry::new(fresh, self.ttl));
        Ok(fresh)
    }

    async fn contract_metadata(&self, address: &WalletAddress) -> Result<ContractMetadata> {
        let key = address.as_str();
        if let Some(hit) = Self::lookup(&self.metadata, key) {
            return Ok(hit);
        }

        let fresh = self.inner.contract_metadata(address).await?;
        self.metadata
            .insert(key.to_string(), TimedEntry::new(fresh.clone(), self.ttl));
        Ok(fresh)
    }
}
