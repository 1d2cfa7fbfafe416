use crate::lists::{ListMetadata, SanctionsList};
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Well-known mixer and privacy-pool contract addresses.
///
/// Any wallet that has ever transacted with one of these is treated as a
/// high-risk counterparty. The built-in set covers the Tornado Cash
/// deployments that dominate mixer volume on EVM chains.
static KNOWN_MIXERS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        // Tornado Cash proxy/router
        "0x722122df12d4e14e13ac3b6895a86e84145b6967",
        "0xd90e2f925da726b50c4ed8d0fb90ad053324f31b",
        // Tornado Cash ETH pools (0.1, 1, 10, 100)
        "0x12d66f87a04a9e220743712ce6d9bb1b5616b8fc",
        "0x47ce0c6ed5b0ce3d3a51fdb1c52dc66a7c3c2936",
        "0x910cbd523d972eb0a6f4cae4618ad62622b39dbf",
        "0xa160cdab225685da1d56aa342ad8841c3b53f291",
        // Tornado Cash DAI pools
        "0xd4b88df4d29f5cedd6857912842cff3b20c8cfa3",
        "0xfd8610d20aa15b7b2e3be39b396a1bc3516c7144",
    ]
});

/// Registry of known mixer contracts.
///
/// Ships with a built-in set and accepts additional entries for deployments
/// that track chain-specific pools.
#[derive(Debug, Clone)]
pub struct MixerRegistry {
    addresses: HashSet<String>,
}

impl MixerRegistry {
    /// Registry seeded with the built-in mixer set.
    pub fn with_defaults() -> Self {
        let addresses = KNOWN_MIXERS.iter().map(|a| a.to_string()).collect();
        Self { addresses }
    }

    pub fn empty() -> Self {
        Self {
            addresses: HashSet::new(),
        }
    }

    /// Register an additional mixer contract address.
    pub fn insert(&mut self, address: &str) {
        let normalized = address.to_lowercase().trim().to_string();
        if !normalized.is_empty() {
            self.addresses.insert(normalized);
        }
    }

    /// The full address set, for interaction checks against transaction history.
    pub fn address_set(&self) -> &HashSet<String> {
        &self.addresses
    }
}

impl SanctionsList for MixerRegistry {
    fn is_listed(&self, address: &str) -> bool {
        self.addresses.contains(&address.to_lowercase().trim().to_string())
    }

    fn metadata(&self) -> ListMetadata {
        ListMetadata {
            name: "known_mixers".to_string(),
            record_count: self.addresses.len(),
            last_updated: None,
            checksum: None,
            source: "built-in".to_string(),
        }
    }

    fn total_addresses(&self) -> usize {
        self.addresses.len()
    }
}
