//! Contract interaction heuristics.
//!
//! Probes whether recent counterparties are smart contracts and whether
//! those contracts are source-verified. The probe set is bounded to the
//! most recent distinct counterparties to cap external calls. Individual
//! probe failures degrade the finding instead of failing it; an
//! unreachable metadata lookup counts the contract as unverified.

use crate::address::WalletAddress;
use crate::chain::{ChainDataSource, TransferRecord};
use crate::types::{AnalyzerFinding, FindingDetail};
use std::collections::HashSet;
use tracing::debug;

const WEIGHT_PER_UNVERIFIED: u32 = 8;
const WEIGHT_UNVERIFIED_MAJORITY: u32 = 20;

/// Conservative default when history could not be fetched.
const SCORE_UNAVAILABLE: u8 = 20;

#[derive(Debug, Clone, Copy)]
pub struct ContractInteractionAnalyzer {
    sample_limit: usize,
}

impl ContractInteractionAnalyzer {
    pub fn new(sample_limit: usize) -> Self {
        Self { sample_limit }
    }

    pub async fn analyze(
        &self,
        owner: &WalletAddress,
        history: Option<&[TransferRecord]>,
        chain: &dyn ChainDataSource,
    ) -> AnalyzerFinding {
        let Some(history) = history else {
            return AnalyzerFinding {
                score: SCORE_UNAVAILABLE,
                flags: vec![
                    "Transaction history unavailable; contract interactions unknown".to_string(),
                ],
                degraded: true,
                detail: FindingDetail::Contracts {
                    sampled: 0,
                    verified: 0,
                    unverified: 0,
                },
            };
        };

        // Most recent distinct counterparties, newest first.
        let owner_key = owner.as_str();
        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        for transfer in history.iter().rev() {
            let cp = transfer.counterparty(owner_key);
            if cp.is_empty() || cp == owner_key {
                continue;
            }
            if seen.insert(cp.to_string()) {
                candidates.push(cp.to_string());
                if candidates.len() >= self.sample_limit {
                    break;
                }
            }
        }

        let mut verified = 0usize;
        let mut unverified = 0usize;
        let mut degraded = false;

        for candidate in &candidates {
            let Ok(address) = WalletAddress::parse(candidate) else {
                debug!(counterparty = %candidate, "Skipping unparseable counterparty");
                continue;
            };

            match chain.has_code(&address).await {
                Ok(false) => continue,
                Ok(true) => match chain.contract_metadata(&address).await {
                    Ok(metadata) if metadata.is_verified => verified += 1,
                    Ok(_) => unverified += 1,
                    Err(e) => {
                        // Unknown verification status is counted as
                        // unverified, the cautious reading.
                        debug!(counterparty = %address, error = %e, "Contract metadata probe failed");
                        unverified += 1;
                        degraded = true;
                    }
                },
                Err(e) => {
                    debug!(counterparty = %address, error = %e, "Bytecode probe failed");
                    degraded = true;
                }
            }
        }

        let mut score = WEIGHT_PER_UNVERIFIED * unverified as u32;
        let mut flags = Vec::new();

        if unverified > 0 {
            flags.push(format!(
                "Interacted with {} unverified contract{}",
                unverified,
                if unverified == 1 { "" } else { "s" }
            ));
        }

        if unverified > verified && unverified > 0 {
            score += WEIGHT_UNVERIFIED_MAJORITY;
            flags.push("Unverified contract interactions outnumber verified ones".to_string());
        }

        if degraded {
            flags.push("Some contract probes failed; counts may be incomplete".to_string());
        }

        AnalyzerFinding {
            score: score.min(100) as u8,
            flags,
            degraded,
            detail: FindingDetail::Contracts {
                sampled: candidates.len(),
                verified,
                unverified,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::ContractMetadata;
    use crate::error::{Result, ScreeningError};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const OWNER: &str = "0x1111111111111111111111111111111111111111";

    struct StubChain {
        /// address -> (has_code, is_verified)
        contracts: HashMap<String, (bool, bool)>,
        probes: AtomicUsize,
        fail_metadata: bool,
    }

    impl StubChain {
        fn new(contracts: HashMap<String, (bool, bool)>) -> Self {
            Self {
                contracts,
                probes: AtomicUsize::new(0),
                fail_metadata: false,
            }
        }
    }

    #[async_trait]
    impl ChainDataSource for StubChain {
        async fn transactions(&self, _address: &WalletAddress) -> Result<Vec<TransferRecord>> {
            Ok(vec![])
        }

        async fn native_balance(&self, _address: &WalletAddress) -> Result<u128> {
            Ok(0)
        }

        async fn has_code(&self, address: &WalletAddress) -> Result<bool> {
            self.probes.fetch_add(1, Ordering::SeqCst);
            Ok(self
                .contracts
                .get(address.as_str())
                .map(|(has_code, _)| *has_code)
                .unwrap_or(false))
        }

        async fn contract_metadata(&self, address: &WalletAddress) -> Result<ContractMetadata> {
            if self.fail_metadata {
                return Err(ScreeningError::Upstream("metadata down".to_string()));
            }
            let verified = self
                .contracts
                .get(address.as_str())
                .map(|(_, verified)| *verified)
                .unwrap_or(false);
            Ok(ContractMetadata {
                is_verified: verified,
                name: None,
                compiler_version: None,
            })
        }
    }

    fn owner() -> WalletAddress {
        WalletAddress::parse(OWNER).unwrap()
    }

    fn tx_with(counterparty: &str, timestamp: u64) -> TransferRecord {
        TransferRecord {
            from: OWNER.to_string(),
            to: counterparty.to_string(),
            value_wei: 1,
            timestamp,
            contract_address: None,
        }
    }

    fn cp(i: u64) -> String {
        format!("0x4{:039x}", i)
    }

    #[tokio::test]
    async fn test_unverified_majority_scores_sharply() {
        let mut contracts = HashMap::new();
        contracts.insert(cp(1), (true, false));
        contracts.insert(cp(2), (true, false));
        contracts.insert(cp(3), (true, true));
        let chain = StubChain::new(contracts);

        let history: Vec<_> = (1..=3).map(|i| tx_with(&cp(i), i)).collect();
        let finding = ContractInteractionAnalyzer::new(10)
            .analyze(&owner(), Some(&history), &chain)
            .await;

        // 2 unverified * 8 + 20 majority penalty
        assert_eq!(finding.score, 36);
        assert!(finding
            .flags
            .iter()
            .any(|f| f.contains("outnumber verified")));
    }

    #[tokio::test]
    async fn test_eoa_counterparties_score_zero() {
        let chain = StubChain::new(HashMap::new());
        let history: Vec<_> = (1..=4).map(|i| tx_with(&cp(i), i)).collect();
        let finding = ContractInteractionAnalyzer::new(10)
            .analyze(&owner(), Some(&history), &chain)
            .await;
        assert_eq!(finding.score, 0);
        assert!(finding.flags.is_empty());
    }

    #[tokio::test]
    async fn test_sample_is_bounded_and_deduplicated() {
        let chain = StubChain::new(HashMap::new());
        // 30 transfers over 15 distinct counterparties
        let mut history = Vec::new();
        for i in 0..30u64 {
            history.push(tx_with(&cp(i % 15), i));
        }

        let analyzer = ContractInteractionAnalyzer::new(10);
        let finding = analyzer.analyze(&owner(), Some(&history), &chain).await;

        match finding.detail {
            FindingDetail::Contracts { sampled, .. } => assert_eq!(sampled, 10),
            _ => panic!("wrong detail variant"),
        }
        // One bytecode probe per sampled counterparty
        assert_eq!(chain.probes.load(Ordering::SeqCst), 10);
    }

    #[tokio::test]
    async fn test_metadata_failure_counts_as_unverified_and_degrades() {
        let mut contracts = HashMap::new();
        contracts.insert(cp(1), (true, true));
        let mut chain = StubChain::new(contracts);
        chain.fail_metadata = true;

        let history = vec![tx_with(&cp(1), 1)];
        let finding = ContractInteractionAnalyzer::new(10)
            .analyze(&owner(), Some(&history), &chain)
            .await;

        assert!(finding.degraded);
        match finding.detail {
            FindingDetail::Contracts { unverified, .. } => assert_eq!(unverified, 1),
            _ => panic!("wrong detail variant"),
        }
    }

    #[tokio::test]
    async fn test_unavailable_history_is_degraded() {
        let chain = StubChain::new(HashMap::new());
        let finding = ContractInteractionAnalyzer::new(10)
            .analyze(&owner(), None, &chain)
            .await;
        assert!(finding.degraded);
        assert_eq!(finding.score, 20);
    }
}
