//! The screening service: cache-fronted analyzer fan-out plus batch
//! coordination.
//!
//! Control flow for one address: cache probe (unless bypassed) → concurrent
//! fan-out of the five analyzers over one shared chain-data fetch → join →
//! aggregation → write-through cache → result. Batch screening drives the
//! same path in fixed-size waves with a throttling delay between them, so
//! third-party rate limits see bounded concurrency rather than a thundering
//! herd.
//!
//! The whole pipeline runs under a hard deadline; an expired deadline
//! degrades the screening instead of failing it. For a syntactically valid
//! address there is no fatal error path.

use crate::address::WalletAddress;
use crate::aggregator::RiskAggregator;
use crate::analyzers::{
    BalancePatternAnalyzer, ContractInteractionAnalyzer, SanctionsAnalyzer,
    TransactionHistoryAnalyzer, WalletAgeAnalyzer,
};
use crate::cache::{CacheStats, ScreeningCache, TtlCache};
use crate::chain::cached::CachedChainSource;
use crate::chain::ChainDataSource;
use crate::config::ScreeningConfig;
use crate::error::{Result, ScreeningError};
use crate::types::{RiskBreakdown, SanctionsFinding, ScreeningAction, ScreeningResult};
use chrono::Utc;
use payscreen_sanctions::{
    AuditEvent, AuditLogger, AuditOutcome, Blacklist, ListMetadata, MixerRegistry, RegulatorList,
    SanctionsList, ScamDatabase,
};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

/// Wallet risk screening engine.
///
/// Cheap to clone: all state is behind `Arc`s, and batch waves clone it
/// into their per-address tasks.
#[derive(Clone)]
pub struct WalletScreener {
    chain: Arc<dyn ChainDataSource>,
    aggregator: RiskAggregator,
    sanctions: SanctionsAnalyzer,
    contracts: ContractInteractionAnalyzer,
    screening_cache: Arc<ScreeningCache>,
    sanctions_cache: Arc<TtlCache<SanctionsFinding>>,
    audit: Arc<AuditLogger>,
    config: Arc<ScreeningConfig>,
}

impl WalletScreener {
    /// Engine with the given data source and configuration. Use
    /// [`WalletScreener::builder`] to inject lists, a scam database, or an
    /// audit logger.
    pub fn new(chain: Arc<dyn ChainDataSource>, config: ScreeningConfig) -> Result<Self> {
        WalletScreenerBuilder::new()
            .with_chain_source(chain)
            .with_config(config)
            .build()
    }

    pub fn builder() -> WalletScreenerBuilder {
        WalletScreenerBuilder::new()
    }

    // ========================================================================
    // Single-address screening
    // ========================================================================

    /// Screen one wallet address.
    ///
    /// Fails only on malformed input. `skip_cache` bypasses the screening
    /// cache; the sanctions sub-check keeps its own longer-lived cache and
    /// may still be served from it.
    pub async fn screen_wallet(&self, address: &str, skip_cache: bool) -> Result<ScreeningResult> {
        let addr = WalletAddress::parse(address)?;
        let key = addr.as_str().to_string();

        if !skip_cache {
            if let Some(hit) = self.screening_cache.get(&key).await {
                debug!(address = %key, "Screening served from cache");
                return Ok(hit);
            }
        }

        let result = match timeout(self.config.deadline(), self.run_pipeline(&addr)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(address = %key, "Screening deadline expired; emitting degraded result");
                self.degraded_result(&addr).await
            }
        };

        self.audit_result(&result);
        // A complete upstream blackout carries no signal worth memoizing;
        // leaving it uncached lets the next call retry immediately.
        if !result.breakdown.fully_degraded() {
            self.screening_cache.insert(key, result.clone()).await;
        }
        Ok(result)
    }

    /// One full pipeline run: shared fetch, concurrent analyzer fan-out,
    /// join, aggregate. Never fails; unavailable data degrades findings.
    async fn run_pipeline(&self, addr: &WalletAddress) -> ScreeningResult {
        let (history, balance) = tokio::join!(
            self.chain.transactions(addr),
            self.chain.native_balance(addr)
        );

        let history = match history {
            Ok(history) => Some(history),
            Err(e) => {
                warn!(address = %addr, error = %e, "Transaction history fetch failed");
                None
            }
        };
        let balance = match balance {
            Ok(balance) => Some(balance),
            Err(e) => {
                warn!(address = %addr, error = %e, "Balance fetch failed");
                None
            }
        };

        let now = Utc::now();
        let history_ref = history.as_deref();

        // Fan-out/fan-in: no analyzer observes another's output, and
        // aggregation sees all five findings or none.
        let (wallet_age, history_finding, balance_finding, contracts, sanctions) = tokio::join!(
            async { WalletAgeAnalyzer.analyze(history_ref, now) },
            async { TransactionHistoryAnalyzer.analyze(addr, history_ref, now) },
            async { BalancePatternAnalyzer.analyze(addr, balance, history_ref) },
            self.contracts.analyze(addr, history_ref, &*self.chain),
            self.sanctions_checked(addr),
        );

        let breakdown = RiskBreakdown {
            wallet_age,
            history: history_finding,
            balance: balance_finding,
            contracts,
            sanctions,
        };

        self.aggregator.aggregate(addr.clone(), breakdown, now)
    }

    /// Sanctions decision, memoized separately with a longer TTL since
    /// sanctions status changes far less often than activity signals.
    /// Degraded decisions are not memoized, so the next screening retries.
    async fn sanctions_checked(&self, addr: &WalletAddress) -> SanctionsFinding {
        let key = addr.as_str();
        if let Some(hit) = self.sanctions_cache.get(key).await {
            debug!(address = %key, "Sanctions decision served from cache");
            return hit;
        }

        let finding = self.sanctions.analyze(addr, &*self.chain).await;
        if !finding.degraded {
            self.sanctions_cache
                .insert(key.to_string(), finding.clone())
                .await;
        }
        finding
    }

    /// All-degraded screening for a pipeline that hit its deadline.
    async fn degraded_result(&self, addr: &WalletAddress) -> ScreeningResult {
        let now = Utc::now();
        let mut sanctions = SanctionsFinding::clean();
        sanctions.degraded = true;
        sanctions.reason =
            "Sanctions checks did not complete before the screening deadline".to_string();

        let breakdown = RiskBreakdown {
            wallet_age: WalletAgeAnalyzer.analyze(None, now),
            history: TransactionHistoryAnalyzer.analyze(addr, None, now),
            balance: BalancePatternAnalyzer.analyze(addr, None, None),
            contracts: self.contracts.analyze(addr, None, &*self.chain).await,
            sanctions,
        };

        self.aggregator.aggregate(addr.clone(), breakdown, now)
    }

    fn audit_result(&self, result: &ScreeningResult) {
        let outcome = match result.action {
            ScreeningAction::Block => AuditOutcome::Block,
            ScreeningAction::Warn => AuditOutcome::Warn,
            ScreeningAction::Proceed => AuditOutcome::Proceed,
        };
        self.audit.log_event(AuditEvent {
            timestamp: result.screened_at,
            address: result.address.to_string(),
            score: result.score,
            tier: result.tier.to_string(),
            outcome,
            sanctions_source: result
                .breakdown
                .sanctions
                .is_sanctioned
                .then(|| result.breakdown.sanctions.source.to_string()),
            degraded: result.breakdown.any_degraded(),
        });
    }

    // ========================================================================
    // Batch screening
    // ========================================================================

    /// Screen a bounded list of addresses in fixed-size waves.
    ///
    /// Within a wave all addresses run concurrently; a throttling delay
    /// separates waves. One address failing does not abort the batch: it is
    /// logged and omitted, and the map holds only successes, keyed by the
    /// canonical address form. Completion order across addresses is
    /// unspecified.
    pub async fn batch_screen(
        &self,
        addresses: &[String],
    ) -> Result<HashMap<String, ScreeningResult>> {
        let limit = self.config.batch.max_addresses;
        if addresses.len() > limit {
            return Err(ScreeningError::BatchLimitExceeded {
                requested: addresses.len(),
                limit,
            });
        }

        let mut results = HashMap::new();
        let waves: Vec<&[String]> = addresses.chunks(self.config.batch.wave_size).collect();
        let wave_count = waves.len();

        for (index, wave) in waves.into_iter().enumerate() {
            debug!(
                wave = index + 1,
                waves = wave_count,
                size = wave.len(),
                "Screening batch wave"
            );

            let mut handles = Vec::with_capacity(wave.len());
            for address in wave {
                let screener = self.clone();
                let address = address.clone();
                handles.push(tokio::spawn(async move {
                    let outcome = screener.screen_wallet(&address, false).await;
                    (address, outcome)
                }));
            }

            for handle in handles {
                match handle.await {
                    Ok((address, Ok(result))) => {
                        if result.breakdown.fully_degraded() {
                            warn!(
                                address = %address,
                                "Screening produced no usable signals; omitting from batch results"
                            );
                            continue;
                        }
                        results.insert(result.address.as_str().to_string(), result);
                    }
                    Ok((address, Err(e))) => {
                        warn!(address = %address, error = %e, "Skipping address in batch");
                    }
                    Err(e) => {
                        warn!(error = %e, "Batch screening task failed");
                    }
                }
            }

            if index + 1 < wave_count {
                sleep(self.config.wave_delay()).await;
            }
        }

        Ok(results)
    }

    // ========================================================================
    // Cache and list management
    // ========================================================================

    /// Evict one address, or flush everything. Point eviction also drops
    /// the memoized sanctions decision for that address.
    pub async fn clear_cache(&self, address: Option<&str>) -> Result<()> {
        match address {
            Some(address) => {
                let addr = WalletAddress::parse(address)?;
                self.screening_cache.remove(addr.as_str()).await;
                self.sanctions_cache.remove(addr.as_str()).await;
            }
            None => {
                self.screening_cache.clear().await;
                self.sanctions_cache.clear().await;
            }
        }
        Ok(())
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.screening_cache.stats().await
    }

    /// Drop expired entries from both caches. Returns how many were purged.
    pub async fn purge_expired(&self) -> usize {
        self.screening_cache.purge_expired().await + self.sanctions_cache.purge_expired().await
    }

    /// Blacklist an address. Cached decisions for it are evicted so the
    /// next screening reflects the new entry immediately.
    pub async fn add_to_blacklist(&self, address: &str, reason: &str) -> Result<()> {
        let addr = WalletAddress::parse(address)?;
        self.sanctions.blacklist().insert(addr.as_str(), reason);
        self.screening_cache.remove(addr.as_str()).await;
        self.sanctions_cache.remove(addr.as_str()).await;
        Ok(())
    }

    pub async fn remove_from_blacklist(&self, address: &str) -> Result<()> {
        let addr = WalletAddress::parse(address)?;
        self.sanctions.blacklist().remove(addr.as_str());
        self.screening_cache.remove(addr.as_str()).await;
        self.sanctions_cache.remove(addr.as_str()).await;
        Ok(())
    }

    /// Metadata for every loaded list, for observability.
    pub fn list_metadata(&self) -> Vec<ListMetadata> {
        vec![
            self.sanctions.regulator().metadata(),
            self.sanctions.blacklist().metadata(),
            self.sanctions.mixers().metadata(),
        ]
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`WalletScreener`] instances.
///
/// Every dependency is constructor-injected so tests can run isolated
/// engines instead of sharing process-wide state.
pub struct WalletScreenerBuilder {
    chain: Option<Arc<dyn ChainDataSource>>,
    scam_db: Option<Arc<dyn ScamDatabase>>,
    config: Option<ScreeningConfig>,
    config_path: Option<PathBuf>,
    mixers: Option<MixerRegistry>,
    audit_logger: Option<Arc<AuditLogger>>,
}

impl WalletScreenerBuilder {
    pub fn new() -> Self {
        Self {
            chain: None,
            scam_db: None,
            config: None,
            config_path: None,
            mixers: None,
            audit_logger: None,
        }
    }

    pub fn with_chain_source(mut self, chain: Arc<dyn ChainDataSource>) -> Self {
        self.chain = Some(chain);
        self
    }

    pub fn with_scam_database(mut self, scam_db: Arc<dyn ScamDatabase>) -> Self {
        self.scam_db = Some(scam_db);
        self
    }

    pub fn with_config(mut self, config: ScreeningConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_config_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    pub fn with_mixers(mut self, mixers: MixerRegistry) -> Self {
        self.mixers = Some(mixers);
        self
    }

    pub fn with_audit_logger(mut self, logger: Arc<AuditLogger>) -> Self {
        self.audit_logger = Some(logger);
        self
    }

    pub fn build(self) -> Result<WalletScreener> {
        let config = if let Some(config) = self.config {
            config
        } else if let Some(path) = self.config_path {
            ScreeningConfig::from_file(path)?
        } else {
            ScreeningConfig::default()
        };
        config.validate()?;

        let chain = self.chain.ok_or_else(|| {
            ScreeningError::Config("A chain data source is required".to_string())
        })?;
        let chain: Arc<dyn ChainDataSource> =
            Arc::new(CachedChainSource::new(chain, config.chain_ttl()));

        let regulator = match &config.regulator_list_path {
            Some(path) => Arc::new(RegulatorList::from_file(path)?),
            None => {
                info!("No regulator deny-list configured; starting with an empty list");
                Arc::new(RegulatorList::empty())
            }
        };

        let blacklist = match &config.blacklist_path {
            Some(path) => Arc::new(Blacklist::from_file(path)?),
            None => Arc::new(Blacklist::empty()),
        };

        let mixers = Arc::new(self.mixers.unwrap_or_else(MixerRegistry::with_defaults));

        let sanctions = SanctionsAnalyzer::new(
            regulator,
            blacklist,
            mixers,
            self.scam_db,
            config.scam_lookup.fail_mode,
        );

        let audit = self
            .audit_logger
            .unwrap_or_else(|| Arc::new(AuditLogger::new(config.audit.clone())));

        let aggregator = RiskAggregator::new(config.weights.clone(), config.tiers.clone());
        let contracts = ContractInteractionAnalyzer::new(config.pipeline.contract_sample_limit);
        let screening_cache = Arc::new(ScreeningCache::new(config.screening_ttl()));
        let sanctions_cache = Arc::new(TtlCache::new(config.sanctions_ttl()));

        Ok(WalletScreener {
            chain,
            aggregator,
            sanctions,
            contracts,
            screening_cache,
            sanctions_cache,
            audit,
            config: Arc::new(config),
        })
    }
}

impl Default for WalletScreenerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::{ContractMetadata, TransferRecord};
    use crate::types::RiskTier;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const PAYEE: &str = "0xabcdef1234abcdef1234abcdef1234abcdef1234";
    const PEER: &str = "0x9876543210987654321098765432109876543210";

    /// Concurrency gauge shared between a mock and its test.
    #[derive(Default)]
    struct Gauge {
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    /// Scripted chain source with call accounting and a concurrency gauge.
    struct MockChain {
        wallets: HashMap<String, (Vec<TransferRecord>, u128)>,
        failing: HashSet<String>,
        gauge: Arc<Gauge>,
    }

    impl MockChain {
        fn new() -> Self {
            Self {
                wallets: HashMap::new(),
                failing: HashSet::new(),
                gauge: Arc::new(Gauge::default()),
            }
        }

        fn with_wallet(mut self, address: &str, history: Vec<TransferRecord>, balance: u128) -> Self {
            self.wallets.insert(address.to_string(), (history, balance));
            self
        }

        fn with_failing(mut self, address: &str) -> Self {
            self.failing.insert(address.to_string());
            self
        }
    }

    #[async_trait]
    impl ChainDataSource for MockChain {
        async fn transactions(&self, address: &WalletAddress) -> Result<Vec<TransferRecord>> {
            let current = self.gauge.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.gauge.max_in_flight.fetch_max(current, Ordering::SeqCst);
            // Hold the gauge across a suspension so overlapping fetches
            // register as concurrent.
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.gauge.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.failing.contains(address.as_str()) {
                return Err(ScreeningError::Upstream("explorer down".to_string()));
            }
            Ok(self
                .wallets
                .get(address.as_str())
                .map(|(history, _)| history.clone())
                .unwrap_or_default())
        }

        async fn native_balance(&self, address: &WalletAddress) -> Result<u128> {
            if self.failing.contains(address.as_str()) {
                return Err(ScreeningError::Upstream("explorer down".to_string()));
            }
            Ok(self
                .wallets
                .get(address.as_str())
                .map(|(_, balance)| *balance)
                .unwrap_or(0))
        }

        async fn has_code(&self, _address: &WalletAddress) -> Result<bool> {
            Ok(false)
        }

        async fn contract_metadata(&self, _address: &WalletAddress) -> Result<ContractMetadata> {
            Ok(ContractMetadata {
                is_verified: false,
                name: None,
                compiler_version: None,
            })
        }
    }

    fn seasoned_history(owner: &str, now_ts: u64) -> Vec<TransferRecord> {
        let start = now_ts - 200 * 86_400;
        let mut history = Vec::new();
        for i in 0..10u64 {
            let peer = format!("0x5{:039x}", i);
            history.push(TransferRecord {
                from: peer.clone(),
                to: owner.to_string(),
                value_wei: 1_000,
                timestamp: start + i * 86_400,
                contract_address: None,
            });
            history.push(TransferRecord {
                from: owner.to_string(),
                to: peer,
                value_wei: 500,
                timestamp: start + i * 86_400 + 3600,
                contract_address: None,
            });
        }
        history
    }

    fn screener_with(chain: MockChain) -> WalletScreener {
        WalletScreener::new(Arc::new(chain), ScreeningConfig::default()).unwrap()
    }

    fn now_ts() -> u64 {
        Utc::now().timestamp() as u64
    }

    #[tokio::test]
    async fn test_invalid_address_is_rejected() {
        let screener = screener_with(MockChain::new());
        let err = screener.screen_wallet("definitely-not-hex", false).await;
        assert!(matches!(err, Err(ScreeningError::InvalidAddress(_))));
    }

    #[tokio::test]
    async fn test_second_screening_is_served_from_cache() {
        let chain = MockChain::new().with_wallet(PAYEE, seasoned_history(PAYEE, now_ts()), 5_000);
        let screener = screener_with(chain);

        let first = screener.screen_wallet(PAYEE, false).await.unwrap();
        assert!(!first.cached);

        let second = screener.screen_wallet(PAYEE, false).await.unwrap();
        assert!(second.cached);
        assert_eq!(first.breakdown, second.breakdown);
        assert_eq!(first.score, second.score);

        let stats = screener.cache_stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
    }

    #[tokio::test]
    async fn test_upstream_failure_yields_degraded_medium_result() {
        let chain = MockChain::new().with_failing(PAYEE);
        let screener = screener_with(chain);

        let result = screener.screen_wallet(PAYEE, false).await.unwrap();
        assert!(result.breakdown.any_degraded());
        assert!(result.breakdown.wallet_age.degraded);
        // Unavailable data biases toward caution, not LOW
        assert!(result.tier >= RiskTier::Medium);
    }

    #[tokio::test]
    async fn test_empty_wallet_is_not_low_risk() {
        let chain = MockChain::new().with_wallet(PAYEE, vec![], 0);
        let screener = screener_with(chain);

        let result = screener.screen_wallet(PAYEE, false).await.unwrap();
        assert!(result.breakdown.wallet_age.score >= 30);
        assert_ne!(result.tier, RiskTier::Low);
    }

    #[tokio::test]
    async fn test_blacklisted_address_blocks_and_eviction_applies() {
        let chain = MockChain::new().with_wallet(PAYEE, seasoned_history(PAYEE, now_ts()), 5_000);
        let screener = screener_with(chain);

        let clean = screener.screen_wallet(PAYEE, false).await.unwrap();
        assert_eq!(clean.action, ScreeningAction::Proceed);

        // Blacklisting evicts both caches, so the very next call reflects it.
        screener.add_to_blacklist(PAYEE, "reported scam").await.unwrap();
        let blocked = screener.screen_wallet(PAYEE, false).await.unwrap();
        assert_eq!(blocked.action, ScreeningAction::Block);
        assert!(blocked.breakdown.sanctions.is_sanctioned);

        screener.remove_from_blacklist(PAYEE).await.unwrap();
        let clean_again = screener.screen_wallet(PAYEE, false).await.unwrap();
        assert_eq!(clean_again.action, ScreeningAction::Proceed);
    }

    #[tokio::test]
    async fn test_clear_cache_is_per_address() {
        let chain = MockChain::new()
            .with_wallet(PAYEE, seasoned_history(PAYEE, now_ts()), 5_000)
            .with_wallet(PEER, seasoned_history(PEER, now_ts()), 5_000);
        let screener = screener_with(chain);

        screener.screen_wallet(PAYEE, false).await.unwrap();
        screener.screen_wallet(PEER, false).await.unwrap();
        screener.clear_cache(Some(PAYEE)).await.unwrap();

        assert!(!screener.screen_wallet(PAYEE, false).await.unwrap().cached);
        assert!(screener.screen_wallet(PEER, false).await.unwrap().cached);
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_waves_and_throttling() {
        let mut chain = MockChain::new();
        let mut addresses = Vec::new();
        for i in 0..7u64 {
            let address = format!("0x6{:039x}", i);
            chain = chain.with_wallet(&address, vec![], 0);
            addresses.push(address);
        }
        let screener = screener_with(chain);

        let started = tokio::time::Instant::now();
        let results = screener.batch_screen(&addresses).await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(results.len(), 7);
        // 7 addresses at wave size 5 is exactly 2 waves with one 2s delay
        assert!(elapsed >= Duration::from_secs(2), "elapsed: {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_concurrency_is_bounded_by_wave_size() {
        let mut chain = MockChain::new();
        let gauge = Arc::clone(&chain.gauge);
        let mut addresses = Vec::new();
        for i in 0..7u64 {
            let address = format!("0x6{:039x}", i);
            chain = chain.with_wallet(&address, vec![], 0);
            addresses.push(address);
        }
        let screener = screener_with(chain);

        let results = screener.batch_screen(&addresses).await.unwrap();
        assert_eq!(results.len(), 7);

        let max = gauge.max_in_flight.load(Ordering::SeqCst);
        assert!(max <= 5, "observed {} concurrent fetches", max);
        assert!(max >= 2, "wave members did not overlap");
    }

    #[tokio::test]
    async fn test_batch_partial_failure_returns_other_results() {
        let mut chain = MockChain::new();
        let mut addresses = Vec::new();
        for i in 0..4u64 {
            let address = format!("0x6{:039x}", i);
            chain = chain.with_wallet(&address, vec![], 0);
            addresses.push(address);
        }
        // Fifth address: every upstream call fails, so its screening is a
        // complete blackout and is omitted from the map.
        let failing = format!("0x6{:039x}", 99u64);
        chain = chain.with_failing(&failing);
        addresses.push(failing.clone());

        let screener = screener_with(chain);
        let results = screener.batch_screen(&addresses).await.unwrap();
        assert_eq!(results.len(), 4);
        assert!(!results.contains_key(&failing));
    }

    #[tokio::test]
    async fn test_batch_skips_malformed_addresses() {
        let mut chain = MockChain::new();
        let mut addresses = Vec::new();
        for i in 0..3u64 {
            let address = format!("0x6{:039x}", i);
            chain = chain.with_wallet(&address, vec![], 0);
            addresses.push(address);
        }
        addresses.push("broken-address".to_string());

        let screener = screener_with(chain);
        let results = screener.batch_screen(&addresses).await.unwrap();
        assert_eq!(results.len(), 3);
    }

    #[tokio::test]
    async fn test_batch_limit_enforced() {
        let screener = screener_with(MockChain::new());
        let addresses: Vec<String> = (0..51u64).map(|i| format!("0x6{:039x}", i)).collect();
        let err = screener.batch_screen(&addresses).await;
        assert!(matches!(err, Err(ScreeningError::BatchLimitExceeded { .. })));
    }

    #[tokio::test]
    async fn test_list_metadata_reports_all_lists() {
        let screener = screener_with(MockChain::new());
        let metadata = screener.list_metadata();
        let names: Vec<_> = metadata.iter().map(|m| m.name.as_str()).collect();
        assert!(names.contains(&"regulator_denylist"));
        assert!(names.contains(&"blacklist"));
        assert!(names.contains(&"known_mixers"));
    }
}
