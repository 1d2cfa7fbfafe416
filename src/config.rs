//! Screening engine configuration.
//!
//! All tunables live here and are injected through the builder, so tests
//! can instantiate isolated engines instead of sharing process-wide state.
//! Loads from TOML with sensible defaults for every section.

use crate::error::{Result, ScreeningError};
use payscreen_sanctions::{AuditConfig, FailMode};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningConfig {
    pub weights: AnalyzerWeights,
    pub tiers: TierBoundaries,
    pub cache: CacheConfig,
    pub batch: BatchConfig,
    pub pipeline: PipelineConfig,
    pub scam_lookup: ScamLookupConfig,
    pub explorer: ExplorerConfig,
    pub audit: AuditConfig,
    /// Path to a regulator deny-list JSON document
    pub regulator_list_path: Option<PathBuf>,
    /// Path to an initial blacklist JSON document
    pub blacklist_path: Option<PathBuf>,
}

/// Per-analyzer weights. Must sum to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerWeights {
    pub sanctions: f64,
    pub history: f64,
    pub wallet_age: f64,
    pub balance: f64,
    pub contracts: f64,
}

impl Default for AnalyzerWeights {
    fn default() -> Self {
        Self {
            sanctions: 0.30,
            history: 0.25,
            wallet_age: 0.20,
            balance: 0.15,
            contracts: 0.10,
        }
    }
}

/// Tier boundaries, ascending severity. A score qualifies for the most
/// severe tier whose boundary it meets, so boundaries must be strictly
/// descending from critical to medium.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierBoundaries {
    pub critical: u8,
    pub high: u8,
    pub medium: u8,
}

impl Default for TierBoundaries {
    fn default() -> Self {
        Self {
            critical: 80,
            high: 60,
            medium: 20,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// TTL for completed screening results
    pub screening_ttl_secs: u64,
    /// TTL for memoized sanctions decisions. Much longer than the screening
    /// TTL since sanctions status changes far less often.
    pub sanctions_ttl_secs: u64,
    /// Micro-cache TTL inside the chain-data decorator, so the analyzers of
    /// one screening share a single upstream fetch.
    pub chain_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            screening_ttl_secs: 3600,
            sanctions_ttl_secs: 86_400,
            chain_ttl_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Maximum addresses per batch call
    pub max_addresses: usize,
    /// Addresses screened concurrently per wave
    pub wave_size: usize,
    /// Throttling delay between waves, for third-party rate limits
    pub wave_delay_ms: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_addresses: 50,
            wave_size: 5,
            wave_delay_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Hard deadline for one full screening; an expired deadline is treated
    /// as an upstream failure and handled fail-soft.
    pub deadline_secs: u64,
    /// Most recent distinct counterparties sampled by the contract analyzer
    pub contract_sample_limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            deadline_secs: 30,
            contract_sample_limit: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScamLookupConfig {
    /// What a failed external scam-database lookup means for the screening.
    pub fail_mode: FailMode,
}

impl Default for ScamLookupConfig {
    fn default() -> Self {
        Self {
            fail_mode: FailMode::Open,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplorerConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.etherscan.io/api".to_string(),
            api_key: None,
            timeout_secs: 10,
        }
    }
}

impl ScreeningConfig {
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            ScreeningError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;

        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Probe the default config locations; fall back to defaults.
    pub fn from_env() -> Result<Self> {
        let default_paths = ["config/screening.toml", "screening.toml", ".screening.toml"];

        for path in &default_paths {
            if std::path::Path::new(path).exists() {
                return Self::from_file(*path);
            }
        }

        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<()> {
        let sum = self.weights.sanctions
            + self.weights.history
            + self.weights.wallet_age
            + self.weights.balance
            + self.weights.contracts;
        if (sum - 1.0).abs() > 1e-6 {
            return Err(ScreeningError::Config(format!(
                "Analyzer weights must sum to 1.0, got {}",
                sum
            )));
        }

        if self.tiers.critical <= self.tiers.high || self.tiers.high <= self.tiers.medium {
            return Err(ScreeningError::Config(format!(
                "Tier boundaries must be strictly descending: critical {} > high {} > medium {}",
                self.tiers.critical, self.tiers.high, self.tiers.medium
            )));
        }

        if self.batch.wave_size == 0 || self.batch.max_addresses == 0 {
            return Err(ScreeningError::Config(
                "Batch wave size and address limit must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn screening_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.screening_ttl_secs)
    }

    pub fn sanctions_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.sanctions_ttl_secs)
    }

    pub fn chain_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.chain_ttl_secs)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.pipeline.deadline_secs)
    }

    pub fn wave_delay(&self) -> Duration {
        Duration::from_millis(self.batch.wave_delay_ms)
    }
}
