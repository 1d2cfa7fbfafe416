//! Finding and result types produced by the screening pipeline.
//!
//! Findings are immutable once built: analyzers produce them fresh on every
//! non-cached screening and the aggregator only reads them. Monetary amounts
//! are carried as decimal wei strings, since wei values overflow JSON
//! numbers.

use crate::address::WalletAddress;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-analyzer output: a bounded risk score plus human-readable flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerFinding {
    /// Risk contribution in [0, 100]
    pub score: u8,
    /// Human-readable red flags that triggered
    pub flags: Vec<String>,
    /// True when the finding was produced from unavailable or partial data.
    /// A degraded finding is never equivalent to a confirmed low-risk one.
    pub degraded: bool,
    pub detail: FindingDetail,
}

/// Analyzer-specific descriptive fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "analyzer", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FindingDetail {
    WalletAge {
        age_days: Option<u64>,
        first_seen: Option<DateTime<Utc>>,
    },
    History {
        total: usize,
        incoming: usize,
        outgoing: usize,
        distinct_counterparties: usize,
        mean_value_wei: String,
        burst_activity: bool,
    },
    Balance {
        balance_wei: Option<String>,
        spike_detected: bool,
    },
    Contracts {
        sampled: usize,
        verified: usize,
        unverified: usize,
    },
}

/// Which check produced a sanctions decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SanctionsSource {
    Regulator,
    MixerExposure,
    Blacklist,
    ExternalDatabase,
    BurnAddress,
    Clean,
}

impl fmt::Display for SanctionsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SanctionsSource::Regulator => "regulator deny-list",
            SanctionsSource::MixerExposure => "mixer exposure",
            SanctionsSource::Blacklist => "blacklist",
            SanctionsSource::ExternalDatabase => "external scam database",
            SanctionsSource::BurnAddress => "burn address",
            SanctionsSource::Clean => "clean",
        };
        f.write_str(s)
    }
}

/// The override-capable sanctions check result.
///
/// `is_sanctioned == true` is consumed directly by the action policy,
/// independent of the numeric score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SanctionsFinding {
    pub is_sanctioned: bool,
    pub source: SanctionsSource,
    pub score: u8,
    pub reason: String,
    pub degraded: bool,
}

impl SanctionsFinding {
    pub fn clean() -> Self {
        Self {
            is_sanctioned: false,
            source: SanctionsSource::Clean,
            score: 0,
            reason: "No sanctions match".to_string(),
            degraded: false,
        }
    }
}

/// All analyzer findings for one screening, immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskBreakdown {
    pub wallet_age: AnalyzerFinding,
    pub history: AnalyzerFinding,
    pub balance: AnalyzerFinding,
    pub contracts: AnalyzerFinding,
    pub sanctions: SanctionsFinding,
}

impl RiskBreakdown {
    /// True if any finding was produced from degraded data.
    pub fn any_degraded(&self) -> bool {
        self.wallet_age.degraded
            || self.history.degraded
            || self.balance.degraded
            || self.contracts.degraded
            || self.sanctions.degraded
    }

    /// True when every heuristic analyzer ran without data, a complete
    /// upstream blackout. Such results carry no usable signal: they are
    /// not cached, and batch screening omits them from its result map.
    pub fn fully_degraded(&self) -> bool {
        self.wallet_age.degraded
            && self.history.degraded
            && self.balance.degraded
            && self.contracts.degraded
    }
}

/// Discrete risk classification, ascending severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
            RiskTier::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

/// The policy decision handed to the payroll system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ScreeningAction {
    Proceed,
    Warn,
    Block,
}

impl fmt::Display for ScreeningAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ScreeningAction::Proceed => "PROCEED",
            ScreeningAction::Warn => "WARN",
            ScreeningAction::Block => "BLOCK",
        };
        f.write_str(s)
    }
}

/// The unit of value returned to callers and cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreeningResult {
    pub address: WalletAddress,
    /// Final weighted score in [0, 100]
    pub score: u8,
    pub tier: RiskTier,
    pub action: ScreeningAction,
    pub breakdown: RiskBreakdown,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub screened_at: DateTime<Utc>,
    /// Set by the cache layer, never by the aggregator.
    pub cached: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_ordering() {
        assert!(RiskTier::Critical > RiskTier::High);
        assert!(RiskTier::High > RiskTier::Medium);
        assert!(RiskTier::Medium > RiskTier::Low);
    }

    #[test]
    fn test_tier_wire_format() {
        assert_eq!(serde_json::to_string(&RiskTier::Critical).unwrap(), "\"CRITICAL\"");
        assert_eq!(serde_json::to_string(&ScreeningAction::Proceed).unwrap(), "\"PROCEED\"");
    }

    #[test]
    fn test_clean_sanctions_finding() {
        let finding = SanctionsFinding::clean();
        assert!(!finding.is_sanctioned);
        assert_eq!(finding.score, 0);
        assert_eq!(finding.source, SanctionsSource::Clean);
    }
}
