//! Weighted aggregation and the layered decision policy.
//!
//! `finalScore = round(min(100, Σ weight_i × score_i))`. Tier resolution
//! walks the boundary table from the most severe tier down and the first
//! boundary the score meets wins, so coinciding boundaries resolve to the
//! more severe tier instead of silently unreachable ones. The action
//! policy is evaluated on top of the tier, with one hard override:
//! a sanctions match always blocks, regardless of the weighted score.

use crate::address::WalletAddress;
use crate::config::{AnalyzerWeights, TierBoundaries};
use crate::types::{
    FindingDetail, RiskBreakdown, RiskTier, ScreeningAction, ScreeningResult,
};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone)]
pub struct RiskAggregator {
    weights: AnalyzerWeights,
    tiers: TierBoundaries,
}

impl RiskAggregator {
    pub fn new(weights: AnalyzerWeights, tiers: TierBoundaries) -> Self {
        Self { weights, tiers }
    }

    pub fn aggregate(
        &self,
        address: WalletAddress,
        breakdown: RiskBreakdown,
        screened_at: DateTime<Utc>,
    ) -> ScreeningResult {
        let weighted = self.weights.sanctions * breakdown.sanctions.score as f64
            + self.weights.history * breakdown.history.score as f64
            + self.weights.wallet_age * breakdown.wallet_age.score as f64
            + self.weights.balance * breakdown.balance.score as f64
            + self.weights.contracts * breakdown.contracts.score as f64;

        let score = weighted.min(100.0).round() as u8;
        let tier = self.classify(score);

        // Sanctions always win, regardless of the weighted score.
        let action = if breakdown.sanctions.is_sanctioned {
            ScreeningAction::Block
        } else {
            match tier {
                RiskTier::Critical => ScreeningAction::Block,
                RiskTier::High => ScreeningAction::Warn,
                RiskTier::Medium | RiskTier::Low => ScreeningAction::Proceed,
            }
        };

        let summary = self.summarize(&breakdown, tier);
        let recommendations = self.recommend(&breakdown, tier);

        ScreeningResult {
            address,
            score,
            tier,
            action,
            breakdown,
            summary,
            recommendations,
            screened_at,
            cached: false,
        }
    }

    /// Highest qualifying boundary wins, checked from the most severe down.
    fn classify(&self, score: u8) -> RiskTier {
        let boundaries = [
            (self.tiers.critical, RiskTier::Critical),
            (self.tiers.high, RiskTier::High),
            (self.tiers.medium, RiskTier::Medium),
        ];
        for (boundary, tier) in boundaries {
            if score >= boundary {
                return tier;
            }
        }
        RiskTier::Low
    }

    /// Name and weighted contribution of every analyzer, for dominance.
    fn contributions(&self, breakdown: &RiskBreakdown) -> [(&'static str, f64); 5] {
        [
            ("sanctions status", self.weights.sanctions * breakdown.sanctions.score as f64),
            ("transaction history", self.weights.history * breakdown.history.score as f64),
            ("wallet age", self.weights.wallet_age * breakdown.wallet_age.score as f64),
            ("balance pattern", self.weights.balance * breakdown.balance.score as f64),
            ("contract interactions", self.weights.contracts * breakdown.contracts.score as f64),
        ]
    }

    fn summarize(&self, breakdown: &RiskBreakdown, tier: RiskTier) -> String {
        if breakdown.sanctions.is_sanctioned {
            return format!(
                "Sanctions match via {}: {}",
                breakdown.sanctions.source, breakdown.sanctions.reason
            );
        }

        let dominant = self
            .contributions(breakdown)
            .into_iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .filter(|(_, contribution)| *contribution > 0.0);

        match dominant {
            Some((name, _)) => format!("{} risk, driven mainly by {}", tier, name),
            None => "No significant risk factors identified".to_string(),
        }
    }

    /// Deterministic mapping from breakdown state to the fixed
    /// recommendation catalog, in severity order.
    fn recommend(&self, breakdown: &RiskBreakdown, tier: RiskTier) -> Vec<String> {
        let mut recommendations = Vec::new();

        if breakdown.sanctions.is_sanctioned {
            recommendations
                .push("Do not send funds; escalate to your compliance team.".to_string());
        }

        if tier >= RiskTier::High {
            recommendations.push("Hold payment and require manual review.".to_string());
        }

        if !breakdown.wallet_age.degraded && breakdown.wallet_age.score >= 40 {
            recommendations
                .push("Wait for the wallet to mature before sending large amounts.".to_string());
        }

        if let FindingDetail::History { incoming, outgoing, .. } = breakdown.history.detail {
            if incoming > 0 && outgoing == 0 {
                recommendations
                    .push("Request proof of wallet ownership from the payee.".to_string());
            }
        }

        if let FindingDetail::Contracts { unverified, .. } = breakdown.contracts.detail {
            if unverified > 0 {
                recommendations.push(
                    "Request additional verification of the payee's recent contract activity."
                        .to_string(),
                );
            }
        }

        if breakdown.any_degraded() {
            recommendations.push(
                "Re-screen this address later; some data sources were unavailable.".to_string(),
            );
        }

        if recommendations.is_empty() {
            recommendations.push("No additional action required.".to_string());
        }

        recommendations
    }
}
