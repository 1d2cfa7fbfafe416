//! Balance pattern heuristics.
//!
//! Works from the current balance plus a naive time-series reconstruction
//! of balance history (running delta per transfer, starting from zero since
//! the true starting balance is unknown). Flags drain patterns, dormant
//! large holdings, and single extreme spikes.

use crate::address::WalletAddress;
use crate::chain::TransferRecord;
use crate::types::{AnalyzerFinding, FindingDetail};

const ONE_ETH_WEI: u128 = 1_000_000_000_000_000_000;

/// A reconstructed point this many times above the series average counts
/// as a spike.
const SPIKE_RATIO: u128 = 5;
/// Spike detection needs at least this many points to mean anything.
const SPIKE_MIN_POINTS: usize = 4;

const WEIGHT_DRAINED: u8 = 35;
const WEIGHT_DORMANT: u8 = 25;
const WEIGHT_SPIKE: u8 = 30;

/// Conservative defaults for unavailable data.
const SCORE_ALL_UNAVAILABLE: u8 = 30;
const SCORE_NO_RECONSTRUCTION: u8 = 20;

#[derive(Debug, Clone, Copy, Default)]
pub struct BalancePatternAnalyzer;

impl BalancePatternAnalyzer {
    pub fn analyze(
        &self,
        owner: &WalletAddress,
        balance: Option<u128>,
        history: Option<&[TransferRecord]>,
    ) -> AnalyzerFinding {
        let (Some(balance), history) = (balance, history) else {
            return AnalyzerFinding {
                score: SCORE_ALL_UNAVAILABLE,
                flags: vec!["Balance unavailable; holdings pattern unknown".to_string()],
                degraded: true,
                detail: FindingDetail::Balance {
                    balance_wei: None,
                    spike_detected: false,
                },
            };
        };

        let Some(history) = history else {
            // Balance fetched but no history to reconstruct against.
            return AnalyzerFinding {
                score: SCORE_NO_RECONSTRUCTION,
                flags: vec![
                    "Transaction history unavailable; balance pattern not reconstructed"
                        .to_string(),
                ],
                degraded: true,
                detail: FindingDetail::Balance {
                    balance_wei: Some(balance.to_string()),
                    spike_detected: false,
                },
            };
        };

        let mut score: u32 = 0;
        let mut flags = Vec::new();

        if balance == 0 && !history.is_empty() {
            score += WEIGHT_DRAINED as u32;
            flags.push("Zero balance despite transaction history (drained wallet)".to_string());
        }

        if balance >= ONE_ETH_WEI && history.len() < 3 {
            score += WEIGHT_DORMANT as u32;
            flags.push("Large balance with very little activity".to_string());
        }

        let spike_detected = Self::detect_spike(owner.as_str(), history);
        if spike_detected {
            score += WEIGHT_SPIKE as u32;
            flags.push(
                "Balance history dominated by a single extreme spike".to_string(),
            );
        }

        AnalyzerFinding {
            score: score.min(100) as u8,
            flags,
            degraded: false,
            detail: FindingDetail::Balance {
                balance_wei: Some(balance.to_string()),
                spike_detected,
            },
        }
    }

    /// Running balance after each transfer; the peak point marks a spike
    /// when it exceeds [`SPIKE_RATIO`] times the average of the remaining
    /// points. (Comparing against an average that includes the peak would
    /// let the peak mask itself on short series.)
    fn detect_spike(owner: &str, history: &[TransferRecord]) -> bool {
        if history.len() < SPIKE_MIN_POINTS {
            return false;
        }

        let mut running: i128 = 0;
        let mut points: Vec<u128> = Vec::with_capacity(history.len());
        for transfer in history {
            if transfer.to == owner {
                running = running.saturating_add(transfer.value_wei as i128);
            }
            if transfer.from == owner {
                running = running.saturating_sub(transfer.value_wei as i128);
            }
            points.push(running.unsigned_abs());
        }

        let (peak, sum) = points
            .iter()
            .fold((0u128, 0u128), |(peak, sum), &p| (peak.max(p), sum + p));
        let rest_average = (sum - peak) / (points.len() as u128 - 1);
        if rest_average == 0 {
            return false;
        }

        peak > SPIKE_RATIO * rest_average
    }
}
