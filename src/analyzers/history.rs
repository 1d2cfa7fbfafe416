//! Transaction history heuristics.
//!
//! Risk accrues additively from independent red flags over the transfer
//! list: too little activity, the classic receive-only pass-through
//! pattern, burst activity in the trailing hour, and bot-like counterparty
//! concentration. The sum is capped at 100.

use crate::address::WalletAddress;
use crate::chain::TransferRecord;
use crate::types::{AnalyzerFinding, FindingDetail};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// More than this many transfers in the trailing hour counts as a burst.
const BURST_THRESHOLD: usize = 10;
/// Fewer total transfers than this is suspicious on its own.
const MIN_TRANSACTIONS: usize = 5;
/// Diversity flag requires at least this much volume to be meaningful.
const DIVERSITY_MIN_TOTAL: usize = 10;

const WEIGHT_NO_HISTORY: u8 = 35;
const WEIGHT_FEW_TRANSACTIONS: u8 = 20;
const WEIGHT_RECEIVE_ONLY: u8 = 40;
const WEIGHT_BURST: u8 = 25;
const WEIGHT_LOW_DIVERSITY: u8 = 20;

/// Conservative default when history could not be fetched.
const SCORE_UNAVAILABLE: u8 = 30;

#[derive(Debug, Clone, Copy, Default)]
pub struct TransactionHistoryAnalyzer;

impl TransactionHistoryAnalyzer {
    pub fn analyze(
        &self,
        owner: &WalletAddress,
        history: Option<&[TransferRecord]>,
        now: DateTime<Utc>,
    ) -> AnalyzerFinding {
        let Some(history) = history else {
            return AnalyzerFinding {
                score: SCORE_UNAVAILABLE,
                flags: vec!["Transaction history unavailable; activity pattern unknown".to_string()],
                degraded: true,
                detail: FindingDetail::History {
                    total: 0,
                    incoming: 0,
                    outgoing: 0,
                    distinct_counterparties: 0,
                    mean_value_wei: "0".to_string(),
                    burst_activity: false,
                },
            };
        };

        let owner_key = owner.as_str();
        let total = history.len();
        let incoming = history.iter().filter(|t| t.to == owner_key).count();
        let outgoing = history.iter().filter(|t| t.from == owner_key).count();

        let counterparties: HashSet<&str> = history
            .iter()
            .map(|t| t.counterparty(owner_key))
            .filter(|cp| !cp.is_empty())
            .collect();
        let distinct = counterparties.len();

        let mean_value_wei = if total > 0 {
            history.iter().map(|t| t.value_wei).sum::<u128>() / total as u128
        } else {
            0
        };

        let hour_ago = (now.timestamp() as u64).saturating_sub(3600);
        let trailing_hour = history.iter().filter(|t| t.timestamp >= hour_ago).count();
        let burst_activity = trailing_hour > BURST_THRESHOLD;

        let mut score: u32 = 0;
        let mut flags = Vec::new();

        if total == 0 {
            score += WEIGHT_NO_HISTORY as u32;
            flags.push("No transaction history".to_string());
        } else if total < MIN_TRANSACTIONS {
            score += WEIGHT_FEW_TRANSACTIONS as u32;
            flags.push(format!("Very few transactions ({})", total));
        }

        // Classic pass-through/mule pattern: money in, never out.
        if incoming > 0 && outgoing == 0 {
            score += WEIGHT_RECEIVE_ONLY as u32;
            flags.push(
                "Receives funds but never sends (possible pass-through wallet)".to_string(),
            );
        }

        if burst_activity {
            score += WEIGHT_BURST as u32;
            flags.push(format!(
                "Burst activity: {} transactions within the last hour",
                trailing_hour
            ));
        }

        if total >= DIVERSITY_MIN_TOTAL && distinct < total / 10 {
            score += WEIGHT_LOW_DIVERSITY as u32;
            flags.push(format!(
                "Very few distinct counterparties ({}) for {} transactions (bot-like pattern)",
                distinct, total
            ));
        }

        AnalyzerFinding {
            score: score.min(100) as u8,
            flags,
            degraded: false,
            detail: FindingDetail::History {
                total,
                incoming,
                outgoing,
                distinct_counterparties: distinct,
                mean_value_wei: mean_value_wei.to_string(),
                burst_activity,
            },
        }
    }
}
