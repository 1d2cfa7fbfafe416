//! Wallet age heuristics.
//!
//! Younger wallets carry more payment risk. An empty history is itself a
//! signal: an unused wallet gets a moderate-risk finding, not the lowest
//! possible score.

use crate::chain::TransferRecord;
use crate::types::{AnalyzerFinding, FindingDetail};
use chrono::{DateTime, Utc};

const SECS_PER_DAY: u64 = 86_400;

/// Score for a wallet with no history at all.
const SCORE_UNUSED: u8 = 60;
/// Conservative default when history could not be fetched.
const SCORE_UNAVAILABLE: u8 = 50;

const SCORE_UNDER_DAY: u8 = 85;
const SCORE_UNDER_WEEK: u8 = 65;
const SCORE_UNDER_MONTH: u8 = 40;
const SCORE_UNDER_QUARTER: u8 = 20;

#[derive(Debug, Clone, Copy, Default)]
pub struct WalletAgeAnalyzer;

impl WalletAgeAnalyzer {
    /// `history` is `None` when the upstream fetch failed; the analyzer
    /// never fails itself.
    pub fn analyze(&self, history: Option<&[TransferRecord]>, now: DateTime<Utc>) -> AnalyzerFinding {
        let Some(history) = history else {
            return AnalyzerFinding {
                score: SCORE_UNAVAILABLE,
                flags: vec![
                    "Transaction history unavailable; wallet age unknown, assuming elevated risk"
                        .to_string(),
                ],
                degraded: true,
                detail: FindingDetail::WalletAge {
                    age_days: None,
                    first_seen: None,
                },
            };
        };

        let Some(first) = history.first() else {
            return AnalyzerFinding {
                score: SCORE_UNUSED,
                flags: vec!["Wallet has no transaction history (unused or brand new)".to_string()],
                degraded: false,
                detail: FindingDetail::WalletAge {
                    age_days: None,
                    first_seen: None,
                },
            };
        };

        let first_seen = DateTime::<Utc>::from_timestamp(first.timestamp as i64, 0);
        let age_secs = (now.timestamp() as u64).saturating_sub(first.timestamp);
        let age_days = age_secs / SECS_PER_DAY;

        let (score, flag) = if age_days < 1 {
            (SCORE_UNDER_DAY, Some("Wallet is less than one day old"))
        } else if age_days < 7 {
            (SCORE_UNDER_WEEK, Some("Wallet is less than one week old"))
        } else if age_days < 30 {
            (SCORE_UNDER_MONTH, Some("Wallet is less than one month old"))
        } else if age_days < 90 {
            (SCORE_UNDER_QUARTER, Some("Wallet is less than three months old"))
        } else {
            (0, None)
        };

        AnalyzerFinding {
            score,
            flags: flag.map(String::from).into_iter().collect(),
            degraded: false,
            detail: FindingDetail::WalletAge {
                age_days: Some(age_days),
                first_seen,
            },
        }
    }
}
