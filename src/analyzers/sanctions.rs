//! The override-capable sanctions check.
//!
//! Checks run in a fixed order and the first match wins: regulator
//! deny-list, mixer exposure, operator blacklist, external scam database,
//! burn-address pattern. A positive result here forces a BLOCK decision
//! regardless of the weighted score.
//!
//! The external scam-database lookup is best-effort: its failure is
//! resolved by the configured [`FailMode`]: either clean-for-this-check
//! (the reference behavior) or a moderate penalty. Either way the finding
//! is marked degraded so a failed lookup is never mistaken for a verified
//! clean result.

use crate::address::WalletAddress;
use crate::chain::ChainDataSource;
use crate::types::{SanctionsFinding, SanctionsSource};
use payscreen_sanctions::{
    Blacklist, FailMode, MixerRegistry, RegulatorList, SanctionsList, ScamDatabase,
};
use std::sync::Arc;
use tracing::warn;

const SCORE_REGULATOR: u8 = 100;
const SCORE_BLACKLIST: u8 = 95;
const SCORE_MIXER: u8 = 90;
const SCORE_EXTERNAL_DB: u8 = 90;
const SCORE_BURN: u8 = 80;
/// Penalty applied on a failed external lookup under [`FailMode::Cautious`].
const SCORE_LOOKUP_FAILED: u8 = 40;

#[derive(Clone)]
pub struct SanctionsAnalyzer {
    regulator: Arc<RegulatorList>,
    blacklist: Arc<Blacklist>,
    mixers: Arc<MixerRegistry>,
    scam_db: Option<Arc<dyn ScamDatabase>>,
    fail_mode: FailMode,
}

impl SanctionsAnalyzer {
    pub fn new(
        regulator: Arc<RegulatorList>,
        blacklist: Arc<Blacklist>,
        mixers: Arc<MixerRegistry>,
        scam_db: Option<Arc<dyn ScamDatabase>>,
        fail_mode: FailMode,
    ) -> Self {
        Self {
            regulator,
            blacklist,
            mixers,
            scam_db,
            fail_mode,
        }
    }

    pub fn blacklist(&self) -> &Blacklist {
        &self.blacklist
    }

    pub fn regulator(&self) -> &RegulatorList {
        &self.regulator
    }

    pub fn mixers(&self) -> &MixerRegistry {
        &self.mixers
    }

    pub async fn analyze(
        &self,
        address: &WalletAddress,
        chain: &dyn ChainDataSource,
    ) -> SanctionsFinding {
        let key = address.as_str();
        let mut degraded = false;

        // 1. Regulator deny-list: highest severity, exact match.
        if self.regulator.is_listed(key) {
            let entity = self
                .regulator
                .get_entry(key)
                .map(|e| format!(" ({})", e.entity_name))
                .unwrap_or_default();
            return SanctionsFinding {
                is_sanctioned: true,
                source: SanctionsSource::Regulator,
                score: SCORE_REGULATOR,
                reason: format!("Address appears on the regulator deny-list{}", entity),
                degraded: false,
            };
        }

        // 2. Mixer exposure: any historical interaction with a known mixer.
        if self.mixers.total_addresses() > 0 {
            match chain
                .has_interacted_with(address, self.mixers.address_set())
                .await
            {
                Ok(true) => {
                    return SanctionsFinding {
                        is_sanctioned: true,
                        source: SanctionsSource::MixerExposure,
                        score: SCORE_MIXER,
                        reason: "Address has transacted with a known mixer contract".to_string(),
                        degraded: false,
                    };
                }
                Ok(false) => {}
                Err(e) => {
                    warn!(address = %key, error = %e, "Mixer exposure check failed");
                    degraded = true;
                }
            }
        }

        // 3. Operator-maintained scam blacklist.
        if self.blacklist.is_listed(key) {
            let reason = self
                .blacklist
                .reason_for(key)
                .unwrap_or_else(|| "reported scam address".to_string());
            return SanctionsFinding {
                is_sanctioned: true,
                source: SanctionsSource::Blacklist,
                score: SCORE_BLACKLIST,
                reason: format!("Address is blacklisted: {}", reason),
                degraded: false,
            };
        }

        // 4. External scam database, best-effort.
        let mut lookup_penalty: Option<SanctionsFinding> = None;
        if let Some(scam_db) = &self.scam_db {
            match scam_db.lookup(key).await {
                Ok(lookup) if lookup.flagged => {
                    return SanctionsFinding {
                        is_sanctioned: true,
                        source: SanctionsSource::ExternalDatabase,
                        score: SCORE_EXTERNAL_DB,
                        reason: format!(
                            "Address flagged by {}{}",
                            scam_db.name(),
                            lookup
                                .detail
                                .map(|d| format!(": {}", d))
                                .unwrap_or_default()
                        ),
                        degraded: false,
                    };
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(address = %key, error = %e, "External scam database lookup failed");
                    degraded = true;
                    if self.fail_mode == FailMode::Cautious {
                        lookup_penalty = Some(SanctionsFinding {
                            is_sanctioned: false,
                            source: SanctionsSource::ExternalDatabase,
                            score: SCORE_LOOKUP_FAILED,
                            reason: "External scam database unreachable; applying cautious penalty"
                                .to_string(),
                            degraded: true,
                        });
                    }
                }
            }
        }

        // 5. Null/burn-address patterns, common scam destinations.
        if is_burn_pattern(address) {
            return SanctionsFinding {
                is_sanctioned: true,
                source: SanctionsSource::BurnAddress,
                score: SCORE_BURN,
                reason: "Address matches a null/burn-address pattern".to_string(),
                degraded,
            };
        }

        if let Some(penalty) = lookup_penalty {
            return penalty;
        }

        let mut clean = SanctionsFinding::clean();
        if degraded {
            clean.degraded = true;
            clean.reason = "No sanctions match (some checks could not complete)".to_string();
        }
        clean
    }
}

/// Null/burn-address heuristic: the zero address, the conventional
/// `0x...dead` destination, and all-one-nibble vanity sinks.
fn is_burn_pattern(address: &WalletAddress) -> bool {
    if address.is_zero() {
        return true;
    }

    let hex = &address.as_str()[2..];
    let mut chars = hex.chars();
    if let Some(first) = chars.next() {
        if chars.all(|c| c == first) {
            return true;
        }
    }

    hex.ends_with("dead") && hex[..hex.len() - 4].bytes().all(|b| b == b'0')
}
