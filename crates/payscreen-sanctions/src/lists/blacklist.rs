use crate::error::{Result, SanctionsError};
use crate::lists::{ListMetadata, SanctionsList};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::RwLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlacklistEntry {
    pub wallet: String,
    pub reason: String,
    #[serde(default)]
    pub added_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Mutable scam-address blacklist.
///
/// Unlike the regulator list, entries can be added and removed at runtime
/// by operators reacting to new scam reports. Mutations take a short
/// write lock; no lock is held across any await point.
#[derive(Debug)]
pub struct Blacklist {
    entries: RwLock<HashMap<String, BlacklistEntry>>,
}

impl Blacklist {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            SanctionsError::ListLoadError(format!("Failed to read blacklist file: {}", e))
        })?;

        Self::from_string(&content)
    }

    pub fn from_string(content: &str) -> Result<Self> {
        let raw: Vec<BlacklistEntry> = serde_json::from_str(content).map_err(|e| {
            SanctionsError::ListLoadError(format!("Failed to parse blacklist JSON: {}", e))
        })?;

        let mut entries = HashMap::new();
        for entry in raw {
            let normalized = entry.wallet.to_lowercase().trim().to_string();
            if !normalized.is_empty() {
                entries.insert(normalized, entry);
            }
        }

        tracing::info!("Loaded blacklist: {} addresses", entries.len());

        Ok(Self {
            entries: RwLock::new(entries),
        })
    }

    pub fn empty() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Add an address with a reason. Replaces any existing entry.
    pub fn insert(&self, address: &str, reason: &str) {
        let normalized = address.to_lowercase().trim().to_string();
        if normalized.is_empty() {
            return;
        }
        tracing::info!(address = %normalized, reason = %reason, "Adding address to blacklist");
        let entry = BlacklistEntry {
            wallet: normalized.clone(),
            reason: reason.to_string(),
            added_at: Some(chrono::Utc::now()),
        };
        self.entries
            .write()
            .expect("blacklist lock poisoned")
            .insert(normalized, entry);
    }

    /// Remove an address. Returns true if it was present.
    pub fn remove(&self, address: &str) -> bool {
        let normalized = address.to_lowercase().trim().to_string();
        let removed = self
            .entries
            .write()
            .expect("blacklist lock poisoned")
            .remove(&normalized)
            .is_some();
        if removed {
            tracing::info!(address = %normalized, "Removed address from blacklist");
        }
        removed
    }

    pub fn reason_for(&self, address: &str) -> Option<String> {
        let normalized = address.to_lowercase().trim().to_string();
        self.entries
            .read()
            .expect("blacklist lock poisoned")
            .get(&normalized)
            .map(|e| e.reason.clone())
    }

    /// Snapshot of all entries, for diagnostics.
    pub fn entries(&self) -> Vec<BlacklistEntry> {
        self.entries
            .read()
            .expect("blacklist lock poisoned")
            .values()
            .cloned()
            .collect()
    }
}

impl SanctionsList for Blacklist {
    fn is_listed(&self, address: &str) -> bool {
        let normalized = address.to_lowercase().trim().to_string();
        self.entries
            .read()
            .expect("blacklist lock poisoned")
            .contains_key(&normalized)
    }

    fn metadata(&self) -> ListMetadata {
        ListMetadata {
            name: "blacklist".to_string(),
            record_count: self.total_addresses(),
            last_updated: None,
            checksum: None,
            source: "operator-maintained".to_string(),
        }
    }

    fn total_addresses(&self) -> usize {
        self.entries.read().expect("blacklist lock poisoned").len()
    }
}
