use crate::error::{Result, SanctionsError};
use crate::lists::{ListMetadata, SanctionsList};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Metadata about a regulator-issued sanctions list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulatorMetadata {
    /// Source description (e.g. the issuing authority)
    pub source: String,
    /// ISO 8601 timestamp when the list was generated
    pub generated_at: String,
    /// Total number of addresses in the list
    pub total_addresses: usize,
}

/// A single sanctioned address entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulatorEntry {
    /// The wallet address (normalized to lowercase)
    pub address: String,
    /// Name of the sanctioned entity
    pub entity_name: String,
    /// Sanctions program, if known
    pub program: Option<String>,
    /// Reason for listing
    pub reason: String,
}

/// Root structure of the regulator list JSON file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulatorData {
    pub metadata: RegulatorMetadata,
    pub addresses: Vec<RegulatorEntry>,
}

/// Static regulator deny-list, loaded once from a JSON document.
///
/// Addresses on this list must never receive funds. Lookups are exact
/// matches against the lowercase-normalized address set.
#[derive(Debug, Clone)]
pub struct RegulatorList {
    /// Set of listed addresses (normalized to lowercase)
    addresses: HashSet<String>,
    /// Full entries with entity information
    entries: Vec<RegulatorEntry>,
    /// Metadata about the loaded list
    metadata: RegulatorMetadata,
    /// SHA-256 checksum of the loaded file
    checksum: Option<String>,
    /// Last updated timestamp (from file mtime)
    last_updated: Option<chrono::DateTime<chrono::Utc>>,
}

impl RegulatorList {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::info!("Loading regulator deny-list from: {}", path.display());

        let content = fs::read_to_string(path).map_err(|e| {
            SanctionsError::ListLoadError(format!(
                "Failed to read regulator list {}: {}",
                path.display(),
                e
            ))
        })?;

        let last_updated = fs::metadata(path)
            .ok()
            .and_then(|m| m.modified().ok())
            .map(chrono::DateTime::<chrono::Utc>::from);

        let mut list = Self::from_string(&content)?;
        list.last_updated = last_updated;
        Ok(list)
    }

    pub fn from_string(content: &str) -> Result<Self> {
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        let checksum = format!("{:x}", hasher.finalize());

        let data: RegulatorData = serde_json::from_str(content).map_err(|e| {
            SanctionsError::ListLoadError(format!("Failed to parse regulator list JSON: {}", e))
        })?;

        let addresses: HashSet<String> = data
            .addresses
            .iter()
            .map(|entry| entry.address.to_lowercase())
            .collect();

        tracing::info!(
            "Loaded regulator deny-list: {} addresses (generated: {})",
            addresses.len(),
            data.metadata.generated_at
        );
        tracing::debug!("List checksum: {}", checksum);

        Ok(Self {
            addresses,
            entries: data.addresses,
            metadata: data.metadata,
            checksum: Some(checksum),
            last_updated: None,
        })
    }

    /// An empty list, for deployments that have not provisioned one.
    pub fn empty() -> Self {
        Self {
            addresses: HashSet::new(),
            entries: Vec::new(),
            metadata: RegulatorMetadata {
                source: "none".to_string(),
                generated_at: String::new(),
                total_addresses: 0,
            },
            checksum: None,
            last_updated: None,
        }
    }

    /// Get entity information for a listed address
    pub fn get_entry(&self, address: &str) -> Option<&RegulatorEntry> {
        let normalized = address.to_lowercase();
        self.entries
            .iter()
            .find(|entry| entry.address.to_lowercase() == normalized)
    }
}

impl SanctionsList for RegulatorList {
    fn is_listed(&self, address: &str) -> bool {
        let normalized = address.to_lowercase();
        let listed = self.addresses.contains(&normalized);

        if listed {
            tracing::warn!("SANCTIONS ALERT: regulator-listed address detected: {}", address);
        }

        listed
    }

    fn metadata(&self) -> ListMetadata {
        ListMetadata {
            name: "regulator_denylist".to_string(),
            record_count: self.addresses.len(),
            last_updated: self.last_updated,
            checksum: self.checksum.clone(),
            source: self.metadata.source.clone(),
        }
    }

    fn total_addresses(&self) -> usize {
        self.addresses.len()
    }
}
