pub mod blacklist;
pub mod mixers;
pub mod regulator;

use serde::{Deserialize, Serialize};

/// Trait that all address lists must implement
pub trait SanctionsList: Send + Sync {
    /// Check if an address is on this list
    fn is_listed(&self, address: &str) -> bool;

    /// Get metadata about this list
    fn metadata(&self) -> ListMetadata;

    /// Get the total number of addresses in the list
    fn total_addresses(&self) -> usize;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMetadata {
    pub name: String,
    pub record_count: usize,
    pub last_updated: Option<chrono::DateTime<chrono::Utc>>,
    pub checksum: Option<String>,
    pub source: String,
}
