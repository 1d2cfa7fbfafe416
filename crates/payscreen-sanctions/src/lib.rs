//! Sanctions list management for wallet screening.
//!
//! This crate owns the deny-list side of payment risk screening: the static
//! regulator deny-list, the operator-maintained scam blacklist, the
//! known-mixer registry, the optional external scam-database lookup, and
//! the audit trail for screening decisions. The screening engine in the
//! root crate composes these into its sanctions check.

pub mod audit;
pub mod error;
pub mod lists;
pub mod scamdb;

// Re-export main types for convenience
pub use audit::{AuditConfig, AuditEvent, AuditLogger, AuditOutcome, LogFormat};
pub use error::{Result, SanctionsError};
pub use lists::blacklist::{Blacklist, BlacklistEntry};
pub use lists::mixers::MixerRegistry;
pub use lists::regulator::{RegulatorEntry, RegulatorList};
pub use lists::{ListMetadata, SanctionsList};
pub use scamdb::{FailMode, HttpScamDatabase, ScamDatabase, ScamLookup};
