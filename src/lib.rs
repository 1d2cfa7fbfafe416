//! Wallet risk screening for payroll payouts.
//!
//! Screens a wallet address for payment risk before it is allowed to
//! receive funds, producing a numeric score, a risk tier, and a
//! recommended action (PROCEED / WARN / BLOCK). Five independent
//! heuristic analyzers run concurrently over a shared chain-data fetch;
//! a sanctions match overrides the weighted score and always blocks.
//!
//! ```text
//! caller ──► batch coordinator / screen_wallet
//!                  │
//!                  ▼
//!          screening cache (1h TTL) ── hit ──► result (cached=true)
//!                  │ miss
//!                  ▼
//!        ┌── wallet age ──┐
//!        ├── history ─────┤
//!        ├── balance ─────┼──► aggregator ──► cache write ──► result
//!        ├── contracts ───┤
//!        └── sanctions ───┘ (own 24h cache)
//! ```
//!
//! # Example
//! ```rust,ignore
//! use payscreen::chain::explorer::HttpExplorerSource;
//! use payscreen::engine::WalletScreener;
//! use std::sync::Arc;
//!
//! let explorer = HttpExplorerSource::from_env()?;
//! let screener = WalletScreener::builder()
//!     .with_chain_source(Arc::new(explorer))
//!     .build()?;
//!
//! let result = screener.screen_wallet("0xdAC17F958D2ee523a2206206994597C13D831ec7", false).await?;
//! println!("{} -> {}", result.tier, result.action);
//! ```

pub mod address;
pub mod aggregator;
pub mod analyzers;
pub mod cache;
pub mod chain;
pub mod config;
pub mod engine;
pub mod error;
pub mod types;

// Re-export main types for convenience
pub use address::WalletAddress;
pub use aggregator::RiskAggregator;
pub use cache::{CacheStats, ScreeningCache};
pub use chain::{ChainDataSource, ContractMetadata, TransferRecord};
pub use config::ScreeningConfig;
pub use engine::{WalletScreener, WalletScreenerBuilder};
pub use error::{Result, ScreeningError};
pub use types::{
    AnalyzerFinding, FindingDetail, RiskBreakdown, RiskTier, SanctionsFinding, SanctionsSource,
    ScreeningAction, ScreeningResult,
};
