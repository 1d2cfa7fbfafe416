//! The heuristic analyzer set.
//!
//! Five independent units, each consuming chain data for one address and
//! producing a bounded risk finding. None of them may observe another's
//! output, and none of them errors: when a data source is unavailable they
//! return a conservative default finding with `degraded = true` and an
//! explanatory flag instead of propagating the failure.

pub mod balance;
pub mod contracts;
pub mod history;
pub mod sanctions;
pub mod wallet_age;

pub use balance::BalancePatternAnalyzer;
pub use contracts::ContractInteractionAnalyzer;
pub use history::TransactionHistoryAnalyzer;
pub use sanctions::SanctionsAnalyzer;
pub use wallet_age::WalletAgeAnalyzer;
