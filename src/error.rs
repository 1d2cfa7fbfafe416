use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreeningError {
    /// Malformed address input. Surfaced immediately to the caller and
    /// never cached.
    #[error("Invalid wallet address: {0}")]
    InvalidAddress(String),

    /// A chain-data or sanctions-source call failed. Never escapes the
    /// engine: every analyzer absorbs it into a degraded default finding.
    #[error("Upstream data source unavailable: {0}")]
    Upstream(String),

    #[error("Batch of {requested} addresses exceeds the limit of {limit}")]
    BatchLimitExceeded { requested: usize, limit: usize },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Sanctions list error: {0}")]
    Sanctions(#[from] payscreen_sanctions::SanctionsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, ScreeningError>;
