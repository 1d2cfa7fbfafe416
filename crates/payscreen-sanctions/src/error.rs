use thiserror::Error;

#[derive(Error, Debug)]
pub enum SanctionsError {
    #[error("Failed to load sanctions list: {0}")]
    ListLoadError(String),

    #[error("Scam database lookup failed: {0}")]
    LookupError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Invalid scam database endpoint: {0}")]
    InvalidEndpoint(String),
}

pub type Result<T> = std::result::Result<T, SanctionsError>;
