use crate::error::{Result, SanctionsError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Outcome of an external scam-database lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScamLookup {
    pub flagged: bool,
    pub detail: Option<String>,
}

/// Policy for screening when the external scam database is unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailMode {
    /// Treat a lookup failure as a clean result for this check only.
    Open,
    /// Apply a moderate risk penalty when the lookup cannot complete.
    Cautious,
}

/// Best-effort external scam-database lookup.
///
/// Implementations must return `Err` on transport failure; the caller
/// decides whether that failure is treated as clean or penalized.
#[async_trait]
pub trait ScamDatabase: Send + Sync {
    async fn lookup(&self, address: &str) -> Result<ScamLookup>;

    fn name(&self) -> &str {
        "scam-database"
    }
}

#[derive(Debug, Deserialize)]
struct ScamDbResponse {
    flagged: bool,
    #[serde(default)]
    category: Option<String>,
}

/// HTTP client for a hosted scam-address database.
///
/// Expects a `GET {base_url}/check/{address}` endpoint returning
/// `{"flagged": bool, "category": "..."}`.
pub struct HttpScamDatabase {
    http_client: Arc<reqwest::Client>,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpScamDatabase {
    pub fn try_new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| SanctionsError::InvalidEndpoint(format!("{}: {}", base_url, e)))?;

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SanctionsError::LookupError(e.to_string()))?;

        tracing::info!(endpoint = %base_url, "Initialized scam database client");

        Ok(Self {
            http_client: Arc::new(http_client),
            base_url,
            api_key,
        })
    }
}

#[async_trait]
impl ScamDatabase for HttpScamDatabase {
    async fn lookup(&self, address: &str) -> Result<ScamLookup> {
        let url = self
            .base_url
            .join(&format!("check/{}", address.to_lowercase()))
            .map_err(|e| SanctionsError::InvalidEndpoint(e.to_string()))?;

        let mut request = self.http_client.get(url);
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SanctionsError::LookupError(e.to_string()))?;

        let body: ScamDbResponse = response
            .error_for_status()
            .map_err(|e| SanctionsError::LookupError(e.to_string()))?
            .json()
            .await
            .map_err(|e| SanctionsError::LookupError(e.to_string()))?;

        Ok(ScamLookup {
            flagged: body.flagged,
            detail: body.category,
        })
    }

    fn name(&self) -> &str {
        "http-scam-database"
    }
}
