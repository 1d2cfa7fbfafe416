//! Block-explorer-backed chain data source.
//!
//! Talks to an Etherscan-compatible HTTP API. The explorer reports "no
//! records" through its status envelope rather than an empty result, so
//! this adapter folds that case back into `Ok(empty)` per the
//! [`ChainDataSource`] contract.
//!
//! Environment variables used by [`HttpExplorerSource::from_env`]:
//! - `EXPLORER_API_URL` — API endpoint (defaults to the public Etherscan API)
//! - `EXPLORER_API_KEY` — optional API key appended to every request

use crate::address::WalletAddress;
use crate::chain::{ChainDataSource, ContractMetadata, TransferRecord};
use crate::config::ExplorerConfig;
use crate::error::{Result, ScreeningError};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::env;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

const ENV_EXPLORER_URL: &str = "EXPLORER_API_URL";
const ENV_EXPLORER_API_KEY: &str = "EXPLORER_API_KEY";

/// Status envelope shared by account/contract module responses.
#[derive(Debug, Deserialize)]
struct ExplorerEnvelope {
    status: String,
    message: String,
    result: serde_json::Value,
}

/// Envelope for `module=proxy` JSON-RPC passthrough responses.
#[derive(Debug, Deserialize)]
struct ProxyEnvelope {
    result: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExplorerTx {
    from: String,
    to: String,
    value: String,
    #[serde(rename = "timeStamp")]
    time_stamp: String,
    #[serde(rename = "contractAddress", default)]
    contract_address: String,
}

#[derive(Debug, Deserialize)]
struct ExplorerSource {
    #[serde(rename = "SourceCode", default)]
    source_code: String,
    #[serde(rename = "ContractName", default)]
    contract_name: String,
    #[serde(rename = "CompilerVersion", default)]
    compiler_version: String,
}

/// [`ChainDataSource`] implementation over an Etherscan-style API.
pub struct HttpExplorerSource {
    http_client: Arc<reqwest::Client>,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpExplorerSource {
    pub fn try_new(config: &ExplorerConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ScreeningError::Config(format!("Invalid explorer URL: {}", e)))?;

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScreeningError::Config(e.to_string()))?;

        tracing::info!(endpoint = %base_url, "Initialized block explorer source");

        Ok(Self {
            http_client: Arc::new(http_client),
            base_url,
            api_key: config.api_key.clone(),
        })
    }

    /// Build from environment variables, falling back to config defaults.
    /// `.env` values are loaded first.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = ExplorerConfig::default();
        if let Ok(url) = env::var(ENV_EXPLORER_URL) {
            config.base_url = url;
        }
        if let Ok(key) = env::var(ENV_EXPLORER_API_KEY) {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }
        Self::try_new(&config)
    }

    async fn call<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T> {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            for (key, value) in params {
                query.append_pair(key, value);
            }
            if let Some(api_key) = &self.api_key {
                query.append_pair("apikey", api_key);
            }
        }

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| ScreeningError::Upstream(e.to_string()))?;

        response
            .error_for_status()
            .map_err(|e| ScreeningError::Upstream(e.to_string()))?
            .json()
            .await
            .map_err(|e| ScreeningError::Upstream(e.to_string()))
    }

    fn parse_u128(value: &str, field: &str) -> Result<u128> {
        value
            .parse::<u128>()
            .map_err(|_| ScreeningError::Upstream(format!("Unparseable {}: {}", field, value)))
    }

    fn parse_u64(value: &str, field: &str) -> Result<u64> {
        value
            .parse::<u64>()
            .map_err(|_| ScreeningError::Upstream(format!("Unparseable {}: {}", field, value)))
    }
}

#[async_trait]
impl ChainDataSource for HttpExplorerSource {
    async fn transactions(&self, address: &WalletAddress) -> Result<Vec<TransferRecord>> {
        let envelope: ExplorerEnvelope = self
            .call(&[
                ("module", "account"),
                ("action", "txlist"),
                ("address", address.as_str()),
                ("startblock", "0"),
                ("endblock", "99999999"),
                ("sort", "asc"),
            ])
            .await?;

        // "No transactions found" arrives as a non-ok status; that is data,
        // not a failure.
        if envelope.status != "1" {
            if envelope.message.contains("No transactions found") {
                return Ok(Vec::new());
            }
            return Err(ScreeningError::Upstream(format!(
                "Explorer txlist error: {}",
                envelope.message
            )));
        }

        let raw: Vec<ExplorerTx> = serde_json::from_value(envelope.result)
            .map_err(|e| ScreeningError::Upstream(format!("Malformed txlist result: {}", e)))?;

        raw.iter()
            .map(|tx| {
                Ok(TransferRecord {
                    from: tx.from.to_lowercase(),
                    to: tx.to.to_lowercase(),
                    value_wei: Self::parse_u128(&tx.value, "value")?,
                    timestamp: Self::parse_u64(&tx.time_stamp, "timestamp")?,
                    contract_address: if tx.contract_address.is_empty() {
                        None
                    } else {
                        Some(tx.contract_address.to_lowercase())
                    },
                })
            })
            .collect()
    }

    async fn native_balance(&self, address: &WalletAddress) -> Result<u128> {
        let envelope: ExplorerEnvelope = self
            .call(&[
                ("module", "account"),
                ("action", "balance"),
                ("address", address.as_str()),
                ("tag", "latest"),
            ])
            .await?;

        if envelope.status != "1" {
            return Err(ScreeningError::Upstream(format!(
                "Explorer balance error: {}",
                envelope.message
            )));
        }

        let raw: String = serde_json::from_value(envelope.result)
            .map_err(|e| ScreeningError::Upstream(format!("Malformed balance result: {}", e)))?;
        Self::parse_u128(&raw, "balance")
    }

    async fn has_code(&self, address: &WalletAddress) -> Result<bool> {
        let envelope: ProxyEnvelope = self
            .call(&[
                ("module", "proxy"),
                ("action", "eth_getCode"),
                ("address", address.as_str()),
                ("tag", "latest"),
            ])
            .await?;

        let code = envelope
            .result
            .ok_or_else(|| ScreeningError::Upstream("Empty eth_getCode response".to_string()))?;
        Ok(code != "0x" && !code.is_empty())
    }

    async fn contract_metadata(&self, address: &WalletAddress) -> Result<ContractMetadata> {
        let envelope: ExplorerEnvelope = self
            .call(&[
                ("module", "contract"),
                ("action", "getsourcecode"),
                ("address", address.as_str()),
            ])
            .await?;

        if envelope.status != "1" {
            return Err(ScreeningError::Upstream(format!(
                "Explorer getsourcecode error: {}",
                envelope.message
            )));
        }

        let sources: Vec<ExplorerSource> = serde_json::from_value(envelope.result)
            .map_err(|e| ScreeningError::Upstream(format!("Malformed source result: {}", e)))?;

        let source = sources
            .into_iter()
            .next()
            .ok_or_else(|| ScreeningError::Upstream("Empty getsourcecode response".to_string()))?;

        // Unverified contracts come back with an empty SourceCode field.
        let is_verified = !source.source_code.is_empty();
        Ok(ContractMetadata {
            is_verified,
            name: (!source.contract_name.is_empty()).then_some(source.contract_name),
            compiler_version: (!source.compiler_version.is_empty())
                .then_some(source.compiler_version),
        })
    }
}
