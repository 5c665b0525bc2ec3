//! mcsrvstat.us API client with connection pooling and caching.

use crate::types::ServerStatus;
use darkage_common::ServerAddress;
use moka::future::Cache;
use std::time::Duration;
use tracing::{debug, error};

/// Bedrock endpoint of the public API.
pub const DEFAULT_API_BASE: &str = "https://api.mcsrvstat.us/bedrock/3";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);
const CACHE_TTL: Duration = Duration::from_secs(30);

/// Errors raised while fetching a status report.
#[derive(thiserror::Error, Debug)]
pub enum StatusError {
    /// Transport, timeout or decoding failure.
    #[error("status request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status code.
    #[error("status API returned HTTP {0}")]
    UnexpectedStatus(u16),
}

/// Status API client.
#[derive(Clone)]
pub struct StatusFetcher {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, ServerStatus>,
}

impl StatusFetcher {
    /// Creates a fetcher for the public API.
    pub fn new() -> Result<Self, StatusError> {
        Self::with_base_url(DEFAULT_API_BASE)
    }

    /// Creates a fetcher for another API base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, StatusError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("darkage-bot/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache: Cache::builder()
                .max_capacity(64)
                .time_to_live(CACHE_TTL)
                .build(),
        })
    }

    /// Fetches the status of `address`, served from the cache while fresh.
    pub async fn fetch(&self, address: &ServerAddress) -> Result<ServerStatus, StatusError> {
        let key = address.to_string();
        if let Some(status) = self.cache.get(&key).await {
            debug!(%address, "Server status served from cache");
            return Ok(status);
        }

        let url = format!("{}/{}", self.base_url, key);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(StatusError::UnexpectedStatus(response.status().as_u16()));
        }
        let status: ServerStatus = response.json().await?;

        self.cache.insert(key, status.clone()).await;
        Ok(status)
    }

    /// Fetches the status of `address`, logging and swallowing failures.
    pub async fn lookup(&self, address: &ServerAddress) -> Option<ServerStatus> {
        match self.fetch(address).await {
            Ok(status) => Some(status),
            Err(e) => {
                error!(%address, error = %e, "Failed to fetch server data");
                None
            }
        }
    }

    /// Fetches the status and keeps it only when the server is online.
    pub async fn online_status(&self, address: &ServerAddress) -> Option<ServerStatus> {
        self.lookup(address).await.filter(|status| status.online)
    }
}

impl std::fmt::Debug for StatusFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatusFetcher")
            .field("base_url", &self.base_url)
            .field("cached", &self.cache.entry_count())
            .finish_non_exhaustive()
    }
}
