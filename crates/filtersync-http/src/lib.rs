// # HTTP Filter Fetcher
//
// This crate provides the reqwest-backed FilterFetcher for filtersync.
//
// ## Behavior
//
// - One GET per call; retries are owned by `SyncEngine`
// - A `t=<unix seconds>` query parameter defeats intermediate caches
// - Transport errors and non-2xx statuses are reported as distinct failures
// - The body is returned as text, unparsed

use filtersync_core::config::FetchConfig;
use filtersync_core::traits::FilterFetcher;
use filtersync_core::{Error, Result};

use reqwest::Url;
use std::time::Duration;

/// Default HTTP timeout per request (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Name of the cache-busting query parameter
const CACHE_BUST_PARAM: &str = "t";

const USER_AGENT: &str = concat!("filtersync/", env!("CARGO_PKG_VERSION"));

/// Append the cache-busting parameter to a list URL
///
/// Existing query parameters are kept. An unparseable URL is reported as
/// `Error::InvalidInput`, which the engine does not retry.
pub fn cache_busted_url(url: &str, unix_secs: i64) -> Result<Url> {
    let mut parsed =
        Url::parse(url).map_err(|e| Error::invalid_input(format!("Invalid URL {}: {}", url, e)))?;

    parsed
        .query_pairs_mut()
        .append_pair(CACHE_BUST_PARAM, &unix_secs.to_string());

    Ok(parsed)
}

/// HTTP fetcher for filter lists
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a fetcher with the default timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_HTTP_TIMEOUT)
    }

    /// Create a fetcher with a custom transport timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::from_client(client))
    }

    /// Create a fetcher from fetch configuration
    pub fn from_config(config: &FetchConfig) -> Result<Self> {
        Self::with_timeout(config.timeout())
    }

    /// Wrap an existing client
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl FilterFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let request_url = cache_busted_url(url, chrono::Utc::now().timestamp())?;
        tracing::debug!("Fetching {}", request_url);

        let response = self
            .client
            .get(request_url)
            .send()
            .await
            .map_err(|e| Error::transport(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} answered {}", url, status);
            return Err(Error::status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| Error::transport(format!("Failed to read response from {}: {}", url, e)))
    }

    fn fetcher_name(&self) -> &'static str {
        "http"
    }
}
