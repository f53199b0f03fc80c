// # Filter Fetcher Trait
//
// Defines the interface for retrieving the current content of a remote
// filter list.
//
// ## Responsibilities
//
// A fetcher performs exactly one request per call and classifies the outcome:
//
// - `FilterFailure::Transport`: the request never completed
// - `FilterFailure::Status`: the server answered with a non-2xx status
//
// Retries are owned by `SyncEngine`; a fetcher must not retry on its own.

use async_trait::async_trait;

/// Trait for filter list fetchers
///
/// Implementations must be usable across async tasks.
#[async_trait]
pub trait FilterFetcher: Send + Sync {
    /// Fetch the raw text of the list at `url`
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The response body, unparsed
    /// - `Err(Error::Filter(_))`: Transport or status failure
    async fn fetch(&self, url: &str) -> Result<String, crate::Error>;

    /// Short name used in logs
    fn fetcher_name(&self) -> &'static str;
}
