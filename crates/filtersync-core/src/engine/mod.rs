//! Filter list sync engine
//!
//! The SyncEngine is responsible for:
//! - Fetching the current text of each catalog source (with bounded retries)
//! - Comparing it against the registry baseline by canonical form
//! - Writing the raw fetched text only when the canonical forms differ
//! - Reporting a per-source outcome without letting one failure stop the run
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────┐
//! │ FilterFetcher │─── raw text ───┐
//! └───────────────┘                │
//!                                  ▼
//!                          ┌──────────────┐
//!                          │  SyncEngine  │── canonicalize(new) == canonicalize(stored)?
//!                          └──────────────┘
//!                                  │
//!                                  ▼
//!                          ┌───────────────┐
//!                          │ RegistryStore │  read baseline / write on change
//!                          └───────────────┘
//! ```
//!
//! ## Flow per source
//!
//! 1. Fetch; on failure stop here (registry untouched)
//! 2. Read stored raw text ("" when absent)
//! 3. Equal canonical forms -> `Unchanged`, nothing written
//! 4. Otherwise write the fetched raw text -> `Updated`

use std::time::Duration;

use crate::canonical::canonicalize;
use crate::catalog::Catalog;
use crate::config::FetchConfig;
use crate::error::{Error, Result};
use crate::source::FilterSource;
use crate::traits::{FilterFetcher, RegistryStore};
use tracing::{debug, info, warn};

/// Result of syncing one source
#[derive(Debug)]
pub enum SyncOutcome {
    /// Canonical forms matched; the registry was not written
    Unchanged,

    /// The registry entry was replaced with the fetched text
    Updated,

    /// Fetching or registry access failed; the registry was not written
    Failed(Error),
}

impl SyncOutcome {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, SyncOutcome::Unchanged)
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, SyncOutcome::Updated)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SyncOutcome::Failed(_))
    }

    /// The failure, if any
    pub fn error(&self) -> Option<&Error> {
        match self {
            SyncOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// Outcome for one catalog entry
#[derive(Debug)]
pub struct SourceReport {
    pub title: String,
    pub url: String,
    pub identifier: String,
    pub outcome: SyncOutcome,
}

/// Outcomes of a full pass over the catalog, in catalog order
#[derive(Debug, Default)]
pub struct SyncReport {
    pub sources: Vec<SourceReport>,
}

impl SyncReport {
    pub fn updated(&self) -> usize {
        self.sources.iter().filter(|s| s.outcome.is_updated()).count()
    }

    pub fn unchanged(&self) -> usize {
        self.sources.iter().filter(|s| s.outcome.is_unchanged()).count()
    }

    pub fn failed(&self) -> usize {
        self.sources.iter().filter(|s| s.outcome.is_failed()).count()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Look up the report for a source identifier
    pub fn get(&self, identifier: &str) -> Option<&SourceReport> {
        self.sources.iter().find(|s| s.identifier == identifier)
    }
}

/// Retry settings for the fetch step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncSettings {
    /// Retries after the first attempt (transport failures only)
    pub max_retries: usize,

    /// Delay between attempts
    pub retry_delay: Duration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings::from(&FetchConfig::default())
    }
}

impl From<&FetchConfig> for SyncSettings {
    fn from(config: &FetchConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            retry_delay: config.retry_delay(),
        }
    }
}

/// Core sync engine
///
/// Holds the catalog it was constructed with; the catalog never changes for
/// the lifetime of the engine. Sources are processed one at a time.
pub struct SyncEngine {
    /// Fetcher for remote lists
    fetcher: Box<dyn FilterFetcher>,

    /// Registry of accepted raw texts
    store: Box<dyn RegistryStore>,

    /// Sources to mirror
    catalog: Catalog,

    /// Fetch retry policy
    settings: SyncSettings,
}

impl SyncEngine {
    /// Create a new sync engine
    ///
    /// # Parameters
    ///
    /// - `fetcher`: Fetcher implementation
    /// - `store`: Registry store implementation
    /// - `catalog`: Sources to mirror (validated here)
    /// - `settings`: Fetch retry policy
    pub fn new(
        fetcher: Box<dyn FilterFetcher>,
        store: Box<dyn RegistryStore>,
        catalog: Catalog,
        settings: SyncSettings,
    ) -> Result<Self> {
        catalog.validate()?;

        Ok(Self {
            fetcher,
            store,
            catalog,
            settings,
        })
    }

    /// The catalog this engine mirrors
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Sync every catalog source, in order
    ///
    /// A failing source is recorded in the report and the pass continues.
    pub async fn sync_all(&self) -> SyncReport {
        let mut report = SyncReport::default();

        for entry in self.catalog.entries() {
            let outcome = self.sync(&entry.source).await;

            match &outcome {
                SyncOutcome::Updated => info!("Updated filter '{}' ({})", entry.title, entry.source),
                SyncOutcome::Unchanged => debug!("Filter '{}' unchanged", entry.title),
                SyncOutcome::Failed(e) => warn!("Failed to sync filter '{}': {}", entry.title, e),
            }

            report.sources.push(SourceReport {
                title: entry.title.clone(),
                url: entry.source.url().to_string(),
                identifier: entry.source.identifier().to_string(),
                outcome,
            });
        }

        info!(
            "Sync finished: {} updated, {} unchanged, {} failed",
            report.updated(),
            report.unchanged(),
            report.failed()
        );

        report
    }

    /// Sync a single source
    pub async fn sync(&self, source: &FilterSource) -> SyncOutcome {
        let fetched = match self.fetch_with_retry(source.url()).await {
            Ok(text) => text,
            Err(e) => return SyncOutcome::Failed(e),
        };

        match self.apply(source, &fetched).await {
            Ok(outcome) => outcome,
            Err(e) => SyncOutcome::Failed(e),
        }
    }

    /// Compare fetched text against the baseline and write on change
    async fn apply(&self, source: &FilterSource, fetched: &str) -> Result<SyncOutcome> {
        let stored = self.store.read(source.identifier()).await?;

        if canonicalize(fetched) == canonicalize(&stored) {
            debug!("{} matches registry entry {}, skipping write", source, source.identifier());
            return Ok(SyncOutcome::Unchanged);
        }

        self.store.write(source.identifier(), fetched).await?;
        Ok(SyncOutcome::Updated)
    }

    /// Fetch a URL, retrying transport failures
    ///
    /// Status failures are returned immediately: the server answered, and
    /// asking again will not change its mind.
    async fn fetch_with_retry(&self, url: &str) -> Result<String> {
        let mut attempt = 0;
        loop {
            match self.fetcher.fetch(url).await {
                Ok(text) => return Ok(text),
                Err(e) => {
                    let transient = e.as_filter_failure().is_some_and(|f| f.is_transient());
                    if !transient || attempt >= self.settings.max_retries {
                        return Err(e);
                    }

                    attempt += 1;
                    warn!(
                        "Fetch attempt {} of {} via {} failed for {}: {}",
                        attempt,
                        self.settings.max_retries + 1,
                        self.fetcher.fetcher_name(),
                        url,
                        e
                    );

                    if !self.settings.retry_delay.is_zero() {
                        tokio::time::sleep(self.settings.retry_delay).await;
                    }
                }
            }
        }
    }
}
