// # filtersyncd - filter list mirror
//
// Thin integration layer over filtersync-core. One invocation performs one
// pass over the catalog and exits:
//
// 1. Read configuration from environment variables
// 2. Initialize logging
// 3. Build the catalog, fetcher and registry store
// 4. Sync every source and export `filters.json`
//
// ## Configuration
//
// - `FILTERSYNC_REGISTRY_DIR`: Registry directory (default: `registry`)
// - `FILTERSYNC_CATALOG_PATH`: JSON catalog file (default: built-in catalog)
// - `FILTERSYNC_MAX_RETRIES`: Fetch retries after the first attempt (0-10, default 5)
// - `FILTERSYNC_RETRY_DELAY_MS`: Delay between fetch attempts (0-60000, default 1000)
// - `FILTERSYNC_TIMEOUT_SECS`: HTTP timeout per request (1-600, default 30)
// - `FILTERSYNC_EXPORT_CATALOG`: Write `filters.json` (true/false, default true)
// - `FILTERSYNC_LOG_LEVEL`: trace, debug, info, warn, error (default info)
//
// ## Example
//
// ```bash
// export FILTERSYNC_REGISTRY_DIR=/srv/filters/registry
// export FILTERSYNC_CATALOG_PATH=/etc/filtersync/catalog.json
// filtersyncd
// ```

use anyhow::{Context, Result};
use filtersync_core::config::{FetchConfig, SyncConfig};
use filtersync_core::traits::RegistryStore;
use filtersync_core::{Catalog, FileRegistryStore, FilterFetcher, SyncEngine, SyncSettings};
use std::collections::HashSet;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// File name of the catalog export inside the registry directory
const CATALOG_EXPORT_FILE: &str = "filters.json";

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SyncExitCode {
    /// Every source synced (updated or unchanged)
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime error (unexpected failure)
    RuntimeError = 2,
    /// At least one source failed
    PartialFailure = 3,
}

impl From<SyncExitCode> for ExitCode {
    fn from(code: SyncExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    sync: SyncConfig,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        let defaults = FetchConfig::default();

        let mut sync = SyncConfig::new();
        if let Ok(dir) = env::var("FILTERSYNC_REGISTRY_DIR") {
            sync.registry_dir = PathBuf::from(dir);
        }
        sync.catalog_path = env::var("FILTERSYNC_CATALOG_PATH").ok().map(PathBuf::from);
        sync.fetch = FetchConfig {
            max_retries: parse_var("FILTERSYNC_MAX_RETRIES", defaults.max_retries)?,
            retry_delay_ms: parse_var("FILTERSYNC_RETRY_DELAY_MS", defaults.retry_delay_ms)?,
            timeout_secs: parse_var("FILTERSYNC_TIMEOUT_SECS", defaults.timeout_secs)?,
        };
        sync.export_catalog = parse_var("FILTERSYNC_EXPORT_CATALOG", sync.export_catalog)?;

        Ok(Self {
            sync,
            log_level: env::var("FILTERSYNC_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.sync.validate()?;

        if let Some(path) = &self.sync.catalog_path
            && !path.is_file()
        {
            anyhow::bail!(
                "FILTERSYNC_CATALOG_PATH does not point to a file: {}",
                path.display()
            );
        }

        self.level()?;
        Ok(())
    }

    fn level(&self) -> Result<Level> {
        match self.log_level.to_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => anyhow::bail!(
                "FILTERSYNC_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }
    }
}

/// Parse an optional environment variable, falling back to a default when unset
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} has invalid value '{}': {}", name, value, e)),
        Err(_) => Ok(default),
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return SyncExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return SyncExitCode::ConfigError.into();
    }

    // Initialize tracing
    let log_level = config.level().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return SyncExitCode::ConfigError.into();
    }

    let catalog = match config.sync.catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("Failed to load catalog: {}", e);
            return SyncExitCode::ConfigError.into();
        }
    };

    info!("Starting filtersyncd: {} filter(s)", catalog.len());

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return SyncExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        match run(config.sync, catalog).await {
            Ok(code) => code,
            Err(e) => {
                error!("Sync error: {:#}", e);
                SyncExitCode::RuntimeError
            }
        }
    })
    .into()
}

async fn run(config: SyncConfig, catalog: Catalog) -> Result<SyncExitCode> {
    let fetcher = build_fetcher(&config.fetch)?;
    sync_pass(&config, catalog, fetcher).await
}

/// Run one sync pass with the given fetcher
async fn sync_pass(
    config: &SyncConfig,
    catalog: Catalog,
    fetcher: Box<dyn FilterFetcher>,
) -> Result<SyncExitCode> {
    let store = FileRegistryStore::new(&config.registry_dir).await?;

    let engine = SyncEngine::new(
        fetcher,
        Box::new(store.clone()),
        catalog,
        SyncSettings::from(&config.fetch),
    )?;

    info!("Registry: {}", store.root().display());
    let report = engine.sync_all().await;

    for source in &report.sources {
        if let Some(e) = source.outcome.error() {
            error!("{} ({}): {}", source.title, source.url, e);
        }
    }

    report_orphans(&store, engine.catalog()).await;

    if config.export_catalog {
        let path = store.root().join(CATALOG_EXPORT_FILE);
        let json = engine.catalog().export_json()?;
        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write catalog export {}", path.display()))?;
        info!("Catalog exported to {}", path.display());
    }

    if report.has_failures() {
        Ok(SyncExitCode::PartialFailure)
    } else {
        Ok(SyncExitCode::Success)
    }
}

/// Warn about registry entries no catalog source maps to
async fn report_orphans(store: &FileRegistryStore, catalog: &Catalog) {
    let known: HashSet<&str> = catalog
        .entries()
        .iter()
        .map(|entry| entry.source.identifier())
        .collect();

    match store.list().await {
        Ok(identifiers) => {
            for id in identifiers.iter().filter(|id| !known.contains(id.as_str())) {
                warn!("Registry entry {}.txt has no catalog source", id);
            }
        }
        Err(e) => warn!("Could not list registry: {}", e),
    }
}

#[cfg(feature = "http")]
fn build_fetcher(config: &FetchConfig) -> Result<Box<dyn FilterFetcher>> {
    Ok(Box::new(filtersync_http::HttpFetcher::from_config(config)?))
}

#[cfg(not(feature = "http"))]
fn build_fetcher(_config: &FetchConfig) -> Result<Box<dyn FilterFetcher>> {
    anyhow::bail!("filtersyncd was built without a fetcher; enable the `http` feature")
}
