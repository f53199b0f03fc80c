//! Configuration types for filtersync
//!
//! This module defines all configuration structures used throughout the crate.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::catalog::Catalog;

/// Main filtersync configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Directory holding `<identifier>.txt` files and `filters.json`
    #[serde(default = "default_registry_dir")]
    pub registry_dir: PathBuf,

    /// Optional JSON catalog replacing the built-in one
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,

    /// Fetch settings
    #[serde(default)]
    pub fetch: FetchConfig,

    /// Write `filters.json` after syncing
    #[serde(default = "default_export_catalog")]
    pub export_catalog: bool,
}

impl SyncConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self {
            registry_dir: default_registry_dir(),
            catalog_path: None,
            fetch: FetchConfig::default(),
            export_catalog: default_export_catalog(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.registry_dir.as_os_str().is_empty() {
            return Err(crate::Error::config("Registry directory cannot be empty"));
        }

        if let Some(path) = &self.catalog_path
            && path.as_os_str().is_empty()
        {
            return Err(crate::Error::config("Catalog path cannot be empty"));
        }

        self.fetch.validate()
    }

    /// Build the catalog this configuration points at
    pub fn catalog(&self) -> Result<Catalog, crate::Error> {
        match &self.catalog_path {
            Some(path) => Catalog::load(path),
            None => Ok(Catalog::builtin()),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Retries after the first attempt, for transport failures only
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Delay between attempts (in milliseconds)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Transport timeout per request (in seconds)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl FetchConfig {
    /// Validate the fetch configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.max_retries > 10 {
            return Err(crate::Error::config(format!(
                "max_retries must be at most 10. Got: {}",
                self.max_retries
            )));
        }
        if self.retry_delay_ms > 60_000 {
            return Err(crate::Error::config(format!(
                "retry_delay_ms must be at most 60000. Got: {}",
                self.retry_delay_ms
            )));
        }
        if !(1..=600).contains(&self.timeout_secs) {
            return Err(crate::Error::config(format!(
                "timeout_secs must be between 1 and 600. Got: {}",
                self.timeout_secs
            )));
        }
        Ok(())
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_registry_dir() -> PathBuf {
    PathBuf::from("registry")
}

fn default_export_catalog() -> bool {
    true
}

fn default_max_retries() -> usize {
    5
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_timeout_secs() -> u64 {
    30
}
