//! Catalog of mirrored filter lists
//!
//! The catalog is the static configuration of which lists are mirrored. It is
//! built once at startup, validated, and handed to the [`SyncEngine`] by value.
//!
//! Downstream consumers read the exported descriptors (`filters.json`) to
//! decide which lists to offer; the descriptor shape is a stable contract:
//!
//! ```json
//! [
//!   {
//!     "file_name": "<sha256 of url>.txt",
//!     "title": "ChrisEric1 CECL's filters",
//!     "group": "default",
//!     "enabled_by_default": true
//!   }
//! ]
//! ```
//!
//! [`SyncEngine`]: crate::engine::SyncEngine

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use url::Url;

use crate::error::{Error, Result};
use crate::source::FilterSource;

/// URL of the list shipped in the built-in catalog
pub const BUILTIN_FILTER_URL: &str = "https://CE1CECL.GitHub.io/privaxy.txt";

/// Category a filter list is presented under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterGroup {
    Default,
    Regional,
    Ads,
    Privacy,
    Malware,
    Social,
}

impl FilterGroup {
    /// Wire name of the group
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterGroup::Default => "default",
            FilterGroup::Regional => "regional",
            FilterGroup::Ads => "ads",
            FilterGroup::Privacy => "privacy",
            FilterGroup::Malware => "malware",
            FilterGroup::Social => "social",
        }
    }
}

impl fmt::Display for FilterGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One configured filter list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterEntry {
    pub group: FilterGroup,
    pub source: FilterSource,
    pub title: String,
    pub enabled_by_default: bool,
}

impl FilterEntry {
    /// Create a new entry, disabled by default
    pub fn new(group: FilterGroup, url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            group,
            source: FilterSource::new(url),
            title: title.into(),
            enabled_by_default: false,
        }
    }

    /// Enable or disable the entry by default
    pub fn with_enabled_by_default(mut self, enabled: bool) -> Self {
        self.enabled_by_default = enabled;
        self
    }

    /// Export record for this entry
    pub fn descriptor(&self) -> FilterDescriptor {
        FilterDescriptor {
            file_name: self.source.file_name(),
            title: self.title.clone(),
            group: self.group,
            enabled_by_default: self.enabled_by_default,
        }
    }
}

/// Exported description of a mirrored list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDescriptor {
    pub file_name: String,
    pub title: String,
    pub group: FilterGroup,
    pub enabled_by_default: bool,
}

/// Catalog file format: one item per list
#[derive(Debug, Clone, Deserialize)]
struct CatalogItem {
    url: String,
    title: String,
    group: FilterGroup,
    #[serde(default)]
    enabled_by_default: bool,
}

/// Ordered, immutable set of mirrored filter lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<FilterEntry>,
}

impl Catalog {
    /// Create a catalog from entries (not validated)
    pub fn new(entries: Vec<FilterEntry>) -> Self {
        Self { entries }
    }

    /// The default curated catalog
    ///
    /// Mostly derived from the uBlock Origin asset list.
    pub fn builtin() -> Self {
        Self::new(vec![
            FilterEntry::new(
                FilterGroup::Default,
                BUILTIN_FILTER_URL,
                "ChrisEric1 CECL's filters",
            )
            .with_enabled_by_default(true),
        ])
    }

    /// Parse a catalog from its JSON representation
    pub fn from_json(json: &str) -> Result<Self> {
        let items: Vec<CatalogItem> = serde_json::from_str(json)?;
        let entries = items
            .into_iter()
            .map(|item| {
                FilterEntry::new(item.group, item.url, item.title)
                    .with_enabled_by_default(item.enabled_by_default)
            })
            .collect();
        Ok(Self::new(entries))
    }

    /// Load and validate a catalog file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read catalog {}: {}", path.display(), e))
        })?;

        let catalog = Self::from_json(&json)?;
        catalog.validate()?;
        tracing::debug!("Loaded catalog from {}: {} filters", path.display(), catalog.len());
        Ok(catalog)
    }

    /// Validate the catalog
    ///
    /// Two entries with the same URL would share one registry file, so
    /// duplicates are rejected.
    pub fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(Error::config("Catalog contains no filters"));
        }

        let mut seen = HashSet::new();
        for entry in &self.entries {
            let url = entry.source.url();
            if url.is_empty() {
                return Err(Error::config("Filter URL cannot be empty"));
            }
            let parsed = Url::parse(url)
                .map_err(|e| Error::config(format!("Invalid filter URL {}: {}", url, e)))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(Error::config(format!(
                    "Filter URL must use HTTP or HTTPS scheme. Got: {}",
                    url
                )));
            }
            if entry.title.trim().is_empty() {
                return Err(Error::config(format!("Filter {} has an empty title", url)));
            }
            if !seen.insert(entry.source.identifier()) {
                return Err(Error::config(format!("Duplicate filter URL: {}", url)));
            }
        }

        Ok(())
    }

    pub fn entries(&self) -> &[FilterEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Export records for every entry, in catalog order
    pub fn descriptors(&self) -> Vec<FilterDescriptor> {
        self.entries.iter().map(FilterEntry::descriptor).collect()
    }

    /// Export records as pretty-printed JSON
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.descriptors())?)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
