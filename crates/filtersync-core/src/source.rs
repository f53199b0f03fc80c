//! Filter source identity
//!
//! A source is addressed in the registry by the SHA-256 of its URL, so the
//! stored file name never depends on the list title or content.

use sha2::{Digest, Sha256};
use std::fmt;

/// Compute the registry identifier for a URL: lowercase hex SHA-256 of its bytes.
pub fn identifier(url: &str) -> String {
    format!("{:x}", Sha256::digest(url.as_bytes()))
}

/// A remote filter list and its registry identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FilterSource {
    url: String,
    identifier: String,
}

impl FilterSource {
    /// Create a source from its URL
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let identifier = identifier(&url);
        Self { url, identifier }
    }

    /// The remote URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The content-address of this source
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Registry file name, `<identifier>.txt`
    pub fn file_name(&self) -> String {
        format!("{}.txt", self.identifier)
    }
}

impl fmt::Display for FilterSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}
