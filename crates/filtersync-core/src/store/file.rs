// # File Registry Store
//
// Directory-based implementation of RegistryStore.
//
// ## Layout
//
// ```text
// registry/
// ├── 3f2a...9c.txt     raw text of one list, verbatim
// ├── b71e...04.txt
// └── filters.json      catalog export (written by the daemon)
// ```
//
// ## Crash Safety
//
// Writes go to `<identifier>.tmp` first and are renamed over the target, so
// a crash mid-write leaves the previous baseline intact. A write that fails
// removes its temp file.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::traits::registry_store::RegistryStore;

/// Extension of registry entries
const ENTRY_EXTENSION: &str = "txt";

/// Extension of in-flight writes
const TEMP_EXTENSION: &str = "tmp";

/// File-based registry store
///
/// One file per source, named `<identifier>.txt`, under a root directory.
///
/// # Example
///
/// ```rust,no_run
/// use filtersync_core::store::FileRegistryStore;
/// use filtersync_core::traits::RegistryStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileRegistryStore::new("registry").await?;
///
///     store.write("3f2a", "[Adblock Plus]\n||ads.example^").await?;
///     assert_eq!(store.read("3f2a").await?, "[Adblock Plus]\n||ads.example^");
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileRegistryStore {
    root: PathBuf,
}

impl FileRegistryStore {
    /// Open a registry rooted at `root`, creating the directory if needed
    pub async fn new<P: AsRef<Path>>(root: P) -> Result<Self, Error> {
        let root = root.as_ref().to_path_buf();

        if !root.exists() {
            fs::create_dir_all(&root).await.map_err(|e| {
                Error::config(format!(
                    "Failed to create registry directory {}: {}",
                    root.display(),
                    e
                ))
            })?;
            tracing::debug!("Created registry directory: {}", root.display());
        }

        Ok(Self { root })
    }

    /// Registry root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the entry for an identifier
    pub fn entry_path(&self, identifier: &str) -> Result<PathBuf, Error> {
        Self::check_identifier(identifier)?;
        Ok(self.root.join(format!("{}.{}", identifier, ENTRY_EXTENSION)))
    }

    fn temp_path(&self, identifier: &str) -> PathBuf {
        self.root.join(format!("{}.{}", identifier, TEMP_EXTENSION))
    }

    async fn write_temp(temp_path: &Path, raw_text: &str) -> Result<(), Error> {
        let mut file = fs::File::create(temp_path).await.map_err(|e| {
            Error::registry(format!(
                "Failed to create temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.write_all(raw_text.as_bytes()).await.map_err(|e| {
            Error::registry(format!(
                "Failed to write to temp file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.flush().await.map_err(|e| {
            Error::registry(format!(
                "Failed to flush temp file {}: {}",
                temp_path.display(),
                e
            ))
        })
    }

    /// Identifiers become file names; keep them inside the root.
    fn check_identifier(identifier: &str) -> Result<(), Error> {
        if identifier.is_empty()
            || identifier.contains(['/', '\\'])
            || identifier.contains("..")
        {
            return Err(Error::invalid_input(format!(
                "Invalid registry identifier: {:?}",
                identifier
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl RegistryStore for FileRegistryStore {
    async fn read(&self, identifier: &str) -> Result<String, Error> {
        let path = self.entry_path(identifier)?;

        match fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No registry entry at {}", path.display());
                Ok(String::new())
            }
            Err(e) => Err(Error::registry(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn write(&self, identifier: &str, raw_text: &str) -> Result<(), Error> {
        let path = self.entry_path(identifier)?;
        let temp_path = self.temp_path(identifier);

        let written = match Self::write_temp(&temp_path, raw_text).await {
            Ok(()) => fs::rename(&temp_path, &path).await.map_err(|e| {
                Error::registry(format!(
                    "Failed to rename {} to {}: {}",
                    temp_path.display(),
                    path.display(),
                    e
                ))
            }),
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&temp_path).await
                && cleanup.kind() != std::io::ErrorKind::NotFound
            {
                tracing::warn!(
                    "Failed to remove temp file {}: {}",
                    temp_path.display(),
                    cleanup
                );
            }
            return Err(e);
        }

        tracing::trace!("Registry entry written: {}", path.display());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>, Error> {
        let mut dir = fs::read_dir(&self.root).await.map_err(|e| {
            Error::registry(format!(
                "Failed to list registry {}: {}",
                self.root.display(),
                e
            ))
        })?;

        let mut identifiers = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                identifiers.push(stem.to_string());
            }
        }

        identifiers.sort();
        Ok(identifiers)
    }
}
