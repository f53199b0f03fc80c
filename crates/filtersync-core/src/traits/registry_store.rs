// # Registry Store Trait
//
// Defines the interface for the persisted filter registry.
//
// ## Purpose
//
// The registry keeps the last accepted raw text of every mirrored list,
// keyed by the source identifier (SHA-256 of the URL). It is the baseline the
// engine compares fresh downloads against.
//
// ## Usage
//
// ```rust,ignore
// use filtersync_core::RegistryStore;
//
// let stored = store.read(source.identifier()).await?;   // "" if never synced
// store.write(source.identifier(), &fetched).await?;      // only after a change
// ```

use async_trait::async_trait;

/// Trait for registry store implementations
///
/// # Thread Safety
///
/// All methods must be safe to call concurrently from multiple tasks.
/// Distinct identifiers never contend with each other.
///
/// ## Implementation Guidelines
///
/// - **Verbatim**: `write` stores exactly the text it is given
/// - **Absence is empty**: `read` of an unknown identifier returns `""`
/// - **No decisions**: whether to write is owned by `SyncEngine`
#[async_trait]
pub trait RegistryStore: Send + Sync {
    /// Read the stored raw text for an identifier
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The stored text, or `""` if no entry exists
    /// - `Err(Error)`: Storage error
    async fn read(&self, identifier: &str) -> Result<String, crate::Error>;

    /// Replace the stored raw text for an identifier
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Successfully persisted
    /// - `Err(Error)`: Storage error
    async fn write(&self, identifier: &str, raw_text: &str) -> Result<(), crate::Error>;

    /// List the identifiers that have an entry
    async fn list(&self) -> Result<Vec<String>, crate::Error>;
}
