// # Memory Registry Store
//
// In-memory implementation of RegistryStore.
//
// Nothing survives the process. Useful for tests and dry runs where the
// registry directory must not be touched.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::registry_store::RegistryStore;

/// In-memory registry store
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryRegistryStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryRegistryStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            inner: Arc::new(RwLock::new(map)),
        }
    }

    /// Get the number of entries in the store
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    /// Check if the store is empty
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    /// Whether an entry exists (as opposed to reading as empty)
    pub async fn contains(&self, identifier: &str) -> bool {
        self.inner.read().await.contains_key(identifier)
    }
}

#[async_trait]
impl RegistryStore for MemoryRegistryStore {
    async fn read(&self, identifier: &str) -> Result<String, Error> {
        Ok(self
            .inner
            .read()
            .await
            .get(identifier)
            .cloned()
            .unwrap_or_default())
    }

    async fn write(&self, identifier: &str, raw_text: &str) -> Result<(), Error> {
        self.inner
            .write()
            .await
            .insert(identifier.to_string(), raw_text.to_string());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<String>, Error> {
        let mut identifiers: Vec<String> = self.inner.read().await.keys().cloned().collect();
        identifiers.sort();
        Ok(identifiers)
    }
}
