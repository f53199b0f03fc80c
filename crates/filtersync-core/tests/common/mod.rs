//! Test doubles and common utilities for sync contract tests
//!
//! These doubles record calls so tests can assert on what the engine did,
//! not only on what it returned.

#![allow(dead_code)]

use filtersync_core::catalog::{Catalog, FilterEntry, FilterGroup};
use filtersync_core::error::{Error, Result};
use filtersync_core::traits::{FilterFetcher, RegistryStore};
use filtersync_core::{MemoryRegistryStore, SyncSettings};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted response for one fetch call
#[derive(Debug, Clone)]
pub enum Reply {
    Body(String),
    Transport(String),
    Status(u16),
    Invalid(String),
}

impl Reply {
    pub fn body(text: &str) -> Self {
        Reply::Body(text.to_string())
    }
}

/// A fetcher that replays scripted replies per URL
///
/// The last reply for a URL repeats once its queue is down to one item.
/// URLs without a script fail with a transport error.
#[derive(Clone, Default)]
pub struct ScriptedFetcher {
    replies: Arc<Mutex<HashMap<String, VecDeque<Reply>>>>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue replies for a URL
    pub fn script(self, url: &str, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(url.to_string(), replies.into_iter().collect());
        self
    }

    /// Number of fetch calls for a URL
    pub fn call_count(&self, url: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|u| *u == url).count()
    }

    /// Total number of fetch calls
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl FilterFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.calls.lock().unwrap().push(url.to_string());

        let reply = {
            let mut replies = self.replies.lock().unwrap();
            match replies.get_mut(url) {
                Some(queue) if queue.len() > 1 => queue.pop_front(),
                Some(queue) => queue.front().cloned(),
                None => None,
            }
        };

        match reply {
            Some(Reply::Body(text)) => Ok(text),
            Some(Reply::Transport(msg)) => Err(Error::transport(msg)),
            Some(Reply::Status(status)) => Err(Error::status(status)),
            Some(Reply::Invalid(msg)) => Err(Error::invalid_input(msg)),
            None => Err(Error::transport(format!("no route to {}", url))),
        }
    }

    fn fetcher_name(&self) -> &'static str {
        "scripted"
    }
}

/// A registry store that counts reads and writes
#[derive(Clone, Default)]
pub struct CountingStore {
    inner: MemoryRegistryStore,
    read_call_count: Arc<AtomicUsize>,
    write_call_count: Arc<AtomicUsize>,
}

impl CountingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with existing entries (not counted as writes)
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            inner: MemoryRegistryStore::with_entries(entries),
            ..Self::default()
        }
    }

    pub fn read_call_count(&self) -> usize {
        self.read_call_count.load(Ordering::SeqCst)
    }

    pub fn write_call_count(&self) -> usize {
        self.write_call_count.load(Ordering::SeqCst)
    }

    /// Current stored text, bypassing the counters
    pub async fn peek(&self, identifier: &str) -> String {
        self.inner.read(identifier).await.unwrap()
    }

    pub async fn contains(&self, identifier: &str) -> bool {
        self.inner.contains(identifier).await
    }
}

#[async_trait::async_trait]
impl RegistryStore for CountingStore {
    async fn read(&self, identifier: &str) -> Result<String> {
        self.read_call_count.fetch_add(1, Ordering::SeqCst);
        self.inner.read(identifier).await
    }

    async fn write(&self, identifier: &str, raw_text: &str) -> Result<()> {
        self.write_call_count.fetch_add(1, Ordering::SeqCst);
        self.inner.write(identifier, raw_text).await
    }

    async fn list(&self) -> Result<Vec<String>> {
        self.inner.list().await
    }
}

/// A registry store whose reads always fail
pub struct BrokenStore;

#[async_trait::async_trait]
impl RegistryStore for BrokenStore {
    async fn read(&self, _identifier: &str) -> Result<String> {
        Err(Error::registry("disk unavailable"))
    }

    async fn write(&self, _identifier: &str, _raw_text: &str) -> Result<()> {
        panic!("write must not be reached after a failed read");
    }

    async fn list(&self) -> Result<Vec<String>> {
        Err(Error::registry("disk unavailable"))
    }
}

/// Catalog with one `ads` entry per URL
pub fn catalog_of(urls: &[&str]) -> Catalog {
    Catalog::new(
        urls.iter()
            .enumerate()
            .map(|(i, url)| FilterEntry::new(FilterGroup::Ads, *url, format!("List {}", i)))
            .collect(),
    )
}

/// Retry settings that never sleep
pub fn fast_settings(max_retries: usize) -> SyncSettings {
    SyncSettings {
        max_retries,
        retry_delay: Duration::ZERO,
    }
}
