//! Contract Test: Change Detection & Idempotency
//!
//! Constraints verified:
//! - Cosmetic changes (header comments, rule order) never rewrite the registry
//! - Real changes store the fetched raw text verbatim, not its canonical form
//! - On `Unchanged`, the older raw text stays authoritative
//! - Empty-to-empty transitions do not create an entry

mod common;

use common::*;
use filtersync_core::{FilterSource, SyncEngine, SyncOutcome, identifier};

const URL: &str = "https://lists.example/ads.txt";

fn engine(fetcher: ScriptedFetcher, store: CountingStore) -> SyncEngine {
    SyncEngine::new(
        Box::new(fetcher),
        Box::new(store),
        catalog_of(&[URL]),
        fast_settings(0),
    )
    .expect("engine construction succeeds")
}

#[tokio::test]
async fn timestamp_only_change_is_unchanged_and_not_written() {
    let stored = "[List]\n! generated 2020\nalpha\nzeta";
    let fetched = "[List]\n! generated 2024\nzeta\nalpha";

    let id = identifier(URL);
    let store = CountingStore::with_entries([(id.as_str(), stored)]);
    let fetcher = ScriptedFetcher::new().script(URL, [Reply::body(fetched)]);

    let outcome = engine(fetcher, store.clone()).sync(&FilterSource::new(URL)).await;

    assert!(outcome.is_unchanged(), "got {:?}", outcome);
    assert_eq!(store.write_call_count(), 0, "no write on unchanged");
    assert_eq!(
        store.peek(&id).await,
        stored,
        "the older raw text must stay in the registry"
    );
}

#[tokio::test]
async fn first_sync_stores_raw_text_verbatim() {
    let fetched = "[List]\nrule1";

    let id = identifier(URL);
    let store = CountingStore::new();
    let fetcher = ScriptedFetcher::new().script(URL, [Reply::body(fetched)]);

    let outcome = engine(fetcher, store.clone()).sync(&FilterSource::new(URL)).await;

    assert!(matches!(outcome, SyncOutcome::Updated));
    assert_eq!(store.write_call_count(), 1);
    assert_eq!(store.peek(&id).await, "[List]\nrule1");
}

#[tokio::test]
async fn empty_to_empty_is_unchanged() {
    let id = identifier(URL);
    let store = CountingStore::new();
    let fetcher = ScriptedFetcher::new().script(URL, [Reply::body("")]);

    let outcome = engine(fetcher, store.clone()).sync(&FilterSource::new(URL)).await;

    assert!(outcome.is_unchanged());
    assert_eq!(store.write_call_count(), 0);
    assert!(!store.contains(&id).await, "no entry created for empty content");
}

#[tokio::test]
async fn comment_only_content_counts_as_empty() {
    let store = CountingStore::new();
    let fetcher =
        ScriptedFetcher::new().script(URL, [Reply::body("[Adblock Plus 2.0]\n! Title: nothing yet\n")]);

    let outcome = engine(fetcher, store.clone()).sync(&FilterSource::new(URL)).await;

    assert!(outcome.is_unchanged());
    assert_eq!(store.write_call_count(), 0);
}

#[tokio::test]
async fn rule_change_replaces_entry() {
    let id = identifier(URL);
    let store = CountingStore::with_entries([(id.as_str(), "! v1\nalpha")]);
    let fetcher = ScriptedFetcher::new().script(URL, [Reply::body("! v2\nalpha\nbeta")]);

    let outcome = engine(fetcher, store.clone()).sync(&FilterSource::new(URL)).await;

    assert!(outcome.is_updated());
    assert_eq!(store.peek(&id).await, "! v2\nalpha\nbeta");
}

#[tokio::test]
async fn repeated_sync_writes_once() {
    let id = identifier(URL);
    let store = CountingStore::new();
    let fetcher = ScriptedFetcher::new().script(
        URL,
        [
            Reply::body("! Last modified: Mon\nrule"),
            Reply::body("! Last modified: Tue\nrule"),
            Reply::body("! Last modified: Wed\nrule"),
        ],
    );
    let engine = engine(fetcher.clone(), store.clone());
    let source = FilterSource::new(URL);

    assert!(engine.sync(&source).await.is_updated());
    assert!(engine.sync(&source).await.is_unchanged());
    assert!(engine.sync(&source).await.is_unchanged());

    assert_eq!(fetcher.call_count(URL), 3);
    assert_eq!(store.write_call_count(), 1);
    assert_eq!(store.peek(&id).await, "! Last modified: Mon\nrule");
}

#[tokio::test]
async fn sync_all_uses_identifier_as_registry_key() {
    let store = CountingStore::new();
    let fetcher = ScriptedFetcher::new().script(URL, [Reply::body("rule")]);
    let engine = engine(fetcher, store.clone());

    let report = engine.sync_all().await;

    assert_eq!(report.updated(), 1);
    let id = identifier(URL);
    assert_eq!(report.sources[0].identifier, id);
    assert_eq!(report.sources[0].title, "List 0");
    assert_eq!(store.peek(&id).await, "rule");
}
