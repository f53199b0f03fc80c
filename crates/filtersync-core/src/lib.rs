// # filtersync-core
//
// Core library for mirroring remote filter lists into a content-addressed
// local registry.
//
// ## Architecture Overview
//
// - **FilterSource**: a remote list URL plus its stable SHA-256 identifier
// - **canonicalize**: comparison form of a list (no header, comments or blanks; sorted)
// - **FilterFetcher**: trait for retrieving the current raw text of a list
// - **RegistryStore**: trait for the persisted raw text, keyed by identifier
// - **SyncEngine**: fetch -> compare canonical forms -> write only on change
// - **Catalog**: the configured set of sources and its JSON export
//
// ## Design Principles
//
// 1. **Idempotency**: a list is rewritten only when its canonical form changes
// 2. **Isolation**: one source failing never affects another
// 3. **Explicit configuration**: the catalog is a value passed in, never global state
// 4. **Library-First**: the daemon is a thin wrapper over this crate

pub mod canonical;
pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod source;
pub mod store;
pub mod traits;

// Re-export core types for convenience
pub use canonical::canonicalize;
pub use catalog::{Catalog, FilterDescriptor, FilterEntry, FilterGroup};
pub use config::{FetchConfig, SyncConfig};
pub use engine::{SourceReport, SyncEngine, SyncOutcome, SyncReport, SyncSettings};
pub use error::{Error, FilterFailure, Result};
pub use source::{FilterSource, identifier};
pub use store::{FileRegistryStore, MemoryRegistryStore};
pub use traits::{FilterFetcher, RegistryStore};
