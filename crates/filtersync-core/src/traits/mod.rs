//! Core traits for filtersync
//!
//! - [`FilterFetcher`]: Retrieve the current raw text of a remote list
//! - [`RegistryStore`]: Persisted raw text keyed by source identifier

pub mod fetcher;
pub mod registry_store;

pub use fetcher::FilterFetcher;
pub use registry_store::RegistryStore;
