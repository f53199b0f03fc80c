//! Error types for filtersync
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for filtersync operations
pub type Result<T> = std::result::Result<T, Error>;

/// Failure to obtain the current content of a filter list
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterFailure {
    /// The request could not be completed (connect, DNS, timeout, body read)
    #[error("fetch transport failure: {0}")]
    Transport(String),

    /// The server answered with a non-success status
    #[error("fetch returned status {status}")]
    Status {
        /// HTTP status code
        status: u16,
    },
}

impl FilterFailure {
    /// Whether another attempt could succeed.
    ///
    /// Only transport failures are transient; a status answer is final.
    pub fn is_transient(&self) -> bool {
        matches!(self, FilterFailure::Transport(_))
    }
}

/// Core error type for filtersync
#[derive(Error, Debug)]
pub enum Error {
    /// Fetching a filter list failed
    #[error(transparent)]
    Filter(#[from] FilterFailure),

    /// Registry read/write errors
    #[error("Registry error: {0}")]
    Registry(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a transport-level fetch error
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Filter(FilterFailure::Transport(msg.into()))
    }

    /// Create a non-success status fetch error
    pub fn status(status: u16) -> Self {
        Self::Filter(FilterFailure::Status { status })
    }

    /// Create a registry error
    pub fn registry(msg: impl Into<String>) -> Self {
        Self::Registry(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// The fetch failure carried by this error, if any
    pub fn as_filter_failure(&self) -> Option<&FilterFailure> {
        match self {
            Error::Filter(failure) => Some(failure),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transport_failures_are_transient() {
        assert!(FilterFailure::Transport("timed out".into()).is_transient());
        assert!(!FilterFailure::Status { status: 503 }.is_transient());
    }

    #[test]
    fn status_error_display() {
        let err = Error::status(404);
        assert_eq!(err.to_string(), "fetch returned status 404");
        assert_eq!(
            err.as_filter_failure(),
            Some(&FilterFailure::Status { status: 404 })
        );
        assert!(Error::registry("disk full").as_filter_failure().is_none());
    }
}
