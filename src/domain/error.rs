//! Error types for the search synchronization engine.
//!
//! [`EventSyncError`] is the crate-wide error and [`Result`] its alias. Failures
//! reported by the external result-fetch boundary are modelled separately as
//! [`FetchError`] because they travel inside fetch responses and are surfaced to
//! the page rather than aborting event handling.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The main error type for eventsync operations.
///
/// Query-string decoding never produces an error; malformed URL input is always
/// resolved to defaults. The variants here cover configuration, I/O, the host
/// bridge protocol and fetch failures that a caller chose to propagate.
///
/// # Examples
///
/// ```
/// use eventsync::EventSyncError;
///
/// fn validate_page_size(size: u32) -> Result<u32, EventSyncError> {
///     if size == 0 {
///         return Err(EventSyncError::Config("page size must be positive".to_string()));
///     }
///     Ok(size)
/// }
/// assert!(validate_page_size(0).is_err());
/// ```
#[derive(Debug, Error)]
pub enum EventSyncError {
    /// A fetch against the result boundary failed.
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The host sent something the bridge protocol cannot accept.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure returned by the result-fetch boundary (network, server, timeout).
///
/// A `FetchError` never clears already-loaded items and never advances the page
/// cursor; the controller reports it and waits for an explicit retry.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FetchError {
    /// The request never reached the server or the connection dropped.
    #[error("network failure: {message}")]
    Network {
        /// Transport-level description.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("server responded {status}: {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Body or reason phrase.
        message: String,
    },

    /// The request did not complete in time.
    #[error("request timed out")]
    Timeout,

    /// The response body could not be interpreted.
    #[error("malformed response: {message}")]
    Decode {
        /// Parser diagnostic.
        message: String,
    },
}

/// A specialized `Result` type for eventsync operations.
pub type Result<T> = std::result::Result<T, EventSyncError>;
