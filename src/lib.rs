//! eventsync: URL-synchronized, page-at-a-time search state for an event
//! discovery front-end.
//!
//! The crate keeps three things in step for a search page:
//! - the filter inputs (keyword, sort, region, date range, gift tags)
//! - the page URL's query string, written canonically on every edit and read
//!   back on navigation
//! - an infinitely scrolling result list, paginated per query identity and
//!   restarted whenever that identity changes
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Host bridge (main.rs)                              │  ← JSON lines in/out
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Sync coordinator
//! │  - Event handling                                   │
//! │  - URL/state/fetch synchronization                  │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ Codec         │   │ Paging        │   │ Fetch         │
//! │ (codec/)      │   │ (paging/)     │   │ (fetch/)      │
//! │ - Query string│   │ - Controller  │   │ - Messages    │
//! │ - Identity    │   │ - Scroll      │   │ - Sources     │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Domain Layer (domain/)                             │
//! │  - Filter state, regions, tags, result items        │
//! │  - Error types                                      │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry tracing, OTLP-JSON file export     │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Event/action state machine binding filter, URL and list
//! - [`codec`]: Query-string decode/encode and query identity
//! - [`domain`]: Filter state, lookup tables, result items, errors
//! - [`fetch`]: Fetch request/response protocol and result sources
//! - [`paging`]: Paginated fetch controller and infinite-scroll trigger
//! - [`ui`]: View models and display labels
//! - [`infrastructure`]: Filesystem locations
//! - [`observability`]: Tracing initialization and file export
//!
//! # Example
//!
//! ```rust
//! use eventsync::{handle_event, initialize, Action, Config, Event};
//! use eventsync::fetch::{execute, FixtureSource};
//!
//! let mut state = initialize(&Config::default());
//! let mut source = FixtureSource::default();
//!
//! let mut pending = vec![Event::PageLoaded { query: "?keyword=bts".into() }];
//! while let Some(event) = pending.pop() {
//!     let (_render, actions) = handle_event(&mut state, &event)?;
//!     for action in actions {
//!         if let Action::Fetch(request) = action {
//!             pending.push(Event::FetchCompleted(execute(&mut source, &request)));
//!         }
//!     }
//! }
//! assert_eq!(state.search.filter().keyword(), "bts");
//! # Ok::<(), eventsync::EventSyncError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod codec;
pub mod domain;
pub mod fetch;
pub mod infrastructure;
pub mod observability;
pub mod paging;
pub mod ui;

pub use app::{handle_event, Action, AppState, Event, HistoryMode};
pub use domain::{EventSyncError, FetchError, FilterState, Result};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Page size of the event search list.
pub const DEFAULT_EVENT_PAGE_SIZE: u32 = 20;

/// Page size of the artist picker.
pub const DEFAULT_ARTIST_PAGE_SIZE: u32 = 12;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Items per event search page. Default: 20
    pub event_page_size: u32,

    /// Items per artist picker page. Default: 12
    pub artist_page_size: u32,

    /// History behavior of filter-driven URL writes. Default: replace
    pub history_mode: HistoryMode,

    /// Tracing filter directive, e.g. `debug` or `eventsync=trace`.
    pub trace_level: Option<String>,

    /// Trace output file; defaults to `eventsync-otlp.json` in the data directory.
    pub trace_file: Option<PathBuf>,

    /// JSON result fixture the bundled binary answers fetches from.
    pub fixture: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            event_page_size: DEFAULT_EVENT_PAGE_SIZE,
            artist_page_size: DEFAULT_ARTIST_PAGE_SIZE,
            history_mode: HistoryMode::Replace,
            trace_level: None,
            trace_file: None,
            fixture: None,
        }
    }
}

/// TOML configuration file. Every key is optional; unknown keys are rejected.
///
/// ```toml
/// event_page_size = 20
/// artist_page_size = 12
/// history_mode = "push"
/// trace_level = "debug"
/// trace_file = "/tmp/eventsync-otlp.json"
/// fixture = "results.json"
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub event_page_size: Option<u32>,
    #[serde(default)]
    pub artist_page_size: Option<u32>,
    #[serde(default)]
    pub history_mode: Option<HistoryMode>,
    #[serde(default)]
    pub trace_level: Option<String>,
    #[serde(default)]
    pub trace_file: Option<PathBuf>,
    #[serde(default)]
    pub fixture: Option<PathBuf>,
}

impl Config {
    /// Parses configuration from a string map (host options or `key=value`
    /// arguments), falling back to defaults for missing or unparsable values.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use eventsync::{Config, HistoryMode};
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("event_page_size".to_string(), "30".to_string());
    /// map.insert("history_mode".to_string(), "push".to_string());
    /// map.insert("artist_page_size".to_string(), "zero".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.event_page_size, 30);
    /// assert_eq!(config.artist_page_size, 12);
    /// assert_eq!(config.history_mode, HistoryMode::Push);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        Self::default().with_overrides(map)
    }

    /// Applies string-map overrides on top of `self`, ignoring unparsable values.
    #[must_use]
    pub fn with_overrides(mut self, map: &BTreeMap<String, String>) -> Self {
        let page_size = |key: &str| {
            map.get(key)
                .and_then(|s| s.trim().parse::<u32>().ok())
                .filter(|size| *size > 0)
        };

        if let Some(size) = page_size("event_page_size") {
            self.event_page_size = size;
        }
        if let Some(size) = page_size("artist_page_size") {
            self.artist_page_size = size;
        }
        if let Some(mode) = map.get("history_mode").and_then(|s| HistoryMode::parse(s)) {
            self.history_mode = mode;
        }
        if let Some(level) = map.get("trace_level") {
            self.trace_level = Some(level.clone());
        }
        if let Some(path) = map.get("trace_file") {
            self.trace_file = Some(PathBuf::from(path));
        }
        if let Some(path) = map.get("fixture") {
            self.fixture = Some(PathBuf::from(path));
        }
        self
    }

    /// Loads a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`EventSyncError::Io`] if the file cannot be read, and
    /// [`EventSyncError::Config`] for invalid TOML, unknown keys or a page
    /// size of zero.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let file: ConfigFile = toml::from_str(&content)
            .map_err(|e| EventSyncError::Config(format!("{}: {e}", path.display())))?;
        Self::from_config_file(file)
    }

    /// Resolves a parsed [`ConfigFile`] against the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`EventSyncError::Config`] if a page size is zero.
    pub fn from_config_file(file: ConfigFile) -> Result<Self> {
        for (key, value) in [
            ("event_page_size", file.event_page_size),
            ("artist_page_size", file.artist_page_size),
        ] {
            if value == Some(0) {
                return Err(EventSyncError::Config(format!("{key} must be at least 1")));
            }
        }

        let defaults = Self::default();
        Ok(Self {
            event_page_size: file.event_page_size.unwrap_or(defaults.event_page_size),
            artist_page_size: file.artist_page_size.unwrap_or(defaults.artist_page_size),
            history_mode: file.history_mode.unwrap_or(defaults.history_mode),
            trace_level: file.trace_level,
            trace_file: file.trace_file,
            fixture: file.fixture,
        })
    }
}

/// Creates application state for `config`.
///
/// Tracing is not initialized here; hosts that want trace output call
/// [`observability::init_tracing`] first.
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(
        event_page_size = config.event_page_size,
        artist_page_size = config.artist_page_size,
        history_mode = ?config.history_mode,
        "initializing search state"
    );
    AppState::new(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn file_values_override_defaults() {
        let file = write_config("history_mode = \"push\"\nartist_page_size = 24\n");
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.history_mode, HistoryMode::Push);
        assert_eq!(config.artist_page_size, 24);
        assert_eq!(config.event_page_size, 20);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let file = write_config("page_size = 10\n");
        assert!(matches!(
            Config::from_file(file.path()),
            Err(EventSyncError::Config(_))
        ));
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let file = write_config("event_page_size = 0\n");
        assert!(matches!(
            Config::from_file(file.path()),
            Err(EventSyncError::Config(message)) if message.contains("event_page_size")
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::from_file(dir.path().join("absent.toml")),
            Err(EventSyncError::Io(_))
        ));
    }

    #[test]
    fn map_overrides_apply_over_file_values() {
        let file = write_config("history_mode = \"push\"\n");
        let mut map = BTreeMap::new();
        map.insert("history_mode".to_string(), "replace".to_string());
        map.insert("event_page_size".to_string(), "0".to_string());
        let config = Config::from_file(file.path()).unwrap().with_overrides(&map);
        assert_eq!(config.history_mode, HistoryMode::Replace);
        assert_eq!(config.event_page_size, 20);
    }
}
