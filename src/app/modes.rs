//! Browser-history write mode for filter edits.
//!
//! Every filter edit that changes the query identity rewrites the URL. The
//! history mode decides whether that write stacks a new history entry or
//! replaces the current one:
//!
//! - **Replace** (default): back-navigation skips over intermediate filter
//!   states, so typing a keyword does not leave one entry per keystroke
//! - **Push**: every identity change becomes its own history entry
//!
//! Canonicalizing an incoming URL always replaces, regardless of mode.
//!
//! # Example
//!
//! ```rust
//! use eventsync::app::HistoryMode;
//!
//! assert_eq!(HistoryMode::parse("push"), Some(HistoryMode::Push));
//! assert_eq!(HistoryMode::default(), HistoryMode::Replace);
//! ```

use serde::{Deserialize, Serialize};

/// How filter-driven URL writes interact with browser history.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryMode {
    /// Replace the current history entry.
    #[default]
    Replace,

    /// Push a new history entry.
    Push,
}

impl HistoryMode {
    /// Parses `replace` or `push`, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "replace" => Some(Self::Replace),
            "push" => Some(Self::Push),
            _ => None,
        }
    }
}
