//! Actions representing side effects for the host to execute.
//!
//! The event handler never touches the browser or the network. It returns a
//! `Vec<Action>` per event and the host performs them in order: URL writes go to
//! the history API, fetches go to the result client, and each fetch's outcome
//! comes back later as `Event::FetchCompleted`.
//!
//! # Example
//!
//! ```rust
//! use eventsync::app::Action;
//!
//! let action = Action::ReplaceUrl { query: "keyword=bts".into() };
//! assert_eq!(action.url_query(), Some("keyword=bts"));
//! ```

use crate::domain::FetchError;
use crate::fetch::{FetchRequest, FetchTarget};
use serde::{Deserialize, Serialize};

/// Commands produced by the event handler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Rewrites the query string in place (no new history entry).
    ///
    /// The host must not report this write back as a navigation; if it does,
    /// the coordinator recognizes its own write and ignores it.
    ReplaceUrl {
        /// Canonical query string without the leading `?`.
        query: String,
    },

    /// Writes the query string as a new history entry.
    PushUrl {
        /// Canonical query string without the leading `?`.
        query: String,
    },

    /// Issues a page request. The response must be delivered back as
    /// `Event::FetchCompleted`, echoing the request's ticket.
    Fetch(FetchRequest),

    /// Reports a failed page fetch for display. Loaded items stay in place;
    /// nothing is retried until the sentinel or the user asks again.
    FetchFailed {
        /// List the failed fetch belonged to.
        target: FetchTarget,
        /// Failure as reported by the result source.
        error: FetchError,
    },
}

impl Action {
    /// Query string written by a URL action.
    #[must_use]
    pub fn url_query(&self) -> Option<&str> {
        match self {
            Self::ReplaceUrl { query } | Self::PushUrl { query } => Some(query),
            Self::Fetch(_) | Self::FetchFailed { .. } => None,
        }
    }
}
