//! Event handling and state transition logic.
//!
//! This module implements the single entry point through which the host drives
//! the search page. Every input (URL navigation, filter control, sentinel
//! visibility report, fetch completion) arrives as an [`Event`];
//! [`handle_event`] mutates [`AppState`] and returns the side effects to run.
//!
//! # Architecture
//!
//! ```text
//! host ──Event──▶ handle_event ──▶ AppState mutation ──▶ Vec<Action> ──▶ host
//!   ▲                                                                    │
//!   └──────────────── Event::FetchCompleted(FetchResponse) ◀─────────────┘
//! ```
//!
//! Events are processed one at a time on a single thread. Fetches are never
//! awaited: a request leaves as `Action::Fetch` and its completion comes back
//! as a later event, tagged with the ticket it was issued under.
//!
//! # Event Types
//!
//! - **Navigation**: `PageLoaded`, `UrlChanged`
//! - **Filter edits**: `KeywordChanged`, `SortSelected`, `BigRegionSelected`,
//!   `SmallRegionSelected`, `DateRangePicked`, `StartDatePicked`,
//!   `EndDatePicked`, `TagToggled`, `FiltersReset`
//! - **Pagination**: `SentinelVisibility`, `RetryRequested`, `FetchCompleted`
//! - **Artist picker**: `ArtistSearchOpened`, `ArtistKeywordChanged`,
//!   `ArtistSentinelVisibility`, `ArtistToggled`, `ArtistRetryRequested`
//!
//! # Example
//!
//! ```rust
//! use eventsync::app::{handle_event, Action, AppState, Event};
//! use eventsync::Config;
//!
//! let mut state = AppState::new(&Config::default());
//! let (render, actions) = handle_event(
//!     &mut state,
//!     &Event::PageLoaded { query: "keyword=bts".into() },
//! )?;
//! assert!(render);
//! assert!(matches!(actions.as_slice(), [Action::Fetch(_)]));
//! # Ok::<(), eventsync::EventSyncError>(())
//! ```

use super::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::{BigRegion, Sort, SubRegion, TagId};
use crate::fetch::{FetchResponse, FetchTarget};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inputs delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Event {
    /// The page was opened with this query string.
    PageLoaded {
        /// Raw query string, with or without the leading `?`.
        query: String,
    },

    /// The URL changed outside this page's control (back/forward navigation),
    /// or the host echoed one of this page's own writes.
    UrlChanged {
        /// Raw query string, with or without the leading `?`.
        query: String,
    },

    /// The search input changed.
    KeywordChanged { keyword: String },

    /// A sort button was pressed.
    SortSelected { sort: Sort },

    /// A big region was chosen; `None` clears the region filter.
    BigRegionSelected { region: Option<BigRegion> },

    /// A sub-region was chosen.
    SmallRegionSelected { region: SubRegion },

    /// The calendar sheet reported both bounds at once.
    DateRangePicked {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },

    /// The calendar sheet reported the first bound.
    StartDatePicked { date: Option<NaiveDate> },

    /// The calendar sheet reported the last bound.
    EndDatePicked { date: Option<NaiveDate> },

    /// A gift tag chip was pressed.
    TagToggled { tag: TagId },

    /// The reset button was pressed.
    FiltersReset,

    /// The event list's sentinel entered or left the viewport.
    SentinelVisibility { visible: bool },

    /// The user asked to retry after a failed event fetch.
    RetryRequested,

    /// A fetch issued through `Action::Fetch` finished.
    ///
    /// Routed to the event list or the artist picker by the ticket's target.
    FetchCompleted(FetchResponse),

    /// The artist picker was opened.
    ArtistSearchOpened,

    /// The artist picker's search input changed.
    ArtistKeywordChanged { keyword: String },

    /// The artist list's sentinel entered or left the viewport.
    ArtistSentinelVisibility { visible: bool },

    /// An artist chip was pressed.
    ArtistToggled { id: String, name: String },

    /// The user asked to retry after a failed artist fetch.
    ArtistRetryRequested,
}

/// Processes an event, mutates application state, and returns actions to execute.
///
/// Returns whether the view should be re-rendered, along with the actions in
/// the order the host must perform them.
///
/// # Errors
///
/// Currently infallible for every event; the `Result` lets hosts treat the
/// handler uniformly with other fallible steps of their loop.
///
/// # Tracing
///
/// Each call runs inside a debug-level `handle_event` span carrying the event.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::PageLoaded { query } | Event::UrlChanged { query } => {
            let before = state.search.filter().clone();
            let actions = state.search.load_url(query);
            let render = !actions.is_empty() || state.search.filter() != &before;
            Ok((render, actions))
        }
        Event::KeywordChanged { keyword } => Ok((true, state.search.set_keyword(keyword))),
        Event::SortSelected { sort } => Ok((true, state.search.set_sort(*sort))),
        Event::BigRegionSelected { region } => Ok((true, state.search.set_big_region(*region))),
        Event::SmallRegionSelected { region } => {
            Ok((true, state.search.set_small_region(region.clone())))
        }
        Event::DateRangePicked { start, end } => {
            Ok((true, state.search.set_date_range(*start, *end)))
        }
        Event::StartDatePicked { date } => Ok((true, state.search.set_start_date(*date))),
        Event::EndDatePicked { date } => Ok((true, state.search.set_end_date(*date))),
        Event::TagToggled { tag } => Ok((true, state.search.toggle_tag(*tag))),
        Event::FiltersReset => Ok((true, state.search.reset())),
        Event::SentinelVisibility { visible } => {
            let actions = state.search.observe_sentinel(*visible);
            Ok((!actions.is_empty(), actions))
        }
        Event::RetryRequested => {
            let actions = state.search.fetch_next();
            if actions.is_empty() {
                tracing::debug!(phase = ?state.search.events().phase(), "retry ignored");
            }
            Ok((!actions.is_empty(), actions))
        }
        Event::FetchCompleted(response) => match response.ticket().target {
            FetchTarget::Events => Ok(state.search.apply_response(response.clone())),
            FetchTarget::Artists => Ok(state.artists.apply_response(response.clone())),
        },
        Event::ArtistSearchOpened => Ok((true, state.artists.open())),
        Event::ArtistKeywordChanged { keyword } => Ok((true, state.artists.set_keyword(keyword))),
        Event::ArtistSentinelVisibility { visible } => {
            let actions = state.artists.observe_sentinel(*visible);
            Ok((!actions.is_empty(), actions))
        }
        Event::ArtistToggled { id, name } => {
            let selected = state.artists.toggle(id, name);
            tracing::debug!(artist_id = %id, selected, "artist toggled");
            Ok((true, vec![]))
        }
        Event::ArtistRetryRequested => {
            let actions = state.artists.fetch_next();
            Ok((!actions.is_empty(), actions))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;

    #[test]
    fn events_parse_from_host_json() {
        let event: Event =
            serde_json::from_str(r#"{"big_region_selected": {"region": "서울"}}"#).unwrap();
        assert_eq!(
            event,
            Event::BigRegionSelected {
                region: Some(BigRegion::Seoul)
            }
        );

        let event: Event = serde_json::from_str(r#""filters_reset""#).unwrap();
        assert_eq!(event, Event::FiltersReset);

        let event: Event =
            serde_json::from_str(r#"{"start_date_picked": {"date": "2024-06-01"}}"#).unwrap();
        assert_eq!(
            event,
            Event::StartDatePicked {
                date: NaiveDate::from_ymd_opt(2024, 6, 1)
            }
        );
    }

    #[test]
    fn clearing_big_region_clears_sub_region() {
        let mut state = AppState::new(&Config::default());
        handle_event(&mut state, &Event::PageLoaded { query: String::new() }).unwrap();
        handle_event(
            &mut state,
            &Event::BigRegionSelected {
                region: Some(BigRegion::Seoul),
            },
        )
        .unwrap();
        handle_event(
            &mut state,
            &Event::SmallRegionSelected {
                region: SubRegion::from("강남구"),
            },
        )
        .unwrap();

        let (_, actions) =
            handle_event(&mut state, &Event::BigRegionSelected { region: None }).unwrap();
        assert_eq!(actions[0].url_query(), Some(""));
        assert_eq!(state.search.filter().region().big(), None);
        assert_eq!(state.search.filter().region().small(), None);
    }

    #[test]
    fn reordered_tags_render_without_refetch() {
        let canonical = |raw: &str| crate::codec::encode(&crate::codec::decode(raw));
        let mut state = AppState::new(&Config::default());
        handle_event(
            &mut state,
            &Event::PageLoaded {
                query: canonical("gifts=포스터|컵홀더"),
            },
        )
        .unwrap();

        let (render, actions) = handle_event(
            &mut state,
            &Event::UrlChanged {
                query: canonical("gifts=컵홀더|포스터"),
            },
        )
        .unwrap();
        assert!(render);
        assert!(actions.is_empty());
        assert_eq!(state.search.compute_viewmodel().gift_label, "컵홀더...");
    }

    #[test]
    fn fetch_completions_are_routed_by_target() {
        let mut state = AppState::new(&Config::default());
        let (_, actions) = handle_event(&mut state, &Event::ArtistSearchOpened).unwrap();
        let Action::Fetch(request) = &actions[0] else {
            panic!("expected fetch");
        };

        let response = FetchResponse::ArtistsLoaded {
            ticket: request.ticket(),
            page: crate::domain::ArtistPage {
                page: 1,
                total_count: 1,
                artist_and_group_list: vec![crate::domain::ArtistSummary {
                    id: "a1".into(),
                    name: "IVE".into(),
                    image: None,
                }],
            },
        };
        let (render, _) = handle_event(&mut state, &Event::FetchCompleted(response)).unwrap();
        assert!(render);
        assert_eq!(state.artists.results().items().len(), 1);
        assert!(state.search.events().items().is_empty());
    }
}
