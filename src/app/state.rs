//! Application state: the URL-synchronized search page and the artist picker.
//!
//! [`SearchPage`] is the sync coordinator. It owns the [`FilterState`], the
//! event list's [`PaginatedFetchController`] and its [`InfiniteScrollTrigger`],
//! and keeps the URL, the filter and the page cache in step:
//!
//! - **State → URL**: after every filter edit the canonical query string is
//!   recomputed. If the query identity changed, the URL is written (replace or
//!   push per [`HistoryMode`]) and pagination restarts at page 1, once per
//!   edit no matter how many fields the edit touched.
//! - **URL → state**: an incoming URL (first load or back/forward) is decoded.
//!   If it names a different identity, the decoded filter is adopted and
//!   pagination restarts. A non-canonical URL is replaced by its canonical form.
//! - **Self-echo**: URLs this page writes are queued until the host echoes
//!   them back. A navigation report matching a queued write is ignored and
//!   retires that write along with every earlier one; anything else is a real
//!   navigation and clears the queue.
//!
//! # Example
//!
//! ```rust
//! use eventsync::app::{Action, SearchPage, HistoryMode};
//!
//! let mut page = SearchPage::new(20, HistoryMode::Replace);
//! let actions = page.load_url("?keyword=bts");
//! assert!(matches!(actions.as_slice(), [Action::Fetch(_)]));
//!
//! let actions = page.set_keyword("aespa");
//! assert_eq!(actions[0], Action::ReplaceUrl { query: "keyword=aespa".into() });
//! ```

use super::artist::ArtistSearch;
use super::modes::HistoryMode;
use super::Action;
use crate::codec::{self, QueryIdentity};
use crate::domain::{BigRegion, EventPage, EventSummary, FilterState, Sort, SubRegion, TagId};
use crate::fetch::{EventQuery, FetchRequest, FetchResponse};
use crate::paging::{ApplyOutcome, FetchPhase, InfiniteScrollTrigger, PaginatedFetchController};
use crate::ui::viewmodel::{EventCard, SearchViewModel};
use crate::ui::labels;
use crate::Config;
use chrono::NaiveDate;
use std::collections::VecDeque;

/// Writes kept while waiting for their echo; the oldest are dropped beyond this.
const MAX_PENDING_WRITES: usize = 32;

/// Central application state container.
#[derive(Debug, Clone)]
pub struct AppState {
    /// URL-bound event search page.
    pub search: SearchPage,

    /// Artist picker; keyword-bound, not reflected in the URL.
    pub artists: ArtistSearch,
}

impl AppState {
    /// Creates idle state sized by `config`. Nothing is fetched until the host
    /// delivers the initial URL.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            search: SearchPage::new(config.event_page_size, config.history_mode),
            artists: ArtistSearch::new(config.artist_page_size),
        }
    }
}

/// Event search page: filter state bound to the URL and to a paginated list.
#[derive(Debug, Clone)]
pub struct SearchPage {
    filter: FilterState,
    identity: QueryIdentity,
    /// Query strings written but not yet echoed back, oldest first.
    pending_writes: VecDeque<String>,
    history_mode: HistoryMode,
    events: PaginatedFetchController<EventSummary>,
    scroll: InfiniteScrollTrigger,
}

impl SearchPage {
    #[must_use]
    pub fn new(page_size: u32, history_mode: HistoryMode) -> Self {
        let filter = FilterState::new();
        let identity = QueryIdentity::of_filter(&filter);
        Self {
            filter,
            identity,
            pending_writes: VecDeque::new(),
            history_mode,
            events: PaginatedFetchController::new(crate::fetch::FetchTarget::Events, page_size),
            scroll: InfiniteScrollTrigger::new(),
        }
    }

    /// Handles the initial URL or a back/forward navigation.
    pub fn load_url(&mut self, raw: &str) -> Vec<Action> {
        let raw = raw.strip_prefix('?').unwrap_or(raw);
        let _span = tracing::debug_span!("load_url", query = raw).entered();

        if let Some(position) = self.pending_writes.iter().position(|query| query == raw) {
            self.pending_writes.drain(..=position);
            tracing::debug!(outstanding = self.pending_writes.len(), "ignoring self-written URL");
            return vec![];
        }
        self.pending_writes.clear();

        let decoded = codec::decode(raw);
        let canonical = codec::encode(&decoded);
        let identity = QueryIdentity::of_filter(&decoded);
        let mut actions = vec![];

        if canonical != raw {
            tracing::debug!(canonical = %canonical, "replacing non-canonical URL");
            self.remember_write(canonical.clone());
            actions.push(Action::ReplaceUrl { query: canonical });
        }

        if identity != self.identity || self.events.phase() == FetchPhase::Idle {
            tracing::debug!(from = %self.identity, to = %identity, "adopting filter from URL");
            self.filter = decoded;
            self.identity = identity;
            actions.push(self.restart());
        } else if decoded != self.filter.normalized() {
            tracing::debug!("adopting tag order from URL, result set unchanged");
            self.filter = decoded;
        }

        actions
    }

    fn remember_write(&mut self, query: String) {
        if self.pending_writes.len() == MAX_PENDING_WRITES {
            self.pending_writes.pop_front();
        }
        self.pending_writes.push_back(query);
    }

    pub fn set_keyword(&mut self, keyword: &str) -> Vec<Action> {
        self.edit(|filter| filter.set_keyword(keyword))
    }

    pub fn set_sort(&mut self, sort: Sort) -> Vec<Action> {
        self.edit(|filter| filter.set_sort(sort))
    }

    pub fn set_big_region(&mut self, big: Option<BigRegion>) -> Vec<Action> {
        self.edit(|filter| filter.set_big_region(big))
    }

    pub fn set_small_region(&mut self, small: SubRegion) -> Vec<Action> {
        self.edit(|filter| filter.set_small_region(small))
    }

    pub fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Vec<Action> {
        self.edit(|filter| filter.set_date_range(start, end))
    }

    pub fn set_start_date(&mut self, start: Option<NaiveDate>) -> Vec<Action> {
        self.edit(|filter| filter.set_start_date(start))
    }

    pub fn set_end_date(&mut self, end: Option<NaiveDate>) -> Vec<Action> {
        self.edit(|filter| filter.set_end_date(end))
    }

    pub fn toggle_tag(&mut self, tag: TagId) -> Vec<Action> {
        self.edit(|filter| filter.toggle_tag(tag))
    }

    /// Resets every input in one transition: at most one URL write and one restart.
    pub fn reset(&mut self) -> Vec<Action> {
        self.edit(FilterState::reset)
    }

    /// Records a sentinel visibility report, requesting the next page if due.
    pub fn observe_sentinel(&mut self, visible: bool) -> Vec<Action> {
        if self.scroll.observe(visible, self.events.phase()) {
            self.fetch_next()
        } else {
            vec![]
        }
    }

    /// Explicitly requests the page after the last loaded one.
    pub fn fetch_next(&mut self) -> Vec<Action> {
        self.events
            .fetch_next()
            .map(|ticket| {
                let query = EventQuery::from_filter(&self.filter, ticket.page, self.events.page_size());
                Action::Fetch(FetchRequest::events(ticket, query))
            })
            .into_iter()
            .collect()
    }

    /// Feeds a fetch completion into the event list.
    ///
    /// Returns whether visible state changed, plus follow-up actions.
    pub fn apply_response(&mut self, response: FetchResponse) -> (bool, Vec<Action>) {
        let outcome = match response {
            FetchResponse::EventsLoaded { ticket, page } => self.events.apply(ticket, Ok(page)),
            FetchResponse::Failed { ticket, error } => {
                self.events.apply::<EventPage>(ticket, Err(error))
            }
            FetchResponse::ArtistsLoaded { ticket, .. } => {
                tracing::warn!(ticket = ?ticket, "artist page routed to the event list");
                return (false, vec![]);
            }
        };

        match outcome {
            ApplyOutcome::Appended { .. } => {
                let actions = if self.scroll.on_items_appended(self.events.phase()) {
                    self.fetch_next()
                } else {
                    vec![]
                };
                (true, actions)
            }
            ApplyOutcome::Failed(error) => {
                self.scroll.on_fetch_failed();
                (
                    true,
                    vec![Action::FetchFailed {
                        target: crate::fetch::FetchTarget::Events,
                        error,
                    }],
                )
            }
            ApplyOutcome::Stale => (false, vec![]),
        }
    }

    fn edit(&mut self, mutate: impl FnOnce(&mut FilterState)) -> Vec<Action> {
        mutate(&mut self.filter);

        let identity = QueryIdentity::of_filter(&self.filter);
        if identity == self.identity {
            tracing::trace!("edit left query identity unchanged");
            return vec![];
        }

        tracing::debug!(from = %self.identity, to = %identity, mode = ?self.history_mode, "query identity changed");
        let query = codec::encode(&self.filter);
        self.identity = identity;
        self.remember_write(query.clone());

        let url = match self.history_mode {
            HistoryMode::Replace => Action::ReplaceUrl { query },
            HistoryMode::Push => Action::PushUrl { query },
        };
        vec![url, self.restart()]
    }

    fn restart(&mut self) -> Action {
        let ticket = self.events.start(self.identity.clone());
        self.scroll.reset();
        let query = EventQuery::from_filter(&self.filter, ticket.page, self.events.page_size());
        Action::Fetch(FetchRequest::events(ticket, query))
    }

    #[must_use]
    pub const fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Identity of the result set currently being paginated.
    #[must_use]
    pub const fn identity(&self) -> &QueryIdentity {
        &self.identity
    }

    #[must_use]
    pub const fn events(&self) -> &PaginatedFetchController<EventSummary> {
        &self.events
    }

    #[must_use]
    pub const fn scroll(&self) -> &InfiniteScrollTrigger {
        &self.scroll
    }

    #[must_use]
    pub const fn history_mode(&self) -> HistoryMode {
        self.history_mode
    }

    /// Derives everything the search page renders.
    #[must_use]
    pub fn compute_viewmodel(&self) -> SearchViewModel {
        let filter = &self.filter;
        let region = filter.region();
        let dates = filter.date_range();

        SearchViewModel {
            keyword: filter.keyword().to_string(),
            sort: filter.sort(),
            region_label: labels::region_label(region),
            region_selected: region.big().is_some(),
            sub_region_label: labels::sub_region_label(region),
            date_label: labels::date_label(dates),
            date_selected: dates.start.is_some(),
            gift_label: labels::gift_label(filter.tags()),
            gift_selected: !filter.tags().is_empty(),
            cards: self.events.items().iter().map(EventCard::from_summary).collect(),
            total_count: self.events.pages().total_count(),
            has_more: self.events.has_next_page(),
            is_loading: self.events.is_loading(),
            error: self.events.last_error().map(ToString::to_string),
        }
    }
}
