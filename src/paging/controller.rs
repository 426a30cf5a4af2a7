//! Per-identity paginated fetch state machine.
//!
//! [`PaginatedFetchController`] owns the page cache of one query identity and
//! decides which page to request next. It performs no I/O: [`start`] and
//! [`fetch_next`] hand back a [`FetchTicket`] describing the request to issue,
//! and the caller later feeds the tagged outcome into [`apply`].
//!
//! ```text
//! Idle ──start──▶ Fetching(1) ──ok──▶ Ready ──fetch_next──▶ Fetching(k) ──ok──▶ Ready | Exhausted
//!                     │                 ▲                        │
//!                     └──────err────────┴──────────err───────────┘
//! ```
//!
//! A response is applied only if its ticket matches the pending fetch exactly
//! (same target, same generation, same page). Anything else is stale and is
//! dropped on arrival; restarting never waits for or aborts the old request.
//!
//! [`start`]: PaginatedFetchController::start
//! [`fetch_next`]: PaginatedFetchController::fetch_next
//! [`apply`]: PaginatedFetchController::apply

use crate::codec::QueryIdentity;
use crate::domain::{ArtistPage, ArtistSummary, EventPage, EventSummary, FetchError};
use crate::fetch::{FetchTarget, FetchTicket};

/// A page payload as returned by a list endpoint.
pub trait Paged {
    /// Item type of the list.
    type Item;

    /// Page number reported by the server.
    fn page_number(&self) -> u32;

    /// Total number of items across all pages.
    fn total_count(&self) -> u64;

    /// Consumes the payload, yielding its items in server order.
    fn into_items(self) -> Vec<Self::Item>;
}

impl Paged for EventPage {
    type Item = EventSummary;

    fn page_number(&self) -> u32 {
        self.page
    }

    fn total_count(&self) -> u64 {
        self.total_count
    }

    fn into_items(self) -> Vec<EventSummary> {
        self.event_list
    }
}

impl Paged for ArtistPage {
    type Item = ArtistSummary;

    fn page_number(&self) -> u32 {
        self.page
    }

    fn total_count(&self) -> u64 {
        self.total_count
    }

    fn into_items(self) -> Vec<ArtistSummary> {
        self.artist_and_group_list
    }
}

/// Lifecycle phase of the current identity's fetch pipeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchPhase {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Waiting for `page`.
    Fetching { page: u32 },
    /// Loaded pages are on hand and more may follow.
    Ready,
    /// Every page has been loaded.
    Exhausted,
}

/// Page cursor and accumulated items of one query identity.
///
/// Created fresh on every restart and never carried across identities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState<T> {
    current_page: u32,
    page_size: u32,
    total_count: u64,
    items: Vec<T>,
}

impl<T> PageState<T> {
    /// Empty state; no page loaded yet.
    #[must_use]
    pub const fn new(page_size: u32) -> Self {
        Self {
            current_page: 0,
            page_size,
            total_count: 0,
            items: Vec::new(),
        }
    }

    /// Number of pages loaded so far; 0 before the first page lands.
    #[must_use]
    pub const fn current_page(&self) -> u32 {
        self.current_page
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Total reported by the last successful fetch.
    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.total_count
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// `current_page * page_size < total_count`.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        (self.current_page as u64) * (self.page_size as u64) < self.total_count
    }
}

/// Result of feeding a response into the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The page was appended.
    Appended {
        /// Number of items the page contributed.
        added: usize,
    },
    /// The pending fetch failed; loaded items are untouched.
    Failed(FetchError),
    /// The response did not belong to the pending fetch and was dropped.
    Stale,
}

/// Fetch pipeline for one paginated list.
#[derive(Debug, Clone)]
pub struct PaginatedFetchController<T> {
    target: FetchTarget,
    page_size: u32,
    generation: u64,
    identity: Option<QueryIdentity>,
    phase: FetchPhase,
    pages: PageState<T>,
    last_error: Option<FetchError>,
}

impl<T> PaginatedFetchController<T> {
    /// Creates an idle controller for `target` with a fixed page size.
    #[must_use]
    pub const fn new(target: FetchTarget, page_size: u32) -> Self {
        Self {
            target,
            page_size,
            generation: 0,
            identity: None,
            phase: FetchPhase::Idle,
            pages: PageState::new(page_size),
            last_error: None,
        }
    }

    /// Discards all page state and begins fetching page 1 of `identity`.
    ///
    /// Any fetch still in flight for the previous identity becomes stale: its
    /// response no longer matches the bumped generation and will be dropped.
    pub fn start(&mut self, identity: QueryIdentity) -> FetchTicket {
        self.generation += 1;
        tracing::debug!(
            target_list = ?self.target,
            generation = self.generation,
            identity = %identity,
            previous_phase = ?self.phase,
            "starting pagination"
        );
        self.identity = Some(identity);
        self.pages = PageState::new(self.page_size);
        self.last_error = None;
        self.phase = FetchPhase::Fetching { page: 1 };
        self.ticket(1)
    }

    /// Requests the page after the last loaded one.
    ///
    /// Returns `None` (and does nothing) unless the controller is
    /// [`FetchPhase::Ready`]; in particular a second call while a fetch is
    /// pending is dropped rather than queued.
    pub fn fetch_next(&mut self) -> Option<FetchTicket> {
        if self.phase != FetchPhase::Ready {
            tracing::trace!(phase = ?self.phase, "fetch_next ignored");
            return None;
        }
        let page = self.pages.current_page + 1;
        tracing::debug!(target_list = ?self.target, generation = self.generation, page, "fetching next page");
        self.phase = FetchPhase::Fetching { page };
        Some(self.ticket(page))
    }

    /// Applies the outcome of the fetch identified by `ticket`.
    pub fn apply<P>(&mut self, ticket: FetchTicket, result: Result<P, FetchError>) -> ApplyOutcome
    where
        P: Paged<Item = T>,
    {
        if !self.is_pending(ticket) {
            tracing::debug!(
                ticket = ?ticket,
                generation = self.generation,
                phase = ?self.phase,
                "dropping stale response"
            );
            return ApplyOutcome::Stale;
        }

        match result {
            Err(error) => {
                tracing::warn!(page = ticket.page, error = %error, "page fetch failed");
                self.phase = FetchPhase::Ready;
                self.last_error = Some(error.clone());
                ApplyOutcome::Failed(error)
            }
            Ok(payload) => {
                if payload.page_number() != ticket.page {
                    tracing::warn!(
                        requested = ticket.page,
                        reported = payload.page_number(),
                        "server reported a different page number"
                    );
                }
                self.pages.total_count = payload.total_count();
                let items = payload.into_items();
                let added = items.len();
                self.pages.items.extend(items);
                self.pages.current_page = ticket.page;
                self.last_error = None;

                // An empty page cannot advance the cursor; stop instead of looping.
                self.phase = if self.pages.has_next_page() && added > 0 {
                    FetchPhase::Ready
                } else {
                    FetchPhase::Exhausted
                };
                tracing::debug!(
                    page = ticket.page,
                    added,
                    total_count = self.pages.total_count,
                    loaded = self.pages.items.len(),
                    phase = ?self.phase,
                    "page applied"
                );
                ApplyOutcome::Appended { added }
            }
        }
    }

    fn is_pending(&self, ticket: FetchTicket) -> bool {
        ticket.target == self.target
            && ticket.generation == self.generation
            && self.phase == FetchPhase::Fetching { page: ticket.page }
    }

    const fn ticket(&self, page: u32) -> FetchTicket {
        FetchTicket {
            target: self.target,
            generation: self.generation,
            page,
        }
    }

    #[must_use]
    pub const fn phase(&self) -> FetchPhase {
        self.phase
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, FetchPhase::Fetching { .. })
    }

    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.pages.has_next_page()
    }

    #[must_use]
    pub const fn pages(&self) -> &PageState<T> {
        &self.pages
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        self.pages.items()
    }

    #[must_use]
    pub const fn identity(&self) -> Option<&QueryIdentity> {
        self.identity.as_ref()
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub const fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Error of the most recent failed fetch, cleared by the next success or restart.
    #[must_use]
    pub const fn last_error(&self) -> Option<&FetchError> {
        self.last_error.as_ref()
    }

    /// Ticket of the fetch currently in flight.
    #[must_use]
    pub const fn pending_ticket(&self) -> Option<FetchTicket> {
        match self.phase {
            FetchPhase::Fetching { page } => Some(self.ticket(page)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn item(n: usize) -> EventSummary {
        EventSummary {
            id: n.to_string(),
            place_name: format!("place {n}"),
            artists: vec![],
            event_type: String::new(),
            start_date: "2024-01-01".into(),
            end_date: "2024-01-01".into(),
            address: String::new(),
            event_images: vec![],
            tags: vec![],
            like_count: 0,
        }
    }

    fn page(page: u32, total_count: u64, len: usize) -> EventPage {
        EventPage {
            page,
            total_count,
            event_list: (0..len).map(item).collect(),
        }
    }

    fn controller() -> PaginatedFetchController<EventSummary> {
        PaginatedFetchController::new(FetchTarget::Events, 20)
    }

    fn identity(raw: &str) -> QueryIdentity {
        QueryIdentity::of_filter(&crate::codec::decode(raw))
    }

    #[test]
    fn loads_three_pages_until_exhausted() {
        let mut c = controller();
        let t1 = c.start(identity("keyword=a"));
        assert_eq!(c.apply(t1, Ok(page(1, 45, 20))), ApplyOutcome::Appended { added: 20 });
        assert!(c.has_next_page());
        assert_eq!(c.phase(), FetchPhase::Ready);

        let t2 = c.fetch_next().unwrap();
        assert_eq!(t2.page, 2);
        c.apply(t2, Ok(page(2, 45, 20)));
        assert!(c.has_next_page());

        let t3 = c.fetch_next().unwrap();
        c.apply(t3, Ok(page(3, 45, 5)));
        assert!(!c.has_next_page());
        assert_eq!(c.phase(), FetchPhase::Exhausted);
        assert_eq!(c.items().len(), 45);
        assert_eq!(c.fetch_next(), None);
    }

    #[test]
    fn restart_drops_responses_for_the_old_identity() {
        let mut c = controller();
        let old = c.start(identity("keyword=a"));
        let new = c.start(identity("keyword=b"));
        assert_ne!(old, new);

        assert_eq!(c.apply(old, Ok(page(1, 3, 3))), ApplyOutcome::Stale);
        assert!(c.items().is_empty());
        assert!(c.is_loading());

        c.apply(new, Ok(page(1, 1, 1)));
        assert_eq!(c.items().len(), 1);
    }

    #[test]
    fn fetch_next_while_pending_is_dropped() {
        let mut c = controller();
        let t1 = c.start(identity(""));
        assert_eq!(c.fetch_next(), None);
        c.apply(t1, Ok(page(1, 100, 20)));

        assert!(c.fetch_next().is_some());
        assert_eq!(c.fetch_next(), None);
        assert_eq!(c.pending_ticket().map(|t| t.page), Some(2));
    }

    #[test]
    fn failure_keeps_items_and_allows_retry() {
        let mut c = controller();
        let t1 = c.start(identity(""));
        c.apply(t1, Ok(page(1, 100, 20)));
        let t2 = c.fetch_next().unwrap();

        let outcome = c.apply::<EventPage>(t2, Err(FetchError::Timeout));
        assert_eq!(outcome, ApplyOutcome::Failed(FetchError::Timeout));
        assert_eq!(c.phase(), FetchPhase::Ready);
        assert_eq!(c.items().len(), 20);
        assert_eq!(c.pages().current_page(), 1);
        assert_eq!(c.last_error(), Some(&FetchError::Timeout));

        let retry = c.fetch_next().unwrap();
        assert_eq!(retry.page, 2);
        c.apply(retry, Ok(page(2, 100, 20)));
        assert_eq!(c.last_error(), None);
    }

    #[test]
    fn failed_first_page_is_retried_as_page_one() {
        let mut c = controller();
        let t1 = c.start(identity(""));
        c.apply::<EventPage>(t1, Err(FetchError::Timeout));
        assert_eq!(c.fetch_next().map(|t| t.page), Some(1));
    }

    #[test]
    fn duplicate_delivery_is_stale() {
        let mut c = controller();
        let t1 = c.start(identity(""));
        c.apply(t1, Ok(page(1, 100, 20)));
        assert_eq!(c.apply(t1, Ok(page(1, 100, 20))), ApplyOutcome::Stale);
        assert_eq!(c.items().len(), 20);
    }

    #[test]
    fn empty_page_exhausts() {
        let mut c = controller();
        let t1 = c.start(identity(""));
        c.apply(t1, Ok(page(1, 0, 0)));
        assert_eq!(c.phase(), FetchPhase::Exhausted);
    }

    proptest! {
        #[test]
        fn has_next_page_tracks_cursor(total in 0u64..200, size in 1u32..30) {
            let mut c = PaginatedFetchController::<EventSummary>::new(FetchTarget::Events, size);
            let mut ticket = Some(c.start(identity("")));
            let mut served = 0u64;
            while let Some(t) = ticket {
                let len = (total - served).min(u64::from(size));
                served += len;
                c.apply(t, Ok(page(t.page, total, len as usize)));
                prop_assert_eq!(
                    c.has_next_page(),
                    u64::from(c.pages().current_page()) * u64::from(size) < total
                );
                ticket = c.fetch_next();
            }
            prop_assert_eq!(c.items().len() as u64, total);
        }
    }
}
