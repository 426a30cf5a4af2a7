//! Artist picker: keyword search over artists and groups with a chip selection.
//!
//! The picker paginates `GET /artist/group` through the same controller and
//! scroll trigger as the event list. Its identity is the keyword alone and it
//! never touches the URL.

use super::Action;
use crate::codec::QueryIdentity;
use crate::domain::{ArtistPage, ArtistSummary};
use crate::fetch::{ArtistQuery, FetchRequest, FetchResponse, FetchTarget};
use crate::paging::{ApplyOutcome, FetchPhase, InfiniteScrollTrigger, PaginatedFetchController};
use crate::ui::viewmodel::{ArtistPickerViewModel, ArtistRow};
use serde::{Deserialize, Serialize};

/// An artist chosen in the picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedArtist {
    pub id: String,
    pub name: String,
}

/// Artist search state.
#[derive(Debug, Clone)]
pub struct ArtistSearch {
    keyword: String,
    identity: QueryIdentity,
    results: PaginatedFetchController<ArtistSummary>,
    scroll: InfiniteScrollTrigger,
    selected: Vec<SelectedArtist>,
}

impl ArtistSearch {
    #[must_use]
    pub fn new(page_size: u32) -> Self {
        Self {
            keyword: String::new(),
            identity: QueryIdentity::of_artist_keyword(""),
            results: PaginatedFetchController::new(FetchTarget::Artists, page_size),
            scroll: InfiniteScrollTrigger::new(),
            selected: Vec::new(),
        }
    }

    /// Opens the picker, loading the first page if nothing was requested yet.
    pub fn open(&mut self) -> Vec<Action> {
        if self.results.phase() == FetchPhase::Idle {
            vec![self.restart()]
        } else {
            vec![]
        }
    }

    /// Changes the search keyword, restarting pagination if it differs.
    pub fn set_keyword(&mut self, keyword: &str) -> Vec<Action> {
        let identity = QueryIdentity::of_artist_keyword(keyword);
        if identity == self.identity && self.results.phase() != FetchPhase::Idle {
            return vec![];
        }
        tracing::debug!(keyword, "artist keyword changed");
        keyword.clone_into(&mut self.keyword);
        self.identity = identity;
        vec![self.restart()]
    }

    pub fn observe_sentinel(&mut self, visible: bool) -> Vec<Action> {
        if self.scroll.observe(visible, self.results.phase()) {
            self.fetch_next()
        } else {
            vec![]
        }
    }

    pub fn fetch_next(&mut self) -> Vec<Action> {
        self.results
            .fetch_next()
            .map(|ticket| Action::Fetch(FetchRequest::artists(ticket, self.query(ticket.page))))
            .into_iter()
            .collect()
    }

    /// Adds the artist to the selection, or removes it if already selected.
    /// Returns `true` if the artist is selected afterwards.
    pub fn toggle(&mut self, id: &str, name: &str) -> bool {
        if let Some(position) = self.selected.iter().position(|a| a.id == id) {
            self.selected.remove(position);
            false
        } else {
            self.selected.push(SelectedArtist {
                id: id.to_string(),
                name: name.to_string(),
            });
            true
        }
    }

    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|a| a.id == id)
    }

    /// Feeds a fetch completion into the artist list.
    pub fn apply_response(&mut self, response: FetchResponse) -> (bool, Vec<Action>) {
        let outcome = match response {
            FetchResponse::ArtistsLoaded { ticket, page } => self.results.apply(ticket, Ok(page)),
            FetchResponse::Failed { ticket, error } => {
                self.results.apply::<ArtistPage>(ticket, Err(error))
            }
            FetchResponse::EventsLoaded { ticket, .. } => {
                tracing::warn!(ticket = ?ticket, "event page routed to the artist list");
                return (false, vec![]);
            }
        };

        match outcome {
            ApplyOutcome::Appended { .. } => {
                let actions = if self.scroll.on_items_appended(self.results.phase()) {
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
                        target: FetchTarget::Artists,
                        error,
                    }],
                )
            }
            ApplyOutcome::Stale => (false, vec![]),
        }
    }

    fn restart(&mut self) -> Action {
        let ticket = self.results.start(self.identity.clone());
        self.scroll.reset();
        Action::Fetch(FetchRequest::artists(ticket, self.query(ticket.page)))
    }

    fn query(&self, page: u32) -> ArtistQuery {
        ArtistQuery {
            keyword: self.keyword.clone(),
            size: self.results.page_size(),
            page,
        }
    }

    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    #[must_use]
    pub fn selected(&self) -> &[SelectedArtist] {
        &self.selected
    }

    #[must_use]
    pub const fn results(&self) -> &PaginatedFetchController<ArtistSummary> {
        &self.results
    }

    #[must_use]
    pub fn compute_viewmodel(&self) -> ArtistPickerViewModel {
        ArtistPickerViewModel {
            keyword: self.keyword.clone(),
            artists: self
                .results
                .items()
                .iter()
                .map(|artist| ArtistRow {
                    id: artist.id.clone(),
                    name: artist.name.clone(),
                    image: artist.image.clone(),
                    selected: self.is_selected(&artist.id),
                })
                .collect(),
            selected: self.selected.clone(),
            has_more: self.results.has_next_page(),
            is_loading: self.results.is_loading(),
            error: self.results.last_error().map(ToString::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artists_page(ticket: crate::fetch::FetchTicket, total_count: u64, names: &[&str]) -> FetchResponse {
        FetchResponse::ArtistsLoaded {
            ticket,
            page: ArtistPage {
                page: ticket.page,
                total_count,
                artist_and_group_list: names
                    .iter()
                    .map(|name| ArtistSummary {
                        id: (*name).to_string(),
                        name: (*name).to_string(),
                        image: None,
                    })
                    .collect(),
            },
        }
    }

    fn ticket_of(actions: &[Action]) -> crate::fetch::FetchTicket {
        match actions {
            [Action::Fetch(request)] => request.ticket(),
            other => panic!("expected one fetch, got {other:?}"),
        }
    }

    #[test]
    fn open_fetches_once() {
        let mut search = ArtistSearch::new(12);
        let actions = search.open();
        assert_eq!(ticket_of(&actions).target, FetchTarget::Artists);
        assert!(search.open().is_empty());
    }

    #[test]
    fn keyword_change_restarts_and_drops_old_pages() {
        let mut search = ArtistSearch::new(12);
        let old = ticket_of(&search.open());
        let new = ticket_of(&search.set_keyword("new"));
        assert!(search.set_keyword("new").is_empty());

        assert_eq!(search.apply_response(artists_page(old, 1, &["x"])), (false, vec![]));
        search.apply_response(artists_page(new, 2, &["NewJeans", "NEWEST"]));
        assert_eq!(search.results().items().len(), 2);
        assert!(!search.compute_viewmodel().has_more);
    }

    #[test]
    fn selection_toggles_in_order() {
        let mut search = ArtistSearch::new(12);
        assert!(search.toggle("1", "IVE"));
        assert!(search.toggle("2", "aespa"));
        assert!(!search.toggle("1", "IVE"));
        assert_eq!(search.selected()[0].name, "aespa");
        assert!(search.is_selected("2"));
    }
}
