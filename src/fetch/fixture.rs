//! JSON-file-backed [`ResultSource`] that filters, sorts and pages in memory.
//!
//! Stands in for the HTTP backend in the bundled host binary and in tests. The
//! whole fixture is loaded once; every request is answered from memory.
//!
//! # File Format
//!
//! ```json
//! {
//!   "events": [
//!     {
//!       "id": "e1",
//!       "placeName": "카페 모모",
//!       "artists": ["BTS"],
//!       "eventType": "생일카페",
//!       "startDate": "2024-06-01",
//!       "endDate": "2024-06-03",
//!       "address": "서울 마포구 연남동 1-1",
//!       "tags": ["컵홀더", "포토카드"],
//!       "likeCount": 12
//!     }
//!   ],
//!   "artists": [{ "id": "a1", "name": "BTS" }]
//! }
//! ```

use super::messages::{ArtistQuery, EventQuery};
use super::source::ResultSource;
use crate::domain::error::Result;
use crate::domain::{ArtistPage, ArtistSummary, EventPage, EventSummary, FetchError, Sort, TagId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::Path;

/// Contents of a fixture file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureData {
    #[serde(default)]
    pub events: Vec<EventSummary>,
    #[serde(default)]
    pub artists: Vec<ArtistSummary>,
}

/// In-memory result source.
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    data: FixtureData,
    /// Failures to return, in order, before serving real pages again.
    injected_failures: VecDeque<FetchError>,
    requests_served: usize,
}

impl FixtureSource {
    /// Wraps already-loaded fixture data.
    #[must_use]
    pub fn new(data: FixtureData) -> Self {
        Self {
            data,
            ..Self::default()
        }
    }

    /// Loads a fixture from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid fixture JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = ?path, "loading result fixture");
        let content = std::fs::read_to_string(path)?;
        let data: FixtureData = serde_json::from_str(&content)?;
        tracing::debug!(
            events = data.events.len(),
            artists = data.artists.len(),
            "result fixture loaded"
        );
        Ok(Self::new(data))
    }

    /// Makes the next request fail with `error`.
    pub fn fail_next(&mut self, error: FetchError) {
        self.injected_failures.push_back(error);
    }

    /// Number of requests answered so far, failures included.
    #[must_use]
    pub const fn requests_served(&self) -> usize {
        self.requests_served
    }

    fn take_failure(&mut self) -> std::result::Result<(), FetchError> {
        self.requests_served += 1;
        self.injected_failures.pop_front().map_or(Ok(()), Err)
    }
}

fn page_slice<T: Clone>(items: &[T], page: u32, size: u32) -> Vec<T> {
    let page = page.max(1) as usize;
    let size = size as usize;
    items
        .iter()
        .skip((page - 1).saturating_mul(size))
        .take(size)
        .cloned()
        .collect()
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn event_matches(event: &EventSummary, query: &EventQuery, tag_labels: &[&str]) -> bool {
    let keyword = query.keyword.trim();
    let keyword_ok = keyword.is_empty()
        || contains_ignore_case(&event.place_name, keyword)
        || contains_ignore_case(&event.event_type, keyword)
        || event.artists.iter().any(|a| contains_ignore_case(a, keyword));

    let region_ok = (query.sido.is_empty() || event.address.starts_with(&query.sido))
        && (query.gungu.is_empty() || event.address.split_whitespace().any(|w| w == query.gungu));

    // ISO dates compare correctly as strings.
    let dates_ok = match (&query.start_date, &query.end_date) {
        (Some(start), Some(end)) => {
            event.end_date.as_str() >= start.as_str() && event.start_date.as_str() <= end.as_str()
        }
        _ => true,
    };

    let tags_ok = tag_labels
        .iter()
        .all(|label| event.tags.iter().any(|t| t == label));

    keyword_ok && region_ok && dates_ok && tags_ok
}

impl ResultSource for FixtureSource {
    fn events(&mut self, query: &EventQuery) -> std::result::Result<EventPage, FetchError> {
        self.take_failure()?;

        let tag_labels: Vec<&str> = query
            .tags
            .split(',')
            .filter(|code| !code.is_empty())
            .filter_map(TagId::from_code)
            .map(TagId::label)
            .collect();

        let mut matched: Vec<&EventSummary> = self
            .data
            .events
            .iter()
            .filter(|event| event_matches(event, query, &tag_labels))
            .collect();

        match Sort::from_label(&query.sort).unwrap_or_default() {
            Sort::Recent => matched.sort_by(|a, b| b.start_date.cmp(&a.start_date)),
            Sort::Popular => matched.sort_by(|a, b| {
                b.like_count
                    .cmp(&a.like_count)
                    .then_with(|| b.start_date.cmp(&a.start_date))
            }),
        }

        let total_count = matched.len() as u64;
        let event_list = page_slice(&matched, query.page, query.size)
            .into_iter()
            .cloned()
            .collect();

        Ok(EventPage {
            page: query.page,
            total_count,
            event_list,
        })
    }

    fn artists(&mut self, query: &ArtistQuery) -> std::result::Result<ArtistPage, FetchError> {
        self.take_failure()?;

        let keyword = query.keyword.trim();
        let matched: Vec<ArtistSummary> = self
            .data
            .artists
            .iter()
            .filter(|artist| keyword.is_empty() || contains_ignore_case(&artist.name, keyword))
            .cloned()
            .collect();

        Ok(ArtistPage {
            page: query.page,
            total_count: matched.len() as u64,
            artist_and_group_list: page_slice(&matched, query.page, query.size),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BigRegion, FilterState, SubRegion};
    use std::io::Write;

    fn event(id: &str, address: &str, start: &str, tags: &[&str], likes: u32) -> EventSummary {
        EventSummary {
            id: id.to_string(),
            place_name: format!("cafe {id}"),
            artists: vec!["NewJeans".to_string()],
            event_type: "생일카페".to_string(),
            start_date: start.to_string(),
            end_date: start.to_string(),
            address: address.to_string(),
            event_images: vec![],
            tags: tags.iter().map(ToString::to_string).collect(),
            like_count: likes,
        }
    }

    fn source() -> FixtureSource {
        FixtureSource::new(FixtureData {
            events: vec![
                event("1", "서울 강남구 역삼동", "2024-05-01", &["컵홀더"], 3),
                event("2", "서울 마포구 연남동", "2024-05-03", &["컵홀더", "포스터"], 9),
                event("3", "부산 해운대구 우동", "2024-05-02", &["포스터"], 1),
            ],
            artists: vec![],
        })
    }

    #[test]
    fn filters_by_region_and_sub_region() {
        let mut filter = FilterState::new();
        filter.set_big_region(Some(BigRegion::Seoul));
        let page = source().events(&EventQuery::from_filter(&filter, 1, 20)).unwrap();
        assert_eq!(page.total_count, 2);

        filter.set_small_region(SubRegion::from("마포구"));
        let page = source().events(&EventQuery::from_filter(&filter, 1, 20)).unwrap();
        assert_eq!(page.event_list.len(), 1);
        assert_eq!(page.event_list[0].id, "2");
    }

    #[test]
    fn requires_every_selected_tag() {
        let mut filter = FilterState::new();
        filter.toggle_tag(TagId::CupHolder);
        filter.toggle_tag(TagId::Poster);
        let page = source().events(&EventQuery::from_filter(&filter, 1, 20)).unwrap();
        assert_eq!(page.total_count, 1);
    }

    #[test]
    fn sorts_by_popularity() {
        let mut filter = FilterState::new();
        filter.set_sort(Sort::Popular);
        let page = source().events(&EventQuery::from_filter(&filter, 1, 20)).unwrap();
        let ids: Vec<_> = page.event_list.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
    }

    #[test]
    fn pages_past_the_end_are_empty() {
        let page = source()
            .events(&EventQuery::from_filter(&FilterState::new(), 2, 2))
            .unwrap();
        assert_eq!(page.event_list.len(), 1);
        let page = source()
            .events(&EventQuery::from_filter(&FilterState::new(), 3, 2))
            .unwrap();
        assert!(page.event_list.is_empty());
        assert_eq!(page.total_count, 3);
    }

    #[test]
    fn injected_failures_are_served_first() {
        let mut source = source();
        source.fail_next(FetchError::Timeout);
        let query = EventQuery::from_filter(&FilterState::new(), 1, 20);
        assert_eq!(source.events(&query), Err(FetchError::Timeout));
        assert!(source.events(&query).is_ok());
        assert_eq!(source.requests_served(), 2);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"artists": [{{"id": "a1", "name": "IVE"}}, {{"id": "a2", "name": "aespa"}}]}}"#
        )
        .unwrap();
        let mut source = FixtureSource::from_file(file.path()).unwrap();
        let page = source
            .artists(&ArtistQuery {
                keyword: "AES".into(),
                size: 12,
                page: 1,
            })
            .unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.artist_and_group_list[0].id, "a2");
    }
}
