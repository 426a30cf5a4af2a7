//! In-memory search filter state: keyword, sort mode, region, date range and tags.
//!
//! [`FilterState`] owns every user-editable input of the search page. Mutators
//! enforce cross-field rules locally; deciding whether an edit changes the query
//! identity (and therefore needs a URL write and a refetch) is left to the sync
//! coordinator, which compares identities before and after each event.

use super::region::{BigRegion, RegionFilter, SubRegion};
use super::tag::TagId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Result ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sort {
    /// Newest events first.
    #[default]
    #[serde(rename = "최신순")]
    Recent,
    /// Most liked events first.
    #[serde(rename = "인기순")]
    Popular,
}

impl Sort {
    /// Both sort modes in button order.
    pub const ALL: [Self; 2] = [Self::Recent, Self::Popular];

    /// Label shown on the sort buttons, carried in the URL and sent to the server.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Recent => "최신순",
            Self::Popular => "인기순",
        }
    }

    /// Parses a sort label; unknown input yields `None`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|sort| sort.label() == label)
    }
}

/// A date range as edited in the calendar sheet.
///
/// Either bound may be set alone while the user is picking. Only a range with
/// both bounds set, or both cleared, is a committed value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    /// First day of the range.
    pub start: Option<NaiveDate>,
    /// Last day of the range.
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Builds a committed range.
    #[must_use]
    pub const fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Returns `true` if both bounds are set.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }

    /// Returns `true` if neither bound is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Returns `true` if exactly one bound is set.
    #[must_use]
    pub const fn is_partial(&self) -> bool {
        !self.is_complete() && !self.is_empty()
    }
}

/// Keyword, sort and compound filter of the event search page.
///
/// `dates` is the live (possibly partial) calendar selection, while
/// `committed_dates` is the last complete-or-cleared value and the only one used
/// for encoding and fetching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    keyword: String,
    sort: Sort,
    region: RegionFilter,
    dates: DateRange,
    committed_dates: DateRange,
    tags: Vec<TagId>,
}

impl FilterState {
    /// Creates a default state: empty keyword, [`Sort::Recent`], no filters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Free-text search term.
    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Current sort mode.
    #[must_use]
    pub const fn sort(&self) -> Sort {
        self.sort
    }

    /// Region filter as edited.
    #[must_use]
    pub const fn region(&self) -> &RegionFilter {
        &self.region
    }

    /// Live date selection, possibly partial.
    #[must_use]
    pub const fn date_range(&self) -> DateRange {
        self.dates
    }

    /// Last committed date range (complete or empty).
    #[must_use]
    pub const fn committed_dates(&self) -> DateRange {
        self.committed_dates
    }

    /// Selected tags in the order they were added.
    #[must_use]
    pub fn tags(&self) -> &[TagId] {
        &self.tags
    }

    /// Replaces the keyword.
    pub fn set_keyword(&mut self, keyword: impl Into<String>) {
        self.keyword = keyword.into();
    }

    /// Replaces the sort mode.
    pub fn set_sort(&mut self, sort: Sort) {
        self.sort = sort;
    }

    /// Selects or clears the big region; see [`RegionFilter::set_big`].
    pub fn set_big_region(&mut self, big: Option<BigRegion>) {
        self.region.set_big(big);
    }

    /// Selects a sub-region; see [`RegionFilter::set_small`].
    pub fn set_small_region(&mut self, small: SubRegion) {
        self.region.set_small(small);
    }

    /// Sets both date bounds at once.
    pub fn set_date_range(&mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) {
        self.dates = DateRange { start, end };
        self.commit_dates();
    }

    /// Sets the start bound, leaving the end bound as it is.
    pub fn set_start_date(&mut self, start: Option<NaiveDate>) {
        self.dates.start = start;
        self.commit_dates();
    }

    /// Sets the end bound, leaving the start bound as it is.
    pub fn set_end_date(&mut self, end: Option<NaiveDate>) {
        self.dates.end = end;
        self.commit_dates();
    }

    fn commit_dates(&mut self) {
        if self.dates.is_partial() {
            tracing::trace!(dates = ?self.dates, "date range partially edited, keeping committed value");
        } else {
            self.committed_dates = self.dates;
        }
    }

    /// Removes `tag` if selected, otherwise appends it.
    pub fn toggle_tag(&mut self, tag: TagId) {
        if let Some(position) = self.tags.iter().position(|t| *t == tag) {
            self.tags.remove(position);
        } else {
            self.tags.push(tag);
        }
    }

    /// Restores keyword, sort and every filter to defaults in one transition.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Returns the canonical form: normalized region, live dates replaced by
    /// the committed range.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            keyword: self.keyword.clone(),
            sort: self.sort,
            region: self.region.normalized(),
            dates: self.committed_dates,
            committed_dates: self.committed_dates,
            tags: self.tags.clone(),
        }
    }

    /// Returns a copy with `tags` as the selection, in the given order.
    pub(crate) fn with_tags(mut self, tags: Vec<TagId>) -> Self {
        self.tags = tags;
        self
    }

    /// Assembles an already-validated state; used by the query-string decoder.
    pub(crate) fn from_parts(
        keyword: String,
        sort: Sort,
        region: RegionFilter,
        dates: DateRange,
        tags: Vec<TagId>,
    ) -> Self {
        let committed = if dates.is_complete() { dates } else { DateRange::default() };
        Self {
            keyword,
            sort,
            region,
            dates: committed,
            committed_dates: committed,
            tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn sort_labels_parse_back() {
        assert_eq!(Sort::from_label("인기순"), Some(Sort::Popular));
        assert_eq!(Sort::from_label("최신순"), Some(Sort::Recent));
        assert_eq!(Sort::from_label("popular"), None);
    }

    #[test]
    fn partial_date_edit_keeps_committed_range() {
        let mut state = FilterState::new();
        state.set_date_range(Some(day(1)), Some(day(3)));
        state.set_start_date(Some(day(10)));
        state.set_end_date(None);
        assert!(state.date_range().is_partial());
        assert_eq!(state.committed_dates(), DateRange::between(day(1), day(3)));

        state.set_end_date(Some(day(12)));
        assert_eq!(state.committed_dates(), DateRange::between(day(10), day(12)));
    }

    #[test]
    fn clearing_both_bounds_commits_empty_range() {
        let mut state = FilterState::new();
        state.set_date_range(Some(day(1)), Some(day(2)));
        state.set_date_range(None, None);
        assert!(state.committed_dates().is_empty());
    }

    #[test]
    fn toggle_tag_preserves_insertion_order() {
        let mut state = FilterState::new();
        state.toggle_tag(TagId::Poster);
        state.toggle_tag(TagId::CupHolder);
        state.toggle_tag(TagId::Sticker);
        state.toggle_tag(TagId::CupHolder);
        assert_eq!(state.tags(), &[TagId::Poster, TagId::Sticker]);
        state.toggle_tag(TagId::CupHolder);
        assert_eq!(state.tags(), &[TagId::Poster, TagId::Sticker, TagId::CupHolder]);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut state = FilterState::new();
        state.set_keyword("bts");
        state.set_sort(Sort::Popular);
        state.set_big_region(Some(BigRegion::Busan));
        state.set_date_range(Some(day(1)), Some(day(2)));
        state.toggle_tag(TagId::Ticket);
        state.reset();
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn big_region_clear_after_small_region() {
        let mut state = FilterState::new();
        state.set_big_region(Some(BigRegion::Seoul));
        state.set_small_region(SubRegion::from("강남구"));
        state.set_big_region(None);
        assert_eq!(state.region().big(), None);
        assert_eq!(state.region().small(), None);
    }
}
