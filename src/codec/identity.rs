//! Query identity: the canonical key of one paginated result set.

use super::query::encode;
use crate::domain::FilterState;
use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Deterministic serialization of everything that selects a result set.
///
/// Two states with the same identity paginate the same results; any change of
/// identity discards the current pages and restarts from page 1.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryIdentity(String);

impl QueryIdentity {
    /// Identity of an event search: the canonical query string of the state
    /// with its tags in table order, since the tag set is unordered for fetching.
    #[must_use]
    pub fn of_filter(state: &FilterState) -> Self {
        let mut tags = state.tags().to_vec();
        tags.sort_unstable();
        Self(encode(&state.clone().with_tags(tags)))
    }

    /// Identity of an artist search, which depends on the keyword alone.
    #[must_use]
    pub fn of_artist_keyword(keyword: &str) -> Self {
        let mut query = form_urlencoded::Serializer::new(String::from("artist:"));
        query.append_pair("keyword", keyword);
        Self(query.finish())
    }

    /// Canonical string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QueryIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::decode;
    use crate::domain::{BigRegion, SubRegion};

    #[test]
    fn identity_ignores_partial_date_edits() {
        let mut state = FilterState::new();
        let before = QueryIdentity::of_filter(&state);
        state.set_start_date(chrono::NaiveDate::from_ymd_opt(2024, 2, 1));
        assert_eq!(QueryIdentity::of_filter(&state), before);
    }

    #[test]
    fn identity_treats_sentinel_and_missing_sub_region_alike() {
        let mut a = FilterState::new();
        a.set_big_region(Some(BigRegion::Seoul));
        let mut b = a.clone();
        b.set_small_region(SubRegion::All);
        assert_eq!(QueryIdentity::of_filter(&a), QueryIdentity::of_filter(&b));

        b.set_small_region(SubRegion::from("용산구"));
        assert_ne!(QueryIdentity::of_filter(&a), QueryIdentity::of_filter(&b));
    }

    #[test]
    fn identity_ignores_tag_selection_order() {
        let a = decode("gifts=포스터|컵홀더");
        let b = decode("gifts=컵홀더|포스터");
        assert_eq!(a.tags().len(), 2);
        assert_ne!(encode(&a), encode(&b));
        assert_eq!(QueryIdentity::of_filter(&a), QueryIdentity::of_filter(&b));
    }

    #[test]
    fn artist_identity_depends_on_keyword_only() {
        assert_eq!(
            QueryIdentity::of_artist_keyword("seventeen"),
            QueryIdentity::of_artist_keyword("seventeen")
        );
        assert_ne!(
            QueryIdentity::of_artist_keyword(""),
            QueryIdentity::of_artist_keyword("seventeen")
        );
    }
}
