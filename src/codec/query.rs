//! Query-string codec for the search page URL.
//!
//! [`decode`] turns any query string into a complete, validated [`FilterState`]
//! and never fails: unknown sort labels, unknown regions, foreign sub-regions,
//! unparsable dates and unrecognized tag tokens all fall back to defaults.
//! [`encode`] writes the canonical form: fixed parameter order, default values
//! omitted, tags joined with `|`.
//!
//! For every state `s` that satisfies the region and date invariants,
//! `decode(&encode(&s)) == s.normalized()`.

use crate::domain::{BigRegion, DateRange, FilterState, RegionFilter, Sort, SubRegion, TagId};
use chrono::NaiveDate;
use std::collections::HashMap;
use url::form_urlencoded;

/// URL parameter carrying the search keyword.
pub const KEYWORD: &str = "keyword";
/// URL parameter carrying the sort label.
pub const SORT: &str = "sort";
/// URL parameter carrying the big region label.
pub const BIG_REGION: &str = "bigRegion";
/// URL parameter carrying the sub-region label.
pub const SMALL_REGION: &str = "smallRegion";
/// URL parameter carrying the range start.
pub const START_DATE: &str = "startDate";
/// URL parameter carrying the range end.
pub const END_DATE: &str = "endDate";
/// URL parameter carrying the gift tags.
pub const GIFTS: &str = "gifts";

/// Separator between tag tokens in the `gifts` parameter.
pub const TAG_DELIMITER: char = '|';

/// Date format used in the URL and in fetch parameters.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Decodes a raw query string (with or without a leading `?`).
///
/// # Examples
///
/// ```
/// use eventsync::codec::decode;
/// use eventsync::domain::{BigRegion, Sort, SubRegion};
///
/// let state = decode("keyword=bts&sort=인기순&bigRegion=서울&smallRegion=강남구");
/// assert_eq!(state.keyword(), "bts");
/// assert_eq!(state.sort(), Sort::Popular);
/// assert_eq!(state.region().big(), Some(BigRegion::Seoul));
/// assert_eq!(state.region().small(), Some(&SubRegion::Named("강남구".into())));
/// ```
#[must_use]
pub fn decode(raw: &str) -> FilterState {
    let _span = tracing::debug_span!("decode_query", query_len = raw.len()).entered();

    let raw = raw.strip_prefix('?').unwrap_or(raw);
    let mut params: HashMap<String, String> = HashMap::new();
    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        params.entry(key.into_owned()).or_insert_with(|| value.into_owned());
    }

    let keyword = params.remove(KEYWORD).unwrap_or_default();

    let sort = match params.get(SORT) {
        Some(label) => Sort::from_label(label).unwrap_or_else(|| {
            tracing::debug!(sort = %label, "unknown sort label, using default");
            Sort::default()
        }),
        None => Sort::default(),
    };

    let big = params.get(BIG_REGION).and_then(|label| {
        let region = BigRegion::from_label(label);
        if region.is_none() && !label.is_empty() {
            tracing::debug!(big_region = %label, "unknown big region, clearing");
        }
        region
    });
    let mut region = RegionFilter::default();
    region.set_big(big);
    if let Some(small) = params.get(SMALL_REGION).filter(|s| !s.is_empty()) {
        region.set_small(SubRegion::from(small.as_str()));
    }
    let region = region.normalized();

    let dates = DateRange {
        start: params.get(START_DATE).and_then(|s| parse_date(START_DATE, s)),
        end: params.get(END_DATE).and_then(|s| parse_date(END_DATE, s)),
    };
    if dates.is_partial() {
        tracing::debug!(dates = ?dates, "half-open date range in url, dropping");
    }

    let tags = params.get(GIFTS).map(|raw| decode_tags(raw)).unwrap_or_default();

    FilterState::from_parts(keyword, sort, region, dates, tags)
}

fn parse_date(param: &str, value: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::debug!(param = param, value = %value, error = %e, "unparsable date, ignoring");
            None
        }
    }
}

fn decode_tags(raw: &str) -> Vec<TagId> {
    let mut tags: Vec<TagId> = Vec::new();
    for token in raw.split(TAG_DELIMITER).filter(|t| !t.is_empty()) {
        match TagId::from_label(token) {
            Some(tag) if !tags.contains(&tag) => tags.push(tag),
            Some(_) => {}
            None => tracing::debug!(token = %token, "unknown gift tag, dropping"),
        }
    }
    tags
}

/// Encodes the canonical query string for `state`.
///
/// Parameters appear in the order keyword, sort, bigRegion, smallRegion,
/// startDate, endDate, gifts. A parameter is omitted when it holds its
/// default: empty keyword, [`Sort::Recent`], no region, the `전지역` sentinel,
/// no committed dates, no tags. The fully default state encodes to `""`.
///
/// # Examples
///
/// ```
/// use eventsync::codec::encode;
/// use eventsync::domain::{FilterState, TagId};
///
/// let mut state = FilterState::new();
/// state.set_keyword("aespa");
/// state.toggle_tag(TagId::CupHolder);
/// state.toggle_tag(TagId::Ticket);
/// assert_eq!(encode(&state), "keyword=aespa&gifts=%EC%BB%B5%ED%99%80%EB%8D%94%7C%ED%8B%B0%EC%BC%93");
/// ```
#[must_use]
pub fn encode(state: &FilterState) -> String {
    let state = state.normalized();
    let mut query = form_urlencoded::Serializer::new(String::new());

    if !state.keyword().is_empty() {
        query.append_pair(KEYWORD, state.keyword());
    }
    if state.sort() != Sort::default() {
        query.append_pair(SORT, state.sort().label());
    }
    if let Some(big) = state.region().big() {
        query.append_pair(BIG_REGION, big.label());
        if let Some(SubRegion::Named(name)) = state.region().small() {
            query.append_pair(SMALL_REGION, name);
        }
    }
    if let DateRange {
        start: Some(start),
        end: Some(end),
    } = state.committed_dates()
    {
        query.append_pair(START_DATE, &start.format(DATE_FORMAT).to_string());
        query.append_pair(END_DATE, &end.format(DATE_FORMAT).to_string());
    }
    if !state.tags().is_empty() {
        let joined = state
            .tags()
            .iter()
            .map(|tag| tag.label())
            .collect::<Vec<_>>()
            .join(&TAG_DELIMITER.to_string());
        query.append_pair(GIFTS, &joined);
    }

    query.finish()
}
