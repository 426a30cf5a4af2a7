//! Display-label formatting for filter buttons and result cards.

use crate::domain::{DateRange, RegionFilter, TagId};
use chrono::NaiveDate;

/// Placeholder of the big-region button.
pub const REGION_PLACEHOLDER: &str = "시/도";
/// Placeholder of the date button.
pub const DATE_PLACEHOLDER: &str = "기간";
/// Placeholder of the gift button.
pub const GIFT_PLACEHOLDER: &str = "특전";

const SHORT_DATE: &str = "%y.%m.%d";

/// Big-region button label.
#[must_use]
pub fn region_label(region: &RegionFilter) -> String {
    region
        .big()
        .map_or(REGION_PLACEHOLDER, |big| big.label())
        .to_string()
}

/// Sub-region button label; the button only exists once a big region is chosen.
#[must_use]
pub fn sub_region_label(region: &RegionFilter) -> Option<String> {
    region.big()?;
    Some(
        region
            .small()
            .map_or(crate::domain::ALL_SUB_REGIONS, |small| small.label())
            .to_string(),
    )
}

/// Date button label for the live calendar selection.
///
/// ```
/// use chrono::NaiveDate;
/// use eventsync::domain::DateRange;
/// use eventsync::ui::labels::date_label;
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap();
/// assert_eq!(date_label(DateRange::between(day(1), day(3))), "24.06.01 ~ 24.06.03");
/// assert_eq!(date_label(DateRange::between(day(1), day(1))), "24.06.01");
/// assert_eq!(date_label(DateRange::default()), "기간");
/// ```
#[must_use]
pub fn date_label(range: DateRange) -> String {
    format_span(range.start, range.end).unwrap_or_else(|| DATE_PLACEHOLDER.to_string())
}

/// Date label of a result card; unparsable dates are shown as sent.
#[must_use]
pub fn event_date_label(start: &str, end: &str) -> String {
    let parse = |raw: &str| NaiveDate::parse_from_str(raw, crate::codec::query::DATE_FORMAT).ok();
    match (parse(start), parse(end)) {
        (Some(s), Some(e)) => format_span(Some(s), Some(e)).unwrap_or_default(),
        _ if start == end => start.to_string(),
        _ => format!("{start} ~ {end}"),
    }
}

fn format_span(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<String> {
    let short = |date: NaiveDate| date.format(SHORT_DATE).to_string();
    match (start, end) {
        (None, None) => None,
        (Some(s), None) => Some(format!("{} ~", short(s))),
        (None, Some(e)) => Some(format!("~ {}", short(e))),
        (Some(s), Some(e)) if s == e => Some(short(s)),
        (Some(s), Some(e)) => Some(format!("{} ~ {}", short(s), short(e))),
    }
}

/// Gift button label: the first selected tag, with `...` when more follow.
#[must_use]
pub fn gift_label(tags: &[TagId]) -> String {
    match tags {
        [] => GIFT_PLACEHOLDER.to_string(),
        [only] => only.label().to_string(),
        [first, ..] => format!("{}...", first.label()),
    }
}

/// Card address: province and district only.
#[must_use]
pub fn short_address(address: &str) -> String {
    address.split_whitespace().take(2).collect::<Vec<_>>().join(" ")
}
