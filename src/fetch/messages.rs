//! Request/response protocol between the page and the result-fetch boundary.
//!
//! The page never performs I/O. It emits [`FetchRequest`]s (inside
//! `Action::Fetch`) and later receives [`FetchResponse`]s (inside
//! `Event::FetchCompleted`). Every message carries a [`FetchTicket`] naming the
//! list, the controller generation and the page it belongs to; a response whose
//! ticket no longer matches the pending fetch is stale and gets dropped. Requests
//! also carry an optional [`TraceContext`] so the span executing the fetch can
//! be linked to the span that asked for it.

use crate::codec::query::DATE_FORMAT;
use crate::domain::{ArtistPage, EventPage, FetchError, FilterState};
use serde::{Deserialize, Serialize};

/// Distributed tracing context propagated with a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Span ID of the requesting span.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the OpenTelemetry context of the current `tracing` span.
    ///
    /// Returns `None` when no valid span context is active, e.g. when tracing
    /// has not been initialized.
    #[must_use]
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

/// Which paginated list a fetch belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchTarget {
    /// `GET /event` on the search page.
    Events,
    /// `GET /artist/group` in the artist picker.
    Artists,
}

/// Tag attached to a request and echoed by its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FetchTicket {
    /// List the fetch belongs to.
    pub target: FetchTarget,
    /// Controller generation; bumped on every restart.
    pub generation: u64,
    /// Requested page, starting at 1.
    pub page: u32,
}

/// Query parameters of `GET /event`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventQuery {
    pub size: u32,
    pub page: u32,
    pub sort: String,
    pub keyword: String,
    pub sido: String,
    pub gungu: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    /// Tag codes joined by `,`.
    pub tags: String,
}

impl EventQuery {
    /// Builds the parameters for `page` of the result set selected by `filter`.
    ///
    /// The sub-region is sent empty for the `전지역` sentinel, and the date
    /// bounds are only sent for a committed range.
    #[must_use]
    pub fn from_filter(filter: &FilterState, page: u32, size: u32) -> Self {
        let filter = filter.normalized();
        let dates = filter.committed_dates();
        Self {
            size,
            page,
            sort: filter.sort().label().to_string(),
            keyword: filter.keyword().to_string(),
            sido: filter
                .region()
                .big()
                .map(|big| big.label().to_string())
                .unwrap_or_default(),
            gungu: filter.region().fetch_sub_region().to_string(),
            start_date: dates.start.map(|d| d.format(DATE_FORMAT).to_string()),
            end_date: dates.end.map(|d| d.format(DATE_FORMAT).to_string()),
            tags: filter
                .tags()
                .iter()
                .map(|tag| tag.code())
                .collect::<Vec<_>>()
                .join(","),
        }
    }

    /// Parameters as name/value pairs in a stable order.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("size", self.size.to_string()),
            ("page", self.page.to_string()),
            ("sort", self.sort.clone()),
            ("keyword", self.keyword.clone()),
            ("sido", self.sido.clone()),
            ("gungu", self.gungu.clone()),
        ];
        if let Some(start) = &self.start_date {
            params.push(("startDate", start.clone()));
        }
        if let Some(end) = &self.end_date {
            params.push(("endDate", end.clone()));
        }
        params.push(("tags", self.tags.clone()));
        params
    }
}

/// Query parameters of `GET /artist/group`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistQuery {
    pub keyword: String,
    pub size: u32,
    pub page: u32,
}

impl ArtistQuery {
    /// Parameters as name/value pairs.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("keyword", self.keyword.clone()),
            ("size", self.size.to_string()),
            ("page", self.page.to_string()),
        ]
    }
}

/// Generates constructors that attach the current trace context.
macro_rules! fetch_request_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl FetchRequest {
            $(
                #[doc = concat!("Creates a ", stringify!($variant), " request with the current trace context.")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

fetch_request_builders! {
    events(Events { ticket: FetchTicket, query: EventQuery }),
    artists(Artists { ticket: FetchTicket, query: ArtistQuery }),
}

/// A page request for the host to execute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FetchRequest {
    /// Request a page of event search results.
    Events {
        ticket: FetchTicket,
        query: EventQuery,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Request a page of artist/group results.
    Artists {
        ticket: FetchTicket,
        query: ArtistQuery,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl FetchRequest {
    /// Ticket the response must echo.
    #[must_use]
    pub const fn ticket(&self) -> FetchTicket {
        match self {
            Self::Events { ticket, .. } | Self::Artists { ticket, .. } => *ticket,
        }
    }

    /// Endpoint path.
    #[must_use]
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Events { .. } => "/event",
            Self::Artists { .. } => "/artist/group",
        }
    }

    /// Endpoint query parameters.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Events { query, .. } => query.params(),
            Self::Artists { query, .. } => query.params(),
        }
    }

    /// Trace context captured when the request was built.
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::Events { trace_context, .. } | Self::Artists { trace_context, .. } => {
                trace_context.as_ref()
            }
        }
    }
}

/// Completion of a [`FetchRequest`], delivered back to the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FetchResponse {
    /// A page of events arrived.
    EventsLoaded { ticket: FetchTicket, page: EventPage },

    /// A page of artists arrived.
    ArtistsLoaded { ticket: FetchTicket, page: ArtistPage },

    /// The fetch failed.
    Failed { ticket: FetchTicket, error: FetchError },
}

impl FetchResponse {
    /// Ticket echoed from the request.
    #[must_use]
    pub const fn ticket(&self) -> FetchTicket {
        match self {
            Self::EventsLoaded { ticket, .. }
            | Self::ArtistsLoaded { ticket, .. }
            | Self::Failed { ticket, .. } => *ticket,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BigRegion, SubRegion, TagId};
    use chrono::NaiveDate;

    #[test]
    fn event_query_maps_filter_fields() {
        let mut filter = FilterState::new();
        filter.set_keyword("bts");
        filter.set_big_region(Some(BigRegion::Seoul));
        filter.toggle_tag(TagId::Poster);
        filter.toggle_tag(TagId::CupHolder);

        let query = EventQuery::from_filter(&filter, 3, 20);
        assert_eq!(query.sido, "서울");
        assert_eq!(query.gungu, "");
        assert_eq!(query.sort, "최신순");
        assert_eq!(query.tags, "6,1");
        assert_eq!(query.start_date, None);

        filter.set_small_region(SubRegion::from("강남구"));
        let query = EventQuery::from_filter(&filter, 1, 20);
        assert_eq!(query.gungu, "강남구");
    }

    #[test]
    fn date_params_only_for_committed_range() {
        let mut filter = FilterState::new();
        filter.set_start_date(NaiveDate::from_ymd_opt(2024, 7, 1));
        let names: Vec<_> = EventQuery::from_filter(&filter, 1, 20)
            .params()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert!(!names.contains(&"startDate"));

        filter.set_end_date(NaiveDate::from_ymd_opt(2024, 7, 3));
        let params = EventQuery::from_filter(&filter, 1, 20).params();
        assert!(params.contains(&("startDate", "2024-07-01".to_string())));
        assert!(params.contains(&("endDate", "2024-07-03".to_string())));
    }

    #[test]
    fn response_json_carries_ticket() {
        let ticket = FetchTicket {
            target: FetchTarget::Events,
            generation: 4,
            page: 2,
        };
        let response = FetchResponse::Failed {
            ticket,
            error: FetchError::Timeout,
        };
        let json = serde_json::to_string(&response).unwrap();
        let back: FetchResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back.ticket(), ticket);
    }
}
