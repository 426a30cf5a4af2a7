//! Result source abstraction: the opaque request/response boundary.
//!
//! The search engine only needs "give me page N of this query". [`ResultSource`]
//! captures exactly that so hosts can plug in an HTTP client, and tests or the
//! bundled binary can plug in [`FixtureSource`](super::FixtureSource). Retries,
//! backoff and authentication belong to the implementation, not to this crate.

use super::messages::{ArtistQuery, EventQuery, FetchRequest, FetchResponse};
use crate::domain::{ArtistPage, EventPage, FetchError};

/// Executes page requests against some backend.
pub trait ResultSource: Send {
    /// Fetches one page of event search results.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the backend could not produce the page.
    fn events(&mut self, query: &EventQuery) -> Result<EventPage, FetchError>;

    /// Fetches one page of artist/group results.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] if the backend could not produce the page.
    fn artists(&mut self, query: &ArtistQuery) -> Result<ArtistPage, FetchError>;
}

/// Runs `request` against `source` and wraps the outcome in a response that
/// echoes the request's ticket.
///
/// The requesting span's trace context, if any, is attached as the remote
/// parent of the execution span.
pub fn execute(source: &mut dyn ResultSource, request: &FetchRequest) -> FetchResponse {
    let _context_guard = attach_parent_trace_context(request);

    let ticket = request.ticket();
    let _span = tracing::debug_span!(
        "execute_fetch",
        path = request.path(),
        list = ?ticket.target,
        generation = ticket.generation,
        page = ticket.page
    )
    .entered();

    let response = match request {
        FetchRequest::Events { query, .. } => source
            .events(query)
            .map(|page| FetchResponse::EventsLoaded { ticket, page }),
        FetchRequest::Artists { query, .. } => source
            .artists(query)
            .map(|page| FetchResponse::ArtistsLoaded { ticket, page }),
    };

    response.unwrap_or_else(|error| {
        tracing::warn!(error = %error, "fetch failed");
        FetchResponse::Failed { ticket, error }
    })
}

fn attach_parent_trace_context(request: &FetchRequest) -> Option<opentelemetry::ContextGuard> {
    use opentelemetry::trace::{
        SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState,
    };

    let trace_context = request.trace_context()?;
    let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
    let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

    let span_context = SpanContext::new(
        trace_id,
        span_id,
        TraceFlags::SAMPLED,
        true,
        TraceState::default(),
    );

    Some(
        opentelemetry::Context::current()
            .with_remote_span_context(span_context)
            .attach(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::messages::{FetchTarget, FetchTicket};

    struct Unreachable;

    impl ResultSource for Unreachable {
        fn events(&mut self, _query: &EventQuery) -> Result<EventPage, FetchError> {
            Err(FetchError::Network {
                message: "connection refused".into(),
            })
        }

        fn artists(&mut self, query: &ArtistQuery) -> Result<ArtistPage, FetchError> {
            Ok(ArtistPage {
                page: query.page,
                total_count: 0,
                artist_and_group_list: vec![],
            })
        }
    }

    #[test]
    fn failures_are_wrapped_with_the_request_ticket() {
        let ticket = FetchTicket {
            target: FetchTarget::Events,
            generation: 7,
            page: 1,
        };
        let request = FetchRequest::Events {
            ticket,
            query: EventQuery::from_filter(&crate::domain::FilterState::new(), 1, 20),
            trace_context: None,
        };
        let response = execute(&mut Unreachable, &request);
        assert!(matches!(response, FetchResponse::Failed { ticket: t, .. } if t == ticket));
    }

    #[test]
    fn successes_echo_the_ticket() {
        let ticket = FetchTicket {
            target: FetchTarget::Artists,
            generation: 1,
            page: 2,
        };
        let request = FetchRequest::Artists {
            ticket,
            query: ArtistQuery {
                keyword: String::new(),
                size: 12,
                page: 2,
            },
            trace_context: None,
        };
        let response = execute(&mut Unreachable, &request);
        assert_eq!(response.ticket(), ticket);
        assert!(matches!(response, FetchResponse::ArtistsLoaded { .. }));
    }
}
