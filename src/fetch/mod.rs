//! Fetch boundary: the messages the page exchanges with its result backend.
//!
//! - `messages`: request/response protocol with ticket tagging and trace context
//! - `source`: the [`ResultSource`] trait and [`execute`] helper
//! - `fixture`: in-memory JSON implementation of [`ResultSource`]

pub mod fixture;
pub mod messages;
pub mod source;

pub use fixture::{FixtureData, FixtureSource};
pub use messages::{
    ArtistQuery, EventQuery, FetchRequest, FetchResponse, FetchTarget, FetchTicket, TraceContext,
};
pub use source::{execute, ResultSource};
