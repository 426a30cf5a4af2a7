//! Pagination: per-identity page cache and the scroll trigger that drives it.

pub mod controller;
pub mod scroll;

pub use controller::{ApplyOutcome, FetchPhase, PageState, Paged, PaginatedFetchController};
pub use scroll::InfiniteScrollTrigger;
