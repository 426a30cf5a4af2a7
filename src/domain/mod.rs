//! Domain layer: filter inputs, lookup tables, result items and errors.
//!
//! Nothing here knows about URLs, fetch scheduling or the host; those concerns
//! live in [`crate::codec`], [`crate::paging`] and [`crate::app`].
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`filter`]: Keyword/sort/region/date/tag state with its mutators
//! - [`region`]: Two-level region table and filter
//! - [`tag`]: Gift tag identifiers with label/code mapping
//! - [`listing`]: Event and artist result items and page payloads
//!
//! # Examples
//!
//! ```
//! use eventsync::domain::{BigRegion, FilterState, SubRegion};
//!
//! let mut filter = FilterState::new();
//! filter.set_big_region(Some(BigRegion::Seoul));
//! assert_eq!(filter.region().small(), Some(&SubRegion::All));
//! ```

pub mod error;
pub mod filter;
pub mod listing;
pub mod region;
pub mod tag;

pub use error::{EventSyncError, FetchError, Result};
pub use filter::{DateRange, FilterState, Sort};
pub use listing::{ArtistPage, ArtistSummary, EventPage, EventSummary};
pub use region::{BigRegion, RegionFilter, SubRegion, ALL_SUB_REGIONS};
pub use tag::TagId;
