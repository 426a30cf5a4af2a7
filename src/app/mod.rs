//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the host (browser bridge, test harness or the
//! bundled binary) and the domain/codec/paging layers. It implements the sync
//! coordinator that binds the filter state, the URL and the paginated result
//! list together.
//!
//! # Architecture
//!
//! The application layer follows a unidirectional data flow pattern:
//!
//! ```text
//! Host Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └──────── Fetch Completions ───────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: History write mode
//! - [`state`]: Search page coordinator, view model computation
//! - [`artist`]: Artist picker with chip selection

pub mod actions;
pub mod artist;
pub mod handler;
pub mod modes;
pub mod state;

pub use actions::Action;
pub use artist::{ArtistSearch, SelectedArtist};
pub use handler::{handle_event, Event};
pub use modes::HistoryMode;
pub use state::{AppState, SearchPage};
