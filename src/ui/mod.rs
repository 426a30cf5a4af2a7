//! Presentation layer: display-ready view models and label formatting.
//!
//! ```text
//! AppState → compute_viewmodel → SearchViewModel / ArtistPickerViewModel → host
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types handed to the host for rendering
//! - [`labels`]: Filter button and card label formatting

pub mod labels;
pub mod viewmodel;

pub use viewmodel::{ArtistPickerViewModel, ArtistRow, EventCard, SearchViewModel};
