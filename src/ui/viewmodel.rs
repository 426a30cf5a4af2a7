//! View model types representing renderable UI state.
//!
//! View models are computed on demand from application state
//! (`SearchPage::compute_viewmodel`, `ArtistSearch::compute_viewmodel`) and
//! contain only display-ready data. They serialize to JSON so a browser host
//! can render them directly.

use crate::app::SelectedArtist;
use crate::domain::{EventSummary, Sort};
use serde::Serialize;

/// Everything the event search page renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchViewModel {
    /// Current search input.
    pub keyword: String,

    /// Active sort button.
    pub sort: Sort,

    /// Big-region button text (`시/도` when unset).
    pub region_label: String,
    pub region_selected: bool,

    /// Sub-region button text; `None` hides the button.
    pub sub_region_label: Option<String>,

    /// Date button text (`기간` when unset).
    pub date_label: String,
    pub date_selected: bool,

    /// Gift button text (`특전` when unset).
    pub gift_label: String,
    pub gift_selected: bool,

    /// Loaded result cards in server order.
    pub cards: Vec<EventCard>,

    /// Total reported by the last successful fetch.
    pub total_count: u64,

    /// Whether more pages exist beyond the loaded ones.
    pub has_more: bool,

    /// Whether a page request is in flight.
    pub is_loading: bool,

    /// Message of the last failed fetch, cleared by the next success.
    pub error: Option<String>,
}

/// One horizontal event card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventCard {
    pub id: String,
    pub place_name: String,
    pub artists: String,
    pub event_type: String,
    pub date_label: String,
    pub address: String,
    /// First event image, used as the thumbnail.
    pub thumbnail: Option<String>,
    pub tags: Vec<String>,
}

impl EventCard {
    /// Formats a result item for display.
    #[must_use]
    pub fn from_summary(event: &EventSummary) -> Self {
        Self {
            id: event.id.clone(),
            place_name: event.place_name.clone(),
            artists: event.artists.join(", "),
            event_type: event.event_type.clone(),
            date_label: super::labels::event_date_label(&event.start_date, &event.end_date),
            address: super::labels::short_address(&event.address),
            thumbnail: event.event_images.first().cloned(),
            tags: event.tags.clone(),
        }
    }
}

/// Everything the artist picker renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistPickerViewModel {
    pub keyword: String,
    pub artists: Vec<ArtistRow>,
    /// Selected chips in selection order.
    pub selected: Vec<SelectedArtist>,
    pub has_more: bool,
    pub is_loading: bool,
    pub error: Option<String>,
}

/// One artist in the picker grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistRow {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub selected: bool,
}
