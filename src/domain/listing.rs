//! Result items and page payloads returned by the search endpoints.

use serde::{Deserialize, Serialize};

/// One event in the search result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: String,
    pub place_name: String,
    #[serde(default)]
    pub artists: Vec<String>,
    #[serde(default)]
    pub event_type: String,
    /// `YYYY-MM-DD`.
    pub start_date: String,
    /// `YYYY-MM-DD`.
    pub end_date: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub event_images: Vec<String>,
    /// Tag labels as the server returns them.
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub like_count: u32,
}

/// One artist or group in the artist picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Response body of `GET /event`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPage {
    pub page: u32,
    pub total_count: u64,
    pub event_list: Vec<EventSummary>,
}

/// Response body of `GET /artist/group`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtistPage {
    pub page: u32,
    pub total_count: u64,
    pub artist_and_group_list: Vec<ArtistSummary>,
}
