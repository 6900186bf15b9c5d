//! Album types

use serde::{Deserialize, Serialize};

/// An album from the remote catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Album {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub artist_id: String,
    pub artwork_url: String,
    pub year: i32,
    pub song_count: u32,
}
