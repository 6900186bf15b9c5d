//! Artist types

use serde::{Deserialize, Serialize};

/// An artist from the remote catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artist {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub album_count: u32,
    pub song_count: u32,
    /// Total playing time in seconds, when known
    pub total_duration_secs: Option<u64>,
}
