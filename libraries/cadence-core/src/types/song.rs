//! Song type

use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A playable song as mapped from the remote catalog
///
/// Songs are immutable values. Two songs are equal when their catalog ids
/// match, regardless of the rest of the metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    /// Catalog-unique identifier
    pub id: String,

    /// Song title
    pub title: String,

    /// Display artist (may list several names)
    pub artist: String,

    /// Album title
    #[serde(default)]
    pub album: String,

    /// Album identifier
    #[serde(default)]
    pub album_id: String,

    /// Primary artist identifier
    #[serde(default)]
    pub artist_id: String,

    /// Nominal track length, independent of live playback
    #[serde(default)]
    pub duration_secs: u32,

    /// Cover image URL
    #[serde(default)]
    pub artwork_url: String,

    /// Stream URL, absent until resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,
}

impl Song {
    /// Create a song with minimal metadata
    pub fn new(id: impl Into<String>, title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            album: String::new(),
            album_id: String::new(),
            artist_id: String::new(),
            duration_secs: 0,
            artwork_url: String::new(),
            stream_url: None,
        }
    }

    /// Attach a resolved stream URL
    #[must_use]
    pub fn with_stream_url(mut self, url: impl Into<String>) -> Self {
        self.stream_url = Some(url.into());
        self
    }

    /// Set the nominal duration
    #[must_use]
    pub fn with_duration_secs(mut self, secs: u32) -> Self {
        self.duration_secs = secs;
        self
    }

    /// Whether the song can be handed to an audio engine
    pub fn is_playable(&self) -> bool {
        self.stream_url.as_deref().is_some_and(|url| !url.is_empty())
    }
}

impl PartialEq for Song {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Song {}

impl Hash for Song {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_is_by_id() {
        let a = Song::new("1", "One", "Artist");
        let mut b = Song::new("1", "Other title", "Someone else");
        b.duration_secs = 200;

        assert_eq!(a, b);
        assert_ne!(a, Song::new("2", "One", "Artist"));
    }

    #[test]
    fn empty_stream_url_is_not_playable() {
        assert!(!Song::new("1", "One", "A").is_playable());
        assert!(!Song::new("1", "One", "A").with_stream_url("").is_playable());
        assert!(Song::new("1", "One", "A")
            .with_stream_url("https://cdn/1.mp4")
            .is_playable());
    }

    #[test]
    fn serializes_camel_case_and_skips_missing_url() {
        let json = serde_json::to_value(Song::new("1", "One", "A")).unwrap();
        assert!(json.get("albumId").is_some());
        assert!(json.get("durationSecs").is_some());
        assert!(json.get("streamUrl").is_none());
    }
}
