/// Playlist domain types
use super::{PlaylistId, Song};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Playlist name
    pub name: String,

    /// Optional description
    pub description: Option<String>,

    /// Optional cover image URL
    pub artwork_url: Option<String>,

    /// Songs in playback order (unique by id)
    pub songs: Vec<Song>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Playlist {
    /// Create a new empty playlist
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: PlaylistId::generate(),
            name: name.into(),
            description,
            artwork_url: None,
            songs: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Total nominal length of the playlist in seconds
    pub fn total_duration_secs(&self) -> u64 {
        self.songs.iter().map(|s| u64::from(s.duration_secs)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_playlist_is_empty() {
        let playlist = Playlist::new("Focus", Some("deep work".to_string()));
        assert!(playlist.songs.is_empty());
        assert_eq!(playlist.created_at, playlist.updated_at);
        assert_eq!(playlist.description.as_deref(), Some("deep work"));
    }

    #[test]
    fn total_duration_sums_songs() {
        let mut playlist = Playlist::new("Mix", None);
        playlist.songs.push(Song::new("1", "A", "X").with_duration_secs(120));
        playlist.songs.push(Song::new("2", "B", "Y").with_duration_secs(61));
        assert_eq!(playlist.total_duration_secs(), 181);
    }
}
