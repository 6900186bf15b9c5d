mod album;
mod artist;
mod ids;
mod playback_state;
mod playlist;
mod song;
mod theme;

pub use album::Album;
pub use artist::Artist;
pub use ids::PlaylistId;
pub use playback_state::{PersistedQueue, RepeatMode};
pub use playlist::Playlist;
pub use song::Song;
pub use theme::{ThemeMode, ThemeSettings};
