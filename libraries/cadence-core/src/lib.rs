//! Cadence Core
//!
//! Platform-agnostic domain types and error handling for Cadence.
//!
//! Every other crate in the workspace speaks in these types:
//! - **Catalog types**: `Song`, `Artist`, `Album` as mapped from the remote catalog
//! - **Library types**: `Playlist`, `ThemeSettings`
//! - **Playback types**: `RepeatMode`, `PersistedQueue`
//! - **Error Handling**: Unified `CadenceError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cadence_core::types::{Playlist, Song};
//!
//! let song = Song::new("s1", "Intro", "Artist").with_stream_url("https://cdn.example.com/s1.mp4");
//! let mut playlist = Playlist::new("Road trip", None);
//! playlist.songs.push(song);
//! assert_eq!(playlist.songs.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod types;

pub use error::{CadenceError, Result};

pub use types::{
    Album, Artist, PersistedQueue, Playlist, PlaylistId, RepeatMode, Song, ThemeMode,
    ThemeSettings,
};
