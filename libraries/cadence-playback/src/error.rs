//! Error types for playback management

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by an audio output engine
///
/// These are outcomes, not faults: the coordinator turns them into
/// [`PlaybackFailure`]s and keeps running.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum OutputError {
    /// The stream could not be reached (network, DNS, HTTP error)
    #[error("Stream unreachable: {0}")]
    Unreachable(String),

    /// The stream was reached but could not be decoded
    #[error("Decode failed: {0}")]
    Decode(String),

    /// The stream format or URL scheme is not supported
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The device audio session was taken away
    #[error("Audio session revoked: {0}")]
    SessionRevoked(String),

    /// The song has no resolved stream URL
    #[error("Song has no stream URL")]
    MissingStreamUrl,

    /// Any other engine failure
    #[error("Engine error: {0}")]
    Engine(String),
}

/// Engine operation that failed on an already-loaded resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportOperation {
    Play,
    Pause,
    Seek,
    /// Failure reported asynchronously through a status event
    Stream,
}

impl std::fmt::Display for TransportOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Play => "play",
            Self::Pause => "pause",
            Self::Seek => "seek",
            Self::Stream => "stream",
        };
        f.write_str(name)
    }
}

/// User-visible playback failure, kept as the coordinator's last failure
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackFailure {
    /// The engine could not acquire or prepare the song
    #[error("Failed to load {song_id}: {reason}")]
    Load { song_id: String, reason: OutputError },

    /// A transport call failed on a loaded song
    #[error("{operation} failed: {reason}")]
    Transport {
        operation: TransportOperation,
        reason: OutputError,
    },
}

impl PlaybackFailure {
    /// Underlying engine error
    pub fn reason(&self) -> &OutputError {
        match self {
            Self::Load { reason, .. } | Self::Transport { reason, .. } => reason,
        }
    }
}

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The coordinator task is no longer running
    #[error("Playback coordinator is not running")]
    CoordinatorClosed,

    /// Engine error surfaced directly to a caller
    #[error(transparent)]
    Output(#[from] OutputError),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
