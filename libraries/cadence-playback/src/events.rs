//! Playback Events
//!
//! Emitted by the coordinator for UI synchronization:
//! - Phase changes (loading, ready, playing, ...)
//! - Track loaded / finished
//! - End of queue
//! - Failures

use serde::{Deserialize, Serialize};

use crate::error::PlaybackFailure;
use crate::types::PlaybackPhase;

/// Events emitted by the playback coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Coordinator phase changed
    StateChanged {
        /// The new phase
        phase: PlaybackPhase,
    },

    /// A song is resident in the engine and ready to play
    TrackLoaded {
        /// ID of the loaded song
        song_id: String,
    },

    /// Song reached its end naturally
    TrackFinished {
        /// ID of the finished song
        song_id: String,
    },

    /// The last song of a non-repeating queue finished
    QueueEnded,

    /// A load or transport call failed
    Failed {
        /// What went wrong
        failure: PlaybackFailure,
    },
}

/// Snapshot of the coordinator, published on a watch channel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorStatus {
    pub phase: PlaybackPhase,

    /// Song resident in the engine
    pub loaded_song_id: Option<String>,

    /// Target of the load currently in flight
    pub loading_song_id: Option<String>,

    /// Most recent failure, cleared by the next successful load
    pub last_failure: Option<PlaybackFailure>,
}
