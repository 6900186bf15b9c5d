//! Audio output abstraction
//!
//! The device engine sits behind [`AudioOutput`]. Implementations own the
//! physical resource only: they never decide what should be playing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::OutputError;

/// Outcome of an engine call
pub type OutputResult = std::result::Result<(), OutputError>;

/// Asynchronous status report from the engine
///
/// Emitted at least every status interval while a song is loaded, paused
/// or playing, after transport changes, and once on completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputStatus {
    /// Song the engine had loaded when the report was produced
    pub song_id: String,

    /// Monotonically increasing per engine
    pub sequence: u64,

    pub position_ms: u64,
    pub duration_ms: u64,
    pub did_finish: bool,
    pub error: Option<OutputError>,
}

/// Audio engine the coordinator drives
///
/// All calls may suspend. Failures come back as values, never panics.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AudioOutput: Send + Sync {
    /// Load a song paused, replacing whatever was loaded
    ///
    /// A no-op returning `Ok` when `song_id` is already loaded.
    async fn load(&self, url: &str, song_id: &str) -> OutputResult;

    /// Start playback; no-op when nothing is loaded
    async fn play(&self) -> OutputResult;

    /// Pause playback; no-op when nothing is loaded
    async fn pause(&self) -> OutputResult;

    /// Seek, clamped to `[0, duration]`; no-op when nothing is loaded
    async fn seek(&self, position_ms: u64) -> OutputResult;

    /// Release the loaded resource, if any
    async fn unload(&self);

    /// Id of the song physically loaded right now
    fn loaded_song_id(&self) -> Option<String>;

    /// Sequence number of the most recent status report
    fn last_status_sequence(&self) -> u64;
}
