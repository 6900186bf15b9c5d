//! Core types for playback management

use serde::{Deserialize, Serialize};

/// Coordinator state for the current song
///
/// `Idle` (no current song) → `Loading` → `Ready` (loaded, paused) →
/// `Playing`, back to `Loading` on song change or `Idle` when the queue
/// empties. `Failed` means the song is current but nothing is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPhase {
    #[default]
    Idle,
    Loading,
    Ready,
    Playing,
    Failed,
}

impl std::fmt::Display for PlaybackPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Playing => "playing",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// What the coordinator does after a song fails to load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadFailurePolicy {
    /// Keep the failed song current and stop; the user retries or skips
    #[default]
    Stay,

    /// Advance to the next song, at most once around the queue
    SkipToNext,
}

/// Playback coordinator configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub load_failure_policy: LoadFailurePolicy,
}

/// Where the last known position came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSource {
    /// Reported by the audio engine
    #[default]
    Adapter,

    /// Set locally by a seek, not yet confirmed by the engine
    OptimisticSeek,
}

/// Result of a skip-to-previous request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviousOutcome {
    /// Queue empty, nothing happened
    #[default]
    Unchanged,

    /// Current song restarted from the beginning
    Restarted,

    /// Moved to the previous entry (wrapping at the start)
    Moved,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_to_stay() {
        let config: PlaybackConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.load_failure_policy, LoadFailurePolicy::Stay);

        let config: PlaybackConfig =
            serde_json::from_str(r#"{"load_failure_policy":"skip_to_next"}"#).unwrap();
        assert_eq!(config.load_failure_policy, LoadFailurePolicy::SkipToNext);
    }
}
