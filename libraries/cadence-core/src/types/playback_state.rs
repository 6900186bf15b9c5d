/// Playback state types shared between the queue store and persistence
use super::Song;
use serde::{Deserialize, Serialize};

/// Repeat mode for playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stop when the queue ends
    #[default]
    Off,
    /// Loop the current song
    One,
    /// Loop the whole queue
    All,
}

impl RepeatMode {
    /// Next mode in the user-facing cycle: off -> one -> all -> off
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Off => Self::One,
            Self::One => Self::All,
            Self::All => Self::Off,
        }
    }

    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::One => "one",
            Self::All => "all",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "off" => Some(Self::Off),
            "one" => Some(Self::One),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

impl std::fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The part of the playback queue that survives an app restart
///
/// Live transport (playing/paused) and position are deliberately absent:
/// audio never resumes on cold start without an explicit user action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedQueue {
    /// Songs in playback order
    pub queue: Vec<Song>,

    /// Index of the current song
    pub current_index: usize,

    /// Whether shuffle was enabled
    pub shuffle: bool,

    /// Repeat mode
    pub repeat: RepeatMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeat_cycles_off_one_all() {
        assert_eq!(RepeatMode::Off.next(), RepeatMode::One);
        assert_eq!(RepeatMode::One.next(), RepeatMode::All);
        assert_eq!(RepeatMode::All.next(), RepeatMode::Off);
    }

    #[test]
    fn repeat_string_round_trip() {
        for mode in [RepeatMode::Off, RepeatMode::One, RepeatMode::All] {
            assert_eq!(RepeatMode::from_str(mode.as_str()), Some(mode));
        }
        assert_eq!(RepeatMode::from_str("sometimes"), None);
    }

    #[test]
    fn persisted_queue_json_has_no_transport_fields() {
        let persisted = PersistedQueue {
            queue: vec![Song::new("1", "One", "A")],
            current_index: 0,
            shuffle: true,
            repeat: RepeatMode::All,
        };
        let json = serde_json::to_value(&persisted).unwrap();
        assert_eq!(json["repeat"], "all");
        assert!(json.get("isPlaying").is_none());
        assert!(json.get("positionMillis").is_none());
    }
}
