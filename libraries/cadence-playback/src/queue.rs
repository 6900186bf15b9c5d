//! Playback queue state
//!
//! [`QueueState`] is the single source of truth for "what is current" and
//! "what comes next". Every transition is synchronous, atomic and
//! re-establishes the invariants before returning:
//!
//! - an empty queue has `current_index == 0` and is never playing
//! - a non-empty queue has `current_index < len`
//! - `position_ms <= duration_ms` whenever the duration is known
//!
//! Out-of-range requests are no-ops, never panics.

use cadence_core::types::{PersistedQueue, RepeatMode, Song};
use rand::Rng;

use crate::types::{PositionSource, PreviousOutcome};

/// Past this position, "previous" restarts the current song instead of moving
pub const RESTART_THRESHOLD_MS: u64 = 3000;

/// Authoritative playback queue state
#[derive(Debug, Clone, Default)]
pub struct QueueState {
    queue: Vec<Song>,
    current_index: usize,
    is_playing: bool,
    position_ms: u64,
    duration_ms: u64,
    shuffle: bool,
    repeat: RepeatMode,

    /// Bumped whenever the current entry is (re)selected
    selection_epoch: u64,
    position_source: PositionSource,
}

impl QueueState {
    /// Create an empty, paused queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild state from its persisted part
    ///
    /// Transport always starts paused and position starts at zero.
    pub fn restore(persisted: PersistedQueue) -> Self {
        let mut state = Self {
            queue: persisted.queue,
            current_index: persisted.current_index,
            shuffle: persisted.shuffle,
            repeat: persisted.repeat,
            ..Self::default()
        };
        state.normalize();
        state
    }

    /// The part of the state that survives a restart
    pub fn persisted(&self) -> PersistedQueue {
        PersistedQueue {
            queue: self.queue.clone(),
            current_index: self.current_index,
            shuffle: self.shuffle,
            repeat: self.repeat,
        }
    }

    // ===== Accessors =====

    pub fn queue(&self) -> &[Song] {
        &self.queue
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// `queue[current_index]`, or `None` when the queue is empty
    pub fn current_song(&self) -> Option<&Song> {
        self.queue.get(self.current_index)
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn position_ms(&self) -> u64 {
        self.position_ms
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn position_source(&self) -> PositionSource {
        self.position_source
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn repeat(&self) -> RepeatMode {
        self.repeat
    }

    /// Counter identifying the current selection
    ///
    /// Two reads with the same current song id but different epochs mean the
    /// song was selected again and playback should restart.
    pub fn selection_epoch(&self) -> u64 {
        self.selection_epoch
    }

    // ===== Queue editing =====

    /// Replace the queue and select `start_index` (clamped)
    ///
    /// Transport intent is left as is.
    pub fn set_queue(&mut self, songs: Vec<Song>, start_index: usize) {
        self.queue = songs;
        let index = start_index.min(self.queue.len().saturating_sub(1));
        self.select(index);
        self.normalize();
    }

    /// Append a song
    pub fn add_to_queue(&mut self, song: Song) {
        self.queue.push(song);
    }

    /// Insert a song right after the current one
    pub fn play_next(&mut self, song: Song) {
        let at = if self.queue.is_empty() {
            0
        } else {
            (self.current_index + 1).min(self.queue.len())
        };
        self.queue.insert(at, song);
    }

    /// Remove the entry at `index`
    ///
    /// Removing the current entry selects whatever now occupies its slot,
    /// or the new last entry when the removed one was last.
    pub fn remove_from_queue(&mut self, index: usize) -> Option<Song> {
        if index >= self.queue.len() {
            return None;
        }

        let removed = self.queue.remove(index);

        if index < self.current_index {
            self.current_index -= 1;
        } else if index == self.current_index {
            let next = self.current_index.min(self.queue.len().saturating_sub(1));
            self.select(next);
        }

        self.normalize();
        Some(removed)
    }

    /// Empty the queue and stop
    pub fn clear_queue(&mut self) {
        self.queue.clear();
        self.select(0);
        self.normalize();
    }

    /// Move the entry at `from` to `to`, keeping the current song current
    ///
    /// Returns `false` when either index is out of range or nothing moved.
    pub fn reorder_queue(&mut self, from: usize, to: usize) -> bool {
        let len = self.queue.len();
        if from >= len || to >= len || from == to {
            return false;
        }

        let song = self.queue.remove(from);
        self.queue.insert(to, song);

        let current = self.current_index;
        if from == current {
            self.current_index = to;
        } else if from < current && to >= current {
            self.current_index = current - 1;
        } else if from > current && to <= current {
            self.current_index = current + 1;
        }

        true
    }

    // ===== Navigation =====

    /// Advance to the next song using the thread-local RNG for shuffle
    pub fn skip_to_next(&mut self) -> bool {
        self.skip_to_next_with(&mut rand::thread_rng())
    }

    /// Advance to the next song
    ///
    /// Shuffle picks a uniformly random index, which may be the current one.
    /// At the end of a non-repeating queue nothing changes and `false` is
    /// returned; transport intent is the caller's decision.
    pub fn skip_to_next_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let len = self.queue.len();
        if len == 0 {
            return false;
        }

        let next = if self.shuffle {
            rng.gen_range(0..len)
        } else if self.current_index + 1 < len {
            self.current_index + 1
        } else if self.repeat == RepeatMode::All {
            0
        } else {
            return false;
        };

        self.select(next);
        true
    }

    /// Restart the current song, or move to the previous one
    ///
    /// Restarts when playback is past [`RESTART_THRESHOLD_MS`]; otherwise
    /// moves back one entry, wrapping to the last at the start.
    pub fn skip_to_previous(&mut self) -> PreviousOutcome {
        let len = self.queue.len();
        if len == 0 {
            return PreviousOutcome::Unchanged;
        }

        if self.position_ms > RESTART_THRESHOLD_MS {
            self.selection_epoch += 1;
            self.position_ms = 0;
            self.position_source = PositionSource::OptimisticSeek;
            return PreviousOutcome::Restarted;
        }

        let previous = if self.current_index == 0 {
            len - 1
        } else {
            self.current_index - 1
        };
        self.select(previous);
        PreviousOutcome::Moved
    }

    /// Jump to `index` if it is in range
    pub fn skip_to_index(&mut self, index: usize) -> bool {
        if index >= self.queue.len() {
            return false;
        }
        self.select(index);
        true
    }

    // ===== Modes =====

    /// Flip shuffle, returning the new value
    pub fn toggle_shuffle(&mut self) -> bool {
        self.shuffle = !self.shuffle;
        self.shuffle
    }

    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.shuffle = shuffle;
    }

    /// Cycle repeat off → one → all → off, returning the new mode
    pub fn toggle_repeat(&mut self) -> RepeatMode {
        self.repeat = self.repeat.next();
        self.repeat
    }

    pub fn set_repeat(&mut self, repeat: RepeatMode) {
        self.repeat = repeat;
    }

    // ===== Transport intent =====

    /// Set the transport intent; an empty queue never plays
    pub fn set_playing(&mut self, playing: bool) {
        self.is_playing = playing && !self.queue.is_empty();
    }

    pub fn play(&mut self) {
        self.set_playing(true);
    }

    pub fn pause(&mut self) {
        self.set_playing(false);
    }

    /// Optimistically move the position after a seek
    ///
    /// Returns `false` (no-op) when there is no current song.
    pub fn seek_to(&mut self, position_ms: u64) -> bool {
        if self.queue.is_empty() {
            return false;
        }
        self.position_ms = self.clamp_position(position_ms);
        self.position_source = PositionSource::OptimisticSeek;
        true
    }

    /// Apply progress reported by the audio engine
    ///
    /// `position_ms` is `None` when the report predates a local seek; only
    /// the duration is taken from it then.
    pub fn record_progress(&mut self, position_ms: Option<u64>, duration_ms: u64) {
        self.duration_ms = duration_ms;
        if let Some(position) = position_ms {
            self.position_ms = position;
            self.position_source = PositionSource::Adapter;
        }
        self.position_ms = self.clamp_position(self.position_ms);
    }

    // ===== Internals =====

    fn select(&mut self, index: usize) {
        self.current_index = index;
        self.selection_epoch += 1;
        self.position_ms = 0;
        self.duration_ms = 0;
        self.position_source = PositionSource::Adapter;
    }

    fn clamp_position(&self, position_ms: u64) -> u64 {
        if self.duration_ms > 0 {
            position_ms.min(self.duration_ms)
        } else {
            position_ms
        }
    }

    fn normalize(&mut self) {
        if self.queue.is_empty() {
            self.current_index = 0;
            self.is_playing = false;
        } else if self.current_index >= self.queue.len() {
            self.current_index = self.queue.len() - 1;
        }
    }
}
