//! Shared playback state container
//!
//! [`PlayerStore`] is the one place [`QueueState`] lives. Every mutation runs
//! to completion under the channel lock and then wakes all subscribers, so
//! the UI and the coordinator always observe whole transitions.

use std::sync::Arc;

use cadence_core::types::{PersistedQueue, RepeatMode, Song};
use tokio::sync::watch;

use crate::queue::QueueState;
use crate::types::PreviousOutcome;

/// Cloneable handle to the playback state
#[derive(Debug, Clone)]
pub struct PlayerStore {
    state: Arc<watch::Sender<QueueState>>,
}

impl Default for PlayerStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerStore {
    /// Create a store holding an empty queue
    pub fn new() -> Self {
        Self::with_state(QueueState::new())
    }

    pub fn with_state(state: QueueState) -> Self {
        let (sender, _) = watch::channel(state);
        Self {
            state: Arc::new(sender),
        }
    }

    /// Create a store from persisted state (transport paused)
    pub fn restore(persisted: PersistedQueue) -> Self {
        Self::with_state(QueueState::restore(persisted))
    }

    /// Receiver notified after every mutation
    pub fn subscribe(&self) -> watch::Receiver<QueueState> {
        self.state.subscribe()
    }

    /// Read the current state without cloning it
    pub fn read<R>(&self, f: impl FnOnce(&QueueState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Clone of the current state
    pub fn snapshot(&self) -> QueueState {
        self.state.borrow().clone()
    }

    /// Apply a transition atomically and notify subscribers
    pub fn update<R: Default>(&self, f: impl FnOnce(&mut QueueState) -> R) -> R {
        let mut result = R::default();
        self.state.send_modify(|state| result = f(state));
        result
    }

    pub fn persisted(&self) -> PersistedQueue {
        self.read(QueueState::persisted)
    }

    // ===== Intent surface =====

    pub fn set_queue(&self, songs: Vec<Song>, start_index: usize) {
        self.update(|state| state.set_queue(songs, start_index));
    }

    pub fn add_to_queue(&self, song: Song) {
        self.update(|state| state.add_to_queue(song));
    }

    pub fn play_next(&self, song: Song) {
        self.update(|state| state.play_next(song));
    }

    pub fn remove_from_queue(&self, index: usize) -> Option<Song> {
        self.update(|state| state.remove_from_queue(index))
    }

    pub fn clear_queue(&self) {
        self.update(QueueState::clear_queue);
    }

    pub fn skip_to_next(&self) -> bool {
        self.update(QueueState::skip_to_next)
    }

    pub fn skip_to_previous(&self) -> PreviousOutcome {
        self.update(QueueState::skip_to_previous)
    }

    pub fn skip_to_index(&self, index: usize) -> bool {
        self.update(|state| state.skip_to_index(index))
    }

    pub fn toggle_shuffle(&self) -> bool {
        self.update(QueueState::toggle_shuffle)
    }

    pub fn toggle_repeat(&self) -> RepeatMode {
        self.update(QueueState::toggle_repeat)
    }

    pub fn reorder_queue(&self, from: usize, to: usize) -> bool {
        self.update(|state| state.reorder_queue(from, to))
    }

    pub fn play(&self) {
        self.update(QueueState::play);
    }

    pub fn pause(&self) {
        self.update(QueueState::pause);
    }
}
