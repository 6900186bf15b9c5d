//! Client handle for a running coordinator

use cadence_core::types::{RepeatMode, Song};
use tokio::sync::{broadcast, mpsc, oneshot, watch};

use crate::coordinator::{CommandRequest, PlaybackCommand};
use crate::error::{PlaybackError, PlaybackFailure, Result};
use crate::events::{CoordinatorStatus, PlaybackEvent};
use crate::queue::QueueState;
use crate::store::PlayerStore;
use crate::types::PreviousOutcome;

/// Cloneable intent surface of a spawned [`PlaybackCoordinator`]
///
/// Queue intents mutate the store directly and return immediately; the
/// coordinator reacts to the change. Engine intents are queued to the
/// coordinator task and resolve once it has carried them out.
///
/// [`PlaybackCoordinator`]: crate::PlaybackCoordinator
#[derive(Debug, Clone)]
pub struct PlaybackHandle {
    store: PlayerStore,
    commands: mpsc::Sender<CommandRequest>,
    status: watch::Receiver<CoordinatorStatus>,
    events: broadcast::Sender<PlaybackEvent>,
}

impl PlaybackHandle {
    pub(crate) fn new(
        store: PlayerStore,
        commands: mpsc::Sender<CommandRequest>,
        status: watch::Receiver<CoordinatorStatus>,
        events: broadcast::Sender<PlaybackEvent>,
    ) -> Self {
        Self {
            store,
            commands,
            status,
            events,
        }
    }

    pub fn store(&self) -> &PlayerStore {
        &self.store
    }

    pub fn snapshot(&self) -> QueueState {
        self.store.snapshot()
    }

    pub fn status(&self) -> CoordinatorStatus {
        self.status.borrow().clone()
    }

    pub fn watch_status(&self) -> watch::Receiver<CoordinatorStatus> {
        self.status.clone()
    }

    /// Last load or transport failure, for display
    pub fn last_failure(&self) -> Option<PlaybackFailure> {
        self.status.borrow().last_failure.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    // ===== Engine intents =====

    pub async fn toggle_play_pause(&self) -> Result<()> {
        self.send(PlaybackCommand::TogglePlayPause).await
    }

    pub async fn seek(&self, position_ms: u64) -> Result<()> {
        self.send(PlaybackCommand::Seek(position_ms)).await
    }

    pub async fn retry(&self) -> Result<()> {
        self.send(PlaybackCommand::Retry).await
    }

    /// Wait until the coordinator has applied every earlier change
    pub async fn sync(&self) -> Result<()> {
        self.send(PlaybackCommand::Sync).await
    }

    /// Unload the engine and stop the coordinator task
    pub async fn shutdown(&self) -> Result<()> {
        self.send(PlaybackCommand::Shutdown).await
    }

    async fn send(&self, command: PlaybackCommand) -> Result<()> {
        let (ack, done) = oneshot::channel();
        self.commands
            .send(CommandRequest { command, ack })
            .await
            .map_err(|_| PlaybackError::CoordinatorClosed)?;
        done.await.map_err(|_| PlaybackError::CoordinatorClosed)
    }

    // ===== Queue intents =====

    pub fn set_queue(&self, songs: Vec<Song>, start_index: usize) {
        self.store.set_queue(songs, start_index);
    }

    pub fn add_to_queue(&self, song: Song) {
        self.store.add_to_queue(song);
    }

    pub fn play_next(&self, song: Song) {
        self.store.play_next(song);
    }

    pub fn remove_from_queue(&self, index: usize) -> Option<Song> {
        self.store.remove_from_queue(index)
    }

    pub fn clear_queue(&self) {
        self.store.clear_queue();
    }

    pub fn skip_to_next(&self) -> bool {
        self.store.skip_to_next()
    }

    pub fn skip_to_previous(&self) -> PreviousOutcome {
        self.store.skip_to_previous()
    }

    pub fn skip_to_index(&self, index: usize) -> bool {
        self.store.skip_to_index(index)
    }

    pub fn toggle_shuffle(&self) -> bool {
        self.store.toggle_shuffle()
    }

    pub fn toggle_repeat(&self) -> RepeatMode {
        self.store.toggle_repeat()
    }

    pub fn reorder_queue(&self, from: usize, to: usize) -> bool {
        self.store.reorder_queue(from, to)
    }

    pub fn play(&self) {
        self.store.play();
    }

    pub fn pause(&self) {
        self.store.pause();
    }
}
