//! Playback coordinator
//!
//! Keeps the audio engine consistent with [`QueueState`]. The coordinator is
//! the only caller of [`AudioOutput`] and runs as one task that serializes
//! three inputs: commands from [`PlaybackHandle`]s, engine status reports and
//! store change notifications.
//!
//! Engine calls are never cancelled. A load that resolves after the user has
//! moved on is detected by comparing the target against the store's current
//! `(song id, selection epoch)` and its side effects are dropped.

use std::sync::Arc;

use cadence_core::types::{RepeatMode, Song};
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{OutputError, PlaybackFailure, TransportOperation};
use crate::events::{CoordinatorStatus, PlaybackEvent};
use crate::handle::PlaybackHandle;
use crate::output::{AudioOutput, OutputStatus};
use crate::queue::QueueState;
use crate::store::PlayerStore;
use crate::types::{LoadFailurePolicy, PlaybackConfig, PlaybackPhase};

const COMMAND_CAPACITY: usize = 32;
const EVENT_CAPACITY: usize = 64;

/// Intents that need the audio engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackCommand {
    TogglePlayPause,
    Seek(u64),
    /// Load the current song again and play it
    Retry,
    /// Reconcile and acknowledge; resolves once earlier changes are applied
    Sync,
    Shutdown,
}

#[derive(Debug)]
pub(crate) struct CommandRequest {
    pub(crate) command: PlaybackCommand,
    pub(crate) ack: oneshot::Sender<()>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoadOutcome {
    Ready,
    Failed,
    /// The store moved on while the load was in flight
    Superseded,
}

type Target = Option<(Song, u64)>;

fn target_of(state: &QueueState) -> Target {
    state
        .current_song()
        .map(|song| (song.clone(), state.selection_epoch()))
}

/// Reconciles the audio engine with the playback queue
pub struct PlaybackCoordinator {
    store: PlayerStore,
    output: Arc<dyn AudioOutput>,
    config: PlaybackConfig,
    status: watch::Sender<CoordinatorStatus>,
    events: broadcast::Sender<PlaybackEvent>,

    /// `(song id, epoch)` the engine was last reconciled for
    selected: Option<(String, u64)>,
    /// Whether the engine was last told to play
    engine_playing: bool,
    /// Reports at or below this sequence predate the latest seek
    seek_barrier: u64,
}

impl PlaybackCoordinator {
    pub fn new(store: PlayerStore, output: Arc<dyn AudioOutput>, config: PlaybackConfig) -> Self {
        let (status, _) = watch::channel(CoordinatorStatus::default());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            store,
            output,
            config,
            status,
            events,
            selected: None,
            engine_playing: false,
            seek_barrier: 0,
        }
    }

    pub fn store(&self) -> &PlayerStore {
        &self.store
    }

    pub fn status(&self) -> CoordinatorStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlaybackEvent> {
        self.events.subscribe()
    }

    /// Start the coordinator task
    ///
    /// The task ends on [`PlaybackCommand::Shutdown`] or once every handle is
    /// dropped, unloading the engine either way.
    pub fn spawn(
        self,
        statuses: mpsc::UnboundedReceiver<OutputStatus>,
    ) -> (PlaybackHandle, JoinHandle<()>) {
        let (commands, receiver) = mpsc::channel(COMMAND_CAPACITY);
        let handle = PlaybackHandle::new(
            self.store.clone(),
            commands,
            self.status.subscribe(),
            self.events.clone(),
        );
        let task = tokio::spawn(self.run(receiver, statuses));
        (handle, task)
    }

    pub(crate) async fn run(
        mut self,
        mut commands: mpsc::Receiver<CommandRequest>,
        mut statuses: mpsc::UnboundedReceiver<OutputStatus>,
    ) {
        let mut changes = self.store.subscribe();
        let mut statuses_open = true;

        info!("Playback coordinator started");
        self.reconcile().await;

        loop {
            tokio::select! {
                biased;

                changed = changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    self.reconcile().await;
                }

                status = statuses.recv(), if statuses_open => match status {
                    Some(status) => self.handle_status(status).await,
                    None => {
                        warn!("Audio output status stream closed");
                        statuses_open = false;
                    }
                },

                request = commands.recv() => {
                    let Some(CommandRequest { command, ack }) = request else {
                        debug!("All playback handles dropped");
                        break;
                    };
                    self.execute(command).await;
                    let _ = ack.send(());
                    if command == PlaybackCommand::Shutdown {
                        info!("Playback coordinator stopped");
                        return;
                    }
                }
            }
        }

        self.shutdown().await;
        info!("Playback coordinator stopped");
    }

    pub async fn execute(&mut self, command: PlaybackCommand) {
        debug!(?command, "Executing command");
        match command {
            PlaybackCommand::TogglePlayPause => self.toggle_play_pause().await,
            PlaybackCommand::Seek(position_ms) => self.seek(position_ms).await,
            PlaybackCommand::Retry => self.retry().await,
            PlaybackCommand::Sync => self.reconcile().await,
            PlaybackCommand::Shutdown => self.shutdown().await,
        }
    }

    // ===== Reconciliation =====

    /// Drive the engine towards the store until both agree
    pub async fn reconcile(&mut self) {
        let mut skip_budget = match self.config.load_failure_policy {
            LoadFailurePolicy::Stay => 0,
            LoadFailurePolicy::SkipToNext => self.store.read(QueueState::len),
        };

        loop {
            let (target, wants_playing) =
                self.store.read(|state| (target_of(state), state.is_playing()));
            let key = target
                .as_ref()
                .map(|(song, epoch)| (song.id.clone(), *epoch));

            if key != self.selected {
                self.selected = key;
                let Some((song, epoch)) = target else {
                    self.release().await;
                    continue;
                };

                if self.select(&song, epoch).await == LoadOutcome::Failed {
                    if skip_budget > 0 {
                        skip_budget -= 1;
                        if self.store.skip_to_next() {
                            info!(song_id = %song.id, "Skipping unplayable song");
                            continue;
                        }
                    }
                    self.store.pause();
                }
                continue;
            }

            if wants_playing != self.engine_playing {
                self.apply_transport(target, wants_playing).await;
                continue;
            }

            break;
        }
    }

    /// Bring a newly selected song into the engine at position zero
    async fn select(&mut self, song: &Song, epoch: u64) -> LoadOutcome {
        if self.output_holds(&song.id) {
            debug!(song_id = %song.id, "Restarting loaded song");
            self.seek_engine(0).await;
            return LoadOutcome::Ready;
        }
        self.load(song, epoch).await
    }

    async fn apply_transport(&mut self, target: Target, wants_playing: bool) {
        if !wants_playing {
            self.stop_engine().await;
            return;
        }

        let Some((song, epoch)) = target else {
            self.store.pause();
            return;
        };

        if !self.output_holds(&song.id) {
            debug!(song_id = %song.id, "Engine lost the current song, reloading");
            match self.load(&song, epoch).await {
                LoadOutcome::Ready => {}
                LoadOutcome::Superseded => return,
                LoadOutcome::Failed => {
                    self.store.pause();
                    return;
                }
            }
        }

        self.start_engine().await;
    }

    // ===== Intents =====

    /// Invert the physical transport and reflect it into the store
    ///
    /// No-op without a current song or when the song has no stream URL.
    pub async fn toggle_play_pause(&mut self) {
        let Some((song, epoch)) = self.store.read(target_of) else {
            debug!("Toggle ignored: queue is empty");
            return;
        };
        if !song.is_playable() {
            debug!(song_id = %song.id, "Toggle ignored: song has no stream URL");
            return;
        }

        if !self.output_holds(&song.id) {
            if self.load(&song, epoch).await != LoadOutcome::Ready {
                return;
            }
            self.selected = Some((song.id.clone(), epoch));
        }

        if self.engine_playing {
            self.stop_engine().await;
            self.store.pause();
        } else {
            self.start_engine().await;
            if self.engine_playing {
                self.store.play();
            }
        }
    }

    /// Seek the engine, then move the stored position optimistically
    pub async fn seek(&mut self, position_ms: u64) {
        if self.store.read(QueueState::is_empty) {
            debug!(position_ms, "Seek ignored: queue is empty");
            return;
        }
        self.seek_engine(position_ms).await;
        self.store.update(|state| state.seek_to(position_ms));
    }

    /// Try the current song again and play it
    pub async fn retry(&mut self) {
        let Some((song, _)) = self.store.read(target_of) else {
            debug!("Retry ignored: queue is empty");
            return;
        };
        info!(song_id = %song.id, "Retrying playback");
        if !self.output_holds(&song.id) {
            self.selected = None;
        }
        self.store.play();
        self.reconcile().await;
    }

    /// Release the engine
    pub async fn shutdown(&mut self) {
        debug!("Releasing audio output");
        self.release().await;
    }

    // ===== Engine status =====

    /// Apply a status report from the engine
    pub async fn handle_status(&mut self, status: OutputStatus) {
        let is_current = self.store.read(|state| {
            state
                .current_song()
                .is_some_and(|song| song.id == status.song_id)
        });
        if !is_current {
            debug!(
                song_id = %status.song_id,
                sequence = status.sequence,
                "Discarding stale status"
            );
            return;
        }

        if let Some(reason) = status.error {
            self.engine_playing = false;
            self.transport_failure(TransportOperation::Stream, reason);
            return;
        }

        // The seek barrier only guards position; completion always counts
        let fresh = status.sequence > self.seek_barrier;
        let position = fresh.then_some(status.position_ms);
        self.store
            .update(|state| state.record_progress(position, status.duration_ms));

        if status.did_finish {
            self.finish(status.song_id).await;
        }
    }

    async fn finish(&mut self, song_id: String) {
        info!(song_id = %song_id, "Song finished");
        self.engine_playing = false;
        self.emit(PlaybackEvent::TrackFinished { song_id });

        if self.store.read(QueueState::repeat) == RepeatMode::One {
            self.seek_engine(0).await;
            self.store.update(|state| state.seek_to(0));
        } else if !self.store.skip_to_next() {
            info!("Reached end of queue");
            self.store.pause();
            self.set_phase(PlaybackPhase::Ready);
            self.emit(PlaybackEvent::QueueEnded);
        }

        self.reconcile().await;
    }

    // ===== Engine calls =====

    async fn load(&mut self, song: &Song, epoch: u64) -> LoadOutcome {
        let Some(url) = song
            .stream_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
        else {
            self.output.unload().await;
            self.engine_playing = false;
            self.publish(|status| {
                status.loaded_song_id = None;
                status.loading_song_id = None;
            });
            self.fail_load(&song.id, OutputError::MissingStreamUrl);
            return LoadOutcome::Failed;
        };

        debug!(song_id = %song.id, "Loading song");
        self.publish(|status| {
            status.loading_song_id = Some(song.id.clone());
            status.loaded_song_id = None;
        });
        self.set_phase(PlaybackPhase::Loading);

        let result = self.output.load(url, &song.id).await;
        self.engine_playing = false;

        let loaded = self.output.loaded_song_id();
        self.publish(|status| {
            status.loading_song_id = None;
            status.loaded_song_id = loaded;
        });

        if !self.is_current(&song.id, epoch) {
            debug!(song_id = %song.id, "Discarding stale load completion");
            return LoadOutcome::Superseded;
        }

        match result {
            Ok(()) => {
                info!(song_id = %song.id, "Song loaded");
                self.publish(|status| status.last_failure = None);
                self.set_phase(PlaybackPhase::Ready);
                self.emit(PlaybackEvent::TrackLoaded {
                    song_id: song.id.clone(),
                });
                LoadOutcome::Ready
            }
            Err(reason) => {
                self.fail_load(&song.id, reason);
                LoadOutcome::Failed
            }
        }
    }

    async fn start_engine(&mut self) {
        match self.output.play().await {
            Ok(()) => {
                self.engine_playing = true;
                self.set_phase(PlaybackPhase::Playing);
            }
            Err(reason) => {
                self.engine_playing = false;
                self.transport_failure(TransportOperation::Play, reason);
            }
        }
    }

    async fn stop_engine(&mut self) {
        let result = self.output.pause().await;
        self.engine_playing = false;
        match result {
            Ok(()) => {
                if self.output.loaded_song_id().is_some() {
                    self.set_phase(PlaybackPhase::Ready);
                }
            }
            Err(reason) => self.transport_failure(TransportOperation::Pause, reason),
        }
    }

    async fn seek_engine(&mut self, position_ms: u64) {
        match self.output.seek(position_ms).await {
            Ok(()) => self.seek_barrier = self.output.last_status_sequence(),
            Err(reason) => self.transport_failure(TransportOperation::Seek, reason),
        }
    }

    async fn release(&mut self) {
        self.output.unload().await;
        self.engine_playing = false;
        self.publish(|status| {
            status.loaded_song_id = None;
            status.loading_song_id = None;
        });
        self.set_phase(PlaybackPhase::Idle);
    }

    // ===== Failures =====

    fn fail_load(&mut self, song_id: &str, reason: OutputError) {
        warn!(song_id, %reason, "Failed to load song");
        let failure = PlaybackFailure::Load {
            song_id: song_id.to_string(),
            reason,
        };
        self.record_failure(failure);
        self.set_phase(PlaybackPhase::Failed);
    }

    fn transport_failure(&mut self, operation: TransportOperation, reason: OutputError) {
        warn!(%operation, %reason, "Transport call failed");
        self.record_failure(PlaybackFailure::Transport { operation, reason });
        if self.output.loaded_song_id().is_some() {
            self.set_phase(PlaybackPhase::Ready);
        }
        self.store.pause();
    }

    fn record_failure(&self, failure: PlaybackFailure) {
        self.publish(|status| status.last_failure = Some(failure.clone()));
        self.emit(PlaybackEvent::Failed { failure });
    }

    // ===== Helpers =====

    fn output_holds(&self, song_id: &str) -> bool {
        self.output.loaded_song_id().as_deref() == Some(song_id)
    }

    fn is_current(&self, song_id: &str, epoch: u64) -> bool {
        self.store.read(|state| {
            state.selection_epoch() == epoch
                && state.current_song().is_some_and(|song| song.id == song_id)
        })
    }

    fn publish(&self, f: impl FnOnce(&mut CoordinatorStatus)) {
        self.status.send_if_modified(|status| {
            let before = status.clone();
            f(status);
            *status != before
        });
    }

    fn set_phase(&self, phase: PlaybackPhase) {
        let changed = self.status.send_if_modified(|status| {
            if status.phase == phase {
                false
            } else {
                status.phase = phase;
                true
            }
        });
        if changed {
            debug!(%phase, "Phase changed");
            self.emit(PlaybackEvent::StateChanged { phase });
        }
    }

    fn emit(&self, event: PlaybackEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}
