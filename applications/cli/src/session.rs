//! Headless playback session
//!
//! Wires a [`PlayerStore`] to the simulated engine through a
//! [`PlaybackCoordinator`], logs what happens, and saves the queue when the
//! session ends.

use std::sync::Arc;
use std::time::Duration;

use cadence_playback::{
    PlaybackCoordinator, PlaybackEvent, PlaybackHandle, PlayerStore, SimulatedOutput,
};
use sqlx::SqlitePool;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::config::AppConfig;

const PROGRESS_INTERVAL: Duration = Duration::from_secs(5);

/// Why a session stopped running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    QueueEnded,
    TimeLimit,
    Interrupted,
    CoordinatorStopped,
}

pub struct PlaybackSession {
    handle: PlaybackHandle,
    task: JoinHandle<()>,
}

impl PlaybackSession {
    /// Start the coordinator over `store`
    ///
    /// Songs already queued play for their catalog duration on the simulated
    /// engine.
    pub fn start(store: PlayerStore, config: &AppConfig) -> Self {
        let (output, statuses) = SimulatedOutput::new(config.engine.clone());
        for song in store.read(|s| s.queue().to_vec()) {
            if song.duration_secs > 0 {
                output.set_duration(song.id, u64::from(song.duration_secs) * 1000);
            }
        }

        let coordinator =
            PlaybackCoordinator::new(store, Arc::new(output), config.playback.clone());
        let (handle, task) = coordinator.spawn(statuses);

        Self { handle, task }
    }

    pub fn handle(&self) -> &PlaybackHandle {
        &self.handle
    }

    /// Log playback until the queue ends, `limit` elapses or Ctrl-C
    pub async fn run(&self, limit: Option<Duration>) -> StopReason {
        let mut events = self.handle.subscribe();
        let mut progress = tokio::time::interval(PROGRESS_INTERVAL);

        let deadline = async {
            match limit {
                Some(limit) => tokio::time::sleep(limit).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(deadline);

        let interrupt = tokio::signal::ctrl_c();
        tokio::pin!(interrupt);

        loop {
            tokio::select! {
                _ = &mut interrupt => return StopReason::Interrupted,
                () = &mut deadline => return StopReason::TimeLimit,
                event = events.recv() => match event {
                    Ok(PlaybackEvent::QueueEnded) => return StopReason::QueueEnded,
                    Ok(event) => self.log_event(&event),
                    Err(RecvError::Lagged(skipped)) => warn!(skipped, "Missed playback events"),
                    Err(RecvError::Closed) => return StopReason::CoordinatorStopped,
                },
                _ = progress.tick() => self.log_progress(),
            }
        }
    }

    /// Save the queue and stop the coordinator
    pub async fn finish(self, pool: &SqlitePool) -> anyhow::Result<()> {
        let persisted = self.handle.store().persisted();
        cadence_storage::playback_state::save(pool, &persisted).await?;
        info!(songs = persisted.queue.len(), "Queue saved");

        if let Err(e) = self.handle.shutdown().await {
            warn!(error = %e, "Coordinator already stopped");
        }
        self.task.await?;
        Ok(())
    }

    fn log_event(&self, event: &PlaybackEvent) {
        match event {
            PlaybackEvent::StateChanged { phase } => info!(%phase, "Playback state"),
            PlaybackEvent::TrackLoaded { song_id } => {
                let title = self.handle.store().read(|s| {
                    s.current_song()
                        .filter(|song| &song.id == song_id)
                        .map(|song| format!("{} - {}", song.title, song.artist))
                });
                info!(song_id = %song_id, title = title.as_deref().unwrap_or(""), "Loaded");
            }
            PlaybackEvent::TrackFinished { song_id } => info!(song_id = %song_id, "Finished"),
            PlaybackEvent::QueueEnded => info!("Queue ended"),
            PlaybackEvent::Failed { failure } => warn!(%failure, "Playback failed"),
        }
    }

    fn log_progress(&self) {
        let state = self.handle.snapshot();
        if let Some(song) = state.current_song() {
            info!(
                song_id = %song.id,
                position = %format_ms(state.position_ms()),
                duration = %format_ms(state.duration_ms()),
                playing = state.is_playing(),
                "Progress"
            );
        }
    }
}

/// `m:ss`
pub fn format_ms(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{}:{:02}", secs / 60, secs % 60)
}
