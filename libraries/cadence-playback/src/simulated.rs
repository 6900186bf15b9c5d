//! In-process audio engine
//!
//! [`SimulatedOutput`] implements the [`AudioOutput`] contract with a
//! timer-driven clock instead of a decoder. It validates stream URLs, keeps
//! one song resident at a time, reports on a fixed interval while a song is
//! loaded (paused songs report their held position) and reports completion
//! once at the end of the song.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::error::OutputError;
use crate::output::{AudioOutput, OutputResult, OutputStatus};

const SUPPORTED_SCHEMES: [&str; 3] = ["http://", "https://", "file://"];

/// Simulated engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulatedOutputConfig {
    /// Report interval while a song is loaded
    pub status_interval_ms: u64,

    /// Artificial delay before a load resolves
    pub load_latency_ms: u64,

    /// Length of songs without an explicit duration
    pub default_duration_ms: u64,
}

impl Default for SimulatedOutputConfig {
    fn default() -> Self {
        Self {
            status_interval_ms: 500,
            load_latency_ms: 0,
            default_duration_ms: 30_000,
        }
    }
}

#[derive(Debug)]
struct LoadedSong {
    song_id: String,
    duration_ms: u64,
    /// Position at `resumed_at`
    base_position_ms: u64,
    resumed_at: Instant,
    playing: bool,
}

impl LoadedSong {
    fn position_at(&self, now: Instant) -> u64 {
        if self.playing {
            let elapsed = now.saturating_duration_since(self.resumed_at).as_millis() as u64;
            (self.base_position_ms + elapsed).min(self.duration_ms)
        } else {
            self.base_position_ms
        }
    }
}

#[derive(Debug, Default)]
struct Engine {
    loaded: Option<LoadedSong>,
    /// Invalidates running tickers on every transport change
    clock_token: u64,
    durations: HashMap<String, u64>,
    failures: HashMap<String, OutputError>,
    acquisitions: u64,
}

#[derive(Debug)]
struct Shared {
    config: SimulatedOutputConfig,
    engine: Mutex<Engine>,
    statuses: mpsc::UnboundedSender<OutputStatus>,
    sequence: AtomicU64,
}

impl Shared {
    fn engine(&self) -> MutexGuard<'_, Engine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Emit a report for the loaded song; called with the engine locked so
    /// sequence order matches state order
    fn emit(&self, loaded: &LoadedSong, position_ms: u64, did_finish: bool) {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let status = OutputStatus {
            song_id: loaded.song_id.clone(),
            sequence,
            position_ms,
            duration_ms: loaded.duration_ms,
            did_finish,
            error: None,
        };
        trace!(song_id = %status.song_id, sequence, position_ms, did_finish, "Status");
        // Receiver gone means nobody is listening any more
        let _ = self.statuses.send(status);
    }
}

/// Timer-driven stand-in for a device audio engine
#[derive(Debug, Clone)]
pub struct SimulatedOutput {
    shared: Arc<Shared>,
}

impl SimulatedOutput {
    /// Create the engine and the receiving end of its status stream
    pub fn new(config: SimulatedOutputConfig) -> (Self, mpsc::UnboundedReceiver<OutputStatus>) {
        let (statuses, receiver) = mpsc::unbounded_channel();
        let output = Self {
            shared: Arc::new(Shared {
                config,
                engine: Mutex::new(Engine::default()),
                statuses,
                sequence: AtomicU64::new(0),
            }),
        };
        (output, receiver)
    }

    /// Give a song an explicit length
    pub fn set_duration(&self, song_id: impl Into<String>, duration_ms: u64) {
        self.shared.engine().durations.insert(song_id.into(), duration_ms);
    }

    /// Make every future load of `song_id` fail with `error`
    pub fn fail_loads_of(&self, song_id: impl Into<String>, error: OutputError) {
        self.shared.engine().failures.insert(song_id.into(), error);
    }

    /// Number of resources acquired so far
    pub fn acquisitions(&self) -> u64 {
        self.shared.engine().acquisitions
    }

    /// Whether the engine clock is running
    pub fn is_playing(&self) -> bool {
        self.shared
            .engine()
            .loaded
            .as_ref()
            .is_some_and(|loaded| loaded.playing)
    }

    /// Current engine position
    pub fn position_ms(&self) -> Option<u64> {
        let now = Instant::now();
        self.shared
            .engine()
            .loaded
            .as_ref()
            .map(|loaded| loaded.position_at(now))
    }

    fn spawn_clock(&self, token: u64) {
        let shared = Arc::clone(&self.shared);
        let period = Duration::from_millis(shared.config.status_interval_ms.max(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;

                let mut engine = shared.engine();
                if engine.clock_token != token {
                    break;
                }
                let Some(loaded) = engine.loaded.as_mut() else {
                    break;
                };

                if !loaded.playing {
                    shared.emit(loaded, loaded.base_position_ms, false);
                    continue;
                }

                let position = loaded.position_at(Instant::now());
                let finished = position >= loaded.duration_ms;
                if finished {
                    loaded.base_position_ms = loaded.duration_ms;
                    loaded.playing = false;
                    debug!(song_id = %loaded.song_id, "Song finished");
                }
                shared.emit(loaded, position, finished);
            }
        });
    }
}

fn validate_url(url: &str) -> OutputResult {
    if url.trim().is_empty() {
        return Err(OutputError::MissingStreamUrl);
    }
    if SUPPORTED_SCHEMES.iter().any(|scheme| url.starts_with(scheme)) {
        Ok(())
    } else {
        Err(OutputError::UnsupportedFormat(format!(
            "unsupported stream URL: {url}"
        )))
    }
}

#[async_trait]
impl AudioOutput for SimulatedOutput {
    async fn load(&self, url: &str, song_id: &str) -> OutputResult {
        {
            let mut engine = self.shared.engine();
            if engine
                .loaded
                .as_ref()
                .is_some_and(|loaded| loaded.song_id == song_id)
            {
                debug!(song_id, "Already loaded");
                return Ok(());
            }
            engine.loaded = None;
            engine.clock_token += 1;
        }

        validate_url(url)?;

        if self.shared.config.load_latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.shared.config.load_latency_ms)).await;
        }

        let mut engine = self.shared.engine();
        if let Some(error) = engine.failures.get(song_id) {
            debug!(song_id, %error, "Load failed");
            return Err(error.clone());
        }

        let duration_ms = engine
            .durations
            .get(song_id)
            .copied()
            .unwrap_or(self.shared.config.default_duration_ms);
        let loaded = LoadedSong {
            song_id: song_id.to_string(),
            duration_ms,
            base_position_ms: 0,
            resumed_at: Instant::now(),
            playing: false,
        };
        self.shared.emit(&loaded, 0, false);

        engine.acquisitions += 1;
        engine.clock_token += 1;
        engine.loaded = Some(loaded);
        let token = engine.clock_token;
        drop(engine);

        debug!(song_id, duration_ms, "Loaded");
        self.spawn_clock(token);
        Ok(())
    }

    async fn play(&self) -> OutputResult {
        let token = {
            let mut engine = self.shared.engine();
            let Some(loaded) = engine.loaded.as_mut() else {
                return Ok(());
            };
            if loaded.playing {
                return Ok(());
            }
            loaded.playing = true;
            loaded.resumed_at = Instant::now();
            engine.clock_token += 1;
            engine.clock_token
        };
        self.spawn_clock(token);
        Ok(())
    }

    async fn pause(&self) -> OutputResult {
        let token = {
            let mut engine = self.shared.engine();
            let Some(loaded) = engine.loaded.as_mut() else {
                return Ok(());
            };
            if !loaded.playing {
                return Ok(());
            }
            loaded.base_position_ms = loaded.position_at(Instant::now());
            loaded.playing = false;
            self.shared.emit(loaded, loaded.base_position_ms, false);
            engine.clock_token += 1;
            engine.clock_token
        };
        self.spawn_clock(token);
        Ok(())
    }

    async fn seek(&self, position_ms: u64) -> OutputResult {
        let token = {
            let mut engine = self.shared.engine();
            let Some(loaded) = engine.loaded.as_mut() else {
                return Ok(());
            };
            loaded.base_position_ms = position_ms.min(loaded.duration_ms);
            loaded.resumed_at = Instant::now();
            self.shared.emit(loaded, loaded.base_position_ms, false);
            engine.clock_token += 1;
            engine.clock_token
        };
        self.spawn_clock(token);
        Ok(())
    }

    async fn unload(&self) {
        let mut engine = self.shared.engine();
        if let Some(loaded) = engine.loaded.take() {
            debug!(song_id = %loaded.song_id, "Unloaded");
        }
        engine.clock_token += 1;
    }

    fn loaded_song_id(&self) -> Option<String> {
        self.shared
            .engine()
            .loaded
            .as_ref()
            .map(|loaded| loaded.song_id.clone())
    }

    fn last_status_sequence(&self) -> u64 {
        self.shared.sequence.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(duration_ms: u64) -> (SimulatedOutput, mpsc::UnboundedReceiver<OutputStatus>) {
        SimulatedOutput::new(SimulatedOutputConfig {
            status_interval_ms: 500,
            load_latency_ms: 0,
            default_duration_ms: duration_ms,
        })
    }

    #[tokio::test]
    async fn load_is_idempotent_per_song() {
        let (output, _statuses) = engine(10_000);
        output.load("https://cdn.test/a.mp4", "a").await.unwrap();
        output.load("https://cdn.test/a.mp4", "a").await.unwrap();
        assert_eq!(output.acquisitions(), 1);
        assert_eq!(output.loaded_song_id().as_deref(), Some("a"));

        output.load("https://cdn.test/b.mp4", "b").await.unwrap();
        assert_eq!(output.acquisitions(), 2);
        assert_eq!(output.loaded_song_id().as_deref(), Some("b"));
    }

    #[tokio::test]
    async fn load_rejects_unsupported_scheme() {
        let (output, _statuses) = engine(10_000);
        let result = output.load("ftp://cdn.test/a.mp4", "a").await;
        assert!(matches!(result, Err(OutputError::UnsupportedFormat(_))));
        assert!(output.loaded_song_id().is_none());
    }

    #[tokio::test]
    async fn failed_load_releases_previous_song() {
        let (output, _statuses) = engine(10_000);
        output.fail_loads_of("b", OutputError::Unreachable("offline".into()));
        output.load("https://cdn.test/a.mp4", "a").await.unwrap();

        let result = output.load("https://cdn.test/b.mp4", "b").await;
        assert_eq!(result, Err(OutputError::Unreachable("offline".into())));
        assert!(output.loaded_song_id().is_none());
    }

    #[tokio::test]
    async fn transport_without_song_is_noop() {
        let (output, _statuses) = engine(10_000);
        assert!(output.play().await.is_ok());
        assert!(output.pause().await.is_ok());
        assert!(output.seek(1_000).await.is_ok());
        output.unload().await;
        assert!(!output.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn reports_progress_and_completion() {
        let (output, mut statuses) = engine(1_200);
        output.load("https://cdn.test/a.mp4", "a").await.unwrap();
        let loaded = statuses.recv().await.unwrap();
        assert_eq!(loaded.position_ms, 0);
        assert_eq!(loaded.duration_ms, 1_200);

        output.play().await.unwrap();

        let first = statuses.recv().await.unwrap();
        assert_eq!(first.position_ms, 500);
        assert!(!first.did_finish);

        let second = statuses.recv().await.unwrap();
        assert_eq!(second.position_ms, 1_000);

        let last = statuses.recv().await.unwrap();
        assert!(last.did_finish);
        assert_eq!(last.position_ms, 1_200);
        assert!(last.sequence > second.sequence);
        assert!(!output.is_playing());
    }

    #[tokio::test(start_paused = true)]
    async fn seek_clamps_and_reports() {
        let (output, mut statuses) = engine(5_000);
        output.load("file:///music/a.mp3", "a").await.unwrap();
        statuses.recv().await.unwrap();

        output.seek(9_000).await.unwrap();
        let report = statuses.recv().await.unwrap();
        assert_eq!(report.position_ms, 5_000);
        assert_eq!(output.last_status_sequence(), report.sequence);
    }

    #[tokio::test(start_paused = true)]
    async fn paused_song_keeps_reporting_held_position() {
        let (output, mut statuses) = engine(60_000);
        output.load("https://cdn.test/a.mp4", "a").await.unwrap();
        statuses.recv().await.unwrap();

        output.play().await.unwrap();
        statuses.recv().await.unwrap();
        output.pause().await.unwrap();
        let paused = statuses.recv().await.unwrap();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(output.position_ms(), Some(paused.position_ms));

        let mut heartbeats = 0;
        while let Ok(report) = statuses.try_recv() {
            assert_eq!(report.position_ms, paused.position_ms);
            assert!(!report.did_finish);
            assert!(report.sequence > paused.sequence);
            heartbeats += 1;
        }
        assert!(heartbeats >= 9, "expected a report every 500ms, got {heartbeats}");
    }

    #[tokio::test(start_paused = true)]
    async fn loaded_song_reports_before_playing() {
        let (output, mut statuses) = engine(60_000);
        output.load("https://cdn.test/a.mp4", "a").await.unwrap();
        let loaded = statuses.recv().await.unwrap();

        let next = statuses.recv().await.unwrap();
        assert_eq!(next.song_id, "a");
        assert_eq!(next.position_ms, 0);
        assert_eq!(next.duration_ms, 60_000);
        assert!(next.sequence > loaded.sequence);
    }

    #[tokio::test(start_paused = true)]
    async fn completion_is_reported_once() {
        let (output, mut statuses) = engine(700);
        output.load("https://cdn.test/a.mp4", "a").await.unwrap();
        statuses.recv().await.unwrap();
        output.play().await.unwrap();

        tokio::time::sleep(Duration::from_secs(5)).await;
        let mut finishes = 0;
        while let Ok(report) = statuses.try_recv() {
            finishes += usize::from(report.did_finish);
        }
        assert_eq!(finishes, 1);
        assert_eq!(output.position_ms(), Some(700));
    }

    #[tokio::test(start_paused = true)]
    async fn unload_stops_reports() {
        let (output, mut statuses) = engine(60_000);
        output.load("https://cdn.test/a.mp4", "a").await.unwrap();
        output.unload().await;
        while statuses.try_recv().is_ok() {}

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(statuses.try_recv().is_err());
    }
}
