//! Shared helpers for coordinator tests

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cadence_core::types::Song;
use cadence_playback::{AudioOutput, OutputError, OutputResult, OutputStatus};
use tokio::sync::{mpsc, Semaphore};

/// Engine call as observed by [`ScriptedOutput`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Load(String),
    Play,
    Pause,
    Seek(u64),
    Unload,
}

#[derive(Debug, Default)]
struct Script {
    loaded: Option<String>,
    calls: Vec<Call>,
    failing: HashSet<String>,
}

/// Engine that records every call and can hold loads until released
#[derive(Debug)]
pub struct ScriptedOutput {
    script: Mutex<Script>,
    gate: Option<Semaphore>,
    sequence: AtomicU64,
    statuses: mpsc::UnboundedSender<OutputStatus>,
}

impl ScriptedOutput {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<OutputStatus>) {
        Self::build(None)
    }

    /// Loads block until [`ScriptedOutput::release_load`] is called
    pub fn gated() -> (Arc<Self>, mpsc::UnboundedReceiver<OutputStatus>) {
        Self::build(Some(Semaphore::new(0)))
    }

    fn build(gate: Option<Semaphore>) -> (Arc<Self>, mpsc::UnboundedReceiver<OutputStatus>) {
        let (statuses, receiver) = mpsc::unbounded_channel();
        let output = Arc::new(Self {
            script: Mutex::new(Script::default()),
            gate,
            sequence: AtomicU64::new(0),
            statuses,
        });
        (output, receiver)
    }

    pub fn fail_loads_of(&self, song_id: &str) {
        self.script.lock().unwrap().failing.insert(song_id.to_string());
    }

    pub fn heal(&self, song_id: &str) {
        self.script.lock().unwrap().failing.remove(song_id);
    }

    pub fn release_load(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.script.lock().unwrap().calls.clone()
    }

    pub fn loads(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Load(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, wanted: &Call) -> usize {
        self.calls().iter().filter(|call| *call == wanted).count()
    }

    /// Feed a status report for the loaded song to the coordinator
    pub fn report(&self, position_ms: u64, duration_ms: u64, did_finish: bool) {
        let Some(song_id) = self.script.lock().unwrap().loaded.clone() else {
            return;
        };
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        self.statuses
            .send(OutputStatus {
                song_id,
                sequence,
                position_ms,
                duration_ms,
                did_finish,
                error: None,
            })
            .unwrap();
    }

    fn record(&self, call: Call) {
        self.script.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl AudioOutput for ScriptedOutput {
    async fn load(&self, _url: &str, song_id: &str) -> OutputResult {
        {
            let mut script = self.script.lock().unwrap();
            if script.loaded.as_deref() == Some(song_id) {
                return Ok(());
            }
            script.loaded = None;
            script.calls.push(Call::Load(song_id.to_string()));
        }

        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }

        let mut script = self.script.lock().unwrap();
        if script.failing.contains(song_id) {
            return Err(OutputError::Unreachable("connection refused".to_string()));
        }
        script.loaded = Some(song_id.to_string());
        Ok(())
    }

    async fn play(&self) -> OutputResult {
        self.record(Call::Play);
        Ok(())
    }

    async fn pause(&self) -> OutputResult {
        self.record(Call::Pause);
        Ok(())
    }

    async fn seek(&self, position_ms: u64) -> OutputResult {
        self.record(Call::Seek(position_ms));
        Ok(())
    }

    async fn unload(&self) {
        let mut script = self.script.lock().unwrap();
        script.loaded = None;
        script.calls.push(Call::Unload);
    }

    fn loaded_song_id(&self) -> Option<String> {
        self.script.lock().unwrap().loaded.clone()
    }

    fn last_status_sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }
}

pub fn song(id: &str) -> Song {
    Song::new(id, format!("Song {id}"), "Artist")
        .with_stream_url(format!("https://cdn.test/{id}.mp4"))
}

/// Poll `condition` until it holds, failing the test after a while
pub async fn eventually(mut condition: impl FnMut() -> bool) {
    for _ in 0..500 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("condition not reached in time");
}
