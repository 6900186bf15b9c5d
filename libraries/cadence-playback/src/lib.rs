//! Cadence - Playback Management
//!
//! The playback queue state machine and its synchronization with an audio
//! engine.
//!
//! This crate provides:
//! - [`QueueState`]: pure queue transitions (set, add, play next, remove,
//!   reorder, skip next/previous/index, shuffle, repeat)
//! - [`PlayerStore`]: the shared state container every reader subscribes to
//! - [`AudioOutput`]: the narrow engine contract (load/play/pause/seek/unload
//!   plus status reports)
//! - [`PlaybackCoordinator`]: keeps the engine consistent with the queue and
//!   advances it on song end
//! - [`SimulatedOutput`]: a timer-driven engine for headless use and tests
//!
//! # Architecture
//!
//! `cadence-playback` has no device or UI dependency. The engine is provided
//! through [`AudioOutput`]; the coordinator is the only component that calls
//! it.
//!
//! # Example: Queue transitions
//!
//! ```rust
//! use cadence_core::Song;
//! use cadence_playback::PlayerStore;
//!
//! let store = PlayerStore::new();
//! store.set_queue(
//!     vec![
//!         Song::new("s1", "One", "Artist"),
//!         Song::new("s2", "Two", "Artist"),
//!         Song::new("s3", "Three", "Artist"),
//!     ],
//!     1,
//! );
//!
//! store.skip_to_previous();
//! assert_eq!(store.read(|s| s.current_song().map(|s| s.id.clone())), Some("s1".into()));
//!
//! store.skip_to_previous();
//! assert_eq!(store.read(|s| s.current_index()), 2);
//! ```
//!
//! # Example: Coordinated playback
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cadence_core::Song;
//! use cadence_playback::{
//!     PlaybackConfig, PlaybackCoordinator, PlayerStore, SimulatedOutput, SimulatedOutputConfig,
//! };
//!
//! # async fn demo() -> cadence_playback::Result<()> {
//! let (output, statuses) = SimulatedOutput::new(SimulatedOutputConfig::default());
//! let coordinator =
//!     PlaybackCoordinator::new(PlayerStore::new(), Arc::new(output), PlaybackConfig::default());
//! let (handle, _task) = coordinator.spawn(statuses);
//!
//! handle.set_queue(
//!     vec![Song::new("s1", "One", "Artist").with_stream_url("https://cdn.example.com/s1.mp4")],
//!     0,
//! );
//! handle.toggle_play_pause().await?;
//! handle.shutdown().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod coordinator;
pub mod error;
pub mod events;
pub mod handle;
pub mod output;
pub mod queue;
pub mod simulated;
pub mod store;
pub mod types;

pub use coordinator::{PlaybackCommand, PlaybackCoordinator};
pub use error::{OutputError, PlaybackError, PlaybackFailure, Result, TransportOperation};
pub use events::{CoordinatorStatus, PlaybackEvent};
pub use handle::PlaybackHandle;
pub use output::{AudioOutput, OutputResult, OutputStatus};
pub use queue::{QueueState, RESTART_THRESHOLD_MS};
pub use simulated::{SimulatedOutput, SimulatedOutputConfig};
pub use store::PlayerStore;
pub use types::{LoadFailurePolicy, PlaybackConfig, PlaybackPhase, PositionSource, PreviousOutcome};
