//! Cadence Storage
//!
//! Local `SQLite` persistence for everything the user keeps between sessions.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each feature owns its own queries as free functions
//!   over a `&SqlitePool`
//! - **Snapshots**: songs are stored as JSON copies of the catalog record, so
//!   favorites and playlists work without the catalog
//! - **Transport is never stored**: the persisted queue always restores paused
//!
//! # Example
//!
//! ```rust,no_run
//! use cadence_storage::{create_pool, favorites, run_migrations};
//! use cadence_core::types::Song;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://cadence.db").await?;
//! run_migrations(&pool).await?;
//!
//! let song = Song::new("s1", "Intro", "Artist");
//! favorites::toggle(&pool, &song).await?;
//! assert!(favorites::contains(&pool, "s1").await?);
//! # Ok(())
//! # }
//! ```

mod error;

// Vertical slices
pub mod favorites;
pub mod playlists;
pub mod recent_searches;

// Preferences and session state
pub mod playback_state;
pub mod theme;

pub use error::{Result, StorageError};

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup, before any slice is used.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    debug!("Database migrations applied");
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g. `sqlite://cadence.db`)
///
/// The database file (and its parent directory) is created when missing.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(30));

    if let Some(parent) = options.get_filename().parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    info!(url = %database_url, "Database pool ready");

    Ok(pool)
}

/// Parse a stored JSON column
pub(crate) fn decode_json<T: serde::de::DeserializeOwned>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}

/// Milliseconds since the Unix epoch
pub(crate) fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
