//! Persisted playback queue
//!
//! Only the queue, the current index and the shuffle/repeat modes are kept.
//! Transport and position are session state and never reach the database.

use cadence_core::types::{PersistedQueue, RepeatMode};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::{decode_json, now_millis, Result, StorageError};

/// Save the queue, replacing any previous one
pub async fn save(pool: &SqlitePool, queue: &PersistedQueue) -> Result<()> {
    let queue_json = serde_json::to_string(&queue.queue)?;
    let current_index = i64::try_from(queue.current_index)
        .map_err(|_| StorageError::invalid_value("current_index", queue.current_index.to_string()))?;

    sqlx::query(
        "INSERT INTO playback_state (id, queue_json, current_index, shuffle, repeat_mode, updated_at)
         VALUES (1, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
            queue_json = excluded.queue_json,
            current_index = excluded.current_index,
            shuffle = excluded.shuffle,
            repeat_mode = excluded.repeat_mode,
            updated_at = excluded.updated_at",
    )
    .bind(queue_json)
    .bind(current_index)
    .bind(queue.shuffle)
    .bind(queue.repeat.as_str())
    .bind(now_millis())
    .execute(pool)
    .await?;

    debug!(
        songs = queue.queue.len(),
        current_index = queue.current_index,
        "Saved playback queue"
    );
    Ok(())
}

/// Load the saved queue, if any
pub async fn load(pool: &SqlitePool) -> Result<Option<PersistedQueue>> {
    let row = sqlx::query(
        "SELECT queue_json, current_index, shuffle, repeat_mode FROM playback_state WHERE id = 1",
    )
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let repeat_mode: String = row.get("repeat_mode");
    let repeat = RepeatMode::from_str(&repeat_mode)
        .ok_or_else(|| StorageError::invalid_value("repeat_mode", repeat_mode.clone()))?;

    Ok(Some(PersistedQueue {
        queue: decode_json(&row.get::<String, _>("queue_json"))?,
        current_index: usize::try_from(row.get::<i64, _>("current_index")).unwrap_or(0),
        shuffle: row.get::<i64, _>("shuffle") != 0,
        repeat,
    }))
}

/// Forget the saved queue
pub async fn clear(pool: &SqlitePool) -> Result<()> {
    sqlx::query("DELETE FROM playback_state").execute(pool).await?;
    Ok(())
}
