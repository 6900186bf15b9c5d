//! Favorite songs
//!
//! A song is a favorite at most once; the list is newest first.

use cadence_core::types::Song;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::{decode_json, now_millis, Result};

/// All favorites, most recently added first
pub async fn list(pool: &SqlitePool) -> Result<Vec<Song>> {
    let rows = sqlx::query("SELECT song_json FROM favorites ORDER BY id DESC")
        .fetch_all(pool)
        .await?;

    rows.iter()
        .map(|row| decode_json(&row.get::<String, _>("song_json")))
        .collect()
}

/// Add a song; already-favorited songs keep their place
///
/// Returns `true` when the song was added.
pub async fn add(pool: &SqlitePool, song: &Song) -> Result<bool> {
    let song_json = serde_json::to_string(song)?;

    let result = sqlx::query(
        "INSERT INTO favorites (song_id, song_json, added_at) VALUES (?, ?, ?)
         ON CONFLICT(song_id) DO NOTHING",
    )
    .bind(&song.id)
    .bind(&song_json)
    .bind(now_millis())
    .execute(pool)
    .await?;

    let added = result.rows_affected() > 0;
    debug!(song_id = %song.id, added, "Add favorite");
    Ok(added)
}

/// Remove a song by id
///
/// Returns `true` when a favorite was removed.
pub async fn remove(pool: &SqlitePool, song_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM favorites WHERE song_id = ?")
        .bind(song_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Flip a song's favorite status
///
/// Returns `true` when the song is a favorite afterwards.
pub async fn toggle(pool: &SqlitePool, song: &Song) -> Result<bool> {
    if remove(pool, &song.id).await? {
        return Ok(false);
    }
    add(pool, song).await?;
    Ok(true)
}

pub async fn contains(pool: &SqlitePool, song_id: &str) -> Result<bool> {
    let row = sqlx::query("SELECT 1 FROM favorites WHERE song_id = ?")
        .bind(song_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

pub async fn clear(pool: &SqlitePool) -> Result<()> {
    sqlx::query("DELETE FROM favorites").execute(pool).await?;
    Ok(())
}
