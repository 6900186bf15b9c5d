//! User playlists
//!
//! Songs are kept in playback order and are unique by id within a playlist.
//! Mutations on an unknown playlist are no-ops that return `false`; every
//! change to name or songs bumps `updated_at`.

use cadence_core::types::{Playlist, PlaylistId, Song};
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::{debug, info};

use crate::{decode_json, now_millis, Result, StorageError};

const COLUMNS: &str =
    "id, name, description, artwork_url, songs_json, created_at, updated_at";

fn timestamp(field: &str, millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| StorageError::invalid_value(field, millis.to_string()))
}

fn from_row(row: &SqliteRow) -> Result<Playlist> {
    Ok(Playlist {
        id: PlaylistId::new(row.get::<String, _>("id")),
        name: row.get("name"),
        description: row.get("description"),
        artwork_url: row.get("artwork_url"),
        songs: decode_json(&row.get::<String, _>("songs_json"))?,
        created_at: timestamp("created_at", row.get("created_at"))?,
        updated_at: timestamp("updated_at", row.get("updated_at"))?,
    })
}

/// All playlists in creation order
pub async fn list(pool: &SqlitePool) -> Result<Vec<Playlist>> {
    let rows = sqlx::query(&format!(
        "SELECT {COLUMNS} FROM playlists ORDER BY created_at, rowid"
    ))
    .fetch_all(pool)
    .await?;

    rows.iter().map(from_row).collect()
}

pub async fn get(pool: &SqlitePool, id: &PlaylistId) -> Result<Option<Playlist>> {
    let row = sqlx::query(&format!("SELECT {COLUMNS} FROM playlists WHERE id = ?"))
        .bind(id.as_str())
        .fetch_optional(pool)
        .await?;

    row.as_ref().map(from_row).transpose()
}

/// Create an empty playlist
pub async fn create(
    pool: &SqlitePool,
    name: &str,
    description: Option<&str>,
) -> Result<Playlist> {
    let playlist = Playlist::new(name, description.map(str::to_string));
    let now = playlist.created_at.timestamp_millis();

    sqlx::query(
        "INSERT INTO playlists (id, name, description, artwork_url, songs_json, created_at, updated_at)
         VALUES (?, ?, ?, NULL, '[]', ?, ?)",
    )
    .bind(playlist.id.as_str())
    .bind(&playlist.name)
    .bind(&playlist.description)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;

    info!(playlist_id = %playlist.id, name = %playlist.name, "Created playlist");

    get(pool, &playlist.id)
        .await?
        .ok_or_else(|| StorageError::not_found("Playlist", playlist.id.as_str()))
}

pub async fn delete(pool: &SqlitePool, id: &PlaylistId) -> Result<bool> {
    let result = sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id.as_str())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn rename(pool: &SqlitePool, id: &PlaylistId, name: &str) -> Result<bool> {
    let result = sqlx::query("UPDATE playlists SET name = ?, updated_at = ? WHERE id = ?")
        .bind(name)
        .bind(now_millis())
        .bind(id.as_str())
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Append a song unless a song with the same id is already present
pub async fn add_song(pool: &SqlitePool, id: &PlaylistId, song: &Song) -> Result<bool> {
    modify_songs(pool, id, |songs| {
        if songs.iter().any(|s| s.id == song.id) {
            return false;
        }
        songs.push(song.clone());
        true
    })
    .await
}

pub async fn remove_song(pool: &SqlitePool, id: &PlaylistId, song_id: &str) -> Result<bool> {
    modify_songs(pool, id, |songs| {
        let before = songs.len();
        songs.retain(|s| s.id != song_id);
        songs.len() != before
    })
    .await
}

/// Move the song at `from` so it ends up at `to`
///
/// Out-of-range positions leave the playlist unchanged.
pub async fn reorder_songs(
    pool: &SqlitePool,
    id: &PlaylistId,
    from: usize,
    to: usize,
) -> Result<bool> {
    modify_songs(pool, id, |songs| {
        if from >= songs.len() || to >= songs.len() {
            return false;
        }
        let song = songs.remove(from);
        songs.insert(to, song);
        from != to
    })
    .await
}

/// Remove every song, keeping the playlist
pub async fn clear(pool: &SqlitePool, id: &PlaylistId) -> Result<bool> {
    modify_songs(pool, id, |songs| {
        songs.clear();
        true
    })
    .await
}

/// Read-modify-write of a playlist's songs in one transaction
///
/// `change` returns whether it modified the list; nothing is written otherwise.
async fn modify_songs(
    pool: &SqlitePool,
    id: &PlaylistId,
    change: impl FnOnce(&mut Vec<Song>) -> bool,
) -> Result<bool> {
    let mut tx = pool.begin().await?;

    let row = sqlx::query("SELECT songs_json FROM playlists WHERE id = ?")
        .bind(id.as_str())
        .fetch_optional(&mut *tx)
        .await?;

    let Some(row) = row else {
        debug!(playlist_id = %id, "Playlist not found, ignoring change");
        return Ok(false);
    };

    let mut songs: Vec<Song> = decode_json(&row.get::<String, _>("songs_json"))?;
    if !change(&mut songs) {
        return Ok(false);
    }

    sqlx::query("UPDATE playlists SET songs_json = ?, updated_at = ? WHERE id = ?")
        .bind(serde_json::to_string(&songs)?)
        .bind(now_millis())
        .bind(id.as_str())
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    debug!(playlist_id = %id, songs = songs.len(), "Updated playlist songs");
    Ok(true)
}
