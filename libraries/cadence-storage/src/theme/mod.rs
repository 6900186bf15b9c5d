//! Theme preference

use cadence_core::types::{ThemeMode, ThemeSettings};
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::{now_millis, Result, StorageError};

const THEME_KEY: &str = "ui.theme";

/// Stored theme, `light` when never set
pub async fn get(pool: &SqlitePool) -> Result<ThemeSettings> {
    let row = sqlx::query("SELECT value FROM preferences WHERE key = ?")
        .bind(THEME_KEY)
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Ok(ThemeSettings::default());
    };

    let value: String = row.get("value");
    let mode = ThemeMode::from_str(&value)
        .ok_or_else(|| StorageError::invalid_value(THEME_KEY, value.clone()))?;
    Ok(ThemeSettings::with_mode(mode))
}

pub async fn set_mode(pool: &SqlitePool, mode: ThemeMode) -> Result<ThemeSettings> {
    sqlx::query(
        "INSERT INTO preferences (key, value, updated_at) VALUES (?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
    )
    .bind(THEME_KEY)
    .bind(mode.as_str())
    .bind(now_millis())
    .execute(pool)
    .await?;

    debug!(mode = mode.as_str(), "Theme updated");
    Ok(ThemeSettings::with_mode(mode))
}

/// Flip between light and dark; `system` becomes light
pub async fn toggle(pool: &SqlitePool) -> Result<ThemeSettings> {
    let next = get(pool).await?.toggled();
    set_mode(pool, next.mode).await
}
