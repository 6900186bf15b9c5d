//! Recent search queries, most recent first

use sqlx::{Row, SqlitePool};

use crate::Result;

/// Number of queries kept
pub const MAX_RECENT_SEARCHES: i64 = 10;

pub async fn list(pool: &SqlitePool) -> Result<Vec<String>> {
    let rows = sqlx::query("SELECT query FROM recent_searches ORDER BY id DESC")
        .fetch_all(pool)
        .await?;

    Ok(rows.iter().map(|row| row.get("query")).collect())
}

/// Record a query at the top of the list
///
/// The query is trimmed and blank queries are ignored. Repeating a query
/// moves it to the top; the oldest entries beyond [`MAX_RECENT_SEARCHES`]
/// are dropped.
pub async fn add(pool: &SqlitePool, query: &str) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM recent_searches WHERE query = ?")
        .bind(query)
        .execute(&mut *tx)
        .await?;

    sqlx::query("INSERT INTO recent_searches (query) VALUES (?)")
        .bind(query)
        .execute(&mut *tx)
        .await?;

    sqlx::query(
        "DELETE FROM recent_searches WHERE id NOT IN
         (SELECT id FROM recent_searches ORDER BY id DESC LIMIT ?)",
    )
    .bind(MAX_RECENT_SEARCHES)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
}

/// Remove an exact query
pub async fn remove(pool: &SqlitePool, query: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM recent_searches WHERE query = ?")
        .bind(query)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn clear(pool: &SqlitePool) -> Result<()> {
    sqlx::query("DELETE FROM recent_searches")
        .execute(pool)
        .await?;
    Ok(())
}
