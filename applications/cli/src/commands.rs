//! Subcommand implementations

use std::time::Duration;

use anyhow::Context as _;
use cadence_catalog::{CatalogClient, SearchKind, SearchResults};
use cadence_core::types::{PlaylistId, Song, ThemeMode};
use cadence_playback::PlayerStore;
use cadence_storage::{favorites, playback_state, playlists, recent_searches, theme};
use sqlx::SqlitePool;
use tracing::info;

use crate::config::AppConfig;
use crate::session::{format_ms, PlaybackSession};

/// Loaded configuration plus an open, migrated database
pub struct Context {
    pub config: AppConfig,
    pub pool: SqlitePool,
}

impl Context {
    pub async fn open(config: AppConfig) -> anyhow::Result<Self> {
        let pool = cadence_storage::create_pool(&config.database_url)
            .await
            .with_context(|| format!("opening database {}", config.database_url))?;
        cadence_storage::run_migrations(&pool).await?;
        Ok(Self { config, pool })
    }

    fn catalog(&self) -> anyhow::Result<CatalogClient> {
        Ok(CatalogClient::new(self.config.catalog.clone())?)
    }

    async fn lookup_song(&self, song_id: &str) -> anyhow::Result<Song> {
        self.catalog()?
            .song(song_id)
            .await?
            .with_context(|| format!("song {song_id} not found in catalog"))
    }
}

pub async fn search(
    ctx: &Context,
    kind: SearchKind,
    query: &str,
    page: u32,
    limit: u32,
) -> anyhow::Result<()> {
    let results = ctx.catalog()?.search(kind, query, page, limit).await?;
    recent_searches::add(&ctx.pool, query).await?;

    if results.is_empty() {
        println!("No {} found for \"{}\"", kind.as_str(), query.trim());
        return Ok(());
    }

    match results {
        SearchResults::Songs(songs) => print_songs(&songs),
        SearchResults::Albums(albums) => {
            for album in albums {
                println!("{}  {} ({}) by {}", album.id, album.title, album.year, album.artist);
            }
        }
        SearchResults::Artists(artists) => {
            for artist in artists {
                println!("{}  {}", artist.id, artist.name);
            }
        }
    }
    Ok(())
}

/// Search songs, queue the results and play them on the simulated engine
pub async fn play(
    ctx: &Context,
    query: &str,
    start: usize,
    shuffle: bool,
    seconds: Option<u64>,
) -> anyhow::Result<()> {
    let songs = ctx.catalog()?.search_songs(query, 0, 20).await?;
    recent_searches::add(&ctx.pool, query).await?;
    anyhow::ensure!(!songs.is_empty(), "no songs found for \"{}\"", query.trim());

    let store = PlayerStore::new();
    store.set_queue(songs, start);
    if shuffle {
        store.toggle_shuffle();
    }
    store.play();

    run_session(ctx, store, seconds).await
}

/// Restore the saved queue and start playing it
pub async fn resume(ctx: &Context, seconds: Option<u64>) -> anyhow::Result<()> {
    let persisted = playback_state::load(&ctx.pool)
        .await?
        .filter(|queue| !queue.queue.is_empty())
        .context("no saved queue to resume")?;

    let store = PlayerStore::restore(persisted);
    let session = PlaybackSession::start(store, &ctx.config);
    session.handle().toggle_play_pause().await?;
    finish_session(ctx, session, seconds).await
}

pub async fn show_queue(ctx: &Context) -> anyhow::Result<()> {
    let Some(queue) = playback_state::load(&ctx.pool).await? else {
        println!("No saved queue");
        return Ok(());
    };

    println!(
        "shuffle: {}  repeat: {}",
        if queue.shuffle { "on" } else { "off" },
        queue.repeat.as_str()
    );
    for (index, song) in queue.queue.iter().enumerate() {
        let marker = if index == queue.current_index { ">" } else { " " };
        println!("{marker} {:>3}. {} - {}", index + 1, song.title, song.artist);
    }
    Ok(())
}

pub async fn list_favorites(ctx: &Context) -> anyhow::Result<()> {
    let songs = favorites::list(&ctx.pool).await?;
    if songs.is_empty() {
        println!("No favorites yet");
    }
    print_songs(&songs);
    Ok(())
}

pub async fn add_favorite(ctx: &Context, song_id: &str) -> anyhow::Result<()> {
    let song = ctx.lookup_song(song_id).await?;
    if favorites::add(&ctx.pool, &song).await? {
        println!("Added {} to favorites", song.title);
    } else {
        println!("{} is already a favorite", song.title);
    }
    Ok(())
}

pub async fn remove_favorite(ctx: &Context, song_id: &str) -> anyhow::Result<()> {
    if !favorites::remove(&ctx.pool, song_id).await? {
        println!("{song_id} is not a favorite");
    }
    Ok(())
}

pub async fn clear_favorites(ctx: &Context) -> anyhow::Result<()> {
    favorites::clear(&ctx.pool).await?;
    Ok(())
}

pub async fn list_playlists(ctx: &Context) -> anyhow::Result<()> {
    for playlist in playlists::list(&ctx.pool).await? {
        println!(
            "{}  {} ({} songs, {})",
            playlist.id,
            playlist.name,
            playlist.songs.len(),
            format_ms(playlist.total_duration_secs() * 1000)
        );
    }
    Ok(())
}

pub async fn create_playlist(
    ctx: &Context,
    name: &str,
    description: Option<&str>,
) -> anyhow::Result<()> {
    let playlist = playlists::create(&ctx.pool, name, description).await?;
    println!("{}", playlist.id);
    Ok(())
}

pub async fn show_playlist(ctx: &Context, id: &str) -> anyhow::Result<()> {
    let playlist = playlists::get(&ctx.pool, &PlaylistId::new(id))
        .await?
        .with_context(|| format!("playlist {id} not found"))?;

    println!("{}", playlist.name);
    if let Some(description) = &playlist.description {
        println!("{description}");
    }
    print_songs(&playlist.songs);
    Ok(())
}

pub async fn rename_playlist(ctx: &Context, id: &str, name: &str) -> anyhow::Result<()> {
    require(
        playlists::rename(&ctx.pool, &PlaylistId::new(id), name).await?,
        id,
    )
}

pub async fn delete_playlist(ctx: &Context, id: &str) -> anyhow::Result<()> {
    require(playlists::delete(&ctx.pool, &PlaylistId::new(id)).await?, id)
}

pub async fn add_to_playlist(ctx: &Context, id: &str, song_id: &str) -> anyhow::Result<()> {
    let song = ctx.lookup_song(song_id).await?;
    if !playlists::add_song(&ctx.pool, &PlaylistId::new(id), &song).await? {
        println!("Nothing changed: unknown playlist or song already present");
    }
    Ok(())
}

pub async fn remove_from_playlist(ctx: &Context, id: &str, song_id: &str) -> anyhow::Result<()> {
    if !playlists::remove_song(&ctx.pool, &PlaylistId::new(id), song_id).await? {
        println!("Nothing changed: unknown playlist or song not present");
    }
    Ok(())
}

pub async fn list_recent(ctx: &Context) -> anyhow::Result<()> {
    for query in recent_searches::list(&ctx.pool).await? {
        println!("{query}");
    }
    Ok(())
}

pub async fn clear_recent(ctx: &Context) -> anyhow::Result<()> {
    recent_searches::clear(&ctx.pool).await?;
    Ok(())
}

pub async fn show_theme(ctx: &Context) -> anyhow::Result<()> {
    let settings = theme::get(&ctx.pool).await?;
    println!("{}", settings.mode.as_str());
    Ok(())
}

pub async fn set_theme(ctx: &Context, mode: ThemeMode) -> anyhow::Result<()> {
    theme::set_mode(&ctx.pool, mode).await?;
    Ok(())
}

pub async fn toggle_theme(ctx: &Context) -> anyhow::Result<()> {
    let settings = theme::toggle(&ctx.pool).await?;
    println!("{}", settings.mode.as_str());
    Ok(())
}

async fn run_session(ctx: &Context, store: PlayerStore, seconds: Option<u64>) -> anyhow::Result<()> {
    let session = PlaybackSession::start(store, &ctx.config);
    finish_session(ctx, session, seconds).await
}

async fn finish_session(
    ctx: &Context,
    session: PlaybackSession,
    seconds: Option<u64>,
) -> anyhow::Result<()> {
    let reason = session.run(seconds.map(Duration::from_secs)).await;
    info!(?reason, "Session ended");
    session.finish(&ctx.pool).await
}

fn require(changed: bool, id: &str) -> anyhow::Result<()> {
    anyhow::ensure!(changed, "playlist {id} not found");
    Ok(())
}

fn print_songs(songs: &[Song]) {
    for song in songs {
        println!(
            "{}  {} - {} [{}]{}",
            song.id,
            song.title,
            song.artist,
            format_ms(u64::from(song.duration_secs) * 1000),
            if song.is_playable() { "" } else { " (unavailable)" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn context() -> (tempfile::TempDir, Context) {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            database_url: format!("sqlite://{}", dir.path().join("cli.db").display()),
            ..AppConfig::default()
        };
        let ctx = Context::open(config).await.unwrap();
        (dir, ctx)
    }

    #[tokio::test]
    async fn resume_without_saved_queue_fails() {
        let (_dir, ctx) = context().await;
        let err = resume(&ctx, Some(1)).await.unwrap_err();
        assert!(err.to_string().contains("no saved queue"));
    }

    #[tokio::test]
    async fn renaming_unknown_playlist_fails() {
        let (_dir, ctx) = context().await;
        assert!(rename_playlist(&ctx, "missing", "x").await.is_err());

        let playlist = playlists::create(&ctx.pool, "Mix", None).await.unwrap();
        rename_playlist(&ctx, playlist.id.as_str(), "Renamed")
            .await
            .unwrap();
        let stored = playlists::get(&ctx.pool, &playlist.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Renamed");
    }
}
