/// Cadence - headless music client
use cadence_catalog::SearchKind;
use cadence_cli::{
    commands::{self, Context},
    config::AppConfig,
};
use cadence_core::types::ThemeMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cadence", version)]
#[command(about = "Headless Cadence music client", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./cadence.toml when present)
    #[arg(short, long, global = true, env = "CADENCE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog
    Search {
        /// songs, albums or artists
        #[arg(value_parser = parse_search_kind)]
        kind: SearchKind,
        query: String,
        #[arg(long, default_value_t = 0)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    /// Search songs and play the results
    Play {
        query: String,
        /// Index of the first song to play
        #[arg(long, default_value_t = 0)]
        start: usize,
        #[arg(long)]
        shuffle: bool,
        /// Stop after this many seconds
        #[arg(long)]
        seconds: Option<u64>,
    },
    /// Play the saved queue
    Resume {
        /// Stop after this many seconds
        #[arg(long)]
        seconds: Option<u64>,
    },
    /// Show the saved queue
    Queue,
    /// Manage favorite songs
    Favorites {
        #[command(subcommand)]
        action: FavoritesAction,
    },
    /// Manage playlists
    Playlists {
        #[command(subcommand)]
        action: PlaylistsAction,
    },
    /// Recent searches
    Recent {
        #[command(subcommand)]
        action: RecentAction,
    },
    /// Theme preference
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    List,
    Add { song_id: String },
    Remove { song_id: String },
    Clear,
}

#[derive(Subcommand)]
enum PlaylistsAction {
    List,
    Create {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
    },
    Show { id: String },
    Rename { id: String, name: String },
    Delete { id: String },
    Add { id: String, song_id: String },
    Remove { id: String, song_id: String },
}

#[derive(Subcommand)]
enum RecentAction {
    List,
    Clear,
}

#[derive(Subcommand)]
enum ThemeAction {
    Show,
    /// light, dark or system
    Set {
        #[arg(value_parser = parse_theme_mode)]
        mode: ThemeMode,
    },
    Toggle,
}

fn parse_search_kind(s: &str) -> Result<SearchKind, String> {
    SearchKind::from_str(s).ok_or_else(|| format!("expected songs, albums or artists, got {s}"))
}

fn parse_theme_mode(s: &str) -> Result<ThemeMode, String> {
    ThemeMode::from_str(s).ok_or_else(|| format!("expected light, dark or system, got {s}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence_cli=info,cadence_playback=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    let ctx = Context::open(config).await?;

    match cli.command {
        Commands::Search {
            kind,
            query,
            page,
            limit,
        } => commands::search(&ctx, kind, &query, page, limit).await?,
        Commands::Play {
            query,
            start,
            shuffle,
            seconds,
        } => commands::play(&ctx, &query, start, shuffle, seconds).await?,
        Commands::Resume { seconds } => commands::resume(&ctx, seconds).await?,
        Commands::Queue => commands::show_queue(&ctx).await?,
        Commands::Favorites { action } => match action {
            FavoritesAction::List => commands::list_favorites(&ctx).await?,
            FavoritesAction::Add { song_id } => commands::add_favorite(&ctx, &song_id).await?,
            FavoritesAction::Remove { song_id } => {
                commands::remove_favorite(&ctx, &song_id).await?;
            }
            FavoritesAction::Clear => commands::clear_favorites(&ctx).await?,
        },
        Commands::Playlists { action } => match action {
            PlaylistsAction::List => commands::list_playlists(&ctx).await?,
            PlaylistsAction::Create { name, description } => {
                commands::create_playlist(&ctx, &name, description.as_deref()).await?;
            }
            PlaylistsAction::Show { id } => commands::show_playlist(&ctx, &id).await?,
            PlaylistsAction::Rename { id, name } => {
                commands::rename_playlist(&ctx, &id, &name).await?;
            }
            PlaylistsAction::Delete { id } => commands::delete_playlist(&ctx, &id).await?,
            PlaylistsAction::Add { id, song_id } => {
                commands::add_to_playlist(&ctx, &id, &song_id).await?;
            }
            PlaylistsAction::Remove { id, song_id } => {
                commands::remove_from_playlist(&ctx, &id, &song_id).await?;
            }
        },
        Commands::Recent { action } => match action {
            RecentAction::List => commands::list_recent(&ctx).await?,
            RecentAction::Clear => commands::clear_recent(&ctx).await?,
        },
        Commands::Theme { action } => match action {
            ThemeAction::Show => commands::show_theme(&ctx).await?,
            ThemeAction::Set { mode } => commands::set_theme(&ctx, mode).await?,
            ThemeAction::Toggle => commands::toggle_theme(&ctx).await?,
        },
    }

    ctx.pool.close().await;
    Ok(())
}
