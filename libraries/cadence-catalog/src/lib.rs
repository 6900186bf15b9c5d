//! Cadence Catalog Client
//!
//! HTTP client for the remote music catalog.
//!
//! # Features
//!
//! - **Search**: songs, albums and artists, one kind at a time or combined
//! - **Details**: song, album (with track list) and artist lookups by id
//! - **Home feed**: trending songs, new albums and popular artists
//!
//! Raw catalog records are loosely typed; the client maps them onto the
//! `cadence-core` domain types (best artwork, best stream URL, primary
//! artist id) before handing them out.
//!
//! # Example
//!
//! ```ignore
//! use cadence_catalog::{CatalogClient, CatalogConfig, SearchKind};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = CatalogClient::new(CatalogConfig::default())?;
//!
//!     let results = client.search(SearchKind::Songs, "arijit", 0, 20).await?;
//!     println!("Found {} songs", results.len());
//!
//!     if let Some(details) = client.album("1139549").await? {
//!         println!("{} has {} songs", details.album.title, details.songs.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod mapping;
mod types;

pub use client::CatalogClient;
pub use error::{CatalogError, Result};
pub use types::{
    AlbumDetails, CatalogConfig, CombinedResults, HomeFeed, SearchKind, SearchResults,
    DEFAULT_BASE_URL,
};
