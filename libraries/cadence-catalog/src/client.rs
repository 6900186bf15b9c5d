//! Remote catalog client.

use crate::error::{CatalogError, Result};
use crate::mapping::{map_album, map_albums, map_artist, map_artists, map_song, map_songs};
use crate::types::{
    AlbumDetails, ApiAlbum, ApiArtist, ApiArtistAlbums, ApiArtistSongs, ApiResponse, ApiResults,
    ApiSearchAll, ApiSong, CatalogConfig, CombinedResults, HomeFeed, SearchKind, SearchResults,
};
use cadence_core::types::{Album, Artist, Song};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info};

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Client for the remote music catalog.
///
/// Every lookup returns domain types already mapped from the catalog's
/// loosely typed records. Detail lookups return `None` for unknown ids.
///
/// # Example
///
/// ```ignore
/// use cadence_catalog::{CatalogClient, CatalogConfig};
///
/// let client = CatalogClient::new(CatalogConfig::default())?;
/// let songs = client.search_songs("arijit", 0, 20).await?;
/// println!("Found {} songs", songs.len());
/// ```
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: Client,
    base_url: String,
}

impl CatalogClient {
    /// Create a new client with the given configuration.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        if config.base_url.is_empty() {
            return Err(CatalogError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = config.base_url.trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(CatalogError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(format!("Cadence/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        info!(url = %base_url, "Catalog client ready");

        Ok(Self { http, base_url })
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Search one kind of record.
    pub async fn search(
        &self,
        kind: SearchKind,
        query: &str,
        page: u32,
        limit: u32,
    ) -> Result<SearchResults> {
        Ok(match kind {
            SearchKind::Songs => SearchResults::Songs(self.search_songs(query, page, limit).await?),
            SearchKind::Albums => {
                SearchResults::Albums(self.search_albums(query, page, limit).await?)
            }
            SearchKind::Artists => {
                SearchResults::Artists(self.search_artists(query, page, limit).await?)
            }
        })
    }

    pub async fn search_songs(&self, query: &str, page: u32, limit: u32) -> Result<Vec<Song>> {
        let records: Vec<ApiSong> = self.search_records(SearchKind::Songs, query, page, limit).await?;
        Ok(map_songs(records))
    }

    pub async fn search_albums(&self, query: &str, page: u32, limit: u32) -> Result<Vec<Album>> {
        let records: Vec<ApiAlbum> =
            self.search_records(SearchKind::Albums, query, page, limit).await?;
        Ok(map_albums(records))
    }

    pub async fn search_artists(&self, query: &str, page: u32, limit: u32) -> Result<Vec<Artist>> {
        let records: Vec<ApiArtist> =
            self.search_records(SearchKind::Artists, query, page, limit).await?;
        Ok(map_artists(records))
    }

    /// Search songs, albums and artists in one request.
    pub async fn search_all(&self, query: &str) -> Result<CombinedResults> {
        let data: Option<ApiSearchAll> = self
            .get("/api/search", &[("query", query.to_string())])
            .await?;

        let Some(data) = data else {
            return Ok(CombinedResults::default());
        };

        Ok(CombinedResults {
            songs: map_songs(data.songs.results),
            albums: map_albums(data.albums.results),
            artists: map_artists(data.artists.results),
        })
    }

    /// Look up a single song.
    pub async fn song(&self, id: &str) -> Result<Option<Song>> {
        let data: Option<Vec<ApiSong>> = self.get(&format!("/api/songs/{id}"), &[]).await?;
        Ok(data
            .and_then(|songs| songs.into_iter().next())
            .map(map_song))
    }

    /// Look up an album together with its songs.
    pub async fn album(&self, id: &str) -> Result<Option<AlbumDetails>> {
        let data: Option<ApiAlbum> = self.get("/api/albums", &[("id", id.to_string())]).await?;
        Ok(data.map(|mut album| {
            let songs = map_songs(std::mem::take(&mut album.songs));
            AlbumDetails {
                album: map_album(album),
                songs,
            }
        }))
    }

    /// Look up a single artist.
    pub async fn artist(&self, id: &str) -> Result<Option<Artist>> {
        let data: Option<ApiArtist> = self.get(&format!("/api/artists/{id}"), &[]).await?;
        Ok(data.map(map_artist))
    }

    pub async fn artist_songs(&self, id: &str, page: u32) -> Result<Vec<Song>> {
        let data: Option<ApiArtistSongs> = self
            .get(
                &format!("/api/artists/{id}/songs"),
                &[("page", page.to_string())],
            )
            .await?;
        Ok(data.map(|data| map_songs(data.songs)).unwrap_or_default())
    }

    pub async fn artist_albums(&self, id: &str, page: u32) -> Result<Vec<Album>> {
        let data: Option<ApiArtistAlbums> = self
            .get(
                &format!("/api/artists/{id}/albums"),
                &[("page", page.to_string())],
            )
            .await?;
        Ok(data.map(|data| map_albums(data.albums)).unwrap_or_default())
    }

    /// Trending songs, new albums and popular artists, fetched concurrently.
    pub async fn home(&self) -> Result<HomeFeed> {
        let (trending, new_releases, top_artists) = tokio::try_join!(
            self.search_songs("trending", 0, 20),
            self.search_albums("new", 0, 10),
            self.search_artists("popular", 0, 10),
        )?;

        debug!(
            trending = trending.len(),
            new_releases = new_releases.len(),
            top_artists = top_artists.len(),
            "Fetched home feed"
        );

        Ok(HomeFeed {
            trending,
            new_releases,
            top_artists,
        })
    }

    async fn search_records<T: DeserializeOwned>(
        &self,
        kind: SearchKind,
        query: &str,
        page: u32,
        limit: u32,
    ) -> Result<Vec<T>> {
        let data: Option<ApiResults<T>> = self
            .get(
                &format!("/api/search/{}", kind.as_str()),
                &[
                    ("query", query.to_string()),
                    ("page", page.to_string()),
                    ("limit", limit.to_string()),
                ],
            )
            .await?;
        Ok(data.unwrap_or_default().results)
    }

    /// GET an endpoint and unwrap the response envelope.
    ///
    /// A 404 or an unsuccessful envelope yields `Ok(None)`.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Option<T>> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "Catalog request");

        let response = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    CatalogError::Unreachable(e.to_string())
                } else {
                    CatalogError::Request(e)
                }
            })?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!(url = %url, "Catalog record not found");
            return Ok(None);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CatalogError::Server {
                status: status.as_u16(),
                message: error_text,
            });
        }

        let body = response.text().await?;
        let envelope: ApiResponse<T> = serde_json::from_str(&body).map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse response from {}: {}", path, e))
        })?;

        if !envelope.success {
            debug!(url = %url, "Catalog reported an unsuccessful lookup");
            return Ok(None);
        }

        Ok(envelope.data)
    }
}
