//! Catalog client configuration, public result types and raw wire records.

use cadence_core::types::{Album, Artist, Song};
use serde::{Deserialize, Deserializer, Serialize};

/// Default public catalog endpoint.
pub const DEFAULT_BASE_URL: &str = "https://saavn.sumit.co";

/// Catalog client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Base URL, without a trailing `/api`
    pub base_url: String,

    /// Whole-request timeout
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 15,
        }
    }
}

impl CatalogConfig {
    /// Create a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// What to search for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    Songs,
    Albums,
    Artists,
}

impl SearchKind {
    /// Path segment of the search endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Songs => "songs",
            Self::Albums => "albums",
            Self::Artists => "artists",
        }
    }

    /// Parse from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "songs" | "song" => Some(Self::Songs),
            "albums" | "album" => Some(Self::Albums),
            "artists" | "artist" => Some(Self::Artists),
            _ => None,
        }
    }
}

/// Mapped results of a single-kind search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResults {
    Songs(Vec<Song>),
    Albums(Vec<Album>),
    Artists(Vec<Artist>),
}

impl SearchResults {
    pub fn len(&self) -> usize {
        match self {
            Self::Songs(items) => items.len(),
            Self::Albums(items) => items.len(),
            Self::Artists(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Results of a search across every kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CombinedResults {
    pub songs: Vec<Song>,
    pub albums: Vec<Album>,
    pub artists: Vec<Artist>,
}

/// An album together with its track list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumDetails {
    pub album: Album,
    pub songs: Vec<Song>,
}

/// Content for the home screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeFeed {
    pub trending: Vec<Song>,
    pub new_releases: Vec<Album>,
    pub top_artists: Vec<Artist>,
}

// ===== Wire records =====
//
// The catalog is loose about types: counts and years arrive as numbers or
// numeric strings, and any field may be null or missing.

/// Response envelope shared by every endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub(crate) struct ApiResults<T> {
    #[serde(default, deserialize_with = "nullable")]
    pub results: Vec<T>,
}

impl<T> Default for ApiResults<T> {
    fn default() -> Self {
        Self {
            results: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiSearchAll {
    #[serde(default, deserialize_with = "nullable")]
    pub songs: ApiResults<ApiSong>,
    #[serde(default, deserialize_with = "nullable")]
    pub albums: ApiResults<ApiAlbum>,
    #[serde(default, deserialize_with = "nullable")]
    pub artists: ApiResults<ApiArtist>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiArtistSongs {
    #[serde(default, deserialize_with = "nullable")]
    pub songs: Vec<ApiSong>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiArtistAlbums {
    #[serde(default, deserialize_with = "nullable")]
    pub albums: Vec<ApiAlbum>,
}

/// Quality-tagged link (images and streams).
#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiLink {
    #[serde(default, deserialize_with = "nullable")]
    pub quality: String,
    #[serde(default, alias = "url", deserialize_with = "nullable")]
    pub link: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiAlbumRef {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiSong {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub album: ApiAlbumRef,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub duration: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub primary_artists: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub primary_artists_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub image: Vec<ApiLink>,
    #[serde(default, deserialize_with = "nullable")]
    pub download_url: Vec<ApiLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiAlbum {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub year: String,
    #[serde(default, deserialize_with = "nullable")]
    pub primary_artists: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub primary_artists_id: String,
    #[serde(default, deserialize_with = "lenient_u64")]
    pub song_count: u64,
    #[serde(default, deserialize_with = "nullable")]
    pub image: Vec<ApiLink>,
    #[serde(default, deserialize_with = "nullable")]
    pub songs: Vec<ApiSong>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub(crate) struct ApiArtist {
    #[serde(default, deserialize_with = "lenient_text")]
    pub id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub image: Vec<ApiLink>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Unsigned(u64),
    Signed(i64),
    Float(f64),
    Text(String),
    Flag(bool),
}

/// `null` becomes the default value
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Number or numeric string; anything else is 0
fn lenient_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Unsigned(n)) => n,
        Some(Scalar::Float(n)) if n >= 0.0 => n as u64,
        Some(Scalar::Text(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

/// String or number rendered as text
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Scalar>::deserialize(deserializer)? {
        Some(Scalar::Text(s)) => s,
        Some(Scalar::Unsigned(n)) => n.to_string(),
        Some(Scalar::Signed(n)) => n.to_string(),
        Some(Scalar::Float(n)) => n.to_string(),
        Some(Scalar::Flag(_)) | None => String::new(),
    })
}
