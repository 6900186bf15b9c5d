//! Raw catalog records to domain types.

use cadence_core::types::{Album, Artist, Song};
use chrono::Datelike;

use crate::types::{ApiAlbum, ApiArtist, ApiLink, ApiSong};

const IMAGE_PREFERENCE: [&str; 2] = ["500x500", "150x150"];
const STREAM_PREFERENCE: [&str; 2] = ["320kbps", "160kbps"];

/// Preferred quality first, then the last entry, then nothing
fn best_link<'a>(links: &'a [ApiLink], preference: &[&str]) -> Option<&'a str> {
    preference
        .iter()
        .find_map(|quality| {
            links
                .iter()
                .find(|link| link.quality == *quality && !link.link.is_empty())
        })
        .or_else(|| links.last())
        .map(|link| link.link.as_str())
        .filter(|link| !link.is_empty())
}

pub(crate) fn best_image(images: &[ApiLink]) -> String {
    best_link(images, &IMAGE_PREFERENCE)
        .unwrap_or_default()
        .to_string()
}

pub(crate) fn best_stream_url(urls: &[ApiLink]) -> Option<String> {
    best_link(urls, &STREAM_PREFERENCE).map(str::to_string)
}

/// First id of a comma-separated artist id list
pub(crate) fn primary_id(ids: &str) -> String {
    ids.split(',').next().unwrap_or_default().trim().to_string()
}

/// Release year, or the current year when missing or malformed
pub(crate) fn parse_year(year: &str) -> i32 {
    year.trim()
        .parse()
        .ok()
        .filter(|year| *year > 0)
        .unwrap_or_else(|| chrono::Utc::now().year())
}

pub(crate) fn map_song(song: ApiSong) -> Song {
    Song {
        artist_id: primary_id(&song.primary_artists_id),
        artwork_url: best_image(&song.image),
        stream_url: best_stream_url(&song.download_url),
        duration_secs: u32::try_from(song.duration).unwrap_or(u32::MAX),
        id: song.id,
        title: song.name,
        artist: song.primary_artists,
        album: song.album.name,
        album_id: song.album.id,
    }
}

pub(crate) fn map_album(album: ApiAlbum) -> Album {
    Album {
        artist_id: primary_id(&album.primary_artists_id),
        artwork_url: best_image(&album.image),
        year: parse_year(&album.year),
        song_count: u32::try_from(album.song_count).unwrap_or(u32::MAX),
        id: album.id,
        title: album.name,
        artist: album.primary_artists,
    }
}

/// Counts are not part of search results and stay at zero
pub(crate) fn map_artist(artist: ApiArtist) -> Artist {
    Artist {
        image_url: best_image(&artist.image),
        id: artist.id,
        name: artist.name,
        album_count: 0,
        song_count: 0,
        total_duration_secs: None,
    }
}

pub(crate) fn map_songs(songs: Vec<ApiSong>) -> Vec<Song> {
    songs.into_iter().map(map_song).collect()
}

pub(crate) fn map_albums(albums: Vec<ApiAlbum>) -> Vec<Album> {
    albums.into_iter().map(map_album).collect()
}

pub(crate) fn map_artists(artists: Vec<ApiArtist>) -> Vec<Artist> {
    artists.into_iter().map(map_artist).collect()
}
