use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// Artist name used when the catalog lists no artist for a track.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: String,
    pub expires_in: u64,
    pub obtained_at: u64,
}

/// A signed-in user as kept in the document store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub display_name: String,
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Tabled)]
pub struct UserTableRow {
    pub id: String,
    pub display_name: String,
}

/// Per-album list of playlist URIs remembered between runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedTracks {
    pub album_id: String,
    pub uris: Vec<String>,
    pub cached_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Pipeline values
// ---------------------------------------------------------------------------

/// One track of the album being turned into a playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumTrack {
    /// Zero-based position in the album.
    pub index: usize,
    pub name: String,
    pub artist: String,
    pub uri: String,
}

impl AlbumTrack {
    /// The "song by artist" label used in exclusion lists.
    pub fn label(&self) -> String {
        song_label(&self.name, &self.artist)
    }
}

/// A hypothesized source song, not yet looked up in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleCandidate {
    pub artist: String,
    pub name: String,
}

impl SampleCandidate {
    pub fn label(&self) -> String {
        song_label(&self.name, &self.artist)
    }
}

/// Outcome of resolving one album track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPair {
    pub index: usize,
    pub original_uri: String,
    pub sampled_uri: Option<String>,
    /// The candidate the sampled URI was resolved from.
    pub candidate: Option<SampleCandidate>,
}

impl ResolvedPair {
    pub fn unsampled(track: &AlbumTrack) -> Self {
        Self {
            index: track.index,
            original_uri: track.uri.clone(),
            sampled_uri: None,
            candidate: None,
        }
    }
}

#[derive(Tabled)]
pub struct ResolvedTableRow {
    #[tabled(rename = "#")]
    pub position: usize,
    pub track: String,
    pub sample: String,
}

/// Name, description and visibility of a playlist to create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistSpec {
    pub name: String,
    pub description: String,
    pub public: bool,
}

impl PlaylistSpec {
    pub fn for_album(album_name: &str) -> Self {
        Self {
            name: format!("Titled - Inspired Songs from {}", album_name),
            description: "Generated playlist from Titled.".to_string(),
            public: true,
        }
    }
}

/// A playlist as returned by the catalog after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPlaylist {
    pub id: String,
    pub uri: String,
    pub external_url: String,
}

/// Final result of one generation request.
#[derive(Debug, Clone)]
pub struct GeneratedPlaylist {
    pub playlist: CreatedPlaylist,
    pub album_name: String,
    pub uris: Vec<String>,
    /// Per-track outcomes; empty when the URIs came from the cache.
    pub pairs: Vec<ResolvedPair>,
    pub from_cache: bool,
}

pub fn song_label(name: &str, artist: &str) -> String {
    format!("{} by {}", name, artist)
}

// ---------------------------------------------------------------------------
// Spotify wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimpleArtist {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paging<T> {
    pub items: Vec<T>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub total: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub tracks: Paging<Track>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistRequest {
    pub name: String,
    pub description: String,
    pub public: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalUrls {
    #[serde(default)]
    pub spotify: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePlaylistResponse {
    pub id: String,
    pub uri: String,
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddTrackToPlaylistRequest {
    pub uris: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}
