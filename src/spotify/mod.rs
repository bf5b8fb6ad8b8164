//! # Spotify Integration Module
//!
//! Everything Titled needs from the Spotify Web API, split by concern:
//!
//! ```text
//! Pipeline / Service
//!          ↓
//! Catalog + PlaylistGateway traits
//!          ↓
//! SpotifyClient (per user access token)
//!     ├── albums    GET /albums/{id}, GET /albums/{id}/tracks
//!     ├── tracks    GET /search?type=track
//!     ├── users     GET /me
//!     └── playlist  POST /users/{id}/playlists, POST /playlists/{id}/tracks
//!          ↓
//! reqwest → Spotify Web API
//! ```
//!
//! [`auth`] holds the credential provider: authorization-code exchange and
//! refresh-token exchange against the accounts service.
//!
//! All calls are single-shot; non-2xx answers surface as
//! [`Error::Http`](crate::Error::Http) with status and body.

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    error::Result,
    types::{Album, AlbumTrack, CreatedPlaylist, PlaylistSpec},
};

pub mod albums;
pub mod auth;
pub mod playlist;
pub mod tracks;
pub mod users;

pub(crate) const SERVICE: &str = "Spotify";

/// Read side of the music catalog used by the pipeline.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn album(&self, album_id: &str) -> Result<Album>;

    /// All tracks of the album in album order, `index` starting at 0.
    async fn album_tracks(&self, album_id: &str) -> Result<Vec<AlbumTrack>>;

    /// Best match for `track:<name> artist:<artist>`, `None` on zero hits.
    async fn search_track(&self, name: &str, artist: &str) -> Result<Option<String>>;
}

/// Playlist creation and population.
#[async_trait]
pub trait PlaylistGateway: Send + Sync {
    async fn create(&self, owner_id: &str, spec: &PlaylistSpec) -> Result<CreatedPlaylist>;

    async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
        position: Option<u32>,
    ) -> Result<()>;
}

/// Spotify Web API client bound to one user's access token.
#[derive(Debug, Clone)]
pub struct SpotifyClient {
    http: Client,
    api_url: String,
    access_token: String,
}

impl SpotifyClient {
    /// `api_url` is the Web API base, e.g. `https://api.spotify.com/v1`.
    pub fn new(http: Client, api_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }
}

#[async_trait]
impl Catalog for SpotifyClient {
    async fn album(&self, album_id: &str) -> Result<Album> {
        self.get_album(album_id).await
    }

    async fn album_tracks(&self, album_id: &str) -> Result<Vec<AlbumTrack>> {
        self.get_album_tracks(album_id).await
    }

    async fn search_track(&self, name: &str, artist: &str) -> Result<Option<String>> {
        self.get_track_uri(name, artist).await
    }
}

#[async_trait]
impl PlaylistGateway for SpotifyClient {
    async fn create(&self, owner_id: &str, spec: &PlaylistSpec) -> Result<CreatedPlaylist> {
        self.create_playlist(owner_id, spec).await
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
        position: Option<u32>,
    ) -> Result<()> {
        self.add_to_playlist(playlist_id, uris, position).await
    }
}
