//! In-memory stand-ins for the catalog, the playlist gateway and the
//! sample sources.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;

use titled::{
    Error, Result,
    config::Config,
    sources::SampleSource,
    spotify::{Catalog, PlaylistGateway},
    types::{Album, AlbumTrack, CreatedPlaylist, PlaylistSpec, SampleCandidate, song_label},
};

pub fn track(index: usize, name: &str, artist: &str) -> AlbumTrack {
    AlbumTrack {
        index,
        name: name.to_string(),
        artist: artist.to_string(),
        uri: format!("spotify:track:{}", name.to_lowercase().replace(' ', "-")),
    }
}

/// Configuration pointing every Spotify endpoint at `spotify_url` and
/// keeping documents under `data_dir`.
pub fn config(spotify_url: &str, data_dir: &Path) -> Config {
    config_with(spotify_url, data_dir, &[])
}

/// Same as [`config`] with additional environment entries.
pub fn config_with(spotify_url: &str, data_dir: &Path, extra: &[(&'static str, &str)]) -> Config {
    let mut env = HashMap::new();
    env.insert("SPOTIFY_API_AUTH_CLIENT_ID", "client-123".to_string());
    env.insert("SPOTIFY_API_AUTH_CLIENT_SECRET", "secret".to_string());
    env.insert("SPOTIFY_API_URL", spotify_url.to_string());
    env.insert("SPOTIFY_API_AUTH_URL", format!("{}/authorize", spotify_url));
    env.insert("SPOTIFY_API_TOKEN_URL", format!("{}/api/token", spotify_url));
    env.insert("TITLED_DATA_DIR", data_dir.display().to_string());
    for (key, value) in extra {
        env.insert(*key, value.to_string());
    }
    Config::from_lookup(|key| env.get(key).cloned()).unwrap()
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeCatalog {
    pub album_name: String,
    pub tracks: Vec<AlbumTrack>,
    /// "name by artist" -> URI
    pub search: HashMap<String, String>,
    pub fail_album: bool,
    pub fail_search: bool,
    pub searches: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new(album_name: &str, tracks: Vec<AlbumTrack>) -> Self {
        Self {
            album_name: album_name.to_string(),
            tracks,
            ..Default::default()
        }
    }

    pub fn with_song(mut self, name: &str, artist: &str, uri: &str) -> Self {
        self.search.insert(song_label(name, artist), uri.to_string());
        self
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn album(&self, album_id: &str) -> Result<Album> {
        if self.fail_album {
            return Err(Error::Http {
                service: "Spotify",
                status: 500,
                body: "boom".to_string(),
            });
        }
        Ok(Album {
            id: album_id.to_string(),
            name: self.album_name.clone(),
            artists: Vec::new(),
        })
    }

    async fn album_tracks(&self, _album_id: &str) -> Result<Vec<AlbumTrack>> {
        Ok(self.tracks.clone())
    }

    async fn search_track(&self, name: &str, artist: &str) -> Result<Option<String>> {
        let label = song_label(name, artist);
        self.searches.lock().unwrap().push(label.clone());
        if self.fail_search {
            return Err(Error::Timeout("search".to_string()));
        }
        Ok(self.search.get(&label).cloned())
    }
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeGateway {
    pub created: Mutex<Vec<(String, PlaylistSpec)>>,
    pub added: Mutex<Vec<(String, Vec<String>, Option<u32>)>>,
    pub fail_create: bool,
    pub fail_add: bool,
}

impl FakeGateway {
    pub fn added_uris(&self) -> Vec<String> {
        self.added
            .lock()
            .unwrap()
            .iter()
            .flat_map(|(_, uris, _)| uris.clone())
            .collect()
    }
}

#[async_trait]
impl PlaylistGateway for FakeGateway {
    async fn create(&self, owner_id: &str, spec: &PlaylistSpec) -> Result<CreatedPlaylist> {
        if self.fail_create {
            return Err(Error::Http {
                service: "Spotify",
                status: 403,
                body: "forbidden".to_string(),
            });
        }
        self.created
            .lock()
            .unwrap()
            .push((owner_id.to_string(), spec.clone()));
        Ok(CreatedPlaylist {
            id: "playlist-1".to_string(),
            uri: "spotify:playlist:playlist-1".to_string(),
            external_url: "https://open.spotify.com/playlist/playlist-1".to_string(),
        })
    }

    async fn add_tracks(
        &self,
        playlist_id: &str,
        uris: &[String],
        position: Option<u32>,
    ) -> Result<()> {
        if self.fail_add {
            return Err(Error::Http {
                service: "Spotify",
                status: 400,
                body: "bad uris".to_string(),
            });
        }
        self.added
            .lock()
            .unwrap()
            .push((playlist_id.to_string(), uris.to_vec(), position));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sample sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Answer {
    Found { artist: String, name: String },
    Absent,
    Fail,
    Panic,
}

pub fn found(name: &str, artist: &str) -> Answer {
    Answer::Found {
        artist: artist.to_string(),
        name: name.to_string(),
    }
}

/// A source answering from a script keyed by song name.
pub struct ScriptedSource {
    pub name: &'static str,
    pub answers: HashMap<String, Answer>,
    pub delays: HashMap<String, Duration>,
    /// (song, excluded snapshot) per call
    pub calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl ScriptedSource {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            answers: HashMap::new(),
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn answer(mut self, song: &str, answer: Answer) -> Self {
        self.answers.insert(song.to_string(), answer);
        self
    }

    pub fn delay(mut self, song: &str, delay: Duration) -> Self {
        self.delays.insert(song.to_string(), delay);
        self
    }

    pub fn called_for(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(song, _)| song.clone())
            .collect()
    }

    pub fn excluded_for(&self, song: &str) -> Option<Vec<String>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .find(|(s, _)| s == song)
            .map(|(_, excluded)| excluded.clone())
    }

    pub fn into_arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[async_trait]
impl SampleSource for ScriptedSource {
    fn name(&self) -> &str {
        self.name
    }

    async fn find(
        &self,
        song: &str,
        _artist: &str,
        excluded: &[String],
    ) -> Result<Option<SampleCandidate>> {
        self.calls
            .lock()
            .unwrap()
            .push((song.to_string(), excluded.to_vec()));

        if let Some(delay) = self.delays.get(song) {
            tokio::time::sleep(*delay).await;
        }

        match self.answers.get(song).cloned().unwrap_or(Answer::Absent) {
            Answer::Found { artist, name } => Ok(Some(SampleCandidate { artist, name })),
            Answer::Absent => Ok(None),
            Answer::Fail => Err(Error::Http {
                service: "Fake",
                status: 503,
                body: "unavailable".to_string(),
            }),
            Answer::Panic => panic!("scripted panic for {}", song),
        }
    }
}
