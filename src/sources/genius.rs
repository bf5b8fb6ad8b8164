//! Genius annotation source.
//!
//! Genius keeps a relationship graph per song ("samples", "sampled in",
//! "interpolates", ...). The source searches for the track, opens the top
//! hit, and returns the first song listed under a "samples" relationship.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::OnceCell;

use super::SampleSource;
use crate::{
    config::GeniusConfig,
    error::{Error, Result},
    types::SampleCandidate,
    utils,
};

const SERVICE: &str = "Genius";

/// Relationship type that marks a sampled song.
const SAMPLES_RELATIONSHIP: &str = "samples";

// ---------------------------------------------------------------------------
// API response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    response: T,
}

#[derive(Debug, Deserialize)]
struct SearchBody {
    #[serde(default)]
    hits: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    result: HitResult,
}

#[derive(Debug, Deserialize)]
struct HitResult {
    id: u64,
    #[serde(default)]
    full_title: String,
}

#[derive(Debug, Deserialize)]
struct SongBody {
    song: Song,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    #[serde(default)]
    access_token: String,
}

/// A Genius song with its relationship graph.
#[derive(Debug, Clone, Deserialize)]
pub struct Song {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub song_relationships: Vec<SongRelationship>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SongRelationship {
    #[serde(rename = "type")]
    pub relationship_type: String,
    #[serde(default)]
    pub songs: Vec<RelatedSong>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelatedSong {
    pub title: String,
    #[serde(default)]
    pub primary_artist_names: String,
}

/// Search hit reduced to what the source needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub id: u64,
    pub full_title: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
enum Credentials {
    Token(String),
    Client { id: String, secret: String },
}

/// Genius API client.
///
/// Authenticates either with a fixed access token or, when only client
/// credentials are configured, with a client-credentials grant performed
/// on first use.
#[derive(Debug)]
pub struct GeniusClient {
    http: Client,
    api_url: String,
    credentials: Credentials,
    token: OnceCell<String>,
}

impl GeniusClient {
    pub fn with_token(http: Client, api_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            credentials: Credentials::Token(token.into()),
            token: OnceCell::new(),
        }
    }

    pub fn with_client_credentials(
        http: Client,
        api_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            credentials: Credentials::Client {
                id: client_id.into(),
                secret: client_secret.into(),
            },
            token: OnceCell::new(),
        }
    }

    /// `None` when neither an access token nor client credentials are set.
    pub fn from_config(http: Client, config: &GeniusConfig) -> Option<Self> {
        if let Some(token) = &config.access_token {
            return Some(Self::with_token(http, &config.api_url, token));
        }
        match (&config.client_id, &config.client_secret) {
            (Some(id), Some(secret)) => Some(Self::with_client_credentials(
                http,
                &config.api_url,
                id,
                secret,
            )),
            _ => None,
        }
    }

    async fn access_token(&self) -> Result<&str> {
        let token = self
            .token
            .get_or_try_init(|| async {
                match &self.credentials {
                    Credentials::Token(token) => Ok(token.clone()),
                    Credentials::Client { id, secret } => self.client_credentials(id, secret).await,
                }
            })
            .await?;
        Ok(token.as_str())
    }

    async fn client_credentials(&self, id: &str, secret: &str) -> Result<String> {
        let response = self
            .http
            .post(format!("{}/oauth/token", self.api_url))
            .form(&[
                ("client_id", id),
                ("client_secret", secret),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?;

        let body = match utils::check_status(SERVICE, response).await {
            Ok(response) => response
                .json::<TokenBody>()
                .await
                .map_err(|e| Error::parse(SERVICE, e))?,
            Err(Error::Http { status, body, .. }) => {
                return Err(Error::Auth(format!(
                    "Genius token endpoint returned {}: {}",
                    status, body
                )));
            }
            Err(e) => return Err(e),
        };

        if body.access_token.is_empty() {
            return Err(Error::Auth(
                "Genius token response has no access token".to_string(),
            ));
        }

        tracing::debug!("obtained Genius access token");
        Ok(body.access_token)
    }

    /// Full-text search; hits come back in API relevance order.
    pub async fn search(&self, query: &str) -> Result<Vec<Hit>> {
        let token = self.access_token().await?;
        let response = self
            .http
            .get(format!("{}/search", self.api_url))
            .bearer_auth(token)
            .query(&[("q", query)])
            .send()
            .await?;

        let body = utils::check_status(SERVICE, response)
            .await?
            .json::<Envelope<SearchBody>>()
            .await
            .map_err(|e| Error::parse(SERVICE, e))?;

        Ok(body
            .response
            .hits
            .into_iter()
            .map(|h| Hit {
                id: h.result.id,
                full_title: h.result.full_title,
            })
            .collect())
    }

    /// Song detail including relationships.
    pub async fn song(&self, id: u64) -> Result<Song> {
        let token = self.access_token().await?;
        let response = self
            .http
            .get(format!("{}/songs/{}", self.api_url, id))
            .bearer_auth(token)
            .send()
            .await?;

        let body = utils::check_status(SERVICE, response)
            .await?
            .json::<Envelope<SongBody>>()
            .await
            .map_err(|e| Error::parse(SERVICE, e))?;

        Ok(body.response.song)
    }
}

/// First related song of the first non-empty "samples" relationship.
pub fn first_sample(song: &Song) -> Option<SampleCandidate> {
    song.song_relationships
        .iter()
        .filter(|r| r.relationship_type == SAMPLES_RELATIONSHIP)
        .find_map(|r| r.songs.first())
        .map(|related| SampleCandidate {
            artist: related.primary_artist_names.clone(),
            name: related.title.clone(),
        })
}

/// [`SampleSource`] backed by Genius song relationships.
#[derive(Debug)]
pub struct GeniusSource {
    client: GeniusClient,
}

impl GeniusSource {
    pub fn new(client: GeniusClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl SampleSource for GeniusSource {
    fn name(&self) -> &str {
        "genius"
    }

    async fn find(
        &self,
        song: &str,
        artist: &str,
        _excluded: &[String],
    ) -> Result<Option<SampleCandidate>> {
        let query = format!("{} {}", utils::strip_parenthetical(song), artist);

        let hits = self.client.search(&query).await?;
        let Some(top) = hits.first() else {
            tracing::debug!(query = %query, "genius search has no hits");
            return Ok(None);
        };

        let detail = self.client.song(top.id).await?;
        let candidate = first_sample(&detail);
        if candidate.is_none() {
            tracing::debug!(hit = %top.full_title, "genius song lists no samples");
        }

        Ok(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SONG_JSON: &str = r#"{
        "response": {
            "song": {
                "id": 378195,
                "title": "Otis",
                "url": "https://genius.com/Jay-z-and-kanye-west-otis-lyrics",
                "song_relationships": [
                    {"type": "sampled_in", "songs": [{"title": "Other", "primary_artist_names": "Someone"}]},
                    {"type": "samples", "songs": []},
                    {"type": "samples", "songs": [
                        {"title": "Try a Little Tenderness", "primary_artist_names": "Otis Redding"},
                        {"title": "Don't Tell a Lie About Me and I Won't Tell the Truth on You", "primary_artist_names": "James Brown"}
                    ]}
                ]
            }
        }
    }"#;

    #[test]
    fn test_song_response_deserializes() {
        let body: Envelope<SongBody> = serde_json::from_str(SONG_JSON).unwrap();
        assert_eq!(body.response.song.id, 378195);
        assert_eq!(body.response.song.song_relationships.len(), 3);
    }

    #[test]
    fn test_first_sample_skips_other_and_empty_relationships() {
        let body: Envelope<SongBody> = serde_json::from_str(SONG_JSON).unwrap();
        let candidate = first_sample(&body.response.song).unwrap();
        assert_eq!(candidate.name, "Try a Little Tenderness");
        assert_eq!(candidate.artist, "Otis Redding");
    }

    #[test]
    fn test_first_sample_none_without_samples_edge() {
        let song = Song {
            id: 1,
            title: "Solo".to_string(),
            song_relationships: vec![SongRelationship {
                relationship_type: "interpolates".to_string(),
                songs: vec![RelatedSong {
                    title: "X".to_string(),
                    primary_artist_names: "Y".to_string(),
                }],
            }],
        };
        assert!(first_sample(&song).is_none());
    }

    #[test]
    fn test_search_response_without_hits() {
        let body: Envelope<SearchBody> =
            serde_json::from_str(r#"{"response": {"hits": []}}"#).unwrap();
        assert!(body.response.hits.is_empty());
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let config = GeniusConfig {
            api_url: "https://api.genius.com".to_string(),
            ..Default::default()
        };
        assert!(GeniusClient::from_config(Client::new(), &config).is_none());

        let config = GeniusConfig {
            client_id: Some("id".to_string()),
            client_secret: Some("secret".to_string()),
            api_url: "https://api.genius.com".to_string(),
            ..Default::default()
        };
        assert!(GeniusClient::from_config(Client::new(), &config).is_some());
    }
}
