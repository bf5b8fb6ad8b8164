//! Configuration management for the Titled service.
//!
//! Configuration is read once at process start into a [`Config`] value that
//! is handed to every component that needs it. Values come from:
//! 1. Environment variables (highest priority)
//! 2. A `.env` file in the local data directory (`<data_local_dir>/titled/.env`)
//! 3. Built-in defaults for everything that is not a secret

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use crate::{
    error::{Error, Result},
    pipeline::Strategy,
    sources::SourceKind,
};

const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";
const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_SPOTIFY_SCOPE: &str = "user-read-private user-read-email playlist-modify-private playlist-modify-public playlist-read-private";
const DEFAULT_SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_GENIUS_API_URL: &str = "https://api.genius.com";
const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-2024-08-06";

/// Loads environment variables from the `.env` file in the local data
/// directory.
///
/// The directory is created when missing. A missing `.env` file is not an
/// error: every value can also come straight from the process environment.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/titled/.env`
/// - macOS: `~/Library/Application Support/titled/.env`
/// - Windows: `%LOCALAPPDATA%/titled/.env`
pub async fn load_env() -> Result<()> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path)
            .map_err(|e| Error::Config(format!("cannot read {}: {}", path.display(), e)))?;
    }

    Ok(())
}

/// Default data directory for the `.env` file, user documents, and caches.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("titled");
    path
}

/// Spotify application settings.
#[derive(Debug, Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
}

/// Genius (lyrics annotation) settings.
///
/// Either `access_token` or the client credentials pair must be present for
/// the annotation source to be enabled.
#[derive(Debug, Clone, Default)]
pub struct GeniusConfig {
    pub access_token: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub api_url: String,
}

/// OpenAI (inference) settings. The source is enabled when `api_key` is set.
#[derive(Debug, Clone, Default)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
}

/// Complete runtime configuration of the service.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    /// Public URL of the service; the OAuth redirect is `<base_url>/callback`.
    pub base_url: String,
    pub spotify: SpotifyConfig,
    pub genius: GeniusConfig,
    pub openai: OpenAiConfig,
    /// Sample sources in priority order.
    pub sample_sources: Vec<SourceKind>,
    pub strategy: Strategy,
    pub track_timeout: Duration,
    pub request_timeout: Duration,
    pub cache_ttl: Duration,
    pub data_dir: PathBuf,
}

impl Config {
    /// Builds the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required =
            |key: &str| get(key).ok_or_else(|| Error::Config(format!("{key} must be set")));
        let or_default = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let spotify = SpotifyConfig {
            client_id: required("SPOTIFY_API_AUTH_CLIENT_ID")?,
            client_secret: required("SPOTIFY_API_AUTH_CLIENT_SECRET")?,
            scope: or_default("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SPOTIFY_SCOPE),
            auth_url: or_default("SPOTIFY_API_AUTH_URL", DEFAULT_SPOTIFY_AUTH_URL),
            token_url: or_default("SPOTIFY_API_TOKEN_URL", DEFAULT_SPOTIFY_TOKEN_URL),
            api_url: trim_url(or_default("SPOTIFY_API_URL", DEFAULT_SPOTIFY_API_URL)),
        };

        let genius = GeniusConfig {
            access_token: get("GENIUS_ACCESS_TOKEN"),
            client_id: get("GENIUS_CLIENT_ID"),
            client_secret: get("GENIUS_CLIENT_SECRET"),
            api_url: trim_url(or_default("GENIUS_API_URL", DEFAULT_GENIUS_API_URL)),
        };

        let openai = OpenAiConfig {
            api_key: get("OPENAI_API_KEY"),
            api_url: trim_url(or_default("OPENAI_API_URL", DEFAULT_OPENAI_API_URL)),
            model: or_default("OPENAI_MODEL", DEFAULT_OPENAI_MODEL),
        };

        let sample_sources = match get("TITLED_SAMPLE_SOURCES") {
            Some(list) => parse_sources(&list)?,
            None => vec![SourceKind::Genius, SourceKind::OpenAi],
        };

        let strategy = match get("TITLED_SAMPLE_STRATEGY") {
            Some(s) => Strategy::from_str(&s)?,
            None => Strategy::default(),
        };

        let data_dir = get("TITLED_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(data_dir);

        Ok(Self {
            server_address: or_default("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            base_url: trim_url(or_default("TITLED_BASE_URL", DEFAULT_BASE_URL)),
            spotify,
            genius,
            openai,
            sample_sources,
            strategy,
            track_timeout: secs(get("TITLED_TRACK_TIMEOUT_SECS"), 30, "TITLED_TRACK_TIMEOUT_SECS")?,
            request_timeout: secs(
                get("TITLED_REQUEST_TIMEOUT_SECS"),
                120,
                "TITLED_REQUEST_TIMEOUT_SECS",
            )?,
            cache_ttl: secs(get("TITLED_CACHE_TTL_HOURS"), 168, "TITLED_CACHE_TTL_HOURS")?
                * 3600,
            data_dir,
        })
    }

    /// Redirect URI registered with Spotify.
    pub fn redirect_uri(&self) -> String {
        format!("{}/callback", self.base_url)
    }
}

fn trim_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn secs(value: Option<String>, default: u64, key: &str) -> Result<Duration> {
    let n = match value {
        Some(v) => v
            .trim()
            .parse::<u64>()
            .map_err(|_| Error::Config(format!("{key} must be a whole number, got '{v}'")))?,
        None => default,
    };
    Ok(Duration::from_secs(n))
}

fn parse_sources(list: &str) -> Result<Vec<SourceKind>> {
    let mut kinds = Vec::new();
    for item in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let kind = SourceKind::from_str(item)?;
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    Ok(kinds)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn minimal() -> Vec<(&'static str, &'static str)> {
        vec![
            ("SPOTIFY_API_AUTH_CLIENT_ID", "client"),
            ("SPOTIFY_API_AUTH_CLIENT_SECRET", "secret"),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&minimal())).unwrap();
        assert_eq!(config.server_address, DEFAULT_SERVER_ADDRESS);
        assert_eq!(config.spotify.api_url, DEFAULT_SPOTIFY_API_URL);
        assert_eq!(
            config.sample_sources,
            vec![SourceKind::Genius, SourceKind::OpenAi]
        );
        assert_eq!(config.strategy, Strategy::Sequential);
        assert_eq!(config.track_timeout, Duration::from_secs(30));
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert_eq!(config.cache_ttl, Duration::from_secs(168 * 3600));
        assert!(config.openai.api_key.is_none());
        assert_eq!(config.redirect_uri(), "http://localhost:8080/callback");
    }

    #[test]
    fn test_missing_client_secret_is_reported_by_name() {
        let err = Config::from_lookup(lookup(&[("SPOTIFY_API_AUTH_CLIENT_ID", "client")]))
            .unwrap_err();
        assert!(err.to_string().contains("SPOTIFY_API_AUTH_CLIENT_SECRET"));
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let mut pairs = minimal();
        pairs.push(("OPENAI_API_KEY", "  "));
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert!(config.openai.api_key.is_none());
    }

    #[test]
    fn test_source_order_and_strategy_are_configurable() {
        let mut pairs = minimal();
        pairs.push(("TITLED_SAMPLE_SOURCES", "openai, genius, openai"));
        pairs.push(("TITLED_SAMPLE_STRATEGY", "first-success"));
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(
            config.sample_sources,
            vec![SourceKind::OpenAi, SourceKind::Genius]
        );
        assert_eq!(config.strategy, Strategy::FirstSuccess);
    }

    #[test]
    fn test_unknown_source_is_rejected() {
        let mut pairs = minimal();
        pairs.push(("TITLED_SAMPLE_SOURCES", "genius,whosampled"));
        assert!(Config::from_lookup(lookup(&pairs)).is_err());
    }

    #[test]
    fn test_bad_timeout_is_rejected() {
        let mut pairs = minimal();
        pairs.push(("TITLED_TRACK_TIMEOUT_SECS", "soon"));
        let err = Config::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(err.to_string().contains("TITLED_TRACK_TIMEOUT_SECS"));
    }

    #[test]
    fn test_trailing_slashes_are_trimmed() {
        let mut pairs = minimal();
        pairs.push(("SPOTIFY_API_URL", "http://127.0.0.1:9000/v1/"));
        pairs.push(("TITLED_BASE_URL", "https://titled.example/"));
        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.spotify.api_url, "http://127.0.0.1:9000/v1");
        assert_eq!(config.redirect_uri(), "https://titled.example/callback");
    }
}
