//! The service facade used by the HTTP handlers and the CLI.
//!
//! Owns everything that lives for the whole process (configuration, HTTP
//! client, stores, sample sources) and builds a per-request pipeline bound
//! to the caller's access token.

use std::sync::Arc;

use reqwest::Client;
use tokio::time::timeout;

use crate::{
    config::Config,
    error::{Error, Result},
    management::{TrackCache, UserStore},
    pipeline::{PlaylistPipeline, TrackResolver},
    sources::{self, SampleSource},
    spotify::{Catalog, SpotifyClient, auth::SpotifyAuth},
    types::{GeneratedPlaylist, User},
};

pub struct TitledService {
    config: Config,
    http: Client,
    auth: SpotifyAuth,
    users: UserStore,
    cache: TrackCache,
    sources: Vec<Arc<dyn SampleSource>>,
}

impl TitledService {
    /// Builds the service with the sources named in the configuration.
    pub fn new(config: Config) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout)
            .build()?;
        let sources = sources::from_config(&config, &http);
        Ok(Self::with_sources(config, http, sources))
    }

    /// Builds the service around an explicit list of sample sources.
    pub fn with_sources(
        config: Config,
        http: Client,
        sources: Vec<Arc<dyn SampleSource>>,
    ) -> Self {
        let auth = SpotifyAuth::new(http.clone(), config.spotify.clone(), config.redirect_uri());
        let users = UserStore::new(&config.data_dir);
        let cache = TrackCache::new(&config.data_dir, config.cache_ttl);

        Self {
            config,
            http,
            auth,
            users,
            cache,
            sources,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn auth(&self) -> &SpotifyAuth {
        &self.auth
    }

    pub fn users(&self) -> &UserStore {
        &self.users
    }

    pub fn spotify(&self, access_token: &str) -> SpotifyClient {
        SpotifyClient::new(self.http.clone(), &self.config.spotify.api_url, access_token)
    }

    fn pipeline(&self, access_token: &str) -> PlaylistPipeline {
        let client = Arc::new(self.spotify(access_token));
        let resolver = TrackResolver::new(
            self.sources.clone(),
            client.clone(),
            self.config.strategy,
        );
        PlaylistPipeline::new(
            client.clone(),
            client,
            resolver,
            self.config.track_timeout,
            self.config.request_timeout,
        )
    }

    /// Creates the sample playlist for `album_id` on behalf of `user_id`.
    ///
    /// Album URIs resolved within the cache TTL are reused without asking
    /// the sample sources again.
    pub async fn generate_playlist(
        &self,
        album_id: &str,
        user_id: &str,
        access_token: &str,
    ) -> Result<GeneratedPlaylist> {
        self.generate(album_id, user_id, access_token, true).await
    }

    /// Same as [`generate_playlist`](Self::generate_playlist) but always
    /// resolves samples again.
    pub async fn generate_playlist_uncached(
        &self,
        album_id: &str,
        user_id: &str,
        access_token: &str,
    ) -> Result<GeneratedPlaylist> {
        self.generate(album_id, user_id, access_token, false).await
    }

    async fn generate(
        &self,
        album_id: &str,
        user_id: &str,
        access_token: &str,
        use_cache: bool,
    ) -> Result<GeneratedPlaylist> {
        if user_id.trim().is_empty() {
            return Err(Error::InvalidInput("user id is required".to_string()));
        }
        if access_token.trim().is_empty() {
            return Err(Error::Auth("access token is required".to_string()));
        }

        let request_timeout = self.config.request_timeout;
        match timeout(
            request_timeout,
            self.generate_within_deadline(album_id, user_id, access_token, use_cache),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    album = %album_id,
                    timeout_secs = request_timeout.as_secs(),
                    "playlist generation exceeded the request timeout"
                );
                Err(Error::Timeout(format!("album {}", album_id)))
            }
        }
    }

    async fn generate_within_deadline(
        &self,
        album_id: &str,
        user_id: &str,
        access_token: &str,
        use_cache: bool,
    ) -> Result<GeneratedPlaylist> {
        let pipeline = self.pipeline(access_token);

        if use_cache {
            if let Some(uris) = self.cache.get(album_id).await {
                let album = pipeline.catalog().album(album_id).await?;
                let playlist = pipeline.assemble(&album.name, user_id, &uris).await?;
                return Ok(GeneratedPlaylist {
                    playlist,
                    album_name: album.name,
                    uris,
                    pairs: Vec::new(),
                    from_cache: true,
                });
            }
        }

        let generated = pipeline.run(album_id, user_id).await?;
        self.cache.put(album_id, &generated.uris).await;
        Ok(generated)
    }

    /// Completes a browser sign-in: exchanges the code, reads the profile
    /// and stores the user.
    pub async fn sign_in(&self, code: &str, verifier: &str) -> Result<User> {
        let token = self.auth.exchange_code(code, verifier).await?;
        let profile = self.spotify(&token.access_token).current_user().await?;

        let user = User {
            display_name: profile.display_name.unwrap_or_else(|| profile.id.clone()),
            id: profile.id,
            access_token: token.access_token,
            refresh_token: token.refresh_token.unwrap_or_default(),
        };
        self.users.upsert(&user).await?;

        tracing::info!(user = %user.id, "user signed in");
        Ok(user)
    }

    /// Trades a stored user's refresh token for a new access token and
    /// saves it.
    pub async fn refresh_user(&self, user_id: &str) -> Result<User> {
        let mut user = self
            .users
            .get(user_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("user {}", user_id)))?;

        if user.refresh_token.is_empty() {
            return Err(Error::Auth(format!("user {} has no refresh token", user_id)));
        }

        let token = self.auth.refresh_access_token(&user.refresh_token).await?;
        user.access_token = token.access_token;
        if let Some(refresh) = token.refresh_token {
            user.refresh_token = refresh;
        }
        self.users.upsert(&user).await?;

        tracing::debug!(user = %user.id, "access token refreshed");
        Ok(user)
    }
}
