use chrono::Utc;
use reqwest::Client;

use super::SERVICE;
use crate::{
    config::SpotifyConfig,
    error::{Error, Result},
    types::{Token, TokenResponse},
    utils,
};

/// Fallback lifetime when the accounts service omits `expires_in`.
const DEFAULT_EXPIRES_IN: u64 = 3600;

/// Credential provider for the Spotify accounts service.
///
/// Builds the authorize URL for the browser leg of the authorization-code
/// flow, then exchanges codes and refresh tokens for access tokens. Token
/// requests authenticate with HTTP Basic (client id and secret).
#[derive(Debug, Clone)]
pub struct SpotifyAuth {
    http: Client,
    config: SpotifyConfig,
    redirect_uri: String,
}

impl SpotifyAuth {
    pub fn new(http: Client, config: SpotifyConfig, redirect_uri: impl Into<String>) -> Self {
        Self {
            http,
            config,
            redirect_uri: redirect_uri.into(),
        }
    }

    /// URL the user is sent to for granting access.
    ///
    /// `code_challenge` is the S256 challenge of the verifier that will be
    /// passed to [`exchange_code`](Self::exchange_code).
    pub fn authorize_url(&self, state: &str, code_challenge: &str) -> Result<String> {
        let url = reqwest::Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("response_type", "code"),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("state", state),
                ("scope", self.config.scope.as_str()),
                ("code_challenge_method", "S256"),
                ("code_challenge", code_challenge),
            ],
        )
        .map_err(|e| Error::Config(format!("invalid SPOTIFY_API_AUTH_URL: {}", e)))?;

        Ok(url.into())
    }

    /// Exchanges an authorization code for a token.
    pub async fn exchange_code(&self, code: &str, verifier: &str) -> Result<Token> {
        self.request_token(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("code_verifier", verifier),
        ])
        .await
    }

    /// Obtains a fresh access token for a stored refresh token.
    ///
    /// When the accounts service does not rotate the refresh token, the one
    /// passed in is kept on the returned [`Token`].
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<Token> {
        let mut token = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .await?;

        if token.refresh_token.is_none() {
            token.refresh_token = Some(refresh_token.to_string());
        }

        Ok(token)
    }

    async fn request_token(&self, form: &[(&str, &str)]) -> Result<Token> {
        let response = self
            .http
            .post(&self.config.token_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(form)
            .send()
            .await?;

        let response = match utils::check_status(SERVICE, response).await {
            Ok(response) => response,
            Err(Error::Http { status, body, .. }) => {
                return Err(Error::Auth(format!("token endpoint returned {}: {}", status, body)));
            }
            Err(e) => return Err(e),
        };

        let body = response
            .json::<TokenResponse>()
            .await
            .map_err(|e| Error::parse(SERVICE, e))?;

        into_token(body)
    }
}

fn into_token(body: TokenResponse) -> Result<Token> {
    if body.access_token.is_empty() {
        return Err(Error::Auth("token response has no access token".to_string()));
    }

    Ok(Token {
        access_token: body.access_token,
        refresh_token: body.refresh_token.filter(|t| !t.is_empty()),
        scope: body.scope.unwrap_or_default(),
        expires_in: body.expires_in.unwrap_or(DEFAULT_EXPIRES_IN),
        obtained_at: Utc::now().timestamp() as u64,
    })
}
