use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

pub fn generate_code_verifier() -> String {
    random_string(128)
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Random value for the OAuth `state` parameter.
pub fn generate_state() -> String {
    random_string(16)
}

fn random_string(len: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Extracts the album ID from a Spotify album link, URI, or bare ID.
///
/// Accepts `https://open.spotify.com/album/<id>?si=...`,
/// `spotify:album:<id>` and `<id>`.
pub fn parse_album_id(input: &str) -> Result<String> {
    let input = input.trim();
    let id = if let Some((_, rest)) = input.split_once("/album/") {
        rest
    } else if let Some(rest) = input.strip_prefix("spotify:album:") {
        rest
    } else if input.contains('/') || input.contains(':') {
        return Err(Error::InvalidInput(format!(
            "not a Spotify album link: {}",
            input
        )));
    } else {
        input
    };

    let id = id
        .split(['?', '#', '/'])
        .next()
        .unwrap_or_default()
        .trim();

    if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Error::InvalidInput(format!(
            "not a Spotify album link: {}",
            input
        )));
    }

    Ok(id.to_string())
}

/// Drops everything from the first `(` on, e.g. `"Song (Remix)"` -> `"Song"`.
pub fn strip_parenthetical(title: &str) -> &str {
    match title.find('(') {
        Some(idx) => title[..idx].trim(),
        None => title.trim(),
    }
}

/// Turns a non-2xx response into [`Error::Http`] carrying status and body.
pub(crate) async fn check_status(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(Error::Http {
        service,
        status: status.as_u16(),
        body,
    })
}
