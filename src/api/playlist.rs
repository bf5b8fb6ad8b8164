use std::sync::Arc;

use axum::{
    Extension, Form,
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use super::{ApiError, cookies, pages};
use crate::{error::Error, service::TitledService, utils};

/// Form posted by the home page.
#[derive(Debug, Deserialize)]
pub struct GenerateForm {
    #[serde(rename = "userID")]
    pub user_id: String,
    #[serde(rename = "albumURL")]
    pub album_url: String,
    #[serde(rename = "accessToken", default)]
    pub access_token: String,
}

/// Album form for a signed-in user; anyone else goes back to `/`.
pub async fn home(headers: HeaderMap) -> Response {
    match (
        cookies::read(&headers, cookies::USER_COOKIE),
        cookies::read(&headers, cookies::TOKEN_COOKIE),
    ) {
        (Some(user_id), Some(token)) => Html(pages::home(&user_id, &token)).into_response(),
        _ => Redirect::to("/").into_response(),
    }
}

/// Generates the playlist and renders a link to it.
///
/// Without an access token the stored refresh token of the user is used,
/// but only for the user the session cookie belongs to.
pub async fn generate_playlist(
    Extension(service): Extension<Arc<TitledService>>,
    headers: HeaderMap,
    Form(form): Form<GenerateForm>,
) -> Result<Html<String>, ApiError> {
    let album_id = utils::parse_album_id(&form.album_url)?;

    let access_token = if form.access_token.trim().is_empty() {
        let session_user = cookies::read(&headers, cookies::USER_COOKIE);
        if session_user.as_deref() != Some(form.user_id.as_str()) {
            tracing::warn!(
                user = %form.user_id,
                session = ?session_user,
                "token refresh requested outside the user's session"
            );
            return Err(Error::Auth("sign in to generate playlists".to_string()).into());
        }
        service.refresh_user(&form.user_id).await?.access_token
    } else {
        form.access_token
    };

    tracing::info!(album = %album_id, user = %form.user_id, "generating playlist");
    let generated = service
        .generate_playlist(&album_id, &form.user_id, &access_token)
        .await?;

    tracing::info!(
        playlist = %generated.playlist.id,
        uri = %generated.playlist.uri,
        cached = generated.from_cache,
        "playlist generated"
    );

    Ok(Html(pages::playlist(
        &generated.playlist.external_url,
        &generated.playlist.id,
        &generated.album_name,
        generated.uris.len(),
    )))
}
