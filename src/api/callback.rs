use std::sync::Arc;

use axum::{
    Extension,
    extract::Query,
    http::{HeaderMap, header},
    response::{AppendHeaders, IntoResponse, Redirect},
};
use serde::Deserialize;

use super::{ApiError, cookies};
use crate::{error::Error, service::TitledService};

/// Lifetime of the session cookies; Spotify access tokens last an hour.
const SESSION_MAX_AGE: u64 = 60 * 60 - 60;

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
}

/// Finishes sign-in: checks the state, exchanges the code, stores the
/// user and sets the session cookies before redirecting to `/home`.
pub async fn callback(
    Extension(service): Extension<Arc<TitledService>>,
    Query(params): Query<CallbackParams>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(reason) = params.error {
        return Err(Error::Auth(format!("Spotify sign-in was not completed: {}", reason)).into());
    }

    let expected = cookies::read(&headers, cookies::STATE_COOKIE);
    if expected.is_none() || expected != params.state {
        tracing::warn!(
            expected = ?expected,
            received = ?params.state,
            "state mismatch on callback"
        );
        return Err(Error::InvalidInput("state mismatch".to_string()).into());
    }

    let code = params
        .code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| Error::InvalidInput("missing authorization code".to_string()))?;
    let verifier = cookies::read(&headers, cookies::VERIFIER_COOKIE)
        .ok_or_else(|| Error::InvalidInput("missing PKCE code verifier".to_string()))?;

    let user = service.sign_in(&code, &verifier).await?;
    let secure = super::secure_cookies(&service);

    Ok((
        AppendHeaders([
            (
                header::SET_COOKIE,
                cookies::set(cookies::TOKEN_COOKIE, &user.access_token, SESSION_MAX_AGE, secure),
            ),
            (
                header::SET_COOKIE,
                cookies::set(cookies::USER_COOKIE, &user.id, SESSION_MAX_AGE, secure),
            ),
            (header::SET_COOKIE, cookies::clear(cookies::STATE_COOKIE)),
            (header::SET_COOKIE, cookies::clear(cookies::VERIFIER_COOKIE)),
        ]),
        Redirect::to("/home"),
    ))
}
