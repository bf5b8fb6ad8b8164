use std::sync::Arc;

use axum::{
    Extension,
    http::header,
    response::{AppendHeaders, IntoResponse, Redirect},
};

use super::{ApiError, cookies};
use crate::{service::TitledService, utils};

/// Lifetime of the state and verifier cookies.
const LOGIN_COOKIE_MAX_AGE: u64 = 10 * 60;

pub async fn index() -> axum::response::Html<String> {
    axum::response::Html(super::pages::index())
}

/// Starts the authorization-code flow with PKCE.
///
/// The state and the code verifier travel in short-lived cookies and are
/// checked and consumed by the callback.
pub async fn login(
    Extension(service): Extension<Arc<TitledService>>,
) -> Result<impl IntoResponse, ApiError> {
    let state = utils::generate_state();
    let verifier = utils::generate_code_verifier();
    let challenge = utils::generate_code_challenge(&verifier);

    let url = service.auth().authorize_url(&state, &challenge)?;
    let secure = super::secure_cookies(&service);

    Ok((
        AppendHeaders([
            (
                header::SET_COOKIE,
                cookies::set(cookies::STATE_COOKIE, &state, LOGIN_COOKIE_MAX_AGE, secure),
            ),
            (
                header::SET_COOKIE,
                cookies::set(cookies::VERIFIER_COOKIE, &verifier, LOGIN_COOKIE_MAX_AGE, secure),
            ),
        ]),
        Redirect::temporary(&url),
    ))
}
