//! # API Module
//!
//! HTTP endpoints of the Titled web front end.
//!
//! ## Endpoints
//!
//! - `GET /health` - [`health`]: status and version for monitoring.
//! - `GET /` - [`index`]: landing page with the sign-in link.
//! - `GET /login` - [`login`]: starts the Spotify authorization-code flow
//!   with PKCE; state and verifier are kept in short-lived cookies.
//! - `GET /callback` - [`callback`]: verifies the state, exchanges the code,
//!   stores the user and sets the session cookies.
//! - `GET /home` - [`home`]: album form for signed-in users.
//! - `POST /generatePlaylist` - [`generate_playlist`]: runs the playlist
//!   pipeline and links to the result.
//!
//! Failures render an HTML error page; the status code follows the error
//! kind (see [`status_for`]).

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{error::Error, service::TitledService};

mod callback;
pub mod cookies;
mod health;
mod login;
pub mod pages;
mod playlist;

pub use callback::callback;
pub use health::health;
pub use login::{index, login};
pub use playlist::{GenerateForm, generate_playlist, home};

/// Error returned by handlers, rendered as an HTML error page.
#[derive(Debug)]
pub struct ApiError(pub Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        } else {
            tracing::warn!(error = %self.0, "request rejected");
        }
        (status, Html(pages::error(&self.0.to_string()))).into_response()
    }
}

/// HTTP status for an error kind.
pub fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::Auth(_) => StatusCode::UNAUTHORIZED,
        Error::Http { status: 401, .. } => StatusCode::UNAUTHORIZED,
        Error::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        Error::Http { .. } | Error::Parse { .. } | Error::Request(_) => StatusCode::BAD_GATEWAY,
        Error::Config(_) | Error::Json(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn secure_cookies(service: &TitledService) -> bool {
    service.config().base_url.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&Error::InvalidInput("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_for(&Error::NotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(status_for(&Error::Auth("x".into())), StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_for(&Error::Http {
                service: "Spotify",
                status: 401,
                body: String::new()
            }),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_for(&Error::Http {
                service: "Spotify",
                status: 500,
                body: String::new()
            }),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            status_for(&Error::Config("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
