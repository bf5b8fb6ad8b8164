//! Error types shared by every layer of the service.

use thiserror::Error;

/// Main error type for Titled operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An upstream service answered with a non-2xx status.
    #[error("{service} returned HTTP {status}: {body}")]
    Http {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// A response from an upstream service could not be understood.
    #[error("parse error from {service}: {message}")]
    Parse {
        service: &'static str,
        message: String,
    },

    /// The requested entity does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Token exchange or refresh failed.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Required configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Caller supplied input the service cannot use.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation ran past its deadline.
    #[error("timed out: {0}")]
    Timeout(String),

    /// HTTP transport failure.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON (de)serialization failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Local file system failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` when the error only means "no result".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns `true` for failures caused by a remote collaborator
    /// (transport, status, or payload problems).
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::Http { .. } | Self::Parse { .. } | Self::Request(_) | Self::Timeout(_)
        )
    }

    pub(crate) fn parse(service: &'static str, message: impl ToString) -> Self {
        Self::Parse {
            service,
            message: message.to_string(),
        }
    }
}

/// Result type alias for Titled operations.
pub type Result<T> = std::result::Result<T, Error>;
