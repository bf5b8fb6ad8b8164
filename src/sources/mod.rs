//! Sample sources: external services that guess which earlier song a
//! track samples or draws inspiration from.
//!
//! Every source sits behind [`SampleSource`], so the resolver can combine
//! them without knowing which service is behind each one. Two sources
//! exist:
//!
//! - [`genius::GeniusSource`] reads the "samples" relationships that the
//!   Genius lyrics annotation site keeps per song.
//! - [`openai::InferenceSource`] asks a chat-completion model for one
//!   suggestion, constrained by a strict JSON schema.

use std::{fmt, str::FromStr, sync::Arc};

use async_trait::async_trait;
use reqwest::Client;

use crate::{
    config::Config,
    error::{Error, Result},
    types::SampleCandidate,
};

pub mod genius;
pub mod openai;

pub use genius::{GeniusClient, GeniusSource};
pub use openai::{InferenceSource, OpenAiClient};

/// One strategy for finding the song a track samples.
///
/// Implementations are shared between concurrently running track
/// resolutions; `excluded` is a read-only snapshot taken by the caller.
#[async_trait]
pub trait SampleSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Returns `Ok(None)` when the service legitimately knows nothing.
    /// Errors are reserved for transport and parse failures.
    async fn find(
        &self,
        song: &str,
        artist: &str,
        excluded: &[String],
    ) -> Result<Option<SampleCandidate>>;
}

/// Configurable identifier of a sample source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    Genius,
    OpenAi,
}

impl FromStr for SourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "genius" => Ok(Self::Genius),
            "openai" => Ok(Self::OpenAi),
            other => Err(Error::Config(format!(
                "unknown sample source '{}', expected 'genius' or 'openai'",
                other
            ))),
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Genius => write!(f, "genius"),
            Self::OpenAi => write!(f, "openai"),
        }
    }
}

/// Builds the configured sources in priority order.
///
/// A source whose credentials are missing is left out with a warning.
pub fn from_config(config: &Config, http: &Client) -> Vec<Arc<dyn SampleSource>> {
    let mut sources: Vec<Arc<dyn SampleSource>> = Vec::new();

    for kind in &config.sample_sources {
        match kind {
            SourceKind::Genius => match GeniusClient::from_config(http.clone(), &config.genius) {
                Some(client) => sources.push(Arc::new(GeniusSource::new(client))),
                None => tracing::warn!(
                    "genius source disabled: set GENIUS_ACCESS_TOKEN or GENIUS_CLIENT_ID and GENIUS_CLIENT_SECRET"
                ),
            },
            SourceKind::OpenAi => match OpenAiClient::from_config(http.clone(), &config.openai) {
                Some(client) => sources.push(Arc::new(InferenceSource::new(client))),
                None => tracing::warn!("openai source disabled: set OPENAI_API_KEY"),
            },
        }
    }

    if sources.is_empty() {
        tracing::warn!("no sample sources configured, playlists will only hold album tracks");
    }

    sources
}
