use std::{fmt, str::FromStr, sync::Arc};

use futures::stream::{FuturesUnordered, StreamExt};
use tracing::Level;

use super::ExclusionSet;
use crate::{
    error::{Error, Result},
    sources::SampleSource,
    spotify::Catalog,
    types::{AlbumTrack, ResolvedPair, SampleCandidate},
};

/// How the configured sample sources are combined for one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Ask the sources one after another in priority order; the next one
    /// is asked only when the previous returned nothing or failed.
    #[default]
    Sequential,
    /// Ask all sources at once and take the first candidate to arrive.
    FirstSuccess,
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(Self::Sequential),
            "first-success" | "first_success" => Ok(Self::FirstSuccess),
            other => Err(Error::Config(format!(
                "unknown sample strategy '{}', expected 'sequential' or 'first-success'",
                other
            ))),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequential => write!(f, "sequential"),
            Self::FirstSuccess => write!(f, "first-success"),
        }
    }
}

/// Turns one album track into a [`ResolvedPair`].
///
/// Once a source produced a candidate, that candidate is final: when the
/// catalog search for it finds nothing, the track stays unsampled and no
/// other source is asked.
pub struct TrackResolver {
    sources: Vec<Arc<dyn SampleSource>>,
    catalog: Arc<dyn Catalog>,
    strategy: Strategy,
}

impl TrackResolver {
    pub fn new(
        sources: Vec<Arc<dyn SampleSource>>,
        catalog: Arc<dyn Catalog>,
        strategy: Strategy,
    ) -> Self {
        Self {
            sources,
            catalog,
            strategy,
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Resolves `track`, recording it and its chosen sample in `exclusions`.
    ///
    /// Never fails: source and search errors are logged and leave the track
    /// without a sample.
    pub async fn resolve(&self, track: &AlbumTrack, exclusions: &ExclusionSet) -> ResolvedPair {
        exclusions.push(track.label()).await;
        let excluded = exclusions.snapshot().await;

        let Some(candidate) = self.find_candidate(track, &excluded).await else {
            tracing::debug!(track = %track.label(), "no sample candidate");
            return ResolvedPair::unsampled(track);
        };

        match self.catalog.search_track(&candidate.name, &candidate.artist).await {
            Ok(Some(uri)) => {
                tracing::info!(
                    track = %track.label(),
                    sample = %candidate.label(),
                    %uri,
                    "resolved sample"
                );
                exclusions.push(candidate.label()).await;
                ResolvedPair {
                    index: track.index,
                    original_uri: track.uri.clone(),
                    sampled_uri: Some(uri),
                    candidate: Some(candidate),
                }
            }
            Ok(None) => {
                tracing::debug!(
                    track = %track.label(),
                    sample = %candidate.label(),
                    "sample not found in catalog"
                );
                ResolvedPair::unsampled(track)
            }
            Err(e) if e.is_not_found() => {
                tracing::debug!(
                    track = %track.label(),
                    sample = %candidate.label(),
                    "sample not found in catalog"
                );
                ResolvedPair::unsampled(track)
            }
            Err(e) => {
                tracing::warn!(
                    track = %track.label(),
                    sample = %candidate.label(),
                    error = %e,
                    upstream = e.is_upstream(),
                    "catalog search failed"
                );
                ResolvedPair::unsampled(track)
            }
        }
    }

    /// Runs the sources according to the configured [`Strategy`].
    pub async fn find_candidate(
        &self,
        track: &AlbumTrack,
        excluded: &[String],
    ) -> Option<SampleCandidate> {
        match self.strategy {
            Strategy::Sequential => self.find_sequential(track, excluded).await,
            Strategy::FirstSuccess => self.find_first_success(track, excluded).await,
        }
    }

    async fn find_sequential(
        &self,
        track: &AlbumTrack,
        excluded: &[String],
    ) -> Option<SampleCandidate> {
        for source in &self.sources {
            match source.find(&track.name, &track.artist, excluded).await {
                Ok(Some(candidate)) => {
                    tracing::debug!(source = source.name(), track = %track.label(), "candidate found");
                    return Some(candidate);
                }
                Ok(None) => {}
                Err(e) => log_source_error(source.name(), track, &e),
            }
        }
        None
    }

    async fn find_first_success(
        &self,
        track: &AlbumTrack,
        excluded: &[String],
    ) -> Option<SampleCandidate> {
        let mut pending: FuturesUnordered<_> = self
            .sources
            .iter()
            .map(|source| async move {
                let result = source.find(&track.name, &track.artist, excluded).await;
                (source.name(), result)
            })
            .collect();

        while let Some((name, result)) = pending.next().await {
            match result {
                Ok(Some(candidate)) => {
                    tracing::debug!(source = name, track = %track.label(), "candidate found");
                    return Some(candidate);
                }
                Ok(None) => {}
                Err(e) => log_source_error(name, track, &e),
            }
        }
        None
    }
}

/// Log level for a failed source call: a missing entity is an ordinary
/// miss, remote failures are warnings, anything local is an error.
fn source_error_level(err: &Error) -> Level {
    if err.is_not_found() {
        Level::DEBUG
    } else if err.is_upstream() {
        Level::WARN
    } else {
        Level::ERROR
    }
}

fn log_source_error(source: &str, track: &AlbumTrack, err: &Error) {
    let track = track.label();
    let level = source_error_level(err);
    if level == Level::DEBUG {
        tracing::debug!(source, %track, error = %err, "sample source found nothing");
    } else if level == Level::WARN {
        tracing::warn!(source, %track, error = %err, "sample source failed");
    } else {
        tracing::error!(source, %track, error = %err, "sample source failed");
    }
}
