//! # Playlist Assembly Pipeline
//!
//! Turns an album into a playlist of its tracks and the songs they sample.
//!
//! ```text
//! album tracks ──┬── resolve(track 0) ──┐
//!                ├── resolve(track 1) ──┤   one task per track,
//!                ├──       ...        ──┤   each bounded by a timeout
//!                └── resolve(track n) ──┘
//!                           │ wait for all
//!                           ▼
//!              slots[0..n] ordered by album position
//!                           │ flatten + dedupe
//!                           ▼
//!              create playlist, add all URIs
//! ```
//!
//! A failing or slow track only loses its sample. Failing to read the
//! album, to create the playlist, or to add the tracks fails the run.

use std::{sync::Arc, time::Duration};

use tokio::{
    task::JoinSet,
    time::{Instant, timeout_at},
};

use crate::{
    error::{Error, Result},
    spotify::{Catalog, PlaylistGateway},
    types::{AlbumTrack, CreatedPlaylist, GeneratedPlaylist, PlaylistSpec, ResolvedPair},
};

pub mod assemble;
pub mod exclusion;
pub mod resolver;

pub use assemble::{dedupe_uris, flatten, playlist_uris};
pub use exclusion::ExclusionSet;
pub use resolver::{Strategy, TrackResolver};

pub struct PlaylistPipeline {
    catalog: Arc<dyn Catalog>,
    gateway: Arc<dyn PlaylistGateway>,
    resolver: Arc<TrackResolver>,
    track_timeout: Duration,
    request_timeout: Duration,
}

impl PlaylistPipeline {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        gateway: Arc<dyn PlaylistGateway>,
        resolver: TrackResolver,
        track_timeout: Duration,
        request_timeout: Duration,
    ) -> Self {
        Self {
            catalog,
            gateway,
            resolver: Arc::new(resolver),
            track_timeout,
            request_timeout,
        }
    }

    /// Builds a new playlist for `album_id` owned by `owner_id`.
    pub async fn run(&self, album_id: &str, owner_id: &str) -> Result<GeneratedPlaylist> {
        let deadline = Instant::now() + self.request_timeout;

        let album = self.catalog.album(album_id).await?;
        let tracks = self.catalog.album_tracks(album_id).await?;
        if tracks.is_empty() {
            return Err(Error::NotFound(format!("album {} has no tracks", album_id)));
        }

        tracing::info!(album = %album.name, tracks = tracks.len(), "resolving samples");

        let exclusions = ExclusionSet::new();
        let pairs = self.resolve(&tracks, &exclusions, deadline).await;
        let uris = playlist_uris(&pairs);

        let sampled = pairs.iter().filter(|p| p.sampled_uri.is_some()).count();
        tracing::info!(
            album = %album.name,
            sampled,
            uris = uris.len(),
            "samples resolved"
        );

        let playlist = self.assemble(&album.name, owner_id, &uris).await?;

        Ok(GeneratedPlaylist {
            playlist,
            album_name: album.name,
            uris,
            pairs,
            from_cache: false,
        })
    }

    /// Resolves every track concurrently and returns one pair per track,
    /// in the order of `tracks`.
    ///
    /// Each task is bounded by the per-track timeout and by `deadline`,
    /// whichever comes first. A task that times out or panics yields an
    /// unsampled pair; its siblings keep running.
    pub async fn resolve(
        &self,
        tracks: &[AlbumTrack],
        exclusions: &ExclusionSet,
        deadline: Instant,
    ) -> Vec<ResolvedPair> {
        let mut set = JoinSet::new();

        for (slot, track) in tracks.iter().cloned().enumerate() {
            let resolver = Arc::clone(&self.resolver);
            let exclusions = exclusions.clone();
            let task_deadline = deadline.min(Instant::now() + self.track_timeout);

            set.spawn(async move {
                let pair = match timeout_at(task_deadline, resolver.resolve(&track, &exclusions)).await
                {
                    Ok(pair) => pair,
                    Err(_) => {
                        tracing::warn!(track = %track.label(), "track resolution timed out");
                        ResolvedPair::unsampled(&track)
                    }
                };
                (slot, pair)
            });
        }

        let mut slots: Vec<Option<ResolvedPair>> = vec![None; tracks.len()];
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((slot, pair)) => slots[slot] = Some(pair),
                Err(e) => tracing::error!(error = %e, "track resolution task failed"),
            }
        }

        slots
            .into_iter()
            .zip(tracks)
            .map(|(pair, track)| pair.unwrap_or_else(|| ResolvedPair::unsampled(track)))
            .collect()
    }

    /// Creates the playlist and adds `uris` to it in one go.
    pub async fn assemble(
        &self,
        album_name: &str,
        owner_id: &str,
        uris: &[String],
    ) -> Result<CreatedPlaylist> {
        if uris.is_empty() {
            return Err(Error::NotFound("no tracks to add to the playlist".to_string()));
        }

        let spec = PlaylistSpec::for_album(album_name);
        let playlist = self.gateway.create(owner_id, &spec).await?;
        self.gateway.add_tracks(&playlist.id, uris, None).await?;

        tracing::info!(
            playlist = %playlist.id,
            name = %spec.name,
            tracks = uris.len(),
            "playlist created"
        );

        Ok(playlist)
    }

    pub fn catalog(&self) -> &Arc<dyn Catalog> {
        &self.catalog
    }
}
