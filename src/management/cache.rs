use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::Utc;

use crate::{error::Result, types::CachedTracks};

/// Playlist URIs of albums processed recently, one JSON document per album
/// under `<root>/cache/albums/`.
///
/// The cache never fails a request: unreadable, stale or empty entries are
/// misses, and write failures are only logged.
#[derive(Debug, Clone)]
pub struct TrackCache {
    dir: PathBuf,
    ttl: Duration,
}

impl TrackCache {
    pub fn new(root: impl AsRef<Path>, ttl: Duration) -> Self {
        Self {
            dir: root.as_ref().join("cache").join("albums"),
            ttl,
        }
    }

    /// URIs cached for `album_id` within the TTL.
    pub async fn get(&self, album_id: &str) -> Option<Vec<String>> {
        let entry = match self.read(album_id).await {
            Ok(entry) => entry?,
            Err(e) => {
                tracing::warn!(album = %album_id, error = %e, "track cache read failed");
                return None;
            }
        };

        let age = Utc::now().signed_duration_since(entry.cached_at);
        let fresh = age
            .to_std()
            .map(|age| age < self.ttl)
            // cached_at in the future counts as fresh
            .unwrap_or(true);

        if !fresh || entry.uris.is_empty() {
            tracing::debug!(album = %album_id, "track cache miss");
            return None;
        }

        tracing::debug!(album = %album_id, uris = entry.uris.len(), "track cache hit");
        Some(entry.uris)
    }

    /// Stores `uris` for `album_id`, stamped with the current time.
    pub async fn put(&self, album_id: &str, uris: &[String]) {
        let entry = CachedTracks {
            album_id: album_id.to_string(),
            uris: uris.to_vec(),
            cached_at: Utc::now(),
        };

        if let Err(e) = self.write(&entry).await {
            tracing::warn!(album = %album_id, error = %e, "track cache write failed");
        }
    }

    async fn read(&self, album_id: &str) -> Result<Option<CachedTracks>> {
        let path = self.path_for(album_id)?;
        match async_fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub(crate) async fn write(&self, entry: &CachedTracks) -> Result<()> {
        let path = self.path_for(&entry.album_id)?;
        async_fs::create_dir_all(&self.dir).await?;
        let json = serde_json::to_string_pretty(entry)?;
        async_fs::write(path, json).await?;
        Ok(())
    }

    fn path_for(&self, album_id: &str) -> Result<PathBuf> {
        Ok(self
            .dir
            .join(format!("{}.json", super::document_key(album_id)?)))
    }
}
