use reqwest::StatusCode;

use super::{SERVICE, SpotifyClient};
use crate::{
    error::{Error, Result},
    types::{Album, AlbumTrack, Paging, Track, UNKNOWN_ARTIST},
    utils,
};

/// Page size for `/albums/{id}/tracks` (the API maximum).
const TRACK_PAGE_LIMIT: u32 = 50;

impl SpotifyClient {
    /// Fetches album metadata. A 404 maps to [`Error::NotFound`].
    pub async fn get_album(&self, album_id: &str) -> Result<Album> {
        let response = self
            .http
            .get(self.url(&format!("/albums/{}", album_id)))
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("album {}", album_id)));
        }

        utils::check_status(SERVICE, response)
            .await?
            .json::<Album>()
            .await
            .map_err(|e| Error::parse(SERVICE, e))
    }

    /// Fetches every track of an album, following `next` links.
    ///
    /// Positions are assigned in the order the API lists the tracks.
    pub async fn get_album_tracks(&self, album_id: &str) -> Result<Vec<AlbumTrack>> {
        let mut next = Some(self.url(&format!(
            "/albums/{}/tracks?limit={}",
            album_id, TRACK_PAGE_LIMIT
        )));
        let mut tracks = Vec::new();

        while let Some(url) = next.take() {
            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.access_token)
                .send()
                .await?;

            if response.status() == StatusCode::NOT_FOUND {
                return Err(Error::NotFound(format!("album {}", album_id)));
            }

            let page = utils::check_status(SERVICE, response)
                .await?
                .json::<Paging<Track>>()
                .await
                .map_err(|e| Error::parse(SERVICE, e))?;

            let offset = tracks.len();
            tracks.extend(
                page.items
                    .into_iter()
                    .enumerate()
                    .map(|(i, track)| to_album_track(offset + i, track)),
            );
            next = page.next;
        }

        Ok(tracks)
    }
}

pub(crate) fn to_album_track(index: usize, track: Track) -> AlbumTrack {
    let artist = track
        .artists
        .first()
        .map(|a| a.name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_ARTIST.to_string());

    AlbumTrack {
        index,
        name: track.name,
        artist,
        uri: track.uri,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SimpleArtist;

    fn track(name: &str, artists: &[&str]) -> Track {
        Track {
            id: None,
            name: name.to_string(),
            uri: format!("spotify:track:{}", name),
            artists: artists
                .iter()
                .map(|a| SimpleArtist {
                    id: None,
                    name: a.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_primary_artist_is_first_listed() {
        let t = to_album_track(3, track("Otis", &["JAY-Z", "Kanye West"]));
        assert_eq!(t.index, 3);
        assert_eq!(t.artist, "JAY-Z");
        assert_eq!(t.uri, "spotify:track:Otis");
    }

    #[test]
    fn test_missing_artist_falls_back_to_unknown() {
        let t = to_album_track(0, track("Intro", &[]));
        assert_eq!(t.artist, UNKNOWN_ARTIST);
    }
}
