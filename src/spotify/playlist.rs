use super::{SERVICE, SpotifyClient};
use crate::{
    error::{Error, Result},
    types::{
        AddTrackToPlaylistRequest, CreatePlaylistRequest, CreatePlaylistResponse,
        CreatedPlaylist, PlaylistSpec,
    },
    utils,
};

/// Most URIs Spotify accepts in one add-tracks request.
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

impl SpotifyClient {
    /// Creates an empty playlist owned by `owner_id`.
    pub async fn create_playlist(
        &self,
        owner_id: &str,
        spec: &PlaylistSpec,
    ) -> Result<CreatedPlaylist> {
        let body = CreatePlaylistRequest {
            name: spec.name.clone(),
            description: spec.description.clone(),
            public: spec.public,
        };

        let response = self
            .http
            .post(self.url(&format!("/users/{}/playlists", owner_id)))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;

        let created = utils::check_status(SERVICE, response)
            .await?
            .json::<CreatePlaylistResponse>()
            .await
            .map_err(|e| Error::parse(SERVICE, e))?;

        Ok(CreatedPlaylist {
            id: created.id,
            uri: created.uri,
            external_url: created.external_urls.spotify,
        })
    }

    /// Adds `uris` to a playlist, in order.
    ///
    /// Lists up to [`MAX_TRACKS_PER_REQUEST`] go out as a single request;
    /// longer lists are sent in consecutive slices so the order is kept.
    pub async fn add_to_playlist(
        &self,
        playlist_id: &str,
        uris: &[String],
        position: Option<u32>,
    ) -> Result<()> {
        if uris.is_empty() {
            return Ok(());
        }

        for (i, chunk) in uris.chunks(MAX_TRACKS_PER_REQUEST).enumerate() {
            let body = AddTrackToPlaylistRequest {
                uris: chunk.to_vec(),
                position: position.map(|p| p + (i * MAX_TRACKS_PER_REQUEST) as u32),
            };

            let response = self
                .http
                .post(self.url(&format!("/playlists/{}/tracks", playlist_id)))
                .bearer_auth(&self.access_token)
                .json(&body)
                .send()
                .await?;

            utils::check_status(SERVICE, response).await?;
        }

        Ok(())
    }
}
