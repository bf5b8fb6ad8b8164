use super::{SERVICE, SpotifyClient};
use crate::{
    error::{Error, Result},
    types::SearchResponse,
    utils,
};

impl SpotifyClient {
    /// Looks up the catalog URI for a song, taking the first search hit.
    ///
    /// Returns `Ok(None)` when the search has no results.
    pub async fn get_track_uri(&self, name: &str, artist: &str) -> Result<Option<String>> {
        let query = format!("track:{} artist:{}", name, artist);

        let response = self
            .http
            .get(self.url("/search"))
            .bearer_auth(&self.access_token)
            .query(&[("q", query.as_str()), ("type", "track"), ("limit", "1")])
            .send()
            .await?;

        let result = utils::check_status(SERVICE, response)
            .await?
            .json::<SearchResponse>()
            .await
            .map_err(|e| Error::parse(SERVICE, e))?;

        Ok(result
            .tracks
            .items
            .into_iter()
            .map(|t| t.uri)
            .find(|uri| !uri.is_empty()))
    }
}
