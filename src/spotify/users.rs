use super::{SERVICE, SpotifyClient};
use crate::{
    error::{Error, Result},
    types::CurrentUser,
    utils,
};

impl SpotifyClient {
    /// Profile of the user owning the access token.
    pub async fn current_user(&self) -> Result<CurrentUser> {
        let response = self
            .http
            .get(self.url("/me"))
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        utils::check_status(SERVICE, response)
            .await?
            .json::<CurrentUser>()
            .await
            .map_err(|e| Error::parse(SERVICE, e))
    }
}
