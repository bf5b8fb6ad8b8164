mod cache;
mod user;

pub use cache::TrackCache;
pub use user::UserStore;

use crate::error::{Error, Result};

/// Validates an id for use as a document file name.
fn document_key(id: &str) -> Result<&str> {
    let valid = !id.is_empty()
        && id != "."
        && id != ".."
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(id)
    } else {
        Err(Error::InvalidInput(format!("invalid document id '{}'", id)))
    }
}
