use std::path::{Path, PathBuf};

use futures::StreamExt;

use crate::{
    error::{Error, Result},
    types::User,
};

/// Signed-in users, one JSON document per user under `<root>/users/`.
#[derive(Debug, Clone)]
pub struct UserStore {
    dir: PathBuf,
}

impl UserStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            dir: root.as_ref().join("users"),
        }
    }

    /// Inserts or replaces the document for `user.id`.
    pub async fn upsert(&self, user: &User) -> Result<()> {
        let path = self.path_for(&user.id)?;
        async_fs::create_dir_all(&self.dir).await?;

        let json = serde_json::to_string_pretty(user)?;
        async_fs::write(path, json).await?;
        tracing::debug!(user = %user.id, "user saved");
        Ok(())
    }

    /// `Ok(None)` when no document exists for `id`.
    pub async fn get(&self, id: &str) -> Result<Option<User>> {
        let path = self.path_for(id)?;
        match async_fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All stored users sorted by id. Unreadable documents are skipped.
    pub async fn list(&self) -> Result<Vec<User>> {
        let mut entries = match async_fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut users = Vec::new();
        while let Some(entry) = entries.next().await {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let parsed = async_fs::read_to_string(&path)
                .await
                .map_err(Error::from)
                .and_then(|content| serde_json::from_str::<User>(&content).map_err(Error::from));
            match parsed {
                Ok(user) => users.push(user),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "skipping unreadable user document")
                }
            }
        }

        users.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(users)
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        Ok(self.dir.join(format!("{}.json", super::document_key(id)?)))
    }
}
