//! Durable storage for the session bearer token.
//!
//! The token is the only piece of client state that survives a restart.
//! [`FileTokenStore`] keeps it in a small JSON file with owner-only
//! permissions; [`MemoryTokenStore`] is used by tests and ephemeral runs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use super::ApiResult;

#[cfg(unix)]
const FILE_MODE: u32 = 0o600;

#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Load the persisted token, if any.
    async fn load(&self) -> ApiResult<Option<String>>;

    /// Persist a token, replacing any previous one.
    async fn save(&self, token: &str) -> ApiResult<()>;

    /// Remove the persisted token. Succeeds when nothing is stored.
    async fn clear(&self) -> ApiResult<()>;

    fn name(&self) -> &str {
        "unknown"
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct TokenFile {
    access_token: String,
}

/// JSON file token storage.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> ApiResult<Option<String>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(None);
        }

        let file: TokenFile = serde_json::from_str(&content)?;
        if file.access_token.is_empty() {
            Ok(None)
        } else {
            Ok(Some(file.access_token))
        }
    }

    async fn save(&self, token: &str) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(&TokenFile {
            access_token: token.to_string(),
        })?;

        // Write next to the target, then rename over it
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, content).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&tmp_path, std::fs::Permissions::from_mode(FILE_MODE)).await?;
        }

        tokio::fs::rename(&tmp_path, &self.path).await?;
        Ok(())
    }

    async fn clear(&self) -> ApiResult<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn name(&self) -> &str {
        "file"
    }
}

/// In-memory token storage, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
    inner: Arc<RwLock<Option<String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(token.into()))),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> ApiResult<Option<String>> {
        Ok(self.inner.read().await.clone())
    }

    async fn save(&self, token: &str) -> ApiResult<()> {
        *self.inner.write().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> ApiResult<()> {
        *self.inner.write().await = None;
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
