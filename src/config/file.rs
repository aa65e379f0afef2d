//! File-based Configuration Provider
//!
//! Reads a JSON object such as
//!
//! ```json
//! {
//!   "DOMAIN": "acme",
//!   "USERNAME": "admin",
//!   "PASSWORD": "secret",
//!   "EXCLUDE_USERS": ["ci", "deploy"]
//! }
//! ```
//!
//! String values are returned as-is, anything else as JSON text.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::ConfigResult;
use super::provider::ConfigProvider;

pub struct FileConfigProvider {
    path: PathBuf,
    data: RwLock<Option<Map<String, Value>>>,
}

impl FileConfigProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: RwLock::new(None),
        }
    }

    /// A missing file is an empty configuration.
    async fn load(&self) -> ConfigResult<Map<String, Value>> {
        if !tokio::fs::try_exists(&self.path).await? {
            tracing::debug!(path = %self.path.display(), "Config file not found");
            return Ok(Map::new());
        }

        let content = tokio::fs::read_to_string(&self.path).await?;
        Ok(serde_json::from_str(&content)?)
    }

    async fn with_data<T>(&self, f: impl FnOnce(&Map<String, Value>) -> T) -> ConfigResult<T> {
        {
            let data = self.data.read().await;
            if let Some(ref map) = *data {
                return Ok(f(map));
            }
        }

        let mut data = self.data.write().await;
        if data.is_none() {
            *data = Some(self.load().await?);
        }
        Ok(f(data.as_ref().map_or(&Map::new(), |m| m)))
    }

    /// Discard cached values and read the file again.
    pub async fn reload(&self) -> ConfigResult<()> {
        let fresh = self.load().await?;
        *self.data.write().await = Some(fresh);
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl ConfigProvider for FileConfigProvider {
    fn name(&self) -> &str {
        "file"
    }

    async fn get_raw(&self, key: &str) -> ConfigResult<Option<String>> {
        self.with_data(|map| match map.get(key) {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(v) => Some(v.to_string()),
        })
        .await
    }

    async fn keys(&self) -> ConfigResult<Vec<String>> {
        self.with_data(|map| map.keys().cloned().collect()).await
    }
}

impl std::fmt::Debug for FileConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfigProvider")
            .field("path", &self.path)
            .finish()
    }
}
