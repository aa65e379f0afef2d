//! In-Memory Configuration Provider
//!
//! Holds configuration handed over by the host runtime, or defined in code
//! for tests.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use super::ConfigResult;
use super::provider::ConfigProvider;

#[derive(Debug, Default, Clone)]
pub struct MemoryConfigProvider {
    data: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(data: HashMap<String, String>) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
        }
    }

    /// Builder-style value, usable before the provider is shared.
    pub fn value(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        match self.data.try_write() {
            Ok(mut data) => {
                data.insert(key, value.into());
            }
            Err(_) => tracing::warn!(%key, "Config provider is locked, value ignored"),
        }
        self
    }

    /// Builder-style list value, stored as a JSON array.
    pub fn list<I, S>(self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        let raw = serde_json::Value::from(values).to_string();
        self.value(key, raw)
    }

    /// Replace a value at runtime, e.g. after the host reconfigures the plugin.
    pub async fn insert(&self, key: impl Into<String>, value: impl Into<String>) {
        self.data.write().await.insert(key.into(), value.into());
    }

    pub async fn remove(&self, key: &str) -> Option<String> {
        self.data.write().await.remove(key)
    }
}

#[async_trait::async_trait]
impl ConfigProvider for MemoryConfigProvider {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get_raw(&self, key: &str) -> ConfigResult<Option<String>> {
        Ok(self.data.read().await.get(key).cloned())
    }

    async fn keys(&self) -> ConfigResult<Vec<String>> {
        Ok(self.data.read().await.keys().cloned().collect())
    }
}
