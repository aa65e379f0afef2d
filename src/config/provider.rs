//! Configuration Provider Trait

use serde::de::DeserializeOwned;

use super::{ConfigError, ConfigResult};

/// Read-only source of plugin configuration values.
///
/// The host runtime owns configuration; the plugin only reads it.
#[async_trait::async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &str;

    /// Raw value for `key`, `None` when the provider does not define it.
    async fn get_raw(&self, key: &str) -> ConfigResult<Option<String>>;

    /// Keys this provider defines.
    async fn keys(&self) -> ConfigResult<Vec<String>>;
}

/// Typed access on top of [`ConfigProvider::get_raw`].
pub trait ConfigProviderExt: ConfigProvider {
    /// Value parsed as JSON.
    fn get<T: DeserializeOwned + Send>(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = ConfigResult<Option<T>>> + Send
    where
        Self: Sync,
    {
        async move {
            match self.get_raw(key).await? {
                Some(raw) => serde_json::from_str(&raw)
                    .map(Some)
                    .map_err(|e| ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: e.to_string(),
                    }),
                None => Ok(None),
            }
        }
    }

    /// Value as a list of strings.
    ///
    /// Accepts a JSON array of strings or a comma-separated list. Blank
    /// entries of a comma-separated list are dropped.
    fn get_list(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = ConfigResult<Option<Vec<String>>>> + Send
    where
        Self: Sync,
    {
        async move {
            let Some(raw) = self.get_raw(key).await? else {
                return Ok(None);
            };

            if raw.trim_start().starts_with('[') {
                return serde_json::from_str(&raw)
                    .map(Some)
                    .map_err(|e| ConfigError::InvalidValue {
                        key: key.to_string(),
                        message: e.to_string(),
                    });
            }

            Ok(Some(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
            ))
        }
    }
}

impl<P: ConfigProvider + ?Sized> ConfigProviderExt for P {}
