//! Pluggable configuration provider system.
//!
//! ```rust,no_run
//! use beanstalk_bot::config::{ConfigBuilder, PluginConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConfigBuilder::new()
//!     .env()
//!     .file("beanstalk.json")
//!     .build()
//!     .await?;
//! let plugin_config = PluginConfig::load(&config).await?;
//! # Ok(())
//! # }
//! ```

pub mod composite;
pub mod env;
pub mod file;
pub mod memory;
pub mod plugin;
pub mod provider;

pub use composite::CompositeConfigProvider;
pub use env::{DEFAULT_ENV_PREFIX, EnvConfigProvider};
pub use file::FileConfigProvider;
pub use memory::MemoryConfigProvider;
pub use plugin::{PluginConfig, REQUIRED_KEYS, configuration_template};
pub use provider::{ConfigProvider, ConfigProviderExt};

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur in configuration operations
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Key not found
    #[error("Key not found: {key}")]
    NotFound { key: String },

    /// Invalid configuration value
    #[error("Invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Environment variable error
    #[error("Environment error: {0}")]
    Env(#[from] std::env::VarError),

    /// Provider error
    #[error("Provider error: {message}")]
    Provider { message: String },
}

/// Result type for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Location of the per-user configuration file, if the platform has one.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "beanstalk-bot")
        .map(|dirs| dirs.config_dir().join("config.json"))
}

/// Configuration builder for fluent API
#[derive(Default)]
pub struct ConfigBuilder {
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `BEANSTALK_*` environment variables
    pub fn env(mut self) -> Self {
        self.providers.push(Box::new(EnvConfigProvider::new()));
        self
    }

    pub fn env_with_prefix(mut self, prefix: &str) -> Self {
        self.providers
            .push(Box::new(EnvConfigProvider::prefixed(prefix)));
        self
    }

    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.providers.push(Box::new(FileConfigProvider::new(path)));
        self
    }

    /// Add the per-user configuration file when the platform defines one.
    pub fn default_file(self) -> Self {
        match default_config_path() {
            Some(path) => self.file(path),
            None => {
                tracing::debug!("No config directory available, skipping config file");
                self
            }
        }
    }

    pub fn memory(mut self, provider: MemoryConfigProvider) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn provider(mut self, provider: Box<dyn ConfigProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Build the composite configuration
    pub async fn build(self) -> ConfigResult<CompositeConfigProvider> {
        Ok(self
            .providers
            .into_iter()
            .fold(CompositeConfigProvider::new(), |composite, provider| {
                composite.provider(provider)
            }))
    }
}
