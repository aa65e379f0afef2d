//! # beanstalk-bot
//!
//! Chat-bot command plugin for a Beanstalk source hosting account.
//!
//! The plugin lists users and repositories, inspects per-user and
//! per-repository permissions, and validates repository creation and
//! permission assignment requests. Every command works on a fresh
//! [`Snapshot`] of the account directory fetched through a [`BeanstalkApi`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use beanstalk_bot::BeanstalkPlugin;
//! use beanstalk_bot::config::ConfigBuilder;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), beanstalk_bot::Error> {
//!     let config = ConfigBuilder::new().env().default_file().build().await?;
//!
//!     let Some(plugin) = BeanstalkPlugin::activate(&config).await? else {
//!         return Ok(());
//!     };
//!
//!     println!("{}", plugin.dispatch("beanstalk_get_permissions", "jdoe").await?);
//!     Ok(())
//! }
//! ```
//!
//! ## Mutations
//!
//! Repository creation and permission assignment go through a
//! [`RepositoryWriter`]. The default [`DisabledWriter`] only logs; install an
//! [`ApiWriter`] to perform the remote calls.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod auth;
pub mod client;
pub mod commands;
pub mod config;
pub mod directory;
pub mod permissions;
pub mod prelude;

pub use auth::Credentials;
pub use client::{
    ApiWriter, BeanstalkApi, Client, ClientBuilder, DisabledWriter, LabelColor, NewPermission,
    NewRepository, PermissionRecord, Repository, RepositoryId, RepositoryWriter, User, UserId,
    Vcs,
};
pub use commands::{
    BeanstalkPlugin, Command, CreateRepositoryArgs, PluginBuilder, format_fields,
};
pub use config::{ConfigBuilder, ConfigError, ConfigProvider, PluginConfig};
pub use directory::Snapshot;
pub use permissions::{PermissionGroup, aggregate};

/// Kind of directory entry referenced by [`Error::NotFound`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    User,
    Repository,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryKind::User => f.write_str("user"),
            EntryKind::Repository => f.write_str("repository"),
        }
    }
}

/// Error type for beanstalk-bot operations.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Remote service returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Network connectivity or request failed.
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid or missing configuration value.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An id or name is absent from the current snapshot.
    #[error("{kind} '{id}' not found")]
    NotFound { kind: EntryKind, id: String },

    /// A command argument failed validation.
    #[error("'{value}' is not a valid {label}")]
    InvalidArgument {
        index: usize,
        label: &'static str,
        value: String,
    },

    /// Plugin was used before all required configuration keys were present.
    #[error("Beanstalk plugin is not configured")]
    NotConfigured,

    /// Command name is not handled by this plugin.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
}

impl Error {
    pub fn user_not_found(id: impl ToString) -> Self {
        Error::NotFound {
            kind: EntryKind::User,
            id: id.to_string(),
        }
    }

    pub fn repository_not_found(id: impl ToString) -> Self {
        Error::NotFound {
            kind: EntryKind::Repository,
            id: id.to_string(),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the error is meant to be shown to the chat user as plain text.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Error::NotFound { .. }
                | Error::InvalidArgument { .. }
                | Error::NotConfigured
                | Error::UnknownCommand(_)
        )
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Api { status: 401, .. })
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        match err {
            config::ConfigError::NotFound { key } => {
                Error::Config(format!("Key not found: {}", key))
            }
            config::ConfigError::InvalidValue { key, message } => {
                Error::Config(format!("Invalid value for {}: {}", key, message))
            }
            config::ConfigError::Serialization(e) => Error::Json(e),
            config::ConfigError::Io(e) => Error::Config(format!("IO error: {}", e)),
            config::ConfigError::Env(e) => Error::Config(format!("Environment error: {}", e)),
            config::ConfigError::Provider { message } => Error::Config(message),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Api {
            message: "Invalid credentials".to_string(),
            status: 401,
        };
        assert!(err.to_string().contains("Invalid credentials"));
        assert!(err.is_unauthorized());
        assert_eq!(err.status_code(), Some(401));
    }

    #[test]
    fn test_not_found_display() {
        assert_eq!(Error::user_not_found(7).to_string(), "user '7' not found");
        assert_eq!(
            Error::repository_not_found(12).to_string(),
            "repository '12' not found"
        );
    }

    #[test]
    fn test_invalid_argument_display() {
        let err = Error::InvalidArgument {
            index: 2,
            label: "Label-color",
            value: "neon".into(),
        };
        assert_eq!(err.to_string(), "'neon' is not a valid Label-color");
        assert!(err.is_user_facing());
    }

    #[test]
    fn test_config_error_conversion() {
        let config_err = config::ConfigError::NotFound {
            key: "DOMAIN".to_string(),
        };
        let err: Error = config_err.into();
        assert!(matches!(err, Error::Config(_)));
        assert!(!err.is_user_facing());
    }
}
