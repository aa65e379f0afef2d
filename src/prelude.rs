//! Prelude module for convenient imports.
//!
//! ```rust
//! use beanstalk_bot::prelude::*;
//! ```

pub use crate::BeanstalkPlugin;
pub use crate::Command;
pub use crate::Credentials;
pub use crate::Error;
pub use crate::Result;

// Client
pub use crate::client::{
    ApiWriter, BeanstalkApi, Client, DisabledWriter, PermissionRecord, Repository,
    RepositoryWriter, User,
};

// Configuration
pub use crate::config::{ConfigBuilder, ConfigProvider, ConfigProviderExt, PluginConfig};

// Directory and reports
pub use crate::directory::Snapshot;
pub use crate::permissions::{PermissionGroup, aggregate};
