//! Plugin configuration.
//!
//! The plugin stays inert until every key in [`REQUIRED_KEYS`] is defined.

use std::collections::BTreeSet;

use serde_json::json;

use super::ConfigResult;
use super::provider::{ConfigProvider, ConfigProviderExt};
use crate::auth::Credentials;

pub const DOMAIN: &str = "DOMAIN";
pub const USERNAME: &str = "USERNAME";
pub const PASSWORD: &str = "PASSWORD";
pub const EXCLUDE_USERS: &str = "EXCLUDE_USERS";

pub const REQUIRED_KEYS: [&str; 4] = [DOMAIN, USERNAME, PASSWORD, EXCLUDE_USERS];

/// Template the host shows when asking for configuration.
pub fn configuration_template() -> serde_json::Value {
    json!({
        "DOMAIN": "domain",
        "USERNAME": "username",
        "PASSWORD": "password",
        "EXCLUDE_USERS": ["user1", "user2"]
    })
}

#[derive(Debug, Clone)]
pub struct PluginConfig {
    pub credentials: Credentials,
    /// Logins never touched by bulk permission assignment.
    pub exclude_users: BTreeSet<String>,
}

impl PluginConfig {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            exclude_users: BTreeSet::new(),
        }
    }

    pub fn exclude<I, S>(mut self, logins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_users.extend(logins.into_iter().map(Into::into));
        self
    }

    /// Required keys the provider does not define.
    pub async fn missing_keys(provider: &dyn ConfigProvider) -> ConfigResult<Vec<&'static str>> {
        let mut missing = Vec::new();
        for key in REQUIRED_KEYS {
            if provider.get_raw(key).await?.is_none() {
                missing.push(key);
            }
        }
        Ok(missing)
    }

    /// `None` when any required key is missing.
    pub async fn load(provider: &dyn ConfigProvider) -> ConfigResult<Option<Self>> {
        let (Some(domain), Some(username), Some(password), Some(exclude_users)) = (
            provider.get_raw(DOMAIN).await?,
            provider.get_raw(USERNAME).await?,
            provider.get_raw(PASSWORD).await?,
            provider.get_list(EXCLUDE_USERS).await?,
        ) else {
            return Ok(None);
        };

        Ok(Some(
            Self::new(Credentials::new(domain, username, password)).exclude(exclude_users),
        ))
    }
}
