//! Credential types.

use std::fmt;

use secrecy::{ExposeSecret, SecretString};

/// Host suffix appended to the account domain.
pub const DEFAULT_HOST_SUFFIX: &str = "beanstalkapp.com";

/// Account credentials for one Beanstalk domain.
#[derive(Clone)]
pub struct Credentials {
    domain: String,
    username: String,
    password: SecretString,
}

impl Credentials {
    pub fn new(
        domain: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            username: username.into(),
            password: SecretString::from(password.into()),
        }
    }

    /// Account subdomain, e.g. `acme` for `acme.beanstalkapp.com`.
    pub fn domain(&self) -> &str {
        &self.domain
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    /// API root for the account, always ending in a slash.
    pub fn base_url(&self) -> String {
        format!("https://{}.{}/api/", self.domain, DEFAULT_HOST_SUFFIX)
    }

    pub(crate) fn apply(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.basic_auth(&self.username, Some(self.password.expose_secret()))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("domain", &self.domain)
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url() {
        let creds = Credentials::new("acme", "admin", "hunter2");
        assert_eq!(creds.base_url(), "https://acme.beanstalkapp.com/api/");
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = Credentials::new("acme", "admin", "hunter2");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("admin"));
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("[redacted]"));
    }

    #[test]
    fn test_password_exposed_explicitly() {
        let creds = Credentials::new("acme", "admin", "hunter2");
        assert_eq!(creds.password().expose_secret(), "hunter2");
    }
}
