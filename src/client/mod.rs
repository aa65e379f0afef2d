//! Beanstalk API client.

pub mod api;
pub mod error;
pub mod models;
pub mod writer;

pub use api::BeanstalkApi;
pub use error::ErrorResponse;
pub use models::{
    LabelColor, NewPermission, NewRepository, ParseVariantError, PermissionRecord, Repository,
    RepositoryId, User, UserId, Vcs,
};
pub use writer::{ApiWriter, DisabledWriter, RepositoryWriter};

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::{Url, form_urlencoded};

use crate::auth::Credentials;
use crate::{Error, Result};

use models::{
    PermissionEnvelope, PermissionPayload, RepositoryEnvelope, RepositoryPayload, UserEnvelope,
};

/// Largest page the listing endpoints return.
pub const PAGE_SIZE: usize = 50;

/// Pages fetched per listing before giving up on reaching a short page.
pub const DEFAULT_MAX_PAGES: usize = 200;

const DEFAULT_USER_AGENT: &str = concat!("beanstalk-bot/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct Client {
    credentials: Credentials,
    base_url: Url,
    http: reqwest::Client,
    max_pages: usize,
}

impl Client {
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::builder().credentials(credentials).build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn build_url(&self, path: &str, query: &[(&str, String)]) -> Result<Url> {
        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| Error::Config(format!("Invalid API path '{}': {}", path, e)))?;

        if !query.is_empty() {
            let encoded: String = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())))
                .finish();
            url.set_query(Some(&encoded));
        }

        Ok(url)
    }

    fn build_request(&self, method: reqwest::Method, url: Url) -> reqwest::RequestBuilder {
        let req = self
            .http
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");
        self.credentials.apply(req)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let url = self.build_url(path, query)?;
        tracing::debug!(%url, "GET");
        let response = self
            .build_request(reqwest::Method::GET, url)
            .send()
            .await
            .map_err(Error::Network)?;
        self.handle_response(response).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T> {
        let url = self.build_url(path, &[])?;
        tracing::debug!(%url, "POST");
        let response = self
            .build_request(reqwest::Method::POST, url)
            .json(body)
            .send()
            .await
            .map_err(Error::Network)?;
        self.handle_response(response).await
    }

    /// Fetch every page of a listing endpoint, stopping at the first short
    /// page or after `max_pages` pages.
    async fn get_all_pages<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page = 1usize;

        loop {
            let query = [
                ("page", page.to_string()),
                ("per_page", PAGE_SIZE.to_string()),
            ];
            let batch: Vec<T> = self.get(path, &query).await?;
            let len = batch.len();
            items.extend(batch);

            if len < PAGE_SIZE {
                break;
            }
            if page >= self.max_pages {
                tracing::warn!(
                    path,
                    pages = page,
                    items = items.len(),
                    "Page limit reached, listing may be truncated"
                );
                break;
            }
            page += 1;
        }

        Ok(items)
    }

    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let error = ErrorResponse::into_error(status.as_u16(), &body);
            tracing::warn!(status = status.as_u16(), error = %error, "Beanstalk request failed");
            return Err(error);
        }

        let bytes = response.bytes().await.map_err(Error::Network)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl BeanstalkApi for Client {
    async fn find_users(&self) -> Result<Vec<User>> {
        let users: Vec<UserEnvelope> = self.get_all_pages("users.json").await?;
        Ok(users.into_iter().map(|e| e.user).collect())
    }

    async fn find_repositories(&self) -> Result<Vec<Repository>> {
        let repositories: Vec<RepositoryEnvelope> =
            self.get_all_pages("repositories.json").await?;
        Ok(repositories.into_iter().map(|e| e.repository).collect())
    }

    async fn find_permissions(&self, user_id: UserId) -> Result<Vec<PermissionRecord>> {
        let permissions: Vec<PermissionEnvelope> = self
            .get(&format!("permissions/{}.json", user_id), &[])
            .await?;
        Ok(permissions.into_iter().map(|e| e.permission).collect())
    }

    async fn create_repository(&self, repository: &NewRepository) -> Result<Repository> {
        let created: RepositoryEnvelope = self
            .post("repositories.json", &RepositoryPayload::from(repository))
            .await?;
        Ok(created.repository)
    }

    async fn create_permission(&self, permission: &NewPermission) -> Result<PermissionRecord> {
        let created: PermissionEnvelope = self
            .post("permissions.json", &PermissionPayload::from(permission))
            .await?;
        Ok(created.permission)
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.credentials.username())
            .finish()
    }
}

#[derive(Default)]
pub struct ClientBuilder {
    credentials: Option<Credentials>,
    base_url: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    max_pages: Option<usize>,
}

impl ClientBuilder {
    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Override the API root derived from the account domain.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Bound every request. Requests wait indefinitely when unset.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Cap the pages fetched per listing. Defaults to [`DEFAULT_MAX_PAGES`].
    pub fn max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = Some(max_pages.max(1));
        self
    }

    pub fn build(self) -> Result<Client> {
        let credentials = self
            .credentials
            .ok_or_else(|| Error::Config("Beanstalk credentials are required".into()))?;

        let mut base = self.base_url.unwrap_or_else(|| credentials.base_url());
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)
            .map_err(|e| Error::Config(format!("Invalid base URL '{}': {}", base, e)))?;

        let mut http_builder = reqwest::Client::builder().user_agent(
            self.user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        );
        if let Some(timeout) = self.timeout {
            http_builder = http_builder.timeout(timeout);
        }
        let http = http_builder.build().map_err(Error::Network)?;

        Ok(Client {
            credentials,
            base_url,
            http,
            max_pages: self.max_pages.unwrap_or(DEFAULT_MAX_PAGES),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> Credentials {
        Credentials::new("acme", "admin", "secret")
    }

    #[test]
    fn test_client_base_url_from_domain() {
        let client = Client::new(credentials()).unwrap();
        assert_eq!(
            client.base_url().as_str(),
            "https://acme.beanstalkapp.com/api/"
        );
    }

    #[test]
    fn test_builder_requires_credentials() {
        let err = Client::builder().build().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_builder_appends_trailing_slash() {
        let client = Client::builder()
            .credentials(credentials())
            .base_url("http://127.0.0.1:8080/api")
            .build()
            .unwrap();
        assert_eq!(client.base_url().as_str(), "http://127.0.0.1:8080/api/");
    }

    #[test]
    fn test_build_url_with_query() {
        let client = Client::new(credentials()).unwrap();
        let url = client
            .build_url("users.json", &[("page", "2".into()), ("per_page", "50".into())])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://acme.beanstalkapp.com/api/users.json?page=2&per_page=50"
        );
    }

    #[test]
    fn test_debug_hides_password() {
        let client = Client::new(credentials()).unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("secret"));
    }
}
