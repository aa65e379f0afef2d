//! Repository and permission mutations.
//!
//! Commands never call the mutating half of [`BeanstalkApi`] directly. They go
//! through a [`RepositoryWriter`], which is [`DisabledWriter`] unless the
//! embedding application installs an [`ApiWriter`].

use std::sync::Arc;

use async_trait::async_trait;

use super::api::BeanstalkApi;
use super::models::{NewPermission, NewRepository};
use crate::Result;

#[async_trait]
pub trait RepositoryWriter: Send + Sync {
    /// Writer name for logging
    fn name(&self) -> &str;

    async fn create_repository(&self, repository: &NewRepository) -> Result<()>;

    async fn create_permission(&self, permission: &NewPermission) -> Result<()>;
}

/// Accepts every mutation and performs none of them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledWriter;

#[async_trait]
impl RepositoryWriter for DisabledWriter {
    fn name(&self) -> &str {
        "disabled"
    }

    async fn create_repository(&self, repository: &NewRepository) -> Result<()> {
        tracing::debug!(
            name = %repository.name,
            vcs = %repository.vcs,
            "Repository creation disabled, skipping"
        );
        Ok(())
    }

    async fn create_permission(&self, permission: &NewPermission) -> Result<()> {
        tracing::debug!(
            user_id = permission.user_id,
            repository_id = permission.repository_id,
            "Permission assignment disabled, skipping"
        );
        Ok(())
    }
}

/// Forwards mutations to a [`BeanstalkApi`].
#[derive(Clone)]
pub struct ApiWriter {
    api: Arc<dyn BeanstalkApi>,
}

impl ApiWriter {
    pub fn new(api: Arc<dyn BeanstalkApi>) -> Self {
        Self { api }
    }
}

impl std::fmt::Debug for ApiWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiWriter").finish_non_exhaustive()
    }
}

#[async_trait]
impl RepositoryWriter for ApiWriter {
    fn name(&self) -> &str {
        "api"
    }

    async fn create_repository(&self, repository: &NewRepository) -> Result<()> {
        let created = self.api.create_repository(repository).await?;
        tracing::info!(id = created.id, name = %created.name, "Created repository");
        Ok(())
    }

    async fn create_permission(&self, permission: &NewPermission) -> Result<()> {
        self.api.create_permission(permission).await?;
        tracing::info!(
            user_id = permission.user_id,
            repository_id = permission.repository_id,
            "Created permission"
        );
        Ok(())
    }
}
