//! Remote operations the plugin needs from a Beanstalk account.

use async_trait::async_trait;

use super::models::{NewPermission, NewRepository, PermissionRecord, Repository, User, UserId};
use crate::Result;

/// Read and write operations against one Beanstalk account.
///
/// [`Client`](super::Client) talks to the real service; tests supply
/// in-memory implementations.
#[async_trait]
pub trait BeanstalkApi: Send + Sync {
    /// All users of the account, in directory order.
    async fn find_users(&self) -> Result<Vec<User>>;

    /// All repositories of the account, in directory order.
    async fn find_repositories(&self) -> Result<Vec<Repository>>;

    /// Every permission record of one user.
    async fn find_permissions(&self, user_id: UserId) -> Result<Vec<PermissionRecord>>;

    async fn create_repository(&self, repository: &NewRepository) -> Result<Repository>;

    async fn create_permission(&self, permission: &NewPermission) -> Result<PermissionRecord>;
}
