//! Account directory snapshot and lookups.
//!
//! A [`Snapshot`] is fetched at the start of every command and dropped when the
//! command returns. All lookups are linear scans; the first match wins when
//! the service reports duplicate logins or names.

use crate::client::{BeanstalkApi, Repository, RepositoryId, User, UserId};
use crate::{Error, Result};

/// Read-only view of all users and repositories of an account.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    users: Vec<User>,
    repositories: Vec<Repository>,
}

impl Snapshot {
    pub fn new(users: Vec<User>, repositories: Vec<Repository>) -> Self {
        Self {
            users,
            repositories,
        }
    }

    /// Fetch users, then repositories.
    pub async fn fetch(api: &dyn BeanstalkApi) -> Result<Self> {
        let users = api.find_users().await?;
        let repositories = api.find_repositories().await?;
        tracing::debug!(
            users = users.len(),
            repositories = repositories.len(),
            "Fetched directory snapshot"
        );
        Ok(Self::new(users, repositories))
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    /// Id of the user whose login matches, ignoring surrounding whitespace.
    pub fn user_id_for(&self, login: &str) -> Option<UserId> {
        let login = login.trim();
        self.users
            .iter()
            .find(|u| u.login.trim() == login)
            .map(|u| u.id)
    }

    /// Id of the repository whose name matches, ignoring surrounding whitespace.
    pub fn repository_id_for(&self, name: &str) -> Option<RepositoryId> {
        let name = name.trim();
        self.repositories
            .iter()
            .find(|r| r.name.trim() == name)
            .map(|r| r.id)
    }

    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn repository(&self, id: RepositoryId) -> Option<&Repository> {
        self.repositories.iter().find(|r| r.id == id)
    }

    /// Like [`Snapshot::user`], failing with [`Error::NotFound`].
    pub fn require_user(&self, id: UserId) -> Result<&User> {
        self.user(id).ok_or_else(|| Error::user_not_found(id))
    }

    pub fn require_repository(&self, id: RepositoryId) -> Result<&Repository> {
        self.repository(id)
            .ok_or_else(|| Error::repository_not_found(id))
    }

    /// Exact login match.
    pub fn user_by_login(&self, login: &str) -> Option<&User> {
        self.users.iter().find(|u| u.login == login)
    }

    /// Exact name match.
    pub fn repository_by_name(&self, name: &str) -> Option<&Repository> {
        self.repositories.iter().find(|r| r.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Snapshot {
        Snapshot::new(
            vec![
                User::new(1, "alice", "Alice", "Smith"),
                User::new(2, "bob ", "Bob", "Jones"),
                User::new(3, "alice", "Duplicate", "Alice"),
            ],
            vec![
                Repository::new(10, "core", "Core"),
                Repository::new(11, " web", "Web"),
            ],
        )
    }

    #[test]
    fn test_user_id_for() {
        let snapshot = snapshot();
        assert_eq!(snapshot.user_id_for("alice"), Some(1));
        assert_eq!(snapshot.user_id_for("  alice\t"), Some(1));
        assert_eq!(snapshot.user_id_for("bob"), Some(2));
        assert_eq!(snapshot.user_id_for("Alice"), None);
        assert_eq!(snapshot.user_id_for("carol"), None);
    }

    #[test]
    fn test_repository_id_for() {
        let snapshot = snapshot();
        assert_eq!(snapshot.repository_id_for("core"), Some(10));
        assert_eq!(snapshot.repository_id_for("web "), Some(11));
        assert_eq!(snapshot.repository_id_for("CORE"), None);
        assert_eq!(snapshot.repository_id_for("docs"), None);
    }

    #[test]
    fn test_first_match_wins() {
        let snapshot = snapshot();
        assert_eq!(snapshot.user_by_login("alice").unwrap().id, 1);
    }

    #[test]
    fn test_exact_lookup_does_not_trim() {
        let snapshot = snapshot();
        assert!(snapshot.user_by_login("bob").is_none());
        assert!(snapshot.user_by_login("bob ").is_some());
        assert!(snapshot.repository_by_name("web").is_none());
    }

    #[test]
    fn test_require_missing_ids() {
        let snapshot = snapshot();
        assert_eq!(snapshot.require_user(2).unwrap().first_name, "Bob");
        assert!(matches!(
            snapshot.require_user(99),
            Err(Error::NotFound { ref id, .. }) if id == "99"
        ));
        assert!(snapshot.require_repository(42).is_err());
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::default();
        assert!(snapshot.users().is_empty());
        assert_eq!(snapshot.user_id_for("alice"), None);
    }
}
