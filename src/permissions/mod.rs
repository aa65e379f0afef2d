//! Permission reports.
//!
//! Raw records arrive one [`PermissionGroup`] per user, as the service returns
//! them. [`aggregate`] turns any number of groups into the chat report:
//!
//! ```text
//!
//! User: Alice Smith
//! Repository: core | Permissions: Read True, Write False
//! Repository: web | Permissions: Read True, Write True
//! ```

use crate::client::{BeanstalkApi, PermissionRecord, RepositoryId, UserId};
use crate::directory::Snapshot;
use crate::Result;

/// All permission records the service returned for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionGroup(pub Vec<PermissionRecord>);

impl PermissionGroup {
    pub fn records(&self) -> &[PermissionRecord] {
        &self.0
    }
}

impl From<Vec<PermissionRecord>> for PermissionGroup {
    fn from(records: Vec<PermissionRecord>) -> Self {
        Self(records)
    }
}

/// Render a boolean the way the chat report spells it.
pub fn flag(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Build the permission report for `groups`.
///
/// Records are grouped by user in first-seen order, and by repository in
/// first-seen order within each user, so every user header appears once even
/// when a user's records are spread across groups. Ids missing from
/// `snapshot` fail with [`Error::NotFound`](crate::Error::NotFound).
pub fn aggregate(snapshot: &Snapshot, groups: &[PermissionGroup]) -> Result<String> {
    let mut by_user: Vec<(UserId, Vec<(RepositoryId, Vec<&PermissionRecord>)>)> = Vec::new();

    for record in groups.iter().flat_map(|g| g.records()) {
        let pos = match by_user.iter().position(|(id, _)| *id == record.user_id) {
            Some(pos) => pos,
            None => {
                by_user.push((record.user_id, Vec::new()));
                by_user.len() - 1
            }
        };

        let repositories = &mut by_user[pos].1;
        match repositories
            .iter_mut()
            .find(|(id, _)| *id == record.repository_id)
        {
            Some((_, records)) => records.push(record),
            None => repositories.push((record.repository_id, vec![record])),
        }
    }

    let mut report = String::new();
    for (user_id, repositories) in by_user {
        let user = snapshot.require_user(user_id)?;
        report.push_str(&format!("\nUser: {}\n", user.full_name()));

        for (repository_id, records) in repositories {
            let repository = snapshot.require_repository(repository_id)?;
            for record in records {
                report.push_str(&format!(
                    "Repository: {} | Permissions: Read {}, Write {}\n",
                    repository.name,
                    flag(record.read),
                    flag(record.write)
                ));
            }
        }
    }

    Ok(report)
}

/// Records of a single user.
pub async fn fetch_user_permissions(
    api: &dyn BeanstalkApi,
    user_id: UserId,
) -> Result<PermissionGroup> {
    let records = api.find_permissions(user_id).await?;
    tracing::debug!(user_id, records = records.len(), "Fetched permissions");
    Ok(PermissionGroup(records))
}

/// One group per snapshot user, fetched one user at a time in directory order.
pub async fn fetch_all_permissions(
    api: &dyn BeanstalkApi,
    snapshot: &Snapshot,
) -> Result<Vec<PermissionGroup>> {
    let mut groups = Vec::with_capacity(snapshot.users().len());
    for user in snapshot.users() {
        groups.push(fetch_user_permissions(api, user.id).await?);
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::client::{Repository, User};

    fn snapshot() -> Snapshot {
        Snapshot::new(
            vec![User::new(1, "ab", "A", "B"), User::new(2, "cd", "C", "D")],
            vec![
                Repository::new(10, "repo-a", "Repo A"),
                Repository::new(11, "repo-b", "Repo B"),
            ],
        )
    }

    #[test]
    fn test_single_group_report() {
        let groups = vec![PermissionGroup(vec![
            PermissionRecord::new(1, 10, true, false),
            PermissionRecord::new(1, 11, false, true),
        ])];

        assert_eq!(
            aggregate(&snapshot(), &groups).unwrap(),
            "\nUser: A B\nRepository: repo-a | Permissions: Read True, Write False\nRepository: repo-b | Permissions: Read False, Write True\n"
        );
    }

    #[test]
    fn test_two_users_kept_apart() {
        let groups = vec![
            PermissionGroup(vec![PermissionRecord::new(1, 10, true, true)]),
            PermissionGroup(vec![
                PermissionRecord::new(2, 10, true, false),
                PermissionRecord::new(2, 11, true, false),
            ]),
        ];

        assert_eq!(
            aggregate(&snapshot(), &groups).unwrap(),
            "\nUser: A B\nRepository: repo-a | Permissions: Read True, Write True\n\
             \nUser: C D\nRepository: repo-a | Permissions: Read True, Write False\n\
             Repository: repo-b | Permissions: Read True, Write False\n"
        );
    }

    #[test]
    fn test_non_contiguous_user_records_get_one_header() {
        let groups = vec![
            PermissionGroup(vec![
                PermissionRecord::new(1, 10, true, false),
                PermissionRecord::new(2, 10, true, true),
            ]),
            PermissionGroup(vec![PermissionRecord::new(1, 11, false, false)]),
        ];

        let report = aggregate(&snapshot(), &groups).unwrap();
        assert_eq!(report.matches("User: A B").count(), 1);
        assert_eq!(report.matches("User: C D").count(), 1);
        assert!(report.starts_with(
            "\nUser: A B\nRepository: repo-a | Permissions: Read True, Write False\nRepository: repo-b | Permissions: Read False, Write False\n"
        ));
    }

    #[test]
    fn test_empty_groups() {
        assert_eq!(aggregate(&snapshot(), &[]).unwrap(), "");
        assert_eq!(
            aggregate(&snapshot(), &[PermissionGroup::default()]).unwrap(),
            ""
        );
    }

    #[test]
    fn test_unknown_repository_fails() {
        let groups = vec![PermissionGroup(vec![PermissionRecord::new(1, 99, true, true)])];
        let err = aggregate(&snapshot(), &groups).unwrap_err();
        assert!(matches!(err, Error::NotFound { ref id, .. } if id == "99"));
        assert_eq!(err.to_string(), "repository '99' not found");
    }

    #[test]
    fn test_unknown_user_fails() {
        let groups = vec![PermissionGroup(vec![PermissionRecord::new(7, 10, true, true)])];
        let err = aggregate(&snapshot(), &groups).unwrap_err();
        assert_eq!(err.to_string(), "user '7' not found");
    }
}
