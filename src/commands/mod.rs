//! Chat command handlers.
//!
//! Every handler except `create_repository` fetches a fresh [`Snapshot`]
//! before doing anything else. Lookup misses and invalid arguments come back
//! as reply text; remote failures come back as `Err`.

pub mod format;
pub mod repository;

pub use format::{REPOSITORY_HEADER_FIELDS, USER_HEADER_FIELDS, display_value, format_fields};
pub use repository::{ARGUMENT_LABELS, CreateRepositoryArgs};

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::client::{
    BeanstalkApi, Client, DisabledWriter, NewPermission, RepositoryId, RepositoryWriter, UserId,
};
use crate::config::{ConfigProvider, PluginConfig, REQUIRED_KEYS};
use crate::directory::Snapshot;
use crate::permissions::{self, PermissionGroup};
use crate::{Error, Result};

pub const CREATE_REPOSITORY_USAGE: &str =
    "Usage: beanstalk_create_repository <name> [title] [label-color] [vcs]";
pub const SET_PERMISSIONS_USAGE: &str = "Usage: beanstalk_set_permissions <repository> [login]";

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CreateRepository(Vec<String>),
    ListUsers,
    ListRepositories,
    GetUserData(String),
    GetRepositoryData(String),
    SetPermissions(Vec<String>),
    GetPermissions(Vec<String>),
}

impl Command {
    /// Prefix of every command name. Optional when parsing.
    pub const PREFIX: &'static str = "beanstalk_";

    pub fn names() -> &'static [&'static str] {
        &[
            "create_repository",
            "list_users",
            "list_repositories",
            "get_user_data",
            "get_repository_data",
            "set_permissions",
            "get_permissions",
        ]
    }

    /// Parse a command name and its raw argument string.
    ///
    /// `create_repository` splits its arguments on single spaces, so empty
    /// positions are preserved. `set_permissions` and `get_permissions` split
    /// on runs of whitespace. The data commands take the whole trimmed string.
    pub fn parse(name: &str, raw_args: &str) -> Result<Self> {
        let short = name.trim().strip_prefix(Self::PREFIX).unwrap_or(name.trim());
        let raw = raw_args.trim();
        let words = || -> Vec<String> { raw.split_whitespace().map(String::from).collect() };

        match short {
            "create_repository" => {
                let args = if raw.is_empty() {
                    Vec::new()
                } else {
                    raw.split(' ').map(String::from).collect()
                };
                Ok(Command::CreateRepository(args))
            }
            "list_users" => Ok(Command::ListUsers),
            "list_repositories" => Ok(Command::ListRepositories),
            "get_user_data" => Ok(Command::GetUserData(raw.to_string())),
            "get_repository_data" => Ok(Command::GetRepositoryData(raw.to_string())),
            "set_permissions" => Ok(Command::SetPermissions(words())),
            "get_permissions" => Ok(Command::GetPermissions(words())),
            _ => Err(Error::UnknownCommand(name.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::CreateRepository(_) => "create_repository",
            Command::ListUsers => "list_users",
            Command::ListRepositories => "list_repositories",
            Command::GetUserData(_) => "get_user_data",
            Command::GetRepositoryData(_) => "get_repository_data",
            Command::SetPermissions(_) => "set_permissions",
            Command::GetPermissions(_) => "get_permissions",
        }
    }

    /// One line per command, for the host's help output.
    pub fn help() -> String {
        [
            ("create_repository <name> [title] [label-color] [vcs]", "Create a repository"),
            ("list_users", "List all users"),
            ("list_repositories", "List all repositories"),
            ("get_user_data <login>", "Show all data about a user"),
            ("get_repository_data <name>", "Show all data about a repository"),
            (
                "set_permissions <repository> [login]",
                "Grant read/write access to one user or to every user",
            ),
            (
                "get_permissions [login]",
                "Show the permissions of one user or of every user",
            ),
        ]
        .iter()
        .map(|(usage, about)| format!("{}{} - {}\n", Self::PREFIX, usage, about))
        .collect()
    }
}

/// Turn user-facing errors into reply text.
fn into_reply(result: Result<String>) -> Result<String> {
    match result {
        Err(e) if e.is_user_facing() => Ok(e.to_string()),
        other => other,
    }
}

/// The Beanstalk chat plugin.
#[derive(Clone)]
pub struct BeanstalkPlugin {
    api: Arc<dyn BeanstalkApi>,
    writer: Arc<dyn RepositoryWriter>,
    exclude_users: BTreeSet<String>,
}

impl BeanstalkPlugin {
    pub fn builder() -> PluginBuilder {
        PluginBuilder::default()
    }

    /// Plugin talking to the account described by `config`, with mutations
    /// disabled.
    pub fn from_config(config: PluginConfig) -> Result<Self> {
        let client = Client::new(config.credentials)?;
        Self::builder()
            .api(Arc::new(client))
            .exclude_users(config.exclude_users)
            .build()
    }

    /// Load configuration and build the plugin.
    ///
    /// Returns `None`, after logging once, when a required key is missing.
    pub async fn activate(provider: &dyn ConfigProvider) -> Result<Option<Self>> {
        match PluginConfig::load(provider).await? {
            Some(config) => {
                tracing::info!(
                    domain = config.credentials.domain(),
                    excluded = config.exclude_users.len(),
                    "Starting beanstalk plugin"
                );
                Self::from_config(config).map(Some)
            }
            None => {
                let missing = PluginConfig::missing_keys(provider).await?;
                tracing::info!(
                    ?missing,
                    required = ?REQUIRED_KEYS,
                    "Not starting beanstalk, plugin not configured"
                );
                Ok(None)
            }
        }
    }

    pub fn writer(&self) -> &dyn RepositoryWriter {
        self.writer.as_ref()
    }

    pub fn exclude_users(&self) -> &BTreeSet<String> {
        &self.exclude_users
    }

    pub fn is_excluded(&self, login: &str) -> bool {
        self.exclude_users.contains(login)
    }

    /// Fetch the directory snapshot a command works on.
    pub async fn snapshot(&self) -> Result<Snapshot> {
        Snapshot::fetch(self.api.as_ref()).await
    }

    /// Parse and run a command by name.
    pub async fn dispatch(&self, name: &str, raw_args: &str) -> Result<String> {
        match Command::parse(name, raw_args) {
            Ok(command) => self.execute(command).await,
            Err(e) => into_reply(Err(e)),
        }
    }

    pub async fn execute(&self, command: Command) -> Result<String> {
        tracing::info!(command = command.name(), "Handling beanstalk command");

        match command {
            Command::CreateRepository(args) => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                self.create_repository(&args).await
            }
            Command::ListUsers => self.list_users().await,
            Command::ListRepositories => self.list_repositories().await,
            Command::GetUserData(login) => self.get_user_data(&login).await,
            Command::GetRepositoryData(name) => self.get_repository_data(&name).await,
            Command::SetPermissions(args) => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                self.set_permissions(&args).await
            }
            Command::GetPermissions(args) => {
                let args: Vec<&str> = args.iter().map(String::as_str).collect();
                self.get_permissions(&args).await
            }
        }
    }

    /// `create_repository <name> [title] [label-color] [vcs]`
    pub async fn create_repository(&self, args: &[&str]) -> Result<String> {
        if args.first().is_none_or(|name| name.is_empty()) {
            return Ok(CREATE_REPOSITORY_USAGE.to_string());
        }

        let parsed = match CreateRepositoryArgs::parse(args) {
            Ok(parsed) => parsed,
            Err(e) => return into_reply(Err(e)),
        };

        self.writer
            .create_repository(&parsed.to_new_repository())
            .await?;
        Ok(parsed.summary())
    }

    /// `list_users`
    pub async fn list_users(&self) -> Result<String> {
        let snapshot = self.snapshot().await?;

        let mut reply = String::from("\n");
        for user in snapshot.users() {
            reply.push_str(&format!(
                "{}\n{}\n",
                user.full_name(),
                format_fields(user.fields(), USER_HEADER_FIELDS)
            ));
        }
        Ok(reply)
    }

    /// `list_repositories`
    pub async fn list_repositories(&self) -> Result<String> {
        let snapshot = self.snapshot().await?;

        let mut reply = String::from("\n");
        for repository in snapshot.repositories() {
            reply.push_str(&format!(
                "{}\n{}\n",
                repository.title,
                format_fields(repository.fields(), REPOSITORY_HEADER_FIELDS)
            ));
        }
        Ok(reply)
    }

    /// `get_user_data <login>`
    pub async fn get_user_data(&self, login: &str) -> Result<String> {
        let snapshot = self.snapshot().await?;

        Ok(match snapshot.user_by_login(login) {
            Some(user) => format_fields(user.fields(), USER_HEADER_FIELDS),
            None => format!("The user '{}' does not exist", login),
        })
    }

    /// `get_repository_data <name>`
    pub async fn get_repository_data(&self, name: &str) -> Result<String> {
        let snapshot = self.snapshot().await?;

        Ok(match snapshot.repository_by_name(name) {
            Some(repository) => format_fields(repository.fields(), REPOSITORY_HEADER_FIELDS),
            None => format!("The repository '{}' does not exist", name),
        })
    }

    /// `set_permissions <repository> [login]`
    pub async fn set_permissions(&self, args: &[&str]) -> Result<String> {
        match args {
            [repository] => {
                let snapshot = self.snapshot().await?;
                self.set_permissions_all_users(&snapshot, repository).await
            }
            [repository, login] => {
                let snapshot = self.snapshot().await?;
                self.set_permissions_single_user(&snapshot, repository, login)
                    .await
            }
            _ => Ok(SET_PERMISSIONS_USAGE.to_string()),
        }
    }

    /// Grant default permissions on `repository` to every user not excluded.
    pub async fn set_permissions_all_users(
        &self,
        snapshot: &Snapshot,
        repository: &str,
    ) -> Result<String> {
        let Some(repository_id) = snapshot.repository_id_for(repository) else {
            return Ok(format!("Repository '{}' not found\n", repository));
        };

        let mut reply = format!(
            "Setting permissions for repository: {}({})\n",
            repository, repository_id
        );
        for user in snapshot.users() {
            reply.push_str(
                &self
                    .assign_permission(repository_id, user.id, &user.login)
                    .await?,
            );
        }
        Ok(reply)
    }

    pub async fn set_permissions_single_user(
        &self,
        snapshot: &Snapshot,
        repository: &str,
        login: &str,
    ) -> Result<String> {
        let Some(repository_id) = snapshot.repository_id_for(repository) else {
            return Ok(format!("Repository '{}' not found\n", repository));
        };
        let Some(user_id) = snapshot.user_id_for(login) else {
            return Ok(format!("User '{}' not found\n", login));
        };

        self.assign_permission(repository_id, user_id, login).await
    }

    async fn assign_permission(
        &self,
        repository_id: RepositoryId,
        user_id: UserId,
        login: &str,
    ) -> Result<String> {
        if self.is_excluded(login) {
            tracing::debug!(login, "Skipping excluded user");
            return Ok(format!("User '{}' is excluded\n", login));
        }

        self.writer
            .create_permission(&NewPermission::read_write(user_id, repository_id))
            .await?;
        Ok(format!("Set permissions for user: {}({})\n", login, user_id))
    }

    /// `get_permissions [login]`
    ///
    /// With exactly one argument, reports that user; otherwise reports every
    /// user.
    pub async fn get_permissions(&self, args: &[&str]) -> Result<String> {
        let snapshot = self.snapshot().await?;

        let groups = match args {
            [login] => match snapshot.user_id_for(login) {
                Some(user_id) => {
                    vec![permissions::fetch_user_permissions(self.api.as_ref(), user_id).await?]
                }
                None => return Ok(format!("The user '{}' doesn't exist", login)),
            },
            _ => permissions::fetch_all_permissions(self.api.as_ref(), &snapshot).await?,
        };

        into_reply(self.report(&snapshot, &groups))
    }

    fn report(&self, snapshot: &Snapshot, groups: &[PermissionGroup]) -> Result<String> {
        permissions::aggregate(snapshot, groups)
    }
}

impl std::fmt::Debug for BeanstalkPlugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BeanstalkPlugin")
            .field("writer", &self.writer.name())
            .field("exclude_users", &self.exclude_users)
            .finish()
    }
}

#[derive(Default)]
pub struct PluginBuilder {
    api: Option<Arc<dyn BeanstalkApi>>,
    writer: Option<Arc<dyn RepositoryWriter>>,
    exclude_users: BTreeSet<String>,
}

impl PluginBuilder {
    pub fn api(mut self, api: Arc<dyn BeanstalkApi>) -> Self {
        self.api = Some(api);
        self
    }

    /// Install a writer. Defaults to [`DisabledWriter`].
    pub fn writer(mut self, writer: Arc<dyn RepositoryWriter>) -> Self {
        self.writer = Some(writer);
        self
    }

    pub fn exclude_users<I, S>(mut self, logins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_users
            .extend(logins.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Result<BeanstalkPlugin> {
        let api = self
            .api
            .ok_or_else(|| Error::Config("Beanstalk API is required".into()))?;
        Ok(BeanstalkPlugin {
            api,
            writer: self.writer.unwrap_or_else(|| Arc::new(DisabledWriter)),
            exclude_users: self.exclude_users,
        })
    }
}
