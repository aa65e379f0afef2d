//! Wire types for the Beanstalk API.
//!
//! Users and repositories keep every field the service returned, in the order
//! it returned them, so detail views can render fields this crate does not
//! model explicitly.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type UserId = u64;
pub type RepositoryId = u64;

fn id_field(fields: &Map<String, Value>, key: &str) -> Result<u64, String> {
    match fields.get(key) {
        Some(Value::Number(n)) => n
            .as_u64()
            .ok_or_else(|| format!("field '{}' is not an unsigned integer", key)),
        Some(Value::String(s)) => s
            .trim()
            .parse()
            .map_err(|_| format!("field '{}' is not an unsigned integer", key)),
        Some(_) => Err(format!("field '{}' is not an unsigned integer", key)),
        None => Err(format!("missing field '{}'", key)),
    }
}

fn text_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    }
}

/// Account user.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct User {
    pub id: UserId,
    pub login: String,
    pub first_name: String,
    pub last_name: String,
    fields: Map<String, Value>,
}

impl User {
    pub fn new(
        id: UserId,
        login: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
    ) -> Self {
        let login = login.into();
        let first_name = first_name.into();
        let last_name = last_name.into();

        let mut fields = Map::new();
        fields.insert("id".into(), Value::from(id));
        fields.insert("login".into(), Value::from(login.clone()));
        fields.insert("first_name".into(), Value::from(first_name.clone()));
        fields.insert("last_name".into(), Value::from(last_name.clone()));

        Self {
            id,
            login,
            first_name,
            last_name,
            fields,
        }
    }

    /// Append an extra field, as the service would return it.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// All fields in response order.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl TryFrom<Map<String, Value>> for User {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        Ok(Self {
            id: id_field(&fields, "id")?,
            login: text_field(&fields, "login").ok_or("missing field 'login'")?,
            first_name: text_field(&fields, "first_name").unwrap_or_default(),
            last_name: text_field(&fields, "last_name").unwrap_or_default(),
            fields,
        })
    }
}

impl From<User> for Map<String, Value> {
    fn from(user: User) -> Self {
        user.fields
    }
}

/// Hosted repository.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Repository {
    pub id: RepositoryId,
    pub name: String,
    pub title: String,
    fields: Map<String, Value>,
}

impl Repository {
    pub fn new(id: RepositoryId, name: impl Into<String>, title: impl Into<String>) -> Self {
        let name = name.into();
        let title = title.into();

        let mut fields = Map::new();
        fields.insert("id".into(), Value::from(id));
        fields.insert("name".into(), Value::from(name.clone()));
        fields.insert("title".into(), Value::from(title.clone()));

        Self {
            id,
            name,
            title,
            fields,
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl TryFrom<Map<String, Value>> for Repository {
    type Error = String;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let name = text_field(&fields, "name").ok_or("missing field 'name'")?;
        Ok(Self {
            id: id_field(&fields, "id")?,
            title: text_field(&fields, "title").unwrap_or_else(|| name.clone()),
            name,
            fields,
        })
    }
}

impl From<Repository> for Map<String, Value> {
    fn from(repository: Repository) -> Self {
        repository.fields
    }
}

/// One user's access to one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub user_id: UserId,
    pub repository_id: RepositoryId,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub write: bool,
    #[serde(default)]
    pub full_deployments_access: bool,
}

impl PermissionRecord {
    pub fn new(user_id: UserId, repository_id: RepositoryId, read: bool, write: bool) -> Self {
        Self {
            id: None,
            user_id,
            repository_id,
            read,
            write,
            full_deployments_access: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseVariantError {
    kind: &'static str,
    value: String,
}

/// Repository label colors accepted by Beanstalk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LabelColor {
    #[default]
    White,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Pink,
    Grey,
}

impl LabelColor {
    pub fn all() -> &'static [LabelColor] {
        &[
            LabelColor::White,
            LabelColor::Red,
            LabelColor::Orange,
            LabelColor::Yellow,
            LabelColor::Green,
            LabelColor::Blue,
            LabelColor::Pink,
            LabelColor::Grey,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LabelColor::White => "white",
            LabelColor::Red => "red",
            LabelColor::Orange => "orange",
            LabelColor::Yellow => "yellow",
            LabelColor::Green => "green",
            LabelColor::Blue => "blue",
            LabelColor::Pink => "pink",
            LabelColor::Grey => "grey",
        }
    }

    /// Value of the `color_label` field on the wire.
    pub fn wire_value(&self) -> String {
        format!("label-{}", self.as_str())
    }
}

impl fmt::Display for LabelColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelColor {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LabelColor::all()
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| ParseVariantError {
                kind: "label color",
                value: s.to_string(),
            })
    }
}

/// Version control systems a repository can be created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Vcs {
    Svn,
    #[default]
    Git,
    Mercurial,
}

impl Vcs {
    pub fn all() -> &'static [Vcs] {
        &[Vcs::Svn, Vcs::Git, Vcs::Mercurial]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Vcs::Svn => "svn",
            Vcs::Git => "git",
            Vcs::Mercurial => "mercurial",
        }
    }

    /// Value of the `type_id` field on the wire.
    pub fn wire_value(&self) -> &'static str {
        match self {
            Vcs::Svn => "subversion",
            Vcs::Git => "git",
            Vcs::Mercurial => "mercurial",
        }
    }
}

impl fmt::Display for Vcs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vcs {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Vcs::all()
            .iter()
            .find(|v| v.as_str() == s)
            .copied()
            .ok_or_else(|| ParseVariantError {
                kind: "vcs",
                value: s.to_string(),
            })
    }
}

/// Request to create a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRepository {
    pub name: String,
    pub title: String,
    pub color_label: LabelColor,
    pub vcs: Vcs,
}

impl NewRepository {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            title: name.clone(),
            name,
            color_label: LabelColor::default(),
            vcs: Vcs::default(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_color_label(mut self, color: LabelColor) -> Self {
        self.color_label = color;
        self
    }

    pub fn with_vcs(mut self, vcs: Vcs) -> Self {
        self.vcs = vcs;
        self
    }
}

/// Request to grant a user access to a repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewPermission {
    pub user_id: UserId,
    pub repository_id: RepositoryId,
    pub read: bool,
    pub write: bool,
}

impl NewPermission {
    /// Read and write access, the only policy bulk assignment applies.
    pub fn read_write(user_id: UserId, repository_id: RepositoryId) -> Self {
        Self {
            user_id,
            repository_id,
            read: true,
            write: true,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryEnvelope {
    pub repository: Repository,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PermissionEnvelope {
    pub permission: PermissionRecord,
}

#[derive(Debug, Serialize)]
pub(crate) struct RepositoryPayload<'a> {
    pub repository: RepositoryBody<'a>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RepositoryBody<'a> {
    pub name: &'a str,
    pub title: &'a str,
    pub color_label: String,
    pub type_id: &'static str,
}

impl<'a> From<&'a NewRepository> for RepositoryPayload<'a> {
    fn from(repository: &'a NewRepository) -> Self {
        Self {
            repository: RepositoryBody {
                name: &repository.name,
                title: &repository.title,
                color_label: repository.color_label.wire_value(),
                type_id: repository.vcs.wire_value(),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct PermissionPayload {
    pub permission: PermissionBody,
}

#[derive(Debug, Serialize)]
pub(crate) struct PermissionBody {
    pub user_id: UserId,
    pub repository_id: RepositoryId,
    pub read: bool,
    pub write: bool,
    pub full_deployments_access: bool,
}

impl From<&NewPermission> for PermissionPayload {
    fn from(permission: &NewPermission) -> Self {
        Self {
            permission: PermissionBody {
                user_id: permission.user_id,
                repository_id: permission.repository_id,
                read: permission.read,
                write: permission.write,
                full_deployments_access: false,
            },
        }
    }
}
