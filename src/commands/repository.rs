//! Repository creation arguments.

use crate::client::{LabelColor, NewRepository, Vcs};
use crate::{Error, Result};

/// Labels of the positional arguments, used in replies and errors.
pub const ARGUMENT_LABELS: [&str; 4] = ["Name", "Title", "Label-color", "Vcs"];

/// Parsed `create_repository <name> [title] [label-color] [vcs]` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRepositoryArgs {
    pub name: String,
    pub title: String,
    pub color_label: LabelColor,
    pub vcs: Vcs,
}

impl CreateRepositoryArgs {
    /// Parse positional arguments. Arguments past the fourth are ignored.
    ///
    /// The title defaults to the name, the color to `white` and the VCS to
    /// `git`. Supplied values are validated in order, color before VCS, and
    /// the first invalid one is reported with its index.
    pub fn parse(args: &[&str]) -> Result<Self> {
        let name = match args.first() {
            Some(name) if !name.is_empty() => name.to_string(),
            other => return Err(invalid(0, other.copied().unwrap_or_default())),
        };

        let title = args.get(1).map_or_else(|| name.clone(), |t| t.to_string());

        let color_label = match args.get(2) {
            Some(raw) => raw.parse().map_err(|_| invalid(2, raw))?,
            None => LabelColor::default(),
        };

        let vcs = match args.get(3) {
            Some(raw) => raw.parse().map_err(|_| invalid(3, raw))?,
            None => Vcs::default(),
        };

        Ok(Self {
            name,
            title,
            color_label,
            vcs,
        })
    }

    pub fn to_new_repository(&self) -> NewRepository {
        NewRepository::new(&self.name)
            .with_title(&self.title)
            .with_color_label(self.color_label)
            .with_vcs(self.vcs)
    }

    /// Chat reply describing the repository about to be created.
    pub fn summary(&self) -> String {
        format!(
            "Creating repository\n{}:{}\n{}:{}\n{}:{}\n{}:{}",
            ARGUMENT_LABELS[0],
            self.name,
            ARGUMENT_LABELS[1],
            self.title,
            ARGUMENT_LABELS[2],
            self.color_label,
            ARGUMENT_LABELS[3],
            self.vcs
        )
    }
}

fn invalid(index: usize, value: &str) -> Error {
    Error::InvalidArgument {
        index,
        label: ARGUMENT_LABELS[index],
        value: value.to_string(),
    }
}
