//! Playbook loading.

use crate::declaration::parse_declarations;
use crate::{Error, Result, RoleDeclaration};
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};

const ROLES_KEY: &str = "roles";

/// The role list of a playbook's first play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playbook {
    /// Where the playbook was read from.
    pub path: PathBuf,
    /// Role declarations of the first play, in order.
    pub roles: Vec<RoleDeclaration>,
}

impl Playbook {
    /// Read and parse a playbook file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid playbook.
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).map_err(|source| Error::io(source, path, "reading playbook"))?;
        Self::from_yaml_str(&contents, path)
    }

    /// Parse playbook text; `path` is recorded and used for error messages.
    ///
    /// Only the first play is read. It must be a mapping with a `roles` list.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid YAML, an unexpected document shape, or an
    /// invalid role declaration.
    pub fn from_yaml_str(contents: &str, path: &Path) -> Result<Self> {
        let document: Value =
            serde_yaml::from_str(contents).map_err(|source| Error::yaml(source, path))?;
        let invalid = |message: &str| Error::InvalidPlaybook {
            path: path.to_path_buf(),
            message: message.to_string(),
        };

        let Value::Sequence(plays) = document else {
            return Err(invalid("expected a list of plays"));
        };
        let Some(first) = plays.first() else {
            return Err(invalid("the playbook contains no plays"));
        };
        let Value::Mapping(play) = first else {
            return Err(invalid("the first play is not a mapping"));
        };
        let roles = match play.get(ROLES_KEY) {
            Some(Value::Sequence(roles)) => roles,
            Some(_) => return Err(invalid("'roles' of the first play is not a list")),
            None => return Err(invalid("the first play has no 'roles' key")),
        };

        let roles = parse_declarations(roles, &path.display().to_string())?;
        Ok(Self {
            path: path.to_path_buf(),
            roles,
        })
    }

    /// File name of the playbook, used as the graph label.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path.file_name().map_or_else(
            || self.path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
    }
}
