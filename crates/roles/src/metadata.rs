//! Role metadata lookup.
//!
//! Expansion asks a [`RoleMetadataSource`] for each role's declared
//! dependencies. [`RoleDirectory`] reads them from an Ansible-style roles
//! tree, where role `name` keeps its metadata in `<root>/name/meta/main.yml`.

use crate::declaration::parse_declarations;
use crate::{Error, Result, RoleDeclaration};
use serde_yaml::Value;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::trace;

const DEPENDENCIES_KEY: &str = "dependencies";

/// Provides the dependency declarations of a role by name.
pub trait RoleMetadataSource {
    /// Dependencies declared by `role`.
    ///
    /// Returns `Ok(None)` when the role has no metadata at all, which callers
    /// treat the same as an empty dependency list.
    ///
    /// # Errors
    ///
    /// Returns an error if metadata exists but cannot be read or parsed.
    fn dependencies_of(&self, role: &str) -> Result<Option<Vec<RoleDeclaration>>>;
}

/// Roles tree on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleDirectory {
    root: PathBuf,
}

impl RoleDirectory {
    /// Wrap a roles directory.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The roles directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Location of a role's metadata file.
    #[must_use]
    pub fn metadata_path(&self, role: &str) -> PathBuf {
        self.root.join(role).join("meta").join("main.yml")
    }
}

impl RoleMetadataSource for RoleDirectory {
    fn dependencies_of(&self, role: &str) -> Result<Option<Vec<RoleDeclaration>>> {
        let path = self.metadata_path(role);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                trace!(role, path = %path.display(), "No metadata file for role");
                return Ok(None);
            }
            Err(source) => return Err(Error::io(source, path, "reading role metadata")),
        };
        parse_role_metadata(&contents, &path).map(Some)
    }
}

impl RoleMetadataSource for HashMap<String, Vec<RoleDeclaration>> {
    fn dependencies_of(&self, role: &str) -> Result<Option<Vec<RoleDeclaration>>> {
        Ok(self.get(role).cloned())
    }
}

/// Parse the dependency list out of a `meta/main.yml` document.
///
/// An empty or null document, a missing `dependencies` key and a null
/// `dependencies` value all mean "no dependencies".
///
/// # Errors
///
/// Returns an error for invalid YAML, a document that is not a mapping, a
/// `dependencies` value that is not a list, or an invalid declaration.
pub fn parse_role_metadata(contents: &str, path: &Path) -> Result<Vec<RoleDeclaration>> {
    if contents.trim().is_empty() {
        return Ok(Vec::new());
    }

    let document: Value =
        serde_yaml::from_str(contents).map_err(|source| Error::yaml(source, path))?;
    let invalid = |message: &str| Error::InvalidMetadata {
        path: path.to_path_buf(),
        message: message.to_string(),
    };

    let meta = match document {
        Value::Null => return Ok(Vec::new()),
        Value::Mapping(meta) => meta,
        _ => return Err(invalid("expected a mapping")),
    };

    match meta.get(DEPENDENCIES_KEY) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Sequence(entries)) => {
            parse_declarations(entries, &path.display().to_string())
        }
        Some(_) => Err(invalid("'dependencies' is not a list")),
    }
}
