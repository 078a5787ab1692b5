//! The set of roles considered application services.

use crate::{Error, Result};
use serde_yaml::Value;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

/// Roles treated as services when no other catalog is configured.
pub const DEFAULT_SERVICES: &[&str] = &[
    "analytics_api",
    "certs",
    "ecommerce",
    "ecomworker",
    "edxapp",
    "elasticsearch",
    "forum",
    "insights",
    "memcache",
    "mongo",
    "mysql",
    "nginx",
    "notifier",
    "programs",
    "rabbitmq",
    "supervisor",
    "xqueue",
];

/// Immutable set of service role names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCatalog {
    names: BTreeSet<String>,
}

impl ServiceCatalog {
    /// Build a catalog from any list of names.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Load a catalog from a YAML file containing a list of role names.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid YAML, or is
    /// not a list of strings.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|source| Error::io(source, path, "reading services file"))?;
        Self::from_yaml_str(&contents, path)
    }

    /// Parse a catalog from YAML text; `path` is used for error messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a YAML list of strings.
    pub fn from_yaml_str(contents: &str, path: &Path) -> Result<Self> {
        let value: Value =
            serde_yaml::from_str(contents).map_err(|source| Error::yaml(source, path))?;
        let invalid = |message: String| Error::InvalidServices {
            path: path.to_path_buf(),
            message,
        };

        let Value::Sequence(entries) = value else {
            return Err(invalid("expected a list of role names".to_string()));
        };

        let names = entries
            .into_iter()
            .map(|entry| match entry {
                Value::String(name) => Ok(name),
                other => Err(invalid(format!("entry {other:?} is not a role name"))),
            })
            .collect::<Result<BTreeSet<_>>>()?;

        Ok(Self { names })
    }

    /// Whether `name` is a service.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Service names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Number of services in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICES.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog() {
        let catalog = ServiceCatalog::default();
        assert_eq!(catalog.len(), DEFAULT_SERVICES.len());
        assert!(catalog.contains("xqueue"));
        assert!(catalog.contains("analytics_api"));
        assert!(!catalog.contains("common"));
    }

    #[test]
    fn test_from_yaml_str() {
        let catalog =
            ServiceCatalog::from_yaml_str("- web\n- worker\n", Path::new("services.yml")).unwrap();
        assert_eq!(catalog.iter().collect::<Vec<_>>(), vec!["web", "worker"]);
    }

    #[test]
    fn test_from_yaml_str_rejects_mapping() {
        let err = ServiceCatalog::from_yaml_str("web: true\n", Path::new("services.yml"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidServices { .. }));
    }

    #[test]
    fn test_from_yaml_str_rejects_non_string_entry() {
        let err =
            ServiceCatalog::from_yaml_str("- web\n- 3\n", Path::new("services.yml")).unwrap_err();
        assert!(err.to_string().contains("not a role name"));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = ServiceCatalog::load(&dir.path().join("missing.yml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
