//! Error types for playbook loading and role expansion.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for role operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading playbooks and expanding roles.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// Reading a playbook, metadata or services file failed.
    #[error("I/O error during {operation} at {}: {source}", path.display())]
    #[diagnostic(
        code(rolegraph::roles::io_error),
        help("Check that the path exists and that you have permission to read it")
    )]
    Io {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Path being read.
        path: PathBuf,
        /// Description of the operation being performed.
        operation: String,
    },

    /// A document was not valid YAML.
    #[error("YAML parsing error in {}: {source}", path.display())]
    #[diagnostic(
        code(rolegraph::roles::yaml_error),
        help("Fix the YAML syntax in the referenced file")
    )]
    Yaml {
        /// The underlying YAML error.
        #[source]
        source: serde_yaml::Error,
        /// Path of the document.
        path: PathBuf,
    },

    /// The playbook parsed but does not have the expected shape.
    #[error("Invalid playbook {}: {message}", path.display())]
    #[diagnostic(
        code(rolegraph::roles::invalid_playbook),
        help("The playbook must be a list whose first play is a mapping with a 'roles' list")
    )]
    InvalidPlaybook {
        /// Path of the playbook.
        path: PathBuf,
        /// What is wrong with it.
        message: String,
    },

    /// A role metadata file parsed but does not have the expected shape.
    #[error("Invalid role metadata {}: {message}", path.display())]
    #[diagnostic(
        code(rolegraph::roles::invalid_metadata),
        help("meta/main.yml must be empty or a mapping with an optional 'dependencies' list")
    )]
    InvalidMetadata {
        /// Path of the metadata file.
        path: PathBuf,
        /// What is wrong with it.
        message: String,
    },

    /// A structured role declaration has no usable `role` key.
    #[error("Role declaration in {context} has no 'role' name: {entry}")]
    #[diagnostic(
        code(rolegraph::roles::missing_role_name),
        help("Structured declarations need a string 'role' key, e.g. `- role: nginx`")
    )]
    MissingRoleName {
        /// Where the declaration was found.
        context: String,
        /// The offending entry, rendered as YAML.
        entry: String,
    },

    /// A services file is not a list of role names.
    #[error("Invalid services file {}: {message}", path.display())]
    #[diagnostic(
        code(rolegraph::roles::invalid_services),
        help("The services file must be a YAML list of role names")
    )]
    InvalidServices {
        /// Path of the services file.
        path: PathBuf,
        /// What is wrong with it.
        message: String,
    },
}

impl Error {
    pub(crate) fn io(
        source: std::io::Error,
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
    ) -> Self {
        Self::Io {
            source,
            path: path.into(),
            operation: operation.into(),
        }
    }

    pub(crate) fn yaml(source: serde_yaml::Error, path: impl Into<PathBuf>) -> Self {
        Self::Yaml {
            source,
            path: path.into(),
        }
    }
}
