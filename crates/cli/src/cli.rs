use crate::tracing::{LogLevel, TracingFormat};
use clap::Parser;
use miette::{Diagnostic, Report};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// CLI or configuration error exit code
pub const EXIT_CLI: i32 = 2;
/// Input, structural or render error exit code
pub const EXIT_INPUT: i32 = 3;

/// Role directory relative to the directory holding the executable.
pub const DEFAULT_ROLE_DIR: &str = "../playbooks/roles";

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// CLI or configuration error (exit code 2)
    #[error("CLI/configuration error: {message}")]
    #[diagnostic(code(rolegraph::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Unreadable or malformed playbook and role metadata (exit code 3)
    #[error("Input error: {message}")]
    #[diagnostic(code(rolegraph::cli::input))]
    Input {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Graph could not be rendered (exit code 3)
    #[error("Render error: {message}")]
    #[diagnostic(code(rolegraph::cli::render))]
    Render {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new configuration error with help text
    #[must_use]
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Short machine-readable code used in JSON envelopes.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Config { .. } => "config",
            Self::Input { .. } => "input",
            Self::Render { .. } => "render",
        }
    }
}

fn diagnostic_help(err: &dyn Diagnostic) -> Option<String> {
    err.help().map(|help| help.to_string())
}

/// Playbook, metadata and service catalog failures are input errors.
impl From<rolegraph_roles::Error> for CliError {
    fn from(err: rolegraph_roles::Error) -> Self {
        let help = diagnostic_help(&err);
        Self::Input {
            message: err.to_string(),
            help,
        }
    }
}

impl From<rolegraph_graph::Error> for CliError {
    fn from(err: rolegraph_graph::Error) -> Self {
        let help = diagnostic_help(&err);
        Self::Render {
            message: err.to_string(),
            help,
        }
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Config { .. } => EXIT_CLI,
        CliError::Input { .. } | CliError::Render { .. } => EXIT_INPUT,
    }
}

/// Render error appropriately based on JSON flag
///
/// In JSON mode the envelope goes to stdout and the error is also logged,
/// so stderr still carries the message.
#[allow(clippy::print_stdout, clippy::print_stderr)]
pub fn render_error(err: &CliError, json_mode: bool) {
    if json_mode {
        tracing::error!(code = err.kind(), "{err}");
        let error_envelope = ErrorEnvelope::new(serde_json::json!({
            "code": err.kind(),
            "message": err.to_string(),
        }));

        match serde_json::to_string(&error_envelope) {
            Ok(json) => println!("{json}"),
            Err(_) => eprintln!("Error serializing error response"),
        }
    } else {
        let report = Report::new(err.clone());
        eprintln!("{report:?}");
        let _ = io::stderr().flush();
    }
}

/// Success response envelope for JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkEnvelope<T> {
    /// Status indicator - always "ok" for success
    pub status: &'static str,
    /// The actual data payload
    pub data: T,
}

impl<T> OkEnvelope<T> {
    /// Create a new success envelope
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self { status: "ok", data }
    }
}

/// Error response envelope for JSON output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope<E> {
    /// Status indicator - always "error" for failures
    pub status: &'static str,
    /// The error details
    pub error: E,
}

impl<E> ErrorEnvelope<E> {
    /// Create a new error envelope
    #[must_use]
    pub const fn new(error: E) -> Self {
        Self {
            status: "error",
            error,
        }
    }
}

/// Render the role dependency graph of an Ansible playbook.
///
/// Follows the `meta/main.yml` dependencies of every role the first play
/// lists and draws them with Graphviz. The output file's extension selects
/// the format; `.dot` and `.gv` write the graph description itself.
#[derive(Parser, Debug)]
#[command(name = "graph-playbook")]
#[command(about = "Render the role dependency graph of an Ansible playbook")]
#[command(version)]
pub struct Cli {
    /// Playbook to graph.
    #[arg(value_name = "YAML_FILE")]
    pub playbook: PathBuf,

    /// Output file; the extension selects the format.
    #[arg(value_name = "OUTPUT_FILE")]
    pub output: PathBuf,

    /// Directory holding the roles' `meta/main.yml` files.
    #[arg(long, value_name = "PATH", env = "GRAPH_PLAYBOOK_ROLE_DIR")]
    pub role_dir: Option<PathBuf>,

    /// Color service and optional roles and add a legend.
    #[arg(long)]
    pub highlight_services: bool,

    /// Print the service roles after rendering.
    #[arg(long)]
    pub list_services: bool,

    /// YAML list of role names to treat as services instead of the built-in set.
    #[arg(long, value_name = "PATH")]
    pub services_file: Option<PathBuf>,

    /// Graphviz layout program.
    #[arg(
        long,
        value_name = "ENGINE",
        env = "GRAPH_PLAYBOOK_LAYOUT",
        default_value = rolegraph_graph::DEFAULT_LAYOUT
    )]
    pub layout: String,

    /// Re-expand roles on every reference. Does not terminate on cyclic dependencies.
    #[arg(long)]
    pub reexpand: bool,

    /// Logging verbosity level.
    #[arg(
        short = 'L',
        long,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    /// Log output format.
    #[arg(long, default_value = "pretty", value_enum)]
    pub log_format: TracingFormat,

    /// Emit JSON logs and JSON envelopes.
    #[arg(long, help = "Emit JSON logs and JSON envelopes")]
    pub json: bool,
}

impl Cli {
    /// Log format after applying `--json`.
    #[must_use]
    pub const fn tracing_format(&self) -> TracingFormat {
        if self.json {
            TracingFormat::Json
        } else {
            self.log_format
        }
    }
}

/// Default role directory, `../playbooks/roles` next to the running executable.
///
/// # Errors
///
/// Returns a configuration error when the executable path is unknown.
pub fn default_role_dir() -> Result<PathBuf, CliError> {
    let exe = std::env::current_exe().map_err(|e| {
        CliError::config_with_help(
            format!("Cannot locate the running executable: {e}"),
            "Pass --role-dir explicitly",
        )
    })?;
    let dir = exe.parent().ok_or_else(|| {
        CliError::config_with_help(
            format!("Executable {} has no parent directory", exe.display()),
            "Pass --role-dir explicitly",
        )
    })?;
    Ok(dir.join(DEFAULT_ROLE_DIR))
}

/// Parse command line arguments into a CLI structure.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
