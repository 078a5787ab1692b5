//! Error types for graph rendering.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering a role graph.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The output path has no extension to derive a format from.
    #[error("Cannot determine output format of {}: the file has no extension", path.display())]
    #[diagnostic(
        code(rolegraph::graph::missing_extension),
        help("Use an extension supported by Graphviz, e.g. graph.png, graph.svg or graph.dot")
    )]
    MissingExtension {
        /// The output path.
        path: PathBuf,
    },

    /// The layout engine executable could not be started.
    #[error("Layout engine '{program}' could not be started: {source}")]
    #[diagnostic(
        code(rolegraph::graph::engine_not_found),
        help("Install Graphviz or pass --layout with the path to a Graphviz layout program")
    )]
    EngineNotFound {
        /// Program that was invoked.
        program: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The layout engine ran but reported a failure.
    #[error("Layout engine '{program}' failed to render {format} ({status}): {stderr}")]
    #[diagnostic(
        code(rolegraph::graph::engine_failed),
        help("The output format may not be supported by this Graphviz build")
    )]
    EngineFailed {
        /// Program that was invoked.
        program: String,
        /// Requested output format.
        format: String,
        /// Exit status of the engine.
        status: String,
        /// Captured standard error of the engine.
        stderr: String,
    },

    /// Writing the output or talking to the engine failed.
    #[error("I/O error during {operation} at {}: {source}", path.display())]
    #[diagnostic(
        code(rolegraph::graph::io_error),
        help("Check that the output directory exists and is writable")
    )]
    Io {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Path involved.
        path: PathBuf,
        /// Description of the operation being performed.
        operation: String,
    },
}
