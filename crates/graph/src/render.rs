//! Rendering a [`RoleGraph`] to a file through a Graphviz layout engine.

use crate::error::{Error, Result};
use crate::graph::RoleGraph;
use std::io::{self, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use tracing::{debug, info};

/// Graphviz program used when no layout is given.
pub const DEFAULT_LAYOUT: &str = "dot";

/// Extensions written as unprocessed DOT source.
const RAW_FORMATS: &[&str] = &["dot", "gv"];

/// Lays out DOT source and writes the result in a given format.
pub trait LayoutEngine {
    /// Render `dot` as `format` into `output`.
    ///
    /// # Errors
    ///
    /// Returns an error when the engine cannot run or reports a failure.
    fn layout(&self, dot: &str, format: &str, output: &Path) -> Result<()>;
}

/// A Graphviz layout program (`dot`, `neato`, `circo`, ...) run as a subprocess.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graphviz {
    program: String,
}

impl Graphviz {
    /// Engine running `program`.
    #[must_use]
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Program name or path.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for Graphviz {
    fn default() -> Self {
        Self::new(DEFAULT_LAYOUT)
    }
}

impl LayoutEngine for Graphviz {
    fn layout(&self, dot: &str, format: &str, output: &Path) -> Result<()> {
        debug!(program = %self.program, format, output = %output.display(), "Spawning layout engine");

        let mut child = Command::new(&self.program)
            .arg(format!("-T{format}"))
            .arg("-o")
            .arg(output)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::EngineNotFound {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take()
            && let Err(source) = stdin.write_all(dot.as_bytes())
            && source.kind() != io::ErrorKind::BrokenPipe
        {
            return Err(Error::Io {
                source,
                path: output.to_path_buf(),
                operation: format!("piping graph to {}", self.program),
            });
        }

        let result = child.wait_with_output().map_err(|source| Error::Io {
            source,
            path: output.to_path_buf(),
            operation: format!("waiting for {}", self.program),
        })?;

        if !result.status.success() {
            return Err(Error::EngineFailed {
                program: self.program.clone(),
                format: format.to_string(),
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

/// Output format derived from the extension of `path`, lowercased.
///
/// # Errors
///
/// Returns [`Error::MissingExtension`] when the path has no usable extension.
pub fn output_format(path: &Path) -> Result<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| Error::MissingExtension {
            path: path.to_path_buf(),
        })
}

/// Render `graph` to `output`.
///
/// `.dot` and `.gv` outputs receive the DOT source directly; every other
/// extension is handed to `engine` as the Graphviz output format.
///
/// # Errors
///
/// Returns an error when the format cannot be determined, the file cannot be
/// written, or the engine fails.
pub fn render<E: LayoutEngine + ?Sized>(graph: &RoleGraph, output: &Path, engine: &E) -> Result<()> {
    let format = output_format(output)?;
    let dot = graph.to_dot();

    if RAW_FORMATS.contains(&format.as_str()) {
        std::fs::write(output, dot).map_err(|source| Error::Io {
            source,
            path: output.to_path_buf(),
            operation: "writing DOT source".to_string(),
        })?;
    } else {
        engine.layout(&dot, &format, output)?;
    }

    info!(output = %output.display(), format = %format, "Rendered role graph");
    Ok(())
}
