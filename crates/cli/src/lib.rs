//! graph-playbook library
//!
//! Argument parsing, error reporting, tracing setup and the graph command
//! behind the `graph-playbook` binary.

pub mod cli;
pub mod commands;
pub mod tracing;

pub use cli::{CliError, exit_code_for, render_error};
pub use commands::{GraphCommand, GraphReport};
