//! Command implementations.

mod graph;

pub use graph::{GraphCommand, GraphReport};
