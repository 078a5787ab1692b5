//! Role dependency graphs for rolegraph.
//!
//! Builds a petgraph-backed [`RoleGraph`] from an expanded
//! [`RoleRegistry`](rolegraph_roles::RoleRegistry), serializes it as DOT and
//! renders it through Graphviz.
//!
//! # Example
//!
//! ```ignore
//! use rolegraph_graph::{GraphOptions, Graphviz, RoleGraph, render};
//!
//! let graph = RoleGraph::from_registry(&registry, &catalog, &GraphOptions::default());
//! render(&graph, Path::new("site.png"), &Graphviz::default())?;
//! ```

mod dot;
mod error;
mod graph;
mod render;

pub use error::{Error, Result};
pub use graph::{
    Attributes, FONT_NAME, GraphNode, GraphOptions, LABEL_SIZE, LEGEND_OPTIONAL_SERVICE,
    LEGEND_SERVICE, RoleGraph, RoleGraphBuilder, html_label,
};
pub use render::{DEFAULT_LAYOUT, Graphviz, LayoutEngine, output_format, render};
