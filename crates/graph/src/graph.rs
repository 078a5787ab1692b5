//! Role graph construction using petgraph.
//!
//! A [`RoleGraphBuilder`] accumulates nodes and edges for a single render and
//! is consumed into an immutable [`RoleGraph`].

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{EdgeRef, IntoNodeReferences};
use rolegraph_roles::{
    OPTIONAL_SERVICE_COLOR, Role, RoleRegistry, SERVICE_COLOR, ServiceCatalog,
};
use std::collections::HashMap;
use tracing::{debug, trace};

/// Font used for node names and the graph label.
pub const FONT_NAME: &str = "helvetica";

/// Point size of the graph label.
pub const LABEL_SIZE: u32 = 20;

/// Legend node describing service roles.
pub const LEGEND_SERVICE: &str = "Service";

/// Legend node describing optional roles.
pub const LEGEND_OPTIONAL_SERVICE: &str = "Optional Service";

/// Ordered Graphviz attributes. Setting an existing key replaces its value
/// in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, String)>);

impl Attributes {
    /// Empty attribute list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.0.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.0.push((key, value));
        }
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Value of `key`, if set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set every attribute of `other` on `self`.
    pub fn merge(&mut self, other: &Self) {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
    }

    /// Attributes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Whether no attribute is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A node in the role graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphNode {
    /// Node name, the role name or a legend entry.
    pub name: String,
    /// Graphviz node attributes.
    pub attributes: Attributes,
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphOptions {
    /// Color services and optional roles, and add a legend.
    pub highlight_services: bool,
    /// Text of the graph label, usually the playbook file name.
    pub label: Option<String>,
    /// Font of nodes and label.
    pub font_name: String,
    /// Point size of the label.
    pub label_size: u32,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            highlight_services: false,
            label: None,
            font_name: FONT_NAME.to_string(),
            label_size: LABEL_SIZE,
        }
    }
}

/// Accumulates nodes and edges for one graph.
#[derive(Debug, Default)]
pub struct RoleGraphBuilder {
    graph: DiGraph<GraphNode, ()>,
    name_to_node: HashMap<String, NodeIndex>,
    graph_attributes: Attributes,
    edge_attributes: Attributes,
}

impl RoleGraphBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a graph-level attribute.
    pub fn set_graph_attribute(&mut self, key: &str, value: impl Into<String>) {
        self.graph_attributes.set(key, value);
    }

    /// Attributes applied to every edge.
    pub fn set_edge_attributes(&mut self, attributes: Attributes) {
        self.edge_attributes = attributes;
    }

    /// Add a node, or merge `attributes` into an existing node of that name.
    pub fn add_node(&mut self, name: &str, attributes: &Attributes) -> NodeIndex {
        if let Some(&index) = self.name_to_node.get(name) {
            self.graph[index].attributes.merge(attributes);
            trace!("Updated node '{}'", name);
            return index;
        }

        let index = self.graph.add_node(GraphNode {
            name: name.to_string(),
            attributes: attributes.clone(),
        });
        self.name_to_node.insert(name.to_string(), index);
        trace!("Added node '{}'", name);
        index
    }

    /// Add an edge `from -> to`, creating missing nodes.
    ///
    /// Parallel edges are collapsed into one.
    pub fn add_edge(&mut self, from: &str, to: &str) {
        let from = self.node_index(from);
        let to = self.node_index(to);
        self.graph.update_edge(from, to, ());
    }

    fn node_index(&mut self, name: &str) -> NodeIndex {
        match self.name_to_node.get(name) {
            Some(&index) => index,
            None => self.add_node(name, &Attributes::new()),
        }
    }

    /// Finish the graph.
    #[must_use]
    pub fn build(self) -> RoleGraph {
        RoleGraph {
            graph: self.graph,
            name_to_node: self.name_to_node,
            graph_attributes: self.graph_attributes,
            edge_attributes: self.edge_attributes,
        }
    }
}

/// Immutable description of a role dependency graph.
///
/// Edges point from a dependency to the role that needs it.
#[derive(Debug, Clone)]
pub struct RoleGraph {
    graph: DiGraph<GraphNode, ()>,
    name_to_node: HashMap<String, NodeIndex>,
    graph_attributes: Attributes,
    edge_attributes: Attributes,
}

impl RoleGraph {
    /// Build the graph of an expanded registry.
    ///
    /// Roles are visited in registry order. Each role adds its own node, then
    /// a node and an edge for every dependency reference. A node added again
    /// takes the attributes of the latest addition.
    #[must_use]
    pub fn from_registry(
        registry: &RoleRegistry,
        catalog: &ServiceCatalog,
        options: &GraphOptions,
    ) -> Self {
        let mut builder = RoleGraphBuilder::new();
        builder.set_edge_attributes(edge_attributes());

        if let Some(label) = &options.label {
            builder.set_graph_attribute(
                "label",
                html_label(label, &options.font_name, options.label_size),
            );
        }

        if options.highlight_services {
            for (entry, color) in [
                (LEGEND_SERVICE, SERVICE_COLOR),
                (LEGEND_OPTIONAL_SERVICE, OPTIONAL_SERVICE_COLOR),
            ] {
                let attributes = node_attributes(options)
                    .with("style", "filled")
                    .with("fillcolor", color);
                builder.add_node(entry, &attributes);
            }
        }

        for role in registry.values() {
            builder.add_node(&role.name, &role_attributes(role, catalog, options));
            for dep in &role.dependencies {
                builder.add_node(&dep.name, &role_attributes(dep, catalog, options));
                builder.add_edge(&dep.name, &role.name);
            }
        }

        let graph = builder.build();
        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            highlight = options.highlight_services,
            "Built role graph"
        );
        graph
    }

    /// Number of nodes, legend entries included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Node by name.
    #[must_use]
    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.name_to_node
            .get(name)
            .and_then(|&index| self.graph.node_weight(index))
    }

    /// Whether an edge `from -> to` exists.
    #[must_use]
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        match (self.name_to_node.get(from), self.name_to_node.get(to)) {
            (Some(&from), Some(&to)) => self.graph.contains_edge(from, to),
            _ => false,
        }
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.graph.node_references().map(|(_, node)| node)
    }

    /// Edges as `(from, to)` node names, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()].name.as_str(),
                self.graph[edge.target()].name.as_str(),
            )
        })
    }

    /// Graph-level attributes.
    #[must_use]
    pub fn graph_attributes(&self) -> &Attributes {
        &self.graph_attributes
    }

    /// Attributes shared by every edge.
    #[must_use]
    pub fn edge_attributes(&self) -> &Attributes {
        &self.edge_attributes
    }
}

fn node_attributes(options: &GraphOptions) -> Attributes {
    Attributes::new().with("fontname", options.font_name.as_str())
}

fn role_attributes(role: &Role, catalog: &ServiceCatalog, options: &GraphOptions) -> Attributes {
    let attributes = node_attributes(options);
    if options.highlight_services {
        attributes
            .with("style", role.fill_style(catalog).as_str())
            .with("fillcolor", role.fill_color(catalog))
    } else {
        attributes
    }
}

fn edge_attributes() -> Attributes {
    Attributes::new()
        .with("arrowsize", "0.5")
        .with("dir", "back")
        .with("style", "dashed")
}

/// HTML-like Graphviz label rendering `text` in the given font.
#[must_use]
pub fn html_label(text: &str, font: &str, size: u32) -> String {
    format!(
        "<<FONT FACE=\"{}\" POINT-SIZE=\"{size}\">{}</FONT>>",
        escape_html(font),
        escape_html(text)
    )
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
