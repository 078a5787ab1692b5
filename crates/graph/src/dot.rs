//! DOT serialization of a [`RoleGraph`].

use crate::graph::{Attributes, RoleGraph};
use std::fmt::Write;

impl RoleGraph {
    /// Serialize the graph as a `strict digraph` in DOT syntax.
    ///
    /// Nodes and edges are written in insertion order so the output is
    /// stable across runs.
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut out = String::from("strict digraph {\n");

        if !self.graph_attributes().is_empty() {
            let _ = writeln!(out, "\tgraph [{}];", attribute_list(self.graph_attributes()));
        }
        if !self.edge_attributes().is_empty() {
            let _ = writeln!(out, "\tedge [{}];", attribute_list(self.edge_attributes()));
        }

        for node in self.nodes() {
            if node.attributes.is_empty() {
                let _ = writeln!(out, "\t{};", quote_id(&node.name));
            } else {
                let _ = writeln!(
                    out,
                    "\t{} [{}];",
                    quote_id(&node.name),
                    attribute_list(&node.attributes)
                );
            }
        }

        for (from, to) in self.edges() {
            let _ = writeln!(out, "\t{} -> {};", quote_id(from), quote_id(to));
        }

        out.push_str("}\n");
        out
    }
}

fn attribute_list(attributes: &Attributes) -> String {
    attributes
        .iter()
        .map(|(key, value)| format!("{key}={}", attribute_value(value)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// HTML-like labels (`<...>`) are emitted verbatim, everything else quoted.
fn attribute_value(value: &str) -> String {
    if value.len() >= 2 && value.starts_with('<') && value.ends_with('>') {
        value.to_string()
    } else {
        quote_id(value)
    }
}

fn quote_id(id: &str) -> String {
    let mut quoted = String::with_capacity(id.len() + 2);
    quoted.push('"');
    for ch in id.chars() {
        match ch {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            _ => quoted.push(ch),
        }
    }
    quoted.push('"');
    quoted
}
