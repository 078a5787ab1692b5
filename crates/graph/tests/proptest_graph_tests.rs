//! Property-based tests for role graph invariants.
//!
//! These tests verify the behavioral contracts of graph construction:
//! - Every expanded role and every dependency gets exactly one node
//! - Edges are the distinct (dependency, dependent) pairs
//! - DOT output is deterministic

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use rolegraph_graph::{GraphOptions, LEGEND_OPTIONAL_SERVICE, LEGEND_SERVICE, RoleGraph};
use rolegraph_roles::{Role, RoleRegistry, ServiceCatalog};
use std::collections::HashSet;

// =============================================================================
// Strategies
// =============================================================================

fn role_name_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}".prop_map(String::from)
}

/// A registry over a small name pool. Dependencies may repeat and may form
/// cycles, as real metadata can.
fn registry_strategy(max_roles: usize) -> impl Strategy<Value = RoleRegistry> {
    proptest::collection::vec(role_name_strategy(), 1..=max_roles).prop_flat_map(|raw| {
        let names: Vec<String> = raw
            .into_iter()
            .enumerate()
            .map(|(i, name)| format!("{name}_{i}"))
            .collect();
        let count = names.len();
        let deps = proptest::collection::vec(
            proptest::collection::vec(
                (proptest::sample::select(names.clone()), any::<bool>()),
                0..=4,
            ),
            count,
        );
        let flags = proptest::collection::vec(any::<bool>(), count);
        (deps, flags).prop_map(move |(deps, flags)| {
            names
                .iter()
                .zip(deps)
                .zip(flags)
                .map(|((name, deps), optional)| {
                    let mut role = Role::with_optional(name.clone(), optional);
                    role.dependencies = deps
                        .into_iter()
                        .map(|(dep, optional)| Role::with_optional(dep, optional))
                        .collect();
                    (name.clone(), role)
                })
                .collect()
        })
    })
}

// =============================================================================
// Property Tests
// =============================================================================

proptest! {
    /// Contract: one node per distinct role name, plus the legend when highlighting.
    #[test]
    fn one_node_per_role(registry in registry_strategy(10), highlight in any::<bool>()) {
        let options = GraphOptions { highlight_services: highlight, ..GraphOptions::default() };
        let graph = RoleGraph::from_registry(&registry, &ServiceCatalog::default(), &options);

        let legend = if highlight { 2 } else { 0 };
        prop_assert_eq!(graph.node_count(), registry.len() + legend);
        for name in registry.keys() {
            prop_assert!(graph.node(name).is_some());
        }
        prop_assert_eq!(graph.node(LEGEND_SERVICE).is_some(), highlight);
        prop_assert_eq!(graph.node(LEGEND_OPTIONAL_SERVICE).is_some(), highlight);
    }

    /// Contract: edges are exactly the distinct dependency-to-dependent pairs.
    #[test]
    fn edges_match_dependency_pairs(registry in registry_strategy(10)) {
        let graph = RoleGraph::from_registry(
            &registry,
            &ServiceCatalog::default(),
            &GraphOptions::default(),
        );

        let expected: HashSet<(String, String)> = registry
            .values()
            .flat_map(|role| {
                role.dependency_names()
                    .map(|dep| (dep.to_string(), role.name.clone()))
                    .collect::<Vec<_>>()
            })
            .collect();
        let actual: HashSet<(String, String)> = graph
            .edges()
            .map(|(from, to)| (from.to_string(), to.to_string()))
            .collect();

        prop_assert_eq!(graph.edge_count(), expected.len());
        prop_assert_eq!(actual, expected);
    }

    /// Contract: building twice yields identical DOT text.
    #[test]
    fn dot_output_is_deterministic(registry in registry_strategy(8)) {
        let options = GraphOptions {
            highlight_services: true,
            label: Some("site.yml".to_string()),
            ..GraphOptions::default()
        };
        let catalog = ServiceCatalog::default();
        let first = RoleGraph::from_registry(&registry, &catalog, &options).to_dot();
        let second = RoleGraph::from_registry(&registry, &catalog, &options).to_dot();
        prop_assert_eq!(first, second);
    }
}
