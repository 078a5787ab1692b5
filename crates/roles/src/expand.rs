//! Dependency expansion.
//!
//! Expansion walks role references breadth first. Each reference popped from
//! the worklist is stored in the registry under its name, and its
//! dependencies are appended to the back of the worklist. A later reference
//! to an already registered name replaces the earlier entry, so the surviving
//! optional flag is the one of the last processed reference.
//!
//! Every reachable role's metadata is read from the [`RoleMetadataSource`]
//! once, breadth first, before the walk starts.

use crate::{Result, Role, RoleDeclaration, RoleDirectory, RoleMetadataSource};
use indexmap::IndexMap;
use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;
use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use tracing::{debug, info, trace};

/// Expanded roles keyed by name, in first-registration order.
pub type RoleRegistry = IndexMap<String, Role>;

/// Dependency references of every reachable role.
type ResolvedMetadata = HashMap<String, Vec<Role>>;

/// How repeated references to the same role are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ExpansionMode {
    /// Re-walk repeated references, except for roles that lie on a
    /// dependency cycle.
    ///
    /// A repeated reference to a cyclic role only updates the registered
    /// role's optional flag; its dependencies are not queued again. On
    /// acyclic metadata this is identical to [`Reexpand`](Self::Reexpand).
    /// Always terminates.
    #[default]
    ExpandOnce,
    /// Re-walk every reference, queueing its dependencies each time.
    ///
    /// Does not terminate when role metadata forms a cycle.
    Reexpand,
}

/// Expand `declarations` into the closure of all referenced roles.
///
/// # Errors
///
/// Returns the first metadata error reported by `source`.
pub fn expand<S>(
    declarations: &[RoleDeclaration],
    source: &S,
    mode: ExpansionMode,
) -> Result<RoleRegistry>
where
    S: RoleMetadataSource + ?Sized,
{
    let roots: Vec<Role> = declarations
        .iter()
        .cloned()
        .map(RoleDeclaration::into_role)
        .collect();
    let metadata = resolve_metadata(&roots, source)?;
    let guarded = match mode {
        ExpansionMode::ExpandOnce => cyclic_roles(&metadata),
        ExpansionMode::Reexpand => HashSet::new(),
    };

    debug!(
        roles = roots.len(),
        reachable = metadata.len(),
        cyclic = guarded.len(),
        ?mode,
        "Expanding role dependencies"
    );

    let mut worklist = VecDeque::from(roots);
    let mut registry = RoleRegistry::new();

    while let Some(mut role) = worklist.pop_front() {
        if guarded.contains(&role.name)
            && let Some(registered) = registry.get_mut(&role.name)
        {
            trace!(role = %role.name, optional = role.is_optional, "Cyclic role already expanded");
            registered.is_optional = role.is_optional;
            continue;
        }

        role.dependencies = metadata.get(&role.name).cloned().unwrap_or_default();

        trace!(
            role = %role.name,
            optional = role.is_optional,
            dependencies = role.dependencies.len(),
            "Expanded role"
        );

        worklist.extend(role.dependencies.iter().cloned());
        registry.insert(role.name.clone(), role);
    }

    info!(roles = registry.len(), "Role expansion complete");
    Ok(registry)
}

/// Read the metadata of every role reachable from `roots`, each once.
fn resolve_metadata<S>(roots: &[Role], source: &S) -> Result<ResolvedMetadata>
where
    S: RoleMetadataSource + ?Sized,
{
    let mut metadata = ResolvedMetadata::new();
    let mut pending: VecDeque<String> = roots.iter().map(|role| role.name.clone()).collect();

    while let Some(name) = pending.pop_front() {
        if metadata.contains_key(&name) {
            continue;
        }
        let dependencies: Vec<Role> = source
            .dependencies_of(&name)?
            .unwrap_or_default()
            .into_iter()
            .map(RoleDeclaration::into_role)
            .collect();
        debug!(role = %name, dependencies = dependencies.len(), "Resolved role metadata");
        pending.extend(dependencies.iter().map(|dep| dep.name.clone()));
        metadata.insert(name, dependencies);
    }

    Ok(metadata)
}

/// Roles that belong to a dependency cycle, self-dependencies included.
fn cyclic_roles(metadata: &ResolvedMetadata) -> HashSet<String> {
    let mut graph = DiGraph::<&str, ()>::new();
    let nodes: HashMap<&str, _> = metadata
        .keys()
        .map(|name| (name.as_str(), graph.add_node(name.as_str())))
        .collect();

    for (name, dependencies) in metadata {
        for dep in dependencies {
            if let (Some(&from), Some(&to)) = (nodes.get(name.as_str()), nodes.get(dep.name.as_str()))
            {
                graph.update_edge(from, to, ());
            }
        }
    }

    tarjan_scc(&graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || graph.contains_edge(component[0], component[0])
        })
        .flatten()
        .map(|index| graph[index].to_string())
        .collect()
}

/// Expand `declarations` against a roles directory on disk.
///
/// # Errors
///
/// Returns an error if any role's metadata cannot be read or parsed.
pub fn expand_roles(
    declarations: &[RoleDeclaration],
    role_dir: &Path,
    mode: ExpansionMode,
) -> Result<RoleRegistry> {
    expand(declarations, &RoleDirectory::new(role_dir), mode)
}
