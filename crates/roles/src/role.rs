//! The role value type and its graph styling policy.

use crate::ServiceCatalog;
use std::fmt;

/// Fill color of a service role.
pub const SERVICE_COLOR: &str = "cornflowerblue";

/// Fill color of a conditionally included role.
pub const OPTIONAL_SERVICE_COLOR: &str = "darkolivegreen1";

/// Fill color of every other role.
pub const NO_FILL_COLOR: &str = "transparent";

/// Fill style of a role node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FillStyle {
    /// Background painted with the fill color.
    Filled,
    /// No background; the fill color is ignored by the renderer.
    Unfilled,
}

impl FillStyle {
    /// Value of the Graphviz `style` attribute.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Filled => "filled",
            Self::Unfilled => "",
        }
    }
}

/// A role referenced by a playbook or by another role's metadata.
///
/// `is_optional` belongs to the reference that produced this value. When the
/// same role is reachable through several references, the registry keeps the
/// flag of whichever reference was processed last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    /// Role name, the key in the role registry.
    pub name: String,
    /// True when the declaring context had a `when` conditional.
    pub is_optional: bool,
    /// Immediate dependencies, filled in by expansion.
    pub dependencies: Vec<Role>,
}

impl Role {
    /// Create an unconditional role.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_optional(name, false)
    }

    /// Create a conditionally included role.
    #[must_use]
    pub fn optional(name: impl Into<String>) -> Self {
        Self::with_optional(name, true)
    }

    /// Create a role with an explicit optional flag.
    #[must_use]
    pub fn with_optional(name: impl Into<String>, is_optional: bool) -> Self {
        Self {
            name: name.into(),
            is_optional,
            dependencies: Vec::new(),
        }
    }

    /// Whether this role is one of the catalog's services.
    #[must_use]
    pub fn is_service(&self, catalog: &ServiceCatalog) -> bool {
        catalog.contains(&self.name)
    }

    /// Background color of this role in the graph.
    ///
    /// Optional wins over service; anything else is transparent.
    #[must_use]
    pub fn fill_color(&self, catalog: &ServiceCatalog) -> &'static str {
        if self.is_optional {
            OPTIONAL_SERVICE_COLOR
        } else if self.is_service(catalog) {
            SERVICE_COLOR
        } else {
            NO_FILL_COLOR
        }
    }

    /// Fill style of this role in the graph.
    ///
    /// Depends only on service membership, so an optional role that is not a
    /// service carries the optional color but is drawn unfilled.
    #[must_use]
    pub fn fill_style(&self, catalog: &ServiceCatalog) -> FillStyle {
        if self.is_service(catalog) {
            FillStyle::Filled
        } else {
            FillStyle::Unfilled
        }
    }

    /// Names of the immediate dependencies, in declaration order.
    pub fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().map(|dep| dep.name.as_str())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_optional {
            write!(f, "{} (optional)", self.name)
        } else {
            write!(f, "{}", self.name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_role_is_not_optional() {
        let role = Role::new("nginx");
        assert!(!role.is_optional);
        assert!(role.dependencies.is_empty());
    }

    #[test]
    fn test_display_adds_optional_suffix() {
        assert_eq!(Role::new("mysql").to_string(), "mysql");
        assert_eq!(Role::optional("mysql").to_string(), "mysql (optional)");
    }

    #[test]
    fn test_is_service_uses_catalog() {
        let catalog = ServiceCatalog::default();
        assert!(Role::new("edxapp").is_service(&catalog));
        assert!(!Role::new("common").is_service(&catalog));

        let custom = ServiceCatalog::new(["common"]);
        assert!(Role::new("common").is_service(&custom));
        assert!(!Role::new("edxapp").is_service(&custom));
    }

    #[test]
    fn test_fill_color_policy() {
        let catalog = ServiceCatalog::default();
        assert_eq!(Role::new("common").fill_color(&catalog), NO_FILL_COLOR);
        assert_eq!(Role::new("nginx").fill_color(&catalog), SERVICE_COLOR);
        assert_eq!(
            Role::optional("nginx").fill_color(&catalog),
            OPTIONAL_SERVICE_COLOR
        );
        assert_eq!(
            Role::optional("common").fill_color(&catalog),
            OPTIONAL_SERVICE_COLOR
        );
    }

    #[test]
    fn test_fill_style_ignores_optional_flag() {
        let catalog = ServiceCatalog::default();
        assert_eq!(Role::new("nginx").fill_style(&catalog), FillStyle::Filled);
        assert_eq!(Role::optional("nginx").fill_style(&catalog), FillStyle::Filled);
        assert_eq!(
            Role::optional("common").fill_style(&catalog),
            FillStyle::Unfilled
        );
        assert_eq!(FillStyle::Unfilled.as_str(), "");
    }
}
