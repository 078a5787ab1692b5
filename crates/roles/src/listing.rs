//! Service listing.

use crate::{Role, RoleRegistry, ServiceCatalog};

/// Expanded roles that are services, sorted by name.
#[must_use]
pub fn services<'a>(registry: &'a RoleRegistry, catalog: &ServiceCatalog) -> Vec<&'a Role> {
    let mut services: Vec<&Role> = registry
        .values()
        .filter(|role| role.is_service(catalog))
        .collect();
    services.sort_by(|a, b| a.name.cmp(&b.name));
    services
}

/// One display line per expanded service, e.g. `mysql (optional)`.
#[must_use]
pub fn service_listing(registry: &RoleRegistry, catalog: &ServiceCatalog) -> Vec<String> {
    services(registry, catalog)
        .into_iter()
        .map(ToString::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(roles: Vec<Role>) -> RoleRegistry {
        roles
            .into_iter()
            .map(|role| (role.name.clone(), role))
            .collect()
    }

    #[test]
    fn test_listing_is_sorted_and_filtered() {
        let registry = registry(vec![
            Role::new("xqueue"),
            Role::new("common"),
            Role::optional("mysql"),
            Role::new("edxapp"),
        ]);
        let lines = service_listing(&registry, &ServiceCatalog::default());
        assert_eq!(lines, vec!["edxapp", "mysql (optional)", "xqueue"]);
    }

    #[test]
    fn test_listing_with_custom_catalog() {
        let registry = registry(vec![Role::new("common"), Role::new("edxapp")]);
        let lines = service_listing(&registry, &ServiceCatalog::new(["common"]));
        assert_eq!(lines, vec!["common"]);
    }

    #[test]
    fn test_listing_without_services() {
        let registry = registry(vec![Role::new("common")]);
        assert!(service_listing(&registry, &ServiceCatalog::default()).is_empty());
    }
}
