//! Role model and dependency expansion for rolegraph.
//!
//! This crate reads an Ansible playbook's role list, follows every role's
//! `meta/main.yml` dependency declarations and collects the closure into a
//! [`RoleRegistry`].
//!
//! # Key Types
//!
//! - [`Role`]: a role reference with its optional flag and, once expanded,
//!   its immediate dependencies
//! - [`RoleDeclaration`]: a `roles`/`dependencies` list entry, bare or conditional
//! - [`RoleMetadataSource`]: lookup of a role's declared dependencies, with
//!   [`RoleDirectory`] as the on-disk implementation
//! - [`ServiceCatalog`]: the set of roles treated as services
//!
//! # Example
//!
//! ```ignore
//! use rolegraph_roles::{ExpansionMode, Playbook, ServiceCatalog, expand_roles, service_listing};
//!
//! let playbook = Playbook::load(Path::new("site.yml"))?;
//! let registry = expand_roles(&playbook.roles, Path::new("roles"), ExpansionMode::default())?;
//! for line in service_listing(&registry, &ServiceCatalog::default()) {
//!     println!("{line}");
//! }
//! ```

mod declaration;
mod error;
mod expand;
mod listing;
mod metadata;
mod playbook;
mod role;
mod services;

pub use declaration::{RoleDeclaration, parse_declarations};
pub use error::{Error, Result};
pub use expand::{ExpansionMode, RoleRegistry, expand, expand_roles};
pub use listing::{service_listing, services};
pub use metadata::{RoleDirectory, RoleMetadataSource, parse_role_metadata};
pub use playbook::Playbook;
pub use role::{FillStyle, NO_FILL_COLOR, OPTIONAL_SERVICE_COLOR, Role, SERVICE_COLOR};
pub use services::{DEFAULT_SERVICES, ServiceCatalog};
