//! Role declarations as written in playbooks and role metadata.
//!
//! A declaration is either a bare role name or a mapping with a `role` key.
//! A mapping that also carries a `when` key declares a conditionally
//! included role; the conditional's content is never inspected.

use crate::{Error, Result, Role};
use serde_yaml::Value;
use tracing::warn;

const ROLE_KEY: &str = "role";
const WHEN_KEY: &str = "when";

/// A single entry of a `roles` or `dependencies` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleDeclaration {
    /// Bare string entry, e.g. `- common`.
    Named(String),
    /// Mapping entry, e.g. `- { role: mysql, when: use_mysql }`.
    ConditionalNamed {
        /// Value of the `role` key.
        name: String,
        /// True when a `when` key is present.
        optional: bool,
    },
}

impl RoleDeclaration {
    /// Bare declaration.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// Mapping declaration.
    #[must_use]
    pub fn conditional(name: impl Into<String>, optional: bool) -> Self {
        Self::ConditionalNamed {
            name: name.into(),
            optional,
        }
    }

    /// Parse one YAML entry.
    ///
    /// Returns `Ok(None)` for entries that are neither strings nor mappings;
    /// those are skipped. `context` names the declaring file for errors.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingRoleName`] for a mapping without a string
    /// `role` key.
    pub fn from_yaml(value: &Value, context: &str) -> Result<Option<Self>> {
        match value {
            Value::String(name) => Ok(Some(Self::Named(name.clone()))),
            Value::Mapping(mapping) => {
                let Some(Value::String(name)) = mapping.get(ROLE_KEY) else {
                    return Err(Error::MissingRoleName {
                        context: context.to_string(),
                        entry: render_entry(value),
                    });
                };
                Ok(Some(Self::ConditionalNamed {
                    name: name.clone(),
                    optional: mapping.contains_key(WHEN_KEY),
                }))
            }
            other => {
                warn!(
                    context,
                    entry = %render_entry(other),
                    "Skipping role declaration that is neither a name nor a mapping"
                );
                Ok(None)
            }
        }
    }

    /// Role name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Named(name) | Self::ConditionalNamed { name, .. } => name,
        }
    }

    /// Whether the declaration is conditional.
    #[must_use]
    pub const fn is_optional(&self) -> bool {
        match self {
            Self::Named(_) => false,
            Self::ConditionalNamed { optional, .. } => *optional,
        }
    }

    /// Unexpanded role for this declaration.
    #[must_use]
    pub fn into_role(self) -> Role {
        match self {
            Self::Named(name) => Role::new(name),
            Self::ConditionalNamed { name, optional } => Role::with_optional(name, optional),
        }
    }
}

/// Parse a YAML list of declarations, skipping unusable entries.
///
/// # Errors
///
/// Returns the first declaration error encountered.
pub fn parse_declarations(entries: &[Value], context: &str) -> Result<Vec<RoleDeclaration>> {
    let mut declarations = Vec::with_capacity(entries.len());
    for entry in entries {
        if let Some(declaration) = RoleDeclaration::from_yaml(entry, context)? {
            declarations.push(declaration);
        }
    }
    Ok(declarations)
}

fn render_entry(value: &Value) -> String {
    serde_yaml::to_string(value)
        .map(|yaml| yaml.trim_end().replace('\n', ", "))
        .unwrap_or_else(|_| format!("{value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(yaml: &str) -> Vec<Value> {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_bare_name() {
        let parsed = parse_declarations(&entries("- common\n"), "test").unwrap();
        assert_eq!(parsed, vec![RoleDeclaration::named("common")]);
        assert!(!parsed[0].is_optional());
    }

    #[test]
    fn test_mapping_without_when() {
        let parsed = parse_declarations(&entries("- role: nginx\n  tags: web\n"), "test").unwrap();
        assert_eq!(parsed, vec![RoleDeclaration::conditional("nginx", false)]);
    }

    #[test]
    fn test_when_marks_optional_regardless_of_value() {
        let yaml = "- { role: a, when: x }\n- { role: b, when: false }\n- { role: c, when: ~ }\n";
        let parsed = parse_declarations(&entries(yaml), "test").unwrap();
        assert!(parsed.iter().all(RoleDeclaration::is_optional));
    }

    #[test]
    fn test_mapping_without_role_key_fails() {
        let err = parse_declarations(&entries("- when: x\n"), "site.yml").unwrap_err();
        match err {
            Error::MissingRoleName { context, entry } => {
                assert_eq!(context, "site.yml");
                assert!(entry.contains("when"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_non_string_role_key_fails() {
        let err = parse_declarations(&entries("- role: [a, b]\n"), "test").unwrap_err();
        assert!(matches!(err, Error::MissingRoleName { .. }));
    }

    #[test]
    fn test_other_entries_are_skipped() {
        let parsed = parse_declarations(&entries("- 42\n- common\n- ~\n"), "test").unwrap();
        assert_eq!(parsed, vec![RoleDeclaration::named("common")]);
    }

    #[test]
    fn test_into_role_carries_flag() {
        let role = RoleDeclaration::conditional("mysql", true).into_role();
        assert_eq!(role.name, "mysql");
        assert!(role.is_optional);
    }
}
