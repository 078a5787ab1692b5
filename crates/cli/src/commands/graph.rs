//! The graph command: load a playbook, expand its roles and render the graph.

use crate::cli::{Cli, CliError, default_role_dir};
use crate::tracing::correlation_id;
use miette::Diagnostic;
use rolegraph_graph::{GraphOptions, Graphviz, LayoutEngine, RoleGraph, render};
use rolegraph_roles::{ExpansionMode, Playbook, ServiceCatalog, expand_roles, service_listing};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, info_span};

/// Fully resolved graph invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphCommand {
    /// Playbook to read.
    pub playbook: PathBuf,
    /// Rendered output file.
    pub output: PathBuf,
    /// Root of the role metadata tree.
    pub role_dir: PathBuf,
    /// Color services and optional roles.
    pub highlight_services: bool,
    /// Collect the service listing.
    pub list_services: bool,
    /// Replacement service catalog.
    pub services_file: Option<PathBuf>,
    /// Graphviz layout program.
    pub layout: String,
    /// Cycle handling during expansion.
    pub mode: ExpansionMode,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct GraphReport {
    /// File that was written.
    pub output: PathBuf,
    /// Number of expanded roles.
    pub roles: usize,
    /// Number of graph nodes, legend included.
    pub nodes: usize,
    /// Number of graph edges.
    pub edges: usize,
    /// Sorted service listing, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub services: Option<Vec<String>>,
}

impl GraphCommand {
    /// Resolve defaults and validate paths from parsed arguments.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the playbook or the role directory
    /// does not exist.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let role_dir = match &cli.role_dir {
            Some(dir) => dir.clone(),
            None => default_role_dir()?,
        };

        if !role_dir.is_dir() {
            return Err(CliError::config_with_help(
                format!("Role directory {} does not exist", role_dir.display()),
                "Pass --role-dir or set GRAPH_PLAYBOOK_ROLE_DIR",
            ));
        }
        if !cli.playbook.is_file() {
            return Err(CliError::config_with_help(
                format!("Playbook {} does not exist", cli.playbook.display()),
                "Check the YAML_FILE argument",
            ));
        }

        Ok(Self {
            playbook: cli.playbook.clone(),
            output: cli.output.clone(),
            role_dir,
            highlight_services: cli.highlight_services,
            list_services: cli.list_services,
            services_file: cli.services_file.clone(),
            layout: cli.layout.clone(),
            mode: if cli.reexpand {
                ExpansionMode::Reexpand
            } else {
                ExpansionMode::ExpandOnce
            },
        })
    }

    /// Run with the configured Graphviz program.
    ///
    /// # Errors
    ///
    /// See [`execute_with`](Self::execute_with).
    pub fn execute(&self) -> Result<GraphReport, CliError> {
        self.execute_with(&Graphviz::new(self.layout.as_str()))
    }

    /// Run with the given layout engine.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an unusable services file, an input
    /// error for unreadable or malformed YAML, and a render error when the
    /// output cannot be produced.
    pub fn execute_with<E: LayoutEngine + ?Sized>(
        &self,
        engine: &E,
    ) -> Result<GraphReport, CliError> {
        let span = info_span!(
            "command",
            command = "graph",
            correlation_id = %correlation_id(),
            playbook = %self.playbook.display(),
        );
        let _guard = span.enter();

        let catalog = self.catalog()?;
        let playbook = Playbook::load(&self.playbook)?;
        debug!(roles = playbook.roles.len(), "Loaded playbook");

        let registry = expand_roles(&playbook.roles, &self.role_dir, self.mode)?;

        let options = GraphOptions {
            highlight_services: self.highlight_services,
            label: Some(playbook.file_name()),
            ..GraphOptions::default()
        };
        let graph = RoleGraph::from_registry(&registry, &catalog, &options);
        render(&graph, &self.output, engine)?;

        let services = self
            .list_services
            .then(|| service_listing(&registry, &catalog));

        info!(
            roles = registry.len(),
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Graph command finished"
        );

        Ok(GraphReport {
            output: self.output.clone(),
            roles: registry.len(),
            nodes: graph.node_count(),
            edges: graph.edge_count(),
            services,
        })
    }

    fn catalog(&self) -> Result<ServiceCatalog, CliError> {
        match &self.services_file {
            Some(path) => load_catalog(path),
            None => Ok(ServiceCatalog::default()),
        }
    }
}

/// A services file is user configuration, so its failures are config errors.
fn load_catalog(path: &Path) -> Result<ServiceCatalog, CliError> {
    ServiceCatalog::load(path).map_err(|err| {
        let message = err.to_string();
        match err.help() {
            Some(help) => CliError::config_with_help(message, help.to_string()),
            None => CliError::config(message),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        tmp: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            let meta = tmp.path().join("roles/edxapp/meta");
            fs::create_dir_all(&meta).unwrap();
            fs::write(meta.join("main.yml"), "dependencies:\n  - common\n  - nginx\n").unwrap();
            fs::write(
                tmp.path().join("site.yml"),
                "- hosts: all\n  roles:\n    - edxapp\n    - role: mysql\n      when: use_mysql\n",
            )
            .unwrap();
            Self { tmp }
        }

        fn path(&self, name: &str) -> String {
            self.tmp.path().join(name).display().to_string()
        }

        fn command(&self, output: &str, extra: &[&str]) -> GraphCommand {
            let mut args = vec![
                "graph-playbook".to_string(),
                "--role-dir".to_string(),
                self.path("roles"),
            ];
            args.extend(extra.iter().map(|arg| (*arg).to_string()));
            args.push(self.path("site.yml"));
            args.push(self.path(output));
            GraphCommand::from_cli(&Cli::try_parse_from(args).unwrap()).unwrap()
        }
    }

    #[derive(Default)]
    struct RecordingEngine {
        formats: RefCell<Vec<String>>,
    }

    impl LayoutEngine for RecordingEngine {
        fn layout(&self, _dot: &str, format: &str, _output: &Path) -> rolegraph_graph::Result<()> {
            self.formats.borrow_mut().push(format.to_string());
            Ok(())
        }
    }

    #[test]
    fn test_from_cli_resolves_settings() {
        let fixture = Fixture::new();
        let command = fixture.command("site.dot", &["--reexpand", "--layout", "circo"]);
        assert_eq!(command.mode, ExpansionMode::Reexpand);
        assert_eq!(command.layout, "circo");
        assert_eq!(command.role_dir, fixture.tmp.path().join("roles"));
    }

    #[test]
    fn test_missing_role_dir_is_config_error() {
        let fixture = Fixture::new();
        let cli = Cli::try_parse_from([
            "graph-playbook".to_string(),
            "--role-dir".to_string(),
            fixture.path("nope"),
            fixture.path("site.yml"),
            fixture.path("site.dot"),
        ])
        .unwrap();
        assert!(matches!(GraphCommand::from_cli(&cli), Err(CliError::Config { .. })));
    }

    #[test]
    fn test_missing_playbook_is_config_error() {
        let fixture = Fixture::new();
        let cli = Cli::try_parse_from([
            "graph-playbook".to_string(),
            "--role-dir".to_string(),
            fixture.path("roles"),
            fixture.path("missing.yml"),
            fixture.path("site.dot"),
        ])
        .unwrap();
        assert!(matches!(GraphCommand::from_cli(&cli), Err(CliError::Config { .. })));
    }

    #[test]
    fn test_execute_writes_dot_and_lists_services() {
        let fixture = Fixture::new();
        let command = fixture.command("site.dot", &["--highlight-services", "--list-services"]);
        let engine = RecordingEngine::default();
        let report = command.execute_with(&engine).unwrap();

        assert!(engine.formats.borrow().is_empty());
        assert_eq!(report.roles, 4);
        assert_eq!(report.edges, 2);
        // four roles plus two legend entries
        assert_eq!(report.nodes, 6);
        assert_eq!(
            report.services,
            Some(vec![
                "edxapp".to_string(),
                "mysql (optional)".to_string(),
                "nginx".to_string()
            ])
        );

        let dot = fs::read_to_string(fixture.tmp.path().join("site.dot")).unwrap();
        assert!(dot.contains("\"common\" -> \"edxapp\";"));
        assert!(dot.contains("site.yml</FONT>"));
    }

    #[test]
    fn test_execute_hands_images_to_engine() {
        let fixture = Fixture::new();
        let command = fixture.command("site.png", &[]);
        let engine = RecordingEngine::default();
        let report = command.execute_with(&engine).unwrap();
        assert_eq!(engine.formats.borrow().as_slice(), &["png".to_string()]);
        assert!(report.services.is_none());
    }

    #[test]
    fn test_services_file_replaces_catalog() {
        let fixture = Fixture::new();
        fs::write(fixture.tmp.path().join("services.yml"), "- common\n").unwrap();
        let services = fixture.path("services.yml");
        let command = fixture.command("site.dot", &["--list-services", "--services-file", &services]);
        let report = command.execute_with(&RecordingEngine::default()).unwrap();
        assert_eq!(report.services, Some(vec!["common".to_string()]));
    }

    #[test]
    fn test_bad_services_file_is_config_error() {
        let fixture = Fixture::new();
        fs::write(fixture.tmp.path().join("services.yml"), "common: true\n").unwrap();
        let services = fixture.path("services.yml");
        let command = fixture.command("site.dot", &["--services-file", &services]);
        let err = command.execute_with(&RecordingEngine::default()).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }

    #[test]
    fn test_malformed_playbook_is_input_error() {
        let fixture = Fixture::new();
        fs::write(fixture.tmp.path().join("site.yml"), "- hosts: all\n").unwrap();
        let command = fixture.command("site.dot", &[]);
        let err = command.execute_with(&RecordingEngine::default()).unwrap_err();
        assert!(matches!(err, CliError::Input { .. }));
    }

    #[test]
    fn test_missing_extension_is_render_error() {
        let fixture = Fixture::new();
        let command = fixture.command("site", &[]);
        let err = command.execute_with(&RecordingEngine::default()).unwrap_err();
        assert!(matches!(err, CliError::Render { .. }));
    }
}
