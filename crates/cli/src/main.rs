//! graph-playbook: render the role dependency graph of an Ansible playbook.

// CLI binary needs to output to stdout/stderr - this is intentional
#![allow(clippy::print_stdout, clippy::print_stderr)]

use rolegraph_cli::cli::{self, Cli, EXIT_OK, OkEnvelope, exit_code_for, render_error};
use rolegraph_cli::commands::{GraphCommand, GraphReport};
use rolegraph_cli::tracing::{self, TracingConfig};

fn main() {
    // NOTE: Using eprintln! in panic hook is intentional - tracing infrastructure
    // may be corrupted during a panic, so we use the most reliable output method.
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = cli::parse();
    let exit_code = run(&cli);
    std::process::exit(exit_code);
}

fn run(cli: &Cli) -> i32 {
    let tracing_config = TracingConfig {
        format: cli.tracing_format(),
        level: cli.level.into(),
    };
    // Ignore error if tracing already initialized
    let _ = tracing::init_tracing(tracing_config);

    match GraphCommand::from_cli(cli).and_then(|command| command.execute()) {
        Ok(report) => {
            print_report(&report, cli.json);
            EXIT_OK
        }
        Err(err) => {
            render_error(&err, cli.json);
            exit_code_for(&err)
        }
    }
}

fn print_report(report: &GraphReport, json_mode: bool) {
    if json_mode {
        match serde_json::to_string(&OkEnvelope::new(report)) {
            Ok(json) => println!("{json}"),
            Err(_) => eprintln!("Error serializing response"),
        }
    } else if let Some(services) = &report.services {
        for line in services {
            println!("{line}");
        }
    }
}
