//! netcfg: per-adapter IPv4 configuration
//!
//! Entry point for the netcfg application.

use netcfg::config::{Cli, Command, ValidatedConfig, write_default_config};
use netcfg::hosts::HostsEditor;
use std::process::ExitCode;

mod app;
mod run;

use app::{exit_code, print_config_hint, setup_tracing};

/// Main entry point.
///
/// Excluded from coverage as it's the thin wrapper around testable components.
#[cfg(not(tarpaulin_include))]
fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // Handle subcommands that need no configuration
    if let Command::Init { output } = &cli.command {
        return handle_init(output);
    }
    if let Some(editor) = cli.command.hosts_editor() {
        return handle_hosts(&editor);
    }

    // Load and validate configuration
    let config = match ValidatedConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            print_config_hint(&e);
            return exit_code::CONFIG_ERROR;
        }
    };

    // Setup logging and run
    setup_tracing(config.verbose);
    tracing::debug!("{config}");

    run_application(config, cli.command)
}

/// Handles the `init` subcommand.
fn handle_init(output: &std::path::Path) -> ExitCode {
    match write_default_config(output) {
        Ok(()) => {
            println!("Configuration template written to: {}", output.display());
            exit_code::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            exit_code::CONFIG_ERROR
        }
    }
}

/// Handles the `hosts` subcommand.
///
/// Excluded from coverage - launches an interactive editor.
#[cfg(not(tarpaulin_include))]
fn handle_hosts(editor: &HostsEditor) -> ExitCode {
    match editor.open() {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            eprintln!("Failed to open hosts file: {e}");
            exit_code::runtime_error()
        }
    }
}

/// Runs the command with the given configuration.
///
/// Excluded from coverage - requires async runtime.
#[cfg(not(tarpaulin_include))]
fn run_application(config: ValidatedConfig, command: Command) -> ExitCode {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to create Tokio runtime: {e}");
            return exit_code::runtime_error();
        }
    };

    match runtime.block_on(run::execute(config, command)) {
        Ok(()) => exit_code::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            exit_code::runtime_error()
        }
    }
}
