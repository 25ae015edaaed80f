//! Tests for validated configuration.

use super::ConfigError;
use super::cli::Cli;
use super::toml::TomlConfig;
use super::validated::{StoreBackend, ValidatedConfig};

/// Helper to create CLI args from a slice; the subcommand is `list`.
fn cli(args: &[&str]) -> Cli {
    let mut full_args = vec!["netcfg"];
    full_args.extend(args);
    full_args.push("list");
    Cli::parse_from_iter(full_args)
}

/// Helper for CLI args that select the file backend, valid on every platform.
fn file_cli(args: &[&str]) -> Cli {
    let mut full_args = vec!["--store-file", "adapters.json"];
    full_args.extend(args);
    cli(&full_args)
}

/// Helper to parse TOML config
fn toml(content: &str) -> TomlConfig {
    TomlConfig::parse(content).unwrap()
}
