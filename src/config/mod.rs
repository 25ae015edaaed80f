//! Configuration layer for netcfg.
//!
//! This module provides:
//! - CLI argument parsing ([`Cli`], [`Command`], [`SetArgs`])
//! - TOML configuration file parsing ([`TomlConfig`])
//! - Validated configuration ([`ValidatedConfig`])
//! - Configuration file generation ([`write_default_config`])
//! - Default values ([`defaults`])
//!
//! # Priority
//!
//! Configuration values are resolved with the following priority (highest to lowest):
//!
//! 1. **Explicit CLI arguments** - Values explicitly passed via command line
//! 2. **TOML config file** - Values from the configuration file
//! 3. **Built-in defaults** - Hardcoded default values
//!
//! The config file is `--config` when given, otherwise
//! `<config_dir>/netcfg/netcfg.toml` if it exists.
//!
//! For filter patterns (`include_adapters`, `exclude_adapters`), CLI patterns **replace**
//! TOML patterns entirely (not merged). Include and exclude are handled independently.
//!
//! `--store-file` always selects the file backend, whatever `store.backend` says.
//!
//! # Boolean Flag Semantics
//!
//! `filter.show_loopback` and `list --all` use OR semantics: either one shows
//! the loopback pseudo-interface.

mod cli;
pub mod defaults;
mod error;
mod toml;
mod validated;

#[cfg(test)]
mod validated_tests;

pub use cli::{Cli, Command, SetArgs};
pub use error::{ConfigError, field};
pub use toml::{BackendKind, TomlConfig, default_config_template};
pub use validated::{StoreBackend, ValidatedConfig, write_default_config};
