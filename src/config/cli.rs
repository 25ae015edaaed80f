//! CLI argument parsing using clap.
//!
//! Defines the command-line interface with all options and subcommands.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::hosts::HostsEditor;
use crate::settings::AdapterSettings;

/// netcfg: per-adapter IPv4 configuration
///
/// Lists adapters with their addressing, DNS server, DNS suffix and DNS
/// registration settings, and changes them through the system's network
/// configuration tool and registry.
#[derive(Debug, Parser)]
#[command(name = "netcfg")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Network configuration tool to run
    #[arg(long, global = true, value_name = "PROGRAM")]
    pub tool: Option<String>,

    /// Use a JSON file as the key/value store instead of the registry
    #[arg(long = "store-file", global = true, value_name = "PATH")]
    pub store_file: Option<PathBuf>,

    /// Regex pattern for adapters to include (can be specified multiple times)
    #[arg(long = "include-adapter", global = true, value_name = "PATTERN")]
    pub include_adapters: Vec<String>,

    /// Regex pattern for adapters to exclude (can be specified multiple times)
    #[arg(long = "exclude-adapter", global = true, value_name = "PATTERN")]
    pub exclude_adapters: Vec<String>,

    /// Enable verbose logging
    #[arg(long, short, global = true)]
    pub verbose: bool,
}

/// Subcommands for netcfg
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List adapters and their configuration
    List {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Include the loopback pseudo-interface
        #[arg(long)]
        all: bool,
    },

    /// Show one adapter
    Show {
        /// Adapter display name
        name: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Change one adapter's configuration
    Set(SetArgs),

    /// Open the hosts file in an editor
    Hosts {
        /// Editor program (default: notepad.exe on Windows, vi elsewhere)
        #[arg(long, value_name = "PROGRAM")]
        editor: Option<String>,

        /// Hosts file to open
        #[arg(long, value_name = "PATH")]
        path: Option<PathBuf>,
    },

    /// Generate a default configuration file
    Init {
        /// Output path for the configuration file
        #[arg(long, short, default_value = "netcfg.toml")]
        output: PathBuf,
    },
}

/// Arguments of `set`.
///
/// Options not given keep the adapter's current value.
#[derive(Debug, Clone, Default, Args)]
#[allow(clippy::struct_excessive_bools)] // CLI flags are naturally boolean
pub struct SetArgs {
    /// Adapter display name
    pub name: String,

    /// Switch to DHCP addressing and DNS
    #[arg(long, conflicts_with_all = ["static_mode", "ip", "mask", "gateway", "dns"])]
    pub dhcp: bool,

    /// Switch to static addressing
    #[arg(long = "static")]
    pub static_mode: bool,

    /// Static IPv4 address
    #[arg(long)]
    pub ip: Option<String>,

    /// Subnet mask
    #[arg(long)]
    pub mask: Option<String>,

    /// Default gateway (empty to clear)
    #[arg(long)]
    pub gateway: Option<String>,

    /// DNS server (empty to clear)
    #[arg(long)]
    pub dns: Option<String>,

    /// DNS suffix (empty to clear)
    #[arg(long)]
    pub suffix: Option<String>,

    /// Register the adapter's address in DNS
    #[arg(long = "register-dns", value_name = "BOOL")]
    pub register_dns: Option<bool>,

    /// Print the planned changes without applying them
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

impl SetArgs {
    /// Overrides `current` with every option that was given.
    ///
    /// Address options imply `--static`: in DHCP mode the address fields are
    /// server-assigned and never sent to the tool.
    #[must_use]
    pub fn desired(&self, current: AdapterSettings) -> AdapterSettings {
        let mut desired = current;

        if self.dhcp {
            desired.is_dhcp = true;
        } else if self.static_mode || self.sets_addressing() {
            desired.is_dhcp = false;
        }

        let overrides = [
            (&self.ip, &mut desired.ip),
            (&self.mask, &mut desired.subnet_mask),
            (&self.gateway, &mut desired.gateway),
            (&self.dns, &mut desired.dns),
            (&self.suffix, &mut desired.dns_suffix),
        ];
        for (given, field) in overrides {
            if let Some(value) = given {
                value.trim().clone_into(field);
            }
        }

        if let Some(register) = self.register_dns {
            desired.register_in_dns = register;
        }

        desired
    }

    /// Returns true if any of the address, mask, gateway or DNS options was given.
    #[must_use]
    pub const fn sets_addressing(&self) -> bool {
        self.ip.is_some() || self.mask.is_some() || self.gateway.is_some() || self.dns.is_some()
    }
}

impl Command {
    /// Builds the hosts editor for a `hosts` command, filling in platform defaults.
    ///
    /// Returns `None` for every other command.
    #[must_use]
    pub fn hosts_editor(&self) -> Option<HostsEditor> {
        let Self::Hosts { editor, path } = self else {
            return None;
        };
        let editor = editor.as_deref().unwrap_or(HostsEditor::DEFAULT_EDITOR);
        let path = path
            .clone()
            .unwrap_or_else(|| PathBuf::from(HostsEditor::DEFAULT_PATH));
        Some(HostsEditor::new(editor, path))
    }
}

impl Cli {
    /// Parses CLI arguments from the command line.
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Parses CLI arguments from an iterator (useful for testing).
    pub fn parse_from_iter<I, T>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::parse_from(iter)
    }
}
