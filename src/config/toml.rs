//! TOML configuration file parsing.
//!
//! Defines the structure of the configuration file with serde.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::network::listing::{Dialect, FieldLabels};

use super::ConfigError;

/// Root configuration structure from TOML file.
///
/// All fields are optional to allow partial configuration
/// that can be merged with CLI arguments.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    /// External tool configuration
    #[serde(default)]
    pub tool: ToolSection,

    /// Key/value store configuration
    #[serde(default)]
    pub store: StoreSection,

    /// Listing parser configuration
    #[serde(default)]
    pub listing: ListingSection,

    /// Network adapter filter configuration
    #[serde(default)]
    pub filter: FilterSection,
}

/// External tool section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolSection {
    /// Program name or path
    pub program: Option<String>,
}

/// Store backend selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// The Windows registry
    Registry,
    /// A JSON file
    File,
}

/// Key/value store section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    /// Backend to use
    pub backend: Option<BackendKind>,

    /// JSON store path (file backend)
    pub file: Option<PathBuf>,

    /// Parent key of the per-adapter entries
    pub interfaces_root: Option<String>,
}

/// Listing parser section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ListingSection {
    /// Header dialect of the tool's output
    pub dialect: Option<Dialect>,

    /// Field key labels (for localized tools)
    #[serde(default)]
    pub labels: FieldLabels,
}

/// Adapter filter configuration section.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterSection {
    /// Regex patterns for adapters to include
    #[serde(default)]
    pub include: Vec<String>,

    /// Regex patterns for adapters to exclude
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Show the loopback pseudo-interface
    #[serde(default)]
    pub show_loopback: bool,
}

impl TomlConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }
}

/// Generates a default configuration file with comments.
#[must_use]
pub fn default_config_template() -> String {
    r#"# netcfg Configuration File

[tool]
# Network configuration tool (default: netsh)
# program = "netsh"

[store]
# Key/value store backend: "registry" (Windows) or "file"
# Setting --store-file on the command line selects "file"
# backend = "registry"

# JSON store path, required for backend = "file"
# file = "adapters.json"

# Parent key of the per-adapter entries
# interfaces_root = 'SYSTEM\CurrentControlSet\Services\Tcpip\Parameters\Interfaces'

[listing]
# Block header dialect: "netsh" (Configuration for interface "Name")
# or "colon" (bare "Name:" headers only)
dialect = "netsh"

# Field labels, matched as substrings of the field key.
# Override these when the tool prints localized output.
# [listing.labels]
# dhcp_enabled = "DHCP enabled"
# yes = "Yes"
# ip_address = "IP Address"
# subnet_mask = "Subnet Mask"
# default_gateway = "Default Gateway"
# static_dns = "Statically Configured DNS Servers"
# dhcp_dns = "DNS servers configured through DHCP"
# none = "None"

[filter]
# Regex patterns for adapters to include (empty = all)
# Note: CLI patterns REPLACE these entirely (not merged)
# include = ["^Ethernet", "^Wi-Fi"]

# Regex patterns for adapters to exclude
# Note: CLI patterns REPLACE these entirely (not merged)
# exclude = ["^vEthernet"]

# Show the loopback pseudo-interface in listings
show_loopback = false
"#
    .to_string()
}
