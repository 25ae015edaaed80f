//! Validated configuration after merging CLI and TOML sources.
//!
//! This module contains the final, validated configuration that is used
//! by the application. All validation is performed during construction.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::network::filter::{FilterChain, LoopbackFilter, NameRegexFilter};
use crate::network::listing::{Dialect, FieldLabels};
use crate::store::StoreLayout;

use super::cli::Cli;
use super::defaults;
use super::error::{ConfigError, field};
use super::toml::{BackendKind, TomlConfig};

/// Key/value store the application talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// The Windows registry (`HKEY_LOCAL_MACHINE`).
    Registry,
    /// A JSON document at the given path.
    File(PathBuf),
}

impl fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Registry => write!(f, "registry"),
            Self::File(path) => write!(f, "file '{}'", path.display()),
        }
    }
}

/// Fully validated configuration ready for use by the application.
///
/// # Construction
///
/// Use [`ValidatedConfig::from_raw`] to create from CLI args and optional TOML config.
/// The function validates all inputs and returns errors for invalid configurations.
#[derive(Debug)]
pub struct ValidatedConfig {
    /// Network configuration tool
    pub program: String,

    /// Key/value store backend
    pub store: StoreBackend,

    /// Location of the per-adapter entries in the store
    pub layout: StoreLayout,

    /// Listing header dialect
    pub dialect: Dialect,

    /// Listing field labels
    pub labels: FieldLabels,

    /// Adapter name filters (loopback handling is separate)
    pub filter: FilterChain,

    /// Show the loopback pseudo-interface in listings
    pub show_loopback: bool,

    /// Config file that was loaded, if any
    pub config_file: Option<PathBuf>,

    /// Verbose logging enabled
    pub verbose: bool,
}

impl fmt::Display for ValidatedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config_file_str = self
            .config_file
            .as_ref()
            .map_or_else(|| "none".to_string(), |p| p.display().to_string());

        write!(
            f,
            "Config {{ tool: {}, store: {}, root: {}, dialect: {}, filters: +{}/-{}, \
             show_loopback: {}, config_file: {} }}",
            self.program,
            self.store,
            self.layout.interfaces_root(),
            self.dialect,
            self.filter.include_count(),
            self.filter.exclude_count(),
            self.show_loopback,
            config_file_str,
        )
    }
}

impl ValidatedConfig {
    /// Creates a validated configuration from CLI arguments and optional TOML config.
    ///
    /// CLI arguments take precedence over TOML config values.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file backend is selected without a path
    /// - The registry backend is selected on a platform without one
    /// - The tool, the interfaces root or a field label is empty
    /// - Regex patterns are invalid
    pub fn from_raw(cli: &Cli, toml: Option<&TomlConfig>) -> Result<Self, ConfigError> {
        let program = Self::resolve_program(cli, toml)?;
        let store = Self::resolve_store(cli, toml)?;
        let layout = Self::resolve_layout(toml)?;

        let dialect = toml
            .and_then(|t| t.listing.dialect)
            .unwrap_or(defaults::DIALECT);
        let labels = toml.map(|t| t.listing.labels.clone()).unwrap_or_default();
        validate_labels(&labels)?;

        let filter = Self::build_filter(cli, toml)?;
        let show_loopback = toml.is_some_and(|t| t.filter.show_loopback);

        Ok(Self {
            program,
            store,
            layout,
            dialect,
            labels,
            filter,
            show_loopback,
            config_file: None,
            verbose: cli.verbose,
        })
    }

    /// Loads and merges configuration from CLI and optional config file.
    ///
    /// The file is `cli.config` if set (and must exist), otherwise the
    /// default location if a file exists there.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file cannot be read or parsed
    /// - The merged configuration is invalid
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let path = cli
            .config
            .clone()
            .or_else(|| defaults::config_path().filter(|p| p.is_file()));

        let toml = path.as_deref().map(TomlConfig::load).transpose()?;

        let mut config = Self::from_raw(cli, toml.as_ref())?;
        config.config_file = path;
        Ok(config)
    }

    /// Moves the name filters out of the config, adding the loopback
    /// exclusion when `hide_loopback` is set and `show_loopback` is not.
    ///
    /// Leaves an empty chain behind.
    pub fn take_filter(&mut self, hide_loopback: bool) -> FilterChain {
        let filter = std::mem::take(&mut self.filter);
        if hide_loopback && !self.show_loopback {
            filter.exclude(LoopbackFilter)
        } else {
            filter
        }
    }

    fn resolve_program(cli: &Cli, toml: Option<&TomlConfig>) -> Result<String, ConfigError> {
        // Priority: CLI explicit > TOML > default
        let program = cli
            .tool
            .as_deref()
            .or_else(|| toml.and_then(|t| t.tool.program.as_deref()))
            .unwrap_or(defaults::PROGRAM)
            .trim();

        if program.is_empty() {
            return Err(ConfigError::invalid(field::PROGRAM, "must not be empty"));
        }

        Ok(program.to_string())
    }

    fn resolve_store(cli: &Cli, toml: Option<&TomlConfig>) -> Result<StoreBackend, ConfigError> {
        // --store-file always selects the file backend
        if let Some(ref path) = cli.store_file {
            return Ok(StoreBackend::File(path.clone()));
        }

        let section = toml.map(|t| &t.store);
        let file = section.and_then(|s| s.file.clone());
        let backend = section.and_then(|s| s.backend).unwrap_or(if file.is_some() {
            BackendKind::File
        } else {
            BackendKind::Registry
        });

        match backend {
            BackendKind::File => file.map(StoreBackend::File).ok_or_else(|| {
                ConfigError::missing(
                    field::STORE_FILE,
                    "Use --store-file or set store.file in config file",
                )
            }),
            BackendKind::Registry if cfg!(windows) => Ok(StoreBackend::Registry),
            BackendKind::Registry => Err(ConfigError::UnsupportedBackend {
                backend: "registry",
                hint: "Use --store-file or set store.backend = \"file\" in config file",
            }),
        }
    }

    fn resolve_layout(toml: Option<&TomlConfig>) -> Result<StoreLayout, ConfigError> {
        let Some(root) = toml.and_then(|t| t.store.interfaces_root.as_deref()) else {
            return Ok(StoreLayout::default());
        };

        let root = root.trim().trim_matches('\\');
        if root.is_empty() {
            return Err(ConfigError::invalid(field::INTERFACES_ROOT, "must not be empty"));
        }

        Ok(StoreLayout::new(root))
    }

    fn build_filter(cli: &Cli, toml: Option<&TomlConfig>) -> Result<FilterChain, ConfigError> {
        // CLI patterns replace TOML patterns, independently for include and exclude
        let includes = if cli.include_adapters.is_empty() {
            toml.map_or(&[][..], |t| t.filter.include.as_slice())
        } else {
            cli.include_adapters.as_slice()
        };
        let excludes = if cli.exclude_adapters.is_empty() {
            toml.map_or(&[][..], |t| t.filter.exclude.as_slice())
        } else {
            cli.exclude_adapters.as_slice()
        };

        let mut filter = FilterChain::new();
        for pattern in includes {
            filter = filter.include(compile(pattern)?);
        }
        for pattern in excludes {
            filter = filter.exclude(compile(pattern)?);
        }

        Ok(filter)
    }
}

/// Writes the default configuration template to a file.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let template = super::toml::default_config_template();
    std::fs::write(path, template).map_err(|e| ConfigError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

// Helper functions

fn compile(pattern: &str) -> Result<NameRegexFilter, ConfigError> {
    NameRegexFilter::new(pattern).map_err(|e| ConfigError::InvalidRegex {
        pattern: pattern.to_string(),
        source: e,
    })
}

fn validate_labels(labels: &FieldLabels) -> Result<(), ConfigError> {
    let all = [
        ("dhcp_enabled", &labels.dhcp_enabled),
        ("yes", &labels.yes),
        ("ip_address", &labels.ip_address),
        ("subnet_mask", &labels.subnet_mask),
        ("default_gateway", &labels.default_gateway),
        ("static_dns", &labels.static_dns),
        ("dhcp_dns", &labels.dhcp_dns),
        ("none", &labels.none),
    ];

    // An empty label would match every key
    match all.iter().find(|(_, value)| value.is_empty()) {
        Some((name, _)) => Err(ConfigError::invalid(
            format!("listing.labels.{name}"),
            "must not be empty",
        )),
        None => Ok(()),
    }
}
