//! Default values for configuration options.
//!
//! Centralized constants to avoid magic values scattered across the codebase.

use std::path::PathBuf;

use crate::network::listing::Dialect;

/// Default network configuration tool.
pub const PROGRAM: &str = "netsh";

/// Default listing dialect.
pub const DIALECT: Dialect = Dialect::Netsh;

/// Directory under the user config directory holding the config file.
pub const CONFIG_DIR_NAME: &str = "netcfg";

/// File name of the default config file.
pub const CONFIG_FILE_NAME: &str = "netcfg.toml";

/// Default config file location, `<config_dir>/netcfg/netcfg.toml`.
///
/// Returns `None` when the platform has no user config directory.
#[must_use]
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}
