//! Hierarchical key/value store access (registry-like).
//!
//! This module provides:
//! - Store traits with scoped handles ([`KeyValueStore`], [`StoreKey`])
//! - The per-adapter key layout ([`StoreLayout`])
//! - Backends: [`MemoryStore`], [`FileStore`] and, on Windows, `RegistryStore`
//!
//! # Handle Scope
//!
//! A [`StoreKey`] is an open handle. It is released when dropped, so a handle
//! opened for one read or write sequence is closed on every exit path,
//! including early returns through `?`. Callers never keep handles between
//! operations.

mod data;
mod file;
mod memory;
mod registry_value;
#[cfg(windows)]
mod windows;

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;

pub use data::{StoreData, StoreValue};
pub use file::FileStore;
pub use memory::MemoryStore;
#[cfg(windows)]
pub use windows::RegistryStore;

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

/// Access requested when opening a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Enumerate sub-keys and query values.
    Read,
    /// Set values.
    Write,
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// Error type for store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key could not be opened.
    #[error("Failed to open store key '{path}' for {access}: {reason}")]
    Open {
        /// Key path
        path: String,
        /// Requested access
        access: Access,
        /// Backend-specific reason
        reason: String,
    },

    /// Sub-keys of the key could not be listed.
    #[error("Failed to enumerate store key '{path}': {reason}")]
    Enumerate {
        /// Key path
        path: String,
        /// Backend-specific reason
        reason: String,
    },

    /// A value could not be read.
    #[error("Failed to read '{value}' under '{path}': {reason}")]
    Read {
        /// Key path
        path: String,
        /// Value name
        value: String,
        /// Backend-specific reason
        reason: String,
    },

    /// A value could not be written.
    #[error("Failed to write '{value}' under '{path}': {reason}")]
    Write {
        /// Key path
        path: String,
        /// Value name
        value: String,
        /// Backend-specific reason
        reason: String,
    },

    /// A value exists but holds a different type.
    #[error("Value '{value}' under '{path}' is not a {expected}")]
    TypeMismatch {
        /// Key path
        path: String,
        /// Value name
        value: String,
        /// Expected type name
        expected: &'static str,
    },

    /// The handle was not opened with the access the operation needs.
    #[error("Store key '{path}' is not open for {needed}")]
    AccessDenied {
        /// Key path
        path: String,
        /// Access the operation needs
        needed: Access,
    },
}

/// An open key in the store.
///
/// Dropping the handle releases it.
pub trait StoreKey {
    /// Lists the names of the direct sub-keys.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Enumerate`] if the sub-keys cannot be listed.
    fn subkey_names(&self) -> Result<Vec<String>, StoreError>;

    /// Reads a string value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is missing, unreadable or not a string.
    fn get_string(&self, name: &str) -> Result<String, StoreError>;

    /// Reads a 32-bit integer value.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is missing, unreadable or not an integer.
    fn get_u32(&self, name: &str) -> Result<u32, StoreError>;

    /// Writes a string value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn set_string(&mut self, name: &str, value: &str) -> Result<(), StoreError>;

    /// Writes a 32-bit integer value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn set_u32(&mut self, name: &str, value: u32) -> Result<(), StoreError>;
}

/// A hierarchical key/value store addressed by `\`-separated paths.
///
/// # Implementation Notes
///
/// - `open` must not cache handles; every call acquires a new one
/// - Enumeration order must be stable between calls on an unchanged store
pub trait KeyValueStore: Send + Sync {
    /// Handle type returned by [`KeyValueStore::open`].
    type Key: StoreKey;

    /// Opens the key at `path` with the requested access.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] if the key does not exist or cannot be opened.
    fn open(&self, path: &str, access: Access) -> Result<Self::Key, StoreError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    type Key = T::Key;

    fn open(&self, path: &str, access: Access) -> Result<Self::Key, StoreError> {
        (**self).open(path, access)
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    type Key = T::Key;

    fn open(&self, path: &str, access: Access) -> Result<Self::Key, StoreError> {
        self.as_ref().open(path, access)
    }
}

/// Joins a parent key path and a child name with `\`.
#[must_use]
pub fn join(parent: &str, child: &str) -> String {
    let parent = parent.trim_end_matches('\\');
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{parent}\\{child}")
    }
}

/// Location of adapter entries in the store and the value names inside them.
///
/// Each adapter has a child key named by its identifier under
/// [`StoreLayout::interfaces_root`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreLayout {
    interfaces_root: String,
}

impl StoreLayout {
    /// Default parent key of the per-adapter entries.
    pub const DEFAULT_INTERFACES_ROOT: &'static str =
        r"SYSTEM\CurrentControlSet\Services\Tcpip\Parameters\Interfaces";

    /// String value holding the adapter display name.
    pub const NAME: &'static str = "Name";

    /// String value holding the adapter DNS suffix.
    pub const DOMAIN: &'static str = "Domain";

    /// Integer value holding the DNS registration flag (1 = register).
    pub const REGISTER_ADAPTER_NAME: &'static str = "RegisterAdapterName";

    /// Creates a layout rooted at `interfaces_root`.
    #[must_use]
    pub fn new(interfaces_root: impl Into<String>) -> Self {
        Self {
            interfaces_root: interfaces_root.into(),
        }
    }

    /// Returns the parent key of the per-adapter entries.
    #[must_use]
    pub fn interfaces_root(&self) -> &str {
        &self.interfaces_root
    }

    /// Returns the key path of the adapter entry with the given identifier.
    #[must_use]
    pub fn adapter_path(&self, id: &str) -> String {
        join(&self.interfaces_root, id)
    }
}

impl Default for StoreLayout {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INTERFACES_ROOT)
    }
}
