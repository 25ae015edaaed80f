//! Resolution of adapter display names to store identifiers.

use thiserror::Error;

use crate::store::{Access, KeyValueStore, StoreError, StoreKey, StoreLayout};

use super::AdapterId;

/// Error type for identifier resolution.
#[derive(Debug, Error)]
pub enum NotFoundError {
    /// No adapter entry carries the requested name.
    #[error("No store entry found for adapter '{name}'")]
    NoMatch {
        /// Adapter display name
        name: String,
    },

    /// The adapter entries could not be listed.
    #[error("Cannot look up adapter '{name}': {source}")]
    Enumerate {
        /// Adapter display name
        name: String,
        /// Underlying store error
        #[source]
        source: StoreError,
    },
}

/// Finds the store identifier of an adapter by its display name.
///
/// Linear scan of the entries under [`StoreLayout::interfaces_root`], matching
/// the `Name` value exactly (case-sensitive). Nothing is cached: every call
/// re-enumerates, since bindings can change between opens.
#[derive(Debug)]
pub struct IdentifierResolver<'a, S> {
    store: &'a S,
    layout: &'a StoreLayout,
}

impl<'a, S: KeyValueStore> IdentifierResolver<'a, S> {
    /// Creates a resolver over `store`.
    #[must_use]
    pub const fn new(store: &'a S, layout: &'a StoreLayout) -> Self {
        Self { store, layout }
    }

    /// Returns the identifier of the first entry whose `Name` equals `name`.
    ///
    /// Entries that cannot be opened or carry no readable `Name` are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`NotFoundError::Enumerate`] if the parent key cannot be opened
    /// or listed, and [`NotFoundError::NoMatch`] if no entry matches.
    pub fn resolve(&self, name: &str) -> Result<AdapterId, NotFoundError> {
        let enumerate_error = |source| NotFoundError::Enumerate {
            name: name.to_string(),
            source,
        };

        let ids = {
            let root = self
                .store
                .open(self.layout.interfaces_root(), Access::Read)
                .map_err(enumerate_error)?;
            root.subkey_names().map_err(enumerate_error)?
        };

        for id in ids {
            let path = self.layout.adapter_path(&id);
            let entry_name = self
                .store
                .open(&path, Access::Read)
                .and_then(|key| key.get_string(StoreLayout::NAME));

            match entry_name {
                Ok(entry_name) if entry_name == name => {
                    tracing::debug!("Resolved adapter '{name}' to {id}");
                    return Ok(AdapterId::new(id));
                }
                Ok(_) => {}
                Err(e) => tracing::trace!("Skipping store entry {id}: {e}"),
            }
        }

        Err(NotFoundError::NoMatch {
            name: name.to_string(),
        })
    }
}
