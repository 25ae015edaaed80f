//! Interface discovery: listing, parsing and store enrichment.

use thiserror::Error;

use crate::command::{CommandError, CommandRunner, NetshCommand};
use crate::store::{Access, KeyValueStore, StoreError, StoreKey, StoreLayout};

use super::listing::{LineClassifier, ListingParser};
use super::resolver::{IdentifierResolver, NotFoundError};
use super::{AdapterRecord, ListedAdapter, StoreFields};

/// Why the store-sourced fields of one adapter could not be read.
///
/// Never escapes [`Discovery::discover`]; the affected record falls back to
/// [`StoreFields::default`].
#[derive(Debug, Error)]
pub enum EnrichError {
    /// The adapter's identifier could not be resolved.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The adapter's entry could not be opened or read.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Source of adapter records.
///
/// Enables decorators (filtering) and mock implementations for testing.
pub trait AdapterSource: Send + Sync {
    /// Takes a fresh snapshot of all adapters.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if the adapters cannot be listed.
    fn discover(&self) -> Result<Vec<AdapterRecord>, CommandError>;
}

/// Builds [`AdapterRecord`]s from the tool's listing and the store.
///
/// # Algorithm
///
/// 1. Run `show config`
/// 2. Parse the listing into [`ListedAdapter`]s, in block order
/// 3. For each adapter, resolve its identifier and read `Domain` and
///    `RegisterAdapterName` from its entry
/// 4. Merge both partitions into one record
///
/// Step 3 failing for one adapter leaves its store fields empty/false and
/// does not affect the others.
#[derive(Debug)]
pub struct Discovery<R, S, C> {
    runner: R,
    store: S,
    layout: StoreLayout,
    parser: ListingParser<C>,
}

impl<R, S, C> Discovery<R, S, C>
where
    R: CommandRunner,
    S: KeyValueStore,
    C: LineClassifier,
{
    /// Creates a discovery over the given tool, store and listing parser.
    #[must_use]
    pub const fn new(runner: R, store: S, layout: StoreLayout, parser: ListingParser<C>) -> Self {
        Self {
            runner,
            store,
            layout,
            parser,
        }
    }

    /// Runs the listing command and parses it.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError`] if the command fails or its output contains
    /// no adapter block.
    pub fn list(&self) -> Result<Vec<ListedAdapter>, CommandError> {
        let output = self.runner.run(&NetshCommand::ShowConfig.args())?;
        let adapters = self.parser.parse(&output);

        if adapters.is_empty() {
            return Err(CommandError::NoUsableOutput {
                program: self.runner.program().to_string(),
            });
        }

        tracing::debug!("Listed {} adapter(s)", adapters.len());
        Ok(adapters)
    }

    /// Reads the store-sourced fields of the adapter named `name`.
    ///
    /// The entry handle is released before returning.
    ///
    /// # Errors
    ///
    /// Returns [`EnrichError`] if the identifier cannot be resolved or any
    /// of the values cannot be read.
    pub fn read_store_fields(&self, name: &str) -> Result<StoreFields, EnrichError> {
        let id = IdentifierResolver::new(&self.store, &self.layout).resolve(name)?;
        let key = self
            .store
            .open(&self.layout.adapter_path(id.as_str()), Access::Read)?;

        let dns_suffix = key.get_string(StoreLayout::DOMAIN)?;
        let register = key.get_u32(StoreLayout::REGISTER_ADAPTER_NAME)?;

        Ok(StoreFields {
            dns_suffix,
            register_in_dns: register == 1,
        })
    }

    fn enrich(&self, listed: ListedAdapter) -> AdapterRecord {
        let store_fields = self.read_store_fields(&listed.name).unwrap_or_else(|e| {
            tracing::debug!("No store fields for '{}': {e}", listed.name);
            StoreFields::default()
        });
        AdapterRecord::merge(listed, store_fields)
    }
}

impl<R, S, C> AdapterSource for Discovery<R, S, C>
where
    R: CommandRunner,
    S: KeyValueStore,
    C: LineClassifier,
{
    fn discover(&self) -> Result<Vec<AdapterRecord>, CommandError> {
        Ok(self
            .list()?
            .into_iter()
            .map(|listed| self.enrich(listed))
            .collect())
    }
}

impl<T: AdapterSource + ?Sized> AdapterSource for &T {
    fn discover(&self) -> Result<Vec<AdapterRecord>, CommandError> {
        (**self).discover()
    }
}

impl<T: AdapterSource + ?Sized> AdapterSource for std::sync::Arc<T> {
    fn discover(&self) -> Result<Vec<AdapterRecord>, CommandError> {
        self.as_ref().discover()
    }
}
