//! Working set of adapters for interactive callers.
//!
//! Discovery and apply are blocking; a [`Session`] runs them on the blocking
//! thread pool so an event loop is never stalled, and serializes applies
//! per adapter because neither the tool nor the store locks anything.
//!
//! # Reflect on Success
//!
//! After a successful apply the cached record is replaced with the applied
//! values. After a failure it is left untouched: the adapter may be in a
//! mixed state, and only [`Session::refresh`] tells the truth.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};

use crate::command::{CommandError, CommandRunner};
use crate::network::filter::{FilterChain, FilteredSource};
use crate::network::listing::{LineClassifier, ListingParser};
use crate::network::{AdapterRecord, AdapterSource, Discovery};
use crate::settings::{AdapterSettings, Applier, ApplyError, ApplyPlan, plan};
use crate::store::{KeyValueStore, StoreLayout};

/// Error type for session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The adapter is not in the working set.
    #[error("Unknown adapter '{name}'; refresh and try again")]
    UnknownAdapter {
        /// Requested adapter name
        name: String,
    },

    /// Applying settings failed.
    #[error(transparent)]
    Apply(#[from] ApplyError),

    /// Discovery failed.
    #[error("Failed to discover adapters: {0}")]
    Discovery(#[from] CommandError),

    /// The blocking task panicked or was cancelled.
    #[error("Background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

type SessionSource<R, S> =
    FilteredSource<Discovery<Arc<R>, Arc<S>, Box<dyn LineClassifier>>, FilterChain>;

/// Holds the current adapter snapshot and funnels edits through the applier.
pub struct Session<R, S> {
    source: Arc<SessionSource<R, S>>,
    applier: Arc<Applier<Arc<R>, Arc<S>>>,
    adapters: RwLock<Vec<AdapterRecord>>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<R, S> Session<R, S>
where
    R: CommandRunner + 'static,
    S: KeyValueStore + 'static,
{
    /// Creates a session with an empty working set.
    ///
    /// `filter` only decides which adapters enter the working set.
    #[must_use]
    pub fn new(
        runner: R,
        store: S,
        layout: StoreLayout,
        parser: ListingParser<Box<dyn LineClassifier>>,
        filter: FilterChain,
    ) -> Self {
        let runner = Arc::new(runner);
        let store = Arc::new(store);
        let discovery = Discovery::new(Arc::clone(&runner), Arc::clone(&store), layout.clone(), parser);

        Self {
            source: Arc::new(FilteredSource::new(discovery, filter)),
            applier: Arc::new(Applier::new(runner, store, layout)),
            adapters: RwLock::new(Vec::new()),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Re-runs discovery and replaces the working set.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Discovery`] if the listing fails; the previous
    /// working set is kept in that case.
    pub async fn refresh(&self) -> Result<Vec<AdapterRecord>, SessionError> {
        let source = Arc::clone(&self.source);
        let adapters = tokio::task::spawn_blocking(move || source.discover()).await??;

        tracing::debug!("Working set holds {} adapter(s)", adapters.len());
        self.adapters.write().await.clone_from(&adapters);
        self.prune_locks(&adapters).await;
        Ok(adapters)
    }

    /// Returns the current working set.
    pub async fn adapters(&self) -> Vec<AdapterRecord> {
        self.adapters.read().await.clone()
    }

    /// Returns the working-set record for `name`.
    pub async fn get(&self, name: &str) -> Option<AdapterRecord> {
        self.adapters
            .read()
            .await
            .iter()
            .find(|adapter| adapter.name == name)
            .cloned()
    }

    /// Plans an apply for `name` without running it.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownAdapter`] or a validation failure.
    pub async fn plan(&self, name: &str, desired: &AdapterSettings) -> Result<ApplyPlan, SessionError> {
        let original = self.require(name).await?;
        Ok(plan(&original, desired).map_err(ApplyError::from)?)
    }

    /// Applies `desired` to the adapter `name` and returns the updated record.
    ///
    /// The working-set record at the time the per-adapter lock is taken is
    /// the `original` the change is computed against.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::UnknownAdapter`] if `name` is not in the
    /// working set, or [`SessionError::Apply`] with the first failure.
    pub async fn apply(&self, name: &str, desired: AdapterSettings) -> Result<AdapterRecord, SessionError> {
        let lock = self.lock_for(name).await;
        let _guard = lock.lock().await;

        let original = self.require(name).await?;
        let applier = Arc::clone(&self.applier);
        let before = original.clone();
        let settings = desired.clone();
        tokio::task::spawn_blocking(move || applier.apply(&before, &settings)).await??;

        let updated = original.with_settings(&desired);
        if let Some(slot) = self
            .adapters
            .write()
            .await
            .iter_mut()
            .find(|adapter| adapter.name == name)
        {
            slot.clone_from(&updated);
        }

        tracing::info!("Updated '{name}'");
        Ok(updated)
    }

    async fn require(&self, name: &str) -> Result<AdapterRecord, SessionError> {
        self.get(name).await.ok_or_else(|| SessionError::UnknownAdapter {
            name: name.to_string(),
        })
    }

    async fn lock_for(&self, name: &str) -> Arc<Mutex<()>> {
        Arc::clone(self.locks.lock().await.entry(name.to_string()).or_default())
    }

    /// Drops the locks of adapters that left the working set.
    ///
    /// A lock still held or awaited elsewhere is kept, so a concurrent apply
    /// and a later one for the same name never get different mutexes.
    async fn prune_locks(&self, adapters: &[AdapterRecord]) {
        self.locks.lock().await.retain(|name, lock| {
            Arc::strong_count(lock) > 1 || adapters.iter().any(|adapter| &adapter.name == name)
        });
    }
}

impl<R, S> std::fmt::Debug for Session<R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("filter", self.source.filter())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
