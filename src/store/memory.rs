//! In-memory store backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::data::require;
use super::{Access, KeyValueStore, StoreData, StoreError, StoreKey, StoreValue};

/// A shared in-memory store.
///
/// Clones share the same tree. The store counts opened handles, live handles
/// and value writes so callers can assert on access patterns.
///
/// # Examples
///
/// ```
/// use netcfg::store::{Access, KeyValueStore, MemoryStore, StoreData, StoreKey};
///
/// let store = MemoryStore::from_data(
///     StoreData::new().with_string(r"Interfaces\{A1}", "Name", "Ethernet"),
/// );
///
/// let key = store.open(r"Interfaces\{A1}", Access::Read).unwrap();
/// assert_eq!(key.get_string("Name").unwrap(), "Ethernet");
/// assert_eq!(store.live_handles(), 1);
///
/// drop(key);
/// assert_eq!(store.live_handles(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Shared>,
}

#[derive(Debug, Default)]
struct Shared {
    data: Mutex<StoreData>,
    failing_values: Mutex<Vec<String>>,
    opens: AtomicUsize,
    live: AtomicUsize,
    writes: AtomicUsize,
}

impl Shared {
    fn data(&self) -> MutexGuard<'_, StoreData> {
        // The tree stays consistent across a panic in another holder
        self.data.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `data`.
    #[must_use]
    pub fn from_data(data: StoreData) -> Self {
        let store = Self::new();
        *store.shared.data() = data;
        store
    }

    /// Makes every write of the value `name` fail with [`StoreError::Write`].
    #[must_use]
    pub fn failing_writes_to(self, name: impl Into<String>) -> Self {
        self.shared
            .failing_values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(name.into());
        self
    }

    /// Returns a copy of the current tree.
    #[must_use]
    pub fn snapshot(&self) -> StoreData {
        self.shared.data().clone()
    }

    /// Returns how many handles have been opened so far.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.shared.opens.load(Ordering::SeqCst)
    }

    /// Returns how many handles are currently open.
    #[must_use]
    pub fn live_handles(&self) -> usize {
        self.shared.live.load(Ordering::SeqCst)
    }

    /// Returns how many value writes have succeeded.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.shared.writes.load(Ordering::SeqCst)
    }
}

impl KeyValueStore for MemoryStore {
    type Key = MemoryKey;

    fn open(&self, path: &str, access: Access) -> Result<MemoryKey, StoreError> {
        self.shared.data().open_check(path, access)?;

        self.shared.opens.fetch_add(1, Ordering::SeqCst);
        self.shared.live.fetch_add(1, Ordering::SeqCst);
        Ok(MemoryKey {
            shared: Arc::clone(&self.shared),
            path: path.to_string(),
            access,
        })
    }
}

/// Handle to a key in a [`MemoryStore`].
#[derive(Debug)]
pub struct MemoryKey {
    shared: Arc<Shared>,
    path: String,
    access: Access,
}

impl MemoryKey {
    fn set(&self, name: &str, value: StoreValue) -> Result<(), StoreError> {
        require(&self.path, self.access, Access::Write)?;

        let failing = self
            .shared
            .failing_values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|v| v == name);
        if failing {
            return Err(StoreError::Write {
                path: self.path.clone(),
                value: name.to_string(),
                reason: "access is denied".to_string(),
            });
        }

        self.shared.data().set(&self.path, name, value);
        self.shared.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

impl StoreKey for MemoryKey {
    fn subkey_names(&self) -> Result<Vec<String>, StoreError> {
        require(&self.path, self.access, Access::Read)?;
        Ok(self.shared.data().children(&self.path))
    }

    fn get_string(&self, name: &str) -> Result<String, StoreError> {
        require(&self.path, self.access, Access::Read)?;
        self.shared.data().read_string(&self.path, name)
    }

    fn get_u32(&self, name: &str) -> Result<u32, StoreError> {
        require(&self.path, self.access, Access::Read)?;
        self.shared.data().read_u32(&self.path, name)
    }

    fn set_string(&mut self, name: &str, value: &str) -> Result<(), StoreError> {
        self.set(name, StoreValue::String(value.to_string()))
    }

    fn set_u32(&mut self, name: &str, value: u32) -> Result<(), StoreError> {
        self.set(name, StoreValue::U32(value))
    }
}

impl Drop for MemoryKey {
    fn drop(&mut self) {
        self.shared.live.fetch_sub(1, Ordering::SeqCst);
    }
}
