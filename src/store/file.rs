//! JSON file store backend.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data::require;
use super::{Access, KeyValueStore, StoreData, StoreError, StoreKey, StoreValue};

/// Current store file format version.
///
/// Increment this when making breaking changes to the format.
const STORE_FILE_VERSION: u32 = 1;

/// On-disk store file format.
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    /// Format version; other versions are rejected.
    version: u32,

    /// The key tree.
    #[serde(flatten)]
    data: StoreData,
}

/// File-based implementation of [`KeyValueStore`].
///
/// The whole tree lives in one JSON document. Every [`open`](KeyValueStore::open)
/// reads the file afresh and every value write rewrites it.
///
/// # Atomic Writes
///
/// Uses write-to-temp-then-rename:
/// 1. Write to `{path}.tmp`
/// 2. Rename `{path}.tmp` to `{path}`
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `data` to the backing file, replacing its contents.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Write`] if the file cannot be written.
    pub fn save(&self, data: &StoreData) -> Result<(), StoreError> {
        persist(&self.path, data).map_err(|reason| StoreError::Write {
            path: self.path.display().to_string(),
            value: String::new(),
            reason,
        })
    }

    fn load(&self, key_path: &str, access: Access) -> Result<StoreData, StoreError> {
        let open_error = |reason: String| StoreError::Open {
            path: key_path.to_string(),
            access,
            reason,
        };

        let content = match std::fs::read_to_string(&self.path) {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(open_error(format!(
                    "store file '{}' not found",
                    self.path.display()
                )));
            }
            Err(e) => return Err(open_error(format!("failed to read store file: {e}"))),
        };

        let file: StoreFile = serde_json::from_str(&content)
            .map_err(|e| open_error(format!("invalid store file: {e}")))?;

        if file.version != STORE_FILE_VERSION {
            return Err(open_error(format!(
                "incompatible store file version: expected {STORE_FILE_VERSION}, got {}",
                file.version
            )));
        }

        Ok(file.data)
    }
}

impl KeyValueStore for FileStore {
    type Key = FileKey;

    fn open(&self, path: &str, access: Access) -> Result<FileKey, StoreError> {
        let data = self.load(path, access)?;
        data.open_check(path, access)?;

        Ok(FileKey {
            file: self.path.clone(),
            data,
            path: path.to_string(),
            access,
        })
    }
}

/// Handle to a key in a [`FileStore`].
///
/// Holds the tree as read at open time.
#[derive(Debug)]
pub struct FileKey {
    file: PathBuf,
    data: StoreData,
    path: String,
    access: Access,
}

impl FileKey {
    fn set(&mut self, name: &str, value: StoreValue) -> Result<(), StoreError> {
        require(&self.path, self.access, Access::Write)?;

        self.data.set(&self.path, name, value);
        persist(&self.file, &self.data).map_err(|reason| StoreError::Write {
            path: self.path.clone(),
            value: name.to_string(),
            reason,
        })
    }
}

impl StoreKey for FileKey {
    fn subkey_names(&self) -> Result<Vec<String>, StoreError> {
        require(&self.path, self.access, Access::Read)?;
        Ok(self.data.children(&self.path))
    }

    fn get_string(&self, name: &str) -> Result<String, StoreError> {
        require(&self.path, self.access, Access::Read)?;
        self.data.read_string(&self.path, name)
    }

    fn get_u32(&self, name: &str) -> Result<u32, StoreError> {
        require(&self.path, self.access, Access::Read)?;
        self.data.read_u32(&self.path, name)
    }

    fn set_string(&mut self, name: &str, value: &str) -> Result<(), StoreError> {
        self.set(name, StoreValue::String(value.to_string()))
    }

    fn set_u32(&mut self, name: &str, value: u32) -> Result<(), StoreError> {
        self.set(name, StoreValue::U32(value))
    }
}

fn persist(path: &Path, data: &StoreData) -> Result<(), String> {
    let file = StoreFile {
        version: STORE_FILE_VERSION,
        data: data.clone(),
    };
    let content = serde_json::to_string_pretty(&file).map_err(|e| e.to_string())?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }
    }

    // state.json -> state.json.tmp, not state.tmp
    let temp_path = PathBuf::from(format!("{}.tmp", path.display()));
    std::fs::write(&temp_path, content).map_err(|e| e.to_string())?;
    std::fs::rename(&temp_path, path).map_err(|e| e.to_string())
}
