//! In-memory key tree shared by the memory and file backends.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{Access, StoreError, join};

/// A typed value stored under a key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum StoreValue {
    /// String value (`REG_SZ`-like).
    String(String),
    /// 32-bit integer value (`REG_DWORD`-like).
    U32(u32),
}

/// A tree of keys, each holding named values.
///
/// Keys are stored by full path; a key exists if it was inserted explicitly
/// or if any descendant exists. Enumeration is in lexical order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreData {
    keys: BTreeMap<String, BTreeMap<String, StoreValue>>,
}

impl StoreData {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a value, creating the key if needed.
    pub fn set(&mut self, path: &str, name: &str, value: StoreValue) {
        self.keys
            .entry(normalize(path))
            .or_default()
            .insert(name.to_string(), value);
    }

    /// Builder form of [`StoreData::set`] for string values.
    #[must_use]
    pub fn with_string(mut self, path: &str, name: &str, value: &str) -> Self {
        self.set(path, name, StoreValue::String(value.to_string()));
        self
    }

    /// Builder form of [`StoreData::set`] for integer values.
    #[must_use]
    pub fn with_u32(mut self, path: &str, name: &str, value: u32) -> Self {
        self.set(path, name, StoreValue::U32(value));
        self
    }

    /// Returns the value stored under `path`, if any.
    #[must_use]
    pub fn get(&self, path: &str, name: &str) -> Option<&StoreValue> {
        self.keys.get(&normalize(path)).and_then(|values| values.get(name))
    }

    /// Returns true if the key exists.
    #[must_use]
    pub fn contains_key(&self, path: &str) -> bool {
        let path = normalize(path);
        let prefix = join(&path, "");
        self.keys.contains_key(&path) || self.keys.keys().any(|k| k.starts_with(&prefix))
    }

    /// Returns the names of the direct children of `path`, in lexical order.
    #[must_use]
    pub fn children(&self, path: &str) -> Vec<String> {
        let prefix = join(&normalize(path), "");
        let names: BTreeSet<&str> = self
            .keys
            .keys()
            .filter_map(|k| k.strip_prefix(&prefix))
            .filter_map(|rest| rest.split('\\').next())
            .filter(|name| !name.is_empty())
            .collect();
        names.into_iter().map(str::to_string).collect()
    }

    /// Returns the number of keys stored explicitly.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if no keys are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub(super) fn read_string(&self, path: &str, name: &str) -> Result<String, StoreError> {
        match self.get(path, name) {
            Some(StoreValue::String(s)) => Ok(s.clone()),
            Some(StoreValue::U32(_)) => Err(type_mismatch(path, name, "string")),
            None => Err(missing(path, name)),
        }
    }

    pub(super) fn read_u32(&self, path: &str, name: &str) -> Result<u32, StoreError> {
        match self.get(path, name) {
            Some(StoreValue::U32(n)) => Ok(*n),
            Some(StoreValue::String(_)) => Err(type_mismatch(path, name, "32-bit integer")),
            None => Err(missing(path, name)),
        }
    }

    pub(super) fn open_check(&self, path: &str, access: Access) -> Result<(), StoreError> {
        if self.contains_key(path) {
            Ok(())
        } else {
            Err(StoreError::Open {
                path: path.to_string(),
                access,
                reason: "key not found".to_string(),
            })
        }
    }
}

/// Fails with [`StoreError::AccessDenied`] unless the handle has `needed` access.
pub(super) fn require(path: &str, held: Access, needed: Access) -> Result<(), StoreError> {
    if held == needed {
        Ok(())
    } else {
        Err(StoreError::AccessDenied {
            path: path.to_string(),
            needed,
        })
    }
}

fn normalize(path: &str) -> String {
    path.trim_matches('\\').to_string()
}

fn missing(path: &str, name: &str) -> StoreError {
    StoreError::Read {
        path: path.to_string(),
        value: name.to_string(),
        reason: "value not found".to_string(),
    }
}

fn type_mismatch(path: &str, name: &str, expected: &'static str) -> StoreError {
    StoreError::TypeMismatch {
        path: path.to_string(),
        value: name.to_string(),
        expected,
    }
}
