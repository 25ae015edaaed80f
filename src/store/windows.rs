//! Windows registry backend (`HKEY_LOCAL_MACHINE`).

use windows::Win32::Foundation::{ERROR_MORE_DATA, ERROR_NO_MORE_ITEMS, WIN32_ERROR};
use windows::Win32::System::Registry::{
    HKEY, HKEY_LOCAL_MACHINE, KEY_READ, KEY_SET_VALUE, REG_VALUE_TYPE, RegCloseKey, RegEnumKeyExW,
    RegOpenKeyExW, RegQueryValueExW, RegSetValueExW,
};
use windows::core::{HSTRING, PWSTR};

use super::registry_value::{REG_DWORD, REG_SZ, decode_dword, decode_sz, encode_sz, is_string};
use super::{Access, KeyValueStore, StoreError, StoreKey};

/// Registry key names are limited to 255 characters.
const MAX_KEY_NAME_LEN: usize = 256;

/// Registry-backed [`KeyValueStore`] rooted at `HKEY_LOCAL_MACHINE`.
///
/// Writing requires an elevated process.
///
/// # Example
///
/// ```no_run
/// use netcfg::store::{Access, KeyValueStore, RegistryStore, StoreKey, StoreLayout};
///
/// let store = RegistryStore::new();
/// let key = store.open(StoreLayout::DEFAULT_INTERFACES_ROOT, Access::Read)?;
/// for id in key.subkey_names()? {
///     println!("{id}");
/// }
/// # Ok::<(), netcfg::store::StoreError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct RegistryStore {
    _private: (),
}

impl RegistryStore {
    /// Creates a registry store.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }
}

impl KeyValueStore for RegistryStore {
    type Key = RegistryKey;

    fn open(&self, path: &str, access: Access) -> Result<RegistryKey, StoreError> {
        let sam = match access {
            Access::Read => KEY_READ,
            Access::Write => KEY_SET_VALUE,
        };

        let mut hkey = HKEY::default();
        // SAFETY: `hkey` is a valid out pointer; the path is a null-terminated HSTRING.
        let status = unsafe {
            RegOpenKeyExW(
                HKEY_LOCAL_MACHINE,
                &HSTRING::from(path),
                None,
                sam,
                &raw mut hkey,
            )
        };
        check(status).map_err(|reason| StoreError::Open {
            path: path.to_string(),
            access,
            reason,
        })?;

        Ok(RegistryKey {
            hkey,
            path: path.to_string(),
        })
    }
}

/// An open registry key; closed on drop.
#[derive(Debug)]
pub struct RegistryKey {
    hkey: HKEY,
    path: String,
}

impl RegistryKey {
    /// Queries a value's type and raw bytes.
    fn query(&self, name: &str) -> Result<(u32, Vec<u8>), StoreError> {
        let read_error = |reason: String| StoreError::Read {
            path: self.path.clone(),
            value: name.to_string(),
            reason,
        };
        let value_name = HSTRING::from(name);

        let mut kind = REG_VALUE_TYPE::default();
        let mut size = 0u32;
        // SAFETY: size query with no data buffer; out pointers are valid locals.
        let status = unsafe {
            RegQueryValueExW(
                self.hkey,
                &value_name,
                None,
                Some(&raw mut kind),
                None,
                Some(&raw mut size),
            )
        };
        check(status).map_err(read_error)?;

        let mut buffer = vec![0u8; size as usize];
        // SAFETY: `buffer` holds `size` bytes as reported by the previous call.
        let status = unsafe {
            RegQueryValueExW(
                self.hkey,
                &value_name,
                None,
                Some(&raw mut kind),
                Some(buffer.as_mut_ptr()),
                Some(&raw mut size),
            )
        };
        check(status).map_err(read_error)?;
        buffer.truncate(size as usize);

        Ok((kind.0, buffer))
    }

    fn set_raw(&self, name: &str, kind: u32, data: &[u8]) -> Result<(), StoreError> {
        // SAFETY: `data` is a valid byte slice for the duration of the call.
        let status = unsafe { RegSetValueExW(self.hkey, &HSTRING::from(name), None, REG_VALUE_TYPE(kind), Some(data)) };
        check(status).map_err(|reason| StoreError::Write {
            path: self.path.clone(),
            value: name.to_string(),
            reason,
        })
    }
}

impl StoreKey for RegistryKey {
    fn subkey_names(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        let mut buffer = [0u16; MAX_KEY_NAME_LEN];

        for index in 0.. {
            #[allow(clippy::cast_possible_truncation)]
            let mut len = buffer.len() as u32;
            // SAFETY: `buffer` holds `len` UTF-16 units; optional outputs are omitted.
            let status = unsafe {
                RegEnumKeyExW(
                    self.hkey,
                    index,
                    Some(PWSTR(buffer.as_mut_ptr())),
                    &raw mut len,
                    None,
                    None,
                    None,
                    None,
                )
            };
            if status == ERROR_NO_MORE_ITEMS {
                break;
            }
            check(status).map_err(|reason| StoreError::Enumerate {
                path: self.path.clone(),
                reason,
            })?;
            names.push(String::from_utf16_lossy(&buffer[..len as usize]));
        }

        Ok(names)
    }

    fn get_string(&self, name: &str) -> Result<String, StoreError> {
        let (kind, bytes) = self.query(name)?;
        if !is_string(kind) {
            return Err(StoreError::TypeMismatch {
                path: self.path.clone(),
                value: name.to_string(),
                expected: "string",
            });
        }
        Ok(decode_sz(&bytes))
    }

    fn get_u32(&self, name: &str) -> Result<u32, StoreError> {
        let (kind, bytes) = self.query(name)?;
        decode_dword(kind, &bytes).ok_or_else(|| StoreError::TypeMismatch {
            path: self.path.clone(),
            value: name.to_string(),
            expected: "32-bit integer",
        })
    }

    fn set_string(&mut self, name: &str, value: &str) -> Result<(), StoreError> {
        self.set_raw(name, REG_SZ, &encode_sz(value))
    }

    fn set_u32(&mut self, name: &str, value: u32) -> Result<(), StoreError> {
        self.set_raw(name, REG_DWORD, &value.to_le_bytes())
    }
}

impl Drop for RegistryKey {
    fn drop(&mut self) {
        // SAFETY: `hkey` was opened by RegOpenKeyExW and is closed exactly once.
        let status = unsafe { RegCloseKey(self.hkey) };
        if let Err(reason) = check(status) {
            tracing::debug!("Failed to close registry key '{}': {reason}", self.path);
        }
    }
}

fn check(status: WIN32_ERROR) -> Result<(), String> {
    if status == ERROR_MORE_DATA {
        return Err("buffer too small".to_string());
    }
    status.ok().map_err(|e| e.message())
}
