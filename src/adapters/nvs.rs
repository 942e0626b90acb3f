//! NVS (Non-Volatile Storage) adapter.
//!
//! Implements [`ConfigPort`] for the accessory preference blob and
//! [`StoragePort`] for raw namespaced blobs.
//!
//! - **`target_os = "espidf"`** — ESP-IDF NVS flash. Commits are atomic
//!   per `nvs_commit()`, so a power cut never leaves a torn blob.
//! - **host** — `HashMap` simulation backend for tests and CI.
//!
//! The preference blob is postcard-encoded. A blob that fails to decode
//! (older layout, flash corruption) reports [`ConfigError::Corrupted`]
//! and the caller falls back to defaults.

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort, StorageError, StoragePort};
use crate::config::AccessoryPrefs;

#[cfg(not(target_os = "espidf"))]
use std::cell::RefCell;
#[cfg(not(target_os = "espidf"))]
use std::collections::HashMap;

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

const PREFS_NAMESPACE: &str = "melhap";
const PREFS_KEY: &str = "prefs";

/// Upper bound for any blob this adapter reads; anything bigger is
/// treated as corruption.
const MAX_BLOB_SIZE: usize = 256;

/// Map an ESP-IDF status code to a Result.
#[cfg(target_os = "espidf")]
fn check(ret: esp_err_t) -> Result<(), esp_err_t> {
    if ret == ESP_OK { Ok(()) } else { Err(ret) }
}

pub struct NvsAdapter {
    #[cfg(not(target_os = "espidf"))]
    store: RefCell<HashMap<String, Vec<u8>>>,
}

impl NvsAdapter {
    /// Create a new adapter and initialise NVS flash.
    ///
    /// On first boot or after an NVS version mismatch the partition is
    /// erased and re-initialised automatically.
    pub fn new() -> Result<Self, ConfigError> {
        #[cfg(target_os = "espidf")]
        {
            // SAFETY: nvs_flash_init / nvs_flash_erase run from the single
            // main-task context before any concurrent NVS access.
            let ret = unsafe { nvs_flash_init() };
            if ret == ESP_ERR_NVS_NO_FREE_PAGES || ret == ESP_ERR_NVS_NEW_VERSION_FOUND {
                warn!("NVS: erasing and re-initialising flash partition");
                check(unsafe { nvs_flash_erase() }).map_err(|_| ConfigError::IoError)?;
                check(unsafe { nvs_flash_init() }).map_err(|_| ConfigError::IoError)?;
            } else {
                check(ret).map_err(|_| ConfigError::IoError)?;
            }
            info!("NvsAdapter: ESP-IDF NVS initialised");
        }

        #[cfg(not(target_os = "espidf"))]
        info!("NvsAdapter: simulation backend");

        Ok(Self {
            #[cfg(not(target_os = "espidf"))]
            store: RefCell::new(HashMap::new()),
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn composite_key(namespace: &str, key: &str) -> String {
        format!("{}::{}", namespace, key)
    }

    /// NVS names are limited to 15 bytes; longer ones are truncated into
    /// a NUL-terminated buffer.
    #[cfg(target_os = "espidf")]
    fn name_cstr(name: &str) -> [u8; 16] {
        let mut buf = [0u8; 16];
        let bytes = name.as_bytes();
        let len = bytes.len().min(15);
        buf[..len].copy_from_slice(&bytes[..len]);
        buf
    }

    /// Open an NVS namespace, run a closure with the handle, then close.
    #[cfg(target_os = "espidf")]
    fn with_nvs_handle<F, T>(namespace: &str, write: bool, f: F) -> Result<T, esp_err_t>
    where
        F: FnOnce(nvs_handle_t) -> Result<T, esp_err_t>,
    {
        let ns = Self::name_cstr(namespace);
        let mode = if write {
            nvs_open_mode_t_NVS_READWRITE
        } else {
            nvs_open_mode_t_NVS_READONLY
        };

        let mut handle: nvs_handle_t = 0;
        check(unsafe { nvs_open(ns.as_ptr().cast(), mode, &mut handle) })?;
        let result = f(handle);
        unsafe { nvs_close(handle) };
        result
    }
}

impl Default for NvsAdapter {
    /// Last-resort fallback when flash init fails: the adapter is still
    /// constructed and every subsequent NVS operation reports its own
    /// error, so the accessory runs without persistence.
    fn default() -> Self {
        Self::new().unwrap_or_else(|_| Self {
            #[cfg(not(target_os = "espidf"))]
            store: RefCell::new(HashMap::new()),
        })
    }
}

impl ConfigPort for NvsAdapter {
    fn load(&self) -> Result<AccessoryPrefs, ConfigError> {
        let mut buf = [0u8; MAX_BLOB_SIZE];
        match self.read(PREFS_NAMESPACE, PREFS_KEY, &mut buf) {
            Ok(len) => {
                let prefs: AccessoryPrefs =
                    postcard::from_bytes(&buf[..len]).map_err(|_| ConfigError::Corrupted)?;
                info!("NvsAdapter: loaded preferences ({} bytes)", len);
                Ok(prefs)
            }
            Err(StorageError::NotFound) => {
                info!("NvsAdapter: no stored preferences, using defaults");
                Ok(AccessoryPrefs::default())
            }
            Err(e) => {
                warn!("NvsAdapter: preference read failed ({})", e);
                Err(ConfigError::IoError)
            }
        }
    }

    fn save(&self, prefs: &AccessoryPrefs) -> Result<(), ConfigError> {
        let bytes = postcard::to_allocvec(prefs).map_err(|_| ConfigError::IoError)?;

        #[cfg(not(target_os = "espidf"))]
        {
            let key = Self::composite_key(PREFS_NAMESPACE, PREFS_KEY);
            self.store.borrow_mut().insert(key, bytes);
            info!("NvsAdapter: preferences saved (simulation)");
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(PREFS_NAMESPACE, true, |handle| {
                let key = Self::name_cstr(PREFS_KEY);
                check(unsafe {
                    nvs_set_blob(handle, key.as_ptr().cast(), bytes.as_ptr().cast(), bytes.len())
                })?;
                check(unsafe { nvs_commit(handle) })
            });
            match result {
                Ok(()) => {
                    info!("NvsAdapter: preferences saved ({} bytes)", bytes.len());
                    Ok(())
                }
                Err(e) => {
                    warn!("NvsAdapter: NVS write error {}", e);
                    Err(ConfigError::IoError)
                }
            }
        }
    }

    fn reset(&mut self) -> Result<(), ConfigError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let prefix = format!("{}::", PREFS_NAMESPACE);
            self.store
                .borrow_mut()
                .retain(|k: &String, _: &mut Vec<u8>| !k.starts_with(&prefix));
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            Self::with_nvs_handle(PREFS_NAMESPACE, true, |handle| {
                check(unsafe { nvs_erase_all(handle) })?;
                check(unsafe { nvs_commit(handle) })
            })
            .map_err(|_| ConfigError::IoError)
        }
    }
}

impl StoragePort for NvsAdapter {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            match self.store.borrow().get(&composite) {
                Some(data) => {
                    let len = data.len().min(buf.len());
                    buf[..len].copy_from_slice(&data[..len]);
                    Ok(len)
                }
                None => Err(StorageError::NotFound),
            }
        }

        #[cfg(target_os = "espidf")]
        {
            let result = Self::with_nvs_handle(namespace, false, |handle| {
                let key = Self::name_cstr(key);
                let mut size = buf.len();
                check(unsafe {
                    nvs_get_blob(handle, key.as_ptr().cast(), buf.as_mut_ptr().cast(), &mut size)
                })?;
                Ok(size)
            });
            match result {
                Ok(size) => Ok(size),
                Err(e) if e == ESP_ERR_NVS_NOT_FOUND => Err(StorageError::NotFound),
                Err(_) => Err(StorageError::IoError),
            }
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            self.store.borrow_mut().insert(composite, data.to_vec());
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            Self::with_nvs_handle(namespace, true, |handle| {
                let key = Self::name_cstr(key);
                check(unsafe {
                    nvs_set_blob(handle, key.as_ptr().cast(), data.as_ptr().cast(), data.len())
                })?;
                check(unsafe { nvs_commit(handle) })
            })
            .map_err(|_| StorageError::IoError)
        }
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            self.store.borrow_mut().remove(&composite);
            Ok(())
        }

        #[cfg(target_os = "espidf")]
        {
            Self::with_nvs_handle(namespace, true, |handle| {
                let key = Self::name_cstr(key);
                let ret = unsafe { nvs_erase_key(handle, key.as_ptr().cast()) };
                // Deleting a missing key is not an error.
                if ret != ESP_OK && ret != ESP_ERR_NVS_NOT_FOUND {
                    return Err(ret);
                }
                check(unsafe { nvs_commit(handle) })
            })
            .map_err(|_| StorageError::IoError)
        }
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        #[cfg(not(target_os = "espidf"))]
        {
            let composite = Self::composite_key(namespace, key);
            self.store.borrow().contains_key(&composite)
        }

        #[cfg(target_os = "espidf")]
        {
            Self::with_nvs_handle(namespace, false, |handle| {
                let key = Self::name_cstr(key);
                let ret = unsafe {
                    nvs_find_key(handle, key.as_ptr().cast(), core::ptr::null_mut())
                };
                Ok(ret == ESP_OK)
            })
            .unwrap_or(false)
        }
    }
}
