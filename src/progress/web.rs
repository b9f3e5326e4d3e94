//! LocalStorage backend (WASM only)
//!
//! Each key is stored as its own LocalStorage item under a common prefix.
//! LocalStorage writes are synchronous, so `set` is durable on return.

use std::collections::BTreeMap;

use super::prefs::{PersistError, PrefValue, Prefs, remove_each};

/// Key prefix inside LocalStorage
const KEY_PREFIX: &str = "memorise.";

/// Preferences in the browser's LocalStorage
pub struct LocalStoragePrefs {
    storage: web_sys::Storage,
    cache: BTreeMap<String, PrefValue>,
}

impl LocalStoragePrefs {
    pub fn open() -> Result<Self, PersistError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| PersistError::Unavailable("LocalStorage".to_string()))?;

        let mut cache = BTreeMap::new();
        let len = storage.length().unwrap_or(0);
        for i in 0..len {
            let Ok(Some(full_key)) = storage.key(i) else {
                continue;
            };
            let Some(key) = full_key.strip_prefix(KEY_PREFIX) else {
                continue;
            };
            if let Ok(Some(json)) = storage.get_item(&full_key) {
                match serde_json::from_str(&json) {
                    Ok(value) => {
                        cache.insert(key.to_string(), value);
                    }
                    Err(e) => log::warn!("Skipping unreadable save key '{key}': {e}"),
                }
            }
        }
        log::info!("Loaded {} saved values from LocalStorage", cache.len());

        Ok(Self { storage, cache })
    }
}

impl Prefs for LocalStoragePrefs {
    fn get(&self, key: &str) -> Option<PrefValue> {
        self.cache.get(key).copied()
    }

    fn set(&mut self, key: &str, value: PrefValue) -> Result<(), PersistError> {
        let json = serde_json::to_string(&value)?;
        self.storage
            .set_item(&format!("{KEY_PREFIX}{key}"), &json)
            .map_err(|_| PersistError::Unavailable(format!("write of '{key}' rejected")))?;
        self.cache.insert(key.to_string(), value);
        Ok(())
    }

    fn delete_all(&mut self) -> Result<(), PersistError> {
        let storage = &self.storage;
        remove_each(&mut self.cache, |key| {
            storage
                .remove_item(&format!("{KEY_PREFIX}{key}"))
                .map_err(|_| PersistError::Unavailable(format!("delete of '{key}' rejected")))
        })
    }
}
