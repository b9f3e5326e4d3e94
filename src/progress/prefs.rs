//! Flat key-value preference backends

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A stored scalar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Int(i64),
    Float(f64),
}

impl PrefValue {
    pub fn as_int(&self) -> Option<i64> {
        match *self {
            PrefValue::Int(v) => Some(v),
            PrefValue::Float(_) => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match *self {
            PrefValue::Float(v) => Some(v),
            PrefValue::Int(v) => Some(v as f64),
        }
    }
}

/// Persistence failures
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Durable flat key-value store
///
/// Every write must be persisted before it returns.
pub trait Prefs {
    fn get(&self, key: &str) -> Option<PrefValue>;
    fn set(&mut self, key: &str, value: PrefValue) -> Result<(), PersistError>;
    fn has_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
    fn delete_all(&mut self) -> Result<(), PersistError>;

    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(|v| v.as_int()).unwrap_or(default)
    }

    fn get_float(&self, key: &str, default: f64) -> f64 {
        self.get(key).and_then(|v| v.as_float()).unwrap_or(default)
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), PersistError> {
        self.set(key, PrefValue::Int(value))
    }

    fn set_float(&mut self, key: &str, value: f64) -> Result<(), PersistError> {
        self.set(key, PrefValue::Float(value))
    }
}

/// In-memory backend
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryPrefs {
    values: BTreeMap<String, PrefValue>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Prefs for MemoryPrefs {
    fn get(&self, key: &str) -> Option<PrefValue> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: PrefValue) -> Result<(), PersistError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn delete_all(&mut self) -> Result<(), PersistError> {
        self.values.clear();
        Ok(())
    }
}

/// Remove every cached key through `remove`, stopping at the first failure
///
/// Keys are dropped from `cache` only once their backing item is gone, so a
/// failed delete never looks like missing save data.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
pub(crate) fn remove_each<F>(
    cache: &mut BTreeMap<String, PrefValue>,
    mut remove: F,
) -> Result<(), PersistError>
where
    F: FnMut(&str) -> Result<(), PersistError>,
{
    let keys: Vec<String> = cache.keys().cloned().collect();
    for key in keys {
        remove(&key)?;
        cache.remove(&key);
    }
    Ok(())
}

impl<P: Prefs + ?Sized> Prefs for Box<P> {
    fn get(&self, key: &str) -> Option<PrefValue> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: PrefValue) -> Result<(), PersistError> {
        (**self).set(key, value)
    }

    fn delete_all(&mut self) -> Result<(), PersistError> {
        (**self).delete_all()
    }
}
