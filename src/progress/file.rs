//! JSON file backend (native)
//!
//! The whole map is rewritten on every `set`: data goes to `<file>.tmp`
//! first and is then renamed over the save file, so a crash mid-write
//! leaves the previous save intact.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::prefs::{PersistError, PrefValue, Prefs};

/// Preferences persisted to a JSON file
#[derive(Debug)]
pub struct FilePrefs {
    path: PathBuf,
    values: BTreeMap<String, PrefValue>,
}

impl FilePrefs {
    /// Open (or lazily create) the save file at `path`
    ///
    /// A missing file is an empty store. A corrupt file is an error rather
    /// than silently discarded progress.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistError> {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(json) => {
                let values: BTreeMap<String, PrefValue> = serde_json::from_str(&json)?;
                log::info!("Loaded {} saved values from {}", values.len(), path.display());
                values
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No save file at {}, starting fresh", path.display());
                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), PersistError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("tmp");
        let json = serde_json::to_string_pretty(&self.values)?;
        {
            let mut file = fs::File::create(&tmp)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Prefs for FilePrefs {
    fn get(&self, key: &str) -> Option<PrefValue> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: PrefValue) -> Result<(), PersistError> {
        let previous = self.values.insert(key.to_string(), value);
        if let Err(e) = self.flush() {
            // Only report what made it to disk
            match previous {
                Some(old) => self.values.insert(key.to_string(), old),
                None => self.values.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn delete_all(&mut self) -> Result<(), PersistError> {
        self.values.clear();
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
