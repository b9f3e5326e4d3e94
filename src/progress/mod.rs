//! Persisted progress
//!
//! Five scalar keys in a flat key-value store:
//! - level index, current-level deaths, total deaths (ints)
//! - master and effects volume (floats)
//!
//! A missing level-index key means "no save data". Each save call is durable
//! on return; multi-field updates are not transactional.

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
pub mod prefs;
#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FilePrefs;
pub use prefs::{MemoryPrefs, PersistError, PrefValue, Prefs};
#[cfg(target_arch = "wasm32")]
pub use web::LocalStoragePrefs;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_EFFECTS_VOLUME, DEFAULT_MASTER_VOLUME};

/// Storage keys
pub mod keys {
    pub const LEVEL_INDEX: &str = "current_level_index";
    pub const LEVEL_DEATHS: &str = "current_level_deaths";
    pub const TOTAL_DEATHS: &str = "total_deaths";
    pub const MASTER_VOLUME: &str = "master_volume";
    pub const EFFECTS_VOLUME: &str = "effects_volume";
}

/// Audio channels with a persisted volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VolumeChannel {
    Master,
    Effects,
}

impl VolumeChannel {
    pub fn key(&self) -> &'static str {
        match self {
            VolumeChannel::Master => keys::MASTER_VOLUME,
            VolumeChannel::Effects => keys::EFFECTS_VOLUME,
        }
    }

    pub fn default_volume(&self) -> f32 {
        match self {
            VolumeChannel::Master => DEFAULT_MASTER_VOLUME,
            VolumeChannel::Effects => DEFAULT_EFFECTS_VOLUME,
        }
    }
}

/// Progress counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    /// 0-based index into the level catalog
    pub level_index: usize,
    /// Deaths on the current level, cleared on level change
    pub level_deaths: u32,
    /// Deaths across the whole run, cleared only by a full reset
    pub total_deaths: u32,
}

/// Typed progress accessors over a `Prefs` backend
#[derive(Debug, Default)]
pub struct ProgressStore<P: Prefs> {
    prefs: P,
}

impl<P: Prefs> ProgressStore<P> {
    pub fn new(prefs: P) -> Self {
        Self { prefs }
    }

    pub fn prefs(&self) -> &P {
        &self.prefs
    }

    pub fn save_level_index(&mut self, index: usize) -> Result<(), PersistError> {
        self.prefs.set_int(keys::LEVEL_INDEX, index as i64)?;
        log::info!("Saved progress: level {}", index + 1);
        Ok(())
    }

    pub fn load_level_index(&self) -> usize {
        read_count(&self.prefs, keys::LEVEL_INDEX) as usize
    }

    pub fn save_level_deaths(&mut self, deaths: u32) -> Result<(), PersistError> {
        self.prefs.set_int(keys::LEVEL_DEATHS, i64::from(deaths))
    }

    pub fn load_level_deaths(&self) -> u32 {
        read_count(&self.prefs, keys::LEVEL_DEATHS)
    }

    pub fn save_total_deaths(&mut self, deaths: u32) -> Result<(), PersistError> {
        self.prefs.set_int(keys::TOTAL_DEATHS, i64::from(deaths))
    }

    pub fn load_total_deaths(&self) -> u32 {
        read_count(&self.prefs, keys::TOTAL_DEATHS)
    }

    /// Store a channel volume, clamped to [0, 1]
    pub fn save_volume(&mut self, channel: VolumeChannel, volume: f32) -> Result<(), PersistError> {
        let volume = if volume.is_finite() {
            volume.clamp(0.0, 1.0)
        } else {
            channel.default_volume()
        };
        self.prefs.set_float(channel.key(), f64::from(volume))
    }

    pub fn load_volume(&self, channel: VolumeChannel) -> f32 {
        let volume = self
            .prefs
            .get_float(channel.key(), f64::from(channel.default_volume())) as f32;
        volume.clamp(0.0, 1.0)
    }

    /// Whether a level index has ever been saved
    pub fn has_save_data(&self) -> bool {
        self.prefs.has_key(keys::LEVEL_INDEX)
    }

    /// Back to level 0 (counters untouched)
    pub fn reset_level_progress(&mut self) -> Result<(), PersistError> {
        self.prefs.set_int(keys::LEVEL_INDEX, 0)?;
        log::info!("Level progress reset");
        Ok(())
    }

    /// Zero both death counters
    pub fn reset_death_counts(&mut self) -> Result<(), PersistError> {
        self.prefs.set_int(keys::LEVEL_DEATHS, 0)?;
        self.prefs.set_int(keys::TOTAL_DEATHS, 0)?;
        log::info!("Death counters reset");
        Ok(())
    }

    /// Erase every key, volumes included
    pub fn delete_all(&mut self) -> Result<(), PersistError> {
        self.prefs.delete_all()?;
        log::warn!("All save data deleted");
        Ok(())
    }

    /// Counters as one value (defaults when nothing is saved)
    pub fn load_state(&self) -> ProgressState {
        ProgressState {
            level_index: self.load_level_index(),
            level_deaths: self.load_level_deaths(),
            total_deaths: self.load_total_deaths(),
        }
    }

    /// Write all three counters
    pub fn save_state(&mut self, state: &ProgressState) -> Result<(), PersistError> {
        self.save_level_index(state.level_index)?;
        self.save_level_deaths(state.level_deaths)?;
        self.save_total_deaths(state.total_deaths)
    }
}

/// Non-negative counter read; negative or out-of-range values fall back to 0
fn read_count<P: Prefs + ?Sized>(prefs: &P, key: &str) -> u32 {
    let raw = prefs.get_int(key, 0);
    u32::try_from(raw).unwrap_or_else(|_| {
        log::warn!("Ignoring out-of-range saved value {key} = {raw}");
        0
    })
}
