//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Logging setup
//! - Seed entropy
//! - Default progress storage

use crate::progress::{PersistError, Prefs};

/// Install the logger for this target. Safe to call more than once.
#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(default_filter: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init();
}

/// Install the logger for this target. Safe to call more than once.
#[cfg(target_arch = "wasm32")]
pub fn init_logging(default_filter: &str) {
    console_error_panic_hook::set_once();
    let level = default_filter.parse().unwrap_or(log::Level::Info);
    let _ = console_log::init_with_level(level);
}

/// A seed from the wall clock
#[cfg(not(target_arch = "wasm32"))]
pub fn entropy_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}

/// A seed from the wall clock
#[cfg(target_arch = "wasm32")]
pub fn entropy_seed() -> u64 {
    (js_sys::Date::now() * 1000.0) as u64
}

/// Default save file location on native builds
#[cfg(not(target_arch = "wasm32"))]
pub const DEFAULT_SAVE_PATH: &str = "memorise_save.json";

/// Open this target's persistent preferences
#[cfg(not(target_arch = "wasm32"))]
pub fn open_prefs() -> Result<Box<dyn Prefs>, PersistError> {
    Ok(Box::new(crate::progress::FilePrefs::open(DEFAULT_SAVE_PATH)?))
}

/// Open this target's persistent preferences
#[cfg(target_arch = "wasm32")]
pub fn open_prefs() -> Result<Box<dyn Prefs>, PersistError> {
    Ok(Box::new(crate::progress::LocalStoragePrefs::open()?))
}
