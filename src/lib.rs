//! MemoRise - a memory platformer's level core
//!
//! Core modules:
//! - `level`: Level descriptors and the campaign catalog
//! - `sim`: Deterministic generation, triggers, timers and scheduling
//! - `progress`: Persisted progress over pluggable key-value backends
//! - `controller`: The level state machine driving host collaborators
//! - `config`: Session configuration
//! - `platform`: Browser/native platform abstraction

pub mod config;
pub mod controller;
pub mod level;
pub mod platform;
pub mod progress;
pub mod sim;

pub use config::{ConfigError, LayoutPolicy, SessionConfig};
pub use controller::{LevelController, LevelError, Phase, Scene};
pub use level::{CameraBounds, DescriptorError, LevelCatalog, LevelDescriptor};
pub use progress::{MemoryPrefs, ProgressState, ProgressStore, VolumeChannel};

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Player spawns this far above the first platform
    pub const PLAYER_SPAWN_OFFSET: Vec2 = Vec2::new(0.0, 1.0);

    /// Pause between touching the finish and loading the next level (seconds)
    pub const COMPLETION_DELAY_SECS: f32 = 2.0;

    /// Default master volume (0.0 - 1.0)
    pub const DEFAULT_MASTER_VOLUME: f32 = 0.8;
    /// Default sound effects volume (0.0 - 1.0)
    pub const DEFAULT_EFFECTS_VOLUME: f32 = 1.0;

    /// Mixed into the session seed per level for stable layouts
    pub const LEVEL_SEED_MIX: u64 = 2654435761;
}
