//! Session configuration
//!
//! Runtime knobs that are not part of any single level: RNG seeding, layout
//! policy, placement mode and the completion delay. Loaded from JSON on native
//! builds, defaults everywhere else.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{COMPLETION_DELAY_SECS, PLAYER_SPAWN_OFFSET};
use crate::level::DescriptorError;
use crate::sim::PlacementMode;

/// How platform layouts are seeded across reloads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LayoutPolicy {
    /// One RNG stream for the whole session: every reload, including a
    /// death restart, produces a fresh layout
    #[default]
    Reroll,
    /// Reseed from (session seed, level index) on every load: a death
    /// restart replays the exact same layout
    StablePerLevel,
}

impl LayoutPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            LayoutPolicy::Reroll => "reroll",
            LayoutPolicy::StablePerLevel => "stable",
        }
    }
}

impl FromStr for LayoutPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reroll" | "fresh" => Ok(LayoutPolicy::Reroll),
            "stable" | "stable_per_level" => Ok(LayoutPolicy::StablePerLevel),
            _ => Err(ConfigError::InvalidValue {
                field: "layout_policy",
                value: s.to_string(),
            }),
        }
    }
}

/// Session-wide settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Session seed; `None` draws one from the platform clock
    pub seed: Option<u64>,
    /// Whether death restarts keep the same layout
    pub layout_policy: LayoutPolicy,
    /// Platform placement algorithm
    pub placement: PlacementMode,
    /// Seconds between touching the finish and loading the next level
    pub completion_delay: f32,
    /// Player spawn offset from the first platform
    pub player_spawn_offset: Vec2,
    /// Treat an expired time limit as a death
    pub time_limit_kills: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: None,
            layout_policy: LayoutPolicy::Reroll,
            placement: PlacementMode::Chain,
            completion_delay: COMPLETION_DELAY_SECS,
            player_spawn_offset: PLAYER_SPAWN_OFFSET,
            time_limit_kills: true,
        }
    }
}

impl SessionConfig {
    /// Seeded config (reproducible sessions and tests)
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Builder-style layout policy override
    pub fn with_layout_policy(mut self, policy: LayoutPolicy) -> Self {
        self.layout_policy = policy;
        self
    }

    /// The configured seed, or fresh platform entropy
    pub fn resolve_seed(&self) -> u64 {
        self.seed.unwrap_or_else(crate::platform::entropy_seed)
    }

    /// Reject values the controller or the placement code cannot use
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field: &'static str, value: String| ConfigError::InvalidValue { field, value };

        if !self.completion_delay.is_finite() || self.completion_delay < 0.0 {
            return Err(invalid("completion_delay", self.completion_delay.to_string()));
        }
        if !self.player_spawn_offset.is_finite() {
            return Err(invalid("player_spawn_offset", self.player_spawn_offset.to_string()));
        }

        if let PlacementMode::Scatter {
            range_x,
            range_y,
            min_distance,
            ..
        } = self.placement
        {
            // A non-positive range collapses every candidate onto one point
            for (field, value) in [("placement.range_x", range_x), ("placement.range_y", range_y)] {
                if !value.is_finite() || value <= 0.0 {
                    return Err(invalid(field, value.to_string()));
                }
            }
            if !min_distance.is_finite() || min_distance < 0.0 {
                return Err(invalid("placement.min_distance", min_distance.to_string()));
            }
        }
        Ok(())
    }

    /// Load config from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!("Loaded session config from {}", path.display());
        Ok(config)
    }

    /// Load config from a file if present, falling back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("Ignoring config: {e}");
                Self::default()
            }
        }
    }
}

/// Failures reading configuration or level data
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("level {index} ({name}) is invalid: {source}")]
    InvalidLevel {
        index: usize,
        name: String,
        #[source]
        source: DescriptorError,
    },
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.completion_delay, 2.0);
        assert_eq!(config.player_spawn_offset, Vec2::new(0.0, 1.0));
        assert_eq!(config.layout_policy, LayoutPolicy::Reroll);
        assert_eq!(config.placement, PlacementMode::Chain);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: SessionConfig =
            serde_json::from_str(r#"{"seed": 7, "layout_policy": "stable_per_level"}"#).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.layout_policy, LayoutPolicy::StablePerLevel);
        assert_eq!(config.completion_delay, 2.0);
        assert_eq!(config.resolve_seed(), 7);
    }

    #[test]
    fn test_policy_names() {
        assert_eq!("Stable".parse::<LayoutPolicy>().unwrap(), LayoutPolicy::StablePerLevel);
        assert_eq!("reroll".parse::<LayoutPolicy>().unwrap(), LayoutPolicy::Reroll);
        assert!(matches!(
            "sideways".parse::<LayoutPolicy>(),
            Err(ConfigError::InvalidValue { field: "layout_policy", .. })
        ));
        assert_eq!(
            LayoutPolicy::StablePerLevel.as_str().parse::<LayoutPolicy>().unwrap(),
            LayoutPolicy::StablePerLevel
        );
    }

    #[test]
    fn test_validate_rejects_unusable_scatter() {
        let scatter = |range_x: f32, range_y: f32, min_distance: f32| SessionConfig {
            placement: PlacementMode::Scatter {
                range_x,
                range_y,
                min_distance,
                max_attempts: 10,
            },
            ..SessionConfig::default()
        };

        assert!(scatter(5.0, 2.0, 1.0).validate().is_ok());
        for (config, field) in [
            (scatter(-5.0, 2.0, 1.0), "placement.range_x"),
            (scatter(5.0, 0.0, 1.0), "placement.range_y"),
            (scatter(f32::INFINITY, 2.0, 1.0), "placement.range_x"),
            (scatter(5.0, 2.0, f32::NAN), "placement.min_distance"),
        ] {
            match config.validate() {
                Err(ConfigError::InvalidValue { field: got, .. }) => assert_eq!(got, field),
                other => panic!("expected {field} to be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_validate_rejects_bad_spawn_and_delay() {
        let config = SessionConfig {
            player_spawn_offset: Vec2::new(0.0, f32::NAN),
            ..SessionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "player_spawn_offset", .. })
        ));

        let config = SessionConfig {
            completion_delay: -1.0,
            ..SessionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { field: "completion_delay", .. })
        ));
    }

    #[test]
    fn test_load_rejects_negative_scatter_range() {
        let dir = std::env::temp_dir().join(format!("memorise-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        std::fs::write(
            &path,
            r#"{"placement":{"mode":"scatter","range_x":-5.0,"range_y":-2.0,"min_distance":1.0,"max_attempts":10}}"#,
        )
        .unwrap();

        assert!(matches!(
            SessionConfig::load(&path),
            Err(ConfigError::InvalidValue { field: "placement.range_x", .. })
        ));
        // The lenient loader falls back to defaults instead
        assert_eq!(SessionConfig::load_or_default(&path), SessionConfig::default());
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = SessionConfig::load_or_default("/nonexistent/memorise/config.json");
        assert_eq!(config, SessionConfig::default());
    }
}
