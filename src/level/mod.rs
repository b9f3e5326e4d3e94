//! Level descriptors
//!
//! A descriptor is the static, per-level recipe the generator and controller
//! read from. Descriptors are never mutated once a session starts; the
//! controller only borrows them.

pub mod catalog;

pub use catalog::LevelCatalog;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Axis-aligned camera clamp rectangle with an enable flag
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraBounds {
    /// Whether the camera should clamp at all
    pub enabled: bool,
    /// Lower-left corner (min X, min Y)
    pub min: Vec2,
    /// Upper-right corner (max X, max Y)
    pub max: Vec2,
}

impl Default for CameraBounds {
    fn default() -> Self {
        Self {
            enabled: false,
            min: Vec2::splat(-100.0),
            max: Vec2::splat(100.0),
        }
    }
}

impl CameraBounds {
    /// Enabled bounds spanning `min..=max`
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            enabled: true,
            min,
            max,
        }
    }

    /// Clamp a desired camera position into the rectangle (no-op when disabled)
    pub fn clamp(&self, desired: Vec2) -> Vec2 {
        if self.enabled {
            desired.clamp(self.min, self.max)
        } else {
            desired
        }
    }
}

/// Static configuration for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelDescriptor {
    /// Display name ("Level 1", "Tutorial")
    pub name: String,
    /// Number of platforms in the chain (>= 1)
    pub platform_count: usize,
    /// World position of the first platform, also the spawn anchor
    pub first_platform_position: Vec2,
    /// Minimum distance between consecutive platforms along the path
    pub min_jump_distance: f32,
    /// Maximum distance between consecutive platforms along the path
    pub max_jump_distance: f32,
    /// Maximum sideways drift between consecutive platforms
    pub max_height_variation: f32,
    /// true = the chain advances along X, false = along Y
    pub horizontal_path: bool,
    /// Seconds each platform stays visible before fading
    pub reveal_duration: f32,
    /// Seconds allowed to finish the level. `None`, zero or a negative value
    /// means an untimed level with a count-up clock.
    pub time_limit: Option<f32>,
    /// Offset of the finish marker from the last platform
    pub finish_offset_from_last_platform: Vec2,
    /// Falling below this world Y kills the player
    pub death_y: f32,
    /// Camera clamp for this level
    pub camera_bounds: CameraBounds,
}

impl Default for LevelDescriptor {
    fn default() -> Self {
        Self {
            name: "Level 1".to_string(),
            platform_count: 5,
            first_platform_position: Vec2::ZERO,
            min_jump_distance: 2.0,
            max_jump_distance: 4.0,
            max_height_variation: 2.0,
            horizontal_path: true,
            reveal_duration: 5.0,
            time_limit: None,
            finish_offset_from_last_platform: Vec2::ZERO,
            death_y: -10.0,
            camera_bounds: CameraBounds::default(),
        }
    }
}

/// A descriptor rule that does not hold
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DescriptorError {
    #[error("platform count must be at least 1")]
    NoPlatforms,
    #[error("{field} must be finite (got {value})")]
    NotFinite { field: &'static str, value: f32 },
    #[error("{field} must be greater than zero (got {value:.2})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{field} must not be negative (got {value:.2})")]
    Negative { field: &'static str, value: f32 },
    #[error("jump minimum {min:.2} exceeds maximum {max:.2}")]
    JumpMinExceedsMax { min: f32, max: f32 },
    #[error("camera bounds are inverted (min {min}, max {max})")]
    InvertedCameraBounds { min: Vec2, max: Vec2 },
}

impl LevelDescriptor {
    /// Check every invariant the generator and controller rely on
    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.platform_count < 1 {
            return Err(DescriptorError::NoPlatforms);
        }

        let scalars = [
            ("first_platform_position.x", self.first_platform_position.x),
            ("first_platform_position.y", self.first_platform_position.y),
            ("min_jump_distance", self.min_jump_distance),
            ("max_jump_distance", self.max_jump_distance),
            ("max_height_variation", self.max_height_variation),
            ("reveal_duration", self.reveal_duration),
            ("finish_offset.x", self.finish_offset_from_last_platform.x),
            ("finish_offset.y", self.finish_offset_from_last_platform.y),
            ("death_y", self.death_y),
        ];
        if let Some(&(field, value)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
            return Err(DescriptorError::NotFinite { field, value });
        }

        for (field, value) in [
            ("min_jump_distance", self.min_jump_distance),
            ("max_jump_distance", self.max_jump_distance),
        ] {
            if value <= 0.0 {
                return Err(DescriptorError::NotPositive { field, value });
            }
        }
        if self.min_jump_distance > self.max_jump_distance {
            return Err(DescriptorError::JumpMinExceedsMax {
                min: self.min_jump_distance,
                max: self.max_jump_distance,
            });
        }

        for (field, value) in [
            ("max_height_variation", self.max_height_variation),
            ("reveal_duration", self.reveal_duration),
        ] {
            if value < 0.0 {
                return Err(DescriptorError::Negative { field, value });
            }
        }

        if let Some(limit) = self.time_limit.filter(|l| !l.is_finite()) {
            return Err(DescriptorError::NotFinite {
                field: "time_limit",
                value: limit,
            });
        }

        let bounds = &self.camera_bounds;
        if bounds.enabled && (bounds.min.x > bounds.max.x || bounds.min.y > bounds.max.y) {
            return Err(DescriptorError::InvertedCameraBounds {
                min: bounds.min,
                max: bounds.max,
            });
        }

        Ok(())
    }

    /// The countdown length, if the level has one
    pub fn countdown(&self) -> Option<f32> {
        self.time_limit.filter(|limit| *limit > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_descriptor_is_valid() {
        assert_eq!(LevelDescriptor::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_zero_platforms() {
        let level = LevelDescriptor {
            platform_count: 0,
            ..Default::default()
        };
        assert_eq!(level.validate(), Err(DescriptorError::NoPlatforms));
    }

    #[test]
    fn test_rejects_inverted_jump_range() {
        let level = LevelDescriptor {
            min_jump_distance: 5.0,
            max_jump_distance: 3.0,
            ..Default::default()
        };
        assert!(matches!(
            level.validate(),
            Err(DescriptorError::JumpMinExceedsMax { .. })
        ));
    }

    #[test]
    fn test_rejects_non_positive_jump_and_limit() {
        let level = LevelDescriptor {
            min_jump_distance: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            level.validate(),
            Err(DescriptorError::NotPositive {
                field: "min_jump_distance",
                ..
            })
        ));

        let timed = LevelDescriptor {
            time_limit: Some(f32::INFINITY),
            ..Default::default()
        };
        assert!(matches!(
            timed.validate(),
            Err(DescriptorError::NotFinite {
                field: "time_limit",
                ..
            })
        ));
    }

    #[test]
    fn test_non_positive_time_limit_counts_up() {
        for limit in [0.0, -5.0] {
            let level = LevelDescriptor {
                time_limit: Some(limit),
                ..Default::default()
            };
            assert!(level.validate().is_ok());
            assert_eq!(level.countdown(), None);
        }
        let timed = LevelDescriptor {
            time_limit: Some(30.0),
            ..Default::default()
        };
        assert_eq!(timed.countdown(), Some(30.0));
    }

    #[test]
    fn test_rejects_nan() {
        let level = LevelDescriptor {
            death_y: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            level.validate(),
            Err(DescriptorError::NotFinite { field: "death_y", .. })
        ));
    }

    #[test]
    fn test_disabled_bounds_are_not_checked() {
        let mut level = LevelDescriptor::default();
        level.camera_bounds.min = Vec2::splat(10.0);
        level.camera_bounds.max = Vec2::splat(-10.0);
        assert_eq!(level.validate(), Ok(()));

        level.camera_bounds.enabled = true;
        assert!(matches!(
            level.validate(),
            Err(DescriptorError::InvertedCameraBounds { .. })
        ));
    }

    #[test]
    fn test_camera_clamp() {
        let bounds = CameraBounds::new(Vec2::new(-5.0, 0.0), Vec2::new(5.0, 20.0));
        assert_eq!(bounds.clamp(Vec2::new(9.0, -3.0)), Vec2::new(5.0, 0.0));
        assert_eq!(bounds.clamp(Vec2::new(1.0, 2.0)), Vec2::new(1.0, 2.0));

        let off = CameraBounds::default();
        assert_eq!(off.clamp(Vec2::new(500.0, 0.0)), Vec2::new(500.0, 0.0));
    }
}
