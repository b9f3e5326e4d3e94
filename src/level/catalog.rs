//! Ordered level collection
//!
//! The catalog is the campaign: index 0 is played first and finishing the
//! last entry loops back to the start.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::{CameraBounds, LevelDescriptor};
use crate::config::ConfigError;

/// The ordered set of levels a session plays through
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelCatalog {
    pub levels: Vec<LevelDescriptor>,
}

impl LevelCatalog {
    pub fn new(levels: Vec<LevelDescriptor>) -> Self {
        Self { levels }
    }

    /// The built-in three-level campaign
    pub fn builtin() -> Self {
        let levels = vec![
            LevelDescriptor {
                name: "Level 1".to_string(),
                platform_count: 5,
                reveal_duration: 5.0,
                max_height_variation: 1.0,
                finish_offset_from_last_platform: Vec2::new(2.0, 1.0),
                ..Default::default()
            },
            LevelDescriptor {
                name: "Level 2".to_string(),
                platform_count: 7,
                reveal_duration: 4.0,
                min_jump_distance: 2.5,
                max_jump_distance: 4.5,
                max_height_variation: 2.0,
                time_limit: Some(90.0),
                finish_offset_from_last_platform: Vec2::new(2.0, 1.0),
                camera_bounds: CameraBounds::new(Vec2::new(-5.0, -8.0), Vec2::new(60.0, 20.0)),
                ..Default::default()
            },
            LevelDescriptor {
                name: "Level 3".to_string(),
                platform_count: 8,
                reveal_duration: 3.0,
                min_jump_distance: 2.0,
                max_jump_distance: 3.0,
                max_height_variation: 1.5,
                horizontal_path: false,
                time_limit: Some(60.0),
                finish_offset_from_last_platform: Vec2::new(0.0, 2.0),
                death_y: -6.0,
                ..Default::default()
            },
        ];
        Self { levels }
    }

    /// Parse a catalog from JSON and validate every level
    ///
    /// Accepts either `{"levels": [...]}` or a bare array of descriptors.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Wrapped(LevelCatalog),
            Bare(Vec<LevelDescriptor>),
        }

        let catalog = match serde_json::from_str::<Shape>(json)? {
            Shape::Wrapped(catalog) => catalog,
            Shape::Bare(levels) => Self { levels },
        };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Read and validate a catalog file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        log::info!("Loaded {} levels from {}", catalog.len(), path.display());
        Ok(catalog)
    }

    /// Validate every descriptor, reporting the first bad level
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, level) in self.levels.iter().enumerate() {
            level
                .validate()
                .map_err(|source| ConfigError::InvalidLevel {
                    index,
                    name: level.name.clone(),
                    source,
                })?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LevelDescriptor> {
        self.levels.get(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::DescriptorError;

    #[test]
    fn test_builtin_campaign_is_valid() {
        let catalog = LevelCatalog::builtin();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.validate().is_ok());
        assert!(!catalog.levels[2].horizontal_path);
    }

    #[test]
    fn test_from_json_wrapped_and_bare() {
        let wrapped = r#"{"levels": [{"name": "A", "platform_count": 2}]}"#;
        let catalog = LevelCatalog::from_json(wrapped).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.levels[0].name, "A");
        // Unspecified fields fall back to descriptor defaults
        assert_eq!(catalog.levels[0].max_jump_distance, 4.0);

        let bare = r#"[{"name": "B", "time_limit": 30.0, "first_platform_position": [1.0, 2.0]}]"#;
        let catalog = LevelCatalog::from_json(bare).unwrap();
        assert_eq!(catalog.levels[0].time_limit, Some(30.0));
        assert_eq!(catalog.levels[0].first_platform_position, Vec2::new(1.0, 2.0));
    }

    #[test]
    fn test_from_json_reports_bad_level() {
        let json = r#"[{"name": "ok"}, {"name": "broken", "platform_count": 0}]"#;
        match LevelCatalog::from_json(json) {
            Err(ConfigError::InvalidLevel { index, name, source }) => {
                assert_eq!(index, 1);
                assert_eq!(name, "broken");
                assert_eq!(source, DescriptorError::NoPlatforms);
            }
            other => panic!("expected invalid level, got {other:?}"),
        }
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(matches!(
            LevelCatalog::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
