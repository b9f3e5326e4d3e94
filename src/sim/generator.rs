//! Platform placement
//!
//! The chain generator walks from the first platform, stepping a random
//! jump distance along the path axis and a random drift across it. Every
//! platform is therefore within jump range of its predecessor; nothing
//! else (overlap, obstacles) is checked.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::level::LevelDescriptor;

/// Source of uniform samples over a closed range
///
/// Implemented for every `rand::Rng`; tests can substitute a fixed sampler.
pub trait RangeSampler {
    /// Uniform sample in `[low, high]` (returns `low` when the range is empty)
    fn sample_range(&mut self, low: f32, high: f32) -> f32;
}

impl<R: Rng + ?Sized> RangeSampler for R {
    fn sample_range(&mut self, low: f32, high: f32) -> f32 {
        if low < high {
            self.random_range(low..=high)
        } else {
            low
        }
    }
}

/// Placement algorithm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum PlacementMode {
    /// Each platform is chained from its predecessor (reachable by construction)
    #[default]
    Chain,
    /// Legacy: platforms scattered around the first one, rejecting candidates
    /// closer than `min_distance` to an already placed platform
    Scatter {
        /// Maximum X offset from the anchor
        range_x: f32,
        /// Maximum Y offset from the anchor
        range_y: f32,
        /// Minimum spacing between any two platforms
        min_distance: f32,
        /// Candidates tried before accepting the last one regardless
        max_attempts: u32,
    },
}

/// Generated platform positions, index 0 = spawn anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformPlacement {
    positions: Vec<Vec2>,
}

impl PlatformPlacement {
    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The spawn anchor
    pub fn first_position(&self) -> Vec2 {
        self.positions.first().copied().unwrap_or(Vec2::ZERO)
    }

    /// The pre-finish anchor
    pub fn last_position(&self) -> Vec2 {
        self.positions.last().copied().unwrap_or(Vec2::ZERO)
    }

    /// Consecutive (previous, next) pairs
    pub fn steps(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        self.positions.windows(2).map(|w| (w[0], w[1]))
    }
}

/// Split a step into (advance, perpendicular) components for the path axis
#[inline]
pub fn step_components(step: Vec2, horizontal_path: bool) -> (f32, f32) {
    if horizontal_path {
        (step.x, step.y)
    } else {
        (step.y, step.x)
    }
}

/// Lay out `platform_count` platforms chained from the first position
pub fn generate<S: RangeSampler + ?Sized>(
    level: &LevelDescriptor,
    sampler: &mut S,
) -> PlatformPlacement {
    let count = level.platform_count.max(1);
    let mut positions = Vec::with_capacity(count);
    let mut current = level.first_platform_position;
    positions.push(current);

    for _ in 1..count {
        let jump = sampler.sample_range(level.min_jump_distance, level.max_jump_distance);
        let drift =
            sampler.sample_range(-level.max_height_variation, level.max_height_variation);
        current += if level.horizontal_path {
            Vec2::new(jump, drift)
        } else {
            Vec2::new(drift, jump)
        };
        positions.push(current);
    }

    log::debug!(
        "Chained {} platforms for '{}': first {:?}, last {:?}",
        positions.len(),
        level.name,
        positions[0],
        current
    );

    PlatformPlacement { positions }
}

/// Scatter platforms around the first position with minimum-distance rejection
pub fn scatter<S: RangeSampler + ?Sized>(
    level: &LevelDescriptor,
    sampler: &mut S,
    range: Vec2,
    min_distance: f32,
    max_attempts: u32,
) -> PlatformPlacement {
    let count = level.platform_count.max(1);
    let anchor = level.first_platform_position;
    let mut positions = Vec::with_capacity(count);
    positions.push(anchor);

    let mut forced = 0u32;
    for _ in 1..count {
        let mut candidate = anchor;
        let mut accepted = false;
        for _ in 0..max_attempts.max(1) {
            candidate = anchor
                + Vec2::new(
                    sampler.sample_range(-range.x, range.x),
                    sampler.sample_range(-range.y, range.y),
                );
            if positions
                .iter()
                .all(|placed: &Vec2| placed.distance(candidate) >= min_distance)
            {
                accepted = true;
                break;
            }
        }
        if !accepted {
            forced += 1;
        }
        positions.push(candidate);
    }

    if forced > 0 {
        log::debug!(
            "Scatter for '{}' accepted {} crowded platforms after {} attempts",
            level.name,
            forced,
            max_attempts
        );
    }

    PlatformPlacement { positions }
}

/// Place platforms with the configured algorithm
pub fn place<S: RangeSampler + ?Sized>(
    level: &LevelDescriptor,
    mode: PlacementMode,
    sampler: &mut S,
) -> PlatformPlacement {
    match mode {
        PlacementMode::Chain => generate(level, sampler),
        PlacementMode::Scatter {
            range_x,
            range_y,
            min_distance,
            max_attempts,
        } => scatter(
            level,
            sampler,
            Vec2::new(range_x, range_y),
            min_distance,
            max_attempts,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Always returns the middle of the requested range
    struct Midpoint;

    impl RangeSampler for Midpoint {
        fn sample_range(&mut self, low: f32, high: f32) -> f32 {
            (low + high) / 2.0
        }
    }

    /// Always returns the low end of the requested range
    struct Lowest;

    impl RangeSampler for Lowest {
        fn sample_range(&mut self, low: f32, _high: f32) -> f32 {
            low
        }
    }

    fn flat_level() -> LevelDescriptor {
        LevelDescriptor {
            platform_count: 3,
            first_platform_position: Vec2::ZERO,
            min_jump_distance: 2.0,
            max_jump_distance: 4.0,
            max_height_variation: 0.0,
            horizontal_path: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_midpoint_chain() {
        let placement = generate(&flat_level(), &mut Midpoint);
        assert_eq!(
            placement.positions(),
            &[Vec2::new(0.0, 0.0), Vec2::new(3.0, 0.0), Vec2::new(6.0, 0.0)]
        );
        assert_eq!(placement.last_position(), Vec2::new(6.0, 0.0));
    }

    #[test]
    fn test_vertical_path_swaps_axes() {
        let level = LevelDescriptor {
            horizontal_path: false,
            max_height_variation: 1.0,
            first_platform_position: Vec2::new(1.0, -2.0),
            ..flat_level()
        };
        // Lowest: jump = 2, drift = -1
        let placement = generate(&level, &mut Lowest);
        assert_eq!(
            placement.positions(),
            &[Vec2::new(1.0, -2.0), Vec2::new(0.0, 0.0), Vec2::new(-1.0, 2.0)]
        );
    }

    #[test]
    fn test_single_platform() {
        let level = LevelDescriptor {
            platform_count: 1,
            first_platform_position: Vec2::new(4.0, 4.0),
            ..flat_level()
        };
        let placement = generate(&level, &mut Midpoint);
        assert_eq!(placement.len(), 1);
        assert_eq!(placement.first_position(), placement.last_position());
        assert_eq!(placement.steps().count(), 0);
    }

    #[test]
    fn test_seeded_chain_is_reproducible() {
        let level = LevelDescriptor {
            platform_count: 12,
            max_height_variation: 2.0,
            ..flat_level()
        };
        let a = generate(&level, &mut Pcg32::seed_from_u64(42));
        let b = generate(&level, &mut Pcg32::seed_from_u64(42));
        let c = generate(&level, &mut Pcg32::seed_from_u64(43));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_seeded_chain_respects_jump_range() {
        let level = LevelDescriptor {
            platform_count: 50,
            max_height_variation: 1.5,
            ..flat_level()
        };
        let placement = generate(&level, &mut Pcg32::seed_from_u64(7));
        for (prev, next) in placement.steps() {
            let (advance, across) = step_components(next - prev, true);
            assert!((2.0 - 1e-4..=4.0 + 1e-4).contains(&advance), "advance {advance}");
            assert!(across.abs() <= 1.5 + 1e-4, "drift {across}");
        }
    }

    #[test]
    fn test_equal_jump_bounds() {
        let level = LevelDescriptor {
            min_jump_distance: 3.0,
            max_jump_distance: 3.0,
            ..flat_level()
        };
        let placement = generate(&level, &mut Pcg32::seed_from_u64(1));
        assert_eq!(placement.last_position(), Vec2::new(6.0, 0.0));
    }

    #[test]
    fn test_scatter_keeps_spacing_when_possible() {
        let level = LevelDescriptor {
            platform_count: 6,
            ..flat_level()
        };
        let placement = scatter(
            &level,
            &mut Pcg32::seed_from_u64(9),
            Vec2::new(20.0, 20.0),
            1.0,
            64,
        );
        assert_eq!(placement.len(), 6);
        let points = placement.positions();
        for (i, a) in points.iter().enumerate() {
            for b in &points[i + 1..] {
                assert!(a.distance(*b) >= 1.0);
            }
        }
    }

    #[test]
    fn test_scatter_accepts_last_candidate_when_crowded() {
        let level = LevelDescriptor {
            platform_count: 3,
            ..flat_level()
        };
        // Zero range means every candidate sits on the anchor
        let placement = scatter(&level, &mut Midpoint, Vec2::ZERO, 1.0, 5);
        assert_eq!(placement.positions(), &[Vec2::ZERO; 3]);
    }

    #[test]
    fn test_place_dispatches_on_mode() {
        let level = flat_level();
        let chained = place(&level, PlacementMode::Chain, &mut Midpoint);
        assert_eq!(chained.last_position(), Vec2::new(6.0, 0.0));

        let mode = PlacementMode::Scatter {
            range_x: 0.0,
            range_y: 0.0,
            min_distance: 0.0,
            max_attempts: 1,
        };
        let scattered = place(&level, mode, &mut Midpoint);
        assert_eq!(scattered.last_position(), Vec2::ZERO);
    }
}
