//! One-shot triggers for the finish marker and the death zone
//!
//! Both entities fire at most once per level instance. The controller
//! re-arms them when it (re)loads a level; `reset()` is the only way back
//! from `Triggered` to `Armed`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Two-state one-shot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Trigger {
    #[default]
    Armed,
    Triggered,
}

impl Trigger {
    /// Fire the trigger. Returns true only on the Armed -> Triggered edge.
    pub fn fire(&mut self) -> bool {
        match self {
            Trigger::Armed => {
                *self = Trigger::Triggered;
                true
            }
            Trigger::Triggered => false,
        }
    }

    pub fn reset(&mut self) {
        *self = Trigger::Armed;
    }

    pub fn is_armed(&self) -> bool {
        *self == Trigger::Armed
    }
}

/// Tag carried by whatever touched a trigger volume
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityTag {
    Player,
    Other(String),
}

/// The level exit
#[derive(Debug, Clone, Default)]
pub struct FinishMarker {
    pub position: Vec2,
    trigger: Trigger,
}

impl FinishMarker {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            trigger: Trigger::Armed,
        }
    }

    /// Something entered the marker. Completes the level only for the
    /// player and only once per reset.
    pub fn touch(&mut self, toucher: &EntityTag) -> bool {
        match toucher {
            EntityTag::Player => self.trigger.fire(),
            EntityTag::Other(tag) => {
                log::debug!("Finish marker ignored contact from '{tag}'");
                false
            }
        }
    }

    pub fn reset(&mut self) {
        self.trigger.reset();
    }

    pub fn is_completed(&self) -> bool {
        !self.trigger.is_armed()
    }

    pub fn trigger(&self) -> Trigger {
        self.trigger
    }
}

/// Horizontal kill line below the level
#[derive(Debug, Clone)]
pub struct DeathZone {
    pub death_y: f32,
    trigger: Trigger,
}

impl Default for DeathZone {
    fn default() -> Self {
        Self::new(-10.0)
    }
}

impl DeathZone {
    pub fn new(death_y: f32) -> Self {
        Self {
            death_y,
            trigger: Trigger::Armed,
        }
    }

    /// Per-frame check of the player's Y. Fires once when the player is
    /// strictly below the threshold.
    pub fn check(&mut self, player_y: f32) -> bool {
        if player_y < self.death_y && self.trigger.fire() {
            log::info!("Player fell into the death zone (y {player_y:.2} < {:.2})", self.death_y);
            return true;
        }
        false
    }

    pub fn reset(&mut self) {
        self.trigger.reset();
    }

    pub fn has_triggered(&self) -> bool {
        !self.trigger.is_armed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trigger_fires_once() {
        let mut trigger = Trigger::default();
        assert!(trigger.fire());
        assert!(!trigger.fire());
        trigger.reset();
        assert!(trigger.is_armed());
        assert!(trigger.fire());
    }

    #[test]
    fn test_finish_only_completes_for_player() {
        let mut finish = FinishMarker::new(Vec2::new(3.0, 1.0));
        assert!(!finish.touch(&EntityTag::Other("Crate".into())));
        assert!(!finish.is_completed());

        assert!(finish.touch(&EntityTag::Player));
        assert!(finish.is_completed());
        // Duplicate contact while still overlapping
        assert!(!finish.touch(&EntityTag::Player));

        finish.reset();
        assert!(finish.touch(&EntityTag::Player));
    }

    #[test]
    fn test_death_zone_threshold() {
        let mut zone = DeathZone::new(-5.0);
        assert!(!zone.check(0.0));
        assert!(!zone.check(-5.0));
        assert!(zone.check(-5.1));
        assert!(!zone.check(-20.0));
        assert!(zone.has_triggered());

        zone.reset();
        assert!(!zone.has_triggered());
        assert!(zone.check(-6.0));
    }
}
