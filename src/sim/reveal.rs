//! Platform visibility curve
//!
//! A freshly spawned platform is fully visible for its reveal duration,
//! fades out linearly, then stays hidden. Hosts drive one timeline per
//! platform instance and read `alpha()` each frame.

use serde::{Deserialize, Serialize};

/// Default fade-out length in seconds
pub const DEFAULT_FADE_SECS: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealPhase {
    Visible,
    Fading,
    Hidden,
}

/// Show -> fade -> hide timeline for one platform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealTimeline {
    pub reveal_duration: f32,
    pub fade_duration: f32,
    /// Keep the platform solid after it disappears
    pub solid_when_hidden: bool,
    elapsed: f32,
}

impl RevealTimeline {
    pub fn new(reveal_duration: f32) -> Self {
        Self {
            reveal_duration: reveal_duration.max(0.0),
            fade_duration: DEFAULT_FADE_SECS,
            solid_when_hidden: true,
            elapsed: 0.0,
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    /// Restart the timeline with a new visible window
    pub fn show_again(&mut self, reveal_duration: f32) {
        self.reveal_duration = reveal_duration.max(0.0);
        self.elapsed = 0.0;
    }

    pub fn phase(&self) -> RevealPhase {
        if self.elapsed < self.reveal_duration {
            RevealPhase::Visible
        } else if self.elapsed < self.reveal_duration + self.fade_duration {
            RevealPhase::Fading
        } else {
            RevealPhase::Hidden
        }
    }

    /// Sprite opacity in [0, 1]
    pub fn alpha(&self) -> f32 {
        match self.phase() {
            RevealPhase::Visible => 1.0,
            RevealPhase::Fading => {
                let t = (self.elapsed - self.reveal_duration) / self.fade_duration;
                (1.0 - t).clamp(0.0, 1.0)
            }
            RevealPhase::Hidden => 0.0,
        }
    }

    /// Whether the platform still collides
    pub fn is_solid(&self) -> bool {
        self.solid_when_hidden || self.phase() != RevealPhase::Hidden
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_then_fade_then_hidden() {
        let mut reveal = RevealTimeline::new(5.0);
        assert_eq!(reveal.phase(), RevealPhase::Visible);
        assert_eq!(reveal.alpha(), 1.0);

        reveal.tick(5.2);
        assert_eq!(reveal.phase(), RevealPhase::Fading);
        assert!((reveal.alpha() - 0.5).abs() < 1e-4);

        reveal.tick(0.3);
        assert_eq!(reveal.phase(), RevealPhase::Hidden);
        assert_eq!(reveal.alpha(), 0.0);
        assert!(reveal.is_solid());
    }

    #[test]
    fn test_hidden_platform_can_drop_collision() {
        let mut reveal = RevealTimeline::new(0.0);
        reveal.solid_when_hidden = false;
        assert!(reveal.is_solid());
        reveal.tick(1.0);
        assert!(!reveal.is_solid());
    }

    #[test]
    fn test_show_again_restarts() {
        let mut reveal = RevealTimeline::new(1.0);
        reveal.tick(3.0);
        assert_eq!(reveal.phase(), RevealPhase::Hidden);
        reveal.show_again(2.0);
        assert_eq!(reveal.alpha(), 1.0);
        reveal.tick(1.9);
        assert_eq!(reveal.phase(), RevealPhase::Visible);
    }
}
