//! Level clock
//!
//! Counts elapsed seconds for every level and, for timed levels, counts
//! down to the limit. Expiry is reported once per reset.

use serde::{Deserialize, Serialize};

/// Seconds left at which the countdown is shown as urgent
pub const URGENT_SECS: f32 = 10.0;

/// What the HUD shows for the clock
#[derive(Debug, Clone, PartialEq)]
pub struct TimerReadout {
    /// `mm:ss`: remaining time when limited, elapsed otherwise
    pub text: String,
    /// Countdown in its last seconds
    pub urgent: bool,
    /// Whether the level has a limit at all
    pub countdown: bool,
}

/// Elapsed/countdown timer for the active level
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LevelTimer {
    elapsed: f32,
    limit: Option<f32>,
    running: bool,
    expired: bool,
}

impl LevelTimer {
    /// Restart from zero with the given limit
    pub fn reset(&mut self, limit: Option<f32>) {
        self.elapsed = 0.0;
        self.limit = limit;
        self.running = true;
        self.expired = false;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advance the clock. Returns true on the frame the limit runs out.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.running {
            return false;
        }
        self.elapsed += dt;
        match self.limit {
            Some(limit) if !self.expired && self.elapsed >= limit => {
                self.expired = true;
                self.running = false;
                true
            }
            _ => false,
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn limit(&self) -> Option<f32> {
        self.limit
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_expired(&self) -> bool {
        self.expired
    }

    /// Seconds left, if the level is timed
    pub fn remaining(&self) -> Option<f32> {
        self.limit.map(|limit| (limit - self.elapsed).max(0.0))
    }

    pub fn readout(&self) -> TimerReadout {
        match self.remaining() {
            Some(remaining) => TimerReadout {
                text: format_clock(remaining),
                urgent: remaining <= URGENT_SECS,
                countdown: true,
            },
            None => TimerReadout {
                text: format_clock(self.elapsed),
                urgent: false,
                countdown: false,
            },
        }
    }
}

/// Format seconds as `mm:ss` (floored, negative clamps to zero)
pub fn format_clock(seconds: f32) -> String {
    let total = seconds.max(0.0).floor() as u32;
    format!("{:02}:{:02}", total / 60, total % 60)
}
