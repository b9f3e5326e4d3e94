//! Host collaborators
//!
//! The controller never looks entities up by tag. The host hands it explicit
//! references once, at scene composition; any slot left empty just disables
//! that feature (with a warning on every load).

use std::fmt;

use glam::Vec2;

use crate::level::CameraBounds;
use crate::sim::{DeathZone, FinishMarker, TimerReadout};

/// Spawns platform instances from the level's platform template
pub trait PlatformSpawner {
    /// Instantiate platform `index` at `position`. The instance runs its own
    /// reveal/fade from here on.
    fn spawn_platform(&mut self, index: usize, position: Vec2, reveal_duration: f32);

    /// Destroy every platform spawned so far
    fn clear_platforms(&mut self);

    /// Per-frame tick while the level is active (drives the reveal fade)
    fn tick(&mut self, _dt: f32) {}

    /// Create a player when the scene has none
    fn spawn_player(&mut self, _position: Vec2) -> Option<Box<dyn PlayerBody>> {
        None
    }
}

/// The player's transform
pub trait PlayerBody {
    fn position(&self) -> Vec2;
    fn set_position(&mut self, position: Vec2);
}

/// Camera follow bounds
pub trait CameraRig {
    fn configure_bounds(&mut self, bounds: &CameraBounds);
}

/// In-game HUD
pub trait Hud {
    /// New level (or restart): level name, deaths, timer mode
    fn refresh(&mut self, snapshot: &HudSnapshot);
    fn show_completion_panel(&mut self, summary: &CompletionSummary);
    /// Per-frame clock update
    fn update_timer(&mut self, _readout: &TimerReadout) {}
}

/// What the HUD pulls on refresh
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub level_name: String,
    /// 1-based for display
    pub level_number: usize,
    pub level_count: usize,
    pub level_deaths: u32,
    pub total_deaths: u32,
    pub time_limit: Option<f32>,
}

/// Level-complete panel contents
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionSummary {
    pub level_name: String,
    pub elapsed: f32,
    /// `mm:ss`
    pub time_text: String,
    pub deaths: u32,
}

/// Collaborator slots, for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collaborator {
    PlatformTemplate,
    Player,
    FinishMarker,
    DeathZone,
    Camera,
    Hud,
}

impl fmt::Display for Collaborator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Collaborator::PlatformTemplate => "platform template",
            Collaborator::Player => "player",
            Collaborator::FinishMarker => "finish marker",
            Collaborator::DeathZone => "death zone",
            Collaborator::Camera => "camera",
            Collaborator::Hud => "HUD",
        };
        f.write_str(name)
    }
}

/// Everything the controller drives, composed once by the host
#[derive(Default)]
pub struct Scene {
    pub platforms: Option<Box<dyn PlatformSpawner>>,
    pub player: Option<Box<dyn PlayerBody>>,
    pub finish: Option<FinishMarker>,
    pub death_zone: Option<DeathZone>,
    pub camera: Option<Box<dyn CameraRig>>,
    pub hud: Option<Box<dyn Hud>>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_platforms(mut self, spawner: impl PlatformSpawner + 'static) -> Self {
        self.platforms = Some(Box::new(spawner));
        self
    }

    pub fn with_player(mut self, player: impl PlayerBody + 'static) -> Self {
        self.player = Some(Box::new(player));
        self
    }

    pub fn with_finish(mut self, finish: FinishMarker) -> Self {
        self.finish = Some(finish);
        self
    }

    pub fn with_death_zone(mut self, zone: DeathZone) -> Self {
        self.death_zone = Some(zone);
        self
    }

    pub fn with_camera(mut self, camera: impl CameraRig + 'static) -> Self {
        self.camera = Some(Box::new(camera));
        self
    }

    pub fn with_hud(mut self, hud: impl Hud + 'static) -> Self {
        self.hud = Some(Box::new(hud));
        self
    }

    /// Empty slots
    pub fn missing(&self) -> Vec<Collaborator> {
        let mut missing = Vec::new();
        if self.platforms.is_none() {
            missing.push(Collaborator::PlatformTemplate);
        }
        if self.player.is_none() {
            missing.push(Collaborator::Player);
        }
        if self.finish.is_none() {
            missing.push(Collaborator::FinishMarker);
        }
        if self.death_zone.is_none() {
            missing.push(Collaborator::DeathZone);
        }
        if self.camera.is_none() {
            missing.push(Collaborator::Camera);
        }
        if self.hud.is_none() {
            missing.push(Collaborator::Hud);
        }
        missing
    }
}

impl fmt::Debug for Scene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scene")
            .field("platforms", &self.platforms.is_some())
            .field("player", &self.player.as_ref().map(|p| p.position()))
            .field("finish", &self.finish)
            .field("death_zone", &self.death_zone)
            .field("camera", &self.camera.is_some())
            .field("hud", &self.hud.is_some())
            .finish()
    }
}
