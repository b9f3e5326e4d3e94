//! Headless host
//!
//! Collaborators that record what the controller asks of them instead of
//! touching an engine. Used by the CLI runner and by tests; the host keeps a
//! `HeadlessHost` handle to read the log and move the player.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glam::Vec2;

use super::scene::{
    CameraRig, CompletionSummary, Hud, HudSnapshot, PlatformSpawner, PlayerBody, Scene,
};
use crate::level::CameraBounds;
use crate::sim::{DeathZone, FinishMarker, RevealTimeline, TimerReadout};

/// A platform the host was asked to spawn
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnedPlatform {
    pub index: usize,
    pub position: Vec2,
    pub reveal: RevealTimeline,
}

/// Everything the controller has told the host
#[derive(Debug, Clone, Default)]
pub struct HostLog {
    /// Platforms alive right now
    pub platforms: Vec<SpawnedPlatform>,
    pub clears: usize,
    pub camera_bounds: Option<CameraBounds>,
    pub hud_refreshes: Vec<HudSnapshot>,
    pub completion_panels: Vec<CompletionSummary>,
    pub last_timer: Option<TimerReadout>,
}

pub type SharedHostLog = Rc<RefCell<HostLog>>;

/// Records spawns and clears
pub struct HeadlessPlatforms {
    log: SharedHostLog,
    player: Option<Rc<Cell<Vec2>>>,
}

impl PlatformSpawner for HeadlessPlatforms {
    fn spawn_platform(&mut self, index: usize, position: Vec2, reveal_duration: f32) {
        let mut log = self.log.borrow_mut();
        log.platforms.push(SpawnedPlatform {
            index,
            position,
            reveal: RevealTimeline::new(reveal_duration),
        });
    }

    fn clear_platforms(&mut self) {
        let mut log = self.log.borrow_mut();
        log.platforms.clear();
        log.clears += 1;
    }

    fn tick(&mut self, dt: f32) {
        for platform in &mut self.log.borrow_mut().platforms {
            platform.reveal.tick(dt);
        }
    }

    fn spawn_player(&mut self, position: Vec2) -> Option<Box<dyn PlayerBody>> {
        let cell = self.player.clone()?;
        cell.set(position);
        Some(Box::new(HeadlessPlayer { position: cell }))
    }
}

/// Player whose position is shared with the host handle
pub struct HeadlessPlayer {
    position: Rc<Cell<Vec2>>,
}

impl PlayerBody for HeadlessPlayer {
    fn position(&self) -> Vec2 {
        self.position.get()
    }

    fn set_position(&mut self, position: Vec2) {
        self.position.set(position);
    }
}

pub struct HeadlessCamera {
    log: SharedHostLog,
}

impl CameraRig for HeadlessCamera {
    fn configure_bounds(&mut self, bounds: &CameraBounds) {
        self.log.borrow_mut().camera_bounds = Some(*bounds);
    }
}

pub struct HeadlessHud {
    log: SharedHostLog,
}

impl Hud for HeadlessHud {
    fn refresh(&mut self, snapshot: &HudSnapshot) {
        log::debug!(
            "HUD: {} ({}/{}) deaths {}",
            snapshot.level_name,
            snapshot.level_number,
            snapshot.level_count,
            snapshot.level_deaths
        );
        self.log.borrow_mut().hud_refreshes.push(snapshot.clone());
    }

    fn show_completion_panel(&mut self, summary: &CompletionSummary) {
        log::info!(
            "{} complete! time {} deaths {}",
            summary.level_name,
            summary.time_text,
            summary.deaths
        );
        self.log.borrow_mut().completion_panels.push(summary.clone());
    }

    fn update_timer(&mut self, readout: &TimerReadout) {
        self.log.borrow_mut().last_timer = Some(readout.clone());
    }
}

/// Host-side handle onto a headless scene
#[derive(Clone)]
pub struct HeadlessHost {
    pub log: SharedHostLog,
    player: Rc<Cell<Vec2>>,
}

impl HeadlessHost {
    pub fn player_position(&self) -> Vec2 {
        self.player.get()
    }

    /// Move the player as physics would
    pub fn move_player(&self, position: Vec2) {
        self.player.set(position);
    }

    pub fn platform_positions(&self) -> Vec<Vec2> {
        self.log.borrow().platforms.iter().map(|p| p.position).collect()
    }

    /// Platforms the player can still see (alpha above zero)
    pub fn visible_platforms(&self) -> usize {
        self.log
            .borrow()
            .platforms
            .iter()
            .filter(|p| p.reveal.alpha() > 0.0)
            .count()
    }
}

/// A fully populated scene plus the handle to observe it
pub fn headless_scene() -> (Scene, HeadlessHost) {
    let (scene, host) = headless_scene_without_player();
    let player = HeadlessPlayer {
        position: Rc::clone(&host.player),
    };
    (scene.with_player(player), host)
}

/// Like `headless_scene`, but the player is spawned by the platform spawner
/// on first load
pub fn headless_scene_without_player() -> (Scene, HeadlessHost) {
    let log = SharedHostLog::default();
    let player = Rc::new(Cell::new(Vec2::ZERO));

    let scene = Scene::new()
        .with_platforms(HeadlessPlatforms {
            log: Rc::clone(&log),
            player: Some(Rc::clone(&player)),
        })
        .with_finish(FinishMarker::default())
        .with_death_zone(DeathZone::default())
        .with_camera(HeadlessCamera {
            log: Rc::clone(&log),
        })
        .with_hud(HeadlessHud {
            log: Rc::clone(&log),
        });

    (scene, HeadlessHost { log, player })
}
