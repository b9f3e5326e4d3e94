//! Level progression controller
//!
//! Phases:
//! - `Idle`: constructed, session not started
//! - `Loading`: generating and placing the current level
//! - `Active`: waiting for a death or completion signal
//! - `Completing`: completion panel shown, next level scheduled
//! - `Failed`: the last load could not run (configuration missing)
//!
//! Finishing the last level resets progress and loops back to level 0.
//! Signals arriving outside `Active` are ignored, so duplicates from
//! collaborators are harmless.

pub mod headless;
pub mod scene;

pub use scene::{
    CameraRig, Collaborator, CompletionSummary, Hud, HudSnapshot, PlatformSpawner, PlayerBody,
    Scene,
};

use rand::SeedableRng;
use rand_pcg::Pcg32;
use thiserror::Error;

use crate::config::{LayoutPolicy, SessionConfig};
use crate::consts::LEVEL_SEED_MIX;
use crate::level::{DescriptorError, LevelCatalog, LevelDescriptor};
use crate::progress::{ProgressState, ProgressStore, Prefs};
use crate::sim::{
    CancelToken, EntityTag, LevelTimer, PlatformPlacement, Scheduler, format_clock, place,
};

/// Controller phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Active,
    Completing,
    Failed,
}

/// Level load failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelError {
    #[error("configuration missing: {0}")]
    ConfigurationMissing(&'static str),
    #[error("level index {index} is out of range (0..{count})")]
    InvalidIndex { index: usize, count: usize },
    #[error("level {index} ('{name}') is invalid: {source}")]
    InvalidDescriptor {
        index: usize,
        name: String,
        #[source]
        source: DescriptorError,
    },
}

/// Work deferred to a later frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    LoadNextLevel,
}

/// Seed for a level's layout under `LayoutPolicy::StablePerLevel`
pub fn level_seed(session_seed: u64, level_index: usize) -> u64 {
    (level_index as u64)
        .wrapping_mul(LEVEL_SEED_MIX)
        .wrapping_add(session_seed)
}

/// Drives level generation, progression and persistence
pub struct LevelController<P: Prefs> {
    catalog: LevelCatalog,
    scene: Scene,
    store: ProgressStore<P>,
    config: SessionConfig,
    seed: u64,
    rng: Pcg32,
    progress: ProgressState,
    phase: Phase,
    placement: Option<PlatformPlacement>,
    timer: LevelTimer,
    scheduler: Scheduler<Deferred>,
    /// Parent of every scheduled task's token
    lifetime: CancelToken,
}

impl<P: Prefs> LevelController<P> {
    pub fn new(
        catalog: LevelCatalog,
        scene: Scene,
        store: ProgressStore<P>,
        config: SessionConfig,
    ) -> Self {
        let seed = config.resolve_seed();
        log::info!(
            "Level controller ready: {} levels, seed {}, layout {}",
            catalog.len(),
            seed,
            config.layout_policy.as_str()
        );
        Self {
            catalog,
            scene,
            store,
            config,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            progress: ProgressState::default(),
            phase: Phase::Idle,
            placement: None,
            timer: LevelTimer::default(),
            scheduler: Scheduler::new(),
            lifetime: CancelToken::new(),
        }
    }

    /// Load saved progress (or defaults) and enter the saved level
    pub fn start_session(&mut self) -> Result<(), LevelError> {
        self.check_configuration()?;
        self.scheduler.cancel_all();

        let missing = self.scene.missing();
        if !missing.is_empty() {
            let names: Vec<String> = missing.iter().map(ToString::to_string).collect();
            log::warn!("Scene is missing: {}", names.join(", "));
        }

        self.progress = if self.store.has_save_data() {
            let saved = self.store.load_state();
            log::info!(
                "Resuming at level {} ({} deaths, {} total)",
                saved.level_index + 1,
                saved.level_deaths,
                saved.total_deaths
            );
            saved
        } else {
            log::info!("No save data, starting a new game");
            ProgressState::default()
        };

        if self.progress.level_index >= self.catalog.len() {
            log::warn!(
                "Saved level index {} is past the last level ({}), starting over",
                self.progress.level_index,
                self.catalog.len()
            );
            self.progress.level_index = 0;
            self.persist(|store, _| store.save_level_index(0));
        }

        self.load_current_level()
    }

    /// Per-frame tick: deferred work, the level clock and the death line
    pub fn update(&mut self, dt: f32) {
        let due = self.scheduler.advance(dt);
        if !due.is_empty() {
            // The frame that loads a level does not also tick it
            for action in due {
                match action {
                    Deferred::LoadNextLevel => {
                        if let Err(e) = self.load_next_level() {
                            log::error!("Failed to load the next level: {e}");
                        }
                    }
                }
            }
            return;
        }

        if self.phase != Phase::Active {
            return;
        }

        if let Some(platforms) = self.scene.platforms.as_mut() {
            platforms.tick(dt);
        }
        if self.timer.tick(dt) && self.config.time_limit_kills {
            log::info!("Time is up on '{}'", self.current_level_name());
            self.restart_current_level();
            return;
        }
        if let Some(hud) = self.scene.hud.as_mut() {
            hud.update_timer(&self.timer.readout());
        }

        let fell = match (self.scene.player.as_ref(), self.scene.death_zone.as_mut()) {
            (Some(player), Some(zone)) => zone.check(player.position().y),
            _ => false,
        };
        if fell {
            self.on_player_death();
        }
    }

    /// Death signal: count it and reload the same level
    pub fn on_player_death(&mut self) {
        if self.phase != Phase::Active {
            log::debug!("Ignoring death signal while {:?}", self.phase);
            return;
        }
        self.restart_current_level();
    }

    /// Something touched the finish marker
    pub fn on_finish_contact(&mut self, toucher: &EntityTag) {
        let Some(finish) = self.scene.finish.as_mut() else {
            log::warn!("{} not found, contact ignored", Collaborator::FinishMarker);
            return;
        };
        if finish.touch(toucher) {
            self.on_level_complete();
        }
    }

    /// Completion signal: show the panel and schedule the next level
    pub fn on_level_complete(&mut self) {
        if self.phase != Phase::Active {
            log::debug!("Ignoring completion signal while {:?}", self.phase);
            return;
        }

        self.phase = Phase::Completing;
        self.timer.stop();

        let summary = CompletionSummary {
            level_name: self.current_level_name().to_string(),
            elapsed: self.timer.elapsed(),
            time_text: format_clock(self.timer.elapsed()),
            deaths: self.progress.level_deaths,
        };
        log::info!(
            "Level {} '{}' complete in {} with {} deaths",
            self.progress.level_index + 1,
            summary.level_name,
            summary.time_text,
            summary.deaths
        );
        match self.scene.hud.as_mut() {
            Some(hud) => hud.show_completion_panel(&summary),
            None => log::warn!("{} not found, no completion panel", Collaborator::Hud),
        }

        self.scheduler.schedule(
            Deferred::LoadNextLevel,
            self.config.completion_delay,
            self.lifetime.child(),
        );
    }

    /// Advance to the next level, looping to level 0 after the last one
    pub fn load_next_level(&mut self) -> Result<(), LevelError> {
        self.check_configuration()?;
        self.scheduler.cancel_all();

        self.progress.level_deaths = 0;
        self.persist(|store, _| store.save_level_deaths(0));

        let next = self.progress.level_index + 1;
        if next >= self.catalog.len() {
            log::info!("All {} levels complete, starting over", self.catalog.len());
            self.progress = ProgressState::default();
            self.persist(|store, _| {
                store.reset_level_progress()?;
                store.reset_death_counts()
            });
        } else {
            self.progress.level_index = next;
            self.persist(|store, progress| store.save_level_index(progress.level_index));
        }

        self.load_current_level()
    }

    /// Jump straight to `index` (menus, debugging). Death counters are kept.
    pub fn load_specific_level(&mut self, index: usize) -> Result<(), LevelError> {
        if index >= self.catalog.len() {
            let err = LevelError::InvalidIndex {
                index,
                count: self.catalog.len(),
            };
            log::error!("{err}");
            return Err(err);
        }
        self.check_configuration()?;
        self.scheduler.cancel_all();

        self.progress.level_index = index;
        self.persist(|store, progress| store.save_level_index(progress.level_index));
        self.load_current_level()
    }

    /// New game: clear saved progress and reload level 0
    pub fn reset_progress(&mut self) -> Result<(), LevelError> {
        self.check_configuration()?;
        self.scheduler.cancel_all();

        self.progress = ProgressState::default();
        self.persist(|store, _| {
            store.reset_level_progress()?;
            store.reset_death_counts()
        });
        self.load_current_level()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn progress(&self) -> &ProgressState {
        &self.progress
    }

    pub fn current_level(&self) -> Option<&LevelDescriptor> {
        self.catalog.get(self.progress.level_index)
    }

    /// Layout of the level currently loaded
    pub fn placement(&self) -> Option<&PlatformPlacement> {
        self.placement.as_ref()
    }

    pub fn timer(&self) -> &LevelTimer {
        &self.timer
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn store(&self) -> &ProgressStore<P> {
        &self.store
    }

    /// Volume settings live in the same store
    pub fn store_mut(&mut self) -> &mut ProgressStore<P> {
        &mut self.store
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Whether a delayed level advance is queued
    pub fn has_pending_advance(&self) -> bool {
        !self.scheduler.is_idle()
    }

    fn current_level_name(&self) -> &str {
        self.current_level().map(|l| l.name.as_str()).unwrap_or("<none>")
    }

    fn check_configuration(&mut self) -> Result<(), LevelError> {
        let missing = if self.catalog.is_empty() {
            Some("level catalog is empty")
        } else if self.scene.platforms.is_none() {
            Some("platform template is not set")
        } else {
            None
        };
        match missing {
            Some(what) => {
                log::error!("Cannot load a level: {what}");
                self.phase = Phase::Failed;
                Err(LevelError::ConfigurationMissing(what))
            }
            None => Ok(()),
        }
    }

    /// Count a death, persist it, reload the same level
    fn restart_current_level(&mut self) {
        // Saved counters may already sit at the ceiling
        self.progress.level_deaths = self.progress.level_deaths.saturating_add(1);
        self.progress.total_deaths = self.progress.total_deaths.saturating_add(1);
        self.persist(|store, progress| {
            store.save_level_deaths(progress.level_deaths)?;
            store.save_total_deaths(progress.total_deaths)
        });
        log::info!(
            "Restarting '{}' (deaths {}, total {})",
            self.current_level_name(),
            self.progress.level_deaths,
            self.progress.total_deaths
        );

        if let Err(e) = self.load_current_level() {
            log::error!("Failed to restart level: {e}");
        }
    }

    /// Run a store write; persistence failures are logged, never fatal
    fn persist<F>(&mut self, write: F)
    where
        F: FnOnce(&mut ProgressStore<P>, &ProgressState) -> Result<(), crate::progress::PersistError>,
    {
        if let Err(e) = write(&mut self.store, &self.progress) {
            log::error!("Failed to save progress: {e}");
        }
    }

    /// Generate and place the level at `progress.level_index`
    fn load_current_level(&mut self) -> Result<(), LevelError> {
        self.check_configuration()?;
        let index = self.progress.level_index;
        let level = self
            .catalog
            .get(index)
            .cloned()
            .ok_or(LevelError::InvalidIndex {
                index,
                count: self.catalog.len(),
            })?;
        if let Err(source) = level.validate() {
            let err = LevelError::InvalidDescriptor {
                index,
                name: level.name.clone(),
                source,
            };
            log::error!("{err}");
            self.phase = Phase::Failed;
            return Err(err);
        }

        self.phase = Phase::Loading;
        log::info!("Loading level {} '{}'", index + 1, level.name);

        let placement = match self.config.layout_policy {
            LayoutPolicy::Reroll => place(&level, self.config.placement, &mut self.rng),
            LayoutPolicy::StablePerLevel => {
                let mut rng = Pcg32::seed_from_u64(level_seed(self.seed, index));
                place(&level, self.config.placement, &mut rng)
            }
        };
        let first = placement.first_position();
        let last = placement.last_position();

        let Some(spawner) = self.scene.platforms.as_mut() else {
            return Err(LevelError::ConfigurationMissing("platform template is not set"));
        };
        spawner.clear_platforms();
        for (i, &position) in placement.positions().iter().enumerate() {
            spawner.spawn_platform(i, position, level.reveal_duration);
        }

        match self.scene.finish.as_mut() {
            Some(finish) => {
                finish.position = last + level.finish_offset_from_last_platform;
                finish.reset();
            }
            None => log::warn!("{} not found, level cannot be completed", Collaborator::FinishMarker),
        }

        let spawn = first + self.config.player_spawn_offset;
        if self.scene.player.is_none() {
            self.scene.player = spawner.spawn_player(spawn);
        }
        match self.scene.player.as_mut() {
            Some(player) => player.set_position(spawn),
            None => log::warn!("{} not found, skipping spawn", Collaborator::Player),
        }

        match self.scene.camera.as_mut() {
            Some(camera) => camera.configure_bounds(&level.camera_bounds),
            None => log::warn!("{} not found, bounds not applied", Collaborator::Camera),
        }

        match self.scene.death_zone.as_mut() {
            Some(zone) => {
                zone.death_y = level.death_y;
                zone.reset();
            }
            None => log::warn!("{} not found, falls will not kill", Collaborator::DeathZone),
        }

        self.timer.reset(level.countdown());

        let snapshot = HudSnapshot {
            level_name: level.name.clone(),
            level_number: index + 1,
            level_count: self.catalog.len(),
            level_deaths: self.progress.level_deaths,
            total_deaths: self.progress.total_deaths,
            time_limit: level.countdown(),
        };
        match self.scene.hud.as_mut() {
            Some(hud) => hud.refresh(&snapshot),
            None => log::warn!("{} not found, nothing to refresh", Collaborator::Hud),
        }

        log::debug!(
            "Level '{}' placed: {} platforms, finish at {:?}",
            level.name,
            placement.len(),
            last + level.finish_offset_from_last_platform
        );
        self.placement = Some(placement);
        self.phase = Phase::Active;
        Ok(())
    }
}

impl<P: Prefs> Drop for LevelController<P> {
    fn drop(&mut self) {
        self.lifetime.cancel();
    }
}
