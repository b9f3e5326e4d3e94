//! MemoRise headless runner
//!
//! Plays the campaign without an engine: platforms, player, camera and HUD
//! are headless collaborators and a scripted autopilot produces the death
//! and finish signals. Useful for checking level data and save handling.

use glam::Vec2;

use memorise::controller::headless::{HeadlessHost, headless_scene};
use memorise::progress::Prefs;
use memorise::sim::EntityTag;
use memorise::{LevelController, Phase, VolumeChannel};

/// Frames simulated per second of game time
const FPS: f32 = 60.0;

/// Safety cap on simulated frames per level
const MAX_FRAMES_PER_LEVEL: u32 = 60 * 60 * 10;

/// Scripted behaviour for one run
#[derive(Debug, Clone)]
struct Autopilot {
    /// Falls to take on each level before finishing it
    deaths_per_level: u32,
    /// Seconds to stand still (watching the reveal) before moving
    study_secs: f32,
    /// Levels to complete before stopping
    completions: usize,
}

/// Drive the controller until `completions` levels have been finished
fn autoplay<P: Prefs>(controller: &mut LevelController<P>, host: &HeadlessHost, pilot: &Autopilot) {
    let dt = 1.0 / FPS;

    for _ in 0..pilot.completions {
        let level_index = controller.progress().level_index;
        let mut falls = 0;
        let mut studied = 0.0;
        let mut frames = 0;

        while controller.phase() == Phase::Active && frames < MAX_FRAMES_PER_LEVEL {
            frames += 1;
            studied += dt;
            controller.update(dt);
            if controller.phase() != Phase::Active || studied < pilot.study_secs {
                continue;
            }

            if falls < pilot.deaths_per_level {
                falls += 1;
                let death_y = controller
                    .current_level()
                    .map(|level| level.death_y)
                    .unwrap_or(-10.0);
                host.move_player(host.player_position() + Vec2::new(1.0, death_y - 5.0));
                studied = 0.0;
                continue;
            }

            let finish = controller
                .scene()
                .finish
                .as_ref()
                .map(|f| f.position)
                .unwrap_or_default();
            host.move_player(finish);
            controller.on_finish_contact(&EntityTag::Player);
        }

        if controller.phase() != Phase::Completing {
            log::warn!(
                "Autopilot gave up on level {} after {} frames",
                level_index + 1,
                frames
            );
            return;
        }

        while controller.phase() == Phase::Completing {
            controller.update(dt);
        }
    }
}

/// Log where the session ended up
fn report<P: Prefs>(controller: &LevelController<P>) {
    let progress = controller.progress();
    let name = controller
        .current_level()
        .map(|l| l.name.as_str())
        .unwrap_or("<none>");
    log::info!(
        "Session ended on level {} '{}' ({} deaths here, {} total)",
        progress.level_index + 1,
        name,
        progress.level_deaths,
        progress.total_deaths
    );
    log::info!(
        "Volumes: master {:.2}, effects {:.2}",
        controller.store().load_volume(VolumeChannel::Master),
        controller.store().load_volume(VolumeChannel::Effects)
    );
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;

    use memorise::platform::{DEFAULT_SAVE_PATH, init_logging};
    use memorise::progress::{FilePrefs, MemoryPrefs, Prefs, ProgressStore};
    use memorise::{LayoutPolicy, LevelCatalog, LevelController, SessionConfig, VolumeChannel};

    use super::{Autopilot, autoplay, headless_scene, report};

    #[derive(Debug, Parser)]
    #[command(name = "memorise", version)]
    #[command(about = "Headless playthrough of the MemoRise campaign")]
    struct Args {
        /// Level catalog JSON (built-in campaign when omitted)
        #[arg(long)]
        levels: Option<PathBuf>,

        /// Session config JSON
        #[arg(long)]
        config: Option<PathBuf>,

        /// Save file
        #[arg(long, default_value = DEFAULT_SAVE_PATH)]
        save: PathBuf,

        /// Keep progress in memory only
        #[arg(long)]
        no_save: bool,

        /// Wipe saved progress before starting
        #[arg(long)]
        reset: bool,

        /// Session seed (overrides config)
        #[arg(long)]
        seed: Option<u64>,

        /// Layout policy across restarts: `reroll` or `stable` (overrides config)
        #[arg(long)]
        layout: Option<LayoutPolicy>,

        /// Jump to this level (0-based) after loading the save
        #[arg(long)]
        level: Option<usize>,

        /// Scripted falls per level
        #[arg(long, default_value_t = 1)]
        deaths_per_level: u32,

        /// Seconds spent watching the platforms before moving
        #[arg(long, default_value_t = 1.0)]
        study_secs: f32,

        /// Levels to complete (defaults to the whole catalog)
        #[arg(long)]
        completions: Option<usize>,

        /// Store a master volume setting
        #[arg(long)]
        master_volume: Option<f32>,

        /// Log filter when RUST_LOG is unset
        #[arg(long, default_value = "info")]
        log: String,
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let args = Args::parse();
        init_logging(&args.log);

        let catalog = match &args.levels {
            Some(path) => LevelCatalog::load(path)?,
            None => LevelCatalog::builtin(),
        };

        let mut config = match &args.config {
            Some(path) => SessionConfig::load(path)?,
            None => SessionConfig::default(),
        };
        if let Some(seed) = args.seed {
            config.seed = Some(seed);
        }
        if let Some(layout) = args.layout {
            config.layout_policy = layout;
        }

        let prefs: Box<dyn Prefs> = if args.no_save {
            Box::new(MemoryPrefs::new())
        } else {
            Box::new(FilePrefs::open(&args.save)?)
        };
        let mut store = ProgressStore::new(prefs);
        if args.reset {
            store.reset_level_progress()?;
            store.reset_death_counts()?;
        }
        if let Some(volume) = args.master_volume {
            store.save_volume(VolumeChannel::Master, volume)?;
        }

        let completions = args.completions.unwrap_or(catalog.len());
        let (scene, host) = headless_scene();
        let mut controller = LevelController::new(catalog, scene, store, config);
        controller.start_session()?;
        if let Some(index) = args.level {
            controller.load_specific_level(index)?;
        }

        let pilot = Autopilot {
            deaths_per_level: args.deaths_per_level,
            study_secs: args.study_secs.max(0.0),
            completions,
        };
        autoplay(&mut controller, &host, &pilot);
        report(&controller);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(e) = native::run() {
        eprintln!("memorise: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    use memorise::progress::ProgressStore;
    use memorise::{LevelCatalog, SessionConfig};

    memorise::platform::init_logging("info");

    let prefs: Box<dyn Prefs> = match memorise::platform::open_prefs() {
        Ok(prefs) => prefs,
        Err(e) => {
            log::warn!("{e}, progress will not be saved");
            Box::new(memorise::MemoryPrefs::new())
        }
    };
    let catalog = LevelCatalog::builtin();
    let pilot = Autopilot {
        deaths_per_level: 1,
        study_secs: 1.0,
        completions: catalog.len(),
    };

    let (scene, host) = headless_scene();
    let mut controller =
        LevelController::new(catalog, scene, ProgressStore::new(prefs), SessionConfig::default());
    if let Err(e) = controller.start_session() {
        log::error!("{e}");
        return;
    }
    autoplay(&mut controller, &host, &pilot);
    report(&controller);
}
