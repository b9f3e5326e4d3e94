//! Deterministic level simulation
//!
//! Everything the controller needs that does not touch the host engine.
//! This module must stay pure and deterministic:
//! - Seeded RNG only (placement draws come from the caller's sampler)
//! - Time advances only through explicit `dt`
//! - No rendering, physics or platform dependencies

pub mod generator;
pub mod reveal;
pub mod schedule;
pub mod timer;
pub mod trigger;

pub use generator::{
    PlacementMode, PlatformPlacement, RangeSampler, generate, place, scatter, step_components,
};
pub use reveal::{RevealPhase, RevealTimeline};
pub use schedule::{CancelToken, ScheduledTask, Scheduler};
pub use timer::{LevelTimer, TimerReadout, format_clock};
pub use trigger::{DeathZone, EntityTag, FinishMarker, Trigger};
