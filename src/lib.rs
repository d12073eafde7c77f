//! Dino Dash - an endless side-scrolling runner
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (physics, spawning, collisions, session modes)
//! - `persistence`: Best records and resumable session snapshots
//! - `highscores`: Best score / best coins bookkeeping
//! - `platform`: Frame clock that feeds fixed ticks to the simulation
//! - `tuning`: Data-driven game balance

pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use highscores::BestRecords;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the clock will accept (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Visible field width; spawns are placed past the right edge
    pub const FIELD_WIDTH: f32 = 800.0;
    /// Ground reference line; sprites rest relative to `GROUND_Y + 30`
    pub const GROUND_Y: f32 = 250.0;

    /// Runner horizontal position (never changes)
    pub const RUNNER_X: f32 = 50.0;
}

/// Scroll speed for a given travelled distance.
///
/// `min(max_speed, base_speed + (distance / 100) * ramp)`
#[inline]
pub fn speed_for_distance(distance: f32, tuning: &Tuning) -> f32 {
    (tuning.base_speed() + (distance / 100.0) * tuning.speed_ramp).min(tuning.max_speed)
}

/// Score derived from distance (never stored)
#[inline]
pub fn score_for_distance(distance: f32, tuning: &Tuning) -> u32 {
    (distance * tuning.score_multiplier).floor() as u32
}
