//! Data-driven game balance
//!
//! Every gameplay constant lives here with its default. A JSON file can
//! override any subset of fields; missing fields keep their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Gameplay tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Runner physics (per tick) ===
    /// Added to vertical velocity every airborne tick
    pub gravity: f32,
    /// Vertical velocity set by a jump (negative is up)
    pub jump_force: f32,
    /// Downward velocity added per tick while fast-falling
    pub fast_fall_step: f32,
    /// Seconds between run-cycle pose swaps
    pub run_frame_secs: f32,
    /// Seconds between wing pose swaps
    pub wing_frame_secs: f32,

    // === Scrolling and score ===
    pub start_speed: f32,
    pub speed_multiplier: f32,
    /// Speed gained per 100 units of distance
    pub speed_ramp: f32,
    pub max_speed: f32,
    pub score_multiplier: f32,

    // === Countdown ===
    pub countdown_from: u32,
    pub countdown_step_secs: f32,

    // === Ground hazards ===
    pub ground_spawn_min_secs: f32,
    pub ground_spawn_max_secs: f32,
    /// Spawn distance beyond the right edge
    pub ground_spawn_offset: f32,
    pub ground_retire_x: f32,

    // === Collectibles ===
    pub coin_spawn_min_secs: f32,
    pub coin_spawn_max_secs: f32,
    pub coin_spawn_chance: f64,
    pub coin_offset_min: f32,
    pub coin_offset_max: f32,
    pub coin_y: f32,
    /// Minimum gap to any hazard at spawn time
    pub coin_clearance: f32,
    pub coin_retire_x: f32,

    // === Flying hazards ===
    /// Distance travelled before flying hazards start spawning
    pub flying_min_distance: f32,
    pub flying_interval_secs: f32,
    /// Timer value after a rejected spawn (quick retry)
    pub flying_retry_secs: f32,
    pub flying_spawn_offset: f32,
    pub flying_y: f32,
    pub flying_coin_clearance: f32,
    pub flying_ground_clearance: f32,

    // === Hitboxes (per side) ===
    pub runner_inset: f32,
    pub ground_inset: f32,
    pub flying_inset: f32,
    pub coin_outset: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.8,
            jump_force: -17.8,
            fast_fall_step: 5.0,
            run_frame_secs: 0.15,
            wing_frame_secs: 0.25,

            start_speed: 4.0,
            speed_multiplier: 1.4,
            speed_ramp: 0.8,
            max_speed: 16.0,
            score_multiplier: 0.3,

            countdown_from: 3,
            countdown_step_secs: 1.0,

            ground_spawn_min_secs: 1.5,
            ground_spawn_max_secs: 3.0,
            ground_spawn_offset: 20.0,
            ground_retire_x: -100.0,

            coin_spawn_min_secs: 3.0,
            coin_spawn_max_secs: 5.0,
            coin_spawn_chance: 0.5,
            coin_offset_min: 100.0,
            coin_offset_max: 200.0,
            coin_y: 90.0,
            coin_clearance: 100.0,
            coin_retire_x: -50.0,

            flying_min_distance: 300.0,
            flying_interval_secs: 4.0,
            flying_retry_secs: 3.5,
            flying_spawn_offset: 50.0,
            flying_y: 130.0,
            flying_coin_clearance: 100.0,
            flying_ground_clearance: 80.0,

            runner_inset: 8.0,
            ground_inset: 6.0,
            flying_inset: 5.0,
            coin_outset: 5.0,
        }
    }
}

impl Tuning {
    /// Scroll speed at distance zero
    #[inline]
    pub fn base_speed(&self) -> f32 {
        self.start_speed * self.speed_multiplier
    }

    /// Parse tuning overrides from JSON
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning overrides from a JSON file
    pub fn load(path: &Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load from `path` if given, falling back to defaults on any error
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("Using default tuning");
            return Self::default();
        };
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("{e}; using default tuning");
                Self::default()
            }
        }
    }

    /// Reject values the scheduler cannot sample from, or that would let
    /// speed or score shrink as distance grows
    pub fn validate(&self) -> Result<(), TuningError> {
        let ranges = [
            ("ground_spawn", self.ground_spawn_min_secs, self.ground_spawn_max_secs),
            ("coin_spawn", self.coin_spawn_min_secs, self.coin_spawn_max_secs),
            ("coin_offset", self.coin_offset_min, self.coin_offset_max),
        ];
        for (name, min, max) in ranges {
            if !(min < max) {
                return Err(TuningError::Invalid(format!(
                    "{name} range is empty ({min}..{max})"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.coin_spawn_chance) {
            return Err(TuningError::Invalid(format!(
                "coin_spawn_chance {} outside 0..=1",
                self.coin_spawn_chance
            )));
        }
        if self.countdown_step_secs <= 0.0 {
            return Err(TuningError::Invalid("countdown_step_secs must be positive".into()));
        }
        if !(self.base_speed() > 0.0) {
            return Err(TuningError::Invalid(format!(
                "base speed {} must be positive",
                self.base_speed()
            )));
        }
        if !(self.speed_ramp >= 0.0) {
            return Err(TuningError::Invalid(format!(
                "speed_ramp {} must not be negative",
                self.speed_ramp
            )));
        }
        if !(self.score_multiplier >= 0.0) {
            return Err(TuningError::Invalid(format!(
                "score_multiplier {} must not be negative",
                self.score_multiplier
            )));
        }
        if self.base_speed() > self.max_speed {
            return Err(TuningError::Invalid(format!(
                "base speed {} exceeds max_speed {}",
                self.base_speed(),
                self.max_speed
            )));
        }
        Ok(())
    }
}
