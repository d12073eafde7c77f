//! Fixed timestep simulation tick
//!
//! One RUNNING step: physics, spawning, scrolling, collisions, cleanup.

use rand::Rng;

use super::collision::{HazardHit, collect_pickups, find_hazard_hit};
use super::spawn::SpawnReport;
use super::state::SessionState;
use crate::{Tuning, speed_for_distance};

/// Input intents for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Jump (edge)
    pub jump: bool,
    /// Fast-fall (held; applied every tick while set)
    pub fast_fall: bool,
    /// Pause toggle
    pub pause: bool,
    /// Leave to the menu from anywhere
    pub quit_to_menu: bool,
    /// Save the run (paused only)
    pub save: bool,
    /// Start over after game over
    pub restart: bool,
    /// Default action for the current screen
    pub confirm: bool,
    /// Start a new run from the menu
    pub start: bool,
    /// Resume the saved run from the menu
    pub load: bool,
}

/// Result of one running tick
#[derive(Debug, Clone, Default)]
pub struct RunTickOutcome {
    /// Hazard that ended the run this tick
    pub hit: Option<HazardHit>,
    pub coins_collected: u32,
    pub spawns: SpawnReport,
}

/// Advance an active run by one fixed timestep.
///
/// Speed is a per-tick displacement, so entities move by `speed` while
/// distance accumulates `speed * dt`. On a hazard hit the tick stops before
/// pickups and cleanup.
pub fn advance_run(
    state: &mut SessionState,
    fast_fall: bool,
    rng: &mut impl Rng,
    tuning: &Tuning,
    dt: f32,
) -> RunTickOutcome {
    let mut outcome = RunTickOutcome::default();

    state.runner.update(dt, tuning);
    if fast_fall {
        state.runner.fast_fall(tuning);
    }

    state.distance += state.speed * dt;
    state.speed = speed_for_distance(state.distance, tuning);

    outcome.spawns = state
        .spawner
        .update(dt, state.distance, &mut state.entities, rng, tuning);

    state.entities.scroll(state.speed, dt, tuning);

    let runner_box = state.runner.hitbox(tuning);
    outcome.hit = find_hazard_hit(
        &runner_box,
        &state.entities.ground,
        &state.entities.flying,
        tuning,
    );
    if outcome.hit.is_some() {
        return outcome;
    }

    outcome.coins_collected = collect_pickups(&runner_box, &mut state.entities.collectibles, tuning);
    state.coins += outcome.coins_collected;

    state.entities.retire(tuning);
    outcome
}
