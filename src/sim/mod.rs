//! Deterministic simulation module
//!
//! All gameplay logic lives here:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Entities kept in spawn order
//! - No rendering or platform dependencies

pub mod collision;
pub mod session;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{HazardHit, Rect};
pub use session::{Countdown, FrameView, GameEvent, Hud, Mode, Session};
pub use spawn::{SpawnAttempt, SpawnReport, SpawnScheduler};
pub use state::{
    Collectible, Entities, FlyingHazard, GroundHazard, GroundHazardKind, Runner, RunnerPose,
    SessionState, WingPose,
};
pub use tick::{RunTickOutcome, TickInput, advance_run};
