//! Entity models and per-run session state
//!
//! Everything a save snapshot captures lives here. Positions are top-left
//! corners in field pixels, y grows downward.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::spawn::SpawnScheduler;
use crate::consts::*;
use crate::persistence::SessionSnapshot;
use crate::{Tuning, score_for_distance, speed_for_distance};

/// Runner sprite bounds
pub const RUNNER_SIZE: Vec2 = Vec2::new(87.0, 94.0);
/// Flying hazard sprite bounds (both wing poses)
pub const FLYING_SIZE: Vec2 = Vec2::new(93.0, 62.0);
/// Collectible sprite bounds
pub const COLLECTIBLE_SIZE: Vec2 = Vec2::new(32.0, 32.0);
/// Top edge of the track; sprites are seated relative to it
pub const GROUND_TOP: f32 = GROUND_Y + 30.0;

/// Runner animation pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunnerPose {
    RunA,
    RunB,
    Airborne,
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Runner {
    pub pos: Vec2,
    pub vel_y: f32,
    pub grounded: bool,
    pub pose: RunnerPose,
    /// Time since the last run-cycle swap
    #[serde(skip)]
    anim_timer: f32,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    /// Runner standing on the ground
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(RUNNER_X, Self::ground_y()),
            vel_y: 0.0,
            grounded: true,
            pose: RunnerPose::RunA,
            anim_timer: 0.0,
        }
    }

    /// Runner restored from saved values (x is always fixed)
    pub fn restored(y: f32, vel_y: f32, grounded: bool) -> Self {
        Self {
            pos: Vec2::new(RUNNER_X, y),
            vel_y,
            grounded,
            pose: if grounded { RunnerPose::RunA } else { RunnerPose::Airborne },
            anim_timer: 0.0,
        }
    }

    /// Resting y position
    #[inline]
    pub fn ground_y() -> f32 {
        GROUND_TOP - RUNNER_SIZE.y + 12.0
    }

    /// Start a jump. Only works on the ground.
    pub fn jump(&mut self, tuning: &Tuning) -> bool {
        if !self.grounded {
            return false;
        }
        self.vel_y = tuning.jump_force;
        self.grounded = false;
        self.pose = RunnerPose::Airborne;
        true
    }

    /// Cut a jump short and push downward. Only works in the air.
    pub fn fast_fall(&mut self, tuning: &Tuning) -> bool {
        if self.grounded {
            return false;
        }
        if self.vel_y < 0.0 {
            self.vel_y = 0.0;
        }
        self.vel_y += tuning.fast_fall_step;
        true
    }

    /// Advance physics and the run cycle by one tick
    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        if !self.grounded {
            self.vel_y += tuning.gravity;
            self.pos.y += self.vel_y;
            if self.pos.y >= Self::ground_y() {
                self.pos.y = Self::ground_y();
                self.vel_y = 0.0;
                self.grounded = true;
                self.pose = RunnerPose::RunA;
                self.anim_timer = 0.0;
            }
        }

        if self.grounded {
            self.anim_timer += dt;
            if self.anim_timer > tuning.run_frame_secs {
                self.pose = match self.pose {
                    RunnerPose::RunA => RunnerPose::RunB,
                    _ => RunnerPose::RunA,
                };
                self.anim_timer = 0.0;
            }
        }
    }

    /// Visual bounds
    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, RUNNER_SIZE)
    }

    /// Forgiving collision box
    pub fn hitbox(&self, tuning: &Tuning) -> Rect {
        self.bounds().inset(tuning.runner_inset)
    }
}

/// Ground hazard shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroundHazardKind {
    Tall,
    Short,
    Wide,
}

impl GroundHazardKind {
    pub const ALL: [GroundHazardKind; 3] = [Self::Tall, Self::Short, Self::Wide];

    /// Shape bounds for this variant
    pub fn size(self) -> Vec2 {
        match self {
            Self::Tall => Vec2::new(48.0, 95.0),
            Self::Short => Vec2::new(40.0, 71.0),
            Self::Wide => Vec2::new(68.0, 71.0),
        }
    }

    /// Stable index used by the save format
    pub fn index(self) -> u32 {
        match self {
            Self::Tall => 0,
            Self::Short => 1,
            Self::Wide => 2,
        }
    }

    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

/// A hazard standing on the ground
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundHazard {
    pub x: f32,
    pub kind: GroundHazardKind,
}

impl GroundHazard {
    pub fn new(x: f32, kind: GroundHazardKind) -> Self {
        Self { x, kind }
    }

    /// Seated so the base sinks slightly into the track
    pub fn y(&self) -> f32 {
        GROUND_TOP - self.kind.size().y + 15.0
    }

    pub fn scroll(&mut self, speed: f32) {
        self.x -= speed;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(Vec2::new(self.x, self.y()), self.kind.size())
    }

    pub fn hitbox(&self, tuning: &Tuning) -> Rect {
        self.bounds().inset(tuning.ground_inset)
    }
}

/// Flying hazard wing pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WingPose {
    Up,
    Down,
}

/// A hazard flying at a fixed height
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlyingHazard {
    pub pos: Vec2,
    pub wing: WingPose,
    #[serde(skip)]
    wing_timer: f32,
}

impl FlyingHazard {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            wing: WingPose::Up,
            wing_timer: 0.0,
        }
    }

    /// Scroll left and flap
    pub fn update(&mut self, speed: f32, dt: f32, tuning: &Tuning) {
        self.pos.x -= speed;
        self.wing_timer += dt;
        if self.wing_timer > tuning.wing_frame_secs {
            self.wing = match self.wing {
                WingPose::Up => WingPose::Down,
                WingPose::Down => WingPose::Up,
            };
            self.wing_timer = 0.0;
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, FLYING_SIZE)
    }

    pub fn hitbox(&self, tuning: &Tuning) -> Rect {
        self.bounds().inset(tuning.flying_inset)
    }

    /// Fully past the left edge
    pub fn is_off_screen(&self) -> bool {
        self.pos.x + FLYING_SIZE.x < 0.0
    }
}

/// A coin floating above the track
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub pos: Vec2,
    pub collected: bool,
}

impl Collectible {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            collected: false,
        }
    }

    pub fn scroll(&mut self, speed: f32) {
        self.pos.x -= speed;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, COLLECTIBLE_SIZE)
    }

    /// Generous pickup box
    pub fn hitbox(&self, tuning: &Tuning) -> Rect {
        self.bounds().inset(-tuning.coin_outset)
    }
}

/// Live entity sets, in spawn order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Entities {
    pub ground: Vec<GroundHazard>,
    pub collectibles: Vec<Collectible>,
    pub flying: Vec<FlyingHazard>,
}

impl Entities {
    /// Move everything left by one tick's worth of scrolling
    pub fn scroll(&mut self, speed: f32, dt: f32, tuning: &Tuning) {
        for hazard in &mut self.ground {
            hazard.scroll(speed);
        }
        for coin in &mut self.collectibles {
            coin.scroll(speed);
        }
        for bird in &mut self.flying {
            bird.update(speed, dt, tuning);
        }
    }

    /// Drop collected and off-screen entities
    pub fn retire(&mut self, tuning: &Tuning) {
        self.ground.retain(|h| h.x >= tuning.ground_retire_x);
        self.collectibles
            .retain(|c| !c.collected && c.pos.x >= tuning.coin_retire_x);
        self.flying.retain(|f| !f.is_off_screen());
    }

    pub fn clear(&mut self) {
        self.ground.clear();
        self.collectibles.clear();
        self.flying.clear();
    }
}

/// Everything that belongs to one run
#[derive(Debug, Clone)]
pub struct SessionState {
    pub distance: f32,
    pub coins: u32,
    /// Per-tick scroll displacement
    pub speed: f32,
    pub runner: Runner,
    pub entities: Entities,
    pub spawner: SpawnScheduler,
}

impl SessionState {
    /// Fresh run at distance zero
    pub fn new(tuning: &Tuning, rng: &mut impl Rng) -> Self {
        Self {
            distance: 0.0,
            coins: 0,
            speed: tuning.base_speed(),
            runner: Runner::new(),
            entities: Entities::default(),
            spawner: SpawnScheduler::new(tuning, rng),
        }
    }

    /// Rebuild a run from a snapshot. Speed comes from the ramp, timers start over.
    pub fn from_snapshot(snapshot: &SessionSnapshot, tuning: &Tuning, rng: &mut impl Rng) -> Self {
        Self {
            distance: snapshot.distance,
            coins: snapshot.coins,
            speed: speed_for_distance(snapshot.distance, tuning),
            runner: Runner::restored(
                snapshot.runner_y,
                snapshot.runner_vel_y,
                snapshot.runner_grounded,
            ),
            entities: Entities {
                ground: snapshot
                    .ground
                    .iter()
                    .map(|&(x, kind)| GroundHazard::new(x, kind))
                    .collect(),
                collectibles: snapshot.collectibles.iter().map(|&p| Collectible::new(p)).collect(),
                flying: snapshot.flying.iter().map(|&p| FlyingHazard::new(p)).collect(),
            },
            spawner: SpawnScheduler::new(tuning, rng),
        }
    }

    /// Capture what the save format keeps. Collected coins are dropped.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            distance: self.distance,
            coins: self.coins,
            runner_y: self.runner.pos.y,
            runner_vel_y: self.runner.vel_y,
            runner_grounded: self.runner.grounded,
            ground: self.entities.ground.iter().map(|h| (h.x, h.kind)).collect(),
            collectibles: self
                .entities
                .collectibles
                .iter()
                .filter(|c| !c.collected)
                .map(|c| c.pos)
                .collect(),
            flying: self.entities.flying.iter().map(|f| f.pos).collect(),
        }
    }

    #[inline]
    pub fn score(&self, tuning: &Tuning) -> u32 {
        score_for_distance(self.distance, tuning)
    }
}
