//! Session modes and input dispatch
//!
//! A [`Session`] owns one run's state, the best records and the store they
//! persist to. Each fixed tick it routes the input to the active mode,
//! performs at most one transition, and queues [`GameEvent`]s for the
//! presentation layer to drain.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{HazardHit, Rect};
use super::spawn::SpawnReport;
use super::state::{Collectible, FlyingHazard, GroundHazard, Runner, SessionState};
use super::tick::{TickInput, advance_run};
use crate::highscores::{BestRecords, RecordUpdate};
use crate::persistence::PersistenceStore;
use crate::Tuning;
use crate::tuning::TuningError;

/// Slack for float accumulation when comparing countdown time
const COUNTDOWN_EPSILON: f32 = 1e-4;

/// Session mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Title screen, nothing simulated
    Menu,
    /// "3, 2, 1" before a (resumed) run continues
    Countdown,
    /// Active run
    Running,
    /// Run frozen, can be saved
    Paused,
    /// Run ended by a hazard
    GameOver,
}

/// Countdown before a run resumes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    /// Count currently shown (3, 2, 1)
    pub remaining: u32,
    /// Time spent on the current count
    pub elapsed: f32,
}

impl Countdown {
    pub fn new(from: u32) -> Self {
        Self {
            remaining: from,
            elapsed: 0.0,
        }
    }

    /// Fraction of the current count that has passed (0..1)
    pub fn progress(&self, step_secs: f32) -> f32 {
        (self.elapsed / step_secs).clamp(0.0, 1.0)
    }

    /// Advance by `dt`. Returns true once the last count has run out.
    pub fn advance(&mut self, dt: f32, step_secs: f32) -> bool {
        if self.remaining == 0 {
            return true;
        }
        self.elapsed += dt;
        if self.elapsed + COUNTDOWN_EPSILON >= step_secs {
            self.elapsed = (self.elapsed - step_secs).max(0.0);
            self.remaining -= 1;
        }
        self.remaining == 0
    }
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    Jumped,
    CoinCollected { total: u32 },
    Collision { hit: HazardHit, score: u32, coins: u32 },
    NewRecord { records: BestRecords, update: RecordUpdate },
    Paused,
    CountdownStarted,
    Resumed,
    /// Snapshot written; `at` is the session clock in seconds
    Saved { at: f64 },
    SaveFailed { reason: String },
    Loaded,
    LoadFailed { reason: String },
    ReturnedToMenu,
}

/// Numbers for the HUD
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hud {
    pub mode: Mode,
    pub distance: f32,
    pub score: u32,
    pub coins: u32,
    pub speed: f32,
    pub best_score: u32,
    pub best_coins: u32,
    /// Count shown during the countdown
    pub countdown: Option<u32>,
    /// Fraction of the current count elapsed
    pub countdown_progress: Option<f32>,
}

/// Read-only view of everything a renderer draws this frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameView<'a> {
    pub hud: Hud,
    pub runner: &'a Runner,
    pub runner_rect: Rect,
    pub ground: &'a [GroundHazard],
    pub collectibles: &'a [Collectible],
    pub flying: &'a [FlyingHazard],
}

/// One player's game: modes, the current run, records and their store
pub struct Session<S: PersistenceStore> {
    tuning: Tuning,
    mode: Mode,
    state: SessionState,
    countdown: Countdown,
    records: BestRecords,
    store: S,
    rng: Pcg32,
    events: Vec<GameEvent>,
    /// Seconds of ticks since the session was created
    clock: f64,
    ticks: u64,
}

impl<S: PersistenceStore> Session<S> {
    /// New session in the menu. Best records are read from the store.
    ///
    /// Fails if `tuning` does not validate.
    pub fn new(tuning: Tuning, store: S, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let records = store.load_records();
        let state = SessionState::new(&tuning, &mut rng);
        Ok(Self {
            countdown: Countdown::new(tuning.countdown_from),
            tuning,
            mode: Mode::Menu,
            state,
            records,
            store,
            rng,
            events: Vec::new(),
            clock: 0.0,
            ticks: 0,
        })
    }

    /// Advance one fixed timestep
    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        self.clock += f64::from(dt);
        self.ticks += 1;

        if input.quit_to_menu && self.mode != Mode::Menu {
            self.return_to_menu();
            return;
        }

        match self.mode {
            Mode::Menu => {
                if input.start || input.confirm {
                    self.start_run();
                } else if input.load {
                    self.load_run();
                }
            }
            Mode::Countdown => {
                if self.countdown.advance(dt, self.tuning.countdown_step_secs) {
                    self.mode = Mode::Running;
                    log::info!("Countdown finished, running");
                    self.events.push(GameEvent::Resumed);
                }
            }
            Mode::Running => {
                if input.pause {
                    self.mode = Mode::Paused;
                    log::info!("Paused at distance {:.1}", self.state.distance);
                    self.events.push(GameEvent::Paused);
                } else {
                    self.run_tick(input, dt);
                }
            }
            Mode::Paused => {
                if input.save {
                    self.save_run();
                }
                if input.pause {
                    self.begin_countdown();
                }
            }
            Mode::GameOver => {
                if input.restart || input.confirm {
                    self.start_run();
                }
            }
        }
    }

    fn run_tick(&mut self, input: &TickInput, dt: f32) {
        if input.jump && self.state.runner.jump(&self.tuning) {
            self.events.push(GameEvent::Jumped);
        }

        let outcome = advance_run(
            &mut self.state,
            input.fast_fall,
            &mut self.rng,
            &self.tuning,
            dt,
        );

        if outcome.spawns != SpawnReport::default() {
            log::trace!("Spawns this tick: {:?}", outcome.spawns);
        }
        if outcome.coins_collected > 0 {
            self.events.push(GameEvent::CoinCollected {
                total: self.state.coins,
            });
        }
        if let Some(hit) = outcome.hit {
            self.game_over(hit);
        }
    }

    fn game_over(&mut self, hit: HazardHit) {
        let score = self.state.score(&self.tuning);
        let coins = self.state.coins;
        self.mode = Mode::GameOver;
        log::info!("Game over: {hit:?} at score {score}, coins {coins}");
        self.events.push(GameEvent::Collision { hit, score, coins });

        let update = self.records.submit(score, coins);
        if update.improved() {
            if let Err(e) = self.store.save_records(&self.records) {
                log::warn!("Could not save best records: {e}");
            }
            self.events.push(GameEvent::NewRecord {
                records: self.records,
                update,
            });
        }
    }

    fn start_run(&mut self) {
        self.state = SessionState::new(&self.tuning, &mut self.rng);
        self.mode = Mode::Running;
        log::info!("Run started");
        self.events.push(GameEvent::RunStarted);
    }

    fn load_run(&mut self) {
        match self.store.load_snapshot() {
            Ok(snapshot) => {
                self.state = SessionState::from_snapshot(&snapshot, &self.tuning, &mut self.rng);
                log::info!(
                    "Loaded run at distance {:.1} with {} coins",
                    self.state.distance,
                    self.state.coins
                );
                self.events.push(GameEvent::Loaded);
                self.begin_countdown();
            }
            Err(e) => {
                log::warn!("Could not load saved run: {e}");
                self.events.push(GameEvent::LoadFailed {
                    reason: e.to_string(),
                });
            }
        }
    }

    fn save_run(&mut self) {
        match self.store.save_snapshot(&self.state.snapshot()) {
            Ok(()) => self.events.push(GameEvent::Saved { at: self.clock }),
            Err(e) => {
                log::warn!("Could not save run: {e}");
                self.events.push(GameEvent::SaveFailed {
                    reason: e.to_string(),
                });
            }
        }
    }

    fn begin_countdown(&mut self) {
        self.countdown = Countdown::new(self.tuning.countdown_from);
        self.mode = Mode::Countdown;
        self.events.push(GameEvent::CountdownStarted);
    }

    fn return_to_menu(&mut self) {
        self.state = SessionState::new(&self.tuning, &mut self.rng);
        self.mode = Mode::Menu;
        log::info!("Returned to menu");
        self.events.push(GameEvent::ReturnedToMenu);
    }

    /// Everything needed to draw the current frame
    pub fn frame(&self) -> FrameView<'_> {
        FrameView {
            hud: self.hud(),
            runner: &self.state.runner,
            runner_rect: self.state.runner.bounds(),
            ground: &self.state.entities.ground,
            collectibles: &self.state.entities.collectibles,
            flying: &self.state.entities.flying,
        }
    }

    pub fn hud(&self) -> Hud {
        let countdown = self.countdown();
        Hud {
            mode: self.mode,
            distance: self.state.distance,
            score: self.state.score(&self.tuning),
            coins: self.state.coins,
            speed: self.state.speed,
            best_score: self.records.best_score,
            best_coins: self.records.best_coins,
            countdown: countdown.map(|c| c.remaining),
            countdown_progress: countdown.map(|c| c.progress(self.tuning.countdown_step_secs)),
        }
    }

    /// Events queued since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    #[inline]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Direct access to the run, for harnesses and debugging
    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    /// Active countdown, only while in [`Mode::Countdown`]
    pub fn countdown(&self) -> Option<&Countdown> {
        (self.mode == Mode::Countdown).then_some(&self.countdown)
    }

    pub fn records(&self) -> BestRecords {
        self.records
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Session clock in seconds
    pub fn clock(&self) -> f64 {
        self.clock
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
