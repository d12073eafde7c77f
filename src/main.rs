//! Dino Dash headless driver
//!
//! Runs a session with an autopilot at the controls, logs what happens and
//! prints a summary. Useful for balancing tuning files and smoke testing
//! save data.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;

use dino_dash::consts::SIM_DT;
use dino_dash::persistence::{FileStore, MemoryStore, PersistenceStore};
use dino_dash::platform::FrameClock;
use dino_dash::sim::{GameEvent, Hud, Mode, Session, TickInput};
use dino_dash::{BestRecords, Tuning};

#[derive(Parser, Debug)]
#[command(name = "dino-dash", version, about = "Headless endless-runner simulation")]
struct Cli {
    /// Simulation ticks to run (60 per second)
    #[arg(long, default_value_t = 3600)]
    ticks: u64,

    /// RNG seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for best records and the saved run; in-memory when omitted
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// JSON tuning overrides
    #[arg(long)]
    tuning: Option<PathBuf>,

    /// Simulated frame time in milliseconds
    #[arg(long, default_value_t = 16.0)]
    frame_ms: f32,

    /// Resume the saved run instead of starting fresh
    #[arg(long)]
    resume: bool,

    /// Pause and save the run if it is still going at the end
    #[arg(long)]
    save_on_exit: bool,

    /// Stop after this many finished runs
    #[arg(long, default_value_t = 1)]
    runs: u32,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

/// Jumps over whatever comes along, restarts after a crash
struct Autopilot {
    /// Runs still allowed to start after the first
    restarts_left: u32,
    resume: bool,
}

impl Autopilot {
    fn input<S: PersistenceStore>(&mut self, session: &Session<S>) -> TickInput {
        let mut input = TickInput::default();
        match session.mode() {
            Mode::Menu => {
                if std::mem::take(&mut self.resume) {
                    input.load = true;
                } else {
                    input.start = true;
                }
            }
            Mode::GameOver => {
                if self.restarts_left > 0 {
                    self.restarts_left -= 1;
                    input.restart = true;
                }
            }
            Mode::Running => {
                let state = session.state();
                let runner = state.runner.bounds();
                // Lead distance grows with speed so the jump arc still clears
                let lead = state.speed * 14.0;
                input.jump = state.runner.grounded
                    && state.entities.ground.iter().any(|h| {
                        let gap = h.x - runner.max().x;
                        gap > -10.0 && gap < lead
                    });
            }
            Mode::Countdown | Mode::Paused => {}
        }
        input
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
struct RunSummary {
    score: u32,
    coins: u32,
}

#[derive(Debug, Serialize)]
struct Summary {
    seed: u64,
    ticks: u64,
    seconds: f64,
    finished_runs: Vec<RunSummary>,
    saved: bool,
    best: BestRecords,
    last_frame: Hud,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let tuning = Tuning::load_or_default(cli.tuning.as_deref());
    let seed = cli.seed.unwrap_or_else(rand::random);
    let store: Box<dyn PersistenceStore> = match &cli.data_dir {
        Some(dir) => {
            log::info!("Using save data in {}", dir.display());
            Box::new(FileStore::new(dir))
        }
        None => Box::new(MemoryStore::default()),
    };

    log::info!("Dino Dash starting (seed {seed})");
    let mut session = match Session::new(tuning, store, seed) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Invalid tuning: {e}");
            return ExitCode::FAILURE;
        }
    };
    let mut autopilot = Autopilot {
        restarts_left: cli.runs.saturating_sub(1),
        resume: cli.resume,
    };
    let mut clock = FrameClock::new();
    let frame_dt = (cli.frame_ms / 1000.0).max(SIM_DT / 4.0);

    let mut finished_runs = Vec::new();
    let mut saved = false;
    let mut load_failed = false;

    'frames: while session.ticks() < cli.ticks {
        for _ in 0..clock.advance(frame_dt) {
            if session.ticks() >= cli.ticks {
                break 'frames;
            }
            let input = autopilot.input(&session);
            session.tick(&input, SIM_DT);

            for event in session.drain_events() {
                log::debug!("{event:?}");
                match event {
                    GameEvent::Collision { score, coins, .. } => {
                        finished_runs.push(RunSummary { score, coins });
                    }
                    GameEvent::LoadFailed { reason } => {
                        log::error!("Cannot resume: {reason}");
                        load_failed = true;
                    }
                    GameEvent::NewRecord { records, .. } => log::info!(
                        "New best: score {} coins {}",
                        records.best_score,
                        records.best_coins
                    ),
                    _ => {}
                }
            }
            if load_failed
                || (session.mode() == Mode::GameOver && autopilot.restarts_left == 0)
            {
                break 'frames;
            }
        }
    }

    if cli.save_on_exit && session.mode() == Mode::Running {
        session.tick(
            &TickInput {
                pause: true,
                ..TickInput::default()
            },
            SIM_DT,
        );
        session.tick(
            &TickInput {
                save: true,
                ..TickInput::default()
            },
            SIM_DT,
        );
        saved = session
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::Saved { .. }));
    }

    let summary = Summary {
        seed,
        ticks: session.ticks(),
        seconds: session.clock(),
        finished_runs,
        saved,
        best: session.records(),
        last_frame: session.hud(),
    };

    if cli.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                log::error!("Failed to serialize summary: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        print_summary(&summary);
    }

    if load_failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn print_summary(summary: &Summary) {
    println!("seed {}  ticks {}  ({:.1}s)", summary.seed, summary.ticks, summary.seconds);
    for (i, run) in summary.finished_runs.iter().enumerate() {
        println!("run {}: score {} coins {}", i + 1, run.score, run.coins);
    }
    let hud = &summary.last_frame;
    println!(
        "now: {:?} distance {:.1} score {} coins {} speed {:.2}",
        hud.mode, hud.distance, hud.score, hud.coins, hud.speed
    );
    if summary.saved {
        println!("run saved");
    }
    println!(
        "best: score {} coins {}",
        summary.best.best_score, summary.best.best_coins
    );
}
