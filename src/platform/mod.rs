//! Platform glue
//!
//! Turns variable frame deltas into fixed simulation ticks.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};

/// Fixed timestep accumulator
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a frame's elapsed time and return how many ticks to run.
    ///
    /// Long frames are clamped and the tick count is capped so a stall
    /// never turns into a burst of catch-up work.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if frame_dt.is_finite() {
            self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);
        }

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Leftover time as a fraction of a tick, for interpolation
    pub fn alpha(&self) -> f32 {
        self.accumulator / SIM_DT
    }

    /// Drop pending time (e.g. after the window regains focus)
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
    }
}
