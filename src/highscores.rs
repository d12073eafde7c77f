//! Best score / best coins
//!
//! Process-wide records, persisted through a [`PersistenceStore`]. Each value
//! only ever goes up.
//!
//! [`PersistenceStore`]: crate::persistence::PersistenceStore

use serde::{Deserialize, Serialize};

/// Best results across all runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BestRecords {
    pub best_score: u32,
    pub best_coins: u32,
}

/// Which records a finished run beat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordUpdate {
    pub score: bool,
    pub coins: bool,
}

impl RecordUpdate {
    /// True if anything changed and needs saving
    pub fn improved(&self) -> bool {
        self.score || self.coins
    }
}

impl BestRecords {
    pub fn new(best_score: u32, best_coins: u32) -> Self {
        Self {
            best_score,
            best_coins,
        }
    }

    /// Fold a finished run into the records.
    /// Each value is replaced only when strictly exceeded.
    pub fn submit(&mut self, score: u32, coins: u32) -> RecordUpdate {
        let mut update = RecordUpdate::default();
        if score > self.best_score {
            self.best_score = score;
            update.score = true;
        }
        if coins > self.best_coins {
            self.best_coins = coins;
            update.coins = true;
        }
        update
    }
}
