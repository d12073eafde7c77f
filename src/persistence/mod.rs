//! Save/load for best records and the resumable session snapshot
//!
//! Features:
//! - Plain whitespace-delimited text, see [`codec`]
//! - All-or-nothing decoding: a corrupt snapshot is never half applied
//! - Atomic file writes (tmp → rename)
//! - Missing record file means zero records; missing snapshot means no save

pub mod codec;

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use glam::Vec2;
use thiserror::Error;

use crate::highscores::BestRecords;
use crate::sim::state::GroundHazardKind;

/// Best records file name inside a [`FileStore`] directory
pub const RECORDS_FILE: &str = "highscore.dat";
/// Session snapshot file name inside a [`FileStore`] directory
pub const SNAPSHOT_FILE: &str = "savegame.txt";

/// Persistence failures. All are recoverable.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("no save available")]
    NoSave,
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed save data: {reason}")]
    Malformed { reason: String },
}

impl PersistError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}

/// Stored records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Records,
    Snapshot,
}

/// Everything needed to resume a run
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionSnapshot {
    pub distance: f32,
    pub coins: u32,
    pub runner_y: f32,
    pub runner_vel_y: f32,
    pub runner_grounded: bool,
    /// (x, kind) per ground hazard
    pub ground: Vec<(f32, GroundHazardKind)>,
    /// Uncollected coins only
    pub collectibles: Vec<Vec2>,
    pub flying: Vec<Vec2>,
}

/// Durable storage for records and snapshots.
///
/// Implementors provide raw text slots; encoding and fallbacks are shared.
pub trait PersistenceStore {
    /// Contents of a slot, `None` if it was never written
    fn read(&self, slot: Slot) -> Result<Option<String>, PersistError>;

    /// Replace a slot's contents
    fn write(&mut self, slot: Slot, contents: &str) -> Result<(), PersistError>;

    /// Best records, or zeros if missing or unreadable
    fn load_records(&self) -> BestRecords {
        let text = match self.read(Slot::Records) {
            Ok(Some(text)) => text,
            Ok(None) => {
                log::info!("No best records yet, starting fresh");
                return BestRecords::default();
            }
            Err(e) => {
                log::warn!("Could not read best records: {e}");
                return BestRecords::default();
            }
        };
        match codec::decode_records(&text) {
            Ok(records) => {
                log::info!(
                    "Loaded best records: score {} coins {}",
                    records.best_score,
                    records.best_coins
                );
                records
            }
            Err(e) => {
                log::warn!("Ignoring best records: {e}");
                BestRecords::default()
            }
        }
    }

    fn save_records(&mut self, records: &BestRecords) -> Result<(), PersistError> {
        self.write(Slot::Records, &codec::encode_records(records))?;
        log::info!(
            "Best records saved (score {} coins {})",
            records.best_score,
            records.best_coins
        );
        Ok(())
    }

    /// Saved run. Missing data is [`PersistError::NoSave`].
    fn load_snapshot(&self) -> Result<SessionSnapshot, PersistError> {
        let text = self.read(Slot::Snapshot)?.ok_or(PersistError::NoSave)?;
        codec::decode_snapshot(&text)
    }

    fn save_snapshot(&mut self, snapshot: &SessionSnapshot) -> Result<(), PersistError> {
        self.write(Slot::Snapshot, &codec::encode_snapshot(snapshot))?;
        log::info!(
            "Run saved at distance {} ({} hazards, {} coins, {} flyers)",
            snapshot.distance,
            snapshot.ground.len(),
            snapshot.collectibles.len(),
            snapshot.flying.len()
        );
        Ok(())
    }
}

/// Files in a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, slot: Slot) -> PathBuf {
        self.dir.join(match slot {
            Slot::Records => RECORDS_FILE,
            Slot::Snapshot => SNAPSHOT_FILE,
        })
    }
}

impl PersistenceStore for FileStore {
    fn read(&self, slot: Slot) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.path(slot)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, slot: Slot, contents: &str) -> Result<(), PersistError> {
        let path = self.path(slot);
        let tmp = path.with_extension("tmp");
        fs::create_dir_all(&self.dir)?;
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-memory slots (tests, headless runs without a data dir)
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub records: Option<String>,
    pub snapshot: Option<String>,
}

impl PersistenceStore for MemoryStore {
    fn read(&self, slot: Slot) -> Result<Option<String>, PersistError> {
        Ok(match slot {
            Slot::Records => self.records.clone(),
            Slot::Snapshot => self.snapshot.clone(),
        })
    }

    fn write(&mut self, slot: Slot, contents: &str) -> Result<(), PersistError> {
        let target = match slot {
            Slot::Records => &mut self.records,
            Slot::Snapshot => &mut self.snapshot,
        };
        *target = Some(contents.to_owned());
        Ok(())
    }
}

impl<S: PersistenceStore + ?Sized> PersistenceStore for Box<S> {
    fn read(&self, slot: Slot) -> Result<Option<String>, PersistError> {
        (**self).read(slot)
    }

    fn write(&mut self, slot: Slot, contents: &str) -> Result<(), PersistError> {
        (**self).write(slot, contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("dino-dash-{name}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn sample_snapshot() -> SessionSnapshot {
        SessionSnapshot {
            distance: 812.25,
            coins: 4,
            runner_y: 120.5,
            runner_vel_y: -3.2,
            runner_grounded: false,
            ground: vec![(640.0, GroundHazardKind::Wide)],
            collectibles: vec![Vec2::new(910.0, 90.0)],
            flying: vec![Vec2::new(850.0, 130.0)],
        }
    }

    #[test]
    fn test_memory_store_missing_data() {
        let store = MemoryStore::default();
        assert_eq!(store.load_records(), BestRecords::default());
        assert!(matches!(store.load_snapshot(), Err(PersistError::NoSave)));
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::default();
        store.save_records(&BestRecords::new(321, 7)).unwrap();
        assert_eq!(store.records.as_deref(), Some("321 7"));
        assert_eq!(store.load_records(), BestRecords::new(321, 7));

        let snap = sample_snapshot();
        store.save_snapshot(&snap).unwrap();
        assert_eq!(store.load_snapshot().unwrap(), snap);
    }

    #[test]
    fn test_corrupt_records_fall_back_to_zero() {
        let store = MemoryStore {
            records: Some("12 banana".into()),
            snapshot: None,
        };
        assert_eq!(store.load_records(), BestRecords::default());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = temp_dir("files");
        let mut store = FileStore::new(&dir);
        assert_eq!(store.load_records(), BestRecords::default());
        assert!(matches!(store.load_snapshot(), Err(PersistError::NoSave)));

        store.save_records(&BestRecords::new(99, 3)).unwrap();
        assert_eq!(fs::read_to_string(dir.join(RECORDS_FILE)).unwrap(), "99 3");
        assert_eq!(store.load_records(), BestRecords::new(99, 3));

        let snap = sample_snapshot();
        store.save_snapshot(&snap).unwrap();
        assert!(!dir.join("savegame.tmp").exists());
        assert_eq!(store.load_snapshot().unwrap(), snap);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_boxed_store_delegates() {
        let mut store: Box<dyn PersistenceStore> = Box::new(MemoryStore::default());
        store.save_records(&BestRecords::new(5, 1)).unwrap();
        assert_eq!(store.load_records(), BestRecords::new(5, 1));
    }
}
