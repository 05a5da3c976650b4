//! # Snapshot Schema
//!
//! The persisted state of an engine and the trait that stores it.
//!
//! ## Schema (version 1)
//! ```text
//! {
//!   "version": 1,
//!   "saved_at": "2026-01-05T09:30:00Z",
//!   "next_record_id": 3,
//!   "vehicles": [ { "vehicle_id": "CAR001", "type": "car", ... } ],
//!   "renters":  [ { "renter_id": "I001", "type": "individual", ... } ],
//!   "records":  [ { "record_id": "R00001", "status": "completed", ... } ]
//! }
//! ```
//!
//! Ledgers are not part of the snapshot. The engine rebuilds them from
//! `records` after every load, so the record list stays the only source of
//! truth on disk.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PersistenceError;
use crate::record::RentalRecord;
use crate::renter::Renter;
use crate::vehicle::Vehicle;

/// Schema version written by this build.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Everything needed to reconstruct an engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub next_record_id: u64,
    #[serde(default)]
    pub vehicles: Vec<Vehicle>,
    #[serde(default)]
    pub renters: Vec<Renter>,
    #[serde(default)]
    pub records: Vec<RentalRecord>,
}

impl Snapshot {
    /// An empty snapshot at the current schema version.
    pub fn empty() -> Self {
        Snapshot {
            version: SNAPSHOT_VERSION,
            saved_at: Utc::now(),
            next_record_id: 1,
            vehicles: Vec::new(),
            renters: Vec::new(),
            records: Vec::new(),
        }
    }

    /// Rejects snapshots written by a newer schema.
    pub fn check_version(&self) -> Result<(), PersistenceError> {
        if self.version == 0 || self.version > SNAPSHOT_VERSION {
            return Err(PersistenceError::load(format!(
                "unsupported snapshot version {} (this build reads up to {})",
                self.version, SNAPSHOT_VERSION
            )));
        }
        Ok(())
    }
}

// =============================================================================
// Store Trait
// =============================================================================

/// Where snapshots live.
///
/// `load` returns `Ok(None)` when nothing has been saved yet.
pub trait SnapshotStore {
    fn load(&self) -> Result<Option<Snapshot>, PersistenceError>;

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError>;
}

impl<S: SnapshotStore + ?Sized> SnapshotStore for Box<S> {
    fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        (**self).load()
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        (**self).save(snapshot)
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// Keeps the last snapshot in memory.
///
/// Used by tests and by callers that do not want durability. Saves can be
/// made to fail on demand to exercise the "save failed after commit" path.
#[derive(Debug, Default)]
pub struct MemoryStore {
    snapshot: Option<Snapshot>,
    saves: usize,
    fail_saves: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `snapshot`.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        MemoryStore {
            snapshot: Some(snapshot),
            ..Self::default()
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves
    }

    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        Ok(self.snapshot.clone())
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        if self.fail_saves {
            return Err(PersistenceError::save("memory store is set to fail"));
        }
        self.snapshot = Some(snapshot.clone());
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_snapshot_round_trip() {
        let snapshot = Snapshot::empty();
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.version, SNAPSHOT_VERSION);
        assert_eq!(back.next_record_id, 1);
        assert!(back.vehicles.is_empty());
    }

    #[test]
    fn test_check_version() {
        let mut snapshot = Snapshot::empty();
        assert!(snapshot.check_version().is_ok());
        snapshot.version = SNAPSHOT_VERSION + 1;
        assert!(snapshot.check_version().is_err());
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(&Snapshot::empty()).unwrap();
        assert_eq!(store.save_count(), 1);
        assert!(store.load().unwrap().is_some());

        store.set_fail_saves(true);
        assert!(store.save(&Snapshot::empty()).is_err());
        assert_eq!(store.save_count(), 1);
    }
}
