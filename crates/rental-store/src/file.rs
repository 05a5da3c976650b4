//! # JSON File Store
//!
//! Keeps the engine snapshot in one JSON file.
//!
//! ## Save Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  save(snapshot)                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  create parent directory (if missing)                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  write fleet.json.tmp, fsync                                            │
//! │       │                                                                 │
//! │       ├── keep_backup? copy fleet.json → fleet.json.bak                 │
//! │       ▼                                                                 │
//! │  rename fleet.json.tmp → fleet.json                                     │
//! │       │                                                                 │
//! │       └── any step failed? remove fleet.json.tmp                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A crash mid-save leaves either the old file or the new one, never half of
//! each. A missing file loads as "nothing saved yet".

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use rental_core::error::PersistenceError;
use rental_core::snapshot::{Snapshot, SnapshotStore};

use crate::error::{StoreError, StoreResult};
use crate::schema;

// =============================================================================
// Configuration
// =============================================================================

/// File store settings.
///
/// ## Example
/// ```rust
/// use rental_store::StoreConfig;
///
/// let config = StoreConfig::new("./data/fleet.json").keep_backup(true);
/// assert!(config.keep_backup);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Snapshot file path.
    pub path: PathBuf,

    /// Indent the JSON.
    /// Default: true
    pub pretty: bool,

    /// Copy the previous file to `<path>.bak` before replacing it.
    /// Default: false
    pub keep_backup: bool,
}

impl StoreConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        StoreConfig {
            path: path.into(),
            pretty: true,
            keep_backup: false,
        }
    }

    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn keep_backup(mut self, keep: bool) -> Self {
        self.keep_backup = keep;
        self
    }
}

// =============================================================================
// Store
// =============================================================================

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    config: StoreConfig,
}

impl JsonFileStore {
    pub fn new(config: StoreConfig) -> Self {
        JsonFileStore { config }
    }

    /// Shorthand for a store with default settings at `path`.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        JsonFileStore::new(StoreConfig::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn backup_path(&self) -> PathBuf {
        sibling(&self.config.path, "bak")
    }

    fn temp_path(&self) -> PathBuf {
        sibling(&self.config.path, "tmp")
    }

    /// Reads the snapshot, or `None` when the file does not exist.
    pub fn read(&self) -> StoreResult<Option<Snapshot>> {
        let path = &self.config.path;
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "Snapshot file not found");
                return Ok(None);
            }
            Err(e) => return Err(StoreError::io(path, e)),
        };
        let snapshot = schema::decode(&bytes)?;
        info!(
            path = %path.display(),
            records = snapshot.records.len(),
            "Snapshot loaded"
        );
        Ok(Some(snapshot))
    }

    /// Writes the snapshot atomically. On failure the temp file is removed
    /// and the previous snapshot is left untouched.
    pub fn write(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let path = &self.config.path;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let bytes = schema::encode(snapshot, self.config.pretty)?;
        let temp = self.temp_path();
        if let Err(err) = write_synced(&temp, &bytes).and_then(|()| self.swap_in(&temp)) {
            discard(&temp);
            return Err(err);
        }
        debug!(path = %path.display(), bytes = bytes.len(), "Snapshot written");
        Ok(())
    }

    /// Backs up the current file if configured, then renames `temp` over it.
    fn swap_in(&self, temp: &Path) -> StoreResult<()> {
        let path = &self.config.path;
        if self.config.keep_backup && path.exists() {
            let backup = self.backup_path();
            fs::copy(path, &backup).map_err(|e| StoreError::io(&backup, e))?;
        }
        fs::rename(temp, path).map_err(|e| StoreError::io(path, e))
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> StoreResult<()> {
    let mut file = fs::File::create(path).map_err(|e| StoreError::io(path, e))?;
    file.write_all(bytes).map_err(|e| StoreError::io(path, e))?;
    file.sync_all().map_err(|e| StoreError::io(path, e))
}

/// Best-effort removal of a leftover temp file.
fn discard(temp: &Path) {
    match fs::remove_file(temp) {
        Ok(()) => debug!(path = %temp.display(), "Removed temp file after failed save"),
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %temp.display(), error = %e, "Could not remove temp file"),
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<Snapshot>, PersistenceError> {
        self.read().map_err(|e| PersistenceError::load(e.to_string()))
    }

    fn save(&mut self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        self.write(snapshot)
            .map_err(|e| PersistenceError::save(e.to_string()))
    }
}

/// `fleet.json` + `tmp` → `fleet.json.tmp`
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}
