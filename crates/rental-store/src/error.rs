//! # Store Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / serde_json::Error                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds path and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PersistenceError (rental-core) ← What the engine sees                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  save warning / load failure reported by the CLI                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Snapshot file errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// File system failure.
    ///
    /// ## When This Occurs
    /// - Parent directory cannot be created
    /// - Permission denied
    /// - Disk full during the temp-file write
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid JSON or does not match the schema.
    #[error("Snapshot format error: {0}")]
    Format(#[from] serde_json::Error),

    /// Written by a newer build.
    #[error("Unsupported snapshot version {found} (supported up to {supported})")]
    UnsupportedVersion { found: u64, supported: u32 },

    /// Structurally readable but missing required pieces.
    #[error("Corrupt snapshot: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_names_path() {
        let err = StoreError::io(
            "/tmp/fleet.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        let msg = err.to_string();
        assert!(msg.contains("/tmp/fleet.json"));
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_version_message() {
        let err = StoreError::UnsupportedVersion {
            found: 7,
            supported: 1,
        };
        assert_eq!(
            err.to_string(),
            "Unsupported snapshot version 7 (supported up to 1)"
        );
    }
}
