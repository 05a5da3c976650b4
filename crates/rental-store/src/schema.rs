//! # Snapshot Encoding
//!
//! JSON encode/decode with a version gate that runs before the typed decode.
//!
//! Checking `version` on the raw [`Value`] first means a snapshot from a newer
//! build fails with `UnsupportedVersion` instead of an obscure field error
//! from whatever the newer schema changed.

use rental_core::snapshot::{Snapshot, SNAPSHOT_VERSION};
use serde_json::Value;

use crate::error::{StoreError, StoreResult};

/// Reads the `version` field of a raw snapshot.
pub fn read_version(value: &Value) -> StoreResult<u64> {
    let object = value
        .as_object()
        .ok_or_else(|| StoreError::Corrupt("top level is not an object".to_string()))?;
    let version = object
        .get("version")
        .ok_or_else(|| StoreError::Corrupt("missing \"version\" field".to_string()))?;
    version
        .as_u64()
        .ok_or_else(|| StoreError::Corrupt(format!("version is not an integer: {}", version)))
}

/// Parses snapshot bytes.
pub fn decode(bytes: &[u8]) -> StoreResult<Snapshot> {
    let value: Value = serde_json::from_slice(bytes)?;
    let version = read_version(&value)?;
    if version == 0 || version > u64::from(SNAPSHOT_VERSION) {
        return Err(StoreError::UnsupportedVersion {
            found: version,
            supported: SNAPSHOT_VERSION,
        });
    }
    Ok(serde_json::from_value(value)?)
}

/// Serializes a snapshot.
pub fn encode(snapshot: &Snapshot, pretty: bool) -> StoreResult<Vec<u8>> {
    let bytes = if pretty {
        serde_json::to_vec_pretty(snapshot)?
    } else {
        serde_json::to_vec(snapshot)?
    };
    Ok(bytes)
}
