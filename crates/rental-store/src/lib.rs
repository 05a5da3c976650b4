//! # rental-store: Snapshot Persistence for Fleet Rental
//!
//! File-backed implementation of [`SnapshotStore`](rental_core::SnapshotStore).
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fleet Rental Data Flow                           │
//! │                                                                         │
//! │  RentalEngine::rent / return_vehicle / add_* ...                       │
//! │       │ persist()                                                       │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   rental-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ JsonFileStore │───►│    schema     │    │  StoreError  │  │   │
//! │  │   │  (file.rs)    │    │ version gate  │    │  (error.rs)  │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ~/.local/share/rentctl/fleet.json                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use rental_core::{EngineConfig, RentalEngine};
//! use rental_store::{JsonFileStore, StoreConfig};
//!
//! let store = JsonFileStore::new(StoreConfig::new("./data/fleet.json").keep_backup(true));
//! let engine = RentalEngine::open(EngineConfig::default(), store)?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod file;
pub mod schema;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use file::{JsonFileStore, StoreConfig};
