//! # Engine State
//!
//! The one lock around the whole engine.
//!
//! ## Thread Safety
//! `RentalEngine` is plain data. Availability check, ledger updates and the
//! snapshot save inside `rent` must run as one step, so every caller goes
//! through the same `Arc<Mutex<_>>`. Per-vehicle locks would not be enough:
//! `rent` touches a vehicle, a renter and the shared record counter.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  thread A: rent(CAR001, 01-01..05-01) ─┐                                │
//! │                                        ├──► lock ──► engine ──► unlock  │
//! │  thread B: rent(CAR001, 03-01..07-01) ─┘    (B waits, then sees A's     │
//! │                                              booking and is rejected)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex};

use rental_core::{MemoryStore, RentalEngine, SnapshotStore};

/// Shared handle to a rental engine.
pub struct SharedEngine<S: SnapshotStore = MemoryStore> {
    engine: Arc<Mutex<RentalEngine<S>>>,
}

impl<S: SnapshotStore> SharedEngine<S> {
    pub fn new(engine: RentalEngine<S>) -> Self {
        SharedEngine {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    /// Executes a function with read access to the engine.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let report = state.with_engine(|engine| engine.fleet_report());
    /// ```
    pub fn with_engine<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&RentalEngine<S>) -> R,
    {
        let engine = self.engine.lock().expect("Engine mutex poisoned");
        f(&engine)
    }

    /// Executes a function with write access to the engine.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// state.with_engine_mut(|engine| engine.rent("CAR001", "I001", period))?;
    /// ```
    pub fn with_engine_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut RentalEngine<S>) -> R,
    {
        let mut engine = self.engine.lock().expect("Engine mutex poisoned");
        f(&mut engine)
    }
}

impl<S: SnapshotStore> Clone for SharedEngine<S> {
    fn clone(&self) -> Self {
        SharedEngine {
            engine: Arc::clone(&self.engine),
        }
    }
}
