//! # rental-core: Reservation & Pricing Engine
//!
//! Everything that decides whether a vehicle can be rented, what it costs and
//! what happens when it comes back. No file, network or terminal I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fleet Rental Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    rentctl (apps/rental-cli)                    │   │
//! │  │    fleet add ──► rent ──► return ──► report                     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ rental-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  period   │  │  vehicle  │  │  renter   │  │  engine   │  │   │
//! │  │   │  money    │  │  ledger   │  │  record   │  │ analytics │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   SnapshotStore trait ◄── the only way state leaves the crate   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               rental-store (JSON snapshot on disk)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`period`] - `DD-MM-YYYY` dates and inclusive rental periods
//! - [`money`] / [`pricing`] - integer cents, discounts and premiums in bps
//! - [`vehicle`] / [`renter`] - the fleet and the people renting it
//! - [`ledger`] - per-entity reservation views
//! - [`record`] - the audit trail of rentals
//! - [`search`] - fleet filters (type, brand, price band, free dates)
//! - [`engine`] - the rent / return / cancel state machine
//! - [`analytics`] - revenue and utilisation figures
//! - [`snapshot`] - persisted schema and the store trait
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use rental_core::{EngineConfig, Money, RentalEngine, VehicleKind, VehicleSpec};
//! use rental_core::vehicle::{FuelType, Transmission};
//!
//! let today = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
//! let mut engine = RentalEngine::in_memory(EngineConfig::pinned(today)).unwrap();
//!
//! engine
//!     .add_vehicle(VehicleSpec {
//!         vehicle_id: "CAR001".to_string(),
//!         make: "Toyota".to_string(),
//!         model: "Camry".to_string(),
//!         year: 2022,
//!         daily_rate: Money::from_cents(6500),
//!         image: None,
//!         kind: VehicleKind::Car {
//!             doors: 4,
//!             fuel: FuelType::Petrol,
//!             transmission: Transmission::Automatic,
//!         },
//!     })
//!     .unwrap();
//!
//! let period = engine.parse_period("01-01-2026", "05-01-2026").unwrap();
//! let car = engine.vehicle("CAR001").unwrap();
//! assert_eq!(car.calculate_rental_cost(&period, Default::default()).cents(), 32500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod analytics;
pub mod config;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod money;
pub mod period;
pub mod pricing;
pub mod record;
pub mod renter;
pub mod search;
pub mod snapshot;
pub mod validation;
pub mod vehicle;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use analytics::FleetReport;
pub use config::{EngineConfig, MAX_CONCURRENT_RENTALS};
pub use engine::{ConsistencyIssue, RentOutcome, RentalEngine, ReturnSummary};
pub use error::{PersistenceError, RentalError, RentalResult, ValidationError, ValidationResult};
pub use money::Money;
pub use period::{format_date, parse_date, PeriodPolicy, RentalPeriod};
pub use pricing::{Discount, Premium};
pub use record::{RecordStatus, RentalRecord, ReturnType};
pub use renter::{Capability, Renter, RenterDetails, RenterKind, RenterSpec, StaffRole};
pub use search::{PriceBand, VehicleFilter};
pub use snapshot::{MemoryStore, Snapshot, SnapshotStore, SNAPSHOT_VERSION};
pub use vehicle::{Vehicle, VehicleKind, VehicleSpec, VehicleType};
