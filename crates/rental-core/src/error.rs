//! # Error Types
//!
//! Domain-specific error types for rental-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  rental-core errors (this file)                                        │
//! │  ├── ValidationError   - Bad input at construction time                │
//! │  ├── PersistenceError  - Snapshot load/save failures (trait seam)      │
//! │  └── RentalError       - Engine-level rejections                       │
//! │                                                                         │
//! │  rental-store errors (separate crate)                                  │
//! │  └── StoreError        - File/JSON failures → PersistenceError         │
//! │                                                                         │
//! │  Flow: ValidationError → RentalError → CliError → terminal / web       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Validation errors are raised eagerly while an entity is being built, so a
//! half-validated `Vehicle` or `Renter` never exists. Engine errors are
//! returned as values from every public engine operation.

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation failures.
///
/// Every entity validator funnels through these two shapes so callers can
/// point at the offending field without parsing the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A field failed its domain check.
    #[error("Invalid {field} '{value}': {reason}")]
    InvalidFieldValue {
        field: String,
        value: String,
        reason: String,
    },

    /// A date (or date pair) could not form a rental period.
    #[error("Invalid rental period at '{date}': {reason}")]
    InvalidPeriod { date: String, reason: String },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::InvalidFieldValue`].
    pub fn field(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ValidationError::InvalidFieldValue {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`ValidationError::InvalidPeriod`].
    pub fn period(date: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidPeriod {
            date: date.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Persistence Error
// =============================================================================

/// Failure reported by a [`SnapshotStore`](crate::snapshot::SnapshotStore).
///
/// The store crate keeps its own richer error type and flattens it into this
/// one at the trait boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Snapshot {operation} failed: {reason}")]
pub struct PersistenceError {
    /// "load" or "save".
    pub operation: String,
    pub reason: String,
}

impl PersistenceError {
    pub fn load(reason: impl Into<String>) -> Self {
        PersistenceError {
            operation: "load".to_string(),
            reason: reason.into(),
        }
    }

    pub fn save(reason: impl Into<String>) -> Self {
        PersistenceError {
            operation: "save".to_string(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Rental Error
// =============================================================================

/// Engine-level errors.
///
/// ## User Workflow
/// ```text
/// rent("CAR001", "I001", 03-01-2026..08-01-2026)
///      │
///      ▼
/// CAR001 already booked 01-01-2026..05-01-2026
///      │
///      ▼
/// VehicleNotAvailable { vehicle_id: "CAR001", period: "03-01-2026 to 08-01-2026" }
///      │
///      ▼
/// Caller shows: "Vehicle CAR001 is not available ..."
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RentalError {
    #[error("Vehicle not found: {0}")]
    VehicleNotFound(String),

    #[error("Renter not found: {0}")]
    RenterNotFound(String),

    #[error("Vehicle {vehicle_id} is not available for {period}")]
    VehicleNotAvailable { vehicle_id: String, period: String },

    #[error("Vehicle {0} has no active rental to return")]
    VehicleAlreadyReturned(String),

    #[error("Vehicle with ID {0} already exists")]
    DuplicateVehicle(String),

    #[error("Renter with ID {0} already exists")]
    DuplicateRenter(String),

    /// The renter already holds the maximum number of concurrent rentals.
    #[error("Renter {renter_id} has reached the limit of {max} concurrent rentals")]
    CapacityExceeded { renter_id: String, max: usize },

    /// No active reservation matches the (vehicle, renter, period) triple.
    #[error("No active reservation of vehicle {vehicle_id} by {renter_id} for {period}")]
    ReservationNotFound {
        vehicle_id: String,
        renter_id: String,
        period: String,
    },

    #[error("Rental record not found: {0}")]
    RecordNotFound(String),

    #[error("Record {record_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        record_id: String,
        from: String,
        to: String,
    },

    #[error("Vehicle {0} is currently rented and cannot be removed")]
    VehicleInUse(String),

    #[error("Renter {0} still holds active rentals")]
    RenterHasActiveRentals(String),

    #[error("{actor} is not permitted to {action}")]
    PermissionDenied { actor: String, action: String },

    #[error("Renter {0} cannot remove their own account")]
    SelfDeletion(String),

    /// Credential hashing failed (not a wrong password; that is `None` from
    /// `authenticate`).
    #[error("Credential error: {0}")]
    Credential(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

/// Convenience type alias for Results with RentalError.
pub type RentalResult<T> = Result<T, RentalError>;

/// Result type for validators.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
