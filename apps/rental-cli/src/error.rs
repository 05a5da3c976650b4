//! # CLI Error Type
//!
//! Unified error type for `rentctl` commands.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in rentctl                                │
//! │                                                                         │
//! │  Command Function                                                       │
//! │  Result<Reply, CliError>                                                │
//! │         │                                                               │
//! │         ├── RentalError::VehicleNotFound ──► NOT_FOUND                  │
//! │         ├── RentalError::VehicleNotAvailable ► CONFLICT                 │
//! │         ├── ValidationError ───────────────► VALIDATION_ERROR           │
//! │         ├── PersistenceError ──────────────► STORAGE_ERROR              │
//! │         └── bad credentials ───────────────► AUTH_FAILED                │
//! │                                                                         │
//! │  --json:  {"code": "CONFLICT", "message": "Vehicle CAR001 is not ..."}  │
//! │  text:    Error: Vehicle CAR001 is not available for ...                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The same `{code, message}` shape is what a web layer would hand its
//! clients, so the mapping lives here once.

use rental_core::{PersistenceError, RentalError, ValidationError};
use serde::Serialize;
use std::fmt;

/// Error returned from every command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CliError {
    /// Machine-readable error code for scripts
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Vehicle, renter or record does not exist
    NotFound,

    /// Input failed a field or period check
    ValidationError,

    /// Request clashes with current state (overlap, duplicate, in use)
    Conflict,

    /// Renter is at the concurrent rental limit
    CapacityExceeded,

    /// Actor lacks the capability for the action
    PermissionDenied,

    /// Wrong renter id or secret
    AuthFailed,

    /// Snapshot could not be read or written
    StorageError,

    /// Anything else
    Internal,
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        CliError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::validation(err.to_string())
    }
}

impl From<PersistenceError> for CliError {
    fn from(err: PersistenceError) -> Self {
        tracing::error!("Persistence failure: {}", err);
        CliError::new(ErrorCode::StorageError, err.to_string())
    }
}

/// Converts engine errors to CLI errors.
impl From<RentalError> for CliError {
    fn from(err: RentalError) -> Self {
        let code = match &err {
            RentalError::VehicleNotFound(_)
            | RentalError::RenterNotFound(_)
            | RentalError::RecordNotFound(_)
            | RentalError::ReservationNotFound { .. } => ErrorCode::NotFound,

            RentalError::VehicleNotAvailable { .. }
            | RentalError::VehicleAlreadyReturned(_)
            | RentalError::DuplicateVehicle(_)
            | RentalError::DuplicateRenter(_)
            | RentalError::InvalidStatusTransition { .. }
            | RentalError::VehicleInUse(_)
            | RentalError::RenterHasActiveRentals(_) => ErrorCode::Conflict,

            RentalError::CapacityExceeded { .. } => ErrorCode::CapacityExceeded,

            RentalError::PermissionDenied { .. } | RentalError::SelfDeletion(_) => {
                ErrorCode::PermissionDenied
            }

            RentalError::Validation(_) => ErrorCode::ValidationError,

            RentalError::Persistence(e) => {
                tracing::error!("Persistence failure: {}", e);
                ErrorCode::StorageError
            }

            RentalError::Credential(e) => {
                tracing::error!("Credential hashing failed: {}", e);
                ErrorCode::Internal
            }
        };
        CliError::new(code, err.to_string())
    }
}

/// Result type for commands.
pub type CliResult<T> = Result<T, CliError>;

// =============================================================================
// Configuration Errors
// =============================================================================

/// Failures while loading or saving `rental.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Config save failed: {0}")]
    SaveFailed(String),
}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        ConfigError::Invalid(err.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rental_error_codes() {
        let err: CliError = RentalError::VehicleNotFound("CAR9".to_string()).into();
        assert_eq!(err.code, ErrorCode::NotFound);

        let err: CliError = RentalError::CapacityExceeded {
            renter_id: "I001".to_string(),
            max: 5,
        }
        .into();
        assert_eq!(err.code, ErrorCode::CapacityExceeded);

        let err: CliError = RentalError::VehicleNotAvailable {
            vehicle_id: "CAR001".to_string(),
            period: "01-01-2026 to 05-01-2026".to_string(),
        }
        .into();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert!(err.message.contains("CAR001"));

        let err: CliError =
            RentalError::from(ValidationError::field("year", "1800", "must be between 1990-2030"))
                .into();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[test]
    fn test_json_shape() {
        let err = CliError::not_found("Vehicle", "CAR404");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Vehicle not found: CAR404");
    }
}
