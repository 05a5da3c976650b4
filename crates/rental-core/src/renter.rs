//! # Renter Module
//!
//! Customers and staff who can hold rentals.
//!
//! ## Discount Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RenterKind        calculate_discount(period)                           │
//! │  ─────────────     ──────────────────────────────────────────────────   │
//! │  Individual        10% when the rental lasts 7 days or more, else 0%    │
//! │  Corporate         15% flat, any duration                               │
//! │  Staff             0% (staff never get a discount)                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Credentials
//! Secrets are hashed with Argon2 on construction and only the PHC string is
//! kept. `verify_credential` re-hashes the attempt against it.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{RentalError, RentalResult, ValidationError};
use crate::ledger::{EntryStatus, RentalEntry, RentalLedger};
use crate::money::Money;
use crate::period::{date_format, RentalPeriod};
use crate::pricing::Discount;
use crate::validation;

/// Individual renters get this discount on long rentals.
pub const INDIVIDUAL_LONG_RENTAL_DISCOUNT: Discount = Discount::from_bps(1_000);

/// Rentals of at least this many days count as long.
pub const LONG_RENTAL_DAYS: i64 = 7;

/// Flat discount for corporate accounts.
pub const CORPORATE_DISCOUNT: Discount = Discount::from_bps(1_500);

// =============================================================================
// Staff Role
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaffRole {
    Admin,
    Manager,
    Agent,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Admin => "Admin",
            StaffRole::Manager => "Manager",
            StaffRole::Agent => "Agent",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaffRole {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(StaffRole::Admin),
            "manager" => Ok(StaffRole::Manager),
            "agent" => Ok(StaffRole::Agent),
            other => Err(ValidationError::field(
                "role",
                other,
                "must be one of: Admin, Manager, Agent",
            )),
        }
    }
}

/// Something a staff member may be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ManageUsers,
    ManageVehicles,
    ViewAnalytics,
    ProcessRentals,
}

impl Capability {
    pub fn describe(&self) -> &'static str {
        match self {
            Capability::ManageUsers => "manage users",
            Capability::ManageVehicles => "manage vehicles",
            Capability::ViewAnalytics => "view analytics",
            Capability::ProcessRentals => "process rentals",
        }
    }
}

// =============================================================================
// Renter Kind
// =============================================================================

/// Validated variant payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RenterKind {
    Individual {
        #[serde(with = "date_format")]
        date_of_birth: NaiveDate,
        license_number: String,
    },
    Corporate {
        company_name: String,
        business_registration: String,
        billing_address: String,
    },
    Staff {
        employee_id: String,
        role: StaffRole,
    },
}

impl RenterKind {
    pub fn label(&self) -> &'static str {
        match self {
            RenterKind::Individual { .. } => "Individual",
            RenterKind::Corporate { .. } => "Corporate",
            RenterKind::Staff { .. } => "Staff",
        }
    }

    /// The discount this kind of renter gets on `period`.
    pub fn discount_for(&self, period: &RentalPeriod) -> Discount {
        match self {
            RenterKind::Individual { .. } if period.duration_days() >= LONG_RENTAL_DAYS => {
                INDIVIDUAL_LONG_RENTAL_DISCOUNT
            }
            RenterKind::Individual { .. } => Discount::none(),
            RenterKind::Corporate { .. } => CORPORATE_DISCOUNT,
            RenterKind::Staff { .. } => Discount::none(),
        }
    }

    pub fn details(&self) -> String {
        match self {
            RenterKind::Individual {
                date_of_birth,
                license_number,
            } => format!(
                "born {}, licence {}",
                date_of_birth.format(crate::period::DATE_FORMAT),
                license_number
            ),
            RenterKind::Corporate {
                company_name,
                business_registration,
                ..
            } => format!("{} ({})", company_name, business_registration),
            RenterKind::Staff { employee_id, role } => format!("{} {}", role, employee_id),
        }
    }
}

/// Unvalidated variant payload, as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RenterDetails {
    Individual {
        /// `DD-MM-YYYY`
        date_of_birth: String,
        license_number: String,
    },
    Corporate {
        company_name: String,
        business_registration: String,
        billing_address: String,
    },
    Staff {
        employee_id: String,
        role: StaffRole,
    },
}

impl RenterDetails {
    fn validate(self, today: NaiveDate) -> RentalResult<RenterKind> {
        let kind = match self {
            RenterDetails::Individual {
                date_of_birth,
                license_number,
            } => RenterKind::Individual {
                date_of_birth: validation::validate_date_of_birth(&date_of_birth, today)?,
                license_number: validation::validate_license_number(&license_number)?,
            },
            RenterDetails::Corporate {
                company_name,
                business_registration,
                billing_address,
            } => RenterKind::Corporate {
                company_name: validation::validate_company_name(&company_name)?,
                business_registration: validation::validate_registration(&business_registration)?,
                billing_address: validation::validate_billing_address(&billing_address)?,
            },
            RenterDetails::Staff { employee_id, role } => RenterKind::Staff {
                employee_id: validation::validate_employee_id(&employee_id)?,
                role,
            },
        };
        Ok(kind)
    }
}

/// Unvalidated input for [`Renter::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenterSpec {
    pub renter_id: String,
    pub name: String,
    pub contact_info: String,
    /// Plain secret; hashed during construction and then dropped.
    pub password: String,
    #[serde(flatten)]
    pub details: RenterDetails,
}

// =============================================================================
// Credentials
// =============================================================================

fn hash_secret(secret: &str) -> RentalResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|e| RentalError::Credential(format!("Failed to hash credential: {}", e)))?;
    Ok(hash.to_string())
}

fn verify_secret(secret: &str, hash: &str) -> bool {
    let parsed = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok()
}

// =============================================================================
// Renter
// =============================================================================

/// A customer or staff member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Renter {
    renter_id: String,
    name: String,
    contact_info: String,
    credential_hash: String,
    #[serde(flatten)]
    kind: RenterKind,
    #[serde(skip)]
    ledger: RentalLedger,
}

impl Renter {
    /// Validates `spec` against `today` (for age checks) and hashes the secret.
    pub fn new(spec: RenterSpec, today: NaiveDate) -> RentalResult<Self> {
        let renter_id = validation::validate_identifier("renter_id", &spec.renter_id)?;
        let name = validation::validate_person_name(&spec.name)?;
        let contact_info = validation::validate_contact(&spec.contact_info)?;
        validation::validate_secret(&spec.password)?;
        let kind = spec.details.validate(today)?;
        let credential_hash = hash_secret(&spec.password)?;

        Ok(Renter {
            renter_id,
            name,
            contact_info,
            credential_hash,
            kind,
            ledger: RentalLedger::new(),
        })
    }

    pub fn renter_id(&self) -> &str {
        &self.renter_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contact_info(&self) -> &str {
        &self.contact_info
    }

    pub fn kind(&self) -> &RenterKind {
        &self.kind
    }

    pub fn user_type(&self) -> &'static str {
        self.kind.label()
    }

    pub fn ledger(&self) -> &RentalLedger {
        &self.ledger
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut RentalLedger {
        &mut self.ledger
    }

    pub fn set_name(&mut self, name: &str) -> RentalResult<()> {
        self.name = validation::validate_person_name(name)?;
        Ok(())
    }

    pub fn set_contact_info(&mut self, contact: &str) -> RentalResult<()> {
        self.contact_info = validation::validate_contact(contact)?;
        Ok(())
    }

    pub fn set_password(&mut self, secret: &str) -> RentalResult<()> {
        validation::validate_secret(secret)?;
        self.credential_hash = hash_secret(secret)?;
        Ok(())
    }

    pub fn verify_credential(&self, secret: &str) -> bool {
        verify_secret(secret, &self.credential_hash)
    }

    // -------------------------------------------------------------------------
    // Policy
    // -------------------------------------------------------------------------

    pub fn calculate_discount(&self, period: &RentalPeriod) -> Discount {
        self.kind.discount_for(period)
    }

    pub fn can_rent_more(&self, max_concurrent: usize) -> bool {
        self.ledger.active_count() < max_concurrent
    }

    pub fn has_capability(&self, capability: Capability) -> bool {
        match (&self.kind, capability) {
            (RenterKind::Staff { .. }, Capability::ProcessRentals) => true,
            (RenterKind::Staff { role, .. }, _) => {
                matches!(role, StaffRole::Admin | StaffRole::Manager)
            }
            _ => false,
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self.kind, RenterKind::Staff { .. })
    }

    // -------------------------------------------------------------------------
    // Rentals
    // -------------------------------------------------------------------------

    /// Records a new active rental.
    ///
    /// ## Errors
    /// - `CapacityExceeded` when already at `max_concurrent` active rentals
    /// - `VehicleNotAvailable` when the renter already holds an overlapping
    ///   active rental of the same vehicle
    pub fn add_rental(
        &mut self,
        record_id: &str,
        vehicle_id: &str,
        period: RentalPeriod,
        cost: Money,
        max_concurrent: usize,
    ) -> RentalResult<()> {
        if !self.can_rent_more(max_concurrent) {
            return Err(RentalError::CapacityExceeded {
                renter_id: self.renter_id.clone(),
                max: max_concurrent,
            });
        }
        if self.ledger.holds(vehicle_id, &period) {
            return Err(RentalError::VehicleNotAvailable {
                vehicle_id: vehicle_id.to_string(),
                period: period.to_string(),
            });
        }
        self.ledger.push(RentalEntry {
            record_id: record_id.to_string(),
            vehicle_id: vehicle_id.to_string(),
            period,
            status: EntryStatus::Active,
            cost,
            actual_return: None,
        });
        Ok(())
    }

    /// Marks the active rental of `vehicle_id` for `period` as completed.
    pub fn complete_rental(
        &mut self,
        vehicle_id: &str,
        period: &RentalPeriod,
        actual_return: NaiveDate,
        final_cost: Money,
    ) -> RentalResult<()> {
        if self
            .ledger
            .complete(vehicle_id, period, actual_return, final_cost)
        {
            Ok(())
        } else {
            Err(RentalError::ReservationNotFound {
                vehicle_id: vehicle_id.to_string(),
                renter_id: self.renter_id.clone(),
                period: period.to_string(),
            })
        }
    }

    pub fn has_active_rentals(&self) -> bool {
        self.ledger.active_count() > 0
    }

    pub fn rental_count(&self) -> usize {
        self.ledger.history().len()
    }

    pub fn total_spent(&self) -> Money {
        self.ledger.total_spent()
    }
}

impl PartialEq for Renter {
    fn eq(&self, other: &Self) -> bool {
        self.renter_id == other.renter_id
    }
}

impl fmt::Display for Renter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - {} - {} active rental(s)",
            self.name,
            self.renter_id,
            self.kind.label(),
            self.ledger.active_count()
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
    }

    fn period(days: u32) -> RentalPeriod {
        let start = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        RentalPeriod::from_dates(start, start + chrono::Days::new(days as u64 - 1)).unwrap()
    }

    fn individual() -> RenterSpec {
        RenterSpec {
            renter_id: "I001".to_string(),
            name: "Ana Lopez".to_string(),
            contact_info: "ana@example.com".to_string(),
            password: "s3cret".to_string(),
            details: RenterDetails::Individual {
                date_of_birth: "15-06-1990".to_string(),
                license_number: "dl12345".to_string(),
            },
        }
    }

    fn corporate() -> RenterSpec {
        RenterSpec {
            renter_id: "C001".to_string(),
            name: "Ben Ng".to_string(),
            contact_info: "+61 2 5550 1234".to_string(),
            password: "corp".to_string(),
            details: RenterDetails::Corporate {
                company_name: "Acme Logistics".to_string(),
                business_registration: "abn-12345".to_string(),
                billing_address: "1 Harbour St, Sydney".to_string(),
            },
        }
    }

    fn staff(role: StaffRole) -> RenterSpec {
        RenterSpec {
            renter_id: "S001".to_string(),
            name: "Cara Diaz".to_string(),
            contact_info: "cara@fleet.example".to_string(),
            password: "staff".to_string(),
            details: RenterDetails::Staff {
                employee_id: "emp-001".to_string(),
                role,
            },
        }
    }

    #[test]
    fn test_individual_discount_threshold() {
        let renter = Renter::new(individual(), today()).unwrap();
        assert_eq!(renter.calculate_discount(&period(6)).bps(), 0);
        assert_eq!(renter.calculate_discount(&period(7)).bps(), 1000);
        assert_eq!(renter.calculate_discount(&period(14)).bps(), 1000);
    }

    #[test]
    fn test_corporate_discount_is_flat() {
        let renter = Renter::new(corporate(), today()).unwrap();
        assert_eq!(renter.calculate_discount(&period(1)).bps(), 1500);
        assert_eq!(renter.calculate_discount(&period(30)).bps(), 1500);
    }

    #[test]
    fn test_staff_never_discounted() {
        let renter = Renter::new(staff(StaffRole::Admin), today()).unwrap();
        assert!(renter.calculate_discount(&period(30)).is_zero());
    }

    #[test]
    fn test_normalises_codes() {
        let renter = Renter::new(individual(), today()).unwrap();
        match renter.kind() {
            RenterKind::Individual { license_number, .. } => assert_eq!(license_number, "DL12345"),
            other => panic!("unexpected kind {:?}", other),
        }
        let renter = Renter::new(staff(StaffRole::Agent), today()).unwrap();
        assert_eq!(renter.kind().details(), "Agent EMP-001");
    }

    #[test]
    fn test_rejects_underage() {
        let mut spec = individual();
        spec.details = RenterDetails::Individual {
            date_of_birth: "01-01-2010".to_string(),
            license_number: "DL12345".to_string(),
        };
        let err = Renter::new(spec, today()).unwrap_err();
        assert!(err.to_string().contains("at least 18"));
    }

    #[test]
    fn test_credentials_are_hashed() {
        let renter = Renter::new(individual(), today()).unwrap();
        assert!(renter.verify_credential("s3cret"));
        assert!(!renter.verify_credential("wrong"));

        let json = serde_json::to_string(&renter).unwrap();
        assert!(!json.contains("s3cret"));
        assert!(json.contains("$argon2"));
    }

    #[test]
    fn test_capabilities() {
        let admin = Renter::new(staff(StaffRole::Admin), today()).unwrap();
        let agent = Renter::new(staff(StaffRole::Agent), today()).unwrap();
        let customer = Renter::new(individual(), today()).unwrap();

        assert!(admin.has_capability(Capability::ManageUsers));
        assert!(!agent.has_capability(Capability::ManageUsers));
        assert!(agent.has_capability(Capability::ProcessRentals));
        assert!(!customer.has_capability(Capability::ProcessRentals));
    }

    #[test]
    fn test_capacity_and_history() {
        let mut renter = Renter::new(corporate(), today()).unwrap();
        renter
            .add_rental("R00001", "CAR001", period(3), Money::from_cents(100), 1)
            .unwrap();
        let err = renter
            .add_rental("R00002", "CAR002", period(3), Money::from_cents(100), 1)
            .unwrap_err();
        assert!(matches!(err, RentalError::CapacityExceeded { max: 1, .. }));

        renter
            .complete_rental("CAR001", &period(3), NaiveDate::from_ymd_opt(2026, 1, 3).unwrap(), Money::from_cents(90))
            .unwrap();
        assert!(!renter.has_active_rentals());
        assert_eq!(renter.rental_count(), 1);
        assert_eq!(renter.total_spent().cents(), 90);

        let err = renter
            .complete_rental("CAR001", &period(3), NaiveDate::from_ymd_opt(2026, 1, 3).unwrap(), Money::zero())
            .unwrap_err();
        assert!(matches!(err, RentalError::ReservationNotFound { .. }));
    }

    #[test]
    fn test_serde_round_trip_keeps_kind() {
        let renter = Renter::new(individual(), today()).unwrap();
        let json = serde_json::to_value(&renter).unwrap();
        assert_eq!(json["type"], "individual");
        assert_eq!(json["date_of_birth"], "15-06-1990");
        let back: Renter = serde_json::from_value(json).unwrap();
        assert_eq!(back.kind(), renter.kind());
        assert!(back.verify_credential("s3cret"));
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("MANAGER".parse::<StaffRole>().unwrap(), StaffRole::Manager);
        assert!("janitor".parse::<StaffRole>().is_err());
    }
}
