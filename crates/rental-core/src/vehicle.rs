//! # Vehicle Module
//!
//! The fleet: one `Vehicle` type with a closed set of variant payloads.
//!
//! ## Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Vehicle                                                                │
//! │  ├── vehicle_id, make, model, year, daily_rate, image   (shared)        │
//! │  ├── kind: VehicleKind                                                  │
//! │  │     ├── Car       { doors, fuel, transmission }                      │
//! │  │     ├── Motorbike { engine_cc, class, abs }     ← has premiums       │
//! │  │     └── Truck     { load_capacity, class, hydraulic_lift }           │
//! │  └── ledger: ReservationLedger                         (not persisted)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cost formula dispatches on `kind` with a `match`, so adding a variant
//! is a compile error everywhere a premium or label is needed.
//!
//! ## Premiums (Motorbike)
//! | Condition         | Surcharge |
//! |-------------------|-----------|
//! | engine ≥ 1000cc   | +25%      |
//! | engine ≥ 600cc    | +15%      |
//! | engine ≥ 300cc    | +5%       |
//! | Sport             | +20%      |
//! | Adventure         | +15%      |
//! | Touring           | +10%      |
//! | ABS               | +5%       |

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{RentalError, RentalResult, ValidationError, ValidationResult};
use crate::ledger::ReservationLedger;
use crate::money::Money;
use crate::period::RentalPeriod;
use crate::pricing::{rental_cost, Discount, Premium};
use crate::validation;

// =============================================================================
// Attribute Enums
// =============================================================================

/// Declares a closed attribute enum with case-insensitive parsing.
macro_rules! attribute_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal { $($variant:ident => $label:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| {
                        let allowed: Vec<&str> = $name::ALL.iter().map(|v| v.as_str()).collect();
                        ValidationError::field(
                            $field,
                            wanted,
                            format!("must be one of: {}", allowed.join(", ")),
                        )
                    })
            }
        }
    };
}

attribute_enum!(FuelType, "fuel_type" {
    Petrol => "Petrol",
    Diesel => "Diesel",
    Electric => "Electric",
    Hybrid => "Hybrid",
});

attribute_enum!(Transmission, "transmission" {
    Manual => "Manual",
    Automatic => "Automatic",
    Cvt => "CVT",
});

attribute_enum!(BikeClass, "bike_type" {
    Sport => "Sport",
    Cruiser => "Cruiser",
    Touring => "Touring",
    Adventure => "Adventure",
    Standard => "Standard",
});

attribute_enum!(TruckClass, "truck_type" {
    Light => "Light",
    Medium => "Medium",
    Heavy => "Heavy",
    Box => "Box",
    Flatbed => "Flatbed",
});

attribute_enum!(
    /// The variant a [`VehicleKind`] belongs to, without its payload.
    VehicleType, "vehicle_type" {
        Car => "Car",
        Motorbike => "Motorbike",
        Truck => "Truck",
    }
);

// =============================================================================
// Vehicle Kind
// =============================================================================

/// Variant payload. Serialized with a `"type"` tag so an unknown variant in
/// an old snapshot fails loudly instead of being misread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum VehicleKind {
    Car {
        doors: u8,
        fuel: FuelType,
        transmission: Transmission,
    },
    Motorbike {
        engine_cc: u32,
        class: BikeClass,
        abs: bool,
    },
    Truck {
        /// Tonnes, two decimals.
        load_capacity: f64,
        class: TruckClass,
        hydraulic_lift: bool,
    },
}

impl VehicleKind {
    pub fn vehicle_type(&self) -> VehicleType {
        match self {
            VehicleKind::Car { .. } => VehicleType::Car,
            VehicleKind::Motorbike { .. } => VehicleType::Motorbike,
            VehicleKind::Truck { .. } => VehicleType::Truck,
        }
    }

    /// Display label used in listings and analytics.
    pub fn label(&self) -> &'static str {
        self.vehicle_type().as_str()
    }

    /// Multiplicative premium applied to the base cost before any discount.
    pub fn premium(&self) -> Premium {
        match self {
            VehicleKind::Car { .. } | VehicleKind::Truck { .. } => Premium::none(),
            VehicleKind::Motorbike {
                engine_cc,
                class,
                abs,
            } => {
                let engine = match engine_cc {
                    cc if *cc >= 1000 => 2500,
                    cc if *cc >= 600 => 1500,
                    cc if *cc >= 300 => 500,
                    _ => 0,
                };
                let style = match class {
                    BikeClass::Sport => 2000,
                    BikeClass::Adventure => 1500,
                    BikeClass::Touring => 1000,
                    BikeClass::Cruiser | BikeClass::Standard => 0,
                };
                let safety = if *abs { 500 } else { 0 };
                Premium::none()
                    .with_surcharge(engine)
                    .with_surcharge(style)
                    .with_surcharge(safety)
            }
        }
    }

    fn validate(self) -> ValidationResult<Self> {
        match self {
            VehicleKind::Car { doors, .. } if ![2, 3, 4, 5].contains(&doors) => Err(
                ValidationError::field("num_doors", doors.to_string(), "must be 2, 3, 4, or 5"),
            ),
            VehicleKind::Motorbike {
                engine_cc,
                class,
                abs,
            } => Ok(VehicleKind::Motorbike {
                engine_cc: validation::validate_engine_cc(engine_cc)?,
                class,
                abs,
            }),
            VehicleKind::Truck {
                load_capacity,
                class,
                hydraulic_lift,
            } => Ok(VehicleKind::Truck {
                load_capacity: validation::validate_load_capacity(load_capacity)?,
                class,
                hydraulic_lift,
            }),
            car => Ok(car),
        }
    }

    /// One-line description of the variant attributes.
    pub fn details(&self) -> String {
        match self {
            VehicleKind::Car {
                doors,
                fuel,
                transmission,
            } => format!("{} doors, {}, {}", doors, fuel, transmission),
            VehicleKind::Motorbike {
                engine_cc,
                class,
                abs,
            } => format!(
                "{}cc, {}, {}",
                engine_cc,
                class,
                if *abs { "ABS" } else { "no ABS" }
            ),
            VehicleKind::Truck {
                load_capacity,
                class,
                hydraulic_lift,
            } => format!(
                "{:.2}t, {}, {}",
                load_capacity,
                class,
                if *hydraulic_lift { "hydraulic lift" } else { "no lift" }
            ),
        }
    }
}

// =============================================================================
// Vehicle Spec
// =============================================================================

/// Unvalidated input for [`Vehicle::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSpec {
    pub vehicle_id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub daily_rate: Money,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(flatten)]
    pub kind: VehicleKind,
}

// =============================================================================
// Vehicle
// =============================================================================

/// A rentable vehicle.
///
/// Only constructible through [`Vehicle::new`], so every field has passed its
/// validator and the year/rate cross-check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    vehicle_id: String,
    make: String,
    model: String,
    year: i32,
    daily_rate: Money,
    image: String,
    #[serde(flatten)]
    kind: VehicleKind,
    #[serde(skip)]
    ledger: ReservationLedger,
}

impl Vehicle {
    /// Validates `spec` and builds a vehicle with an empty ledger.
    ///
    /// `current_year` drives the year/rate plausibility rules.
    pub fn new(spec: VehicleSpec, current_year: i32) -> ValidationResult<Self> {
        let vehicle_id = validation::validate_identifier("vehicle_id", &spec.vehicle_id)?;
        let make = validation::validate_make(&spec.make)?;
        let model = validation::validate_model(&spec.model)?;
        let year = validation::validate_year(spec.year)?;
        let daily_rate = validation::validate_daily_rate(spec.daily_rate)?;
        let image = validation::normalize_image(spec.image.as_deref());
        let kind = spec.kind.validate()?;

        validation::validate_year_vs_rate(year, daily_rate, current_year)?;

        Ok(Vehicle {
            vehicle_id,
            make,
            model,
            year,
            daily_rate,
            image,
            kind,
            ledger: ReservationLedger::new(),
        })
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    pub fn make(&self) -> &str {
        &self.make
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn daily_rate(&self) -> Money {
        self.daily_rate
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn kind(&self) -> &VehicleKind {
        &self.kind
    }

    pub fn vehicle_type(&self) -> &'static str {
        self.kind.label()
    }

    pub fn ledger(&self) -> &ReservationLedger {
        &self.ledger
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut ReservationLedger {
        &mut self.ledger
    }

    // -------------------------------------------------------------------------
    // Setters (re-validate)
    // -------------------------------------------------------------------------

    pub fn set_make(&mut self, make: &str) -> ValidationResult<()> {
        self.make = validation::validate_make(make)?;
        Ok(())
    }

    pub fn set_model(&mut self, model: &str) -> ValidationResult<()> {
        self.model = validation::validate_model(model)?;
        Ok(())
    }

    pub fn set_year(&mut self, year: i32, current_year: i32) -> ValidationResult<()> {
        let year = validation::validate_year(year)?;
        validation::validate_year_vs_rate(year, self.daily_rate, current_year)?;
        self.year = year;
        Ok(())
    }

    pub fn set_daily_rate(&mut self, rate: Money, current_year: i32) -> ValidationResult<()> {
        let rate = validation::validate_daily_rate(rate)?;
        validation::validate_year_vs_rate(self.year, rate, current_year)?;
        self.daily_rate = rate;
        Ok(())
    }

    pub fn set_image(&mut self, filename: Option<&str>) {
        self.image = validation::normalize_image(filename);
    }

    // -------------------------------------------------------------------------
    // Reservations
    // -------------------------------------------------------------------------

    pub fn is_available(&self, period: &RentalPeriod) -> bool {
        self.ledger.is_available(period)
    }

    /// Books `period`, failing with `VehicleNotAvailable` on overlap.
    pub fn add_reservation(
        &mut self,
        period: RentalPeriod,
        renter_id: &str,
        record_id: &str,
    ) -> RentalResult<()> {
        if self.ledger.add(period, renter_id, record_id) {
            Ok(())
        } else {
            Err(RentalError::VehicleNotAvailable {
                vehicle_id: self.vehicle_id.clone(),
                period: period.to_string(),
            })
        }
    }

    pub fn complete_reservation(
        &mut self,
        period: &RentalPeriod,
        actual_return: Option<NaiveDate>,
    ) -> bool {
        self.ledger.complete(period, actual_return)
    }

    pub fn revert_to_active(&mut self, period: &RentalPeriod) -> bool {
        self.ledger.revert_to_active(period)
    }

    pub fn is_currently_rented(&self) -> bool {
        self.ledger.has_active()
    }

    // -------------------------------------------------------------------------
    // Pricing
    // -------------------------------------------------------------------------

    /// Cost of `period` after the variant premium and then `discount`.
    pub fn calculate_rental_cost(&self, period: &RentalPeriod, discount: Discount) -> Money {
        self.cost_for_days(period.duration_days(), discount)
    }

    /// Same formula for an arbitrary day count (used for return adjustments).
    pub fn cost_for_days(&self, days: i64, discount: Discount) -> Money {
        rental_cost(self.daily_rate, days, self.kind.premium(), discount)
    }
}

impl PartialEq for Vehicle {
    fn eq(&self, other: &Self) -> bool {
        self.vehicle_id == other.vehicle_id
    }
}

impl fmt::Display for Vehicle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} ({}) - {}/day [{}]",
            self.year,
            self.make,
            self.model,
            self.kind.label(),
            self.vehicle_id,
            self.daily_rate,
            if self.is_currently_rented() {
                "Rented"
            } else {
                "Available"
            }
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
