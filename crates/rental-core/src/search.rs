//! # Vehicle Search
//!
//! Narrowing the fleet listing by type, brand, price band and free dates.
//!
//! ## Filter Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every criterion that is set must match (AND). Unset criteria match     │
//! │  everything, so VehicleFilter::default() returns the whole fleet.       │
//! │                                                                         │
//! │  vehicle_type  exact variant                                            │
//! │  brand         case-insensitive substring of make ("toy" → Toyota)     │
//! │  price         daily rate band                                          │
//! │                  0-50    rate ≤ $50.00                                  │
//! │                  51-100  $50.00 < rate ≤ $100.00                        │
//! │                  101+    rate > $100.00                                 │
//! │  available     no blocked dates overlap the period                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;
use crate::period::RentalPeriod;
use crate::vehicle::{Vehicle, VehicleType};

const BUDGET_CEILING: Money = Money::from_cents(5_000);
const STANDARD_CEILING: Money = Money::from_cents(10_000);

// =============================================================================
// Price Band
// =============================================================================

/// Daily rate bucket used by the fleet listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceBand {
    #[serde(rename = "0-50")]
    Budget,
    #[serde(rename = "51-100")]
    Standard,
    #[serde(rename = "101+")]
    Premium,
}

impl PriceBand {
    pub const ALL: &'static [PriceBand] = &[PriceBand::Budget, PriceBand::Standard, PriceBand::Premium];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceBand::Budget => "0-50",
            PriceBand::Standard => "51-100",
            PriceBand::Premium => "101+",
        }
    }

    /// The band a daily rate falls into. Bands are contiguous, so every rate
    /// has exactly one.
    pub fn of(rate: Money) -> PriceBand {
        if rate <= BUDGET_CEILING {
            PriceBand::Budget
        } else if rate <= STANDARD_CEILING {
            PriceBand::Standard
        } else {
            PriceBand::Premium
        }
    }

    #[inline]
    pub fn contains(&self, rate: Money) -> bool {
        PriceBand::of(rate) == *self
    }
}

impl fmt::Display for PriceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceBand {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        PriceBand::ALL
            .iter()
            .copied()
            .find(|band| band.as_str() == wanted)
            .ok_or_else(|| {
                ValidationError::field("price", wanted, "must be one of: 0-50, 51-100, 101+")
            })
    }
}

// =============================================================================
// Vehicle Filter
// =============================================================================

/// Search criteria for [`RentalEngine::search_vehicles`](crate::RentalEngine::search_vehicles).
///
/// ## Example
/// ```rust
/// use rental_core::search::{PriceBand, VehicleFilter};
/// use rental_core::vehicle::VehicleType;
///
/// let filter = VehicleFilter::new()
///     .vehicle_type(VehicleType::Car)
///     .brand("toy")
///     .price(PriceBand::Standard);
/// assert!(!filter.is_empty());
/// assert!(VehicleFilter::default().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleFilter {
    pub vehicle_type: Option<VehicleType>,
    /// Lower-cased, trimmed; empty means no brand filter.
    brand: Option<String>,
    pub price: Option<PriceBand>,
    pub available: Option<RentalPeriod>,
}

impl VehicleFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vehicle_type(mut self, vehicle_type: VehicleType) -> Self {
        self.vehicle_type = Some(vehicle_type);
        self
    }

    /// Matches makes containing `brand`, ignoring case. Blank input clears
    /// the criterion.
    pub fn brand(mut self, brand: &str) -> Self {
        let brand = brand.trim().to_lowercase();
        self.brand = (!brand.is_empty()).then_some(brand);
        self
    }

    pub fn price(mut self, band: PriceBand) -> Self {
        self.price = Some(band);
        self
    }

    pub fn available(mut self, period: RentalPeriod) -> Self {
        self.available = Some(period);
        self
    }

    pub fn brand_query(&self) -> Option<&str> {
        self.brand.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicle_type.is_none()
            && self.brand.is_none()
            && self.price.is_none()
            && self.available.is_none()
    }

    pub fn matches(&self, vehicle: &Vehicle) -> bool {
        if let Some(wanted) = self.vehicle_type {
            if vehicle.kind().vehicle_type() != wanted {
                return false;
            }
        }
        if let Some(brand) = &self.brand {
            if !vehicle.make().to_lowercase().contains(brand.as_str()) {
                return false;
            }
        }
        if let Some(band) = self.price {
            if !band.contains(vehicle.daily_rate()) {
                return false;
            }
        }
        match &self.available {
            Some(period) => vehicle.is_available(period),
            None => true,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_edges() {
        assert_eq!(PriceBand::of(Money::from_cents(5_000)), PriceBand::Budget);
        assert_eq!(PriceBand::of(Money::from_cents(5_001)), PriceBand::Standard);
        assert_eq!(PriceBand::of(Money::from_cents(10_000)), PriceBand::Standard);
        assert_eq!(PriceBand::of(Money::from_cents(10_001)), PriceBand::Premium);
    }

    #[test]
    fn test_band_parsing() {
        assert_eq!("51-100".parse::<PriceBand>().unwrap(), PriceBand::Standard);
        assert_eq!(" 101+ ".parse::<PriceBand>().unwrap(), PriceBand::Premium);
        assert!("cheap".parse::<PriceBand>().is_err());
    }

    #[test]
    fn test_blank_brand_is_no_filter() {
        assert!(VehicleFilter::new().brand("   ").is_empty());
        assert_eq!(VehicleFilter::new().brand(" ToY ").brand_query(), Some("toy"));
    }
}
