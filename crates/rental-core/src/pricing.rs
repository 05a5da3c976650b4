//! # Pricing Module
//!
//! Basis-point rates used by the cost formula.
//!
//! ## The Cost Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   base     = duration_days × daily_rate                                 │
//! │   premium  = 10000 + Σ variant surcharges (bps)   ← Motorbike only      │
//! │   discount = renter policy (bps, clamped 0..=10000)                     │
//! │                                                                         │
//! │   cost     = base × premium/10000 × (10000 - discount)/10000            │
//! │              rounded half-up to the cent, once                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why Basis Points?
//! 1 basis point = 0.01% = 1/10000.
//! 1500 bps = 15% (the corporate discount). Keeping rates integral means the
//! cost of a rental never depends on float rounding.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;

/// Basis points representing 100%.
pub const FULL_BPS: u32 = 10_000;

// =============================================================================
// Discount
// =============================================================================

/// A discount fraction in basis points, always within 0..=10000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Discount(u32);

impl Discount {
    /// Creates a discount from basis points, clamping anything above 100%.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        if bps > FULL_BPS {
            Discount(FULL_BPS)
        } else {
            Discount(bps)
        }
    }

    /// Creates a discount from a fraction, clamped into `[0, 1]`.
    ///
    /// ```rust
    /// use rental_core::pricing::Discount;
    ///
    /// assert_eq!(Discount::from_fraction(0.15).bps(), 1500);
    /// assert_eq!(Discount::from_fraction(-0.5).bps(), 0);
    /// assert_eq!(Discount::from_fraction(3.0).bps(), 10_000);
    /// ```
    pub fn from_fraction(fraction: f64) -> Self {
        if fraction.is_nan() || fraction <= 0.0 {
            return Discount(0);
        }
        let bps = (fraction * FULL_BPS as f64).round();
        if bps >= FULL_BPS as f64 {
            Discount(FULL_BPS)
        } else {
            Discount(bps as u32)
        }
    }

    #[inline]
    pub const fn none() -> Self {
        Discount(0)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// The fraction in `[0, 1]` (for display only).
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.0 as f64 / FULL_BPS as f64
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for Discount {
    fn default() -> Self {
        Discount::none()
    }
}

impl From<u32> for Discount {
    fn from(bps: u32) -> Self {
        Discount::from_bps(bps)
    }
}

impl From<Discount> for u32 {
    fn from(discount: Discount) -> Self {
        discount.0
    }
}

impl fmt::Display for Discount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
        }
    }
}

// =============================================================================
// Premium
// =============================================================================

/// A cost multiplier in basis points, `10000` meaning "no premium".
///
/// Surcharges are additive: a 1000cc sport bike with ABS is
/// `10000 + 2500 + 2000 + 500 = 15000` (×1.50).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Premium(u32);

impl Premium {
    #[inline]
    pub const fn none() -> Self {
        Premium(FULL_BPS)
    }

    /// Adds a surcharge expressed in basis points.
    #[inline]
    pub const fn with_surcharge(self, bps: u32) -> Self {
        Premium(self.0 + bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

impl Default for Premium {
    fn default() -> Self {
        Premium::none()
    }
}

// =============================================================================
// Cost
// =============================================================================

/// Applies the cost formula to `days` of rental at `daily_rate`.
///
/// ```rust
/// use rental_core::money::Money;
/// use rental_core::pricing::{rental_cost, Discount, Premium};
///
/// let rate = Money::from_cents(6500);
/// assert_eq!(rental_cost(rate, 5, Premium::none(), Discount::none()).cents(), 32500);
/// assert_eq!(rental_cost(rate, 5, Premium::none(), Discount::from_bps(1500)).cents(), 27625);
/// ```
pub fn rental_cost(daily_rate: Money, days: i64, premium: Premium, discount: Discount) -> Money {
    daily_rate
        .multiply_days(days.max(0))
        .apply_adjustments(premium.bps(), discount.bps())
        .clamp_non_negative()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discount_clamps() {
        assert_eq!(Discount::from_bps(12_000).bps(), FULL_BPS);
        assert_eq!(Discount::from_fraction(f64::NAN).bps(), 0);
        assert_eq!(Discount::from_fraction(0.10).bps(), 1000);
        assert!((Discount::from_bps(1500).fraction() - 0.15).abs() < f64::EPSILON);
    }

    #[test]
    fn test_discount_display() {
        assert_eq!(Discount::from_bps(1500).to_string(), "15%");
        assert_eq!(Discount::from_bps(1250).to_string(), "12.50%");
        assert_eq!(Discount::none().to_string(), "0%");
    }

    #[test]
    fn test_discount_serde_as_bps() {
        let json = serde_json::to_string(&Discount::from_bps(1000)).unwrap();
        assert_eq!(json, "1000");
        let back: Discount = serde_json::from_str("99999").unwrap();
        assert_eq!(back.bps(), FULL_BPS);
    }

    #[test]
    fn test_premium_stacks() {
        let premium = Premium::none()
            .with_surcharge(2500)
            .with_surcharge(2000)
            .with_surcharge(500);
        assert_eq!(premium.bps(), 15_000);
    }

    #[test]
    fn test_rental_cost() {
        let rate = Money::from_cents(6500);
        assert_eq!(rental_cost(rate, 5, Premium::none(), Discount::none()).cents(), 32500);
        assert_eq!(
            rental_cost(rate, 5, Premium::none(), Discount::from_bps(1500)).cents(),
            27625
        );
        // Full discount never goes negative.
        assert!(rental_cost(rate, 5, Premium::none(), Discount::from_bps(FULL_BPS)).is_zero());
        assert!(rental_cost(rate, 0, Premium::none(), Discount::none()).is_zero());
    }

    #[test]
    fn test_cost_does_not_overflow() {
        let rate = Money::from_cents(1_000_000_000_000_000_000);
        let cost = rental_cost(rate, 100, Premium::none(), Discount::none());
        assert_eq!(cost.cents(), i64::MAX);

        // The largest accepted rate over the longest possible period fits easily.
        let max = crate::validation::MAX_DAILY_RATE;
        let days = 101 * 366;
        let premium = Premium::none().with_surcharge(5_000);
        let cost = rental_cost(max, days, premium, Discount::none());
        assert_eq!(cost.cents(), max.cents() * days * 3 / 2);
    }
}
