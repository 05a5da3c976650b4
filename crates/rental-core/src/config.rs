//! # Engine Configuration
//!
//! Business knobs for [`RentalEngine`](crate::engine::RentalEngine).
//!
//! Loading these from files or the environment is the application's job; this
//! module only defines the values, their defaults and their validation. The
//! struct is `serde`-ready so an application can embed it in its own config
//! file as an `[engine]` table.
//!
//! ```toml
//! [engine]
//! max_concurrent_rentals = 5
//! min_year = 2000
//! max_year = 2100
//! overdue_surcharge_bps = 10000   # 1.0x the normal daily cost
//! today = "01-12-2025"            # optional, pins the clock
//! ```

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::period::{date_format, PeriodPolicy, DEFAULT_MAX_YEAR, DEFAULT_MIN_YEAR};
use crate::pricing::FULL_BPS;

/// Default cap on active rentals per renter.
pub const MAX_CONCURRENT_RENTALS: usize = 5;

fn default_max_rentals() -> usize {
    MAX_CONCURRENT_RENTALS
}

fn default_min_year() -> i32 {
    DEFAULT_MIN_YEAR
}

fn default_max_year() -> i32 {
    DEFAULT_MAX_YEAR
}

fn default_surcharge() -> u32 {
    FULL_BPS
}

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Active rentals a single renter may hold at once.
    #[serde(default = "default_max_rentals")]
    pub max_concurrent_rentals: usize,

    /// Earliest year a rental period may touch.
    #[serde(default = "default_min_year")]
    pub min_year: i32,

    /// Latest year a rental period may touch.
    #[serde(default = "default_max_year")]
    pub max_year: i32,

    /// Multiplier (bps) on the cost of days past the scheduled end.
    /// 10000 charges late days at the normal rate; 15000 at 1.5x.
    #[serde(default = "default_surcharge")]
    pub overdue_surcharge_bps: u32,

    /// Fixed "today". `None` reads the local clock on every operation.
    #[serde(
        default,
        with = "date_format::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub today: Option<NaiveDate>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_concurrent_rentals: MAX_CONCURRENT_RENTALS,
            min_year: DEFAULT_MIN_YEAR,
            max_year: DEFAULT_MAX_YEAR,
            overdue_surcharge_bps: FULL_BPS,
            today: None,
        }
    }
}

impl EngineConfig {
    /// Defaults with the clock pinned to `today`.
    pub fn pinned(today: NaiveDate) -> Self {
        EngineConfig {
            today: Some(today),
            ..Self::default()
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Policy for new bookings.
    pub fn booking_policy(&self) -> PeriodPolicy {
        PeriodPolicy::strict(self.today()).with_year_range(self.min_year, self.max_year)
    }

    /// Policy for back-dated or historical periods.
    pub fn historical_policy(&self) -> PeriodPolicy {
        PeriodPolicy::permissive(self.today()).with_year_range(self.min_year, self.max_year)
    }

    pub fn validate(&self) -> ValidationResult<()> {
        if self.max_concurrent_rentals == 0 {
            return Err(ValidationError::field(
                "max_concurrent_rentals",
                "0",
                "must be greater than 0",
            ));
        }
        if self.min_year > self.max_year {
            return Err(ValidationError::field(
                "min_year",
                self.min_year.to_string(),
                format!("must not exceed max_year {}", self.max_year),
            ));
        }
        if self.overdue_surcharge_bps < FULL_BPS {
            return Err(ValidationError::field(
                "overdue_surcharge_bps",
                self.overdue_surcharge_bps.to_string(),
                "must be at least 10000 (late days never cost less than normal days)",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.max_concurrent_rentals, 5);
        assert_eq!(config.overdue_surcharge_bps, 10_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_pinned_today() {
        let day = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        let config = EngineConfig::pinned(day);
        assert_eq!(config.today(), day);
        assert_eq!(config.booking_policy().today, day);
        assert!(config.historical_policy().allow_past);
    }

    #[test]
    fn test_validation() {
        let mut config = EngineConfig::default();
        config.max_concurrent_rentals = 0;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.min_year = 2200;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.overdue_surcharge_bps = 5_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"max_concurrent_rentals": 2, "today": "01-12-2025"}"#).unwrap();
        assert_eq!(config.max_concurrent_rentals, 2);
        assert_eq!(config.max_year, 2100);
        assert_eq!(config.today, NaiveDate::from_ymd_opt(2025, 12, 1));
    }
}
