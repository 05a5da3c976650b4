//! # Rental Period
//!
//! A validated, inclusive calendar-date range.
//!
//! ## Overlap Rule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Closed intervals [start, end] overlap unless one ends before the       │
//! │  other begins:                                                          │
//! │                                                                         │
//! │      overlaps = !(self.end < other.start || other.end < self.start)     │
//! │                                                                         │
//! │   01-01 ─────────── 05-01                                               │
//! │                  03-01 ─────────── 08-01      overlap (03..05)          │
//! │                                                                         │
//! │   01-01 ─────────── 05-01                                               │
//! │                           06-01 ────── 09-01  no overlap                │
//! │                                                                         │
//! │   01-01 ─────────── 05-01                                               │
//! │                     05-01 ────── 09-01        overlap (same day)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Date Format
//! Every externally visible date is `DD-MM-YYYY`. Comparisons always use the
//! parsed [`NaiveDate`], never the string.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{ValidationError, ValidationResult};

/// Canonical textual date format (`31-12-2026`).
pub const DATE_FORMAT: &str = "%d-%m-%Y";

/// Earliest year a rental period may touch by default.
pub const DEFAULT_MIN_YEAR: i32 = 2000;

/// Latest year a rental period may touch by default.
pub const DEFAULT_MAX_YEAR: i32 = 2100;

// =============================================================================
// Date Parsing
// =============================================================================

/// Parses a `DD-MM-YYYY` date.
///
/// Rejects anything that is not exactly two digits, two digits and four
/// digits separated by dashes, and calendar dates that do not exist.
///
/// ```rust
/// use rental_core::period::parse_date;
///
/// assert!(parse_date("01-01-2026").is_ok());
/// assert!(parse_date("2026-01-01").is_err());
/// assert!(parse_date("31-02-2026").is_err());
/// ```
pub fn parse_date(input: &str) -> ValidationResult<NaiveDate> {
    let raw = input.trim();
    let parts: Vec<&str> = raw.split('-').collect();

    let well_formed = parts.len() == 3
        && parts[0].len() == 2
        && parts[1].len() == 2
        && parts[2].len() == 4
        && parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit()));
    if !well_formed {
        return Err(ValidationError::period(
            raw,
            "date must be in DD-MM-YYYY format",
        ));
    }

    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| ValidationError::period(raw, "day does not exist in specified month"))
}

/// Renders a date as `DD-MM-YYYY`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

// =============================================================================
// Period Policy
// =============================================================================

/// The rules a period is checked against when it is built or edited.
///
/// `today` is injected rather than read from the clock so the same inputs
/// always validate the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeriodPolicy {
    pub min_year: i32,
    pub max_year: i32,
    /// When false, a start date before `today` is rejected.
    pub allow_past: bool,
    pub today: NaiveDate,
}

impl PeriodPolicy {
    /// New bookings: default year range, no past start dates.
    pub fn strict(today: NaiveDate) -> Self {
        PeriodPolicy {
            min_year: DEFAULT_MIN_YEAR,
            max_year: DEFAULT_MAX_YEAR,
            allow_past: false,
            today,
        }
    }

    /// Historical reconstruction: same year range, past dates allowed.
    pub fn permissive(today: NaiveDate) -> Self {
        PeriodPolicy {
            allow_past: true,
            ..PeriodPolicy::strict(today)
        }
    }

    pub fn with_year_range(mut self, min_year: i32, max_year: i32) -> Self {
        self.min_year = min_year;
        self.max_year = max_year;
        self
    }

    fn check_year(&self, date: NaiveDate) -> ValidationResult<()> {
        let year = date.year();
        if year < self.min_year || year > self.max_year {
            return Err(ValidationError::period(
                format_date(date),
                format!("year must be between {} and {}", self.min_year, self.max_year),
            ));
        }
        Ok(())
    }

    fn check_not_past(&self, date: NaiveDate) -> ValidationResult<()> {
        if !self.allow_past && date < self.today {
            return Err(ValidationError::period(
                format_date(date),
                "start date cannot be in the past",
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Rental Period
// =============================================================================

/// An inclusive date range with `start <= end`.
///
/// Field order matters: the derived `Ord` sorts by start date, then end date,
/// which is the order reservation ledgers are kept in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RentalPeriod {
    start: NaiveDate,
    end: NaiveDate,
}

impl RentalPeriod {
    /// Builds a period from two dates under `policy`.
    ///
    /// ## Errors
    /// `InvalidPeriod` when a year is out of range, `start > end`, or the
    /// start is in the past and the policy does not allow it.
    pub fn new(start: NaiveDate, end: NaiveDate, policy: &PeriodPolicy) -> ValidationResult<Self> {
        policy.check_year(start)?;
        policy.check_year(end)?;
        if start > end {
            return Err(ValidationError::period(
                format_date(start),
                format!("start date must not be after end date {}", format_date(end)),
            ));
        }
        policy.check_not_past(start)?;
        Ok(RentalPeriod { start, end })
    }

    /// Builds a period from two `DD-MM-YYYY` strings.
    ///
    /// ```rust
    /// use chrono::NaiveDate;
    /// use rental_core::period::{PeriodPolicy, RentalPeriod};
    ///
    /// let today = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
    /// let period = RentalPeriod::parse("01-01-2026", "05-01-2026", &PeriodPolicy::strict(today)).unwrap();
    /// assert_eq!(period.duration_days(), 5);
    /// ```
    pub fn parse(start: &str, end: &str, policy: &PeriodPolicy) -> ValidationResult<Self> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        RentalPeriod::new(start, end, policy)
    }

    /// Builds a period checking only `start <= end`.
    ///
    /// Used when reading back records that were valid when written.
    pub fn from_dates(start: NaiveDate, end: NaiveDate) -> ValidationResult<Self> {
        if start > end {
            return Err(ValidationError::period(
                format_date(start),
                format!("start date must not be after end date {}", format_date(end)),
            ));
        }
        Ok(RentalPeriod { start, end })
    }

    /// The period covering both dates, whichever order they come in.
    pub(crate) fn spanning(a: NaiveDate, b: NaiveDate) -> Self {
        RentalPeriod {
            start: a.min(b),
            end: a.max(b),
        }
    }

    #[inline]
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    #[inline]
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Moves the start date, re-validating against the current end.
    pub fn set_start(&mut self, start: NaiveDate, policy: &PeriodPolicy) -> ValidationResult<()> {
        *self = RentalPeriod::new(start, self.end, policy)?;
        Ok(())
    }

    /// Moves the end date, re-validating against the current start.
    pub fn set_end(&mut self, end: NaiveDate, policy: &PeriodPolicy) -> ValidationResult<()> {
        // The start is already accepted; only the ordering and year range matter here.
        let relaxed = PeriodPolicy {
            allow_past: true,
            ..*policy
        };
        *self = RentalPeriod::new(self.start, end, &relaxed)?;
        Ok(())
    }

    /// Inclusive day count; a single-day period is 1.
    #[inline]
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// True iff the two closed intervals share at least one day.
    #[inline]
    pub fn overlaps(&self, other: &RentalPeriod) -> bool {
        !(self.end < other.start || other.end < self.start)
    }

    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The same period cut short (or extended) to end on `end`.
    pub fn with_end(&self, end: NaiveDate) -> ValidationResult<Self> {
        RentalPeriod::from_dates(self.start, end)
    }
}

impl fmt::Display for RentalPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", format_date(self.start), format_date(self.end))
    }
}

// =============================================================================
// Serde
// =============================================================================

#[derive(Serialize, Deserialize)]
struct PeriodRepr {
    #[serde(with = "date_format")]
    start: NaiveDate,
    #[serde(with = "date_format")]
    end: NaiveDate,
}

impl Serialize for RentalPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        PeriodRepr {
            start: self.start,
            end: self.end,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RentalPeriod {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = PeriodRepr::deserialize(deserializer)?;
        RentalPeriod::from_dates(repr.start, repr.end).map_err(serde::de::Error::custom)
    }
}

/// `#[serde(with = "date_format")]` adapter for `DD-MM-YYYY` dates.
pub mod date_format {
    use super::{format_date, parse_date};
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format_date(*date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_date(&raw).map_err(serde::de::Error::custom)
    }

    /// Same adapter for `Option<NaiveDate>`.
    pub mod option {
        use super::super::{format_date, parse_date};
        use chrono::NaiveDate;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            date: &Option<NaiveDate>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match date {
                Some(d) => serializer.serialize_some(&format_date(*d)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveDate>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| parse_date(&raw).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
