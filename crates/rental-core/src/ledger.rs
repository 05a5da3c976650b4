//! # Reservation Ledgers
//!
//! Per-vehicle and per-renter views of the bookings that touch them.
//!
//! ## Two Views, One Truth
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   RentalEngine.records  ◄── authoritative, persisted                    │
//! │          │                                                              │
//! │          ├──► Vehicle.ledger   (ReservationLedger)                      │
//! │          │      every period the vehicle was ever booked for            │
//! │          │      answers: is_available(period)?                          │
//! │          │                                                              │
//! │          └──► Renter.ledger    (RentalLedger)                           │
//! │                 every rental the renter ever made                       │
//! │                 answers: how many active? total spent?                  │
//! │                                                                         │
//! │   Ledgers are never persisted. They are rebuilt from the records on     │
//! │   load and checked against them by verify_consistency().                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Completed entries are never removed: they keep the original period for
//! audit and block re-booking only up to their actual return date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::money::Money;
use crate::period::RentalPeriod;

// =============================================================================
// Entry Status
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Active,
    Completed,
}

impl fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryStatus::Active => write!(f, "active"),
            EntryStatus::Completed => write!(f, "completed"),
        }
    }
}

// =============================================================================
// Vehicle Side
// =============================================================================

/// One booking of a vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationEntry {
    pub period: RentalPeriod,
    pub renter_id: String,
    pub record_id: String,
    pub status: EntryStatus,
    /// Set when the entry completes; defaults to the scheduled end.
    pub actual_return: Option<NaiveDate>,
}

impl ReservationEntry {
    /// The dates this entry actually blocks.
    ///
    /// Active entries block their whole period. Completed entries block from
    /// the start up to the actual return, so an early return frees the
    /// remaining days and a late return keeps the extra days blocked.
    pub fn blocked_period(&self) -> RentalPeriod {
        match (self.status, self.actual_return) {
            (EntryStatus::Completed, Some(returned)) => {
                self.period.with_end(returned).unwrap_or(self.period)
            }
            _ => self.period,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == EntryStatus::Active
    }
}

/// A vehicle's bookings, kept sorted by period start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationLedger {
    entries: Vec<ReservationEntry>,
}

impl ReservationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ReservationEntry] {
        &self.entries
    }

    pub fn active_entries(&self) -> impl Iterator<Item = &ReservationEntry> {
        self.entries.iter().filter(|e| e.is_active())
    }

    /// True iff no entry's blocked dates overlap `period`.
    pub fn is_available(&self, period: &RentalPeriod) -> bool {
        !self
            .entries
            .iter()
            .any(|entry| entry.blocked_period().overlaps(period))
    }

    /// Appends an active entry. Returns false (and changes nothing) when the
    /// period is not available.
    pub fn add(&mut self, period: RentalPeriod, renter_id: &str, record_id: &str) -> bool {
        if !self.is_available(&period) {
            return false;
        }
        self.insert(ReservationEntry {
            period,
            renter_id: renter_id.to_string(),
            record_id: record_id.to_string(),
            status: EntryStatus::Active,
            actual_return: None,
        });
        true
    }

    /// Inserts an entry without the availability check (ledger rebuild).
    pub(crate) fn insert(&mut self, entry: ReservationEntry) {
        let at = self.entries.partition_point(|e| e.period <= entry.period);
        self.entries.insert(at, entry);
    }

    /// Flips the active entry for `period` to completed.
    pub fn complete(&mut self, period: &RentalPeriod, actual_return: Option<NaiveDate>) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|e| e.is_active() && e.period == *period)
        {
            Some(entry) => {
                entry.status = EntryStatus::Completed;
                entry.actual_return = Some(actual_return.unwrap_or(period.end()));
                true
            }
            None => false,
        }
    }

    /// Undoes [`complete`](Self::complete) for `period`.
    pub fn revert_to_active(&mut self, period: &RentalPeriod) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|e| !e.is_active() && e.period == *period)
        {
            Some(entry) => {
                entry.status = EntryStatus::Active;
                entry.actual_return = None;
                true
            }
            None => false,
        }
    }

    /// Removes the entry created for `record_id` (rollback of `add`).
    pub fn remove(&mut self, record_id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.record_id != record_id);
        self.entries.len() != before
    }

    pub fn has_active(&self) -> bool {
        self.entries.iter().any(ReservationEntry::is_active)
    }
}

// =============================================================================
// Renter Side
// =============================================================================

/// One rental as seen from the renter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RentalEntry {
    pub record_id: String,
    pub vehicle_id: String,
    pub period: RentalPeriod,
    pub status: EntryStatus,
    /// Rental cost while active, final cost once completed.
    pub cost: Money,
    pub actual_return: Option<NaiveDate>,
}

impl RentalEntry {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == EntryStatus::Active
    }
}

/// A renter's rental history in booking order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RentalLedger {
    entries: Vec<RentalEntry>,
}

impl RentalLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every rental, active or not.
    pub fn history(&self) -> &[RentalEntry] {
        &self.entries
    }

    pub fn current(&self) -> impl Iterator<Item = &RentalEntry> {
        self.entries.iter().filter(|e| e.is_active())
    }

    pub fn active_count(&self) -> usize {
        self.current().count()
    }

    /// True when an active rental of `vehicle_id` already overlaps `period`.
    pub fn holds(&self, vehicle_id: &str, period: &RentalPeriod) -> bool {
        self.current()
            .any(|e| e.vehicle_id == vehicle_id && e.period.overlaps(period))
    }

    pub(crate) fn push(&mut self, entry: RentalEntry) {
        self.entries.push(entry);
    }

    /// Flips the active rental of `vehicle_id` for `period` to completed.
    pub fn complete(
        &mut self,
        vehicle_id: &str,
        period: &RentalPeriod,
        actual_return: NaiveDate,
        final_cost: Money,
    ) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|e| e.is_active() && e.vehicle_id == vehicle_id && e.period == *period)
        {
            Some(entry) => {
                entry.status = EntryStatus::Completed;
                entry.actual_return = Some(actual_return);
                entry.cost = final_cost;
                true
            }
            None => false,
        }
    }

    /// Undoes [`complete`](Self::complete), restoring the booked cost.
    pub fn revert_to_active(&mut self, record_id: &str, booked_cost: Money) -> bool {
        match self
            .entries
            .iter_mut()
            .find(|e| !e.is_active() && e.record_id == record_id)
        {
            Some(entry) => {
                entry.status = EntryStatus::Active;
                entry.actual_return = None;
                entry.cost = booked_cost;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, record_id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.record_id != record_id);
        self.entries.len() != before
    }

    pub fn total_spent(&self) -> Money {
        self.entries.iter().map(|e| e.cost).sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32, month: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, month, day).unwrap()
    }

    fn p(start: u32, end: u32) -> RentalPeriod {
        RentalPeriod::from_dates(d(start, 1), d(end, 1)).unwrap()
    }

    #[test]
    fn test_add_rejects_overlap() {
        let mut ledger = ReservationLedger::new();
        assert!(ledger.add(p(1, 5), "I001", "R00001"));
        assert!(!ledger.add(p(3, 8), "C001", "R00002"));
        assert!(ledger.add(p(6, 9), "C001", "R00003"));
        assert_eq!(ledger.entries().len(), 2);
        assert!(ledger.has_active());
    }

    #[test]
    fn test_entries_sorted_by_start() {
        let mut ledger = ReservationLedger::new();
        ledger.add(p(20, 25), "I001", "R00001");
        ledger.add(p(1, 5), "I001", "R00002");
        ledger.add(p(10, 12), "I001", "R00003");
        let starts: Vec<_> = ledger.entries().iter().map(|e| e.period.start()).collect();
        assert_eq!(starts, vec![d(1, 1), d(10, 1), d(20, 1)]);
    }

    #[test]
    fn test_early_return_frees_remaining_days() {
        let mut ledger = ReservationLedger::new();
        ledger.add(p(1, 10), "I001", "R00001");
        assert!(ledger.complete(&p(1, 10), Some(d(6, 1))));

        assert!(!ledger.is_available(&p(6, 6)));
        assert!(ledger.is_available(&p(7, 10)));
        assert!(!ledger.has_active());
        // The original period is kept for audit.
        assert_eq!(ledger.entries()[0].period, p(1, 10));
    }

    #[test]
    fn test_late_return_keeps_extra_days_blocked() {
        let mut ledger = ReservationLedger::new();
        ledger.add(p(1, 5), "I001", "R00001");
        ledger.complete(&p(1, 5), Some(d(8, 1)));
        assert!(!ledger.is_available(&p(7, 9)));
        assert!(ledger.is_available(&p(9, 12)));
    }

    #[test]
    fn test_complete_defaults_to_scheduled_end() {
        let mut ledger = ReservationLedger::new();
        ledger.add(p(1, 5), "I001", "R00001");
        assert!(ledger.complete(&p(1, 5), None));
        assert_eq!(ledger.entries()[0].actual_return, Some(d(5, 1)));
        assert!(!ledger.complete(&p(1, 5), None));
    }

    #[test]
    fn test_revert_and_remove() {
        let mut ledger = ReservationLedger::new();
        ledger.add(p(1, 5), "I001", "R00001");
        ledger.complete(&p(1, 5), None);
        assert!(ledger.revert_to_active(&p(1, 5)));
        assert!(ledger.has_active());
        assert_eq!(ledger.entries()[0].actual_return, None);
        assert!(!ledger.revert_to_active(&p(1, 5)));

        assert!(ledger.remove("R00001"));
        assert!(!ledger.remove("R00001"));
        assert!(ledger.is_available(&p(1, 5)));
    }

    #[test]
    fn test_rental_ledger() {
        let mut ledger = RentalLedger::new();
        ledger.push(RentalEntry {
            record_id: "R00001".to_string(),
            vehicle_id: "CAR001".to_string(),
            period: p(1, 5),
            status: EntryStatus::Active,
            cost: Money::from_cents(32500),
            actual_return: None,
        });
        assert_eq!(ledger.active_count(), 1);
        assert!(ledger.holds("CAR001", &p(5, 6)));
        assert!(!ledger.holds("CAR002", &p(1, 5)));

        assert!(ledger.complete("CAR001", &p(1, 5), d(3, 1), Money::from_cents(19500)));
        assert_eq!(ledger.active_count(), 0);
        assert_eq!(ledger.history().len(), 1);
        assert_eq!(ledger.total_spent().cents(), 19500);
        assert!(!ledger.complete("CAR001", &p(1, 5), d(3, 1), Money::zero()));

        assert!(ledger.revert_to_active("R00001", Money::from_cents(32500)));
        assert_eq!(ledger.active_count(), 1);
        assert_eq!(ledger.total_spent().cents(), 32500);
        assert!(ledger.remove("R00001"));
        assert!(ledger.history().is_empty());
    }
}
