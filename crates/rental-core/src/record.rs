//! # Rental Records
//!
//! The audit trail: one record per booking, never deleted.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌─────────┐  rent ok   ┌────────┐  return (early/on-time)  ┌───────────┐
//! │   │ Pending │ ─────────► │ Active │ ───────────────────────► │ Completed │
//! │   └────┬────┘            └───┬─┬──┘                          └───────────┘
//! │        │                     │ │   return late / sweep       ┌───────────┐
//! │        │                     │ └───────────────────────────► │  Overdue  │
//! │        │                     │                               └───────────┘
//! │        │   cancel            │   cancel                      ┌───────────┐
//! │        └─────────────────────┴─────────────────────────────► │ Cancelled │
//! │                                                              └───────────┘
//! │                                                                         │
//! │   Transitions only move right. An Overdue record may still gain         │
//! │   return fields when the vehicle finally comes back.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{RentalError, RentalResult};
use crate::money::Money;
use crate::period::{date_format, format_date, RentalPeriod};
use crate::pricing::Discount;

/// Renders the monotonic counter as a record id (`R00042`).
pub fn format_record_id(counter: u64) -> String {
    format!("R{:05}", counter)
}

/// The counter behind a record id, `None` for ids not of the `R<digits>` form.
pub fn parse_record_id(record_id: &str) -> Option<u64> {
    record_id
        .strip_prefix('R')
        .filter(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
        .and_then(|digits| digits.parse().ok())
}

// =============================================================================
// Status Enums
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Pending,
    Active,
    Completed,
    Cancelled,
    Overdue,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Pending => "pending",
            RecordStatus::Active => "active",
            RecordStatus::Completed => "completed",
            RecordStatus::Cancelled => "cancelled",
            RecordStatus::Overdue => "overdue",
        }
    }

    /// Whether the vehicle is still out (or booked) under this status.
    pub fn holds_vehicle(&self) -> bool {
        matches!(self, RecordStatus::Active | RecordStatus::Overdue)
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a rental ended relative to its scheduled end date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReturnType {
    #[serde(rename = "early")]
    Early,
    #[serde(rename = "on-time")]
    OnTime,
    #[serde(rename = "overdue")]
    Overdue,
}

impl ReturnType {
    /// Classifies `actual` against the scheduled `end`.
    pub fn classify(actual: NaiveDate, end: NaiveDate) -> Self {
        match actual.cmp(&end) {
            std::cmp::Ordering::Less => ReturnType::Early,
            std::cmp::Ordering::Equal => ReturnType::OnTime,
            std::cmp::Ordering::Greater => ReturnType::Overdue,
        }
    }
}

impl fmt::Display for ReturnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReturnType::Early => write!(f, "early"),
            ReturnType::OnTime => write!(f, "on-time"),
            ReturnType::Overdue => write!(f, "overdue"),
        }
    }
}

// =============================================================================
// Rental Record
// =============================================================================

/// A single booking. Identity is `record_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentalRecord {
    record_id: String,
    vehicle_id: String,
    renter_id: String,
    #[serde(with = "date_format")]
    start_date: NaiveDate,
    #[serde(with = "date_format")]
    end_date: NaiveDate,
    rental_cost: Money,
    discount_applied: Discount,
    status: RecordStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default, with = "date_format::option", skip_serializing_if = "Option::is_none")]
    actual_return_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    final_cost: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    return_type: Option<ReturnType>,
}

impl RentalRecord {
    /// A fresh `Pending` record.
    pub fn new(
        record_id: String,
        vehicle_id: &str,
        renter_id: &str,
        period: RentalPeriod,
        rental_cost: Money,
        discount_applied: Discount,
    ) -> Self {
        let now = Utc::now();
        RentalRecord {
            record_id,
            vehicle_id: vehicle_id.to_string(),
            renter_id: renter_id.to_string(),
            start_date: period.start(),
            end_date: period.end(),
            rental_cost: rental_cost.clamp_non_negative(),
            discount_applied,
            status: RecordStatus::Pending,
            created_at: now,
            updated_at: now,
            actual_return_date: None,
            final_cost: None,
            return_type: None,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    pub fn renter_id(&self) -> &str {
        &self.renter_id
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// The scheduled period.
    pub fn period(&self) -> RentalPeriod {
        RentalPeriod::spanning(self.start_date, self.end_date)
    }

    pub fn rental_cost(&self) -> Money {
        self.rental_cost
    }

    pub fn discount_applied(&self) -> Discount {
        self.discount_applied
    }

    pub fn status(&self) -> RecordStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn actual_return_date(&self) -> Option<NaiveDate> {
        self.actual_return_date
    }

    pub fn final_cost(&self) -> Option<Money> {
        self.final_cost
    }

    pub fn return_type(&self) -> Option<ReturnType> {
        self.return_type
    }

    /// Final cost when the rental has been returned, otherwise the booked cost.
    pub fn revenue(&self) -> Money {
        self.final_cost.unwrap_or(self.rental_cost)
    }

    pub fn is_returned(&self) -> bool {
        self.actual_return_date.is_some()
    }

    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    pub fn actual_duration_days(&self) -> Option<i64> {
        self.actual_return_date
            .map(|returned| (returned - self.start_date).num_days() + 1)
    }

    // -------------------------------------------------------------------------
    // Transitions
    // -------------------------------------------------------------------------

    fn transition(&mut self, allowed_from: &[RecordStatus], to: RecordStatus) -> RentalResult<()> {
        if !allowed_from.contains(&self.status) {
            return Err(RentalError::InvalidStatusTransition {
                record_id: self.record_id.clone(),
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn mark_active(&mut self) -> RentalResult<()> {
        self.transition(&[RecordStatus::Pending], RecordStatus::Active)
    }

    pub fn mark_cancelled(&mut self) -> RentalResult<()> {
        self.transition(
            &[RecordStatus::Pending, RecordStatus::Active],
            RecordStatus::Cancelled,
        )
    }

    pub fn mark_overdue(&mut self) -> RentalResult<()> {
        self.transition(&[RecordStatus::Active], RecordStatus::Overdue)
    }

    /// Attaches return fields and moves the record to its terminal status.
    ///
    /// Active records become `Completed` (early/on-time) or `Overdue` (late).
    /// A record already flagged `Overdue` by the sweep keeps that status.
    pub fn record_return(
        &mut self,
        actual_return: NaiveDate,
        final_cost: Money,
        return_type: ReturnType,
    ) -> RentalResult<()> {
        if self.is_returned() || !self.status.holds_vehicle() {
            return Err(RentalError::InvalidStatusTransition {
                record_id: self.record_id.clone(),
                from: self.status.to_string(),
                to: "returned".to_string(),
            });
        }

        if self.status == RecordStatus::Active {
            match return_type {
                ReturnType::Overdue => self.status = RecordStatus::Overdue,
                ReturnType::Early | ReturnType::OnTime => self.status = RecordStatus::Completed,
            }
        }
        self.actual_return_date = Some(actual_return);
        self.final_cost = Some(final_cost.clamp_non_negative());
        self.return_type = Some(return_type);
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Undoes [`record_return`](Self::record_return) (engine rollback only).
    pub(crate) fn clear_return(&mut self, previous: RecordStatus) {
        self.status = previous;
        self.actual_return_date = None;
        self.final_cost = None;
        self.return_type = None;
        self.updated_at = Utc::now();
    }

    /// Flags an active record whose end date has passed.
    ///
    /// Returns true when the status changed.
    pub fn check_overdue(&mut self, today: NaiveDate) -> bool {
        if self.status == RecordStatus::Active && today > self.end_date {
            self.status = RecordStatus::Overdue;
            self.updated_at = Utc::now();
            return true;
        }
        false
    }

    /// One line for listings.
    pub fn to_summary(&self) -> String {
        let mut line = format!(
            "{} {} by {} {} to {} {} [{}]",
            self.record_id,
            self.vehicle_id,
            self.renter_id,
            format_date(self.start_date),
            format_date(self.end_date),
            self.rental_cost,
            self.status
        );
        if let (Some(returned), Some(final_cost), Some(kind)) =
            (self.actual_return_date, self.final_cost, self.return_type)
        {
            line.push_str(&format!(
                " returned {} ({}) final {}",
                format_date(returned),
                kind,
                final_cost
            ));
        }
        line
    }
}

impl PartialEq for RentalRecord {
    fn eq(&self, other: &Self) -> bool {
        self.record_id == other.record_id
    }
}

impl Eq for RentalRecord {}

impl fmt::Display for RentalRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_summary())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    fn record() -> RentalRecord {
        RentalRecord::new(
            format_record_id(1),
            "CAR001",
            "I001",
            RentalPeriod::from_dates(d(1), d(5)).unwrap(),
            Money::from_cents(32500),
            Discount::none(),
        )
    }

    #[test]
    fn test_record_id_format() {
        assert_eq!(format_record_id(1), "R00001");
        assert_eq!(format_record_id(123456), "R123456");
        assert_eq!(parse_record_id("R00042"), Some(42));
        assert_eq!(parse_record_id("R+42"), None);
        assert_eq!(parse_record_id("X00001"), None);
    }

    #[test]
    fn test_new_record_is_pending() {
        let r = record();
        assert_eq!(r.status(), RecordStatus::Pending);
        assert_eq!(r.duration_days(), 5);
        assert_eq!(r.revenue().cents(), 32500);
        assert!(!r.is_returned());
    }

    #[test]
    fn test_transitions_are_monotonic() {
        let mut r = record();
        r.mark_active().unwrap();
        assert!(r.mark_active().is_err());
        r.mark_overdue().unwrap();
        assert!(r.mark_cancelled().is_err());
        let err = r.mark_overdue().unwrap_err();
        assert!(matches!(err, RentalError::InvalidStatusTransition { .. }));
    }

    #[test]
    fn test_record_return_early() {
        let mut r = record();
        r.mark_active().unwrap();
        r.record_return(d(3), Money::from_cents(19500), ReturnType::Early)
            .unwrap();
        assert_eq!(r.status(), RecordStatus::Completed);
        assert_eq!(r.actual_duration_days(), Some(3));
        assert_eq!(r.revenue().cents(), 19500);
        assert!(r
            .record_return(d(3), Money::zero(), ReturnType::Early)
            .is_err());
    }

    #[test]
    fn test_record_return_late() {
        let mut r = record();
        r.mark_active().unwrap();
        r.record_return(d(7), Money::from_cents(45500), ReturnType::Overdue)
            .unwrap();
        assert_eq!(r.status(), RecordStatus::Overdue);
        assert_eq!(r.return_type(), Some(ReturnType::Overdue));
    }

    #[test]
    fn test_swept_record_can_still_be_returned() {
        let mut r = record();
        r.mark_active().unwrap();
        assert!(!r.check_overdue(d(5)));
        assert!(r.check_overdue(d(6)));
        assert!(!r.check_overdue(d(7)));

        r.record_return(d(8), Money::from_cents(52000), ReturnType::Overdue)
            .unwrap();
        assert_eq!(r.status(), RecordStatus::Overdue);
        assert_eq!(r.actual_return_date(), Some(d(8)));
    }

    #[test]
    fn test_pending_cannot_be_returned() {
        let mut r = record();
        assert!(r
            .record_return(d(5), Money::zero(), ReturnType::OnTime)
            .is_err());
    }

    #[test]
    fn test_classify() {
        assert_eq!(ReturnType::classify(d(4), d(5)), ReturnType::Early);
        assert_eq!(ReturnType::classify(d(5), d(5)), ReturnType::OnTime);
        assert_eq!(ReturnType::classify(d(6), d(5)), ReturnType::Overdue);
    }

    #[test]
    fn test_serde_shape() {
        let mut r = record();
        r.mark_active().unwrap();
        r.record_return(d(5), Money::from_cents(32500), ReturnType::OnTime)
            .unwrap();
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["start_date"], "01-01-2026");
        assert_eq!(json["status"], "completed");
        assert_eq!(json["return_type"], "on-time");
        assert_eq!(json["actual_return_date"], "05-01-2026");

        let back: RentalRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
        assert_eq!(back.final_cost(), Some(Money::from_cents(32500)));
    }

    #[test]
    fn test_summary() {
        let r = record();
        assert_eq!(
            r.to_summary(),
            "R00001 CAR001 by I001 01-01-2026 to 05-01-2026 $325.00 [pending]"
        );
    }
}
