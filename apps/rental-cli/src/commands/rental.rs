//! Booking commands: rent, return, cancel, records, sweep.

use rental_core::{parse_date, RecordStatus, RentalRecord, ReturnType, SnapshotStore};
use serde::Serialize;

use super::{listing, Reply};
use crate::cli::PeriodArgs;
use crate::error::{CliError, CliResult};
use crate::state::SharedEngine;

pub fn rent<S: SnapshotStore>(
    state: &SharedEngine<S>,
    vehicle_id: &str,
    renter_id: &str,
    dates: &PeriodArgs,
) -> CliResult<Reply> {
    state.with_engine_mut(|engine| {
        let period = engine.parse_period(&dates.from, &dates.to)?;
        let outcome = engine.rent(vehicle_id, renter_id, period)?;
        let text = format!(
            "Booked {} for {} ({}, {} days) as {}: {} after {} discount",
            outcome.vehicle_id,
            outcome.renter_id,
            outcome.period,
            outcome.period.duration_days(),
            outcome.record_id,
            outcome.cost,
            outcome.discount
        );
        Reply::new(text, &outcome)
    })
}

/// Closes a booking. The period is matched as booked, so it may lie in the
/// past; `on` defaults to the scheduled end.
pub fn return_vehicle<S: SnapshotStore>(
    state: &SharedEngine<S>,
    vehicle_id: &str,
    renter_id: &str,
    dates: &PeriodArgs,
    on: Option<&str>,
) -> CliResult<Reply> {
    let actual = on.map(parse_date).transpose()?;
    state.with_engine_mut(|engine| {
        let period = engine.parse_historical_period(&dates.from, &dates.to)?;
        let summary = engine.return_vehicle(vehicle_id, renter_id, period, actual)?;
        let adjustment = match summary.return_type {
            ReturnType::Early => format!(", refund {}", summary.refund),
            ReturnType::Overdue => format!(", late penalty {}", summary.penalty),
            ReturnType::OnTime => String::new(),
        };
        let text = format!(
            "Returned {} ({}) {}: {} -> {}{}",
            summary.vehicle_id,
            summary.record_id,
            summary.return_type,
            summary.original_cost,
            summary.final_cost,
            adjustment
        );
        Reply::new(text, &summary)
    })
}

pub fn cancel<S: SnapshotStore>(state: &SharedEngine<S>, record_id: &str) -> CliResult<Reply> {
    state.with_engine_mut(|engine| {
        engine.cancel_rental(record_id)?;
        let record = engine
            .record(record_id)
            .ok_or_else(|| CliError::not_found("Record", record_id))?;
        Reply::new(format!("Cancelled {}", record), record)
    })
}

/// Filters for `records`. All set filters must match.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub vehicle_id: Option<String>,
    pub renter_id: Option<String>,
    pub active_only: bool,
    pub status: Option<RecordStatus>,
}

impl RecordFilter {
    pub fn matches(&self, record: &RentalRecord) -> bool {
        if let Some(v) = &self.vehicle_id {
            if record.vehicle_id() != v.as_str() {
                return false;
            }
        }
        if let Some(r) = &self.renter_id {
            if record.renter_id() != r.as_str() {
                return false;
            }
        }
        if self.active_only && (!record.status().holds_vehicle() || record.is_returned()) {
            return false;
        }
        if let Some(status) = self.status {
            if record.status() != status {
                return false;
            }
        }
        true
    }
}

pub fn list_records<S: SnapshotStore>(
    state: &SharedEngine<S>,
    filter: RecordFilter,
) -> CliResult<Reply> {
    state.with_engine(|engine| {
        let records: Vec<&RentalRecord> = engine
            .records()
            .iter()
            .filter(|r| filter.matches(r))
            .collect();
        let text = listing(records.iter().map(|r| r.to_summary()), "No records.");
        Reply::new(text, &records)
    })
}

#[derive(Debug, Serialize)]
struct SweepResult {
    marked_overdue: Vec<String>,
}

pub fn sweep<S: SnapshotStore>(state: &SharedEngine<S>) -> CliResult<Reply> {
    state.with_engine_mut(|engine| {
        let marked = engine.sweep_overdue();
        let text = if marked.is_empty() {
            "No bookings past their end date.".to_string()
        } else {
            format!("Marked overdue: {}", marked.join(", "))
        };
        Reply::new(
            text,
            &SweepResult {
                marked_overdue: marked,
            },
        )
    })
}
