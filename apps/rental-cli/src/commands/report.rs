//! Reporting commands.

use rental_core::{ConsistencyIssue, FleetReport, SnapshotStore};
use serde::Serialize;
use std::fmt::Write;

use super::Reply;
use crate::error::CliResult;
use crate::state::SharedEngine;

fn render_report(report: &FleetReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Rentals: {} total, {} returned",
        report.total_rentals, report.returned_rentals
    );
    let _ = writeln!(
        out,
        "Revenue: {} (avg {} over {:.1} days)",
        report.total_revenue, report.average_revenue, report.average_days
    );

    let _ = writeln!(out, "By vehicle type:");
    for (label, stats) in &report.by_vehicle_type {
        let _ = writeln!(out, "  {:<12} {:>4} rentals  {}", label, stats.rentals, stats.revenue);
    }
    let _ = writeln!(out, "By renter type:");
    for (label, stats) in &report.by_renter_type {
        let _ = writeln!(out, "  {:<12} {:>4} rentals  {}", label, stats.rentals, stats.revenue);
    }

    let _ = writeln!(out, "Most rented:");
    for rank in &report.most_rented {
        let _ = writeln!(out, "  {:<12} {}", rank.vehicle_id, rank.value);
    }
    let _ = writeln!(out, "Least rented:");
    for rank in &report.least_rented {
        let _ = writeln!(out, "  {:<12} {}", rank.vehicle_id, rank.value);
    }
    let _ = write!(out, "Top revenue:");
    for rank in &report.top_revenue {
        let _ = write!(out, "\n  {:<12} {}", rank.vehicle_id, rank.value);
    }
    out
}

pub fn fleet_report<S: SnapshotStore>(state: &SharedEngine<S>) -> CliResult<Reply> {
    state.with_engine(|engine| {
        let report = engine.fleet_report();
        Reply::new(render_report(&report), &report)
    })
}

#[derive(Debug, Serialize)]
struct CheckResult {
    consistent: bool,
    issues: Vec<ConsistencyIssue>,
}

/// Compares every cached ledger against the record list.
pub fn check<S: SnapshotStore>(state: &SharedEngine<S>) -> CliResult<Reply> {
    state.with_engine(|engine| {
        let issues = engine.verify_consistency();
        let text = if issues.is_empty() {
            "Consistent.".to_string()
        } else {
            issues
                .iter()
                .map(|i| format!("- {}", i))
                .collect::<Vec<_>>()
                .join("\n")
        };
        Reply::new(
            text,
            &CheckResult {
                consistent: issues.is_empty(),
                issues,
            },
        )
    })
}
