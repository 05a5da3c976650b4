//! # Fleet Analytics
//!
//! Read-only revenue and utilisation figures over the record list.
//!
//! Revenue counts only rentals that have been returned, using the final cost
//! (after refunds and penalties). Rental counts per vehicle include every
//! booking that went active, returned or not.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::money::Money;
use crate::record::{RecordStatus, RentalRecord};

/// How many vehicles the top/bottom lists hold.
pub const RANKING_SIZE: usize = 5;

/// Revenue and count for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub rentals: usize,
    pub revenue: Money,
}

/// A vehicle and the figure it was ranked by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VehicleRank<T> {
    pub vehicle_id: String,
    pub value: T,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FleetReport {
    pub total_rentals: usize,
    pub returned_rentals: usize,
    pub total_revenue: Money,
    pub average_revenue: Money,
    /// Mean of the actual (or scheduled) days over returned rentals.
    pub average_days: f64,
    pub by_vehicle_type: BTreeMap<String, CategoryStats>,
    pub by_renter_type: BTreeMap<String, CategoryStats>,
    pub most_rented: Vec<VehicleRank<usize>>,
    pub least_rented: Vec<VehicleRank<usize>>,
    pub top_revenue: Vec<VehicleRank<Money>>,
}

/// Builds the report.
///
/// `fleet` lists the current vehicle ids, so vehicles never booked still
/// rank (at zero) among the least rented. `vehicle_type` and `renter_type`
/// resolve ids to category labels; ids that no longer resolve (removed
/// entities) are reported as `"Unknown"`.
pub fn fleet_report<'a, F, V, R>(
    records: &'a [RentalRecord],
    fleet: F,
    vehicle_type: V,
    renter_type: R,
) -> FleetReport
where
    F: IntoIterator<Item = &'a str>,
    V: Fn(&str) -> Option<&'static str>,
    R: Fn(&str) -> Option<&'static str>,
{
    let mut counts: BTreeMap<&str, usize> = fleet.into_iter().map(|id| (id, 0)).collect();
    let mut revenue_per_vehicle: BTreeMap<&str, Money> = BTreeMap::new();
    let mut by_vehicle_type: BTreeMap<String, CategoryStats> = BTreeMap::new();
    let mut by_renter_type: BTreeMap<String, CategoryStats> = BTreeMap::new();
    let mut total_revenue = Money::zero();
    let mut total_days = 0i64;
    let mut returned = 0usize;

    let booked = records
        .iter()
        .filter(|r| !matches!(r.status(), RecordStatus::Pending | RecordStatus::Cancelled));

    for record in booked {
        *counts.entry(record.vehicle_id()).or_default() += 1;

        if !record.is_returned() {
            continue;
        }
        let revenue = record.revenue();
        returned += 1;
        total_revenue += revenue;
        total_days += record
            .actual_duration_days()
            .unwrap_or_else(|| record.duration_days());
        *revenue_per_vehicle.entry(record.vehicle_id()).or_default() += revenue;

        let v_label = vehicle_type(record.vehicle_id()).unwrap_or("Unknown");
        let stats = by_vehicle_type.entry(v_label.to_string()).or_default();
        stats.rentals += 1;
        stats.revenue += revenue;

        let r_label = renter_type(record.renter_id()).unwrap_or("Unknown");
        let stats = by_renter_type.entry(r_label.to_string()).or_default();
        stats.rentals += 1;
        stats.revenue += revenue;
    }

    let (average_revenue, average_days) = if returned > 0 {
        (
            Money::from_cents(total_revenue.cents() / returned as i64),
            total_days as f64 / returned as f64,
        )
    } else {
        (Money::zero(), 0.0)
    };

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    // Stable sort keeps vehicle-id order among ties.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    let most_rented = ranked
        .iter()
        .filter(|(_, n)| *n > 0)
        .take(RANKING_SIZE)
        .map(|(id, n)| VehicleRank { vehicle_id: id.to_string(), value: *n })
        .collect();
    ranked.sort_by(|a, b| a.1.cmp(&b.1));
    let least_rented = ranked
        .iter()
        .take(RANKING_SIZE)
        .map(|(id, n)| VehicleRank { vehicle_id: id.to_string(), value: *n })
        .collect();

    let mut earners: Vec<(&str, Money)> = revenue_per_vehicle.into_iter().collect();
    earners.sort_by(|a, b| b.1.cmp(&a.1));
    let top_revenue = earners
        .into_iter()
        .take(RANKING_SIZE)
        .map(|(id, m)| VehicleRank { vehicle_id: id.to_string(), value: m })
        .collect();

    FleetReport {
        total_rentals: records.len(),
        returned_rentals: returned,
        total_revenue,
        average_revenue,
        average_days,
        by_vehicle_type,
        by_renter_type,
        most_rented,
        least_rented,
        top_revenue,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::RentalPeriod;
    use crate::pricing::Discount;
    use crate::record::{format_record_id, ReturnType};
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    fn record(n: u64, vehicle: &str, renter: &str, cents: i64, returned: Option<(u32, i64)>) -> RentalRecord {
        let mut r = RentalRecord::new(
            format_record_id(n),
            vehicle,
            renter,
            RentalPeriod::from_dates(d(1), d(5)).unwrap(),
            Money::from_cents(cents),
            Discount::none(),
        );
        r.mark_active().unwrap();
        if let Some((day, final_cents)) = returned {
            let kind = ReturnType::classify(d(day), d(5));
            r.record_return(d(day), Money::from_cents(final_cents), kind).unwrap();
        }
        r
    }

    fn vehicle_type(id: &str) -> Option<&'static str> {
        match id {
            "CAR001" | "CAR002" => Some("Car"),
            "BIKE01" => Some("Motorbike"),
            _ => None,
        }
    }

    fn renter_type(id: &str) -> Option<&'static str> {
        match id {
            "I001" => Some("Individual"),
            "C001" => Some("Corporate"),
            _ => None,
        }
    }

    #[test]
    fn test_empty_report() {
        let report = fleet_report(&[], [], vehicle_type, renter_type);
        assert_eq!(report.total_rentals, 0);
        assert!(report.total_revenue.is_zero());
        assert_eq!(report.average_days, 0.0);
        assert!(report.most_rented.is_empty());
    }

    #[test]
    fn test_revenue_uses_final_cost() {
        let records = vec![
            record(1, "CAR001", "I001", 32500, Some((3, 19500))),
            record(2, "CAR001", "C001", 27625, Some((5, 27625))),
            record(3, "BIKE01", "I001", 10000, None),
        ];
        let report = fleet_report(&records, [], vehicle_type, renter_type);

        assert_eq!(report.total_rentals, 3);
        assert_eq!(report.returned_rentals, 2);
        assert_eq!(report.total_revenue.cents(), 47125);
        assert_eq!(report.average_revenue.cents(), 23562);
        assert_eq!(report.average_days, 4.0);

        let cars = report.by_vehicle_type["Car"];
        assert_eq!(cars.rentals, 2);
        assert_eq!(cars.revenue.cents(), 47125);
        assert!(!report.by_vehicle_type.contains_key("Motorbike"));
        assert_eq!(report.by_renter_type["Corporate"].revenue.cents(), 27625);
    }

    #[test]
    fn test_rankings() {
        let records = vec![
            record(1, "CAR002", "I001", 100, Some((5, 100))),
            record(2, "CAR001", "I001", 100, Some((5, 100))),
            record(3, "CAR001", "I001", 100, Some((5, 900))),
            record(4, "GONE01", "X001", 100, Some((5, 50))),
        ];
        let report = fleet_report(&records, [], vehicle_type, renter_type);

        assert_eq!(report.most_rented[0].vehicle_id, "CAR001");
        assert_eq!(report.most_rented[0].value, 2);
        assert_eq!(report.least_rented[0].vehicle_id, "CAR002");
        assert_eq!(report.top_revenue[0].vehicle_id, "CAR001");
        assert_eq!(report.top_revenue[0].value.cents(), 1000);
        assert_eq!(report.by_vehicle_type["Unknown"].rentals, 1);
    }

    #[test]
    fn test_never_rented_vehicle_ranks_least() {
        let records = vec![
            record(1, "CAR001", "I001", 100, Some((5, 100))),
            record(2, "CAR001", "I001", 100, None),
            record(3, "CAR002", "I001", 100, None),
        ];
        let fleet = ["CAR001", "CAR002", "BIKE01"];
        let report = fleet_report(&records, fleet, vehicle_type, renter_type);

        assert_eq!(report.least_rented[0].vehicle_id, "BIKE01");
        assert_eq!(report.least_rented[0].value, 0);
        assert_eq!(report.least_rented[1].vehicle_id, "CAR002");
        assert_eq!(report.most_rented.len(), 2);
        assert!(report.most_rented.iter().all(|rank| rank.value > 0));
    }
}
