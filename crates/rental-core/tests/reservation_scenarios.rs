//! End-to-end rent / return scenarios against the public engine API.

use chrono::NaiveDate;
use rental_core::vehicle::{BikeClass, FuelType, Transmission, TruckClass};
use rental_core::{
    Discount, EngineConfig, MemoryStore, Money, RecordStatus, RentalEngine, RentalError,
    RenterDetails, RenterSpec, ReturnType, SnapshotStore, StaffRole, VehicleKind, VehicleSpec,
};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, 1).unwrap()
}

fn date(day: u32, month: u32, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn camry() -> VehicleSpec {
    VehicleSpec {
        vehicle_id: "CAR001".to_string(),
        make: "Toyota".to_string(),
        model: "Camry".to_string(),
        year: 2022,
        daily_rate: Money::from_cents(6500),
        image: Some("camry.jpg".to_string()),
        kind: VehicleKind::Car {
            doors: 4,
            fuel: FuelType::Petrol,
            transmission: Transmission::Automatic,
        },
    }
}

fn ducati() -> VehicleSpec {
    VehicleSpec {
        vehicle_id: "BIKE01".to_string(),
        make: "Ducati".to_string(),
        model: "Panigale".to_string(),
        year: 2023,
        daily_rate: Money::from_cents(10000),
        image: None,
        kind: VehicleKind::Motorbike {
            engine_cc: 1100,
            class: BikeClass::Sport,
            abs: true,
        },
    }
}

fn volvo() -> VehicleSpec {
    VehicleSpec {
        vehicle_id: "TRUCK01".to_string(),
        make: "Volvo".to_string(),
        model: "FH16".to_string(),
        year: 2021,
        daily_rate: Money::from_cents(25000),
        image: None,
        kind: VehicleKind::Truck {
            load_capacity: 18.5,
            class: TruckClass::Heavy,
            hydraulic_lift: true,
        },
    }
}

fn individual() -> RenterSpec {
    RenterSpec {
        renter_id: "I001".to_string(),
        name: "Ana Lopez".to_string(),
        contact_info: "ana@example.com".to_string(),
        password: "secret".to_string(),
        details: RenterDetails::Individual {
            date_of_birth: "15-06-1990".to_string(),
            license_number: "dl12345".to_string(),
        },
    }
}

fn corporate() -> RenterSpec {
    RenterSpec {
        renter_id: "C001".to_string(),
        name: "Ben Carter".to_string(),
        contact_info: "+61 2 5550 1234".to_string(),
        password: "secret".to_string(),
        details: RenterDetails::Corporate {
            company_name: "Acme Logistics Pty Ltd".to_string(),
            business_registration: "ABN-123/456".to_string(),
            billing_address: "1 Harbour Street, Sydney NSW".to_string(),
        },
    }
}

fn admin() -> RenterSpec {
    RenterSpec {
        renter_id: "S001".to_string(),
        name: "Sam Okafor".to_string(),
        contact_info: "sam@fleet.example".to_string(),
        password: "admin-pass".to_string(),
        details: RenterDetails::Staff {
            employee_id: "EMP-001".to_string(),
            role: StaffRole::Admin,
        },
    }
}

fn engine() -> RentalEngine {
    let mut engine = RentalEngine::in_memory(EngineConfig::pinned(today())).unwrap();
    engine.add_vehicle(camry()).unwrap();
    engine.add_vehicle(ducati()).unwrap();
    engine.add_vehicle(volvo()).unwrap();
    engine.add_renter(individual()).unwrap();
    engine.add_renter(corporate()).unwrap();
    engine.add_renter(admin()).unwrap();
    engine
}

// =============================================================================
// Pricing
// =============================================================================

#[test]
fn test_individual_short_rental_costs_full_rate() {
    let mut engine = engine();
    let p = engine.parse_period("01-01-2026", "05-01-2026").unwrap();
    let outcome = engine.rent("CAR001", "I001", p).unwrap();
    assert_eq!(outcome.discount, Discount::none());
    assert_eq!(outcome.cost, "325.00".parse::<Money>().unwrap());
}

#[test]
fn test_corporate_rental_gets_fifteen_percent() {
    let mut engine = engine();
    let p = engine.parse_period("01-01-2026", "05-01-2026").unwrap();
    let outcome = engine.rent("CAR001", "C001", p).unwrap();
    assert_eq!(outcome.discount.bps(), 1500);
    assert_eq!(outcome.cost.cents(), 27625);
}

#[test]
fn test_individual_discount_thresholds() {
    let engine = engine();
    let renter = engine.renter("I001").unwrap();
    let six = engine.parse_period("01-01-2026", "06-01-2026").unwrap();
    let seven = engine.parse_period("01-01-2026", "07-01-2026").unwrap();
    let fourteen = engine.parse_period("01-01-2026", "14-01-2026").unwrap();
    assert_eq!(renter.calculate_discount(&six).bps(), 0);
    assert_eq!(renter.calculate_discount(&seven).bps(), 1000);
    assert_eq!(renter.calculate_discount(&fourteen).bps(), 1000);

    let corp = engine.renter("C001").unwrap();
    let one = engine.parse_period("01-01-2026", "01-01-2026").unwrap();
    let thirty = engine.parse_period("01-01-2026", "30-01-2026").unwrap();
    assert_eq!(corp.calculate_discount(&one).bps(), 1500);
    assert_eq!(corp.calculate_discount(&thirty).bps(), 1500);

    let staff = engine.renter("S001").unwrap();
    assert!(staff.calculate_discount(&thirty).is_zero());
}

#[test]
fn test_motorbike_premiums_stack_before_discount() {
    let mut engine = engine();
    let p = engine.parse_period("01-01-2026", "02-01-2026").unwrap();
    // 2 days × $100 × (1 + 0.25 + 0.20 + 0.05) × 0.85
    let outcome = engine.rent("BIKE01", "C001", p).unwrap();
    assert_eq!(outcome.cost.cents(), 25500);
}

#[test]
fn test_truck_has_no_premium() {
    let mut engine = engine();
    let p = engine.parse_period("01-01-2026", "03-01-2026").unwrap();
    let outcome = engine.rent("TRUCK01", "I001", p).unwrap();
    assert_eq!(outcome.cost.cents(), 75000);
}

// =============================================================================
// Availability
// =============================================================================

#[test]
fn test_overlapping_booking_rejected_until_return() {
    let mut engine = engine();
    let first = engine.parse_period("01-01-2026", "05-01-2026").unwrap();
    let clash = engine.parse_period("03-01-2026", "08-01-2026").unwrap();
    let later = engine.parse_period("10-01-2026", "15-01-2026").unwrap();

    engine.rent("CAR001", "I001", first).unwrap();
    let err = engine.rent("CAR001", "C001", clash).unwrap_err();
    assert!(matches!(err, RentalError::VehicleNotAvailable { ref vehicle_id, .. } if vehicle_id == "CAR001"));

    engine.return_vehicle("CAR001", "I001", first, None).unwrap();
    engine.rent("CAR001", "C001", later).unwrap();
    assert_eq!(engine.records().len(), 2);
}

#[test]
fn test_at_most_one_overlapping_booking_succeeds() {
    let mut engine = engine();
    let ranges = [
        ("01-01-2026", "05-01-2026"),
        ("05-01-2026", "09-01-2026"),
        ("02-01-2026", "03-01-2026"),
        ("09-01-2026", "09-01-2026"),
        ("10-01-2026", "12-01-2026"),
    ];
    let mut granted = Vec::new();
    for (start, end) in ranges {
        let p = engine.parse_period(start, end).unwrap();
        if engine.rent("TRUCK01", "C001", p).is_ok() {
            granted.push(p);
        }
    }
    for (i, a) in granted.iter().enumerate() {
        for b in &granted[i + 1..] {
            assert!(!a.overlaps(b), "{} overlaps {}", a, b);
        }
    }
    assert_eq!(granted.len(), 3);
}

#[test]
fn test_round_trip_frees_vehicle() {
    let mut engine = engine();
    let p = engine.parse_period("01-01-2026", "05-01-2026").unwrap();
    engine.rent("CAR001", "I001", p).unwrap();
    engine.return_vehicle("CAR001", "I001", p, None).unwrap();

    let car = engine.vehicle("CAR001").unwrap();
    assert!(!car.is_currently_rented());
    let after = engine.parse_period("06-01-2026", "06-01-2026").unwrap();
    assert!(car.is_available(&after));
    assert!(!car.is_available(&p));
}

#[test]
fn test_capacity_rejection_leaves_vehicle_untouched() {
    let mut config = EngineConfig::pinned(today());
    config.max_concurrent_rentals = 1;
    let mut engine = RentalEngine::in_memory(config).unwrap();
    engine.add_vehicle(camry()).unwrap();
    engine.add_vehicle(volvo()).unwrap();
    engine.add_renter(individual()).unwrap();

    let p = engine.parse_period("01-01-2026", "05-01-2026").unwrap();
    engine.rent("TRUCK01", "I001", p).unwrap();

    let before = engine.vehicle("CAR001").unwrap().ledger().clone();
    let err = engine.rent("CAR001", "I001", p).unwrap_err();
    assert!(matches!(err, RentalError::CapacityExceeded { max: 1, .. }));
    assert_eq!(engine.vehicle("CAR001").unwrap().ledger(), &before);
    assert!(engine.vehicle("CAR001").unwrap().is_available(&p));
    assert_eq!(engine.records().len(), 1);
}

#[test]
fn test_vehicles_available_is_read_only() {
    let mut engine = engine();
    let p = engine.parse_period("01-01-2026", "05-01-2026").unwrap();
    engine.rent("CAR001", "I001", p).unwrap();

    let free: Vec<_> = engine
        .vehicles_available(&p)
        .into_iter()
        .map(|v| v.vehicle_id().to_string())
        .collect();
    assert_eq!(free, vec!["BIKE01".to_string(), "TRUCK01".to_string()]);
    assert!(engine.verify_consistency().is_empty());
}

// =============================================================================
// Returns
// =============================================================================

#[test]
fn test_early_return_refunds_unused_days() {
    let mut engine = engine();
    let p = engine.parse_period("01-01-2026", "10-01-2026").unwrap();
    engine.rent("CAR001", "C001", p).unwrap();

    let summary = engine
        .return_vehicle("CAR001", "C001", p, Some(date(6, 1, 2026)))
        .unwrap();

    assert_eq!(summary.return_type, ReturnType::Early);
    // 10 days × $65 × 0.85 = $552.50; 6 days = $331.50
    assert_eq!(summary.original_cost.cents(), 55250);
    assert_eq!(summary.final_cost.cents(), 33150);
    assert_eq!(summary.refund.cents(), 22100);
    assert!(summary.penalty.is_zero());

    let record = engine.record(&summary.record_id).unwrap();
    assert_eq!(record.status(), RecordStatus::Completed);
    assert_eq!(record.final_cost(), Some(summary.final_cost));

    // Days after the actual return are free again.
    let rest = engine.parse_period("07-01-2026", "10-01-2026").unwrap();
    assert!(engine.vehicle("CAR001").unwrap().is_available(&rest));
}

#[test]
fn test_on_time_return_keeps_cost() {
    let mut engine = engine();
    let p = engine.parse_period("01-01-2026", "05-01-2026").unwrap();
    engine.rent("CAR001", "I001", p).unwrap();
    let summary = engine.return_vehicle("CAR001", "I001", p, None).unwrap();
    assert_eq!(summary.return_type, ReturnType::OnTime);
    assert_eq!(summary.final_cost, summary.original_cost);
    assert_eq!(engine.renter("I001").unwrap().total_spent().cents(), 32500);
}

#[test]
fn test_late_return_charges_extra_days() {
    let mut engine = engine();
    let p = engine.parse_period("01-01-2026", "05-01-2026").unwrap();
    engine.rent("CAR001", "I001", p).unwrap();
    let summary = engine
        .return_vehicle("CAR001", "I001", p, Some(date(8, 1, 2026)))
        .unwrap();

    assert_eq!(summary.return_type, ReturnType::Overdue);
    assert_eq!(summary.penalty.cents(), 3 * 6500);
    assert_eq!(summary.final_cost.cents(), 32500 + 19500);

    let overlapping = engine.parse_period("08-01-2026", "09-01-2026").unwrap();
    assert!(!engine.vehicle("CAR001").unwrap().is_available(&overlapping));
}

#[test]
fn test_second_return_rejected() {
    let mut engine = engine();
    let p = engine.parse_period("01-01-2026", "05-01-2026").unwrap();
    engine.rent("CAR001", "I001", p).unwrap();
    engine.return_vehicle("CAR001", "I001", p, None).unwrap();
    assert!(matches!(
        engine.return_vehicle("CAR001", "I001", p, None),
        Err(RentalError::VehicleAlreadyReturned(_))
    ));
}

#[test]
fn test_return_with_wrong_renter() {
    let mut engine = engine();
    let p = engine.parse_period("01-01-2026", "05-01-2026").unwrap();
    engine.rent("CAR001", "I001", p).unwrap();
    assert!(matches!(
        engine.return_vehicle("CAR001", "C001", p, None),
        Err(RentalError::ReservationNotFound { .. })
    ));
    assert!(engine.vehicle("CAR001").unwrap().is_currently_rented());
}

// =============================================================================
// Overdue Sweep
// =============================================================================

#[test]
fn test_sweep_flags_past_due_rentals() {
    let mut engine = engine();
    let p = engine.parse_period("01-12-2025", "03-12-2025").unwrap();
    let later = engine.parse_period("01-01-2026", "03-01-2026").unwrap();
    engine.rent("CAR001", "I001", p).unwrap();
    engine.rent("TRUCK01", "I001", later).unwrap();

    // Nothing is late yet.
    assert!(engine.sweep_overdue().is_empty());

    let mut config = engine.config().clone();
    config.today = Some(date(10, 12, 2025));
    let snapshot = engine.snapshot();
    let mut engine = RentalEngine::open(config, MemoryStore::with_snapshot(snapshot)).unwrap();

    assert_eq!(engine.sweep_overdue(), vec!["R00001".to_string()]);
    assert_eq!(engine.active_records().len(), 2);

    let summary = engine
        .return_vehicle("CAR001", "I001", p, Some(date(10, 12, 2025)))
        .unwrap();
    assert_eq!(summary.return_type, ReturnType::Overdue);
    assert_eq!(
        engine.record("R00001").unwrap().status(),
        RecordStatus::Overdue
    );
    assert_eq!(engine.active_records().len(), 1);
}

// =============================================================================
// Persistence
// =============================================================================

#[test]
fn test_snapshot_reload_reconstructs_state() {
    let mut engine = engine();
    let a = engine.parse_period("01-01-2026", "10-01-2026").unwrap();
    let b = engine.parse_period("01-01-2026", "05-01-2026").unwrap();
    engine.rent("CAR001", "I001", a).unwrap();
    engine.rent("TRUCK01", "C001", b).unwrap();
    engine
        .return_vehicle("CAR001", "I001", a, Some(date(4, 1, 2026)))
        .unwrap();

    let saved = engine.store().load().unwrap().unwrap();
    let reloaded =
        RentalEngine::open(engine.config().clone(), MemoryStore::with_snapshot(saved)).unwrap();

    assert_eq!(reloaded.next_record_id(), engine.next_record_id());
    assert_eq!(reloaded.records(), engine.records());
    for vehicle in engine.vehicles() {
        let twin = reloaded.vehicle(vehicle.vehicle_id()).unwrap();
        assert_eq!(twin.ledger(), vehicle.ledger());
    }
    for renter in engine.renters() {
        let twin = reloaded.renter(renter.renter_id()).unwrap();
        assert_eq!(twin.ledger(), renter.ledger());
    }
    assert!(reloaded.verify_consistency().is_empty());
    assert!(reloaded.authenticate("I001", "secret").is_some());
}

#[test]
fn test_unsupported_snapshot_version_rejected() {
    let mut snapshot = engine().snapshot();
    snapshot.version = 99;
    let result = RentalEngine::open(
        EngineConfig::pinned(today()),
        MemoryStore::with_snapshot(snapshot),
    );
    assert!(matches!(result, Err(RentalError::Persistence(_))));
}

#[test]
fn test_every_mutation_is_saved() {
    let mut engine = engine();
    let saves = engine.store().save_count();
    let p = engine.parse_period("01-01-2026", "05-01-2026").unwrap();
    engine.rent("CAR001", "I001", p).unwrap();
    engine.return_vehicle("CAR001", "I001", p, None).unwrap();
    assert_eq!(engine.store().save_count(), saves + 2);

    // Rejections do not save.
    let _ = engine.rent("NOPE", "I001", p);
    assert_eq!(engine.store().save_count(), saves + 2);
}

// =============================================================================
// Queries & Analytics
// =============================================================================

#[test]
fn test_record_queries() {
    let mut engine = engine();
    let p = engine.parse_period("01-01-2026", "05-01-2026").unwrap();
    engine.rent("CAR001", "I001", p).unwrap();
    engine.rent("TRUCK01", "I001", p).unwrap();
    engine.rent("BIKE01", "C001", p).unwrap();
    engine.return_vehicle("BIKE01", "C001", p, None).unwrap();

    assert_eq!(engine.records_for_renter("I001").len(), 2);
    assert_eq!(engine.records_for_vehicle("BIKE01").len(), 1);
    assert_eq!(engine.active_records().len(), 2);
    assert_eq!(engine.records_with_status(RecordStatus::Completed).len(), 1);
    assert_eq!(engine.record("R00003").unwrap().renter_id(), "C001");
}

#[test]
fn test_fleet_report_counts_returned_revenue() {
    let mut engine = engine();
    let p = engine.parse_period("01-01-2026", "05-01-2026").unwrap();
    engine.rent("CAR001", "I001", p).unwrap();
    engine.rent("TRUCK01", "C001", p).unwrap();
    engine.return_vehicle("CAR001", "I001", p, None).unwrap();

    let report = engine.fleet_report();
    assert_eq!(report.total_rentals, 2);
    assert_eq!(report.returned_rentals, 1);
    assert_eq!(report.total_revenue.cents(), 32500);
    assert_eq!(report.by_vehicle_type["Car"].rentals, 1);
    assert_eq!(report.by_renter_type["Individual"].revenue.cents(), 32500);
    assert_eq!(report.most_rented.len(), 2);
    assert_eq!(report.least_rented.len(), 3);
    assert_eq!(report.least_rented[0].vehicle_id, "BIKE01");
    assert_eq!(report.least_rented[0].value, 0);
}
