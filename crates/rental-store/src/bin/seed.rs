//! # Seed Data Generator
//!
//! Populates a snapshot file with a small demo fleet and three renters.
//!
//! ## Usage
//! ```bash
//! # Write ./fleet_dev.json
//! cargo run -p rental-store --bin seed
//!
//! # Specify snapshot path
//! cargo run -p rental-store --bin seed -- --path ./data/fleet.json
//! ```
//!
//! Running it twice is harmless: entities that already exist are skipped.

use rental_core::vehicle::{BikeClass, FuelType, Transmission, TruckClass};
use rental_core::{
    EngineConfig, Money, RentalEngine, RentalError, RenterDetails, RenterSpec, StaffRole,
    VehicleKind, VehicleSpec,
};
use rental_store::{JsonFileStore, StoreConfig};
use std::env;

fn vehicle(
    id: &str,
    make: &str,
    model: &str,
    year: i32,
    rate_cents: i64,
    kind: VehicleKind,
) -> VehicleSpec {
    VehicleSpec {
        vehicle_id: id.to_string(),
        make: make.to_string(),
        model: model.to_string(),
        year,
        daily_rate: Money::from_cents(rate_cents),
        image: None,
        kind,
    }
}

fn fleet() -> Vec<VehicleSpec> {
    vec![
        vehicle(
            "CAR001",
            "Toyota",
            "Camry",
            2022,
            6500,
            VehicleKind::Car {
                doors: 4,
                fuel: FuelType::Hybrid,
                transmission: Transmission::Automatic,
            },
        ),
        vehicle(
            "CAR002",
            "Tesla",
            "Model 3",
            2024,
            12000,
            VehicleKind::Car {
                doors: 4,
                fuel: FuelType::Electric,
                transmission: Transmission::Automatic,
            },
        ),
        vehicle(
            "BIKE001",
            "Honda",
            "CBR600RR",
            2023,
            8500,
            VehicleKind::Motorbike {
                engine_cc: 600,
                class: BikeClass::Sport,
                abs: true,
            },
        ),
        vehicle(
            "TRUCK001",
            "Isuzu",
            "NPR",
            2021,
            15000,
            VehicleKind::Truck {
                load_capacity: 4.5,
                class: TruckClass::Box,
                hydraulic_lift: true,
            },
        ),
    ]
}

fn renters() -> Vec<RenterSpec> {
    vec![
        RenterSpec {
            renter_id: "I001".to_string(),
            name: "Ana Lopez".to_string(),
            contact_info: "ana@example.com".to_string(),
            password: "renter123".to_string(),
            details: RenterDetails::Individual {
                date_of_birth: "15-06-1990".to_string(),
                license_number: "DL12345".to_string(),
            },
        },
        RenterSpec {
            renter_id: "C001".to_string(),
            name: "Ben Carter".to_string(),
            contact_info: "+61 2 5550 1234".to_string(),
            password: "corp123".to_string(),
            details: RenterDetails::Corporate {
                company_name: "Acme Logistics Pty Ltd".to_string(),
                business_registration: "ABN-123/456".to_string(),
                billing_address: "1 Harbour Street, Sydney NSW 2000".to_string(),
            },
        },
        RenterSpec {
            renter_id: "S001".to_string(),
            name: "Sam Okafor".to_string(),
            contact_info: "admin@fleet.example".to_string(),
            password: "admin123".to_string(),
            details: RenterDetails::Staff {
                employee_id: "EMP-001".to_string(),
                role: StaffRole::Admin,
            },
        },
    ]
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut path = String::from("./fleet_dev.json");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--path" | "-p" => {
                if i + 1 < args.len() {
                    path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Usage: seed [--path <snapshot.json>]");
                return Ok(());
            }
            other => {
                eprintln!("Ignoring unknown argument: {}", other);
            }
        }
        i += 1;
    }

    println!("🌱 Seeding {}", path);
    let store = JsonFileStore::new(StoreConfig::new(&path).keep_backup(true));
    let mut engine = RentalEngine::open(EngineConfig::default(), store)?;

    let mut added = 0;
    for spec in fleet() {
        let id = spec.vehicle_id.clone();
        match engine.add_vehicle(spec) {
            Ok(()) => added += 1,
            Err(RentalError::DuplicateVehicle(_)) => println!("  skip vehicle {} (exists)", id),
            Err(e) => return Err(e.into()),
        }
    }
    for spec in renters() {
        let id = spec.renter_id.clone();
        match engine.add_renter(spec) {
            Ok(()) => added += 1,
            Err(RentalError::DuplicateRenter(_)) => println!("  skip renter {} (exists)", id),
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(warning) = engine.take_save_warning() {
        return Err(warning.into());
    }

    println!(
        "✅ Added {} entities ({} vehicles, {} renters in snapshot)",
        added,
        engine.vehicles().count(),
        engine.renters().count()
    );
    Ok(())
}
