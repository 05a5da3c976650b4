//! Vehicle commands.

use rental_core::vehicle::{BikeClass, FuelType, Transmission, TruckClass, VehicleType};
use rental_core::{
    Money, PriceBand, SnapshotStore, Vehicle, VehicleFilter, VehicleKind, VehicleSpec,
};
use serde::Serialize;

use super::{listing, Reply};
use crate::cli::VehicleArgs;
use crate::error::{CliError, CliResult};
use crate::state::SharedEngine;

/// Vehicle as shown to operators.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleView {
    pub vehicle_id: String,
    #[serde(rename = "type")]
    pub vehicle_type: &'static str,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub daily_rate: Money,
    pub image: String,
    pub details: String,
    pub currently_rented: bool,
    pub active_bookings: usize,
}

impl From<&Vehicle> for VehicleView {
    fn from(v: &Vehicle) -> Self {
        VehicleView {
            vehicle_id: v.vehicle_id().to_string(),
            vehicle_type: v.vehicle_type(),
            make: v.make().to_string(),
            model: v.model().to_string(),
            year: v.year(),
            daily_rate: v.daily_rate(),
            image: v.image().to_string(),
            details: v.kind().details(),
            currently_rented: v.is_currently_rented(),
            active_bookings: v.ledger().active_entries().count(),
        }
    }
}

fn spec(args: VehicleArgs, kind: VehicleKind) -> VehicleSpec {
    VehicleSpec {
        vehicle_id: args.vehicle_id,
        make: args.make,
        model: args.model,
        year: args.year,
        daily_rate: args.rate,
        image: args.image,
        kind,
    }
}

fn add<S: SnapshotStore>(state: &SharedEngine<S>, spec: VehicleSpec) -> CliResult<Reply> {
    let id = spec.vehicle_id.clone();
    state.with_engine_mut(|engine| {
        engine.add_vehicle(spec)?;
        let view = engine
            .vehicle(&id)
            .map(VehicleView::from)
            .ok_or_else(|| CliError::not_found("Vehicle", &id))?;
        Reply::new(format!("Added {}", id), &view)
    })
}

pub fn add_car<S: SnapshotStore>(
    state: &SharedEngine<S>,
    args: VehicleArgs,
    doors: u8,
    fuel: FuelType,
    transmission: Transmission,
) -> CliResult<Reply> {
    add(
        state,
        spec(
            args,
            VehicleKind::Car {
                doors,
                fuel,
                transmission,
            },
        ),
    )
}

pub fn add_motorbike<S: SnapshotStore>(
    state: &SharedEngine<S>,
    args: VehicleArgs,
    engine_cc: u32,
    class: BikeClass,
    abs: bool,
) -> CliResult<Reply> {
    add(
        state,
        spec(
            args,
            VehicleKind::Motorbike {
                engine_cc,
                class,
                abs,
            },
        ),
    )
}

pub fn add_truck<S: SnapshotStore>(
    state: &SharedEngine<S>,
    args: VehicleArgs,
    load_capacity: f64,
    class: TruckClass,
    hydraulic_lift: bool,
) -> CliResult<Reply> {
    add(
        state,
        spec(
            args,
            VehicleKind::Truck {
                load_capacity,
                class,
                hydraulic_lift,
            },
        ),
    )
}

/// `vehicles` flags before the dates are parsed against the engine's today.
#[derive(Debug, Clone, Default)]
pub struct VehicleQuery {
    pub vehicle_type: Option<VehicleType>,
    pub brand: Option<String>,
    pub price: Option<PriceBand>,
    /// `(from, to)` as typed.
    pub available: Option<(String, String)>,
}

/// Lists the fleet, narrowed by whatever `query` sets. Free dates use the
/// strict booking rules, so a past `from` is rejected.
pub fn list_vehicles<S: SnapshotStore>(
    state: &SharedEngine<S>,
    query: &VehicleQuery,
) -> CliResult<Reply> {
    state.with_engine(|engine| {
        let mut filter = VehicleFilter::new();
        if let Some(vehicle_type) = query.vehicle_type {
            filter = filter.vehicle_type(vehicle_type);
        }
        if let Some(brand) = &query.brand {
            filter = filter.brand(brand);
        }
        if let Some(band) = query.price {
            filter = filter.price(band);
        }
        let empty = match &query.available {
            Some((from, to)) => {
                let period = engine.parse_period(from, to)?;
                filter = filter.available(period);
                format!("No vehicles free {}.", period)
            }
            None if filter.is_empty() => "No vehicles.".to_string(),
            None => "No matching vehicles.".to_string(),
        };

        let found = engine.search_vehicles(&filter);
        let views: Vec<VehicleView> = found.iter().map(|v| VehicleView::from(*v)).collect();
        let text = listing(found.iter().map(|v| v.to_string()), &empty);
        Reply::new(text, &views)
    })
}

pub fn remove_vehicle<S: SnapshotStore>(
    state: &SharedEngine<S>,
    vehicle_id: &str,
) -> CliResult<Reply> {
    state.with_engine_mut(|engine| {
        let removed = engine.remove_vehicle(vehicle_id)?;
        Reply::new(
            format!("Removed {}", removed),
            &VehicleView::from(&removed),
        )
    })
}
