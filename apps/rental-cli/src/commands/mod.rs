//! # Commands
//!
//! One function per subcommand. Each runs under the engine lock and returns
//! a [`Reply`] carrying both renderings; `run` picks one.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Command ──► execute() ──► fleet:: / renters:: / rental:: / report::   │
//! │                                │                                        │
//! │                                ▼                                        │
//! │                         Reply { text, json } ──► stdout                 │
//! │                         CliError { code, message } ──► exit 1           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod fleet;
pub mod rental;
pub mod renters;
pub mod report;

use rental_core::SnapshotStore;
use serde::Serialize;

use crate::cli::Command;
use crate::error::{CliError, CliResult};
use crate::state::SharedEngine;

/// Output of a successful command.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub text: String,
    pub json: serde_json::Value,
}

impl Reply {
    pub fn new<T: Serialize>(text: impl Into<String>, data: &T) -> CliResult<Self> {
        let json = serde_json::to_value(data)
            .map_err(|e| CliError::internal(format!("Failed to serialize output: {}", e)))?;
        Ok(Reply {
            text: text.into(),
            json,
        })
    }

    pub fn render(&self, json: bool) -> String {
        if json {
            serde_json::to_string_pretty(&self.json).unwrap_or_else(|_| self.json.to_string())
        } else {
            self.text.clone()
        }
    }
}

/// Joins listing lines, or prints `empty` when there are none.
pub(crate) fn listing<I>(lines: I, empty: &str) -> String
where
    I: IntoIterator<Item = String>,
{
    let lines: Vec<String> = lines.into_iter().collect();
    if lines.is_empty() {
        empty.to_string()
    } else {
        lines.join("\n")
    }
}

/// Runs one command against the shared engine.
pub fn execute<S: SnapshotStore>(state: &SharedEngine<S>, command: Command) -> CliResult<Reply> {
    match command {
        Command::AddCar {
            vehicle,
            doors,
            fuel,
            transmission,
        } => fleet::add_car(state, vehicle, doors, fuel, transmission),
        Command::AddMotorbike {
            vehicle,
            engine_cc,
            class,
            abs,
        } => fleet::add_motorbike(state, vehicle, engine_cc, class, abs),
        Command::AddTruck {
            vehicle,
            capacity,
            class,
            lift,
        } => fleet::add_truck(state, vehicle, capacity, class, lift),
        Command::Vehicles {
            vehicle_type,
            brand,
            price,
            available_from,
            available_to,
        } => {
            let query = fleet::VehicleQuery {
                vehicle_type,
                brand,
                price,
                available: available_from.zip(available_to),
            };
            fleet::list_vehicles(state, &query)
        }
        Command::RemoveVehicle { vehicle_id } => fleet::remove_vehicle(state, &vehicle_id),

        Command::AddIndividual {
            renter,
            dob,
            license,
        } => renters::add_individual(state, renter, dob, license),
        Command::AddCorporate {
            renter,
            company,
            registration,
            billing_address,
        } => renters::add_corporate(state, renter, company, registration, billing_address),
        Command::AddStaff {
            renter,
            employee_id,
            role,
        } => renters::add_staff(state, renter, employee_id, role),
        Command::Renters => renters::list_renters(state),
        Command::Login { renter, password } => renters::login(state, &renter, &password),
        Command::RemoveRenter { actor, renter_id } => {
            renters::remove_renter(state, &actor, &renter_id)
        }

        Command::Rent {
            vehicle,
            renter,
            period,
        } => rental::rent(state, &vehicle, &renter, &period),
        Command::Return {
            vehicle,
            renter,
            period,
            on,
        } => rental::return_vehicle(state, &vehicle, &renter, &period, on.as_deref()),
        Command::Cancel { record_id } => rental::cancel(state, &record_id),
        Command::Records {
            vehicle,
            renter,
            active,
            status,
        } => rental::list_records(
            state,
            rental::RecordFilter {
                vehicle_id: vehicle,
                renter_id: renter,
                active_only: active,
                status: status.map(Into::into),
            },
        ),
        Command::Sweep => rental::sweep(state),

        Command::Report => report::fleet_report(state),
        Command::Check => report::check(state),
    }
}
