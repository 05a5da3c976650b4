//! Command line surface of `rentctl`.
//!
//! Dates are always `DD-MM-YYYY`. Money accepts `65`, `65.00` or `$65.00`.

use clap::{Args, Parser, Subcommand, ValueEnum};
use rental_core::vehicle::{BikeClass, FuelType, Transmission, TruckClass, VehicleType};
use rental_core::{Money, PriceBand, RecordStatus, StaffRole};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "rentctl", version, about = "Fleet rental reservations")]
pub struct Cli {
    /// Config file (default: platform config dir / rental.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Snapshot file, overrides config and RENTAL_DATA_FILE
    #[arg(long, global = true)]
    pub data_file: Option<PathBuf>,

    /// Pin "today" (DD-MM-YYYY)
    #[arg(long, global = true)]
    pub today: Option<String>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

// =============================================================================
// Shared Argument Groups
// =============================================================================

#[derive(Debug, Clone, Args)]
pub struct VehicleArgs {
    #[arg(long = "id")]
    pub vehicle_id: String,
    #[arg(long)]
    pub make: String,
    #[arg(long)]
    pub model: String,
    #[arg(long)]
    pub year: i32,
    /// Daily rate
    #[arg(long)]
    pub rate: Money,
    /// Image file name (.jpg, .jpeg, .png, .gif)
    #[arg(long)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct RenterArgs {
    #[arg(long = "id")]
    pub renter_id: String,
    #[arg(long)]
    pub name: String,
    /// Email or phone number
    #[arg(long)]
    pub contact: String,
    #[arg(long)]
    pub password: String,
}

#[derive(Debug, Clone, Args)]
pub struct PeriodArgs {
    /// First day (DD-MM-YYYY)
    #[arg(long)]
    pub from: String,
    /// Last day (DD-MM-YYYY)
    #[arg(long)]
    pub to: String,
}

/// Record status filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StatusArg {
    Pending,
    Active,
    Completed,
    Cancelled,
    Overdue,
}

impl From<StatusArg> for RecordStatus {
    fn from(arg: StatusArg) -> Self {
        match arg {
            StatusArg::Pending => RecordStatus::Pending,
            StatusArg::Active => RecordStatus::Active,
            StatusArg::Completed => RecordStatus::Completed,
            StatusArg::Cancelled => RecordStatus::Cancelled,
            StatusArg::Overdue => RecordStatus::Overdue,
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Register a car
    AddCar {
        #[command(flatten)]
        vehicle: VehicleArgs,
        #[arg(long, default_value_t = 4)]
        doors: u8,
        #[arg(long)]
        fuel: FuelType,
        #[arg(long)]
        transmission: Transmission,
    },

    /// Register a motorbike
    AddMotorbike {
        #[command(flatten)]
        vehicle: VehicleArgs,
        #[arg(long)]
        engine_cc: u32,
        #[arg(long)]
        class: BikeClass,
        #[arg(long)]
        abs: bool,
    },

    /// Register a truck
    AddTruck {
        #[command(flatten)]
        vehicle: VehicleArgs,
        /// Load capacity in tonnes
        #[arg(long)]
        capacity: f64,
        #[arg(long)]
        class: TruckClass,
        #[arg(long)]
        lift: bool,
    },

    /// Register an individual renter
    AddIndividual {
        #[command(flatten)]
        renter: RenterArgs,
        /// Date of birth (DD-MM-YYYY)
        #[arg(long)]
        dob: String,
        #[arg(long)]
        license: String,
    },

    /// Register a corporate account
    AddCorporate {
        #[command(flatten)]
        renter: RenterArgs,
        #[arg(long)]
        company: String,
        #[arg(long)]
        registration: String,
        #[arg(long)]
        billing_address: String,
    },

    /// Register a staff member
    AddStaff {
        #[command(flatten)]
        renter: RenterArgs,
        #[arg(long)]
        employee_id: String,
        #[arg(long)]
        role: StaffRole,
    },

    /// Book a vehicle
    Rent {
        #[arg(long)]
        vehicle: String,
        #[arg(long)]
        renter: String,
        #[command(flatten)]
        period: PeriodArgs,
    },

    /// Return a booked vehicle
    Return {
        #[arg(long)]
        vehicle: String,
        #[arg(long)]
        renter: String,
        #[command(flatten)]
        period: PeriodArgs,
        /// Actual return date (default: scheduled end)
        #[arg(long)]
        on: Option<String>,
    },

    /// Cancel a booking that has not started
    Cancel { record_id: String },

    /// List vehicles, optionally filtered
    Vehicles {
        /// car, motorbike or truck
        #[arg(long = "type")]
        vehicle_type: Option<VehicleType>,
        /// Case-insensitive part of the make
        #[arg(long)]
        brand: Option<String>,
        /// Daily rate band: 0-50, 51-100 or 101+
        #[arg(long)]
        price: Option<PriceBand>,
        /// Only vehicles free from this day (needs --available-to)
        #[arg(long, requires = "available_to")]
        available_from: Option<String>,
        #[arg(long, requires = "available_from")]
        available_to: Option<String>,
    },

    /// List renters
    Renters,

    /// List rental records
    Records {
        #[arg(long)]
        vehicle: Option<String>,
        #[arg(long)]
        renter: Option<String>,
        /// Only records still holding a vehicle
        #[arg(long)]
        active: bool,
        #[arg(long, value_enum)]
        status: Option<StatusArg>,
    },

    /// Check a renter's credentials
    Login {
        #[arg(long)]
        renter: String,
        #[arg(long)]
        password: String,
    },

    /// Mark bookings past their end date as overdue
    Sweep,

    /// Revenue and utilisation report
    Report,

    /// Delete a vehicle with no active bookings
    RemoveVehicle { vehicle_id: String },

    /// Delete a renter (staff with user management only)
    RemoveRenter {
        /// Staff member performing the removal
        #[arg(long = "as")]
        actor: String,
        renter_id: String,
    },

    /// Verify ledgers against the record list
    Check,
}
