//! # Rental Engine
//!
//! The single mutator of vehicles, renters and records.
//!
//! ## Rent Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  rent(vehicle_id, renter_id, period)                                    │
//! │       │                                                                 │
//! │       ├── vehicle exists?          no → VehicleNotFound                 │
//! │       ├── renter exists?           no → RenterNotFound                  │
//! │       ├── renter under cap?        no → CapacityExceeded                │
//! │       ├── vehicle free for period? no → VehicleNotAvailable             │
//! │       │                                                                 │
//! │       ├── discount = renter policy, cost = vehicle formula              │
//! │       ├── record R0000n (pending)                                       │
//! │       ├── vehicle ledger += entry                                       │
//! │       ├── renter ledger  += entry ── fails? → undo vehicle entry        │
//! │       ├── record → active, appended                                     │
//! │       └── save snapshot            fails? → warning, commit stands      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Return Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  return_vehicle(vehicle_id, renter_id, period, actual?)                 │
//! │       │                                                                 │
//! │       ├── vehicle has no active entry?  → VehicleAlreadyReturned        │
//! │       ├── classify early / on-time / overdue, price the difference      │
//! │       ├── vehicle ledger: entry → completed                             │
//! │       ├── renter ledger:  entry → completed ── fails? → revert vehicle  │
//! │       ├── record gains return fields                                    │
//! │       └── save snapshot                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Return Pricing
//! | Return   | Final cost                                                  |
//! |----------|-------------------------------------------------------------|
//! | Early    | formula on the days actually used, same discount            |
//! | On time  | the booked cost                                             |
//! | Overdue  | booked cost + formula on the late days × surcharge          |
//!
//! ## Concurrency
//! The engine is not internally synchronised. Callers sharing it between
//! threads wrap the whole engine in one lock so that a `rent` and the
//! availability check it depends on are atomic.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use tracing::{debug, info, warn};

use crate::analytics::{self, FleetReport};
use crate::config::EngineConfig;
use crate::error::{PersistenceError, RentalError, RentalResult, ValidationError};
use crate::ledger::{EntryStatus, RentalEntry, RentalLedger, ReservationEntry, ReservationLedger};
use crate::money::Money;
use crate::period::{format_date, RentalPeriod};
use crate::pricing::Discount;
use crate::record::{format_record_id, parse_record_id, RecordStatus, RentalRecord, ReturnType};
use crate::renter::{Capability, Renter, RenterSpec};
use crate::search::VehicleFilter;
use crate::snapshot::{MemoryStore, Snapshot, SnapshotStore, SNAPSHOT_VERSION};
use crate::vehicle::{Vehicle, VehicleSpec};

// =============================================================================
// Outcomes
// =============================================================================

/// Result of a successful `rent`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentOutcome {
    pub record_id: String,
    pub vehicle_id: String,
    pub renter_id: String,
    pub period: RentalPeriod,
    pub discount: Discount,
    pub cost: Money,
}

/// Result of a successful `return_vehicle`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnSummary {
    pub record_id: String,
    pub vehicle_id: String,
    pub renter_id: String,
    pub period: RentalPeriod,
    #[serde(with = "crate::period::date_format")]
    pub actual_return_date: NaiveDate,
    pub return_type: ReturnType,
    pub original_cost: Money,
    pub final_cost: Money,
    pub refund: Money,
    pub penalty: Money,
}

/// A divergence between the record list and an entity's cached ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "issue", rename_all = "snake_case")]
pub enum ConsistencyIssue {
    VehicleLedgerMismatch { vehicle_id: String },
    RenterLedgerMismatch { renter_id: String },
    DuplicateRecordId { record_id: String },
    UnknownVehicle { record_id: String, vehicle_id: String },
    UnknownRenter { record_id: String, renter_id: String },
    CounterBehind { next_record_id: u64, highest_seen: u64 },
}

impl fmt::Display for ConsistencyIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyIssue::VehicleLedgerMismatch { vehicle_id } => {
                write!(f, "vehicle {} ledger disagrees with the records", vehicle_id)
            }
            ConsistencyIssue::RenterLedgerMismatch { renter_id } => {
                write!(f, "renter {} ledger disagrees with the records", renter_id)
            }
            ConsistencyIssue::DuplicateRecordId { record_id } => {
                write!(f, "record id {} appears more than once", record_id)
            }
            ConsistencyIssue::UnknownVehicle {
                record_id,
                vehicle_id,
            } => write!(f, "active record {} references missing vehicle {}", record_id, vehicle_id),
            ConsistencyIssue::UnknownRenter {
                record_id,
                renter_id,
            } => write!(f, "active record {} references missing renter {}", record_id, renter_id),
            ConsistencyIssue::CounterBehind {
                next_record_id,
                highest_seen,
            } => write!(
                f,
                "next record id {} is not above the highest existing id {}",
                next_record_id, highest_seen
            ),
        }
    }
}

// =============================================================================
// Engine
// =============================================================================

/// Owns the fleet, the renters and the audit trail.
pub struct RentalEngine<S: SnapshotStore = MemoryStore> {
    config: EngineConfig,
    store: S,
    vehicles: BTreeMap<String, Vehicle>,
    renters: BTreeMap<String, Renter>,
    records: Vec<RentalRecord>,
    next_record_id: u64,
    last_save_error: Option<PersistenceError>,
}

impl RentalEngine<MemoryStore> {
    /// An engine with no durable storage.
    pub fn in_memory(config: EngineConfig) -> RentalResult<Self> {
        RentalEngine::open(config, MemoryStore::new())
    }
}

impl<S: SnapshotStore> RentalEngine<S> {
    /// Validates `config` and restores whatever `store` holds.
    pub fn open(config: EngineConfig, store: S) -> RentalResult<Self> {
        config.validate()?;

        let mut engine = RentalEngine {
            config,
            store,
            vehicles: BTreeMap::new(),
            renters: BTreeMap::new(),
            records: Vec::new(),
            next_record_id: 1,
            last_save_error: None,
        };

        match engine.store.load()? {
            Some(snapshot) => engine.restore(snapshot)?,
            None => debug!("No snapshot found, starting empty"),
        }
        Ok(engine)
    }

    fn restore(&mut self, snapshot: Snapshot) -> RentalResult<()> {
        snapshot.check_version()?;

        self.vehicles = snapshot
            .vehicles
            .into_iter()
            .map(|v| (v.vehicle_id().to_string(), v))
            .collect();
        self.renters = snapshot
            .renters
            .into_iter()
            .map(|r| (r.renter_id().to_string(), r))
            .collect();
        self.records = snapshot.records;
        let highest = self
            .records
            .iter()
            .filter_map(|r| parse_record_id(r.record_id()))
            .max()
            .unwrap_or(0);
        if snapshot.next_record_id <= highest {
            warn!(
                stored = snapshot.next_record_id,
                highest, "Record counter behind existing ids, advancing"
            );
        }
        self.next_record_id = snapshot.next_record_id.max(highest.saturating_add(1)).max(1);
        self.rebuild_ledgers();

        info!(
            vehicles = self.vehicles.len(),
            renters = self.renters.len(),
            records = self.records.len(),
            "Restored rental state from snapshot"
        );
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.config.today()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// The last snapshot save failure, cleared on read.
    ///
    /// A failed save never undoes the in-memory change; callers decide how
    /// loudly to report it.
    pub fn take_save_warning(&mut self) -> Option<PersistenceError> {
        self.last_save_error.take()
    }

    /// Parses a `DD-MM-YYYY` pair under the booking rules (no past dates).
    pub fn parse_period(&self, start: &str, end: &str) -> RentalResult<RentalPeriod> {
        Ok(RentalPeriod::parse(start, end, &self.config.booking_policy())?)
    }

    /// Parses a `DD-MM-YYYY` pair allowing past dates (returns, lookups).
    pub fn parse_historical_period(&self, start: &str, end: &str) -> RentalResult<RentalPeriod> {
        Ok(RentalPeriod::parse(start, end, &self.config.historical_policy())?)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn vehicles(&self) -> impl Iterator<Item = &Vehicle> {
        self.vehicles.values()
    }

    pub fn vehicle(&self, vehicle_id: &str) -> Option<&Vehicle> {
        self.vehicles.get(vehicle_id)
    }

    pub fn renters(&self) -> impl Iterator<Item = &Renter> {
        self.renters.values()
    }

    pub fn renter(&self, renter_id: &str) -> Option<&Renter> {
        self.renters.get(renter_id)
    }

    pub fn records(&self) -> &[RentalRecord] {
        &self.records
    }

    pub fn record(&self, record_id: &str) -> Option<&RentalRecord> {
        self.records.iter().find(|r| r.record_id() == record_id)
    }

    pub fn next_record_id(&self) -> u64 {
        self.next_record_id
    }

    pub fn vehicles_available(&self, period: &RentalPeriod) -> Vec<&Vehicle> {
        self.search_vehicles(&VehicleFilter::new().available(*period))
    }

    /// Vehicles matching every criterion set on `filter`, in id order.
    pub fn search_vehicles(&self, filter: &VehicleFilter) -> Vec<&Vehicle> {
        let found: Vec<&Vehicle> = self.vehicles.values().filter(|v| filter.matches(v)).collect();
        debug!(
            vehicle_type = ?filter.vehicle_type,
            brand = ?filter.brand_query(),
            price = ?filter.price,
            count = found.len(),
            "Vehicle search"
        );
        found
    }

    pub fn records_for_renter(&self, renter_id: &str) -> Vec<&RentalRecord> {
        self.records
            .iter()
            .filter(|r| r.renter_id() == renter_id)
            .collect()
    }

    pub fn records_for_vehicle(&self, vehicle_id: &str) -> Vec<&RentalRecord> {
        self.records
            .iter()
            .filter(|r| r.vehicle_id() == vehicle_id)
            .collect()
    }

    /// Records whose vehicle has not come back yet (active or swept overdue).
    pub fn active_records(&self) -> Vec<&RentalRecord> {
        self.records
            .iter()
            .filter(|r| r.status().holds_vehicle() && !r.is_returned())
            .collect()
    }

    pub fn records_with_status(&self, status: RecordStatus) -> Vec<&RentalRecord> {
        self.records.iter().filter(|r| r.status() == status).collect()
    }

    /// Returns the renter when `secret` matches their credential.
    pub fn authenticate(&self, renter_id: &str, secret: &str) -> Option<&Renter> {
        let renter = self.renters.get(renter_id)?;
        if renter.verify_credential(secret) {
            debug!(renter_id = %renter_id, "Authentication succeeded");
            Some(renter)
        } else {
            warn!(renter_id = %renter_id, "Authentication failed");
            None
        }
    }

    pub fn fleet_report(&self) -> FleetReport {
        analytics::fleet_report(
            &self.records,
            self.vehicles.keys().map(String::as_str),
            |id| self.vehicles.get(id).map(Vehicle::vehicle_type),
            |id| self.renters.get(id).map(Renter::user_type),
        )
    }

    // =========================================================================
    // Fleet & Renter Management
    // =========================================================================

    pub fn add_vehicle(&mut self, spec: VehicleSpec) -> RentalResult<()> {
        let result = self.try_add_vehicle(spec);
        log_rejection("add_vehicle", &result);
        result
    }

    fn try_add_vehicle(&mut self, spec: VehicleSpec) -> RentalResult<()> {
        let vehicle = Vehicle::new(spec, self.today().year())?;
        if self.vehicles.contains_key(vehicle.vehicle_id()) {
            return Err(RentalError::DuplicateVehicle(vehicle.vehicle_id().to_string()));
        }
        info!(vehicle_id = %vehicle.vehicle_id(), kind = vehicle.vehicle_type(), "Vehicle added");
        self.vehicles.insert(vehicle.vehicle_id().to_string(), vehicle);
        self.persist();
        Ok(())
    }

    pub fn add_renter(&mut self, spec: RenterSpec) -> RentalResult<()> {
        let result = self.try_add_renter(spec);
        log_rejection("add_renter", &result);
        result
    }

    fn try_add_renter(&mut self, spec: RenterSpec) -> RentalResult<()> {
        if self.renters.contains_key(spec.renter_id.trim()) {
            return Err(RentalError::DuplicateRenter(spec.renter_id.trim().to_string()));
        }
        let renter = Renter::new(spec, self.today())?;
        info!(renter_id = %renter.renter_id(), kind = renter.user_type(), "Renter added");
        self.renters.insert(renter.renter_id().to_string(), renter);
        self.persist();
        Ok(())
    }

    /// Deletes a vehicle that is not currently rented. Its records stay.
    pub fn remove_vehicle(&mut self, vehicle_id: &str) -> RentalResult<Vehicle> {
        let result = self.try_remove_vehicle(vehicle_id);
        log_rejection("remove_vehicle", &result);
        result
    }

    fn try_remove_vehicle(&mut self, vehicle_id: &str) -> RentalResult<Vehicle> {
        let vehicle = self
            .vehicles
            .get(vehicle_id)
            .ok_or_else(|| RentalError::VehicleNotFound(vehicle_id.to_string()))?;
        if vehicle.is_currently_rented() {
            return Err(RentalError::VehicleInUse(vehicle_id.to_string()));
        }
        let removed = self
            .vehicles
            .remove(vehicle_id)
            .ok_or_else(|| RentalError::VehicleNotFound(vehicle_id.to_string()))?;
        info!(vehicle_id = %vehicle_id, "Vehicle removed");
        self.persist();
        Ok(removed)
    }

    /// Deletes `renter_id` on behalf of staff member `actor_id`.
    pub fn remove_renter(&mut self, actor_id: &str, renter_id: &str) -> RentalResult<Renter> {
        let result = self.try_remove_renter(actor_id, renter_id);
        log_rejection("remove_renter", &result);
        result
    }

    fn try_remove_renter(&mut self, actor_id: &str, renter_id: &str) -> RentalResult<Renter> {
        let actor = self
            .renters
            .get(actor_id)
            .ok_or_else(|| RentalError::RenterNotFound(actor_id.to_string()))?;
        if !actor.has_capability(Capability::ManageUsers) {
            return Err(RentalError::PermissionDenied {
                actor: actor_id.to_string(),
                action: Capability::ManageUsers.describe().to_string(),
            });
        }
        if actor_id == renter_id {
            return Err(RentalError::SelfDeletion(actor_id.to_string()));
        }
        let target = self
            .renters
            .get(renter_id)
            .ok_or_else(|| RentalError::RenterNotFound(renter_id.to_string()))?;
        if target.has_active_rentals() {
            return Err(RentalError::RenterHasActiveRentals(renter_id.to_string()));
        }
        let removed = self
            .renters
            .remove(renter_id)
            .ok_or_else(|| RentalError::RenterNotFound(renter_id.to_string()))?;
        info!(renter_id = %renter_id, actor_id = %actor_id, "Renter removed");
        self.persist();
        Ok(removed)
    }

    // =========================================================================
    // Rent
    // =========================================================================

    /// Books `vehicle_id` for `renter_id` over `period`.
    pub fn rent(
        &mut self,
        vehicle_id: &str,
        renter_id: &str,
        period: RentalPeriod,
    ) -> RentalResult<RentOutcome> {
        let result = self.try_rent(vehicle_id, renter_id, period);
        log_rejection("rent", &result);
        result
    }

    fn try_rent(
        &mut self,
        vehicle_id: &str,
        renter_id: &str,
        period: RentalPeriod,
    ) -> RentalResult<RentOutcome> {
        let max = self.config.max_concurrent_rentals;
        let record_id = format_record_id(self.next_record_id);

        let vehicle = self
            .vehicles
            .get_mut(vehicle_id)
            .ok_or_else(|| RentalError::VehicleNotFound(vehicle_id.to_string()))?;
        let renter = self
            .renters
            .get_mut(renter_id)
            .ok_or_else(|| RentalError::RenterNotFound(renter_id.to_string()))?;

        if !renter.can_rent_more(max) {
            return Err(RentalError::CapacityExceeded {
                renter_id: renter_id.to_string(),
                max,
            });
        }
        if !vehicle.is_available(&period) {
            return Err(RentalError::VehicleNotAvailable {
                vehicle_id: vehicle_id.to_string(),
                period: period.to_string(),
            });
        }

        let discount = renter.calculate_discount(&period);
        let cost = vehicle.calculate_rental_cost(&period, discount);
        let mut record =
            RentalRecord::new(record_id.clone(), vehicle_id, renter_id, period, cost, discount);

        vehicle.add_reservation(period, renter_id, &record_id)?;
        if let Err(e) = renter.add_rental(&record_id, vehicle_id, period, cost, max) {
            vehicle.ledger_mut().remove(&record_id);
            warn!(
                vehicle_id = %vehicle_id,
                renter_id = %renter_id,
                error = %e,
                "Renter-side booking failed, vehicle reservation rolled back"
            );
            return Err(e);
        }
        if let Err(e) = record.mark_active() {
            vehicle.ledger_mut().remove(&record_id);
            renter.ledger_mut().remove(&record_id);
            return Err(e);
        }

        self.records.push(record);
        self.next_record_id += 1;

        info!(
            record_id = %record_id,
            vehicle_id = %vehicle_id,
            renter_id = %renter_id,
            period = %period,
            discount = %discount,
            cost = %cost,
            "Vehicle rented"
        );
        self.persist();

        Ok(RentOutcome {
            record_id,
            vehicle_id: vehicle_id.to_string(),
            renter_id: renter_id.to_string(),
            period,
            discount,
            cost,
        })
    }

    // =========================================================================
    // Return
    // =========================================================================

    /// Closes the booking of `vehicle_id` by `renter_id` for `period`.
    ///
    /// `actual_return` defaults to the scheduled end date.
    pub fn return_vehicle(
        &mut self,
        vehicle_id: &str,
        renter_id: &str,
        period: RentalPeriod,
        actual_return: Option<NaiveDate>,
    ) -> RentalResult<ReturnSummary> {
        let result = self.try_return(vehicle_id, renter_id, period, actual_return);
        log_rejection("return_vehicle", &result);
        result
    }

    fn try_return(
        &mut self,
        vehicle_id: &str,
        renter_id: &str,
        period: RentalPeriod,
        actual_return: Option<NaiveDate>,
    ) -> RentalResult<ReturnSummary> {
        let surcharge = self.config.overdue_surcharge_bps;
        let max_year = self.config.max_year;

        let vehicle = self
            .vehicles
            .get_mut(vehicle_id)
            .ok_or_else(|| RentalError::VehicleNotFound(vehicle_id.to_string()))?;
        let renter = self
            .renters
            .get_mut(renter_id)
            .ok_or_else(|| RentalError::RenterNotFound(renter_id.to_string()))?;

        if !vehicle.is_currently_rented() {
            return Err(RentalError::VehicleAlreadyReturned(vehicle_id.to_string()));
        }

        let not_found = || RentalError::ReservationNotFound {
            vehicle_id: vehicle_id.to_string(),
            renter_id: renter_id.to_string(),
            period: period.to_string(),
        };
        let record = self
            .records
            .iter_mut()
            .find(|r| {
                r.vehicle_id() == vehicle_id
                    && r.renter_id() == renter_id
                    && r.period() == period
                    && r.status().holds_vehicle()
                    && !r.is_returned()
            })
            .ok_or_else(not_found)?;

        let actual = actual_return.unwrap_or(period.end());
        if actual < period.start() {
            return Err(ValidationError::period(
                format_date(actual),
                format!("return date cannot be before the rental start {}", format_date(period.start())),
            )
            .into());
        }
        if actual.year() > max_year {
            return Err(ValidationError::period(
                format_date(actual),
                format!("year must not be after {}", max_year),
            )
            .into());
        }

        // Price the return.
        let return_type = ReturnType::classify(actual, period.end());
        let original = record.rental_cost();
        let discount = record.discount_applied();
        let (final_cost, refund, penalty) = match return_type {
            ReturnType::Early => {
                let used_days = (actual - period.start()).num_days() + 1;
                let final_cost = vehicle.cost_for_days(used_days, discount).min(original);
                (final_cost, original - final_cost, Money::zero())
            }
            ReturnType::OnTime => (original, Money::zero(), Money::zero()),
            ReturnType::Overdue => {
                let late_days = (actual - period.end()).num_days();
                let penalty = vehicle
                    .cost_for_days(late_days, discount)
                    .scale_bps(surcharge);
                (original + penalty, Money::zero(), penalty)
            }
        };

        // Commit: vehicle, then renter, then record.
        if !vehicle.complete_reservation(&period, Some(actual)) {
            return Err(not_found());
        }
        if let Err(e) = renter.complete_rental(vehicle_id, &period, actual, final_cost) {
            vehicle.revert_to_active(&period);
            warn!(
                vehicle_id = %vehicle_id,
                renter_id = %renter_id,
                error = %e,
                "Renter-side return failed, vehicle reservation restored"
            );
            return Err(e);
        }
        let previous_status = record.status();
        if let Err(e) = record.record_return(actual, final_cost, return_type) {
            vehicle.revert_to_active(&period);
            renter.ledger_mut().revert_to_active(record.record_id(), original);
            record.clear_return(previous_status);
            return Err(e);
        }

        let summary = ReturnSummary {
            record_id: record.record_id().to_string(),
            vehicle_id: vehicle_id.to_string(),
            renter_id: renter_id.to_string(),
            period,
            actual_return_date: actual,
            return_type,
            original_cost: original,
            final_cost,
            refund,
            penalty,
        };

        info!(
            record_id = %summary.record_id,
            vehicle_id = %vehicle_id,
            renter_id = %renter_id,
            return_type = %return_type,
            final_cost = %final_cost,
            "Vehicle returned"
        );
        self.persist();
        Ok(summary)
    }

    // =========================================================================
    // Cancel & Sweep
    // =========================================================================

    /// Cancels an active booking that has not started yet, freeing its dates.
    pub fn cancel_rental(&mut self, record_id: &str) -> RentalResult<()> {
        let result = self.try_cancel(record_id);
        log_rejection("cancel_rental", &result);
        result
    }

    fn try_cancel(&mut self, record_id: &str) -> RentalResult<()> {
        let today = self.today();
        let record = self
            .records
            .iter_mut()
            .find(|r| r.record_id() == record_id)
            .ok_or_else(|| RentalError::RecordNotFound(record_id.to_string()))?;

        if record.status() != RecordStatus::Active || record.start_date() <= today {
            return Err(RentalError::InvalidStatusTransition {
                record_id: record_id.to_string(),
                from: record.status().to_string(),
                to: RecordStatus::Cancelled.to_string(),
            });
        }
        record.mark_cancelled()?;

        if let Some(vehicle) = self.vehicles.get_mut(record.vehicle_id()) {
            vehicle.ledger_mut().remove(record_id);
        }
        if let Some(renter) = self.renters.get_mut(record.renter_id()) {
            renter.ledger_mut().remove(record_id);
        }

        info!(record_id = %record_id, "Rental cancelled");
        self.persist();
        Ok(())
    }

    /// Flags every active record whose end date has passed.
    ///
    /// Returns the ids that changed. Saves only when something changed.
    pub fn sweep_overdue(&mut self) -> Vec<String> {
        let today = self.today();
        let flipped: Vec<String> = self
            .records
            .iter_mut()
            .filter_map(|r| r.check_overdue(today).then(|| r.record_id().to_string()))
            .collect();

        if !flipped.is_empty() {
            warn!(count = flipped.len(), today = %format_date(today), "Rentals flagged overdue");
            self.persist();
        }
        flipped
    }

    // =========================================================================
    // Ledger Maintenance
    // =========================================================================

    /// Ledgers implied by the record list.
    fn expected_ledgers(
        &self,
    ) -> (
        HashMap<String, ReservationLedger>,
        HashMap<String, RentalLedger>,
    ) {
        let mut vehicle_ledgers: HashMap<String, ReservationLedger> = HashMap::new();
        let mut renter_ledgers: HashMap<String, RentalLedger> = HashMap::new();

        for record in &self.records {
            if !record.status().holds_vehicle() && record.status() != RecordStatus::Completed {
                continue;
            }
            let status = if record.is_returned() {
                EntryStatus::Completed
            } else {
                EntryStatus::Active
            };

            vehicle_ledgers
                .entry(record.vehicle_id().to_string())
                .or_default()
                .insert(ReservationEntry {
                    period: record.period(),
                    renter_id: record.renter_id().to_string(),
                    record_id: record.record_id().to_string(),
                    status,
                    actual_return: record.actual_return_date(),
                });

            renter_ledgers
                .entry(record.renter_id().to_string())
                .or_default()
                .push(RentalEntry {
                    record_id: record.record_id().to_string(),
                    vehicle_id: record.vehicle_id().to_string(),
                    period: record.period(),
                    status,
                    cost: record.revenue(),
                    actual_return: record.actual_return_date(),
                });
        }
        (vehicle_ledgers, renter_ledgers)
    }

    /// Replaces every cached ledger with the one implied by the records.
    pub fn rebuild_ledgers(&mut self) {
        let (mut vehicle_ledgers, mut renter_ledgers) = self.expected_ledgers();
        for (id, vehicle) in self.vehicles.iter_mut() {
            *vehicle.ledger_mut() = vehicle_ledgers.remove(id).unwrap_or_default();
        }
        for (id, renter) in self.renters.iter_mut() {
            *renter.ledger_mut() = renter_ledgers.remove(id).unwrap_or_default();
        }
        debug!("Ledgers rebuilt from records");
    }

    /// Compares cached ledgers and counters against the record list.
    pub fn verify_consistency(&self) -> Vec<ConsistencyIssue> {
        let (vehicle_ledgers, renter_ledgers) = self.expected_ledgers();
        let empty_reservations = ReservationLedger::new();
        let empty_rentals = RentalLedger::new();
        let mut issues = Vec::new();

        for (id, vehicle) in &self.vehicles {
            let expected = vehicle_ledgers.get(id).unwrap_or(&empty_reservations);
            if vehicle.ledger() != expected {
                issues.push(ConsistencyIssue::VehicleLedgerMismatch {
                    vehicle_id: id.clone(),
                });
            }
        }
        for (id, renter) in &self.renters {
            let expected = renter_ledgers.get(id).unwrap_or(&empty_rentals);
            if renter.ledger() != expected {
                issues.push(ConsistencyIssue::RenterLedgerMismatch {
                    renter_id: id.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        let mut highest = 0u64;
        for record in &self.records {
            if !seen.insert(record.record_id()) {
                issues.push(ConsistencyIssue::DuplicateRecordId {
                    record_id: record.record_id().to_string(),
                });
            }
            if let Some(n) = parse_record_id(record.record_id()) {
                highest = highest.max(n);
            }
            let outstanding = record.status().holds_vehicle() && !record.is_returned();
            if outstanding && !self.vehicles.contains_key(record.vehicle_id()) {
                issues.push(ConsistencyIssue::UnknownVehicle {
                    record_id: record.record_id().to_string(),
                    vehicle_id: record.vehicle_id().to_string(),
                });
            }
            if outstanding && !self.renters.contains_key(record.renter_id()) {
                issues.push(ConsistencyIssue::UnknownRenter {
                    record_id: record.record_id().to_string(),
                    renter_id: record.renter_id().to_string(),
                });
            }
        }
        if highest >= self.next_record_id {
            issues.push(ConsistencyIssue::CounterBehind {
                next_record_id: self.next_record_id,
                highest_seen: highest,
            });
        }

        if !issues.is_empty() {
            warn!(issues = issues.len(), "Consistency check found problems");
        }
        issues
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    /// The current state as a snapshot.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            version: SNAPSHOT_VERSION,
            saved_at: chrono::Utc::now(),
            next_record_id: self.next_record_id,
            vehicles: self.vehicles.values().cloned().collect(),
            renters: self.renters.values().cloned().collect(),
            records: self.records.clone(),
        }
    }

    /// Saves the snapshot; a failure is logged and kept for
    /// [`take_save_warning`](Self::take_save_warning).
    fn persist(&mut self) {
        let snapshot = self.snapshot();
        match self.store.save(&snapshot) {
            Ok(()) => {
                debug!(records = snapshot.records.len(), "Snapshot saved");
                self.last_save_error = None;
            }
            Err(e) => {
                warn!(error = %e, "Snapshot save failed; in-memory state kept");
                self.last_save_error = Some(e);
            }
        }
    }
}

fn log_rejection<T>(operation: &str, result: &RentalResult<T>) {
    if let Err(e) = result {
        warn!(operation = operation, error = %e, "Request rejected");
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
