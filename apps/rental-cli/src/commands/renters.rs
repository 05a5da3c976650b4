//! Renter commands.

use rental_core::{Money, RenterDetails, Renter, RenterSpec, SnapshotStore, StaffRole};
use serde::Serialize;

use super::{listing, Reply};
use crate::cli::RenterArgs;
use crate::error::{CliError, CliResult, ErrorCode};
use crate::state::SharedEngine;

/// Renter as shown to operators. Never carries the credential hash.
#[derive(Debug, Clone, Serialize)]
pub struct RenterView {
    pub renter_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub user_type: &'static str,
    pub contact_info: String,
    pub details: String,
    pub active_rentals: usize,
    pub total_rentals: usize,
    pub total_spent: Money,
}

impl From<&Renter> for RenterView {
    fn from(r: &Renter) -> Self {
        RenterView {
            renter_id: r.renter_id().to_string(),
            name: r.name().to_string(),
            user_type: r.user_type(),
            contact_info: r.contact_info().to_string(),
            details: r.kind().details(),
            active_rentals: r.ledger().active_count(),
            total_rentals: r.rental_count(),
            total_spent: r.total_spent(),
        }
    }
}

impl RenterView {
    fn line(&self) -> String {
        format!(
            "{} {} ({}) - {} - {} active, {} total",
            self.renter_id,
            self.name,
            self.user_type,
            self.details,
            self.active_rentals,
            self.total_rentals
        )
    }
}

fn add<S: SnapshotStore>(
    state: &SharedEngine<S>,
    args: RenterArgs,
    details: RenterDetails,
) -> CliResult<Reply> {
    let id = args.renter_id.clone();
    let spec = RenterSpec {
        renter_id: args.renter_id,
        name: args.name,
        contact_info: args.contact,
        password: args.password,
        details,
    };
    state.with_engine_mut(|engine| {
        engine.add_renter(spec)?;
        let view = engine
            .renter(&id)
            .map(RenterView::from)
            .ok_or_else(|| CliError::not_found("Renter", &id))?;
        Reply::new(format!("Added {}", view.line()), &view)
    })
}

pub fn add_individual<S: SnapshotStore>(
    state: &SharedEngine<S>,
    args: RenterArgs,
    date_of_birth: String,
    license_number: String,
) -> CliResult<Reply> {
    add(
        state,
        args,
        RenterDetails::Individual {
            date_of_birth,
            license_number,
        },
    )
}

pub fn add_corporate<S: SnapshotStore>(
    state: &SharedEngine<S>,
    args: RenterArgs,
    company_name: String,
    business_registration: String,
    billing_address: String,
) -> CliResult<Reply> {
    add(
        state,
        args,
        RenterDetails::Corporate {
            company_name,
            business_registration,
            billing_address,
        },
    )
}

pub fn add_staff<S: SnapshotStore>(
    state: &SharedEngine<S>,
    args: RenterArgs,
    employee_id: String,
    role: StaffRole,
) -> CliResult<Reply> {
    add(state, args, RenterDetails::Staff { employee_id, role })
}

pub fn list_renters<S: SnapshotStore>(state: &SharedEngine<S>) -> CliResult<Reply> {
    state.with_engine(|engine| {
        let views: Vec<RenterView> = engine.renters().map(RenterView::from).collect();
        let text = listing(views.iter().map(RenterView::line), "No renters.");
        Reply::new(text, &views)
    })
}

/// Checks credentials. Unknown id and wrong secret look the same.
pub fn login<S: SnapshotStore>(
    state: &SharedEngine<S>,
    renter_id: &str,
    secret: &str,
) -> CliResult<Reply> {
    state.with_engine(|engine| match engine.authenticate(renter_id, secret) {
        Some(renter) => {
            let view = RenterView::from(renter);
            Reply::new(format!("Welcome, {} ({})", view.name, view.user_type), &view)
        }
        None => Err(CliError::new(
            ErrorCode::AuthFailed,
            "Invalid renter id or password",
        )),
    })
}

pub fn remove_renter<S: SnapshotStore>(
    state: &SharedEngine<S>,
    actor_id: &str,
    renter_id: &str,
) -> CliResult<Reply> {
    state.with_engine_mut(|engine| {
        let removed = engine.remove_renter(actor_id, renter_id)?;
        let view = RenterView::from(&removed);
        Reply::new(format!("Removed {}", view.line()), &view)
    })
}
