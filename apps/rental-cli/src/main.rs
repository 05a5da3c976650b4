//! # rentctl Entry Point
//!
//! ```bash
//! rentctl add-car --id CAR001 --make Toyota --model Camry --year 2022 \
//!     --rate 65 --fuel hybrid --transmission automatic
//! rentctl rent --vehicle CAR001 --renter I001 --from 01-01-2026 --to 05-01-2026
//! rentctl --json report
//! ```
//!
//! The actual setup is in lib.rs for testability.

use clap::Parser;
use rental_cli::cli::Cli;

fn main() -> anyhow::Result<()> {
    rental_cli::run(Cli::parse())
}
