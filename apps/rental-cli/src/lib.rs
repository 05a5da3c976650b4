//! # rentctl Library
//!
//! Process shell around the rental engine: config, logging, the engine lock
//! and output rendering. `main.rs` only parses arguments and calls [`run`].
//!
//! ## Module Organization
//! ```text
//! rental_cli/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── cli.rs          ◄─── clap argument definitions
//! ├── config.rs       ◄─── rental.toml + RENTAL_* overrides
//! ├── state.rs        ◄─── SharedEngine (Arc<Mutex<RentalEngine>>)
//! ├── commands/
//! │   ├── mod.rs      ◄─── Reply type & dispatch
//! │   ├── fleet.rs    ◄─── add-car/-motorbike/-truck, vehicles, remove-vehicle
//! │   ├── renters.rs  ◄─── add-individual/-corporate/-staff, renters, login
//! │   ├── rental.rs   ◄─── rent, return, cancel, records, sweep
//! │   └── report.rs   ◄─── report, check
//! └── error.rs        ◄─── CliError { code, message }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod state;

use anyhow::Context;
use rental_core::{parse_date, RentalEngine};
use rental_store::{JsonFileStore, StoreConfig};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::Cli;
use config::CliConfig;
use state::SharedEngine;

/// Runs one `rentctl` invocation.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  1. Load config ── defaults → rental.toml → RENTAL_* → flags            │
/// │  2. Initialize logging ── RUST_LOG, else config log_level (stderr)      │
/// │  3. Open snapshot ── missing file = empty fleet                         │
/// │  4. Execute command under the engine lock                               │
/// │  5. Report a failed save (the change still applied in memory)           │
/// │  6. Print text or JSON                                                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config =
        CliConfig::load(cli.config.clone()).context("Failed to load configuration")?;
    if let Some(path) = &cli.data_file {
        config.data_file = path.clone();
    }
    if let Some(today) = &cli.today {
        let date = parse_date(today).context("Invalid --today")?;
        config.engine.today = Some(date);
    }
    config.validate()?;

    init_tracing(&config.log_level);
    info!(data_file = ?config.data_file, "Starting rentctl");

    let store = JsonFileStore::new(
        StoreConfig::new(&config.data_file).keep_backup(config.keep_backup),
    );
    let engine = RentalEngine::open(config.engine.clone(), store).with_context(|| {
        format!("Failed to open snapshot {}", config.data_file.display())
    })?;
    let state = SharedEngine::new(engine);

    let outcome = commands::execute(&state, cli.command);

    if let Some(warning) = state.with_engine_mut(|engine| engine.take_save_warning()) {
        warn!(error = %warning, "Change applied but not saved");
        eprintln!("warning: change applied but not saved: {}", warning);
    }

    match outcome {
        Ok(reply) => {
            println!("{}", reply.render(cli.json));
            Ok(())
        }
        Err(err) => {
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&err)?);
            }
            Err(err.into())
        }
    }
}

/// Initializes the tracing subscriber. Logs go to stderr so `--json`
/// output on stdout stays parseable.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=rental_core=trace` - Trace the engine only
/// - Default: the config `log_level`
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
