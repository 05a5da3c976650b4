//! # CLI Configuration
//!
//! Where the snapshot lives, how loud the logs are, and the engine knobs.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Command line flags (highest priority)                              │
//! │     --data-file ./fleet.json   --today 01-12-2025                      │
//! │                                                                         │
//! │  2. Environment Variables                                              │
//! │     RENTAL_DATA_FILE, RENTAL_MAX_RENTALS, RENTAL_SURCHARGE_BPS,        │
//! │     RENTAL_TODAY, RENTAL_LOG_LEVEL                                     │
//! │                                                                         │
//! │  3. TOML Config File                                                   │
//! │     --config <path>, else                                              │
//! │     ~/.config/rentctl/rental.toml (Linux)                              │
//! │                                                                         │
//! │  4. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # rental.toml
//! data_file = "/var/lib/rentctl/fleet.json"
//! keep_backup = true
//! log_level = "info"
//!
//! [engine]
//! max_concurrent_rentals = 5
//! overdue_surcharge_bps = 15000
//! ```

use rental_core::{parse_date, EngineConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

/// Snapshot file name inside the data directory.
pub const DATA_FILE_NAME: &str = "fleet.json";

/// Config file name inside the config directory.
pub const CONFIG_FILE_NAME: &str = "rental.toml";

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "fleet", "rentctl")
}

fn default_data_file() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().join(DATA_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DATA_FILE_NAME))
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Everything `rentctl` reads before it touches the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Snapshot file.
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,

    /// Keep `<data_file>.bak` with the previous save.
    #[serde(default)]
    pub keep_backup: bool,

    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub engine: EngineConfig,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            data_file: default_data_file(),
            keep_backup: false,
            log_level: default_log_level(),
            engine: EngineConfig::default(),
        }
    }
}

impl CliConfig {
    // =========================================================================
    // Loading
    // =========================================================================

    /// Loads configuration from file and environment.
    ///
    /// A missing file is not an error; defaults apply.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ConfigError::SaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.data_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_file must not be empty".into()));
        }
        if self.log_level.trim().is_empty() {
            return Err(ConfigError::Invalid("log_level must not be empty".into()));
        }
        self.engine.validate()?;
        Ok(())
    }

    // =========================================================================
    // Overrides
    // =========================================================================

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies `RENTAL_*` overrides read through `lookup`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("RENTAL_DATA_FILE") {
            debug!(path = %path, "Overriding data file from environment");
            self.data_file = PathBuf::from(path);
        }

        if let Some(max) = lookup("RENTAL_MAX_RENTALS") {
            match max.parse::<usize>() {
                Ok(m) => self.engine.max_concurrent_rentals = m,
                Err(_) => warn!(value = %max, "Ignoring invalid RENTAL_MAX_RENTALS"),
            }
        }

        if let Some(bps) = lookup("RENTAL_SURCHARGE_BPS") {
            match bps.parse::<u32>() {
                Ok(b) => self.engine.overdue_surcharge_bps = b,
                Err(_) => warn!(value = %bps, "Ignoring invalid RENTAL_SURCHARGE_BPS"),
            }
        }

        if let Some(today) = lookup("RENTAL_TODAY") {
            match parse_date(&today) {
                Ok(d) => {
                    debug!(today = %today, "Pinning clock from environment");
                    self.engine.today = Some(d);
                }
                Err(e) => warn!(value = %today, error = %e, "Ignoring invalid RENTAL_TODAY"),
            }
        }

        if let Some(level) = lookup("RENTAL_LOG_LEVEL") {
            self.log_level = level;
        }
    }

    /// Platform config file location.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}
