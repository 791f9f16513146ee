//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/juno/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/juno/` (~/.config/juno/)
//! - Data: `$XDG_DATA_HOME/juno/` (~/.local/share/juno/)
//! - State/Logs: `$XDG_STATE_HOME/juno/` (~/.local/state/juno/)

use crate::error::{Error, Result};
use crate::types::MediaStatus;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "juno";

/// Log file name parts; rotation inserts the date between them
pub(crate) const LOG_PREFIX: &str = "juno";
pub(crate) const LOG_SUFFIX: &str = "log";

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    /// Where the journal is stored
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Capture defaults
    #[serde(default)]
    pub capture: CaptureConfig,
}

/// Storage location override
#[derive(Debug, Deserialize, Default, Clone)]
pub struct StorageConfig {
    /// Database file; defaults to [`Config::database_path`]
    pub database_path: Option<PathBuf>,
}

impl StorageConfig {
    /// The database path to open, applying the default when unset
    pub fn resolved_database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(Config::database_path)
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

/// Defaults applied when capturing media by hand or starting a brain dump
#[derive(Debug, Deserialize, Clone)]
pub struct CaptureConfig {
    /// Status given to media items added manually
    #[serde(default = "default_media_status")]
    pub default_status: MediaStatus,

    /// Seed brain dumps with the media currently being consumed
    #[serde(default = "default_prefill_consuming")]
    pub prefill_consuming: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            default_status: default_media_status(),
            prefill_consuming: default_prefill_consuming(),
        }
    }
}

fn default_media_status() -> MediaStatus {
    MediaStatus::Want
}

fn default_prefill_consuming() -> bool {
    true
}

impl LoggingConfig {
    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        match self.level.to_ascii_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => {
                return Err(Error::Config(format!(
                    "logging.level must be one of trace, debug, info, warn, error (got {:?})",
                    other
                )))
            }
        }
        if self.max_files == 0 {
            return Err(Error::Config(
                "logging.max_files must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.logging.validate()?;
        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/juno/config.toml` (~/.config/juno/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join(APP_DIR).join("config.toml")
    }

    /// Returns the data directory path (for SQLite database)
    ///
    /// `$XDG_DATA_HOME/juno/` (~/.local/share/juno/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join(APP_DIR)
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/juno/` (~/.local/state/juno/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join(APP_DIR)
    }

    /// Returns the database file path
    ///
    /// `$XDG_DATA_HOME/juno/journal.db` (~/.local/share/juno/journal.db)
    pub fn database_path() -> PathBuf {
        Self::data_dir().join("journal.db")
    }

    /// Returns the log file written on `date` (UTC)
    ///
    /// Logs rotate daily: `$XDG_STATE_HOME/juno/juno.YYYY-MM-DD.log`
    pub fn log_path(date: NaiveDate) -> PathBuf {
        Self::state_dir().join(format!("{}.{}.{}", LOG_PREFIX, date.format("%Y-%m-%d"), LOG_SUFFIX))
    }
}
