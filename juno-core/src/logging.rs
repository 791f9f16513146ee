//! Logging setup
//!
//! The journal logs through `tracing`. Applications call [`init`] once at
//! startup; files land in the XDG state directory, one per day
//! (`~/.local/state/juno/juno.YYYY-MM-DD.log`).

use crate::config::{Config, LoggingConfig, LOG_PREFIX, LOG_SUFFIX};
use crate::error::Error;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install the global subscriber writing to the daily log file.
///
/// `RUST_LOG` overrides `config.level`. Fails when a subscriber is
/// already installed.
pub fn init(config: &LoggingConfig) -> crate::error::Result<LoggingGuard> {
    config.validate()?;
    let log_dir = Config::state_dir();
    std::fs::create_dir_all(&log_dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_PREFIX)
        .filename_suffix(LOG_SUFFIX)
        .max_log_files(config.max_files)
        .build(&log_dir)
        .map_err(|e| Error::Config(format!("cannot open log directory: {}", e)))?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .map_err(|e| Error::Config(format!("logging already initialized: {}", e)))?;

    tracing::info!(
        log_dir = %log_dir.display(),
        level = %config.level,
        max_files = config.max_files,
        "Logging initialized"
    );

    Ok(LoggingGuard { _guard: guard })
}

/// Route journal logs to the test harness output. Safe to call repeatedly.
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Flushes buffered log lines when dropped; hold it for the program's lifetime
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Today's log file
pub fn log_file_path() -> PathBuf {
    Config::log_path(chrono::Utc::now().date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_log_file_names_follow_rotation() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let path = Config::log_path(day);
        assert!(path.ends_with("juno/juno.2024-03-09.log"));

        let today = log_file_path();
        let name = today.file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.starts_with("juno.") && name.ends_with(".log"));
    }

    #[test]
    fn test_init_rejects_invalid_level() {
        let config = LoggingConfig {
            level: "loud".to_string(),
            ..Default::default()
        };
        assert!(init(&config).is_err());
    }

    #[test]
    fn test_init_test_is_repeatable() {
        init_test();
        init_test();
        tracing::debug!("test logging ready");
    }
}
