//! Logging initialization.
//!
//! Configures the `tracing` subscriber with level filtering via the `WD_LOG`
//! environment variable, falling back to the configured `[log] level`.
//!
//! # Usage
//!
//! ```bash
//! # Debug level for one run
//! WD_LOG=debug wd layout show
//!
//! # Module-specific filtering
//! WD_LOG=widget_dashboard::engine=debug,warn wd tui
//! ```

use crate::config::schema::LogLevel;
use crate::config::xdg;
use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "WD_LOG";

/// Builds the filter from `WD_LOG`, or from `level` when it is unset or invalid.
pub fn filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level.as_filter()))
}

/// Initialize the tracing subscriber.
///
/// With `file`, output is appended to it without ANSI colors; otherwise it
/// goes to stderr. A log file that cannot be opened falls back to stderr.
/// Calling this more than once keeps the first subscriber.
pub fn init(level: LogLevel, file: Option<&Path>) {
    let builder = fmt().with_env_filter(filter(level)).with_target(false);

    let opened = file.map(|path| {
        xdg::ensure_parent(path).and_then(|()| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
        })
    });

    let result = match opened {
        Some(Ok(handle)) => builder
            .with_ansi(false)
            .with_writer(Mutex::new(handle))
            .try_init(),
        Some(Err(e)) => {
            eprintln!("Cannot open log file, logging to stderr: {e}");
            builder.with_writer(std::io::stderr).try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };
    if result.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn env_filter_parses_configured_levels() {
        for level in [
            LogLevel::Error,
            LogLevel::Warn,
            LogLevel::Info,
            LogLevel::Debug,
            LogLevel::Trace,
        ] {
            assert!(
                EnvFilter::try_new(level.as_filter()).is_ok(),
                "failed to parse directive: {}",
                level.as_filter()
            );
        }
    }

    #[test]
    fn env_filter_parses_module_directive() {
        assert!(EnvFilter::try_new("widget_dashboard::engine=debug,warn").is_ok());
    }

    #[test]
    #[serial]
    fn filter_prefers_environment() {
        std::env::set_var(LOG_ENV, "trace");
        let from_env = filter(LogLevel::Error).to_string();
        std::env::remove_var(LOG_ENV);
        assert_eq!(from_env, "trace");
        assert_eq!(filter(LogLevel::Warn).to_string(), "warn");
    }

    #[test]
    #[serial]
    fn init_creates_log_file() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("logs/wd.log");
        init(LogLevel::Info, Some(&path));
        assert!(path.exists());
    }
}
