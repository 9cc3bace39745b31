//! TOML configuration schema types for the widget dashboard.
//!
//! All structs derive `Deserialize` and `Serialize` with sensible defaults via
//! `#[serde(default)]`, so a partial file (or an empty one) is valid.
//!
//! Duration fields use human-readable strings (e.g. `"10m"`, `"1s"`,
//! `"250ms"`) parsed by the `humantime` crate at the call site. An
//! unparseable duration logs a warning and falls back to the default.

use super::xdg;
use dashboard_services::Units;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding `weather.city`.
pub const CITY_ENV: &str = "WD_CITY";

/// Environment variable overriding `weather.units`.
pub const UNITS_ENV: &str = "WD_UNITS";

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

/// Root configuration encompassing all sections.
///
/// Corresponds to the full TOML file structure:
/// ```toml
/// [dashboard]
/// [weather]
/// [services]
/// [log]
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Grid, storage and widget library settings.
    pub dashboard: DashboardConfig,
    /// Weather widget settings.
    pub weather: WeatherConfig,
    /// Backend service settings.
    pub services: ServicesConfig,
    /// Logging settings.
    pub log: LogConfig,
}

impl Config {
    /// Applies `WD_CITY` / `WD_UNITS` on top of the file values.
    ///
    /// An unrecognized `WD_UNITS` value is logged and ignored.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(city) = std::env::var(CITY_ENV) {
            let city = city.trim();
            if !city.is_empty() {
                self.weather.city = city.to_string();
            }
        }
        if let Ok(units) = std::env::var(UNITS_ENV) {
            match units.parse::<Units>() {
                Ok(units) => self.weather.units = units,
                Err(e) => tracing::warn!("ignoring {UNITS_ENV}: {e}"),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// Dashboard storage, refresh and library configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Storage file path. Empty string means `<data dir>/storage.json`.
    pub storage_path: String,
    /// Redraw tick as a human-readable duration (e.g. `"1s"`).
    pub tick_rate: String,
    /// Widgets offered in the edit panel, in display order.
    pub library: Vec<LibraryItem>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            storage_path: String::new(),
            tick_rate: "1s".to_string(),
            library: default_library(),
        }
    }
}

impl DashboardConfig {
    /// Resolved storage file path, with `~` expanded.
    pub fn storage_path(&self) -> PathBuf {
        if self.storage_path.trim().is_empty() {
            xdg::default_storage_path()
        } else {
            xdg::expand_tilde(self.storage_path.trim())
        }
    }

    /// Parsed tick rate, falling back to one second.
    pub fn tick_rate(&self) -> Duration {
        parse_duration("dashboard.tick_rate", &self.tick_rate, Duration::from_secs(1))
    }
}

/// An entry of the edit panel's widget library.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LibraryItem {
    /// Registered widget type; this is the drag payload.
    #[serde(rename = "type")]
    pub widget_type: String,
    /// Label shown in the panel.
    pub name: String,
}

impl LibraryItem {
    /// Creates a library entry.
    pub fn new(widget_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            widget_type: widget_type.into(),
            name: name.into(),
        }
    }
}

/// The four built-in widgets.
pub fn default_library() -> Vec<LibraryItem> {
    vec![
        LibraryItem::new("clock", "Clock"),
        LibraryItem::new("weather", "Weather"),
        LibraryItem::new("tasklist", "Tasks"),
        LibraryItem::new("player", "Music"),
    ]
}

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

/// Weather widget configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct WeatherConfig {
    /// City passed to the backend.
    pub city: String,
    /// `metric` or `imperial`.
    pub units: Units,
    /// Time between automatic refreshes (e.g. `"10m"`).
    pub refresh_interval: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            city: "Verona".to_string(),
            units: Units::Metric,
            refresh_interval: "10m".to_string(),
        }
    }
}

impl WeatherConfig {
    /// Parsed refresh interval, falling back to ten minutes.
    pub fn refresh_interval(&self) -> Duration {
        parse_duration(
            "weather.refresh_interval",
            &self.refresh_interval,
            Duration::from_secs(600),
        )
    }
}

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

/// Backend connection configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServicesConfig {
    /// Base URL of the weather/music backend.
    pub base_url: String,
}

impl Default for ServicesConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Log
// ---------------------------------------------------------------------------

/// Logging configuration from the `[log]` section.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    /// Logging verbosity, overridden by `WD_LOG`.
    pub level: LogLevel,
    /// Path to log file. Empty string means stderr (the TUI uses
    /// `<data dir>/wd.log` instead).
    pub file: String,
}

/// Log verbosity levels (kebab-case in TOML).
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LogLevel {
    /// Only errors.
    Error,
    /// Errors and warnings.
    Warn,
    /// Informational messages (default).
    #[default]
    Info,
    /// Debug-level detail.
    Debug,
    /// Full trace output.
    Trace,
}

impl LogLevel {
    /// Directive string understood by `EnvFilter`.
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

fn parse_duration(field: &str, value: &str, fallback: Duration) -> Duration {
    match humantime::parse_duration(value.trim()) {
        Ok(d) if !d.is_zero() => d,
        Ok(_) => {
            tracing::warn!("{field} must be positive, using {}", humantime::format_duration(fallback));
            fallback
        }
        Err(e) => {
            tracing::warn!(
                "invalid {field} '{value}': {e}, using {}",
                humantime::format_duration(fallback)
            );
            fallback
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
