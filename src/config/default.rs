//! Default configuration template and file creation utilities.
//!
//! Provides a well-commented TOML template that matches `Config::default()`
//! and a function to write it to the config path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::error::ConfigError;
use crate::config::xdg;

// ---------------------------------------------------------------------------
// Default TOML template
// ---------------------------------------------------------------------------

/// A well-commented TOML template with all default values.
///
/// Every value here must match `Config::default()` from `schema.rs`.
/// Sections: `[dashboard]`, `[weather]`, `[services]`, `[log]`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Widget Dashboard Configuration
#
# This file was auto-generated with default values.
# All values shown below are the built-in defaults.
#
# Location: $XDG_CONFIG_HOME/widget-dashboard/config.toml

# ==============================================================================
# Dashboard
# ==============================================================================

[dashboard]

# File holding the saved layout and per-widget state.
# Empty string means <data dir>/storage.json
# (~/.local/share/widget-dashboard/storage.json on Linux).
storage_path = ""

# How often the dashboard redraws (clock, fetched data).
# Examples: "250ms", "1s"
tick_rate = "1s"

# Widgets offered in the edit panel, in display order.
# `type` must be a registered widget: clock, weather, tasklist, player.
library = [
    { type = "clock", name = "Clock" },
    { type = "weather", name = "Weather" },
    { type = "tasklist", name = "Tasks" },
    { type = "player", name = "Music" },
]

# ==============================================================================
# Weather widget
# ==============================================================================

[weather]

# City to report. Overridden by $WD_CITY.
city = "Verona"

# Options: "metric" (°C, km/h), "imperial" (°F, mph). Overridden by $WD_UNITS.
units = "metric"

# Time between automatic refreshes. Press `r` on the widget to refresh now.
refresh_interval = "10m"

# ==============================================================================
# Backend services
# ==============================================================================

[services]

# Base URL of the weather/music backend.
base_url = "http://127.0.0.1:8000"

# ==============================================================================
# Logging
# ==============================================================================

[log]

# Options: "error", "warn", "info", "debug", "trace"
# Overridden by $WD_LOG (EnvFilter syntax).
level = "info"

# Path to log file. Empty string means stderr for CLI commands and
# <data dir>/wd.log for the interactive dashboard.
file = ""
"#;

// ---------------------------------------------------------------------------
// File creation
// ---------------------------------------------------------------------------

/// Creates (or force-overwrites) the config file at `path`, or at the default
/// location when `path` is `None`.
///
/// - If the file exists and `force` is `false`, returns `ConfigError::AlreadyExists`.
/// - If the file exists and `force` is `true`, backs it up to `.toml.backup` first.
/// - Returns the path where the config was written.
pub fn create_default_config(path: Option<&Path>, force: bool) -> Result<PathBuf, ConfigError> {
    let path = path.map_or_else(xdg::config_path, Path::to_path_buf);

    if path.exists() {
        if !force {
            return Err(ConfigError::AlreadyExists { path });
        }
        let backup_path = path.with_extension("toml.backup");
        fs::rename(&path, &backup_path).map_err(|e| ConfigError::WriteError {
            path: backup_path.clone(),
            source: e,
        })?;
        tracing::info!("Backed up existing config to {}", backup_path.display());
    }

    write_default_config(&path)?;
    tracing::info!("Created default configuration at {}", path.display());
    Ok(path)
}

/// Writes the default template to `path`, creating parent dirs and setting 0600 permissions.
fn write_default_config(path: &Path) -> Result<(), ConfigError> {
    let write_error = |source| ConfigError::WriteError {
        path: path.to_path_buf(),
        source,
    };

    xdg::ensure_parent(path).map_err(write_error)?;
    fs::write(path, DEFAULT_CONFIG_TEMPLATE).map_err(write_error)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600)).map_err(write_error)?;
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
