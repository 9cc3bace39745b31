//! Configuration file loader with position-aware error reporting.
//!
//! Loads TOML configuration from a specific path or the default XDG location.
//! When the default location has no file, returns `Config::default()`.

use std::fs;
use std::path::Path;

use crate::config::error::ConfigError;
use crate::config::schema::Config;
use crate::config::xdg;

/// Stateless configuration loader.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Loads the explicit path if given, otherwise the default location, then
    /// applies environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config = match explicit {
            Some(path) => Self::load_from_path(path)?,
            None => Self::load_default()?,
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Reads and parses the config file at `path`.
    ///
    /// A missing file is `NotFound` here, since the caller asked for it.
    pub fn load_from_path(path: &Path) -> Result<Config, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                    message: "Dashboard config file not found".to_string(),
                })
            }
            Err(source) => {
                return Err(ConfigError::ReadError {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let config = Self::parse_toml(&content, path)?;
        tracing::debug!(
            path = %path.display(),
            library = config.dashboard.library.len(),
            "loaded dashboard config"
        );
        Ok(config)
    }

    /// Loads `<config dir>/widget-dashboard/config.toml`, or built-in
    /// defaults when that file does not exist.
    pub fn load_default() -> Result<Config, ConfigError> {
        let path = xdg::config_path();
        if !path.exists() {
            tracing::debug!(
                path = %path.display(),
                "no dashboard config, using built-in defaults"
            );
            return Ok(Config::default());
        }
        Self::load_from_path(&path)
    }

    /// Parses TOML into a [`Config`], reporting the line, column and table
    /// (`[weather]`, `[[dashboard.library]]`, ...) of the first error.
    fn parse_toml(content: &str, path: &Path) -> Result<Config, ConfigError> {
        toml::from_str(content).map_err(|e| {
            let offset = e.span().map(|span| span.start.min(content.len()));
            let (line, column) = offset.map_or((0, 0), |at| line_and_column(content, at));
            let section = offset
                .map_or_else(|| "top level".to_string(), |at| section_at(content, at));
            ConfigError::ParseError {
                path: path.to_path_buf(),
                line,
                column,
                section,
                message: e.message().to_string(),
            }
        })
    }
}

/// One-based line and column of byte offset `at`.
fn line_and_column(content: &str, at: usize) -> (usize, usize) {
    let before = &content[..at];
    let line_start = before.rfind('\n').map_or(0, |p| p + 1);
    (before.matches('\n').count() + 1, at - line_start + 1)
}

/// Name of the table whose body contains byte offset `at`, or "top level"
/// before the first header.
fn section_at(content: &str, at: usize) -> String {
    content[..at]
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| line.starts_with('['))
        .map(|header| {
            let name = header.trim_start_matches('[');
            let name = name.split(']').next().unwrap_or(name);
            format!("[{}]", name.trim())
        })
        .unwrap_or_else(|| "top level".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::LogLevel;
    use dashboard_services::Units;
    use serial_test::serial;
    use std::path::PathBuf;

    /// Run a closure with `XDG_CONFIG_HOME` temporarily set, then restore.
    fn with_xdg_config<F: FnOnce()>(value: Option<&str>, f: F) {
        let original = std::env::var("XDG_CONFIG_HOME").ok();
        match value {
            Some(v) => std::env::set_var("XDG_CONFIG_HOME", v),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
        f();
        match original {
            Some(v) => std::env::set_var("XDG_CONFIG_HOME", v),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }

    // -----------------------------------------------------------------------
    // parse_toml
    // -----------------------------------------------------------------------

    #[test]
    fn parse_partial_config_fills_defaults() {
        let toml_str = r#"
[weather]
city = "Oslo"
"#;
        let path = PathBuf::from("partial.toml");
        let config =
            ConfigLoader::parse_toml(toml_str, &path).expect("partial config should parse");
        assert_eq!(config.weather.city, "Oslo");
        assert_eq!(config.weather.units, Units::Metric);
        assert_eq!(config.dashboard.tick_rate, "1s");
    }

    #[test]
    fn parse_empty_string_returns_defaults() {
        let path = PathBuf::from("empty.toml");
        let config =
            ConfigLoader::parse_toml("", &path).expect("empty string should parse to defaults");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn parse_invalid_toml_returns_parse_error_with_position() {
        let toml_str = "key = \ninvalid";
        let path = PathBuf::from("bad.toml");
        let err = ConfigLoader::parse_toml(toml_str, &path).expect_err("should fail");
        match err {
            ConfigError::ParseError {
                path: p,
                line,
                column,
                message,
                ..
            } => {
                assert_eq!(p, path);
                assert!(line > 0, "line should be > 0 for known span");
                assert!(column > 0, "column should be > 0 for known span");
                assert!(!message.is_empty(), "message should not be empty");
            }
            other => panic!("expected ParseError, got: {other:?}"),
        }
    }

    #[test]
    fn parse_error_for_wrong_type_names_line_and_section() {
        let toml_str = "[dashboard]\ntick_rate = \"1s\"\n\n[weather]\ncity = 42\n";
        let path = PathBuf::from("wrong_type.toml");
        let err = ConfigLoader::parse_toml(toml_str, &path).expect_err("should fail");
        match &err {
            ConfigError::ParseError { line, section, .. } => {
                assert_eq!(*line, 5);
                assert_eq!(section, "[weather]");
            }
            other => panic!("expected ParseError, got: {other:?}"),
        }
        assert!(err.to_string().contains("in [weather]"), "got: {err}");
    }

    #[test]
    fn parse_error_inside_library_entry_names_array_table() {
        let toml_str = "[[dashboard.library]]\ntype = \"clock\"\nname = 7\n";
        let path = PathBuf::from("library.toml");
        let err = ConfigLoader::parse_toml(toml_str, &path).expect_err("should fail");
        match err {
            ConfigError::ParseError { section, .. } => {
                assert_eq!(section, "[dashboard.library]")
            }
            other => panic!("expected ParseError, got: {other:?}"),
        }
    }

    #[test]
    fn section_at_before_any_header_is_top_level() {
        assert_eq!(section_at("bogus = \n[log]\n", 3), "top level");
        assert_eq!(section_at("[log]\nlevel = 1\n", 8), "[log]");
    }

    // -----------------------------------------------------------------------
    // load_from_path
    // -----------------------------------------------------------------------

    #[test]
    fn load_from_path_valid_file() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let file = dir.path().join("config.toml");
        fs::write(&file, "[log]\nlevel = \"trace\"\n").expect("failed to write temp file");
        let config = ConfigLoader::load_from_path(&file).expect("should load");
        assert_eq!(config.log.level, LogLevel::Trace);
    }

    #[test]
    fn load_from_path_missing_file_returns_not_found() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("missing.toml");
        let err = ConfigLoader::load_from_path(&path).expect_err("should fail");
        match err {
            ConfigError::NotFound { path: p, .. } => assert_eq!(p, path),
            other => panic!("expected NotFound, got: {other:?}"),
        }
    }

    #[test]
    fn load_from_path_directory_returns_read_error() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let err = ConfigLoader::load_from_path(dir.path()).expect_err("should fail");
        match err {
            ConfigError::ReadError { path, .. } => assert_eq!(path, dir.path()),
            other => panic!("expected ReadError, got: {other:?}"),
        }
    }

    // -----------------------------------------------------------------------
    // load_default / load
    // -----------------------------------------------------------------------

    #[test]
    #[serial]
    fn load_default_with_no_file_returns_defaults() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        with_xdg_config(Some(dir.path().to_str().expect("non-utf8 path")), || {
            let config = ConfigLoader::load_default().expect("should return defaults");
            assert_eq!(config, Config::default());
        });
    }

    #[test]
    #[serial]
    fn load_default_with_existing_file_parses_it() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let config_dir = dir.path().join("widget-dashboard");
        fs::create_dir_all(&config_dir).expect("failed to create config dir");
        fs::write(config_dir.join("config.toml"), "[log]\nlevel = \"warn\"\n")
            .expect("failed to write config");
        with_xdg_config(Some(dir.path().to_str().expect("non-utf8 path")), || {
            let config = ConfigLoader::load_default().expect("should load");
            assert_eq!(config.log.level, LogLevel::Warn);
        });
    }

    #[test]
    #[serial]
    fn load_applies_env_overrides_after_file() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let file = dir.path().join("config.toml");
        fs::write(&file, "[weather]\ncity = \"Oslo\"\n").expect("failed to write config");
        std::env::set_var("WD_CITY", "Turin");
        let result = ConfigLoader::load(Some(&file));
        std::env::remove_var("WD_CITY");
        assert_eq!(result.expect("should load").weather.city, "Turin");
    }
}
