//! Platform-aware path resolution for widget-dashboard.
//!
//! On **Linux**, follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/widget-dashboard` or `~/.config/widget-dashboard`
//! - Data (storage, log): `$XDG_DATA_HOME/widget-dashboard` or `~/.local/share/widget-dashboard`
//!
//! On **macOS**, uses Apple conventions with XDG env var overrides:
//! - Config and data: `~/Library/Application Support/widget-dashboard`

use std::fs;
use std::path::{Path, PathBuf};

const APP_NAME: &str = "widget-dashboard";

/// Returns the configuration directory for widget-dashboard.
///
/// Resolution order:
/// 1. `$XDG_CONFIG_HOME/widget-dashboard` (if env var set, any platform)
/// 2. Platform default:
///    - Linux: `~/.config/widget-dashboard`
///    - macOS: `~/Library/Application Support/widget-dashboard`
pub fn config_dir() -> PathBuf {
    if let Some(xdg) = env_dir("XDG_CONFIG_HOME") {
        return xdg.join(APP_NAME);
    }
    platform_config_dir().join(APP_NAME)
}

/// Returns the data directory holding the storage file and the TUI log.
///
/// Resolution order:
/// 1. `$XDG_DATA_HOME/widget-dashboard` (if env var set, any platform)
/// 2. Platform default:
///    - Linux: `~/.local/share/widget-dashboard`
///    - macOS: `~/Library/Application Support/widget-dashboard`
pub fn data_dir() -> PathBuf {
    if let Some(xdg) = env_dir("XDG_DATA_HOME") {
        return xdg.join(APP_NAME);
    }
    platform_data_dir().join(APP_NAME)
}

fn env_dir(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn home_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// Platform-native config base directory (without XDG override).
fn platform_config_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::config_dir().unwrap_or_else(|| home_dir().join("Library/Application Support"))
    }
    #[cfg(not(target_os = "macos"))]
    {
        home_dir().join(".config")
    }
}

/// Platform-native data base directory (without XDG override).
fn platform_data_dir() -> PathBuf {
    #[cfg(target_os = "macos")]
    {
        dirs::data_dir().unwrap_or_else(|| home_dir().join("Library/Application Support"))
    }
    #[cfg(not(target_os = "macos"))]
    {
        home_dir().join(".local/share")
    }
}

/// Returns the path to the main configuration file.
///
/// Resolves to `config_dir()/config.toml`.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Storage file used when `dashboard.storage_path` is empty.
pub fn default_storage_path() -> PathBuf {
    data_dir().join("storage.json")
}

/// Log file used by the TUI when `log.file` is empty.
pub fn default_log_path() -> PathBuf {
    data_dir().join("wd.log")
}

/// Expands a leading `~` in a path string to the user's home directory.
///
/// If the path does not start with `~`, it is returned as-is.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home_dir().join(rest)
    } else if path == "~" {
        home_dir()
    } else {
        PathBuf::from(path)
    }
}

/// Creates a directory and all parent directories with mode 0700.
///
/// Equivalent to `mkdir -p` with restricted permissions.
pub fn ensure_dir(path: &Path) -> std::io::Result<()> {
    fs::create_dir_all(path)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
    }
    Ok(())
}

/// Creates the configuration directory if it does not exist, returning its path.
pub fn ensure_config_dir() -> std::io::Result<PathBuf> {
    let dir = config_dir();
    ensure_dir(&dir)?;
    Ok(dir)
}

/// Creates the parent directory of `path` when it has one.
pub fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => ensure_dir(parent),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    /// Helper: run a closure with env vars temporarily set, then restore.
    fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], f: F) {
        let originals: Vec<_> = vars
            .iter()
            .map(|(k, _)| (*k, std::env::var(k).ok()))
            .collect();

        for (k, v) in vars {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        f();

        for (k, original) in &originals {
            match original {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }
    }

    #[test]
    #[serial]
    fn test_config_path_with_xdg_override() {
        with_env(&[("XDG_CONFIG_HOME", Some("/custom/config"))], || {
            assert_eq!(
                config_path(),
                PathBuf::from("/custom/config/widget-dashboard/config.toml")
            );
        });
    }

    #[test]
    #[serial]
    fn test_config_path_without_xdg_uses_platform_default() {
        with_env(&[("XDG_CONFIG_HOME", None)], || {
            let expected = platform_config_dir().join("widget-dashboard/config.toml");
            assert_eq!(config_path(), expected);
        });
    }

    #[test]
    #[serial]
    fn test_empty_xdg_var_is_ignored() {
        with_env(&[("XDG_DATA_HOME", Some(""))], || {
            assert_eq!(data_dir(), platform_data_dir().join("widget-dashboard"));
        });
    }

    #[cfg(not(target_os = "macos"))]
    #[test]
    #[serial]
    fn test_linux_data_default_is_local_share() {
        with_env(&[("XDG_DATA_HOME", None)], || {
            let home = dirs::home_dir().expect("home directory");
            assert_eq!(data_dir(), home.join(".local/share/widget-dashboard"));
        });
    }

    #[test]
    #[serial]
    fn test_storage_and_log_live_in_data_dir() {
        with_env(&[("XDG_DATA_HOME", Some("/custom/data"))], || {
            assert_eq!(
                default_storage_path(),
                PathBuf::from("/custom/data/widget-dashboard/storage.json")
            );
            assert_eq!(
                default_log_path(),
                PathBuf::from("/custom/data/widget-dashboard/wd.log")
            );
        });
    }

    #[test]
    fn test_expand_tilde_with_home_prefix() {
        let home = dirs::home_dir().expect("home directory");
        assert_eq!(expand_tilde("~/foo"), home.join("foo"));
        assert_eq!(expand_tilde("~"), home);
    }

    #[test]
    fn test_expand_tilde_other_paths_unchanged() {
        assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
        assert_eq!(expand_tilde("relative/path"), PathBuf::from("relative/path"));
    }

    #[test]
    fn test_ensure_dir_creates_directory_with_restricted_mode() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let nested = tmp.path().join("a/b/c");
        ensure_dir(&nested).expect("ensure_dir failed");
        assert!(nested.is_dir());
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&nested)
                .expect("failed to read metadata")
                .permissions()
                .mode();
            assert_eq!(mode & 0o777, 0o700);
        }
    }

    #[test]
    fn test_ensure_parent_creates_missing_parent() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        let file = tmp.path().join("nested/storage.json");
        ensure_parent(&file).expect("ensure_parent failed");
        assert!(tmp.path().join("nested").is_dir());
        ensure_parent(Path::new("storage.json")).expect("bare file name");
    }

    #[test]
    #[serial]
    fn test_ensure_config_dir_creates_at_xdg_path() {
        let tmp = tempfile::tempdir().expect("failed to create temp dir");
        with_env(
            &[(
                "XDG_CONFIG_HOME",
                Some(tmp.path().to_str().expect("non-utf8 tmpdir")),
            )],
            || {
                let result = ensure_config_dir().expect("ensure_config_dir failed");
                assert_eq!(result, tmp.path().join("widget-dashboard"));
                assert!(result.is_dir());
            },
        );
    }
}
