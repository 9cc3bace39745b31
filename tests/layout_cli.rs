//! Integration tests for the headless `wd layout` subcommands.
//!
//! Each test runs the real binary against a storage file in a temp dir,
//! with XDG directories redirected so no user configuration leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const WD_BIN: &str = env!("CARGO_BIN_EXE_wd");

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    fn storage(&self) -> PathBuf {
        self.dir.path().join("storage.json")
    }

    fn wd(&self) -> Command {
        let mut cmd = Command::new(WD_BIN);
        cmd.env("XDG_CONFIG_HOME", self.dir.path().join("config"))
            .env("XDG_DATA_HOME", self.dir.path().join("data"))
            .env("WD_LOG", "error")
            .env_remove("WD_CITY")
            .env_remove("WD_UNITS")
            .arg("--storage")
            .arg(self.storage());
        cmd
    }

    fn layout(&self, args: &[&str]) -> assert_cmd::assert::Assert {
        self.wd().arg("layout").args(args).assert()
    }

    fn saved_layout(&self) -> serde_json::Value {
        let output = self.wd().args(["layout", "show", "--json"]).output().expect("run wd");
        assert!(output.status.success());
        serde_json::from_slice(&output.stdout).expect("layout json")
    }

    fn storage_json(&self) -> serde_json::Value {
        read_json(&self.storage())
    }
}

fn read_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path).expect("storage file");
    serde_json::from_str(&text).expect("storage json")
}

#[test]
fn test_show_fresh_storage_is_default_grid() {
    let sb = Sandbox::new();
    sb.layout(&["show"])
        .success()
        .stdout(predicate::str::contains("Schema: 2x2"))
        .stdout(predicate::str::contains("[3] -"));
    // Booting alone never writes the layout.
    assert!(!sb.storage().exists());
}

#[test]
fn test_place_persists_and_survives_restart() {
    let sb = Sandbox::new();
    sb.layout(&["place", "2", "clock"])
        .success()
        .stdout(predicate::str::contains("Placed clock in cell 2"));

    let layout = sb.saved_layout();
    assert_eq!(layout["schema"], "2x2");
    assert_eq!(
        layout["cells"],
        serde_json::json!([null, null, "clock", null])
    );
    assert!(sb.storage_json()["wd.layout"].is_string());
}

#[test]
fn test_place_unknown_type_fails_and_stores_null() {
    let sb = Sandbox::new();
    sb.layout(&["place", "0", "stocks"])
        .failure()
        .stderr(predicate::str::contains("'stocks' is not registered"));
    assert_eq!(
        sb.saved_layout()["cells"],
        serde_json::json!([null, null, null, null])
    );
}

#[test]
fn test_place_out_of_range_cell_fails_without_saving() {
    let sb = Sandbox::new();
    sb.layout(&["place", "9", "clock"])
        .failure()
        .stderr(predicate::str::contains("No cell 9 in layout 2x2 (4 cells)"));
    assert!(!sb.storage().exists());
}

#[test]
fn test_set_schema_clears_cells() {
    let sb = Sandbox::new();
    sb.layout(&["place", "0", "weather"]).success();
    sb.layout(&["set-schema", "3x2"])
        .success()
        .stdout(predicate::str::contains("Layout: 3x2 (6 cells)"));
    let layout = sb.saved_layout();
    assert_eq!(layout["schema"], "3x2");
    assert_eq!(
        layout["cells"],
        serde_json::Value::Array(vec![serde_json::Value::Null; 6])
    );
}

#[test]
fn test_set_unknown_schema_falls_back_to_default() {
    let sb = Sandbox::new();
    sb.layout(&["set-schema", "4x4"]).success();
    sb.layout(&["set-schema", "hexagon"])
        .failure()
        .stderr(predicate::str::contains("Unknown schema 'hexagon', using 2x2"));
    assert_eq!(sb.saved_layout()["schema"], "2x2");
}

#[test]
fn test_schemas_marks_active() {
    let sb = Sandbox::new();
    sb.layout(&["set-schema", "tall-left"]).success();
    sb.layout(&["schemas"])
        .success()
        .stdout(predicate::str::contains("* tall-left"))
        .stdout(predicate::str::contains("  2x2"));
}

#[test]
fn test_remove_widget() {
    let sb = Sandbox::new();
    sb.layout(&["remove", "1"])
        .failure()
        .stderr(predicate::str::contains("Cell 1 holds no widget"));

    sb.layout(&["place", "1", "tasklist"]).success();
    sb.layout(&["remove", "1"])
        .success()
        .stdout(predicate::str::contains("Removed widget from cell 1"));
    assert_eq!(
        sb.saved_layout()["cells"],
        serde_json::json!([null, null, null, null])
    );
}

#[test]
fn test_reset_removes_saved_layout() {
    let sb = Sandbox::new();
    sb.layout(&["set-schema", "wide-bottom"]).success();
    sb.layout(&["place", "3", "player"]).success();
    sb.layout(&["reset"])
        .success()
        .stdout(predicate::str::contains("Layout reset to 2x2"));
    assert!(sb.storage_json().get("wd.layout").is_none());
    sb.layout(&["show"])
        .success()
        .stdout(predicate::str::contains("Schema: 2x2"));
}

#[test]
fn test_legacy_layout_is_migrated_on_boot() {
    let sb = Sandbox::new();
    let legacy = serde_json::json!({
        "wd.layout.v1": r#"{"schema":"2x2","cells":["clock"]}"#,
        "wd.layout.v4": r#"{"schema":"wide-top","cells":["weather",null,"clock",null]}"#,
    });
    std::fs::write(sb.storage(), legacy.to_string()).expect("write storage");

    sb.layout(&["show"])
        .success()
        .stdout(predicate::str::contains("Schema: wide-top"))
        .stdout(predicate::str::contains("[0] weather"))
        .stdout(predicate::str::contains("[2] clock"));

    let stored = sb.storage_json();
    assert_eq!(stored["wd.layout"], stored["wd.layout.v4"]);
    // Legacy keys are left in place.
    assert!(stored["wd.layout.v1"].is_string());
}

#[test]
fn test_corrupt_storage_file_does_not_block_boot() {
    let sb = Sandbox::new();
    std::fs::write(sb.storage(), "not json at all").expect("write storage");
    sb.layout(&["show"])
        .success()
        .stdout(predicate::str::contains("Schema: 2x2"));
}

#[test]
fn test_malformed_layout_value_falls_back_to_default() {
    let sb = Sandbox::new();
    let storage = serde_json::json!({ "wd.layout": "{broken" });
    std::fs::write(sb.storage(), storage.to_string()).expect("write storage");
    sb.layout(&["show"])
        .success()
        .stdout(predicate::str::contains("Schema: 2x2"));
}

#[test]
fn test_widgets_lists_registry_and_library() {
    let sb = Sandbox::new();
    sb.layout(&["widgets"])
        .success()
        .stdout(predicate::str::contains("  clock"))
        .stdout(predicate::str::contains("  player"))
        .stdout(predicate::str::contains("Music (player)"));
}

#[test]
fn test_missing_explicit_config_fails() {
    let sb = Sandbox::new();
    sb.wd()
        .arg("--config")
        .arg(sb.dir.path().join("nope.toml"))
        .args(["layout", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config error"));
}

#[test]
fn test_config_init_then_validate() {
    let sb = Sandbox::new();
    let path = sb.dir.path().join("wd.toml");
    sb.wd()
        .arg("--config")
        .arg(&path)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration"));
    sb.wd()
        .arg("--config")
        .arg(&path)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
    sb.wd()
        .arg("--config")
        .arg(&path)
        .args(["config", "init"])
        .assert()
        .failure();
}
