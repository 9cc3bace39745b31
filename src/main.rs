//! Widget Dashboard - CLI entry point
//!
//! `wd tui` runs the interactive dashboard. The `layout` subcommands drive
//! the same engine headlessly against the storage file, and `weather`,
//! `music` and `health` talk to the backend directly.

use clap::{Parser, Subcommand};
use dashboard_services::{ServiceClient, Units};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use widget_dashboard::{
    config::{default, loader::ConfigLoader, schema::Config, xdg},
    engine::{Dashboard, Placement},
    layout::{SchemaCatalog, PRESET_NAMES},
    logging,
    store::{shared, FileStore, LayoutStore, StoreError},
    tui::app::App,
    widgets::{register_builtins, weather, BuiltinEnv, WidgetRegistry},
};

/// Widget dashboard
#[derive(Parser)]
#[command(name = "wd")]
#[command(version, about = "Schema-driven widget dashboard")]
struct Cli {
    /// Configuration file (default: XDG config location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Storage file holding the layout and widget state
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands for the wd CLI
#[derive(Subcommand)]
enum Commands {
    /// Launch the terminal user interface
    Tui,

    /// Inspect or edit the saved layout without the TUI
    Layout {
        #[command(subcommand)]
        action: LayoutAction,
    },

    /// Fetch current weather from the backend
    Weather {
        /// City to look up (default: configured city)
        #[arg(long)]
        city: Option<String>,
        /// metric or imperial (default: configured units)
        #[arg(long)]
        units: Option<Units>,
    },

    /// List or upload music on the backend
    Music {
        #[command(subcommand)]
        action: MusicAction,
    },

    /// Check backend health
    Health,

    /// Manage configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Actions for the `layout` subcommand.
#[derive(Subcommand)]
enum LayoutAction {
    /// Print the current schema and cell contents
    Show {
        /// Print the persisted JSON form
        #[arg(long)]
        json: bool,
    },
    /// List preset schemas, marking the active one
    Schemas,
    /// Switch to a preset schema (clears all cells)
    SetSchema {
        /// Preset name, e.g. 2x2 or tall-left
        name: String,
    },
    /// Place a widget into a cell
    Place {
        /// Zero-based cell index
        cell: usize,
        /// Registered widget type
        widget_type: String,
    },
    /// Remove the widget from a cell
    Remove {
        /// Zero-based cell index
        cell: usize,
    },
    /// Forget the saved layout and show the default schema
    Reset,
    /// List registered widget types and the edit panel library
    Widgets,
}

/// Actions for the `music` subcommand.
#[derive(Subcommand)]
enum MusicAction {
    /// List tracks
    List,
    /// Upload audio files
    Upload {
        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

/// Actions for the `config` subcommand.
#[derive(Subcommand)]
enum ConfigAction {
    /// Create default configuration file
    Init {
        /// Overwrite existing configuration (creates backup)
        #[arg(long)]
        force: bool,
    },
    /// Show configuration file path
    Path,
    /// Validate configuration file
    Validate,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config subcommands work on the file itself and must not require it to parse.
    if let Commands::Config { action } = &cli.command {
        return run_config_command(action, cli.config.as_deref());
    }

    let config = match ConfigLoader::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let storage = cli
        .storage
        .clone()
        .unwrap_or_else(|| config.dashboard.storage_path());

    match cli.command {
        Commands::Tui => run_tui(&config, &storage),
        Commands::Layout { action } => {
            init_logging(&config, None);
            run_layout_command(&config, &storage, action)
        }
        Commands::Weather { city, units } => {
            init_logging(&config, None);
            run_weather_command(&config, city, units)
        }
        Commands::Music { action } => {
            init_logging(&config, None);
            run_music_command(&config, action)
        }
        Commands::Health => {
            init_logging(&config, None);
            run_health_command(&config)
        }
        Commands::Config { .. } => ExitCode::SUCCESS,
    }
}

/// Installs logging from `[log]`, with `fallback` as the file when none is
/// configured.
fn init_logging(config: &Config, fallback: Option<PathBuf>) {
    let configured = config.log.file.trim();
    let file = if configured.is_empty() {
        fallback
    } else {
        Some(xdg::expand_tilde(configured))
    };
    logging::init(config.log.level, file.as_deref());
}

/// Opens the storage file and boots a dashboard over it.
///
/// Without a client, network-backed widgets show their loading state.
fn open_dashboard(
    config: &Config,
    storage: &Path,
    client: Option<ServiceClient>,
) -> Result<Dashboard, StoreError> {
    xdg::ensure_parent(storage).map_err(|source| StoreError::Write {
        path: storage.to_path_buf(),
        source,
    })?;
    let kv = shared(FileStore::open(storage)?);
    let env = BuiltinEnv {
        store: kv.clone(),
        client,
        weather: weather::WeatherSettings::from(&config.weather),
    };
    let mut registry = WidgetRegistry::new();
    register_builtins(&mut registry, &env);
    Ok(Dashboard::boot(
        registry,
        LayoutStore::new(kv),
        config.dashboard.library.clone(),
    ))
}

fn run_tui(config: &Config, storage: &Path) -> ExitCode {
    init_logging(config, Some(xdg::default_log_path()));

    // The blocking client must be created, and finally dropped, outside the
    // runtime; this handle outlives it.
    let client = match ServiceClient::new(config.services.base_url.clone()) {
        Ok(client) => Some(client),
        Err(e) => {
            tracing::warn!("backend client unavailable: {e}");
            None
        }
    };

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("TUI error: failed to create runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let tick_rate = config.dashboard.tick_rate();
    let result = rt.block_on(async {
        let dashboard = match open_dashboard(config, storage, client.clone()) {
            Ok(dashboard) => dashboard,
            Err(e) => return Err(format!("Storage error: {e}")),
        };
        let mut app = App::new(dashboard, tick_rate);
        app.run().await.map_err(|e| format!("TUI error: {e}"))
    });
    drop(rt);
    drop(client);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run_layout_command(config: &Config, storage: &Path, action: LayoutAction) -> ExitCode {
    let mut dashboard = match open_dashboard(config, storage, None) {
        Ok(dashboard) => dashboard,
        Err(e) => {
            eprintln!("Storage error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match action {
        LayoutAction::Show { json } => {
            let layout = dashboard.layout();
            if json {
                match serde_json::to_string_pretty(&layout) {
                    Ok(text) => println!("{text}"),
                    Err(e) => {
                        eprintln!("Error: failed to serialize layout: {e}");
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                println!("Schema: {}", layout.schema);
                for (index, cell) in layout.cells.iter().enumerate() {
                    println!("  [{index}] {}", cell.as_deref().unwrap_or("-"));
                }
            }
        }
        LayoutAction::Schemas => {
            let current = dashboard.state().schema_name();
            for &name in PRESET_NAMES {
                let marker = if name == current { "*" } else { " " };
                let (_, schema) = SchemaCatalog::resolve(name);
                println!(
                    "{marker} {name:<12} {}x{}, {} cells",
                    schema.cols,
                    schema.rows,
                    schema.cell_count()
                );
            }
        }
        LayoutAction::SetSchema { name } => {
            dashboard.set_panel_open(true);
            dashboard.select_schema(&name);
            let resolved = dashboard.state().schema_name();
            if !SchemaCatalog::contains(&name) {
                eprintln!("Unknown schema '{name}', using {resolved}");
                return ExitCode::FAILURE;
            }
            println!("Layout: {resolved} ({} cells)", dashboard.grid().len());
        }
        LayoutAction::Place { cell, widget_type } => {
            dashboard.set_panel_open(true);
            match dashboard.drop(cell, &widget_type) {
                Some(Placement::Placed) => println!("Placed {widget_type} in cell {cell}"),
                Some(Placement::Unavailable) => {
                    eprintln!("Widget type '{widget_type}' is not registered");
                    return ExitCode::FAILURE;
                }
                Some(Placement::NoSuchCell) | None => {
                    eprintln!(
                        "No cell {cell} in layout {} ({} cells)",
                        dashboard.state().schema_name(),
                        dashboard.grid().len()
                    );
                    return ExitCode::FAILURE;
                }
            }
        }
        LayoutAction::Remove { cell } => {
            dashboard.set_panel_open(true);
            if !dashboard.remove(cell) {
                eprintln!("Cell {cell} holds no widget");
                return ExitCode::FAILURE;
            }
            println!("Removed widget from cell {cell}");
        }
        LayoutAction::Reset => {
            dashboard.set_panel_open(true);
            dashboard.reset();
            println!("Layout reset to {}", dashboard.state().schema_name());
        }
        LayoutAction::Widgets => {
            println!("Registered:");
            for id in dashboard.registry().available_ids() {
                println!("  {id}");
            }
            println!("Library:");
            for item in dashboard.library() {
                let note = if dashboard.registry().contains(&item.widget_type) {
                    ""
                } else {
                    " (unavailable)"
                };
                println!("  {} ({}){note}", item.name, item.widget_type);
            }
        }
    }
    ExitCode::SUCCESS
}

/// Builds a backend client, reporting failure on stderr.
fn client(config: &Config) -> Option<ServiceClient> {
    match ServiceClient::new(config.services.base_url.clone()) {
        Ok(client) => Some(client),
        Err(e) => {
            eprintln!("Error: {e}");
            None
        }
    }
}

fn run_weather_command(config: &Config, city: Option<String>, units: Option<Units>) -> ExitCode {
    let Some(client) = client(config) else {
        return ExitCode::FAILURE;
    };
    let city = city.unwrap_or_else(|| config.weather.city.clone());
    let units = units.unwrap_or(config.weather.units);
    match client.weather(&city, units) {
        Ok(report) => {
            let (temperature, meta) = weather::summarize(&report, units);
            println!("{temperature}");
            println!("{meta}");
            if let Some(description) = &report.description {
                println!("{description}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Weather error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run_music_command(config: &Config, action: MusicAction) -> ExitCode {
    let Some(client) = client(config) else {
        return ExitCode::FAILURE;
    };
    match action {
        MusicAction::List => match client.music_list() {
            Ok(list) if list.tracks.is_empty() => {
                println!("No tracks");
                ExitCode::SUCCESS
            }
            Ok(list) => {
                for (i, track) in list.tracks.iter().enumerate() {
                    println!("{:>3}. {}", i + 1, track.display_name());
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Music error: {e}");
                ExitCode::FAILURE
            }
        },
        MusicAction::Upload { files } => match client.upload_music(&files) {
            Ok(response) => {
                for name in &response.saved {
                    println!("Saved {name}");
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Upload error: {e}");
                ExitCode::FAILURE
            }
        },
    }
}

fn run_health_command(config: &Config) -> ExitCode {
    let Some(client) = client(config) else {
        return ExitCode::FAILURE;
    };
    match client.health() {
        Ok(health) => {
            match health.time {
                Some(time) => println!("{} ({})", health.status, time.to_rfc3339()),
                None => println!("{}", health.status),
            }
            if health.status == "ok" {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("Backend unreachable at {}: {e}", client.base_url());
            ExitCode::FAILURE
        }
    }
}

fn run_config_command(action: &ConfigAction, explicit: Option<&Path>) -> ExitCode {
    let result = match action {
        ConfigAction::Init { force } => {
            default::create_default_config(explicit, *force).map(|path| {
                println!("Created configuration at {}", path.display());
            })
        }
        ConfigAction::Path => {
            let path = explicit.map_or_else(xdg::config_path, Path::to_path_buf);
            println!("{}", path.display());
            Ok(())
        }
        ConfigAction::Validate => ConfigLoader::load(explicit).map(|config| {
            println!("Configuration is valid");
            println!("{config:#?}");
        }),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Config error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        // Verify the CLI configuration is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["wd"]).is_err());
    }

    #[test]
    fn test_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "wd",
            "layout",
            "show",
            "--storage",
            "/tmp/s.json",
            "--config",
            "/tmp/c.toml",
        ])
        .unwrap();
        assert_eq!(cli.storage, Some(PathBuf::from("/tmp/s.json")));
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/c.toml")));
        assert!(matches!(
            cli.command,
            Commands::Layout {
                action: LayoutAction::Show { json: false }
            }
        ));
    }

    #[test]
    fn test_layout_place_parses_cell_and_type() {
        let cli = Cli::try_parse_from(["wd", "layout", "place", "2", "clock"]).unwrap();
        match cli.command {
            Commands::Layout {
                action: LayoutAction::Place { cell, widget_type },
            } => {
                assert_eq!(cell, 2);
                assert_eq!(widget_type, "clock");
            }
            _ => panic!("unexpected command variant"),
        }
    }

    #[test]
    fn test_layout_place_rejects_negative_cell() {
        assert!(Cli::try_parse_from(["wd", "layout", "place", "-1", "clock"]).is_err());
    }

    #[test]
    fn test_weather_units_parse() {
        let cli = Cli::try_parse_from(["wd", "weather", "--units", "imperial"]).unwrap();
        match cli.command {
            Commands::Weather { city, units } => {
                assert_eq!(city, None);
                assert_eq!(units, Some(Units::Imperial));
            }
            _ => panic!("unexpected command variant"),
        }
        assert!(Cli::try_parse_from(["wd", "weather", "--units", "kelvin"]).is_err());
    }

    #[test]
    fn test_music_upload_requires_files() {
        assert!(Cli::try_parse_from(["wd", "music", "upload"]).is_err());
        let cli = Cli::try_parse_from(["wd", "music", "upload", "a.mp3", "b.mp3"]).unwrap();
        match cli.command {
            Commands::Music {
                action: MusicAction::Upload { files },
            } => assert_eq!(files.len(), 2),
            _ => panic!("unexpected command variant"),
        }
    }

    #[test]
    fn test_config_init_force_flag() {
        let cli = Cli::try_parse_from(["wd", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config {
                action: ConfigAction::Init { force: true }
            }
        ));
    }
}
