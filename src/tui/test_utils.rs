//! Shared test utilities for TUI testing with ratatui TestBackend.
//!
//! Provides helpers for creating test terminals, extracting buffer content,
//! asserting colors, and booting an [`App`] over an in-memory store.

#![cfg(test)]

use crate::config::schema::default_library;
use crate::engine::Dashboard;
use crate::store::{shared, LayoutStore, MemoryStore, SharedStore};
use crate::tui::app::App;
use crate::widgets::builtin::{register_builtins, BuiltinEnv};
use crate::widgets::weather::WeatherSettings;
use crate::widgets::WidgetRegistry;
use dashboard_services::Units;
use ratatui::{backend::TestBackend, buffer::Buffer, style::Color, Terminal};
use std::time::Duration;

/// Creates a Terminal with TestBackend at the specified dimensions.
pub fn test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).expect("failed to create test terminal")
}

/// Extracts all text from a specific row in the buffer as a single String.
pub fn row_text(buffer: &Buffer, row: u16) -> String {
    let area = buffer.area();
    if row >= area.height {
        return String::new();
    }
    (0..area.width)
        .map(|col| {
            buffer
                .cell((col, row))
                .map(|cell| cell.symbol())
                .unwrap_or(" ")
        })
        .collect()
}

/// Checks if a specific row contains the given substring.
pub fn row_contains(buffer: &Buffer, row: u16, text: &str) -> bool {
    row_text(buffer, row).contains(text)
}

/// Finds the first row index that contains the given text, or None if not found.
pub fn find_row_with_text(buffer: &Buffer, text: &str) -> Option<u16> {
    let area = buffer.area();
    (0..area.height).find(|&row| row_contains(buffer, row, text))
}

/// Whether any row contains the given text.
pub fn buffer_contains(buffer: &Buffer, text: &str) -> bool {
    find_row_with_text(buffer, text).is_some()
}

/// Asserts that the cell at (col, row) has the specified foreground color.
pub fn assert_fg_color(buffer: &Buffer, col: u16, row: u16, color: Color) {
    let cell = buffer
        .cell((col, row))
        .unwrap_or_else(|| panic!("cell at ({}, {}) does not exist", col, row));
    assert_eq!(
        cell.fg, color,
        "expected fg color {:?} at ({}, {}), got {:?}",
        color, col, row, cell.fg
    );
}

/// Registry with the built-in widgets and no backend client.
pub fn builtin_registry(store: &SharedStore) -> WidgetRegistry {
    let mut registry = WidgetRegistry::new();
    let env = BuiltinEnv {
        store: store.clone(),
        client: None,
        weather: WeatherSettings {
            city: "Verona".to_string(),
            units: Units::Metric,
            refresh_interval: Duration::from_secs(600),
        },
    };
    register_builtins(&mut registry, &env);
    registry
}

/// Boots an app over `store` with the default library.
pub fn app_with_store(store: SharedStore) -> App {
    let registry = builtin_registry(&store);
    let dashboard = Dashboard::boot(registry, LayoutStore::new(store), default_library());
    App::new(dashboard, Duration::from_millis(250))
}

/// Boots an app over an empty store and places the given widgets directly.
pub fn make_app(widgets: &[(usize, &str)]) -> App {
    let mut app = app_with_store(shared(MemoryStore::new()));
    for (index, widget_type) in widgets {
        app.dashboard.place(*index, widget_type);
    }
    app
}
