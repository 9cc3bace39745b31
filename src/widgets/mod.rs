//! Widget system for the dashboard.
//!
//! This module defines the `Widget` trait that every dashboard widget
//! implements and the `WidgetRegistry` that maps widget type names to
//! factories.
//!
//! # Architecture
//!
//! A widget occupies one grid cell. The engine only knows its type name and
//! cell index; everything else (fetched data, user preferences, task items)
//! is owned by the widget and persisted by it under
//! `wd.widget.<type>.<field>.<cell>` via [`state_key`].
//!
//! Factories receive a [`WidgetContext`] describing where the widget is
//! being placed. Anything else a widget needs (the shared store, the
//! backend client) is captured by the factory closure at registration time.
//!
//! # Example
//!
//! ```
//! use widget_dashboard::widgets::{Widget, WidgetContext, WidgetRegistry};
//! use ratatui::text::Line;
//!
//! struct Hello;
//!
//! impl Widget for Hello {
//!     fn widget_type(&self) -> &'static str {
//!         "hello"
//!     }
//!     fn title(&self) -> &str {
//!         "Hello"
//!     }
//!     fn render(&self, _width: u16) -> Vec<Line<'static>> {
//!         vec![Line::raw("hi")]
//!     }
//! }
//!
//! let mut registry = WidgetRegistry::new();
//! registry.register("hello", |_ctx: &WidgetContext| -> Box<dyn Widget> { Box::new(Hello) });
//! let ctx = WidgetContext::new(false, 0);
//! assert!(registry.create("hello", &ctx).is_some());
//! assert!(registry.create("missing", &ctx).is_none());
//! ```

pub mod builtin;
pub mod clock;
pub mod player;
pub mod refresh;
pub mod tasklist;
pub mod weather;

pub use builtin::{register_builtins, BuiltinEnv};
pub use refresh::{FetchState, Refresher};

use crossterm::event::KeyEvent;
use ratatui::text::Line;
use std::collections::HashMap;

/// Trait for dashboard widgets.
///
/// # Required Methods
///
/// - [`widget_type`](Widget::widget_type): The registered type name.
/// - [`title`](Widget::title): Label shown in the cell border.
/// - [`render`](Widget::render): Produce the body lines for the cell.
///
/// [`handle_key`](Widget::handle_key) and [`teardown`](Widget::teardown)
/// default to no-ops.
pub trait Widget: Send {
    /// Type name this widget was registered under.
    ///
    /// This is the value persisted in the layout for the widget's cell.
    fn widget_type(&self) -> &'static str;

    /// Human-readable label for the cell border.
    fn title(&self) -> &str;

    /// Render the widget body.
    ///
    /// # Arguments
    ///
    /// * `width` - Available horizontal space in columns.
    fn render(&self, width: u16) -> Vec<Line<'static>>;

    /// Handle a key press while the widget's cell is focused.
    ///
    /// Returns `true` if the key was consumed.
    fn handle_key(&mut self, _key: KeyEvent) -> bool {
        false
    }

    /// Release background work before the widget is discarded.
    ///
    /// Called by the engine whenever the widget's cell is cleared or
    /// replaced. After this returns, no background task may touch the
    /// widget's state.
    fn teardown(&mut self) {}
}

/// Where a widget is being placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetContext {
    /// Whether the dashboard is in edit mode at creation time.
    pub edit_mode: bool,
    /// Index of the cell the widget will occupy.
    pub cell_index: usize,
}

impl WidgetContext {
    /// Creates a context for `cell_index`.
    pub fn new(edit_mode: bool, cell_index: usize) -> Self {
        Self {
            edit_mode,
            cell_index,
        }
    }
}

/// Factory type for creating widget instances.
pub type WidgetFactory = Box<dyn Fn(&WidgetContext) -> Box<dyn Widget> + Send + Sync>;

/// Registry mapping widget type names to factories.
///
/// Starts empty; built-in widgets are added by
/// [`register_builtins`](builtin::register_builtins) before the dashboard
/// boots.
#[derive(Default)]
pub struct WidgetRegistry {
    factories: HashMap<String, WidgetFactory>,
}

impl WidgetRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a widget factory for the given type name.
    ///
    /// Overwrites any existing factory for the same name.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&WidgetContext) -> Box<dyn Widget> + Send + Sync + 'static,
    {
        let name = name.into();
        if self.factories.insert(name.clone(), Box::new(factory)).is_some() {
            tracing::debug!(widget = %name, "replaced widget factory");
        }
    }

    /// Create a widget instance by type name.
    ///
    /// Returns `None` if no factory is registered for `name`.
    pub fn create(&self, name: &str, context: &WidgetContext) -> Option<Box<dyn Widget>> {
        self.factories.get(name).map(|factory| factory(context))
    }

    /// Whether a factory is registered for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// All registered type names, sorted.
    pub fn available_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl std::fmt::Debug for WidgetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WidgetRegistry")
            .field("types", &self.available_ids())
            .finish()
    }
}

/// Storage key for one field of a widget's per-cell state.
///
/// ```
/// use widget_dashboard::widgets::state_key;
/// assert_eq!(state_key("tasklist", "items", 3), "wd.widget.tasklist.items.3");
/// ```
pub fn state_key(widget_type: &str, field: &str, cell_index: usize) -> String {
    format!("wd.widget.{widget_type}.{field}.{cell_index}")
}
