//! The layout engine.
//!
//! [`Dashboard`] ties together the widget registry, the schema catalog and
//! the layout store. It owns the rendered [`Grid`] and the [`EngineState`],
//! and exposes every user action as a synchronous method:
//!
//! - the edit panel toggle, which also switches between viewing and editing,
//! - schema selection and reset,
//! - the drag protocol (`start_drag`, `drag_over`, `drag_leave`, `drop`),
//! - widget removal.
//!
//! All layout mutations are refused while viewing. Each accepted mutation
//! writes the full layout back to the store, except reset, which only clears
//! it.

mod grid;
mod state;


pub use grid::{Cell, CellContent, Grid};
pub use state::{EngineState, Mode};

use crate::config::schema::LibraryItem;
use crate::layout::{SchemaCatalog, DEFAULT_SCHEMA};
use crate::store::{Layout, LayoutStore};
use crate::widgets::{WidgetContext, WidgetRegistry};
use crossterm::event::KeyEvent;

/// Panel rows besides the library: presets, actions and the two borders.
const PANEL_CHROME_ROWS: u16 = 4;

/// Outcome of [`Dashboard::place`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// The widget was created and installed.
    Placed,
    /// The type is not registered; an "unavailable" placeholder was installed.
    Unavailable,
    /// The index is outside the rendered grid; nothing changed.
    NoSuchCell,
}

/// Where a drag starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSource {
    /// An item of the edit panel's widget library.
    Library(usize),
    /// A widget already placed in the grid.
    Cell(usize),
}

/// The dashboard engine.
pub struct Dashboard {
    registry: WidgetRegistry,
    store: LayoutStore,
    library: Vec<LibraryItem>,
    state: EngineState,
    grid: Grid,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("state", &self.state)
            .field("cells", &self.grid.occupancy())
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    /// Boots the dashboard from storage.
    ///
    /// Closes the panel, migrates legacy layout keys, loads the saved
    /// layout (falling back to the default schema), renders it, and places
    /// every persisted widget. Nothing is written back except by migration.
    pub fn boot(registry: WidgetRegistry, store: LayoutStore, library: Vec<LibraryItem>) -> Self {
        let mut dashboard = Self {
            registry,
            store,
            library,
            state: EngineState::default(),
            grid: Grid::default(),
        };
        dashboard.set_panel_open(false);

        if let Err(e) = dashboard.store.migrate_if_needed() {
            tracing::warn!("layout migration failed: {e}");
        }

        match dashboard.store.load() {
            Some(layout) => {
                dashboard.render(&layout.schema);
                for (index, widget_type) in layout.occupied() {
                    if index < dashboard.grid.len() {
                        dashboard.place(index, widget_type);
                    }
                }
            }
            None => dashboard.render(DEFAULT_SCHEMA),
        }
        tracing::debug!(
            schema = dashboard.state.schema_name(),
            cells = ?dashboard.grid.occupancy(),
            "dashboard booted"
        );
        dashboard
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Mode, panel and schema state.
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// The rendered grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Widgets offered in the edit panel.
    pub fn library(&self) -> &[LibraryItem] {
        &self.library
    }

    /// The widget registry.
    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    /// Snapshot of the layout as it would be persisted.
    pub fn layout(&self) -> Layout {
        Layout {
            schema: self.state.schema_name().to_string(),
            cells: self.grid.occupancy(),
        }
    }

    // -----------------------------------------------------------------------
    // Edit mode
    // -----------------------------------------------------------------------

    /// Opens or closes the edit panel, entering editing or viewing.
    pub fn set_panel_open(&mut self, open: bool) {
        let height = PANEL_CHROME_ROWS.saturating_add(self.library.len() as u16);
        self.state.set_editing(open, height);
        for cell in self.grid.cells_mut() {
            cell.set_draggable(open);
            if !open {
                cell.set_drop_target(false);
            }
        }
        tracing::debug!(editing = open, "edit panel toggled");
    }

    /// Flips the edit panel; returns whether it is now open.
    pub fn toggle_panel(&mut self) -> bool {
        let open = !self.state.panel_open();
        self.set_panel_open(open);
        open
    }

    // -----------------------------------------------------------------------
    // Grid renderer
    // -----------------------------------------------------------------------

    /// Renders schema `name` (or the default for an unknown name), discarding
    /// every widget currently placed.
    pub fn render(&mut self, name: &str) {
        let (resolved, schema) = SchemaCatalog::resolve(name);
        self.state.set_schema(resolved, schema.cols, schema.rows);
        self.grid.teardown_all();
        self.grid = Grid::materialize(&schema);
        tracing::debug!(schema = resolved, cells = self.grid.len(), "rendered schema");
    }

    /// Renders `name` and persists the now-empty layout. Refused while viewing.
    pub fn select_schema(&mut self, name: &str) -> bool {
        if !self.state.is_editing() {
            return false;
        }
        self.render(name);
        self.save();
        true
    }

    /// Clears the stored layout and renders the default schema without
    /// saving. Refused while viewing.
    pub fn reset(&mut self) -> bool {
        if !self.state.is_editing() {
            return false;
        }
        if let Err(e) = self.store.clear() {
            tracing::warn!("failed to clear layout: {e}");
        }
        self.render(DEFAULT_SCHEMA);
        true
    }

    // -----------------------------------------------------------------------
    // Placement
    // -----------------------------------------------------------------------

    /// Installs a widget of `widget_type` into cell `index`.
    ///
    /// Any previous content is torn down. Does not persist.
    pub fn place(&mut self, index: usize, widget_type: &str) -> Placement {
        let editing = self.state.is_editing();
        let Some(cell) = self.grid.cell_mut(index) else {
            return Placement::NoSuchCell;
        };
        cell.clear();
        let context = WidgetContext::new(editing, index);
        match self.registry.create(widget_type, &context) {
            Some(widget) => {
                if widget.widget_type() != widget_type {
                    tracing::debug!(
                        cell = index,
                        registered = widget_type,
                        tag = widget.widget_type(),
                        "widget tag differs from its registered name"
                    );
                }
                cell.set_content(CellContent::Widget {
                    widget_type: widget_type.to_string(),
                    widget,
                    draggable: editing,
                });
                tracing::debug!(cell = index, widget = widget_type, "placed widget");
                Placement::Placed
            }
            None => {
                cell.set_content(CellContent::Unavailable(widget_type.to_string()));
                tracing::warn!(cell = index, widget = widget_type, "widget type not available");
                Placement::Unavailable
            }
        }
    }

    /// Removes the widget in cell `index` and persists. Refused while
    /// viewing; returns `false` when the cell holds no widget.
    pub fn remove(&mut self, index: usize) -> bool {
        if !self.state.is_editing() {
            return false;
        }
        let Some(cell) = self.grid.cell_mut(index) else {
            return false;
        };
        if cell.widget_type().is_none() {
            return false;
        }
        cell.clear();
        tracing::debug!(cell = index, "removed widget");
        self.save();
        true
    }

    // -----------------------------------------------------------------------
    // Drag protocol
    // -----------------------------------------------------------------------

    /// Begins a drag and returns its payload, the widget type name.
    ///
    /// Refused while viewing, and for cells without a widget.
    pub fn start_drag(&self, source: DragSource) -> Option<String> {
        if !self.state.is_editing() {
            return None;
        }
        match source {
            DragSource::Library(i) => self.library.get(i).map(|item| item.widget_type.clone()),
            DragSource::Cell(i) => self
                .grid
                .cell(i)
                .filter(|cell| cell.is_draggable())
                .and_then(Cell::widget_type)
                .map(str::to_string),
        }
    }

    /// Marks cell `index` as the drop target; returns whether a drop would
    /// be accepted there.
    pub fn drag_over(&mut self, index: usize) -> bool {
        if !self.state.is_editing() {
            return false;
        }
        match self.grid.cell_mut(index) {
            Some(cell) => {
                cell.set_drop_target(true);
                true
            }
            None => false,
        }
    }

    /// Clears the drop-target mark on cell `index`.
    pub fn drag_leave(&mut self, index: usize) {
        if let Some(cell) = self.grid.cell_mut(index) {
            cell.set_drop_target(false);
        }
    }

    /// Drops `payload` onto cell `index`, placing and persisting.
    ///
    /// Returns `None` when ignored because the dashboard is viewing.
    pub fn drop(&mut self, index: usize, payload: &str) -> Option<Placement> {
        if !self.state.is_editing() {
            return None;
        }
        self.drag_leave(index);
        let placement = self.place(index, payload.trim());
        if placement != Placement::NoSuchCell {
            self.save();
        }
        Some(placement)
    }

    // -----------------------------------------------------------------------
    // Persistence and input
    // -----------------------------------------------------------------------

    /// Writes the current layout to the store; failures are logged.
    pub fn save(&self) {
        if let Err(e) = self.store.save(&self.layout()) {
            tracing::warn!("failed to save layout: {e}");
        }
    }

    /// Forwards a key press to the widget in cell `index`.
    pub fn handle_key(&mut self, index: usize, key: KeyEvent) -> bool {
        self.grid
            .cell_mut(index)
            .and_then(Cell::widget_mut)
            .is_some_and(|widget| widget.handle_key(key))
    }
}

impl Drop for Dashboard {
    fn drop(&mut self) {
        self.grid.teardown_all();
    }
}
