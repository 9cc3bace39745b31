//! Engine-wide mode and geometry.

use crate::layout::DEFAULT_SCHEMA;

/// Dashboard interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Panel closed; layout is read-only.
    #[default]
    Viewing,
    /// Panel open; widgets can be dragged, dropped and removed.
    Editing,
}

/// Mode, panel and current schema, mutated only through the `set_*` methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    mode: Mode,
    panel_open: bool,
    panel_height: u16,
    schema_name: &'static str,
    cols: u16,
    rows: u16,
}

impl Default for EngineState {
    fn default() -> Self {
        Self {
            mode: Mode::Viewing,
            panel_open: false,
            panel_height: 0,
            schema_name: DEFAULT_SCHEMA,
            cols: 2,
            rows: 2,
        }
    }
}

impl EngineState {
    /// Opens or closes the edit panel; the mode follows.
    ///
    /// `panel_height` is exposed only while open.
    pub(crate) fn set_editing(&mut self, editing: bool, panel_height: u16) {
        self.panel_open = editing;
        self.mode = if editing { Mode::Editing } else { Mode::Viewing };
        self.panel_height = if editing { panel_height } else { 0 };
    }

    /// Records the schema currently rendered.
    pub(crate) fn set_schema(&mut self, name: &'static str, cols: u16, rows: u16) {
        self.schema_name = name;
        self.cols = cols;
        self.rows = rows;
    }

    /// Current mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Whether layout mutations are accepted.
    pub fn is_editing(&self) -> bool {
        self.mode == Mode::Editing
    }

    /// Whether the edit panel is open.
    pub fn panel_open(&self) -> bool {
        self.panel_open
    }

    /// Rows the edit panel occupies; `0` while closed.
    pub fn panel_height(&self) -> u16 {
        self.panel_height
    }

    /// Name of the rendered schema.
    pub fn schema_name(&self) -> &'static str {
        self.schema_name
    }

    /// Column tracks of the rendered schema.
    pub fn cols(&self) -> u16 {
        self.cols
    }

    /// Row tracks of the rendered schema.
    pub fn rows(&self) -> u16 {
        self.rows
    }
}
