//! Materialized grid: one cell per `CellSpec` of the rendered schema.

use crate::layout::{CellSpec, Schema};
use crate::widgets::Widget;

/// What a cell currently shows.
pub enum CellContent {
    /// Placeholder inviting a drop.
    Empty,
    /// A type the registry could not create; persisted as empty.
    Unavailable(String),
    /// A live widget.
    Widget {
        /// Registry name the widget was created under; this is what gets
        /// persisted.
        widget_type: String,
        /// The instance.
        widget: Box<dyn Widget>,
        /// Whether it can be picked up and dragged.
        draggable: bool,
    },
}

impl std::fmt::Debug for CellContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellContent::Empty => f.write_str("Empty"),
            CellContent::Unavailable(t) => f.debug_tuple("Unavailable").field(t).finish(),
            CellContent::Widget {
                widget_type,
                draggable,
                ..
            } => f
                .debug_struct("Widget")
                .field("type", widget_type)
                .field("draggable", draggable)
                .finish(),
        }
    }
}

/// A grid cell.
#[derive(Debug)]
pub struct Cell {
    spec: CellSpec,
    content: CellContent,
    drop_target: bool,
}

impl Cell {
    fn new(spec: CellSpec) -> Self {
        Self {
            spec,
            content: CellContent::Empty,
            drop_target: false,
        }
    }

    /// Position and span.
    pub fn spec(&self) -> CellSpec {
        self.spec
    }

    /// Current content.
    pub fn content(&self) -> &CellContent {
        &self.content
    }

    /// Whether a drag is hovering over this cell.
    pub fn is_drop_target(&self) -> bool {
        self.drop_target
    }

    /// Registry name of the live widget, if any.
    pub fn widget_type(&self) -> Option<&str> {
        match &self.content {
            CellContent::Widget { widget_type, .. } => Some(widget_type),
            _ => None,
        }
    }

    /// Whether the live widget can be dragged.
    pub fn is_draggable(&self) -> bool {
        matches!(self.content, CellContent::Widget { draggable: true, .. })
    }

    /// The live widget, if any.
    pub fn widget(&self) -> Option<&dyn Widget> {
        match &self.content {
            CellContent::Widget { widget, .. } => Some(widget.as_ref()),
            _ => None,
        }
    }

    pub(crate) fn widget_mut(&mut self) -> Option<&mut (dyn Widget + 'static)> {
        match &mut self.content {
            CellContent::Widget { widget, .. } => Some(widget.as_mut()),
            _ => None,
        }
    }

    /// Replaces the content, tearing down any widget being discarded.
    pub(crate) fn set_content(&mut self, content: CellContent) {
        if let CellContent::Widget { widget, .. } = &mut self.content {
            widget.teardown();
        }
        self.content = content;
    }

    pub(crate) fn clear(&mut self) {
        self.set_content(CellContent::Empty);
    }

    pub(crate) fn set_drop_target(&mut self, on: bool) {
        self.drop_target = on;
    }

    pub(crate) fn set_draggable(&mut self, on: bool) {
        if let CellContent::Widget { draggable, .. } = &mut self.content {
            *draggable = on;
        }
    }
}

/// All cells of the rendered schema, indexed by position in the schema.
#[derive(Debug, Default)]
pub struct Grid {
    cells: Vec<Cell>,
}

impl Grid {
    /// One empty cell per cell spec of `schema`.
    pub fn materialize(schema: &Schema) -> Self {
        Self {
            cells: schema.cells.iter().copied().map(Cell::new).collect(),
        }
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the grid has no cells.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// All cells in index order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cell at `index`.
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub(crate) fn cell_mut(&mut self, index: usize) -> Option<&mut Cell> {
        self.cells.get_mut(index)
    }

    pub(crate) fn cells_mut(&mut self) -> impl Iterator<Item = &mut Cell> {
        self.cells.iter_mut()
    }

    /// Persisted form: widget type per cell, `None` for anything else.
    pub fn occupancy(&self) -> Vec<Option<String>> {
        self.cells
            .iter()
            .map(|cell| cell.widget_type().map(str::to_string))
            .collect()
    }

    /// Tears down every live widget and empties all cells.
    pub(crate) fn teardown_all(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::SchemaCatalog;
    use ratatui::text::Line;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FakeWidget {
        torn_down: Arc<AtomicUsize>,
    }

    impl Widget for FakeWidget {
        fn widget_type(&self) -> &'static str {
            "fake"
        }
        fn title(&self) -> &str {
            "FakeWidget"
        }
        fn render(&self, _width: u16) -> Vec<Line<'static>> {
            Vec::new()
        }
        fn teardown(&mut self) {
            self.torn_down.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn fake_widget(counter: &Arc<AtomicUsize>) -> CellContent {
        CellContent::Widget {
            widget_type: "fake".to_string(),
            widget: Box::new(FakeWidget {
                torn_down: Arc::clone(counter),
            }),
            draggable: false,
        }
    }

    #[test]
    fn materialize_creates_empty_cells_with_specs() {
        let schema = SchemaCatalog::generate("tall-left").expect("preset");
        let grid = Grid::materialize(&schema);
        assert_eq!(grid.len(), 4);
        assert_eq!(grid.cell(0).map(Cell::spec), Some(schema.cells[0]));
        assert!(grid
            .cells()
            .iter()
            .all(|c| matches!(c.content(), CellContent::Empty) && !c.is_drop_target()));
        assert_eq!(grid.occupancy(), vec![None; 4]);
    }

    #[test]
    fn replacing_content_tears_down_previous_widget() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut grid = Grid::materialize(&SchemaCatalog::resolve("2x2").1);
        let cell = grid.cell_mut(1).expect("cell");
        cell.set_content(fake_widget(&counter));
        cell.set_content(CellContent::Unavailable("ghost".to_string()));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
        assert_eq!(grid.occupancy(), vec![None; 4]);
    }

    #[test]
    fn occupancy_lists_live_widget_types() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut grid = Grid::materialize(&SchemaCatalog::resolve("2x2").1);
        grid.cell_mut(3).expect("cell").set_content(fake_widget(&counter));
        assert_eq!(
            grid.occupancy(),
            vec![None, None, None, Some("fake".to_string())]
        );
    }

    #[test]
    fn occupancy_uses_registered_name_not_widget_tag() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut grid = Grid::materialize(&SchemaCatalog::resolve("2x2").1);
        grid.cell_mut(0).expect("cell").set_content(CellContent::Widget {
            widget_type: "sensor".to_string(),
            widget: Box::new(FakeWidget {
                torn_down: Arc::clone(&counter),
            }),
            draggable: false,
        });
        assert_eq!(grid.cell(0).and_then(Cell::widget_type), Some("sensor"));
        assert_eq!(grid.occupancy()[0].as_deref(), Some("sensor"));
    }

    #[test]
    fn teardown_all_empties_every_cell() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut grid = Grid::materialize(&SchemaCatalog::resolve("2x2").1);
        for i in 0..4 {
            grid.cell_mut(i).expect("cell").set_content(fake_widget(&counter));
        }
        grid.teardown_all();
        assert_eq!(counter.load(Ordering::SeqCst), 4);
        assert!(grid.cells().iter().all(|c| c.widget().is_none()));
    }

    #[test]
    fn draggable_flag_only_applies_to_widgets() {
        let counter = Arc::new(AtomicUsize::new(0));
        let mut grid = Grid::materialize(&SchemaCatalog::resolve("2x2").1);
        grid.cell_mut(0).expect("cell").set_content(fake_widget(&counter));
        for cell in grid.cells_mut() {
            cell.set_draggable(true);
        }
        assert!(grid.cell(0).is_some_and(Cell::is_draggable));
        assert!(!grid.cell(1).is_some_and(Cell::is_draggable));
    }
}
