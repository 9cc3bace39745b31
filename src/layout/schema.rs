//! Grid geometry: a schema is a column/row track count plus an ordered list
//! of cell placements.
//!
//! Positions are 1-based like CSS grid lines. A cell's index in
//! [`Schema::cells`] is its identity for persistence.

/// Placement of one cell inside a schema's grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellSpec {
    /// 1-based starting column.
    pub col: u16,
    /// 1-based starting row.
    pub row: u16,
    /// Number of columns covered (≥ 1).
    pub col_span: u16,
    /// Number of rows covered (≥ 1).
    pub row_span: u16,
}

impl CellSpec {
    /// Creates a cell at (`col`, `row`) covering the given spans.
    pub const fn new(col: u16, row: u16, col_span: u16, row_span: u16) -> Self {
        Self {
            col,
            row,
            col_span,
            row_span,
        }
    }

    /// Creates a 1×1 cell.
    pub const fn unit(col: u16, row: u16) -> Self {
        Self::new(col, row, 1, 1)
    }

    /// Last column covered (inclusive).
    pub fn end_col(&self) -> u16 {
        self.col + self.col_span.saturating_sub(1)
    }

    /// Last row covered (inclusive).
    pub fn end_row(&self) -> u16 {
        self.row + self.row_span.saturating_sub(1)
    }
}

/// A grid geometry: track counts and cell placements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    /// Number of column tracks.
    pub cols: u16,
    /// Number of row tracks.
    pub rows: u16,
    /// Cells in identity order.
    pub cells: Vec<CellSpec>,
}

impl Schema {
    /// A `cols` × `rows` grid of unit cells in row-major order.
    pub fn uniform(cols: u16, rows: u16) -> Self {
        let cells = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| CellSpec::unit(c + 1, r + 1)))
            .collect();
        Self { cols, rows, cells }
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Whether every cell has positive spans and stays inside the grid.
    ///
    /// Not enforced at runtime; catalog entries are expected to satisfy it.
    pub fn fits(&self) -> bool {
        self.cols > 0
            && self.rows > 0
            && self.cells.iter().all(|c| {
                c.col >= 1
                    && c.row >= 1
                    && c.col_span >= 1
                    && c.row_span >= 1
                    && c.end_col() <= self.cols
                    && c.end_row() <= self.rows
            })
    }
}
