//! Main rendering orchestration for the TUI dashboard.
//!
//! Provides the top-level `render_dashboard` function that composes the
//! header, the edit panel, the widget grid and the footer, recording the
//! screen position of everything clickable into `app.hit`.

use crate::engine::{Cell, CellContent};
use crate::layout::{CellSpec, PRESET_NAMES};
use crate::tui::app::{App, HitMap};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use std::time::Instant;

/// Header text displayed at the top of the dashboard.
const HEADER_TEXT: &str = "Widget Dashboard";

/// Footer text while viewing.
const FOOTER_VIEWING: &str = "[e] Edit  [Tab] Focus  [Esc] Unfocus  [q] Quit";

/// Footer text while editing.
const FOOTER_EDITING: &str =
    "[drag] Place  [1-9] Place in focused cell  [Del] Remove  [e] Done  [q] Quit";

/// Placeholder shown in an empty cell.
pub const EMPTY_CELL_TEXT: &str = "Drag a widget here";

/// Label of the remove button drawn on a placed widget's border.
const REMOVE_LABEL: &str = "[x]";

/// Renders the full dashboard and refreshes `app.hit`.
///
/// Rows from top to bottom: a one-line header with the edit toggle, the edit
/// panel (only while open), the grid, and a one-line footer.
pub fn render_dashboard(frame: &mut Frame, app: &mut App) {
    let area = frame.area();
    let state = app.dashboard.state();
    let panel_height = if state.panel_open() {
        state.panel_height()
    } else {
        0
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),            // header
            Constraint::Length(panel_height), // edit panel
            Constraint::Min(3),               // grid
            Constraint::Length(1),            // footer
        ])
        .split(area);

    let mut hit = HitMap::default();
    render_header(frame, app, chunks[0], &mut hit);
    if panel_height > 0 {
        render_panel(frame, app, chunks[1], &mut hit);
    }
    render_grid(frame, app, chunks[2], &mut hit);
    render_footer(frame, app, chunks[3]);
    app.hit = hit;
}

/// Header: title, edit toggle, and an `EDITING` marker while editing.
fn render_header(frame: &mut Frame, app: &App, area: Rect, hit: &mut HitMap) {
    let editing = app.dashboard.state().is_editing();
    let toggle = if editing { "[ Done ]" } else { "[ Edit ]" };

    let mut spans = vec![
        Span::styled(HEADER_TEXT, Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(toggle, Style::default().add_modifier(Modifier::BOLD)),
    ];
    if editing {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            "EDITING",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);

    let toggle_x = area.x.saturating_add(text_width(HEADER_TEXT) + 2);
    hit.toggle = Rect::new(toggle_x, area.y, text_width(toggle), 1).intersection(area);
}

/// Edit panel: preset buttons, reset, then one row per library item.
fn render_panel(frame: &mut Frame, app: &App, area: Rect, hit: &mut HitMap) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Edit layout ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let current = app.dashboard.state().schema_name();
    let mut lines = Vec::new();

    // Presets
    let label = "Layout: ";
    let mut spans = vec![Span::raw(label)];
    let mut x = inner.x.saturating_add(text_width(label));
    for &name in PRESET_NAMES {
        let button = format!("[{name}]");
        let width = text_width(&button);
        let style = if name == current {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Cyan)
        };
        hit.presets
            .push((name, Rect::new(x, inner.y, width, 1).intersection(inner)));
        spans.push(Span::styled(button, style));
        spans.push(Span::raw(" "));
        x = x.saturating_add(width + 1);
    }
    lines.push(Line::from(spans));

    // Actions
    let reset = "[Reset]";
    lines.push(Line::from(vec![
        Span::styled(reset, Style::default().fg(Color::Red)),
        Span::styled(
            "  Drag a widget below onto a cell",
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    hit.reset = Rect::new(inner.x, inner.y.saturating_add(1), text_width(reset), 1)
        .intersection(inner);

    // Library
    for (i, item) in app.dashboard.library().iter().enumerate() {
        let text = format!("{}. ≡ {}", i + 1, item.name);
        let row = inner.y.saturating_add(2).saturating_add(i as u16);
        hit.library.push((
            i,
            Rect::new(inner.x, row, text_width(&text), 1).intersection(inner),
        ));
        lines.push(Line::from(Span::styled(
            text,
            Style::default().add_modifier(Modifier::BOLD),
        )));
    }

    frame.render_widget(Paragraph::new(lines), inner);
}

/// One bordered block per cell, placed on equal column and row tracks.
fn render_grid(frame: &mut Frame, app: &App, area: Rect, hit: &mut HitMap) {
    let state = app.dashboard.state();
    let editing = state.is_editing();
    let (cols, rows) = (state.cols(), state.rows());

    for (index, cell) in app.dashboard.grid().cells().iter().enumerate() {
        let rect = cell_area(area, cols, rows, cell.spec());
        hit.cells.push(rect);
        if rect.width == 0 || rect.height == 0 {
            continue;
        }

        let focused = app.focused == Some(index);
        let border = if cell.is_drop_target() {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else if focused {
            Style::default().fg(Color::Cyan)
        } else if editing {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(cell_title(cell));
        let inner = block.inner(rect);
        frame.render_widget(block, rect);
        frame.render_widget(Paragraph::new(cell_body(cell, inner.width)), inner);

        if editing && cell.widget().is_some() && rect.width > text_width(REMOVE_LABEL) + 2 {
            let width = text_width(REMOVE_LABEL);
            let button = Rect::new(rect.x + rect.width - width - 1, rect.y, width, 1);
            frame.render_widget(
                Paragraph::new(Span::styled(REMOVE_LABEL, Style::default().fg(Color::Red))),
                button,
            );
            hit.remove_buttons.push((index, button));
        }
    }
}

fn cell_title(cell: &Cell) -> String {
    match cell.content() {
        CellContent::Widget { widget, .. } => format!(" {} ", widget.title()),
        CellContent::Unavailable(_) | CellContent::Empty => String::new(),
    }
}

fn cell_body(cell: &Cell, width: u16) -> Vec<Line<'static>> {
    match cell.content() {
        CellContent::Widget { widget, .. } => widget.render(width),
        CellContent::Unavailable(widget_type) => vec![Line::styled(
            format!("Widget unavailable: {widget_type}"),
            Style::default().fg(Color::Red),
        )],
        CellContent::Empty => vec![Line::styled(
            EMPTY_CELL_TEXT,
            Style::default().fg(Color::DarkGray),
        )],
    }
}

/// Footer: the live status message, or key hints for the current mode.
fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let line = match &app.status_message {
        Some((msg, expiry)) if Instant::now() < *expiry => {
            Line::from(Span::styled(msg.clone(), Style::default().fg(Color::Yellow)))
        }
        _ => {
            let hints = if app.dashboard.state().is_editing() {
                FOOTER_EDITING
            } else {
                FOOTER_VIEWING
            };
            Line::from(Span::styled(hints, Style::default().fg(Color::DarkGray)))
        }
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Screen area of a cell in a `cols` x `rows` grid drawn over `area`.
///
/// Tracks are equal in size; boundaries are rounded down so adjacent cells
/// share no columns and the last track absorbs the remainder. Positions in
/// `spec` are 1-based.
pub fn cell_area(area: Rect, cols: u16, rows: u16, spec: CellSpec) -> Rect {
    if cols == 0 || rows == 0 {
        return Rect::default();
    }
    let x_at = |track: u16| boundary(area.x, area.width, cols, track);
    let y_at = |track: u16| boundary(area.y, area.height, rows, track);
    let (x0, x1) = (x_at(spec.col.saturating_sub(1)), x_at(spec.end_col()));
    let (y0, y1) = (y_at(spec.row.saturating_sub(1)), y_at(spec.end_row()));
    Rect::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
}

fn boundary(start: u16, length: u16, tracks: u16, track: u16) -> u16 {
    let track = u32::from(track.min(tracks));
    let offset = u32::from(length) * track / u32::from(tracks);
    start.saturating_add(offset as u16)
}

fn text_width(text: &str) -> u16 {
    text.chars().count().min(u16::MAX as usize) as u16
}
