//! Application state and the terminal event loop.
//!
//! [`App`] wraps the [`Dashboard`] engine with what only the terminal needs:
//! keyboard focus, the in-flight mouse drag, a transient status line, and
//! the hit regions recorded by the last render.

use crate::engine::{Dashboard, DragSource, Placement};
use crate::tui::event::{handle_key_event, Action, Event, EventHandler};
use crate::tui::ui::render_dashboard;
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, EventStream, MouseButton, MouseEvent,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{self, stdout};
use std::time::{Duration, Instant};

/// How long a status message stays in the footer.
const STATUS_TTL: Duration = Duration::from_secs(2);

/// A mouse drag in progress.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drag {
    /// Widget type being carried.
    pub payload: String,
    /// Cell the drag started from, if any.
    pub source: Option<usize>,
    /// Cell currently marked as drop target.
    pub hover: Option<usize>,
}

/// Something clickable on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The edit toggle in the header.
    Toggle,
    /// A preset button in the edit panel.
    Preset(&'static str),
    /// The reset button in the edit panel.
    Reset,
    /// A widget library item.
    Library(usize),
    /// The remove button of a placed widget.
    Remove(usize),
    /// A grid cell.
    Cell(usize),
}

/// Screen regions recorded while rendering, used for mouse hit-testing.
#[derive(Debug, Clone, Default)]
pub struct HitMap {
    pub toggle: Rect,
    pub presets: Vec<(&'static str, Rect)>,
    pub reset: Rect,
    /// Library item index and its row.
    pub library: Vec<(usize, Rect)>,
    /// Cell index and its `[x]` button.
    pub remove_buttons: Vec<(usize, Rect)>,
    /// Outer area of each grid cell, by index.
    pub cells: Vec<Rect>,
}

impl HitMap {
    /// Resolves a screen position to the topmost target under it.
    ///
    /// Remove buttons sit on cell borders, so they win over cells.
    pub fn target(&self, column: u16, row: u16) -> Option<Target> {
        let hit = |rect: &Rect| contains(rect, column, row);
        if hit(&self.toggle) {
            return Some(Target::Toggle);
        }
        if let Some((name, _)) = self.presets.iter().find(|(_, r)| hit(r)) {
            return Some(Target::Preset(*name));
        }
        if hit(&self.reset) {
            return Some(Target::Reset);
        }
        if let Some((i, _)) = self.library.iter().find(|(_, r)| hit(r)) {
            return Some(Target::Library(*i));
        }
        if let Some((i, _)) = self.remove_buttons.iter().find(|(_, r)| hit(r)) {
            return Some(Target::Remove(*i));
        }
        self.cells.iter().position(hit).map(Target::Cell)
    }

    /// The grid cell under a position, ignoring every other target.
    pub fn cell_at(&self, column: u16, row: u16) -> Option<usize> {
        self.cells.iter().position(|r| contains(r, column, row))
    }
}

fn contains(rect: &Rect, column: u16, row: u16) -> bool {
    rect.width > 0
        && rect.height > 0
        && column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}

/// Main application state for the TUI.
#[derive(Debug)]
pub struct App {
    /// The layout engine.
    pub dashboard: Dashboard,
    /// Whether the application should quit.
    pub should_quit: bool,
    /// Tick counter, used to redraw widgets that change over time.
    pub tick_count: u64,
    /// Cell receiving keyboard input.
    pub focused: Option<usize>,
    /// Drag in progress.
    pub drag: Option<Drag>,
    /// Status message with expiry, shown in the footer.
    pub status_message: Option<(String, Instant)>,
    /// Hit regions of the last render.
    pub hit: HitMap,
    tick_rate: Duration,
}

impl App {
    /// Creates the app around a booted dashboard.
    pub fn new(dashboard: Dashboard, tick_rate: Duration) -> Self {
        Self {
            dashboard,
            should_quit: false,
            tick_count: 0,
            focused: None,
            drag: None,
            status_message: None,
            hit: HitMap::default(),
            tick_rate,
        }
    }

    /// Shows `message` in the footer for a short while.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now() + STATUS_TTL));
    }

    /// Clears the status message once its expiry has passed.
    pub fn expire_status_message(&mut self) {
        if let Some((_, expiry)) = &self.status_message {
            if Instant::now() >= *expiry {
                self.status_message = None;
            }
        }
    }

    /// Moves focus to the next cell, wrapping around.
    pub fn focus_next(&mut self) {
        let len = self.dashboard.grid().len();
        if len == 0 {
            self.focused = None;
            return;
        }
        self.focused = Some(match self.focused {
            Some(i) => (i + 1) % len,
            None => 0,
        });
    }

    /// Moves focus to the previous cell, wrapping around.
    pub fn focus_previous(&mut self) {
        let len = self.dashboard.grid().len();
        if len == 0 {
            self.focused = None;
            return;
        }
        self.focused = Some(match self.focused {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        });
    }

    /// Opens or closes the edit panel, cancelling any drag.
    pub fn toggle_panel(&mut self) {
        self.cancel_drag();
        let open = self.dashboard.toggle_panel();
        self.set_status(if open { "Editing layout" } else { "Done editing" });
    }

    /// Switches to preset `name`.
    pub fn select_schema(&mut self, name: &str) {
        if self.dashboard.select_schema(name) {
            self.focused = None;
            let resolved = self.dashboard.state().schema_name();
            self.set_status(format!("Layout: {resolved}"));
        }
    }

    /// Clears the saved layout.
    pub fn reset(&mut self) {
        if self.dashboard.reset() {
            self.focused = None;
            self.set_status("Layout reset");
        }
    }

    /// Removes the widget in `index`.
    pub fn remove(&mut self, index: usize) {
        if self.dashboard.remove(index) {
            self.set_status("Widget removed");
        }
    }

    /// Drops library item `item` onto the focused cell.
    ///
    /// Keyboard counterpart of dragging from the panel.
    pub fn place_from_library(&mut self, item: usize) -> bool {
        let Some(index) = self.focused else {
            return false;
        };
        let Some(payload) = self.dashboard.start_drag(DragSource::Library(item)) else {
            return false;
        };
        self.finish_drop(index, &payload);
        true
    }

    fn finish_drop(&mut self, index: usize, payload: &str) {
        match self.dashboard.drop(index, payload) {
            Some(Placement::Placed) => self.set_status(format!("Placed {payload}")),
            Some(Placement::Unavailable) => {
                self.set_status(format!("Widget unavailable: {payload}"))
            }
            Some(Placement::NoSuchCell) | None => {}
        }
    }

    fn cancel_drag(&mut self) {
        if let Some(drag) = self.drag.take() {
            if let Some(hover) = drag.hover {
                self.dashboard.drag_leave(hover);
            }
        }
    }

    /// Dispatches a mouse event against the last render's hit regions.
    pub fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.cancel_drag();
                match self.hit.target(column, row) {
                    Some(Target::Toggle) => self.toggle_panel(),
                    Some(Target::Preset(name)) => self.select_schema(name),
                    Some(Target::Reset) => self.reset(),
                    Some(Target::Library(i)) => {
                        self.drag = self
                            .dashboard
                            .start_drag(DragSource::Library(i))
                            .map(|payload| Drag {
                                payload,
                                source: None,
                                hover: None,
                            });
                    }
                    Some(Target::Remove(i)) => self.remove(i),
                    Some(Target::Cell(i)) => {
                        self.focused = Some(i);
                        self.drag = self
                            .dashboard
                            .start_drag(DragSource::Cell(i))
                            .map(|payload| Drag {
                                payload,
                                source: Some(i),
                                hover: None,
                            });
                    }
                    None => {}
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let under = self.hit.cell_at(column, row);
                let Some(drag) = self.drag.as_mut() else {
                    return;
                };
                let next = under.filter(|&i| Some(i) != drag.source);
                if drag.hover == next {
                    return;
                }
                if let Some(previous) = drag.hover.take() {
                    self.dashboard.drag_leave(previous);
                }
                if let Some(i) = next {
                    if self.dashboard.drag_over(i) {
                        drag.hover = Some(i);
                    }
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let Some(drag) = self.drag.take() else {
                    return;
                };
                if let Some(hover) = drag.hover {
                    self.dashboard.drag_leave(hover);
                }
                match self.hit.cell_at(column, row) {
                    Some(i) if Some(i) != drag.source => {
                        self.finish_drop(i, &drag.payload);
                        self.focused = Some(i);
                    }
                    _ => {}
                }
            }
            _ => {}
        }
    }

    /// Runs the TUI application: sets up terminal, enters event loop, restores on exit.
    pub async fn run(&mut self) -> io::Result<()> {
        // Install panic hook that restores terminal before printing panic info
        let original_hook = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |panic_info| {
            let _ = restore_terminal();
            original_hook(panic_info);
        }));

        setup_terminal()?;

        let result = self.event_loop().await;

        restore_terminal()?;
        result
    }

    /// Main event loop: renders UI and processes events.
    async fn event_loop(&mut self) -> io::Result<()> {
        let backend = CrosstermBackend::new(stdout());
        let mut terminal = Terminal::new(backend)?;
        let event_handler = EventHandler::new(self.tick_rate);
        let mut reader = EventStream::new();

        terminal.draw(|frame| render_dashboard(frame, self))?;

        loop {
            match event_handler.next(&mut reader).await? {
                Event::Key(key) => match handle_key_event(self, key) {
                    Action::Quit => {
                        self.should_quit = true;
                        return Ok(());
                    }
                    Action::TogglePanel => self.toggle_panel(),
                    Action::None => {}
                },
                Event::Mouse(mouse) => self.handle_mouse_event(mouse),
                Event::Tick => {
                    self.tick_count += 1;
                    self.expire_status_message();
                }
                Event::Resize(_, _) => {}
            }

            // Widgets refresh in the background, so every event redraws.
            terminal.draw(|frame| render_dashboard(frame, self))?;
        }
    }
}

/// Enables raw mode and switches to the alternate screen.
fn setup_terminal() -> io::Result<()> {
    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    Ok(())
}

/// Restores the terminal to its original state.
fn restore_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
    Ok(())
}
