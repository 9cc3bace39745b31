//! Event handling for the TUI.
//!
//! Wraps crossterm events and adds a tick variant for periodic UI refresh.

use crate::tui::app::App;
use crossterm::event::{
    Event as CrosstermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseEvent,
};
use futures::StreamExt;
use std::time::Duration;
use tokio::time::interval;

/// Application-level event variants.
#[derive(Debug, Clone, Copy)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// A mouse event occurred.
    Mouse(MouseEvent),
    /// Terminal was resized.
    Resize(u16, u16),
    /// Periodic tick for UI refresh.
    Tick,
}

/// Event handler that merges terminal input events with periodic ticks.
pub struct EventHandler {
    /// Tick interval duration.
    tick_rate: Duration,
}

impl EventHandler {
    /// Creates a new EventHandler with the specified tick rate.
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Waits for the next event, returning either a terminal event or a tick.
    ///
    /// Uses `tokio::select!` to race between crossterm input and the tick timer.
    pub async fn next(&self, reader: &mut EventStream) -> std::io::Result<Event> {
        let mut tick = interval(self.tick_rate);
        // Consume the first immediate tick
        tick.tick().await;

        loop {
            tokio::select! {
                maybe_event = reader.next() => {
                    match maybe_event {
                        Some(Ok(CrosstermEvent::Key(key))) if key.kind != KeyEventKind::Release => {
                            return Ok(Event::Key(key))
                        }
                        Some(Ok(CrosstermEvent::Mouse(mouse))) => return Ok(Event::Mouse(mouse)),
                        Some(Ok(CrosstermEvent::Resize(w, h))) => return Ok(Event::Resize(w, h)),
                        Some(Err(e)) => return Err(e),
                        // Ignore key releases, focus, paste events
                        Some(Ok(_)) => continue,
                        None => return Err(std::io::Error::new(
                            std::io::ErrorKind::UnexpectedEof,
                            "event stream ended",
                        )),
                    }
                }
                _ = tick.tick() => {
                    return Ok(Event::Tick);
                }
            }
        }
    }
}

/// Action produced by handling a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// No action to take.
    None,
    /// Quit the application.
    Quit,
    /// Open or close the edit panel.
    TogglePanel,
}

/// Handles a key event.
///
/// `Ctrl-C` always quits. Every other key goes to the focused widget first;
/// keys it does not consume drive the dashboard: `q` quits, `e` toggles the
/// edit panel, `Tab`/`BackTab` move focus between cells, `Esc` clears focus.
/// While editing, `1`-`9` drop the matching library item onto the focused
/// cell and `Delete` removes its widget.
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> Action {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Action::Quit;
    }

    if let Some(index) = app.focused {
        if app.dashboard.handle_key(index, key) {
            return Action::None;
        }
    }

    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('e') => Action::TogglePanel,
        KeyCode::Tab => {
            app.focus_next();
            Action::None
        }
        KeyCode::BackTab => {
            app.focus_previous();
            Action::None
        }
        KeyCode::Esc => {
            app.focused = None;
            Action::None
        }
        KeyCode::Char(c @ '1'..='9') if app.dashboard.state().is_editing() => {
            let item = c as usize - '1' as usize;
            app.place_from_library(item);
            Action::None
        }
        KeyCode::Delete if app.dashboard.state().is_editing() => {
            if let Some(index) = app.focused {
                app.remove(index);
            }
            Action::None
        }
        _ => Action::None,
    }
}
