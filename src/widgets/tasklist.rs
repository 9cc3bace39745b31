//! Task list widget with per-cell persistence.
//!
//! Items are stored as a JSON array under `wd.widget.tasklist.items.<cell>`:
//!
//! ```json
//! [{"text": "Write report", "done": false}]
//! ```
//!
//! A stored value that is not a valid item array reads as an empty list.
//!
//! # Keys
//!
//! | Key            | Action                      |
//! |----------------|-----------------------------|
//! | `a`            | start typing a new task     |
//! | `Enter`/`Esc`  | add / cancel while typing   |
//! | `j`/`k`        | move selection              |
//! | `Space`        | toggle done                 |
//! | `d`            | delete selected             |
//! | `c`            | remove completed            |
//! | `C`            | remove all                  |

use super::{state_key, Widget, WidgetContext};
use crate::store::{lock, SharedStore};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};
use serde::{Deserialize, Serialize};

/// Registered type name.
pub const TYPE: &str = "tasklist";

/// One task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    /// Task description.
    pub text: String,
    /// Whether the task is completed.
    #[serde(default)]
    pub done: bool,
}

/// Checklist widget.
pub struct TaskListWidget {
    key: String,
    store: SharedStore,
    items: Vec<TaskItem>,
    selected: usize,
    input: Option<String>,
}

impl TaskListWidget {
    /// Creates a task list for the cell in `context`, loading saved items.
    pub fn new(context: &WidgetContext, store: SharedStore) -> Self {
        let key = state_key(TYPE, "items", context.cell_index);
        let items = load_items(&store, &key);
        Self {
            key,
            store,
            items,
            selected: 0,
            input: None,
        }
    }

    /// Current items.
    pub fn items(&self) -> &[TaskItem] {
        &self.items
    }

    /// Index of the selected item.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Appends a task. Blank text is ignored; returns whether one was added.
    pub fn add(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.items.push(TaskItem {
            text: text.to_string(),
            done: false,
        });
        self.save();
        true
    }

    /// Flips the done flag of item `index`.
    pub fn toggle(&mut self, index: usize) {
        if let Some(item) = self.items.get_mut(index) {
            item.done = !item.done;
            self.save();
        }
    }

    /// Deletes item `index`.
    pub fn delete(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
            self.clamp_selection();
            self.save();
        }
    }

    /// Removes every completed item.
    pub fn clear_completed(&mut self) {
        self.items.retain(|item| !item.done);
        self.clamp_selection();
        self.save();
    }

    /// Removes every item.
    pub fn clear_all(&mut self) {
        self.items.clear();
        self.selected = 0;
        self.save();
    }

    fn clamp_selection(&mut self) {
        self.selected = self.selected.min(self.items.len().saturating_sub(1));
    }

    fn save(&self) {
        let json = match serde_json::to_string(&self.items) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("failed to serialize tasks: {e}");
                return;
            }
        };
        if let Err(e) = lock(&self.store).set(&self.key, &json) {
            tracing::warn!(key = %self.key, "failed to save tasks: {e}");
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> bool {
        let Some(buffer) = self.input.as_mut() else {
            return false;
        };
        match key.code {
            KeyCode::Char(c) => buffer.push(c),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Enter => {
                let text = self.input.take().unwrap_or_default();
                if self.add(&text) {
                    self.selected = self.items.len() - 1;
                }
            }
            KeyCode::Esc => self.input = None,
            _ => return false,
        }
        true
    }
}

impl Widget for TaskListWidget {
    fn widget_type(&self) -> &'static str {
        TYPE
    }

    fn title(&self) -> &str {
        "Tasks"
    }

    fn render(&self, width: u16) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(self.items.len() + 2);
        match &self.input {
            Some(buffer) => lines.push(Line::from(vec![
                Span::styled("+ ", Style::default().fg(Color::Green)),
                Span::raw(buffer.clone()),
                Span::styled("▏", Style::default().add_modifier(Modifier::SLOW_BLINK)),
            ])),
            None => lines.push(Line::styled(
                "[a] add  [space] done  [d] delete",
                Style::default().fg(Color::DarkGray),
            )),
        }

        if self.items.is_empty() {
            lines.push(Line::styled(
                "No tasks yet",
                Style::default().add_modifier(Modifier::DIM),
            ));
            return lines;
        }

        let max_text = usize::from(width).saturating_sub(6);
        for (i, item) in self.items.iter().enumerate() {
            let marker = if item.done { "[x] " } else { "[ ] " };
            let mut text_style = Style::default();
            if item.done {
                text_style = text_style.add_modifier(Modifier::CROSSED_OUT | Modifier::DIM);
            }
            let pointer = if i == self.selected { "›" } else { " " };
            lines.push(Line::from(vec![
                Span::styled(pointer, Style::default().fg(Color::Cyan)),
                Span::raw(marker),
                Span::styled(truncate(&item.text, max_text), text_style),
            ]));
        }
        lines
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if self.input.is_some() {
            return self.handle_input_key(key);
        }
        match key.code {
            KeyCode::Char('a') => self.input = Some(String::new()),
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected + 1 < self.items.len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Char(' ') => self.toggle(self.selected),
            KeyCode::Char('d') => self.delete(self.selected),
            KeyCode::Char('c') => self.clear_completed(),
            KeyCode::Char('C') => self.clear_all(),
            _ => return false,
        }
        true
    }
}

/// Reads the stored items; anything unreadable is an empty list.
fn load_items(store: &SharedStore, key: &str) -> Vec<TaskItem> {
    let raw = match lock(store).get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(key, "failed to read tasks: {e}");
            return Vec::new();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(key, "ignoring malformed task list: {e}");
        Vec::new()
    })
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
