//! Clock widget: local time and long date.
//!
//! # Display
//!
//! ```text
//! 14:05
//! Thursday, 2 May 2024
//! ```
//!
//! Pressing `h` switches between 24-hour and 12-hour time. The choice is
//! remembered per cell under `wd.widget.clock.format.<cell>`.

use super::{state_key, Widget, WidgetContext};
use crate::store::{lock, SharedStore};
use chrono::{DateTime, Local, TimeZone};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    style::{Modifier, Style},
    text::Line,
};

/// Registered type name.
pub const TYPE: &str = "clock";

/// Time display format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HourFormat {
    /// `14:05`
    TwentyFour,
    /// `2:05 PM`
    Twelve,
}

impl HourFormat {
    fn as_str(self) -> &'static str {
        match self {
            HourFormat::TwentyFour => "24h",
            HourFormat::Twelve => "12h",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "24h" => Some(HourFormat::TwentyFour),
            "12h" => Some(HourFormat::Twelve),
            _ => None,
        }
    }

    fn toggled(self) -> Self {
        match self {
            HourFormat::TwentyFour => HourFormat::Twelve,
            HourFormat::Twelve => HourFormat::TwentyFour,
        }
    }
}

/// Widget showing the current local time and date.
pub struct ClockWidget {
    cell_index: usize,
    store: SharedStore,
    format: HourFormat,
}

impl ClockWidget {
    /// Creates a clock for the cell in `context`, restoring its saved format.
    pub fn new(context: &WidgetContext, store: SharedStore) -> Self {
        let saved = lock(&store)
            .get(&state_key(TYPE, "format", context.cell_index))
            .unwrap_or_else(|e| {
                tracing::warn!("failed to read clock format: {e}");
                None
            });
        let format = saved
            .as_deref()
            .and_then(HourFormat::parse)
            .unwrap_or(HourFormat::TwentyFour);
        Self {
            cell_index: context.cell_index,
            store,
            format,
        }
    }

    /// Current hour format.
    pub fn format(&self) -> HourFormat {
        self.format
    }

    /// Switches hour format and persists the choice.
    pub fn toggle_format(&mut self) {
        self.format = self.format.toggled();
        let key = state_key(TYPE, "format", self.cell_index);
        if let Err(e) = lock(&self.store).set(&key, self.format.as_str()) {
            tracing::warn!("failed to save clock format: {e}");
        }
    }

    fn lines_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Vec<Line<'static>>
    where
        Tz::Offset: std::fmt::Display,
    {
        vec![
            Line::styled(
                format_time(now, self.format),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Line::styled(
                format_date(now),
                Style::default().add_modifier(Modifier::DIM),
            ),
        ]
    }
}

impl Widget for ClockWidget {
    fn widget_type(&self) -> &'static str {
        TYPE
    }

    fn title(&self) -> &str {
        "Clock"
    }

    fn render(&self, _width: u16) -> Vec<Line<'static>> {
        self.lines_at(&Local::now())
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('h') => {
                self.toggle_format();
                true
            }
            _ => false,
        }
    }
}

/// Formats the time of day, e.g. `09:41` or `9:41 AM`.
pub fn format_time<Tz: TimeZone>(now: &DateTime<Tz>, format: HourFormat) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match format {
        HourFormat::TwentyFour => now.format("%H:%M").to_string(),
        HourFormat::Twelve => now.format("%-I:%M %p").to_string(),
    }
}

/// Formats the long date, e.g. `Thursday, 2 May 2024`.
pub fn format_date<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%A, %-d %B %Y").to_string()
}
