//! Terminal front end for the dashboard.
//!
//! Built on ratatui and crossterm with mouse capture: the header carries the
//! edit toggle, the edit panel offers presets, reset and the widget library,
//! and the grid shows one bordered block per cell.

pub mod app;
pub mod event;
pub mod ui;

mod test_utils;
