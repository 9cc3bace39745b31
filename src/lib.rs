//! Widget dashboard library
//!
//! A grid of cells defined by named preset schemas, filled with widgets
//! created from a registry, and persisted as a layout in a key-value store.
//!
//! - [`layout`]: preset schemas and their cell geometry
//! - [`store`]: key-value storage and the persisted layout, including legacy
//!   key migration
//! - [`widgets`]: the widget trait, registry and built-in widgets
//! - [`engine`]: the dashboard engine (grid rendering, placement, drag
//!   protocol, edit mode)
//! - [`tui`]: the terminal front end
//! - [`config`] and [`logging`]: ambient setup for the `wd` binary

pub mod config;
pub mod engine;
pub mod layout;
pub mod logging;
pub mod store;
pub mod tui;
pub mod widgets;
