//! Layout system for the dashboard.
//!
//! Provides the grid geometry types and the catalog of named preset schemas
//! that determine how the dashboard area is divided into cells. Users switch
//! between schemas from the edit panel; the chosen schema name is persisted
//! alongside the widget types occupying each cell.

mod presets;
mod schema;

pub use presets::{SchemaCatalog, DEFAULT_SCHEMA, PRESET_NAMES};
pub use schema::{CellSpec, Schema};
