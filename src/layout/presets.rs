//! Built-in schema preset definitions.
//!
//! Seven presets are provided:
//! - **2x2**, **3x2**, **4x4**: uniform grids of unit cells
//! - **tall-left** / **tall-right**: one full-height column beside three
//!   stacked rows
//! - **wide-top** / **wide-bottom**: one full-width row above or below three
//!   side-by-side cells
//!
//! Custom schema definitions are not supported; a name outside this list is
//! a lookup miss and resolves to [`DEFAULT_SCHEMA`].

use super::schema::{CellSpec, Schema};

/// Schema used on first boot and whenever a name cannot be resolved.
pub const DEFAULT_SCHEMA: &str = "2x2";

/// Every preset name, in edit-panel order.
pub const PRESET_NAMES: &[&str] = &[
    "2x2",
    "3x2",
    "4x4",
    "tall-left",
    "tall-right",
    "wide-top",
    "wide-bottom",
];

/// Stateless catalog of named preset schemas.
pub struct SchemaCatalog;

impl SchemaCatalog {
    /// Builds the schema for `name`, or `None` for an unknown name.
    ///
    /// Each call produces a fresh, structurally identical value.
    pub fn generate(name: &str) -> Option<Schema> {
        let schema = match name {
            "2x2" => Schema::uniform(2, 2),
            "3x2" => Schema::uniform(3, 2),
            "4x4" => Schema::uniform(4, 4),
            "tall-left" => Schema {
                cols: 4,
                rows: 3,
                cells: vec![
                    CellSpec::new(1, 1, 1, 3),
                    CellSpec::new(2, 1, 3, 1),
                    CellSpec::new(2, 2, 3, 1),
                    CellSpec::new(2, 3, 3, 1),
                ],
            },
            "tall-right" => Schema {
                cols: 4,
                rows: 3,
                cells: vec![
                    CellSpec::new(1, 1, 3, 1),
                    CellSpec::new(1, 2, 3, 1),
                    CellSpec::new(1, 3, 3, 1),
                    CellSpec::new(4, 1, 1, 3),
                ],
            },
            "wide-top" => Schema {
                cols: 3,
                rows: 2,
                cells: vec![
                    CellSpec::new(1, 1, 3, 1),
                    CellSpec::unit(1, 2),
                    CellSpec::unit(2, 2),
                    CellSpec::unit(3, 2),
                ],
            },
            "wide-bottom" => Schema {
                cols: 3,
                rows: 2,
                cells: vec![
                    CellSpec::unit(1, 1),
                    CellSpec::unit(2, 1),
                    CellSpec::unit(3, 1),
                    CellSpec::new(1, 2, 3, 1),
                ],
            },
            _ => return None,
        };
        Some(schema)
    }

    /// Whether `name` is a known preset.
    pub fn contains(name: &str) -> bool {
        PRESET_NAMES.contains(&name)
    }

    /// Returns all preset names.
    pub fn names() -> &'static [&'static str] {
        PRESET_NAMES
    }

    /// Resolves `name` to its canonical preset name and schema, falling back
    /// to [`DEFAULT_SCHEMA`] for unknown names.
    pub fn resolve(name: &str) -> (&'static str, Schema) {
        let hit = PRESET_NAMES
            .iter()
            .copied()
            .find(|preset| *preset == name)
            .and_then(|preset| Self::generate(preset).map(|schema| (preset, schema)));
        match hit {
            Some(resolved) => resolved,
            None => {
                tracing::warn!(schema = name, "unknown schema, using {}", DEFAULT_SCHEMA);
                (DEFAULT_SCHEMA, Schema::uniform(2, 2))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ASYMMETRIC: &[&str] = &["tall-left", "tall-right", "wide-top", "wide-bottom"];

    #[test]
    fn every_preset_generates() {
        for name in PRESET_NAMES {
            assert!(
                SchemaCatalog::generate(name).is_some(),
                "expected preset '{name}'"
            );
        }
    }

    #[test]
    fn generate_is_idempotent() {
        for name in PRESET_NAMES {
            assert_eq!(
                SchemaCatalog::generate(name),
                SchemaCatalog::generate(name),
                "preset '{name}' should be deterministic"
            );
        }
    }

    #[test]
    fn every_preset_fits_its_grid() {
        for name in PRESET_NAMES {
            let schema = SchemaCatalog::generate(name).expect("preset exists");
            assert!(schema.fits(), "preset '{name}' has a cell outside its grid");
        }
    }

    #[test]
    fn uniform_presets_have_expected_dimensions() {
        let cases = [("2x2", 2, 2, 4), ("3x2", 3, 2, 6), ("4x4", 4, 4, 16)];
        for (name, cols, rows, count) in cases {
            let schema = SchemaCatalog::generate(name).expect("preset exists");
            assert_eq!((schema.cols, schema.rows), (cols, rows), "{name}");
            assert_eq!(schema.cell_count(), count, "{name}");
            assert!(schema
                .cells
                .iter()
                .all(|c| c.col_span == 1 && c.row_span == 1));
        }
    }

    #[test]
    fn asymmetric_presets_have_one_full_span_cell_and_three_unit_cells() {
        for name in ASYMMETRIC {
            let schema = SchemaCatalog::generate(name).expect("preset exists");
            assert_eq!(schema.cell_count(), 4, "{name}");

            let tall = name.starts_with("tall");
            let (full, rest): (Vec<&CellSpec>, Vec<&CellSpec>) =
                schema.cells.iter().partition(|c| {
                    if tall {
                        c.row_span == schema.rows
                    } else {
                        c.col_span == schema.cols
                    }
                });
            assert_eq!(full.len(), 1, "{name} should have exactly one full-span cell");
            for cell in rest {
                if tall {
                    assert_eq!(cell.row_span, 1, "{name}");
                } else {
                    assert_eq!(cell.col_span, 1, "{name}");
                }
            }
        }
    }

    #[test]
    fn tall_left_puts_big_cell_first_and_leftmost() {
        let schema = SchemaCatalog::generate("tall-left").expect("preset exists");
        assert_eq!(schema.cells[0], CellSpec::new(1, 1, 1, 3));
    }

    #[test]
    fn wide_bottom_puts_big_cell_last() {
        let schema = SchemaCatalog::generate("wide-bottom").expect("preset exists");
        assert_eq!(schema.cells[3], CellSpec::new(1, 2, 3, 1));
    }

    #[test]
    fn unknown_name_is_a_miss() {
        assert!(SchemaCatalog::generate("5x5").is_none());
        assert!(SchemaCatalog::generate("").is_none());
        assert!(!SchemaCatalog::contains("TALL-LEFT"));
    }

    #[test]
    fn resolve_falls_back_to_default() {
        let (name, schema) = SchemaCatalog::resolve("nonexistent");
        assert_eq!(name, DEFAULT_SCHEMA);
        assert_eq!(Some(schema), SchemaCatalog::generate(DEFAULT_SCHEMA));
    }

    #[test]
    fn resolve_known_name_keeps_it() {
        let (name, schema) = SchemaCatalog::resolve("wide-top");
        assert_eq!(name, "wide-top");
        assert_eq!(schema.cell_count(), 4);
    }

    #[test]
    fn names_lists_seven_presets() {
        assert_eq!(SchemaCatalog::names().len(), 7);
        assert_eq!(SchemaCatalog::names()[0], DEFAULT_SCHEMA);
    }
}
