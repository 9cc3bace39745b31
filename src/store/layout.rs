//! The persisted layout and its storage key lifecycle.
//!
//! The layout lives under [`CANONICAL_KEY`] as JSON:
//!
//! ```json
//! {"schema": "2x2", "cells": ["clock", null, null, "weather"]}
//! ```
//!
//! Earlier releases stored the same shape under versioned keys. On boot,
//! [`LayoutStore::migrate_if_needed`] copies the newest of those into the
//! canonical key, verbatim, unless the canonical key is already populated.

use super::error::StoreError;
use super::kv::{lock, SharedStore};
use serde::{Deserialize, Serialize};

/// Key holding the current layout.
pub const CANONICAL_KEY: &str = "wd.layout";

/// Historical layout keys, newest first.
///
/// Append-only: add new legacy sources at the front when the canonical key
/// changes, never reorder or remove existing entries.
pub const LEGACY_KEYS: &[&str] = &[
    "wd.layout.v7",
    "wd.layout.v6",
    "wd.layout.v5",
    "wd.layout.v4",
    "wd.layout.v3",
    "wd.layout.v2",
    "wd.layout.v1",
];

/// Schema name plus the widget type occupying each cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    /// Preset schema name. Missing in old payloads; resolves to the default.
    #[serde(default)]
    pub schema: String,
    /// Widget type per cell index; `None` is an empty cell.
    #[serde(default)]
    pub cells: Vec<Option<String>>,
}

impl Layout {
    /// A layout of `cell_count` empty cells.
    pub fn empty(schema: &str, cell_count: usize) -> Self {
        Self {
            schema: schema.to_string(),
            cells: vec![None; cell_count],
        }
    }

    /// Iterates `(cell_index, widget_type)` for occupied cells.
    ///
    /// Empty strings count as unoccupied.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, t)| {
            t.as_deref()
                .filter(|t| !t.is_empty())
                .map(|t| (i, t))
        })
    }
}

/// Reads and writes the layout in a shared key-value store.
#[derive(Clone)]
pub struct LayoutStore {
    kv: SharedStore,
}

impl std::fmt::Debug for LayoutStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutStore")
            .field("key", &CANONICAL_KEY)
            .finish_non_exhaustive()
    }
}

impl LayoutStore {
    /// Creates a layout store over `kv`.
    pub fn new(kv: SharedStore) -> Self {
        Self { kv }
    }

    /// The underlying shared store.
    pub fn shared(&self) -> &SharedStore {
        &self.kv
    }

    /// Copies the newest non-empty legacy value into the canonical key.
    ///
    /// Does nothing when the canonical key already holds a value. Returns
    /// the legacy key that was migrated, if any.
    pub fn migrate_if_needed(&self) -> Result<Option<&'static str>, StoreError> {
        let mut kv = lock(&self.kv);
        if non_empty(kv.get(CANONICAL_KEY)?).is_some() {
            return Ok(None);
        }
        for key in LEGACY_KEYS {
            if let Some(value) = non_empty(kv.get(key)?) {
                kv.set(CANONICAL_KEY, &value)?;
                tracing::info!(from = key, to = CANONICAL_KEY, "migrated legacy layout");
                return Ok(Some(key));
            }
        }
        Ok(None)
    }

    /// Overwrites the canonical key with `layout`.
    pub fn save(&self, layout: &Layout) -> Result<(), StoreError> {
        let json =
            serde_json::to_string(layout).map_err(|e| StoreError::Serialize(e.to_string()))?;
        lock(&self.kv).set(CANONICAL_KEY, &json)?;
        tracing::debug!(schema = %layout.schema, cells = layout.cells.len(), "saved layout");
        Ok(())
    }

    /// Reads the canonical layout, distinguishing absence from corruption.
    pub fn try_load(&self) -> Result<Option<Layout>, StoreError> {
        let Some(raw) = non_empty(lock(&self.kv).get(CANONICAL_KEY)?) else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StoreError::MalformedLayout {
                key: CANONICAL_KEY.to_string(),
                message: e.to_string(),
            })
    }

    /// Reads the canonical layout; any failure is logged and reads as absent.
    pub fn load(&self) -> Option<Layout> {
        match self.try_load() {
            Ok(layout) => layout,
            Err(e) => {
                tracing::warn!("layout parse error: {e}");
                None
            }
        }
    }

    /// Removes the canonical key.
    pub fn clear(&self) -> Result<(), StoreError> {
        lock(&self.kv).remove(CANONICAL_KEY)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
