//! Durable key-value storage and the persisted dashboard layout.
//!
//! The dashboard keeps everything it remembers between sessions in one
//! string-to-string store: the layout under a canonical key, and each
//! widget's own state under keys namespaced by widget type and cell index.

mod error;
mod kv;
mod layout;

pub use error::StoreError;
pub use kv::{lock, shared, FileStore, KeyValueStore, MemoryStore, SharedStore};
pub use layout::{Layout, LayoutStore, CANONICAL_KEY, LEGACY_KEYS};
