//! Storage error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by key-value backends and the layout store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing file exists but could not be read.
    #[error("Failed to read storage file: {path}")]
    Read {
        /// Path of the storage file.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Writing the temporary copy of the storage file failed.
    #[error("Failed to write storage file: {path}")]
    Write {
        /// Path that was being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The final rename over the storage file failed.
    #[error("Failed to write storage atomically: {path} - Safety copy at: {temp_path}")]
    WriteAtomic {
        /// Path of the storage file.
        path: PathBuf,
        /// Temporary copy left behind.
        temp_path: PathBuf,
    },

    /// The storage file is not a JSON object of strings.
    #[error("Malformed storage file {path}: {message}")]
    Corrupt {
        /// Path of the storage file.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// The value under a layout key is not a valid layout.
    #[error("Malformed layout under key '{key}': {message}")]
    MalformedLayout {
        /// Key that held the value.
        key: String,
        /// Parser message.
        message: String,
    },

    /// A value could not be serialized.
    #[error("Failed to serialize value: {0}")]
    Serialize(String),
}
