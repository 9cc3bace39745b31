//! Error types for the dashboard-services crate.

use thiserror::Error;

/// Errors returned by [`ServiceClient`](crate::ServiceClient) calls.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status and no error body.
    #[error("Backend returned HTTP {0}")]
    Http(u16),

    /// The backend reported an error in its JSON payload.
    #[error("Backend error: {0}")]
    Backend(String),

    /// The response body did not match the expected shape.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// A local file could not be read for upload.
    #[error("Failed to read upload file {path}: {source}")]
    Upload {
        /// Path of the file that failed.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_http_includes_status() {
        let err = ServiceError::Http(502);
        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn display_backend_includes_message() {
        let err = ServiceError::Backend("City not found: Atlantis".to_string());
        assert_eq!(err.to_string(), "Backend error: City not found: Atlantis");
    }

    #[test]
    fn upload_error_chains_source() {
        let err = ServiceError::Upload {
            path: "/tmp/song.mp3".into(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("/tmp/song.mp3"));
    }
}
