//! Blocking HTTP client for the dashboard backend.
//!
//! Status mapping mirrors the backend's conventions: success bodies are the
//! typed payloads, error statuses carry `{"error": "..."}` when the backend
//! produced them itself.

use crate::error::ServiceError;
use crate::types::{HealthResponse, TrackList, Units, UploadResponse, WeatherReport};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::Duration;

/// Per-request timeout, matching the backend's own upstream timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Multipart field name used for uploads.
pub const UPLOAD_FIELD: &str = "files";

/// Client bound to one backend base URL.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    base_url: String,
    http: reqwest::blocking::Client,
}

impl ServiceClient {
    /// Creates a client for `base_url` (e.g. `http://127.0.0.1:8000`).
    ///
    /// Must not be called from inside an async runtime context.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ServiceError> {
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ServiceError::Network(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into(),
            http,
        })
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET /api/health`.
    pub fn health(&self) -> Result<HealthResponse, ServiceError> {
        let response = self
            .http
            .get(self.url("/api/health"))
            .send()
            .map_err(|e| ServiceError::Network(e.to_string()))?;
        map_response(response)
    }

    /// `GET /api/weather?city=&units=`.
    ///
    /// A report carrying an `error` field is returned as
    /// [`ServiceError::Backend`].
    pub fn weather(&self, city: &str, units: Units) -> Result<WeatherReport, ServiceError> {
        let response = self
            .http
            .get(self.url("/api/weather"))
            .query(&[("city", city), ("units", units.as_str())])
            .send()
            .map_err(|e| ServiceError::Network(e.to_string()))?;
        let report: WeatherReport = map_response(response)?;
        match report.error {
            Some(message) => Err(ServiceError::Backend(message)),
            None => Ok(report),
        }
    }

    /// `GET /api/music/list`.
    pub fn music_list(&self) -> Result<TrackList, ServiceError> {
        let response = self
            .http
            .get(self.url("/api/music/list"))
            .send()
            .map_err(|e| ServiceError::Network(e.to_string()))?;
        map_response(response)
    }

    /// `POST /api/music/upload` with every file under the `files` field.
    pub fn upload_music(&self, files: &[PathBuf]) -> Result<UploadResponse, ServiceError> {
        let mut form = reqwest::blocking::multipart::Form::new();
        for path in files {
            form = form
                .file(UPLOAD_FIELD, path)
                .map_err(|source| ServiceError::Upload {
                    path: path.clone(),
                    source,
                })?;
        }
        let response = self
            .http
            .post(self.url("/api/music/upload"))
            .multipart(form)
            .send()
            .map_err(|e| ServiceError::Network(e.to_string()))?;
        map_response(response)
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }
}

/// Joins a base URL and an absolute path without doubling slashes.
fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Map an HTTP response to a typed payload, handling error status codes.
fn map_response<T: DeserializeOwned>(
    response: reqwest::blocking::Response,
) -> Result<T, ServiceError> {
    let status = response.status().as_u16();
    let body = response
        .text()
        .map_err(|e| ServiceError::Network(e.to_string()))?;
    decode_body(status, &body)
}

/// Decode a response body given its status code.
fn decode_body<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ServiceError> {
    match status {
        200..=299 => serde_json::from_str(body).map_err(|e| ServiceError::Decode(e.to_string())),
        _ => Err(backend_error(body).map_or(ServiceError::Http(status), ServiceError::Backend)),
    }
}

/// Extracts `{"error": "..."}` from an error body, if present.
fn backend_error(body: &str) -> Option<String> {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()?
        .get("error")?
        .as_str()
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_url_handles_trailing_and_leading_slashes() {
        assert_eq!(
            join_url("http://host:8000/", "/api/weather"),
            "http://host:8000/api/weather"
        );
        assert_eq!(
            join_url("http://host:8000", "api/music/list"),
            "http://host:8000/api/music/list"
        );
    }

    #[test]
    fn decode_body_success() {
        let list: TrackList = decode_body(
            200,
            r#"{"tracks": [{"filename": "a.mp3", "url": "/media/a.mp3"}]}"#,
        )
        .expect("should decode");
        assert_eq!(list.tracks.len(), 1);
    }

    #[test]
    fn decode_body_not_found_with_error_body() {
        let err = decode_body::<WeatherReport>(404, r#"{"error": "City not found: Nowhere"}"#)
            .expect_err("should fail");
        match err {
            ServiceError::Backend(msg) => assert_eq!(msg, "City not found: Nowhere"),
            other => panic!("expected Backend, got: {other:?}"),
        }
    }

    #[test]
    fn decode_body_bad_gateway_without_body() {
        let err = decode_body::<WeatherReport>(502, "<html>bad gateway</html>")
            .expect_err("should fail");
        assert!(matches!(err, ServiceError::Http(502)));
    }

    #[test]
    fn decode_body_malformed_success_is_decode_error() {
        let err = decode_body::<TrackList>(200, "not json").expect_err("should fail");
        assert!(matches!(err, ServiceError::Decode(_)));
    }

    #[test]
    fn upload_missing_file_reports_path() {
        let client = ServiceClient::new("http://127.0.0.1:9").expect("client builds");
        let missing = PathBuf::from("/definitely/not/here.mp3");
        let err = client
            .upload_music(std::slice::from_ref(&missing))
            .expect_err("should fail before sending");
        match err {
            ServiceError::Upload { path, .. } => assert_eq!(path, missing),
            other => panic!("expected Upload, got: {other:?}"),
        }
    }
}
