//! # dashboard-services
//!
//! Typed client for the backend that feeds the dashboard's network widgets.
//!
//! The backend exposes a handful of JSON endpoints:
//!
//! - `GET /api/health` reports liveness.
//! - `GET /api/weather?city=&units=` returns current conditions for a city.
//! - `GET /api/music/list` lists the tracks available to the player.
//! - `POST /api/music/upload` accepts multipart audio uploads.
//!
//! ## Example
//!
//! ```rust,ignore
//! use dashboard_services::{ServiceClient, Units};
//!
//! let client = ServiceClient::new("http://127.0.0.1:8000")?;
//! let report = client.weather("Verona", Units::Metric)?;
//! println!("{:?}°", report.temperature);
//! ```
//!
//! The client is blocking. Construct it outside any async context and call it
//! from `tokio::task::spawn_blocking` when used from async code.

pub mod error;
pub mod types;

#[cfg(feature = "blocking")]
pub mod client;

pub use error::ServiceError;
pub use types::{HealthResponse, Track, TrackList, Units, UploadResponse, WeatherReport};

#[cfg(feature = "blocking")]
pub use client::ServiceClient;
