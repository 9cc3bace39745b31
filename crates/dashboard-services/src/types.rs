//! Type definitions for backend responses.
//!
//! Field sets follow what the backend actually emits; anything optional on
//! the wire is `Option` here so older or partial payloads still decode.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Measurement system for weather requests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    /// Celsius and km/h.
    #[default]
    Metric,
    /// Fahrenheit and mph.
    Imperial,
}

impl Units {
    /// Query-string value understood by the backend.
    pub fn as_str(self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    /// Temperature suffix, e.g. `°C`.
    pub fn temperature_symbol(self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    /// Wind speed unit label.
    pub fn wind_unit(self) -> &'static str {
        match self {
            Units::Metric => "km/h",
            Units::Imperial => "mph",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Units {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            other => Err(format!("unknown units '{other}', expected metric or imperial")),
        }
    }
}

/// Response of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    /// `"ok"` when the backend is up.
    pub status: String,
    /// Server clock at the time of the request.
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,
}

/// Response of `GET /api/weather`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WeatherReport {
    /// Current temperature in the requested units.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Current wind speed in the requested units.
    #[serde(default)]
    pub wind_speed: Option<f64>,
    /// City the report was resolved for.
    #[serde(default)]
    pub city: Option<String>,
    /// Free-form conditions text.
    #[serde(default)]
    pub description: Option<String>,
    /// WMO weather code. Older backends name it `weather_code`.
    #[serde(default, alias = "weather_code")]
    pub code: Option<i64>,
    /// Daylight flag; the backend sends either a bool or `0`/`1`.
    #[serde(default, deserialize_with = "flexible_flag")]
    pub is_day: Option<bool>,
    /// Local sunrise time, when `is_day` is not provided.
    #[serde(default)]
    pub sunrise: Option<String>,
    /// Local sunset time, when `is_day` is not provided.
    #[serde(default)]
    pub sunset: Option<String>,
    /// Units echoed back by the backend.
    #[serde(default)]
    pub units: Option<Units>,
    /// Error message; set instead of the data fields on failure.
    #[serde(default)]
    pub error: Option<String>,
}

/// A single playable track.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    /// Display title, when the backend knows one.
    #[serde(default)]
    pub title: Option<String>,
    /// File name on the backend.
    pub filename: String,
    /// URL the audio can be streamed from.
    pub url: String,
}

impl Track {
    /// Title if present, otherwise the file name.
    pub fn display_name(&self) -> &str {
        self.title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(&self.filename)
    }
}

/// Response of `GET /api/music/list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrackList {
    /// Tracks in playlist order.
    #[serde(default)]
    pub tracks: Vec<Track>,
}

/// Response of `POST /api/music/upload`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UploadResponse {
    /// File names stored by the backend.
    #[serde(default)]
    pub saved: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Flag {
    Bool(bool),
    Int(i64),
}

fn flexible_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let flag: Option<Flag> = Option::deserialize(deserializer)?;
    Ok(flag.map(|f| match f {
        Flag::Bool(b) => b,
        Flag::Int(i) => i != 0,
    }))
}
