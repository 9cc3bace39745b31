//! Weather widget backed by `GET /api/weather`.
//!
//! Fetches current conditions for the configured city on creation, every
//! refresh interval, and when `r` is pressed. A failed fetch shows an inline
//! error until the next successful one.
//!
//! # Display
//!
//! ```text
//! 21°C
//! City: Verona • Wind: 8 km/h
//! ```

use super::refresh::{read, slot, FetchState, Refresher, Slot};
use super::Widget;
use crate::config::schema::WeatherConfig;
use crossterm::event::{KeyCode, KeyEvent};
use dashboard_services::{ServiceClient, Units, WeatherReport};
use ratatui::{
    style::{Color, Modifier, Style},
    text::Line,
};
use std::time::Duration;

/// Registered type name.
pub const TYPE: &str = "weather";

/// What to fetch and how often.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSettings {
    /// City passed to the backend.
    pub city: String,
    /// Measurement system.
    pub units: Units,
    /// Time between automatic refreshes.
    pub refresh_interval: Duration,
}

impl From<&WeatherConfig> for WeatherSettings {
    fn from(config: &WeatherConfig) -> Self {
        Self {
            city: config.city.clone(),
            units: config.units,
            refresh_interval: config.refresh_interval(),
        }
    }
}

/// Current-conditions widget.
pub struct WeatherWidget {
    units: Units,
    slot: Slot<WeatherReport>,
    refresher: Option<Refresher>,
}

impl WeatherWidget {
    /// Creates the widget and starts its refresh loop when a client is given.
    pub fn new(settings: &WeatherSettings, client: Option<ServiceClient>) -> Self {
        let slot = slot();
        let refresher = client.map(|client| {
            let city = settings.city.clone();
            let units = settings.units;
            Refresher::spawn(
                TYPE,
                Some(settings.refresh_interval),
                slot.clone(),
                move || client.weather(&city, units).map_err(|e| e.to_string()),
            )
        });
        Self {
            units: settings.units,
            slot,
            refresher,
        }
    }

    /// Snapshot of the latest fetch outcome.
    pub fn state(&self) -> FetchState<WeatherReport> {
        read(&self.slot).clone()
    }

    /// Whether a background refresh loop is running.
    pub fn is_refreshing(&self) -> bool {
        self.refresher.as_ref().is_some_and(Refresher::is_active)
    }

    #[cfg(test)]
    fn with_state(units: Units, state: FetchState<WeatherReport>) -> Self {
        let widget = Self {
            units,
            slot: slot(),
            refresher: None,
        };
        *read(&widget.slot) = state;
        widget
    }
}

impl Widget for WeatherWidget {
    fn widget_type(&self) -> &'static str {
        TYPE
    }

    fn title(&self) -> &str {
        "Weather"
    }

    fn render(&self, _width: u16) -> Vec<Line<'static>> {
        let (temperature, meta) = match &*read(&self.slot) {
            FetchState::Loading => ("--°".to_string(), "City: -- • Wind --".to_string()),
            FetchState::Ready(report) => summarize(report, self.units),
            FetchState::Failed(message) => {
                return vec![
                    Line::styled("--", Style::default().add_modifier(Modifier::BOLD)),
                    Line::styled(
                        format!("Weather error: {message}"),
                        Style::default().fg(Color::Red),
                    ),
                ];
            }
        };
        vec![
            Line::styled(temperature, Style::default().add_modifier(Modifier::BOLD)),
            Line::styled(meta, Style::default().fg(Color::Gray)),
        ]
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('r') => {
                if let Some(refresher) = &self.refresher {
                    refresher.refresh_now();
                }
                true
            }
            _ => false,
        }
    }

    fn teardown(&mut self) {
        if let Some(refresher) = self.refresher.as_mut() {
            refresher.cancel();
        }
    }
}

/// Temperature line and `City: … • Wind: …` line for a report.
///
/// Units echoed by the backend win over the requested ones.
pub fn summarize(report: &WeatherReport, requested: Units) -> (String, String) {
    let units = report.units.unwrap_or(requested);
    let temperature = match report.temperature {
        Some(t) => format!("{}{}", t.round() as i64, units.temperature_symbol()),
        None => "--".to_string(),
    };
    let city = report.city.as_deref().unwrap_or("--");
    let wind = match report.wind_speed {
        Some(w) => format!("{} {}", w.round() as i64, units.wind_unit()),
        None => "--".to_string(),
    };
    (temperature, format!("City: {city} • Wind: {wind}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(temperature: f64, wind: f64) -> WeatherReport {
        WeatherReport {
            temperature: Some(temperature),
            wind_speed: Some(wind),
            city: Some("Verona".to_string()),
            ..WeatherReport::default()
        }
    }

    fn text(widget: &WeatherWidget) -> Vec<String> {
        widget.render(40).iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_summarize_metric_rounds() {
        let (t, meta) = summarize(&report(21.4, 7.6), Units::Metric);
        assert_eq!(t, "21°C");
        assert_eq!(meta, "City: Verona • Wind: 8 km/h");
    }

    #[test]
    fn test_summarize_imperial() {
        let (t, meta) = summarize(&report(70.5, 3.2), Units::Imperial);
        assert_eq!(t, "71°F");
        assert_eq!(meta, "City: Verona • Wind: 3 mph");
    }

    #[test]
    fn test_summarize_prefers_echoed_units() {
        let mut r = report(10.0, 1.0);
        r.units = Some(Units::Imperial);
        let (t, _) = summarize(&r, Units::Metric);
        assert_eq!(t, "10°F");
    }

    #[test]
    fn test_summarize_missing_fields() {
        let (t, meta) = summarize(&WeatherReport::default(), Units::Metric);
        assert_eq!(t, "--");
        assert_eq!(meta, "City: -- • Wind: --");
    }

    #[test]
    fn test_render_loading() {
        let w = WeatherWidget::with_state(Units::Metric, FetchState::Loading);
        assert_eq!(text(&w), vec!["--°", "City: -- • Wind --"]);
    }

    #[test]
    fn test_render_ready() {
        let w = WeatherWidget::with_state(Units::Metric, FetchState::Ready(report(-0.4, 12.0)));
        assert_eq!(text(&w), vec!["0°C", "City: Verona • Wind: 12 km/h"]);
    }

    #[test]
    fn test_render_error_inline() {
        let w = WeatherWidget::with_state(
            Units::Metric,
            FetchState::Failed("City not found: Atlantis".to_string()),
        );
        let lines = text(&w);
        assert_eq!(lines[0], "--");
        assert!(lines[1].contains("City not found: Atlantis"));
    }

    #[test]
    fn test_without_client_no_refresh_loop() {
        let settings = WeatherSettings {
            city: "Verona".to_string(),
            units: Units::Metric,
            refresh_interval: Duration::from_secs(600),
        };
        let mut w = WeatherWidget::new(&settings, None);
        assert!(!w.is_refreshing());
        assert_eq!(w.state(), FetchState::Loading);
        assert!(w.handle_key(KeyEvent::from(KeyCode::Char('r'))));
        w.teardown();
    }

    #[test]
    fn test_settings_from_config() {
        let config = WeatherConfig::default();
        let settings = WeatherSettings::from(&config);
        assert_eq!(settings.city, "Verona");
        assert_eq!(settings.units, Units::Metric);
        assert_eq!(settings.refresh_interval, Duration::from_secs(600));
    }

    #[test]
    fn test_teardown_stops_refresh_loop() {
        let settings = WeatherSettings {
            city: "Verona".to_string(),
            units: Units::Metric,
            refresh_interval: Duration::from_secs(600),
        };
        // The blocking client must be built outside the runtime.
        let client = ServiceClient::new("http://127.0.0.1:9").expect("client builds");
        let rt = tokio::runtime::Runtime::new().expect("runtime");
        let mut w = {
            let _guard = rt.enter();
            WeatherWidget::new(&settings, Some(client.clone()))
        };
        assert!(w.is_refreshing());
        w.teardown();
        assert!(!w.is_refreshing());
        drop(w);
        drop(rt);
    }
}
