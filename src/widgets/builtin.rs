//! Registration of the built-in widget types.

use super::clock::{self, ClockWidget};
use super::player::{self, PlayerWidget};
use super::tasklist::{self, TaskListWidget};
use super::weather::{self, WeatherSettings, WeatherWidget};
use super::{Widget, WidgetContext, WidgetRegistry};
use crate::store::SharedStore;
use dashboard_services::ServiceClient;

/// Shared resources captured by the built-in factories.
#[derive(Clone)]
pub struct BuiltinEnv {
    /// Store for per-widget state.
    pub store: SharedStore,
    /// Backend client; `None` disables network-backed refreshes.
    pub client: Option<ServiceClient>,
    /// Weather widget settings.
    pub weather: WeatherSettings,
}

impl std::fmt::Debug for BuiltinEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinEnv")
            .field("client", &self.client.as_ref().map(ServiceClient::base_url))
            .field("weather", &self.weather)
            .finish_non_exhaustive()
    }
}

/// Registers `clock`, `weather`, `tasklist` and `player`.
pub fn register_builtins(registry: &mut WidgetRegistry, env: &BuiltinEnv) {
    let store = env.store.clone();
    registry.register(clock::TYPE, move |ctx: &WidgetContext| -> Box<dyn Widget> {
        Box::new(ClockWidget::new(ctx, store.clone()))
    });

    let settings = env.weather.clone();
    let client = env.client.clone();
    registry.register(weather::TYPE, move |_ctx: &WidgetContext| -> Box<dyn Widget> {
        Box::new(WeatherWidget::new(&settings, client.clone()))
    });

    let store = env.store.clone();
    registry.register(tasklist::TYPE, move |ctx: &WidgetContext| -> Box<dyn Widget> {
        Box::new(TaskListWidget::new(ctx, store.clone()))
    });

    let store = env.store.clone();
    let client = env.client.clone();
    registry.register(player::TYPE, move |ctx: &WidgetContext| -> Box<dyn Widget> {
        Box::new(PlayerWidget::new(ctx, store.clone(), client.clone()))
    });

    tracing::debug!(types = ?registry.available_ids(), "registered built-in widgets");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{shared, MemoryStore};
    use dashboard_services::Units;
    use std::time::Duration;

    fn env() -> BuiltinEnv {
        BuiltinEnv {
            store: shared(MemoryStore::new()),
            client: None,
            weather: WeatherSettings {
                city: "Verona".to_string(),
                units: Units::Metric,
                refresh_interval: Duration::from_secs(600),
            },
        }
    }

    #[test]
    fn test_registers_all_builtins() {
        let mut registry = WidgetRegistry::new();
        register_builtins(&mut registry, &env());
        assert_eq!(
            registry.available_ids(),
            vec!["clock", "player", "tasklist", "weather"]
        );
    }

    #[test]
    fn test_created_widgets_report_their_type() {
        let mut registry = WidgetRegistry::new();
        register_builtins(&mut registry, &env());
        for id in ["clock", "player", "tasklist", "weather"] {
            let mut widget = registry
                .create(id, &WidgetContext::new(true, 1))
                .expect("registered");
            assert_eq!(widget.widget_type(), id);
            widget.teardown();
        }
    }
}
