// Main entry point - Dependency injection and the wake/sleep loop
mod domain;
mod application;
mod infrastructure;
mod presentation;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::application::cache::WeatherCache;
use crate::application::refresh_service::{FetchWindows, RefreshService};
use crate::infrastructure::config::load_panel_config;
use crate::infrastructure::google_weather::GoogleWeatherClient;
use crate::infrastructure::sensor::NullSensor;
use crate::infrastructure::store::FileStore;
use crate::infrastructure::system_time::SystemClock;
use crate::presentation::renderer::TextRenderer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_panel=info".into()),
        )
        .init();

    // Load configuration
    let config = load_panel_config()?;

    // Wire collaborators (infrastructure layer)
    let store = Arc::new(FileStore::new(&config.storage.dir)?);
    let provider = Arc::new(GoogleWeatherClient::new(
        config.api.endpoint.clone(),
        config.api.key.clone(),
        config.location.latitude,
        config.location.longitude,
        config.panel.timezone,
    ));

    // Create the cache and refresh service (application layer)
    let cache = WeatherCache::new(store, config.panel.timezone);
    let windows = FetchWindows {
        forecast_days: config.panel.forecast_days,
        hours_ahead: config.panel.hours_ahead,
        history_hours: config.panel.history_hours,
    };
    let mut service = RefreshService::new(
        provider,
        Arc::new(NullSensor),
        Arc::new(SystemClock),
        Arc::new(TextRenderer),
        cache,
        config.panel.timezone,
        windows,
    );

    info!(timezone = %config.panel.timezone, "weather panel starting");

    // Wake, refresh, render, then sleep until the next hour boundary. A
    // cycle without usable time touches nothing and retries in an hour.
    loop {
        let sleep_secs = match service.run_cycle().await {
            Ok(outcome) => outcome.sleep_secs,
            Err(e) => {
                warn!("wake cycle skipped: {e}");
                3600
            }
        };
        tokio::time::sleep(Duration::from_secs(sleep_secs)).await;
    }
}
