// Refresh service - one wake cycle: classify, fetch, merge, render
use crate::application::cache::WeatherCache;
use crate::application::provider::{DashboardRenderer, IndoorSensor, TimeSource, WeatherProvider};
use crate::domain::category::{CategorySet, DataCategory};
use crate::domain::clock::{seconds_until_next_hour, LogicalClock};
use crate::domain::error::PanelError;
use chrono_tz::Tz;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fetch windows for the hour-scoped categories.
#[derive(Debug, Clone, Copy)]
pub struct FetchWindows {
    pub forecast_days: usize,
    pub hours_ahead: u32,
    pub history_hours: u32,
}

/// Summary of one wake cycle, for logging and the sleep scheduler.
#[derive(Debug, Clone, Copy)]
pub struct CycleOutcome {
    pub stale: CategorySet,
    pub fetched: CategorySet,
    pub sleep_secs: u64,
}

pub struct RefreshService {
    provider: Arc<dyn WeatherProvider>,
    sensor: Arc<dyn IndoorSensor>,
    time: Arc<dyn TimeSource>,
    renderer: Arc<dyn DashboardRenderer>,
    cache: WeatherCache,
    tz: Tz,
    windows: FetchWindows,
}

impl RefreshService {
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        sensor: Arc<dyn IndoorSensor>,
        time: Arc<dyn TimeSource>,
        renderer: Arc<dyn DashboardRenderer>,
        cache: WeatherCache,
        tz: Tz,
        windows: FetchWindows,
    ) -> Self {
        Self {
            provider,
            sensor,
            time,
            renderer,
            cache,
            tz,
            windows,
        }
    }

    /// Run one wake cycle. Fails only with `TimeUnavailable` (no usable
    /// clock means the cache must not be consulted at all); every other
    /// failure degrades a single category and the cycle carries on to
    /// render whatever is in memory.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome, PanelError> {
        let now = self.time.now_utc()?;
        let local = now.with_timezone(&self.tz);
        let clock = LogicalClock::from_local(&local);

        let stale = self.cache.load_and_classify(clock);
        info!(
            day = clock.day_of_year,
            hour = clock.hour_of_day,
            stale = %stale,
            "wake cycle started"
        );

        let mut fetched = CategorySet::EMPTY;
        if stale.is_empty() {
            debug!("all categories still fresh, nothing to fetch");
        }
        for category in stale.iter() {
            if self.refresh_category(category, clock).await {
                fetched.insert(category);
            }
        }

        // The sensor read rides along on every wake, stale or not.
        match self.sensor.read() {
            Ok(reading) => {
                debug!(temp = reading.temp, "indoor sensor read");
                if let Err(e) = self.cache.merge_indoor(clock, reading) {
                    warn!("indoor merge failed: {e}");
                }
            }
            Err(e) => debug!("indoor sensor skipped: {e}"),
        }

        // Render strictly after all merges for the cycle have completed.
        if let Err(e) = self.renderer.render(&self.cache.view()) {
            warn!("render failed: {e}");
        }

        let outcome = CycleOutcome {
            stale,
            fetched,
            sleep_secs: seconds_until_next_hour(&local),
        };
        info!(
            fetched = %fetched,
            missed = %stale.difference(fetched),
            sleep_secs = outcome.sleep_secs,
            "wake cycle finished"
        );
        Ok(outcome)
    }

    /// Fetch and merge one stale category. Returns whether it succeeded; a
    /// failure of any kind leaves the category's state exactly as it was.
    async fn refresh_category(&mut self, category: DataCategory, clock: LogicalClock) -> bool {
        let result = match category {
            DataCategory::Current => match self.provider.fetch_current().await {
                Ok(payload) => self.cache.merge_current(clock, payload),
                Err(e) => Err(e),
            },
            DataCategory::Daily => {
                match self.provider.fetch_daily(self.windows.forecast_days).await {
                    Ok(days) => self.cache.merge_daily(clock, days),
                    Err(e) => Err(e),
                }
            }
            DataCategory::HourlyForecast => {
                match self
                    .provider
                    .fetch_hourly_forecast(self.windows.hours_ahead)
                    .await
                {
                    Ok(points) => self.cache.merge_hourly_forecast(clock, &points),
                    Err(e) => Err(e),
                }
            }
            DataCategory::History => {
                match self.provider.fetch_history(self.windows.history_hours).await {
                    Ok(points) => self.cache.merge_history(clock, &points),
                    Err(e) => Err(e),
                }
            }
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                warn!(?category, "refresh failed, keeping previous state: {e}");
                false
            }
        }
    }
}
