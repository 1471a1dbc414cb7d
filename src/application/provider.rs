// Collaborator contracts consumed by the wake cycle
use crate::domain::error::PanelError;
use crate::domain::weather::{
    CurrentConditions, DailyForecast, HistoryPoint, HourlyForecastPoint, HourlySlot,
    IndoorReading, SLOTS_PER_DAY,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Remote weather source. Implementations return transient decoded values;
/// they never touch persisted state, the cache merges what they return.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn fetch_current(&self) -> Result<CurrentConditions, PanelError>;

    async fn fetch_daily(&self, days: usize) -> Result<Vec<DailyForecast>, PanelError>;

    /// Hourly forecast points for the next `hours` hours, UTC-stamped.
    async fn fetch_hourly_forecast(
        &self,
        hours: u32,
    ) -> Result<Vec<HourlyForecastPoint>, PanelError>;

    /// Observed hourly points for the last `hours` hours, UTC-stamped.
    async fn fetch_history(&self, hours: u32) -> Result<Vec<HistoryPoint>, PanelError>;
}

/// On-device temperature/humidity/pressure sensor.
pub trait IndoorSensor: Send + Sync {
    fn read(&self) -> Result<IndoorReading, PanelError>;
}

/// Source of wall-clock time. Fails with `TimeUnavailable` until time sync
/// has been established, which skips the whole cycle.
pub trait TimeSource: Send + Sync {
    fn now_utc(&self) -> Result<DateTime<Utc>, PanelError>;
}

/// Read-only view of the merged in-memory state, handed to the renderer
/// strictly after all merges for the cycle have completed.
pub struct DashboardView<'a> {
    pub current: &'a CurrentConditions,
    pub daily: &'a [DailyForecast],
    pub hourly: &'a [HourlySlot; SLOTS_PER_DAY],
}

/// Turns the merged snapshot into pixels (or any other surface). Fields
/// that are `None` mean "no data, do not plot".
pub trait DashboardRenderer: Send + Sync {
    fn render(&self, view: &DashboardView<'_>) -> Result<(), PanelError>;
}
