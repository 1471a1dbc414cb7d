// Weather domain models - snapshots, forecasts and the 24-slot local-day timeline
use chrono::{DateTime, Utc};

/// Slots in the local-day timeline, one per hour.
pub const SLOTS_PER_DAY: usize = 24;

/// Daily forecast entries kept in the persisted record.
pub const DAILY_SLOTS: usize = 5;

/// Current conditions, replaced wholesale on each successful fetch.
/// The indoor triplet is written by the sensor merge, never by a fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentConditions {
    pub condition_text: String,
    pub icon_name: String,
    pub temp: f64,
    pub feels_like: f64,
    pub wind_speed: f64,
    pub wind_gust: f64,
    pub wind_direction: i32,
    pub humidity: i32,
    pub precipitation_probability: i32,
    pub uv_index: i32,
    pub pressure: i32,
    pub indoor_temp: Option<f64>,
    pub indoor_humidity: Option<f64>,
    pub indoor_pressure: Option<f64>,
    pub valid: bool,
}

/// One day of the multi-day outlook. Sunrise/sunset carry both the "HH:MM"
/// display string and the fractional hour used for chart placement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyForecast {
    pub day_name: String,
    pub icon_name: String,
    pub condition_text: String,
    pub temp_high: f64,
    pub temp_low: f64,
    pub sunrise: String,
    pub sunset: String,
    pub sunrise_hour: f64,
    pub sunset_hour: f64,
}

/// One local-hour bucket. Fields are grouped by owner: forecast-owned,
/// observed-owned and indoor-owned; a merge for one group never writes
/// another group's fields. `None` means "no data yet", distinct from zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HourlySlot {
    pub forecast_temp: Option<f64>,
    pub forecast_rain_prob: Option<u8>,
    pub forecast_pressure: Option<f64>,
    pub actual_temp: Option<f64>,
    pub actual_rain_mm: Option<f64>,
    pub actual_pressure: Option<f64>,
    pub indoor_temp: Option<f64>,
    pub indoor_pressure: Option<f64>,
}

impl HourlySlot {
    /// Clear the forecast-owned fields only.
    pub fn clear_forecast(&mut self) {
        self.forecast_temp = None;
        self.forecast_rain_prob = None;
        self.forecast_pressure = None;
    }

    /// True when the slot has neither a forecast nor an observation for its
    /// hour. Used by the cache's validity self-check.
    pub fn has_no_temperature(&self) -> bool {
        self.forecast_temp.is_none() && self.actual_temp.is_none()
    }
}

pub fn empty_day() -> [HourlySlot; SLOTS_PER_DAY] {
    [HourlySlot::default(); SLOTS_PER_DAY]
}

/// One point of the hourly forecast fetch, stamped with its UTC start time.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyForecastPoint {
    pub time_utc: DateTime<Utc>,
    pub temp: f64,
    pub rain_prob: u8,
    pub pressure: Option<f64>,
}

/// One point of the intraday history fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryPoint {
    pub time_utc: DateTime<Utc>,
    pub temp: f64,
    pub rain_mm: f64,
    pub pressure: Option<f64>,
}

/// Snapshot from the on-device sensor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndoorReading {
    pub temp: f64,
    pub humidity: f64,
    pub pressure: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clear_forecast_leaves_other_groups() {
        let mut slot = HourlySlot {
            forecast_temp: Some(21.0),
            forecast_rain_prob: Some(40),
            forecast_pressure: Some(1013.0),
            actual_temp: Some(19.5),
            actual_rain_mm: Some(0.2),
            actual_pressure: Some(1012.0),
            indoor_temp: Some(23.1),
            indoor_pressure: Some(1011.0),
        };
        slot.clear_forecast();
        assert_eq!(slot.forecast_temp, None);
        assert_eq!(slot.forecast_rain_prob, None);
        assert_eq!(slot.forecast_pressure, None);
        assert_eq!(slot.actual_temp, Some(19.5));
        assert_eq!(slot.indoor_temp, Some(23.1));
    }

    #[test]
    fn test_empty_slot_has_no_temperature() {
        assert!(HourlySlot::default().has_no_temperature());
        let observed = HourlySlot {
            actual_temp: Some(18.0),
            ..HourlySlot::default()
        };
        assert!(!observed.has_no_temperature());
    }
}
