// Google Weather API client - WeatherProvider implementation
use crate::application::provider::WeatherProvider;
use crate::domain::error::PanelError;
use crate::domain::weather::{
    CurrentConditions, DailyForecast, HistoryPoint, HourlyForecastPoint,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

const CONDITIONS_TIMEOUT: Duration = Duration::from_secs(10);
// The hourly payloads are an order of magnitude larger.
const HOURS_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct GoogleWeatherClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    latitude: f64,
    longitude: f64,
    tz: Tz,
}

impl GoogleWeatherClient {
    pub fn new(endpoint: String, api_key: String, latitude: f64, longitude: f64, tz: Tz) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            latitude,
            longitude,
            tz,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        extra: &[(&str, String)],
        timeout: Duration,
    ) -> Result<T, PanelError> {
        let url = format!("{}{}", self.endpoint, path);
        let mut query: Vec<(&str, String)> = vec![
            ("key", self.api_key.clone()),
            ("location.latitude", self.latitude.to_string()),
            ("location.longitude", self.longitude.to_string()),
            ("unitsSystem", "METRIC".to_string()),
        ];
        query.extend_from_slice(extra);

        let response = self
            .client
            .get(&url)
            .query(&query)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| PanelError::FetchFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PanelError::FetchFailed(format!(
                "{path} returned status {status}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| PanelError::DecodeFailed(e.to_string()))
    }

    /// Local "HH:MM" display string and fractional hour for a sun event.
    fn sun_event(&self, raw: Option<&str>) -> (String, f64) {
        let Some(parsed) = raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok()) else {
            return (String::new(), 0.0);
        };
        let local = parsed.with_timezone(&self.tz);
        (
            local.format("%H:%M").to_string(),
            f64::from(local.hour()) + f64::from(local.minute()) / 60.0,
        )
    }
}

#[async_trait]
impl WeatherProvider for GoogleWeatherClient {
    async fn fetch_current(&self) -> Result<CurrentConditions, PanelError> {
        let dto: CurrentResponse = self
            .get_json("/v1/currentConditions:lookup", &[], CONDITIONS_TIMEOUT)
            .await?;

        let condition = dto.weather_condition.unwrap_or_default();
        let wind = dto.wind.unwrap_or_default();
        Ok(CurrentConditions {
            condition_text: condition
                .description
                .and_then(|d| d.text)
                .unwrap_or_default(),
            icon_name: condition
                .icon_base_uri
                .as_deref()
                .map(icon_name_from_uri)
                .unwrap_or_default(),
            temp: dto.temperature.and_then(|d| d.degrees).unwrap_or_default(),
            feels_like: dto
                .feels_like_temperature
                .and_then(|d| d.degrees)
                .unwrap_or_default(),
            wind_speed: wind.speed.and_then(|v| v.value).unwrap_or_default(),
            wind_gust: wind.gust.and_then(|v| v.value).unwrap_or_default(),
            wind_direction: wind
                .direction
                .and_then(|d| d.degrees)
                .map(|d| d.round() as i32)
                .unwrap_or_default(),
            humidity: dto.relative_humidity.unwrap_or_default(),
            precipitation_probability: dto
                .precipitation
                .and_then(|p| p.probability)
                .and_then(|p| p.percent)
                .unwrap_or_default(),
            uv_index: dto.uv_index.unwrap_or_default(),
            pressure: dto
                .air_pressure
                .and_then(|p| p.mean_sea_level_millibars)
                .map(|v| v.round() as i32)
                .unwrap_or_default(),
            indoor_temp: None,
            indoor_humidity: None,
            indoor_pressure: None,
            valid: false,
        })
    }

    async fn fetch_daily(&self, days: usize) -> Result<Vec<DailyForecast>, PanelError> {
        let dto: DailyResponse = self
            .get_json(
                "/v1/forecast/days:lookup",
                &[("days", days.to_string())],
                CONDITIONS_TIMEOUT,
            )
            .await?;

        let forecasts = dto
            .forecast_days
            .into_iter()
            .take(days)
            .map(|day| {
                let condition = day
                    .daytime_forecast
                    .and_then(|f| f.weather_condition)
                    .unwrap_or_default();
                let sun = day.sun_events.unwrap_or_default();
                let (sunrise, sunrise_hour) = self.sun_event(sun.sunrise_time.as_deref());
                let (sunset, sunset_hour) = self.sun_event(sun.sunset_time.as_deref());
                DailyForecast {
                    day_name: day
                        .display_date
                        .and_then(|d| NaiveDate::from_ymd_opt(d.year, d.month, d.day))
                        .map(|d| d.format("%A").to_string())
                        .unwrap_or_default(),
                    icon_name: condition
                        .icon_base_uri
                        .as_deref()
                        .map(icon_name_from_uri)
                        .unwrap_or_default(),
                    condition_text: condition
                        .description
                        .and_then(|d| d.text)
                        .unwrap_or_default(),
                    temp_high: day
                        .max_temperature
                        .and_then(|d| d.degrees)
                        .unwrap_or_default(),
                    temp_low: day
                        .min_temperature
                        .and_then(|d| d.degrees)
                        .unwrap_or_default(),
                    sunrise,
                    sunset,
                    sunrise_hour,
                    sunset_hour,
                }
            })
            .collect();
        Ok(forecasts)
    }

    async fn fetch_hourly_forecast(
        &self,
        hours: u32,
    ) -> Result<Vec<HourlyForecastPoint>, PanelError> {
        let dto: HourlyResponse = self
            .get_json(
                "/v1/forecast/hours:lookup",
                &[("hours", hours.to_string())],
                HOURS_TIMEOUT,
            )
            .await?;

        let mut points = Vec::with_capacity(dto.forecast_hours.len());
        for hour in dto.forecast_hours {
            let Some(time_utc) = parse_start_time(hour.interval.as_ref()) else {
                debug!("skipping forecast hour without a start time");
                continue;
            };
            let Some(temp) = hour.temperature.and_then(|d| d.degrees) else {
                debug!("skipping forecast hour without a temperature");
                continue;
            };
            points.push(HourlyForecastPoint {
                time_utc,
                temp,
                rain_prob: hour
                    .precipitation
                    .and_then(|p| p.probability)
                    .and_then(|p| p.percent)
                    .unwrap_or(0)
                    .clamp(0, 100) as u8,
                pressure: pressure_millibars(hour.pressure, hour.air_pressure),
            });
        }
        Ok(points)
    }

    async fn fetch_history(&self, hours: u32) -> Result<Vec<HistoryPoint>, PanelError> {
        let dto: HistoryResponse = self
            .get_json(
                "/v1/history/hours:lookup",
                &[("hours", hours.to_string())],
                HOURS_TIMEOUT,
            )
            .await?;

        let mut points = Vec::with_capacity(dto.history_hours.len());
        for hour in dto.history_hours {
            let Some(time_utc) = parse_start_time(hour.interval.as_ref()) else {
                debug!("skipping history hour without a start time");
                continue;
            };
            let Some(temp) = hour.temperature.and_then(|d| d.degrees) else {
                debug!("skipping history hour without a temperature");
                continue;
            };
            points.push(HistoryPoint {
                time_utc,
                temp,
                // Dry hours come back without a rainfall field at all.
                rain_mm: hour
                    .precipitation
                    .and_then(|p| p.rainfall_mm)
                    .unwrap_or(0.0),
                pressure: pressure_millibars(hour.pressure, hour.air_pressure),
            });
        }
        Ok(points)
    }
}

/// "https://maps.gstatic.com/weather/v1/partly_clear.png" -> "partly_clear"
fn icon_name_from_uri(uri: &str) -> String {
    let name = uri.rsplit('/').next().unwrap_or(uri);
    name.split('.').next().unwrap_or(name).to_string()
}

fn parse_start_time(interval: Option<&IntervalDto>) -> Option<DateTime<Utc>> {
    let raw = interval?.start_time.as_deref()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|t| t.with_timezone(&Utc))
}

/// The API has served the pressure under either key; take whichever is set.
fn pressure_millibars(
    pressure: Option<PressureDto>,
    air_pressure: Option<PressureDto>,
) -> Option<f64> {
    pressure
        .and_then(|p| p.mean_sea_level_millibars)
        .or_else(|| air_pressure.and_then(|p| p.mean_sea_level_millibars))
}

// Response shapes, filtered down to the fields the panel consumes.

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CurrentResponse {
    weather_condition: Option<ConditionDto>,
    temperature: Option<DegreesDto>,
    feels_like_temperature: Option<DegreesDto>,
    wind: Option<WindDto>,
    relative_humidity: Option<i32>,
    precipitation: Option<PrecipitationDto>,
    uv_index: Option<i32>,
    air_pressure: Option<PressureDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ConditionDto {
    description: Option<TextDto>,
    icon_base_uri: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TextDto {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DegreesDto {
    degrees: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WindDto {
    speed: Option<ValueDto>,
    gust: Option<ValueDto>,
    direction: Option<DegreesDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ValueDto {
    value: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PrecipitationDto {
    probability: Option<ProbabilityDto>,
    #[serde(rename = "rainfallMM")]
    rainfall_mm: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProbabilityDto {
    percent: Option<i32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PressureDto {
    mean_sea_level_millibars: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DailyResponse {
    forecast_days: Vec<ForecastDayDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ForecastDayDto {
    display_date: Option<DateDto>,
    max_temperature: Option<DegreesDto>,
    min_temperature: Option<DegreesDto>,
    daytime_forecast: Option<DaytimeForecastDto>,
    sun_events: Option<SunEventsDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DateDto {
    year: i32,
    month: u32,
    day: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DaytimeForecastDto {
    weather_condition: Option<ConditionDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SunEventsDto {
    sunrise_time: Option<String>,
    sunset_time: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct HourlyResponse {
    forecast_hours: Vec<HourDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct HistoryResponse {
    history_hours: Vec<HourDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct HourDto {
    interval: Option<IntervalDto>,
    temperature: Option<DegreesDto>,
    precipitation: Option<PrecipitationDto>,
    pressure: Option<PressureDto>,
    air_pressure: Option<PressureDto>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct IntervalDto {
    start_time: Option<String>,
}
