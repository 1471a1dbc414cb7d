// Text renderer - logs the dashboard instead of driving a panel
use crate::application::provider::{DashboardRenderer, DashboardView};
use crate::domain::error::PanelError;
use crate::domain::weather::{HourlySlot, SLOTS_PER_DAY};
use tracing::info;

/// Renders the merged snapshot as log lines, mirroring the panel layout:
/// current-conditions row, three-day outlook, hourly chart coverage. The
/// pixel renderer is an external collaborator; this keeps headless builds
/// and development observable.
pub struct TextRenderer;

/// Slots with forecast, observed and indoor data respectively.
fn coverage(hourly: &[HourlySlot; SLOTS_PER_DAY]) -> (usize, usize, usize) {
    let forecast = hourly.iter().filter(|s| s.forecast_temp.is_some()).count();
    let observed = hourly.iter().filter(|s| s.actual_temp.is_some()).count();
    let indoor = hourly.iter().filter(|s| s.indoor_temp.is_some()).count();
    (forecast, observed, indoor)
}

impl DashboardRenderer for TextRenderer {
    fn render(&self, view: &DashboardView<'_>) -> Result<(), PanelError> {
        let current = view.current;
        if !current.valid {
            info!("no weather data yet");
            return Ok(());
        }

        info!(
            "{} | {:.1}°C (feels {:.1}°C) | wind {:.0} km/h gust {:.0} at {}° | \
             humidity {}% | rain {}% | UV {} | {} hPa",
            current.condition_text,
            current.temp,
            current.feels_like,
            current.wind_speed,
            current.wind_gust,
            current.wind_direction,
            current.humidity,
            current.precipitation_probability,
            current.uv_index,
            current.pressure,
        );
        if let (Some(temp), Some(pressure)) = (current.indoor_temp, current.indoor_pressure) {
            info!("indoor | {:.1}°C | {:.0} hPa", temp, pressure);
        }

        for day in view.daily.iter().take(3) {
            info!(
                "{:<10} {} | {:.1}°C / {:.1}°C | sunrise {} sunset {}",
                day.day_name, day.condition_text, day.temp_high, day.temp_low, day.sunrise,
                day.sunset,
            );
        }

        let (forecast, observed, indoor) = coverage(view.hourly);
        info!(
            "hourly coverage | forecast {forecast}/{SLOTS_PER_DAY} | \
             observed {observed}/{SLOTS_PER_DAY} | indoor {indoor}/{SLOTS_PER_DAY}"
        );
        Ok(())
    }
}
