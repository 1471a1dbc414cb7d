// Panel configuration loaded from config/panel.toml
use crate::domain::weather::DAILY_SLOTS;
use chrono_tz::Tz;
use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct PanelConfig {
    pub api: ApiSettings,
    pub location: LocationSettings,
    pub panel: PanelSettings,
    pub storage: StorageSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    pub key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocationSettings {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PanelSettings {
    /// IANA zone the device displays in; all hourly bucketing uses it.
    pub timezone: Tz,
    #[serde(default = "default_forecast_days")]
    pub forecast_days: usize,
    #[serde(default = "default_hours_ahead")]
    pub hours_ahead: u32,
    #[serde(default = "default_history_hours")]
    pub history_hours: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub dir: PathBuf,
}

fn default_endpoint() -> String {
    "https://weather.googleapis.com".to_string()
}

fn default_forecast_days() -> usize {
    DAILY_SLOTS
}

fn default_hours_ahead() -> u32 {
    24
}

fn default_history_hours() -> u32 {
    24
}

pub fn load_panel_config() -> anyhow::Result<PanelConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/panel"))
        .build()?;

    let mut panel_config: PanelConfig = settings.try_deserialize()?;
    // The persisted record holds a fixed number of daily entries.
    panel_config.panel.forecast_days = panel_config.panel.forecast_days.min(DAILY_SLOTS);
    Ok(panel_config)
}
