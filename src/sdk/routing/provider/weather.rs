use super::types::ForecastResponse;
use super::{build_client, endpoint, fetch_json};
use crate::sdk::config::MapConfig;
use crate::sdk::routing::error::GeoError;
use crate::sdk::routing::service::WeatherProvider;
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

const WEATHER_TIMEOUT: Duration = Duration::from_secs(5);
const DAILY_FIELDS: &str =
    "weathercode,temperature_2m_max,temperature_2m_min,precipitation_probability_max";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Weather {
    pub temperature_c: f64,
    pub weather_code: u16,
    pub description: &'static str,
}

/// One day of the week-ahead forecast. Dates are local to the location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyForecast {
    pub date: String,
    pub weather_code: Option<u16>,
    pub description: &'static str,
    pub max_c: Option<f64>,
    pub min_c: Option<f64>,
    pub precipitation_probability: Option<u8>,
}

/// Current conditions and the daily forecast from Open-Meteo.
pub struct WeatherClient {
    client: Client,
    base_url: String,
}

impl WeatherClient {
    pub fn new(config: &MapConfig) -> Result<Self, GeoError> {
        Ok(Self {
            client: build_client(&config.user_agent, WEATHER_TIMEOUT)?,
            base_url: config.weather_url.clone(),
        })
    }

    async fn fetch(
        &self,
        lat: f64,
        lon: f64,
        extra: &[(&str, &str)],
    ) -> Result<ForecastResponse, GeoError> {
        let url = endpoint(&self.base_url, "v1/forecast");
        let request = self
            .client
            .get(&url)
            .query(&[("latitude", lat.to_string()), ("longitude", lon.to_string())])
            .query(extra);
        fetch_json(request, "Open-Meteo").await
    }
}

#[async_trait]
impl WeatherProvider for WeatherClient {
    async fn current_weather(&self, lat: f64, lon: f64) -> Result<Weather, GeoError> {
        log::debug!("[PROVIDER] Open-Meteo current weather for ({}, {})", lat, lon);
        let forecast = self.fetch(lat, lon, &[("current_weather", "true")]).await?;
        let current = forecast
            .current_weather
            .ok_or_else(|| GeoError::Malformed("no current_weather block".to_string()))?;
        Ok(Weather {
            temperature_c: current.temperature,
            weather_code: current.weathercode,
            description: describe_weather_code(current.weathercode),
        })
    }

    async fn forecast(&self, lat: f64, lon: f64) -> Result<Vec<DailyForecast>, GeoError> {
        log::debug!("[PROVIDER] Open-Meteo daily forecast for ({}, {})", lat, lon);
        let forecast = self
            .fetch(lat, lon, &[("daily", DAILY_FIELDS), ("timezone", "auto")])
            .await?;
        let daily = forecast
            .daily
            .ok_or_else(|| GeoError::Malformed("no daily block".to_string()))?;
        Ok(daily.into_days())
    }
}

/// WMO weather interpretation code to text.
pub fn describe_weather_code(code: u16) -> &'static str {
    match code {
        0 => "Clear sky",
        1..=3 => "Partly cloudy",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        56 | 57 => "Freezing drizzle",
        61 | 63 | 65 => "Rain",
        66 | 67 => "Freezing rain",
        71 | 73 | 75 => "Snow",
        77 => "Snow grains",
        80..=82 => "Rain showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        _ => "Unknown",
    }
}
