use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{config::Config, error::Result};

use super::{WeatherRemoteDataSource, get_json};

/// Daily variables requested on every forecast call.
pub const DAILY_VARIABLES: &str = "weather_code,temperature_2m_max,temperature_2m_min,\
apparent_temperature_max,apparent_temperature_min,sunrise,sunset,wind_speed_10m_max,\
wind_direction_10m_dominant";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ForecastResponse {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
    pub generationtime_ms: Option<f64>,
    pub timezone: Option<String>,
    pub timezone_abbreviation: Option<String>,
    pub utc_offset_seconds: Option<i32>,
    pub daily: Option<Daily>,
    pub daily_units: Option<DailyUnits>,
}

/// Parallel arrays, aligned by index to `time`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Daily {
    pub time: Option<Vec<Option<String>>>,
    pub weather_code: Option<Vec<Option<i32>>>,
    pub temperature_2m_max: Option<Vec<Option<f64>>>,
    pub temperature_2m_min: Option<Vec<Option<f64>>>,
    pub apparent_temperature_max: Option<Vec<Option<f64>>>,
    pub apparent_temperature_min: Option<Vec<Option<f64>>>,
    pub sunrise: Option<Vec<Option<String>>>,
    pub sunset: Option<Vec<Option<String>>>,
    pub wind_speed_10m_max: Option<Vec<Option<f64>>>,
    pub wind_direction_10m_dominant: Option<Vec<Option<i32>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyUnits {
    pub time: Option<String>,
    pub weather_code: Option<String>,
    pub temperature_2m_max: Option<String>,
    pub temperature_2m_min: Option<String>,
    pub apparent_temperature_max: Option<String>,
    pub apparent_temperature_min: Option<String>,
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub wind_speed_10m_max: Option<String>,
    pub wind_direction_10m_dominant: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenMeteoForecast {
    http: Client,
    url: String,
    timezone: String,
    temperature_unit: &'static str,
    wind_speed_unit: &'static str,
}

impl OpenMeteoForecast {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            url: config.api.forecast_url.clone(),
            timezone: config.units.timezone.clone(),
            temperature_unit: config.units.temperature.as_str(),
            wind_speed_unit: config.units.wind_speed.as_str(),
        }
    }
}

#[async_trait]
impl WeatherRemoteDataSource for OpenMeteoForecast {
    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<ForecastResponse> {
        tracing::debug!(latitude, longitude, url = %self.url, "fetching forecast");

        let request = self.http.get(&self.url).query(&[
            ("latitude", latitude.to_string().as_str()),
            ("longitude", longitude.to_string().as_str()),
            ("daily", DAILY_VARIABLES),
            ("timezone", self.timezone.as_str()),
            ("temperature_unit", self.temperature_unit),
            ("wind_speed_unit", self.wind_speed_unit),
        ]);

        get_json(request, "forecast").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn daily_variables_cover_every_mapped_field() {
        for var in [
            "weather_code",
            "temperature_2m_max",
            "temperature_2m_min",
            "apparent_temperature_max",
            "apparent_temperature_min",
            "sunrise",
            "sunset",
            "wind_speed_10m_max",
            "wind_direction_10m_dominant",
        ] {
            assert!(DAILY_VARIABLES.split(',').any(|v| v == var), "missing {var}");
        }
    }

    #[test]
    fn nulls_inside_arrays_are_kept() {
        let parsed: ForecastResponse = serde_json::from_str(
            r#"{"daily": {"time": ["2024-01-05", null], "weather_code": [0, null]}}"#,
        )
        .unwrap();

        let daily = parsed.daily.unwrap();
        assert_eq!(daily.weather_code, Some(vec![Some(0), None]));
        assert!(daily.temperature_2m_max.is_none());
        assert!(parsed.daily_units.is_none());
    }
}
