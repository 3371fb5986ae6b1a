use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::condition::WeatherCondition;

/// Placeholder used when the API omits a unit string.
pub const UNIT_UNAVAILABLE: &str = "Unit Unavailable";

/// A geocoded city. Only cities with coordinates, a name and a country exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub id: i64,
}

impl City {
    /// "London, United Kingdom"
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }
}

/// One day of forecast data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyWeather {
    pub date: NaiveDate,
    pub condition: WeatherCondition,
    pub max_temp: f64,
    pub max_temp_unit: String,
    pub min_temp: f64,
    pub min_temp_unit: String,
    pub max_apparent_temp: Option<f64>,
    pub max_apparent_temp_unit: String,
    pub min_apparent_temp: Option<f64>,
    pub min_apparent_temp_unit: String,
    pub max_wind_speed: Option<f64>,
    pub max_wind_speed_unit: String,
    /// Degrees, meteorological convention (0 = from north).
    pub dominant_wind_direction: Option<i32>,
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
}
