//! Wire DTOs to domain models.

use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    condition::WeatherCondition,
    error::{Result, WeatherError},
    format::parse_date,
    model::{City, DailyWeather, UNIT_UNAVAILABLE},
    remote::{CityResultDto, Daily, DailyUnits},
};

const SUN_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// `None` unless the candidate has coordinates, a name and a country.
pub fn city_from_dto(dto: &CityResultDto) -> Option<City> {
    let latitude = dto.latitude?;
    let longitude = dto.longitude?;
    // Blank names render as ", Country" and cannot be picked meaningfully.
    let name = dto.name.as_deref().filter(|n| !n.is_empty())?;
    let country = dto.country.as_deref().filter(|c| !c.is_empty())?;

    Some(City {
        name: name.to_string(),
        country: country.to_string(),
        latitude,
        longitude,
        id: dto.id.unwrap_or(0),
    })
}

/// Values of one forecast day, pulled out of the parallel arrays.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyReading {
    pub date: NaiveDate,
    pub weather_code: i32,
    pub max_temp: f64,
    pub min_temp: f64,
    pub max_apparent_temp: Option<f64>,
    pub min_apparent_temp: Option<f64>,
    pub max_wind_speed: Option<f64>,
    pub dominant_wind_direction: Option<i32>,
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
}

impl DailyReading {
    /// Extract day `index`. Required values missing at that index are an invalid response.
    pub fn at(daily: &Daily, index: usize) -> Result<Self> {
        let date = required(&daily.time, index)?;

        Ok(Self {
            date: parse_date(&date)?,
            weather_code: required(&daily.weather_code, index)?,
            max_temp: required(&daily.temperature_2m_max, index)?,
            min_temp: required(&daily.temperature_2m_min, index)?,
            max_apparent_temp: optional(&daily.apparent_temperature_max, index),
            min_apparent_temp: optional(&daily.apparent_temperature_min, index),
            max_wind_speed: optional(&daily.wind_speed_10m_max, index),
            dominant_wind_direction: optional(&daily.wind_direction_10m_dominant, index),
            sunrise: optional(&daily.sunrise, index).and_then(|s| parse_sun_time(&s)),
            sunset: optional(&daily.sunset, index).and_then(|s| parse_sun_time(&s)),
        })
    }
}

pub fn daily_weather_from_reading(
    reading: DailyReading,
    units: &DailyUnits,
) -> Result<DailyWeather> {
    let condition = WeatherCondition::from_code(reading.weather_code)?;

    Ok(DailyWeather {
        date: reading.date,
        condition,
        max_temp: reading.max_temp,
        max_temp_unit: unit_or_placeholder(&units.temperature_2m_max),
        min_temp: reading.min_temp,
        min_temp_unit: unit_or_placeholder(&units.temperature_2m_min),
        max_apparent_temp: reading.max_apparent_temp,
        max_apparent_temp_unit: unit_or_placeholder(&units.apparent_temperature_max),
        min_apparent_temp: reading.min_apparent_temp,
        min_apparent_temp_unit: unit_or_placeholder(&units.apparent_temperature_min),
        max_wind_speed: reading.max_wind_speed,
        max_wind_speed_unit: unit_or_placeholder(&units.wind_speed_10m_max),
        dominant_wind_direction: reading.dominant_wind_direction,
        sunrise: reading.sunrise,
        sunset: reading.sunset,
    })
}

fn required<T: Clone>(values: &Option<Vec<Option<T>>>, index: usize) -> Result<T> {
    optional(values, index).ok_or(WeatherError::InvalidResponse)
}

fn optional<T: Clone>(values: &Option<Vec<Option<T>>>, index: usize) -> Option<T> {
    values.as_ref()?.get(index)?.clone()
}

fn unit_or_placeholder(unit: &Option<String>) -> String {
    unit.clone().unwrap_or_else(|| UNIT_UNAVAILABLE.to_string())
}

fn parse_sun_time(value: &str) -> Option<NaiveDateTime> {
    match NaiveDateTime::parse_from_str(value, SUN_TIME_FORMAT) {
        Ok(t) => Some(t),
        Err(err) => {
            tracing::debug!(value, %err, "ignoring unparsable sunrise/sunset");
            None
        }
    }
}
