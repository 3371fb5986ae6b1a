//! WMO weather interpretation codes, as reported by Open-Meteo in `weather_code`.
//!
//! See: https://open-meteo.com/en/docs#weathervariables

use serde::Serialize;
use std::fmt;

use crate::error::{Result, WeatherError};

/// Condition family derived from a WMO code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeatherCondition {
    /// Clear or mainly clear sky.
    Sunny {
        code: i32,
        description: &'static str,
    },
    /// Drizzle, rain and rain showers, frozen or not.
    Rainy {
        code: i32,
        description: &'static str,
    },
    /// Fog, snow and thunderstorms.
    Cloudy {
        code: i32,
        description: &'static str,
    },
}

impl WeatherCondition {
    /// Map a raw weather code onto its family and description.
    ///
    /// Codes inside a family's range but without their own description
    /// (e.g. 52 or 97) are rejected just like codes outside every range.
    pub fn from_code(code: i32) -> Result<Self> {
        match code {
            0..=3 => sunny(code),
            51..=57 | 61..=67 | 80..=82 => rainy(code),
            45 | 48 | 71..=77 | 85..=86 | 95..=99 => cloudy(code),
            _ => Err(WeatherError::UnknownWeatherCode(code)),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::Sunny { code, .. } | Self::Rainy { code, .. } | Self::Cloudy { code, .. } => {
                *code
            }
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Sunny { description, .. }
            | Self::Rainy { description, .. }
            | Self::Cloudy { description, .. } => description,
        }
    }

    pub fn category(&self) -> &'static str {
        match self {
            Self::Sunny { .. } => "Sunny",
            Self::Rainy { .. } => "Rainy",
            Self::Cloudy { .. } => "Cloudy",
        }
    }

    /// Category followed by description, e.g. "Rainy Rain: Slight intensity".
    pub fn label(&self) -> String {
        format!("{} {}", self.category(), self.description())
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn sunny(code: i32) -> Result<WeatherCondition> {
    let description = match code {
        0 => "Clear sky",
        1..=3 => "Mainly clear",
        _ => return Err(WeatherError::UnknownWeatherCode(code)),
    };
    Ok(WeatherCondition::Sunny { code, description })
}

fn rainy(code: i32) -> Result<WeatherCondition> {
    let description = match code {
        51 => "Drizzle: Light intensity",
        53 => "Drizzle: Moderate intensity",
        55 => "Drizzle: Dense intensity",
        56 => "Freezing Drizzle: Light intensity",
        57 => "Freezing Drizzle: Dense intensity",
        61 => "Rain: Slight intensity",
        63 => "Rain: Moderate intensity",
        65 => "Rain: Heavy intensity",
        66 => "Freezing Rain: Light intensity",
        67 => "Freezing Rain: Heavy intensity",
        80 => "Rain showers: Slight",
        81 => "Rain showers: Moderate",
        82 => "Rain showers: Violent",
        _ => return Err(WeatherError::UnknownWeatherCode(code)),
    };
    Ok(WeatherCondition::Rainy { code, description })
}

fn cloudy(code: i32) -> Result<WeatherCondition> {
    let description = match code {
        45 => "Fog",
        48 => "Depositing rime fog",
        71 => "Snow fall: Slight intensity",
        73 => "Snow fall: Moderate intensity",
        75 => "Snow fall: Heavy intensity",
        77 => "Snow grains",
        85 => "Snow showers slight",
        86 => "Snow showers heavy",
        95 => "Thunderstorm: Slight or moderate",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => return Err(WeatherError::UnknownWeatherCode(code)),
    };
    Ok(WeatherCondition::Cloudy { code, description })
}
