//! Temperature conversions and date helpers used when presenting forecasts.

use chrono::NaiveDate;

use crate::error::{Result, WeatherError};

const DATE_FORMAT: &str = "%Y-%m-%d";
const WEEKDAY_MONTH_FORMAT: &str = "%A, %b %-d";

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + 273.15
}

pub fn kelvin_to_celsius(kelvin: f64) -> f64 {
    kelvin - 273.15
}

/// One decimal place followed by the unit, e.g. "21.5 °C".
pub fn format_temperature(value: f64, unit: &str) -> String {
    format!("{value:.1} {unit}")
}

/// Parse an API date such as "2024-01-15".
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map_err(|source| WeatherError::Date {
            value: value.to_string(),
            source,
        })
}

/// "Monday, Jan 15"
pub fn format_weekday_month(date: NaiveDate) -> String {
    date.format(WEEKDAY_MONTH_FORMAT).to_string()
}

/// Sixteen-point compass name for a direction in degrees.
pub fn compass_point(degrees: i32) -> &'static str {
    const POINTS: [&str; 16] = [
        "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW",
        "NW", "NNW",
    ];
    let normalized = f64::from(degrees.rem_euclid(360));
    let index = ((normalized / 22.5).round() as usize) % POINTS.len();
    POINTS[index]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn temperature_conversions() {
        assert!(approx(celsius_to_fahrenheit(0.0), 32.0));
        assert!(approx(celsius_to_fahrenheit(100.0), 212.0));
        assert!(approx(fahrenheit_to_celsius(-40.0), -40.0));
        assert!(approx(celsius_to_kelvin(0.0), 273.15));
        assert!(approx(kelvin_to_celsius(273.15), 0.0));
    }

    #[test]
    fn temperature_formatting_rounds_to_one_decimal() {
        assert_eq!(format_temperature(21.46, "°C"), "21.5 °C");
        assert_eq!(format_temperature(-3.0, "°F"), "-3.0 °F");
    }

    #[test]
    fn parses_api_dates() {
        assert_eq!(
            parse_date("2024-01-15").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("15.01.2024").is_err());
    }

    #[test]
    fn formats_weekday_and_month() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(format_weekday_month(date), "Monday, Jan 15");
    }

    #[test]
    fn compass_points_wrap_around() {
        assert_eq!(compass_point(0), "N");
        assert_eq!(compass_point(90), "E");
        assert_eq!(compass_point(350), "N");
        assert_eq!(compass_point(-90), "W");
        assert_eq!(compass_point(202), "SSW");
    }
}
