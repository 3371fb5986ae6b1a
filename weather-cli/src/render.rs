//! Plain-text output for the terminal.

use std::fmt::Write;

use weather_core::{
    City, DailyWeather,
    format::{compass_point, format_temperature, format_weekday_month},
};

pub fn cities(cities: &[City]) -> String {
    if cities.is_empty() {
        return "No cities found.\n".to_string();
    }

    let mut out = String::new();
    for (i, city) in cities.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>2}. {} ({:.2}, {:.2})",
            i + 1,
            city.display_name(),
            city.latitude,
            city.longitude
        );
    }
    out
}

pub fn current(city: &City, day: &DailyWeather) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", city.display_name());
    let _ = writeln!(out, "{}", format_weekday_month(day.date));
    let _ = writeln!(out, "  {}", day.condition.label());
    let _ = writeln!(
        out,
        "  High {} / Low {}",
        format_temperature(day.max_temp, &day.max_temp_unit),
        format_temperature(day.min_temp, &day.min_temp_unit)
    );

    if let (Some(max), Some(min)) = (day.max_apparent_temp, day.min_apparent_temp) {
        let _ = writeln!(
            out,
            "  Feels like {} / {}",
            format_temperature(max, &day.max_apparent_temp_unit),
            format_temperature(min, &day.min_apparent_temp_unit)
        );
    }

    if let Some(line) = wind(day) {
        let _ = writeln!(out, "  Wind {line}");
    }

    if let (Some(rise), Some(set)) = (day.sunrise, day.sunset) {
        let _ = writeln!(
            out,
            "  Sunrise {} / Sunset {}",
            rise.format("%H:%M"),
            set.format("%H:%M")
        );
    }
    out
}

pub fn forecast(city: &City, days: &[DailyWeather]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", city.display_name());

    for day in days {
        let _ = write!(
            out,
            "  {:<20} {:>10} / {:<10} {}",
            format_weekday_month(day.date),
            format_temperature(day.max_temp, &day.max_temp_unit),
            format_temperature(day.min_temp, &day.min_temp_unit),
            day.condition.label()
        );
        if let Some(line) = wind(day) {
            let _ = write!(out, ", wind {line}");
        }
        out.push('\n');
    }
    out
}

fn wind(day: &DailyWeather) -> Option<String> {
    let speed = day.max_wind_speed?;
    Some(match day.dominant_wind_direction {
        Some(deg) => format!("{speed:.0} {} {}", day.max_wind_speed_unit, compass_point(deg)),
        None => format!("{speed:.0} {}", day.max_wind_speed_unit),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use weather_core::{WeatherCondition, model::UNIT_UNAVAILABLE};

    fn paris() -> City {
        City {
            name: "Paris".into(),
            country: "France".into(),
            latitude: 48.85341,
            longitude: 2.3488,
            id: 2988507,
        }
    }

    fn day() -> DailyWeather {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        DailyWeather {
            date,
            condition: WeatherCondition::from_code(0).unwrap(),
            max_temp: 8.04,
            max_temp_unit: "°C".into(),
            min_temp: 1.5,
            min_temp_unit: "°C".into(),
            max_apparent_temp: Some(5.2),
            max_apparent_temp_unit: "°C".into(),
            min_apparent_temp: Some(-2.0),
            min_apparent_temp_unit: "°C".into(),
            max_wind_speed: Some(14.6),
            max_wind_speed_unit: "km/h".into(),
            dominant_wind_direction: Some(225),
            sunrise: date.and_hms_opt(8, 41, 0),
            sunset: date.and_hms_opt(17, 21, 0),
        }
    }

    #[test]
    fn city_list_is_numbered_from_one() {
        let out = cities(&[paris()]);
        assert_eq!(out, " 1. Paris, France (48.85, 2.35)\n");
        assert_eq!(cities(&[]), "No cities found.\n");
    }

    #[test]
    fn current_weather_shows_all_known_fields() {
        let out = current(&paris(), &day());

        assert!(out.starts_with("Paris, France\nMonday, Jan 15\n"));
        assert!(out.contains("Sunny Clear sky"));
        assert!(out.contains("High 8.0 °C / Low 1.5 °C"));
        assert!(out.contains("Feels like 5.2 °C / -2.0 °C"));
        assert!(out.contains("Wind 15 km/h SW"));
        assert!(out.contains("Sunrise 08:41 / Sunset 17:21"));
    }

    #[test]
    fn missing_optional_fields_are_skipped() {
        let mut sparse = day();
        sparse.max_apparent_temp = None;
        sparse.max_apparent_temp_unit = UNIT_UNAVAILABLE.into();
        sparse.max_wind_speed = None;
        sparse.sunrise = None;

        let out = current(&paris(), &sparse);
        assert!(!out.contains("Feels like"));
        assert!(!out.contains("Wind"));
        assert!(!out.contains("Sunrise"));
    }

    #[test]
    fn forecast_has_one_line_per_day() {
        let mut second = day();
        second.date = NaiveDate::from_ymd_opt(2024, 1, 16).unwrap();
        second.dominant_wind_direction = None;

        let out = forecast(&paris(), &[day(), second]);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Monday, Jan 15"));
        assert!(lines[1].ends_with("Sunny Clear sky, wind 15 km/h SW"));
        assert!(lines[2].contains("Tuesday, Jan 16"));
        assert!(lines[2].ends_with("wind 15 km/h"));
    }
}
