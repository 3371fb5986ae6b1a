use async_trait::async_trait;
use std::sync::Arc;

use crate::{
    error::{Result, WeatherError},
    mapper::{DailyReading, daily_weather_from_reading},
    model::{City, DailyWeather},
    remote::{Daily, DailyUnits, ForecastResponse, WeatherRemoteDataSource},
};

use super::WeatherRepository;

#[derive(Debug, Clone)]
pub struct DefaultWeatherRepository {
    remote: Arc<dyn WeatherRemoteDataSource>,
}

impl DefaultWeatherRepository {
    pub fn new(remote: Arc<dyn WeatherRemoteDataSource>) -> Self {
        Self { remote }
    }

    async fn fetch(&self, city: &City) -> Result<(Daily, DailyUnits)> {
        let response = self.remote.forecast(city.latitude, city.longitude).await?;
        validated(response)
    }
}

/// The first day must carry a code, both temperatures and a date, and units must be present.
fn validated(response: ForecastResponse) -> Result<(Daily, DailyUnits)> {
    let (Some(daily), Some(units)) = (response.daily, response.daily_units) else {
        return Err(WeatherError::InvalidResponse);
    };

    let complete = has_first(&daily.weather_code)
        && has_first(&daily.temperature_2m_max)
        && has_first(&daily.temperature_2m_min)
        && has_first(&daily.time);

    if !complete {
        return Err(WeatherError::InvalidResponse);
    }

    Ok((daily, units))
}

fn has_first<T>(values: &Option<Vec<Option<T>>>) -> bool {
    matches!(values.as_deref().and_then(<[_]>::first), Some(Some(_)))
}

#[async_trait]
impl WeatherRepository for DefaultWeatherRepository {
    async fn current_weather(&self, city: &City) -> Result<DailyWeather> {
        let (daily, units) = self.fetch(city).await?;
        daily_weather_from_reading(DailyReading::at(&daily, 0)?, &units)
    }

    async fn forecast(&self, city: &City) -> Result<Vec<DailyWeather>> {
        let (daily, units) = self.fetch(city).await?;
        let days = daily.weather_code.as_ref().map_or(0, Vec::len);

        let forecast = (0..days)
            .map(|index| daily_weather_from_reading(DailyReading::at(&daily, index)?, &units))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(city = %city.display_name(), days = forecast.len(), "mapped forecast");
        Ok(forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug)]
    struct FakeRemote {
        response: ForecastResponse,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherRemoteDataSource for FakeRemote {
        async fn forecast(&self, latitude: f64, longitude: f64) -> Result<ForecastResponse> {
            assert_eq!((latitude, longitude), (51.5074, -0.1278));
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }
    }

    fn london() -> City {
        City {
            name: "London".into(),
            country: "UK".into(),
            latitude: 51.5074,
            longitude: -0.1278,
            id: 1,
        }
    }

    fn two_days() -> ForecastResponse {
        ForecastResponse {
            daily: Some(Daily {
                time: Some(vec![Some("2024-01-05".into()), Some("2024-01-06".into())]),
                weather_code: Some(vec![Some(0), Some(61)]),
                temperature_2m_max: Some(vec![Some(20.0), Some(18.0)]),
                temperature_2m_min: Some(vec![Some(15.0), Some(12.0)]),
                apparent_temperature_max: Some(vec![Some(22.0), Some(17.0)]),
                ..Default::default()
            }),
            daily_units: Some(DailyUnits {
                temperature_2m_max: Some("°C".into()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn repo(response: ForecastResponse) -> (Arc<FakeRemote>, DefaultWeatherRepository) {
        let remote = Arc::new(FakeRemote {
            response,
            calls: AtomicUsize::new(0),
        });
        (remote.clone(), DefaultWeatherRepository::new(remote))
    }

    #[tokio::test]
    async fn current_weather_maps_first_day() {
        let (remote, repo) = repo(two_days());

        let today = repo.current_weather(&london()).await.unwrap();

        assert_eq!(today.max_temp, 20.0);
        assert_eq!(today.min_temp, 15.0);
        assert_eq!(today.condition.label(), "Sunny Clear sky");
        assert_eq!(today.max_temp_unit, "°C");
        assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn forecast_maps_every_day_in_order() {
        let (_, repo) = repo(two_days());

        let days = repo.forecast(&london()).await.unwrap();

        assert_eq!(days.len(), 2);
        assert_eq!(days[1].condition.label(), "Rainy Rain: Slight intensity");
        assert_eq!(days[1].max_apparent_temp, Some(17.0));
        assert!(days[0].date < days[1].date);
    }

    #[tokio::test]
    async fn missing_daily_block_is_invalid() {
        let (_, repo) = repo(ForecastResponse {
            daily: None,
            ..two_days()
        });

        let err = repo.current_weather(&london()).await.unwrap_err();
        assert!(matches!(err, WeatherError::InvalidResponse));
        assert_eq!(err.to_string(), "Invalid response");
    }

    #[tokio::test]
    async fn missing_units_are_invalid() {
        let (_, repo) = repo(ForecastResponse {
            daily_units: None,
            ..two_days()
        });
        assert!(matches!(
            repo.forecast(&london()).await,
            Err(WeatherError::InvalidResponse)
        ));
    }

    #[tokio::test]
    async fn null_first_code_is_invalid() {
        let mut response = two_days();
        if let Some(daily) = response.daily.as_mut() {
            daily.weather_code = Some(vec![None, Some(61)]);
        }
        let (_, repo) = repo(response);

        assert!(matches!(
            repo.current_weather(&london()).await,
            Err(WeatherError::InvalidResponse)
        ));
    }

    #[tokio::test]
    async fn short_parallel_array_fails_forecast() {
        let mut response = two_days();
        if let Some(daily) = response.daily.as_mut() {
            daily.temperature_2m_min = Some(vec![Some(15.0)]);
        }
        let (_, repo) = repo(response);

        assert!(repo.current_weather(&london()).await.is_ok());
        assert!(matches!(repo.forecast(&london()).await, Err(WeatherError::InvalidResponse)));
    }
}
