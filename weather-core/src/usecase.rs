//! Single-operation entry points used by the presenters.
//!
//! Each use case runs its repository call on the tokio worker pool and joins
//! back, so a panic inside a repository surfaces as [`WeatherError::Task`]
//! instead of unwinding into the caller. Dropping the returned future aborts
//! the spawned task.

use futures::stream::BoxStream;
use std::{future::Future, sync::Arc};
use tokio_util::task::AbortOnDropHandle;

use crate::{
    error::{Result, WeatherError},
    model::{City, DailyWeather},
    repository::{CityRepository, NetworkRepository, WeatherRepository},
};

async fn run_in_background<T, F>(work: F) -> Result<T>
where
    F: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    match AbortOnDropHandle::new(tokio::spawn(work)).await {
        Ok(result) => result,
        Err(err) => {
            tracing::error!(%err, "use case task did not complete");
            Err(WeatherError::Task(err))
        }
    }
}

#[derive(Debug, Clone)]
pub struct SearchCities {
    cities: Arc<dyn CityRepository>,
}

impl SearchCities {
    pub fn new(cities: Arc<dyn CityRepository>) -> Self {
        Self { cities }
    }

    pub async fn execute(&self, query: String) -> Result<Vec<City>> {
        let cities = self.cities.clone();
        run_in_background(async move { cities.search_cities(&query).await }).await
    }
}

#[derive(Debug, Clone)]
pub struct SaveLastSearchedCity {
    cities: Arc<dyn CityRepository>,
}

impl SaveLastSearchedCity {
    pub fn new(cities: Arc<dyn CityRepository>) -> Self {
        Self { cities }
    }

    pub async fn execute(&self, city: City) -> Result<()> {
        let cities = self.cities.clone();
        run_in_background(async move { cities.save_last_searched_city(&city).await }).await
    }
}

/// Observes the cached city; no background hop needed for a stream.
#[derive(Debug, Clone)]
pub struct GetLastSearchedCity {
    cities: Arc<dyn CityRepository>,
}

impl GetLastSearchedCity {
    pub fn new(cities: Arc<dyn CityRepository>) -> Self {
        Self { cities }
    }

    pub fn execute(&self) -> BoxStream<'static, Option<City>> {
        self.cities.last_searched_city()
    }
}

#[derive(Debug, Clone)]
pub struct GetCurrentWeather {
    weather: Arc<dyn WeatherRepository>,
}

impl GetCurrentWeather {
    pub fn new(weather: Arc<dyn WeatherRepository>) -> Self {
        Self { weather }
    }

    pub async fn execute(&self, city: City) -> Result<DailyWeather> {
        let weather = self.weather.clone();
        run_in_background(async move { weather.current_weather(&city).await }).await
    }
}

#[derive(Debug, Clone)]
pub struct GetForecast {
    weather: Arc<dyn WeatherRepository>,
}

impl GetForecast {
    pub fn new(weather: Arc<dyn WeatherRepository>) -> Self {
        Self { weather }
    }

    pub async fn execute(&self, city: City) -> Result<Vec<DailyWeather>> {
        let weather = self.weather.clone();
        run_in_background(async move { weather.forecast(&city).await }).await
    }
}

#[derive(Debug, Clone)]
pub struct CheckNetworkAvailability {
    network: Arc<dyn NetworkRepository>,
}

impl CheckNetworkAvailability {
    pub fn new(network: Arc<dyn NetworkRepository>) -> Self {
        Self { network }
    }

    pub async fn execute(&self) -> Result<bool> {
        let network = self.network.clone();
        run_in_background(async move { network.is_network_available().await }).await
    }
}
