//! Repositories combine remote sources with the local cache and hand out domain models.

use async_trait::async_trait;
use futures::stream::BoxStream;
use std::fmt::Debug;

use crate::{
    error::Result,
    model::{City, DailyWeather},
};

pub mod city;
pub mod network;
pub mod weather;

pub use city::DefaultCityRepository;
pub use network::TcpNetworkProbe;
pub use weather::DefaultWeatherRepository;

#[async_trait]
pub trait CityRepository: Send + Sync + Debug {
    /// Valid cities matching `name`; invalid candidates are dropped.
    async fn search_cities(&self, name: &str) -> Result<Vec<City>>;

    fn last_searched_city(&self) -> BoxStream<'static, Option<City>>;

    async fn save_last_searched_city(&self, city: &City) -> Result<()>;
}

#[async_trait]
pub trait WeatherRepository: Send + Sync + Debug {
    /// Today's weather for `city`.
    async fn current_weather(&self, city: &City) -> Result<DailyWeather>;

    /// Every day the forecast API returns for `city`, in order.
    async fn forecast(&self, city: &City) -> Result<Vec<DailyWeather>>;
}

#[async_trait]
pub trait NetworkRepository: Send + Sync + Debug {
    async fn is_network_available(&self) -> Result<bool>;
}
