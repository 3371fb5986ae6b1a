use async_trait::async_trait;
use futures::stream::BoxStream;
use std::sync::Arc;

use crate::{
    error::Result,
    local::CityLocalDataSource,
    mapper::city_from_dto,
    model::City,
    remote::CityRemoteDataSource,
};

use super::CityRepository;

#[derive(Debug, Clone)]
pub struct DefaultCityRepository {
    local: Arc<dyn CityLocalDataSource>,
    remote: Arc<dyn CityRemoteDataSource>,
}

impl DefaultCityRepository {
    pub fn new(local: Arc<dyn CityLocalDataSource>, remote: Arc<dyn CityRemoteDataSource>) -> Self {
        Self { local, remote }
    }
}

#[async_trait]
impl CityRepository for DefaultCityRepository {
    async fn search_cities(&self, name: &str) -> Result<Vec<City>> {
        let candidates = self.remote.search_cities(name).await?;
        let total = candidates.len();

        let cities: Vec<City> = candidates.iter().filter_map(city_from_dto).collect();
        if cities.len() < total {
            tracing::debug!(dropped = total - cities.len(), "dropped incomplete city candidates");
        }

        Ok(cities)
    }

    fn last_searched_city(&self) -> BoxStream<'static, Option<City>> {
        self.local.last_searched_city()
    }

    async fn save_last_searched_city(&self, city: &City) -> Result<()> {
        self.local.save_city(city).await
    }
}
