//! HTTP data sources backed by the Open-Meteo APIs.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use std::fmt::Debug;

use crate::{
    config::Config,
    error::{Result, WeatherError},
};

pub mod forecast;
pub mod geocoding;

pub use forecast::{Daily, DailyUnits, ForecastResponse, OpenMeteoForecast};
pub use geocoding::{CityResultDto, OpenMeteoGeocoding, SearchCitiesResponse};

const USER_AGENT: &str = concat!("weather-lookup/", env!("CARGO_PKG_VERSION"));

#[async_trait]
pub trait CityRemoteDataSource: Send + Sync + Debug {
    /// Candidate cities matching `query`, exactly as the API returned them.
    async fn search_cities(&self, query: &str) -> Result<Vec<CityResultDto>>;
}

#[async_trait]
pub trait WeatherRemoteDataSource: Send + Sync + Debug {
    async fn forecast(&self, latitude: f64, longitude: f64) -> Result<ForecastResponse>;
}

/// Shared HTTP client for both data sources.
pub fn http_client(config: &Config) -> Result<Client> {
    let client = Client::builder()
        .timeout(config.timeout())
        .user_agent(USER_AGENT)
        .build()?;
    Ok(client)
}

/// Send `request`, reject non-2xx statuses and decode the JSON body.
async fn get_json<T: DeserializeOwned>(request: RequestBuilder, what: &str) -> Result<T> {
    let res = request.send().await?;

    let status = res.status();
    let body = res.text().await?;

    if !status.is_success() {
        tracing::debug!(%status, what, "request failed");
        return Err(WeatherError::status(status, &body));
    }

    let parsed = serde_json::from_str(&body)?;
    Ok(parsed)
}
