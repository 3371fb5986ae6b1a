use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{config::Config, error::Result};

use super::{CityRemoteDataSource, get_json};

/// One geocoding candidate. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CityResultDto {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub elevation: Option<f64>,
    pub feature_code: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
    pub country_id: Option<i64>,
    pub admin1: Option<String>,
    pub admin1_id: Option<i64>,
    pub admin2: Option<String>,
    pub admin2_id: Option<i64>,
    pub admin3: Option<String>,
    pub admin3_id: Option<i64>,
    pub admin4: Option<String>,
    pub admin4_id: Option<i64>,
    pub timezone: Option<String>,
    pub population: Option<i64>,
    pub postcodes: Option<Vec<Option<String>>>,
}

#[derive(Debug, Deserialize)]
pub struct SearchCitiesResponse {
    /// Absent when nothing matched.
    #[serde(default)]
    pub results: Vec<CityResultDto>,
}

#[derive(Debug, Clone)]
pub struct OpenMeteoGeocoding {
    http: Client,
    search_url: String,
    count: u32,
}

impl OpenMeteoGeocoding {
    pub fn new(http: Client, config: &Config) -> Self {
        Self {
            http,
            search_url: format!("{}/search", config.api.geocoding_url.trim_end_matches('/')),
            count: config.search.result_count,
        }
    }
}

#[async_trait]
impl CityRemoteDataSource for OpenMeteoGeocoding {
    async fn search_cities(&self, query: &str) -> Result<Vec<CityResultDto>> {
        tracing::debug!(query, url = %self.search_url, "searching cities");

        let count = self.count.to_string();
        let request = self
            .http
            .get(&self.search_url)
            .query(&[("name", query), ("count", count.as_str())]);

        let parsed: SearchCitiesResponse = get_json(request, "geocoding search").await?;
        Ok(parsed.results)
    }
}
