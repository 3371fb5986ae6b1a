//! Wiring: builds data sources, repositories and use cases from a [`Config`].

use std::{path::PathBuf, sync::Arc, time::Duration};

use crate::{
    config::Config,
    error::Result,
    local::{Preferences, PreferencesCityStore},
    presenter::{CitySearchPresenter, CurrentWeatherPresenter, ForecastPresenter, LaunchPresenter},
    remote::{OpenMeteoForecast, OpenMeteoGeocoding, http_client},
    repository::{
        CityRepository, DefaultCityRepository, DefaultWeatherRepository, NetworkRepository,
        TcpNetworkProbe, WeatherRepository,
    },
    usecase::{
        CheckNetworkAvailability, GetCurrentWeather, GetForecast, GetLastSearchedCity,
        SaveLastSearchedCity, SearchCities,
    },
};

const NETWORK_PROBE_TIMEOUT: Duration = Duration::from_secs(3);

/// Everything a front end needs, built once per process.
#[derive(Debug, Clone)]
pub struct AppContext {
    config: Config,
    cities: Arc<dyn CityRepository>,
    weather: Arc<dyn WeatherRepository>,
    network: Arc<dyn NetworkRepository>,
}

impl AppContext {
    /// Build the Open-Meteo backed context, with the city cache at `preferences_path`.
    pub async fn open(config: Config, preferences_path: impl Into<PathBuf>) -> Result<Self> {
        let http = http_client(&config)?;
        let prefs = Arc::new(Preferences::open(preferences_path).await?);

        let cities = DefaultCityRepository::new(
            Arc::new(PreferencesCityStore::new(prefs)),
            Arc::new(OpenMeteoGeocoding::new(http.clone(), &config)),
        );
        let weather =
            DefaultWeatherRepository::new(Arc::new(OpenMeteoForecast::new(http, &config)));
        let network = TcpNetworkProbe::for_url(&config.api.forecast_url, NETWORK_PROBE_TIMEOUT)?;

        Ok(Self::with_repositories(config, Arc::new(cities), Arc::new(weather), Arc::new(network)))
    }

    pub fn with_repositories(
        config: Config,
        cities: Arc<dyn CityRepository>,
        weather: Arc<dyn WeatherRepository>,
        network: Arc<dyn NetworkRepository>,
    ) -> Self {
        Self {
            config,
            cities,
            weather,
            network,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn city_search(&self) -> CitySearchPresenter {
        CitySearchPresenter::new(
            SearchCities::new(self.cities.clone()),
            SaveLastSearchedCity::new(self.cities.clone()),
            &self.config.search,
        )
    }

    pub fn current_weather(&self) -> CurrentWeatherPresenter {
        CurrentWeatherPresenter::new(
            GetCurrentWeather::new(self.weather.clone()),
            GetLastSearchedCity::new(self.cities.clone()),
        )
    }

    pub fn forecast(&self) -> ForecastPresenter {
        ForecastPresenter::new(
            GetForecast::new(self.weather.clone()),
            GetLastSearchedCity::new(self.cities.clone()),
        )
    }

    pub fn launch(&self) -> LaunchPresenter {
        LaunchPresenter::new(
            CheckNetworkAvailability::new(self.network.clone()),
            GetLastSearchedCity::new(self.cities.clone()),
        )
    }
}
