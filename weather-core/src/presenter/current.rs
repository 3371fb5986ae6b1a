use futures::StreamExt;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::watch;

use crate::{
    model::{City, DailyWeather},
    usecase::{GetCurrentWeather, GetLastSearchedCity},
};

use super::JobSlot;

pub const NO_LAST_SEARCHED_CITY: &str = "No last searched city";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentWeatherState {
    pub city: Option<City>,
    pub weather: Option<DailyWeather>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl CurrentWeatherState {
    pub fn is_settled(&self) -> bool {
        !self.is_loading && (self.weather.is_some() || self.error.is_some())
    }
}

/// Today's weather for whatever city is cached, following cache changes.
#[derive(Debug)]
pub struct CurrentWeatherPresenter {
    state: Arc<watch::Sender<CurrentWeatherState>>,
    current_weather: GetCurrentWeather,
    last_city: GetLastSearchedCity,
    opened: AtomicBool,
    job: JobSlot,
}

impl CurrentWeatherPresenter {
    pub fn new(current_weather: GetCurrentWeather, last_city: GetLastSearchedCity) -> Self {
        let (state, _) = watch::channel(CurrentWeatherState::default());
        Self {
            state: Arc::new(state),
            current_weather,
            last_city,
            opened: AtomicBool::new(false),
            job: JobSlot::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CurrentWeatherState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> CurrentWeatherState {
        self.state.borrow().clone()
    }

    /// First open starts loading; later calls are ignored.
    pub fn open(&self) {
        if self.opened.swap(true, Ordering::SeqCst) {
            return;
        }
        self.load();
    }

    /// Drop whatever is running and load again.
    pub fn retry(&self) {
        self.opened.store(true, Ordering::SeqCst);
        self.state.send_modify(|s| s.error = None);
        self.load();
    }

    fn load(&self) {
        let state = self.state.clone();
        let current_weather = self.current_weather.clone();
        let mut cities = self.last_city.execute();

        self.job.replace(async move {
            state.send_modify(|s| s.is_loading = true);

            while let Some(city) = cities.next().await {
                let Some(city) = city else {
                    state.send_modify(|s| {
                        s.error = Some(NO_LAST_SEARCHED_CITY.to_string());
                        s.is_loading = false;
                    });
                    continue;
                };

                state.send_modify(|s| {
                    s.city = Some(city.clone());
                    s.is_loading = true;
                });

                match current_weather.execute(city).await {
                    Ok(weather) => state.send_modify(|s| {
                        s.weather = Some(weather);
                        s.error = None;
                        s.is_loading = false;
                    }),
                    Err(err) => state.send_modify(|s| {
                        s.error = Some(err.to_string());
                        s.is_loading = false;
                    }),
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        condition::WeatherCondition,
        error::{Result, WeatherError},
        model::UNIT_UNAVAILABLE,
        repository::{CityRepository, WeatherRepository},
    };
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use futures::stream::BoxStream;
    use std::sync::atomic::AtomicUsize;

    #[derive(Debug)]
    struct CachedCity(Option<City>);

    #[async_trait]
    impl CityRepository for CachedCity {
        async fn search_cities(&self, _name: &str) -> Result<Vec<City>> {
            Ok(vec![])
        }

        fn last_searched_city(&self) -> BoxStream<'static, Option<City>> {
            futures::stream::iter([self.0.clone()]).chain(futures::stream::pending()).boxed()
        }

        async fn save_last_searched_city(&self, _city: &City) -> Result<()> {
            Ok(())
        }
    }

    #[derive(Debug, Default)]
    struct FakeWeather {
        fail: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherRepository for FakeWeather {
        async fn current_weather(&self, _city: &City) -> Result<DailyWeather> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(WeatherError::InvalidResponse);
            }
            Ok(sample_day())
        }

        async fn forecast(&self, _city: &City) -> Result<Vec<DailyWeather>> {
            Ok(vec![sample_day()])
        }
    }

    fn sample_day() -> DailyWeather {
        DailyWeather {
            date: NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            condition: WeatherCondition::from_code(3).unwrap(),
            max_temp: 20.0,
            max_temp_unit: "°C".into(),
            min_temp: 15.0,
            min_temp_unit: "°C".into(),
            max_apparent_temp: None,
            max_apparent_temp_unit: UNIT_UNAVAILABLE.into(),
            min_apparent_temp: None,
            min_apparent_temp_unit: UNIT_UNAVAILABLE.into(),
            max_wind_speed: Some(12.0),
            max_wind_speed_unit: "km/h".into(),
            dominant_wind_direction: None,
            sunrise: None,
            sunset: None,
        }
    }

    fn oslo() -> City {
        City {
            name: "Oslo".into(),
            country: "Norway".into(),
            latitude: 59.9,
            longitude: 10.7,
            id: 5,
        }
    }

    fn presenter(city: Option<City>, weather: Arc<FakeWeather>) -> CurrentWeatherPresenter {
        CurrentWeatherPresenter::new(
            GetCurrentWeather::new(weather),
            GetLastSearchedCity::new(Arc::new(CachedCity(city))),
        )
    }

    async fn settled(presenter: &CurrentWeatherPresenter) -> CurrentWeatherState {
        let mut rx = presenter.subscribe();
        rx.wait_for(CurrentWeatherState::is_settled).await.unwrap().clone()
    }

    #[tokio::test]
    async fn cached_city_weather_is_loaded() {
        let weather = Arc::new(FakeWeather::default());
        let presenter = presenter(Some(oslo()), weather.clone());

        presenter.open();
        let state = settled(&presenter).await;

        assert_eq!(state.city, Some(oslo()));
        assert_eq!(state.weather, Some(sample_day()));
        assert_eq!(state.error, None);
        assert!(!state.is_loading);
    }

    #[tokio::test]
    async fn missing_city_reports_error() {
        let presenter = presenter(None, Arc::new(FakeWeather::default()));

        presenter.open();
        let state = settled(&presenter).await;

        assert_eq!(state.error.as_deref(), Some(NO_LAST_SEARCHED_CITY));
        assert_eq!(state.city, None);
    }

    #[tokio::test]
    async fn failed_fetch_reports_error_message() {
        let weather = Arc::new(FakeWeather {
            fail: true,
            ..Default::default()
        });
        let presenter = presenter(Some(oslo()), weather);

        presenter.open();
        let state = settled(&presenter).await;

        assert_eq!(state.error.as_deref(), Some("Invalid response"));
        assert_eq!(state.weather, None);
    }

    #[tokio::test]
    async fn opening_twice_loads_once() {
        let weather = Arc::new(FakeWeather::default());
        let presenter = presenter(Some(oslo()), weather.clone());

        presenter.open();
        presenter.open();
        settled(&presenter).await;

        assert_eq!(weather.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn retry_fetches_again() {
        let weather = Arc::new(FakeWeather::default());
        let presenter = presenter(Some(oslo()), weather.clone());

        presenter.open();
        settled(&presenter).await;

        presenter.retry();
        let mut rx = presenter.subscribe();
        rx.wait_for(|_| weather.calls.load(Ordering::SeqCst) == 2).await.unwrap();
        settled(&presenter).await;
    }
}
