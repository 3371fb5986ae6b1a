use futures::StreamExt;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use tokio::sync::watch;

use crate::{
    model::{City, DailyWeather},
    usecase::{GetForecast, GetLastSearchedCity},
};

use super::JobSlot;

pub const NO_CITY_FOUND: &str = "No city found";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastIntent {
    ScreenOpened,
    Retry,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastState {
    pub forecasts: Vec<DailyWeather>,
    pub is_loading: bool,
    pub error: Option<String>,
    pub city: Option<City>,
}

impl ForecastState {
    pub fn is_settled(&self) -> bool {
        !self.is_loading && (!self.forecasts.is_empty() || self.error.is_some())
    }
}

#[derive(Debug)]
pub struct ForecastPresenter {
    state: Arc<watch::Sender<ForecastState>>,
    forecast: GetForecast,
    last_city: GetLastSearchedCity,
    opened: AtomicBool,
    job: JobSlot,
}

impl ForecastPresenter {
    pub fn new(forecast: GetForecast, last_city: GetLastSearchedCity) -> Self {
        let (state, _) = watch::channel(ForecastState::default());
        Self {
            state: Arc::new(state),
            forecast,
            last_city,
            opened: AtomicBool::new(false),
            job: JobSlot::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ForecastState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> ForecastState {
        self.state.borrow().clone()
    }

    pub fn handle(&self, intent: ForecastIntent) {
        match intent {
            ForecastIntent::ScreenOpened => {
                if !self.opened.swap(true, Ordering::SeqCst) {
                    self.load();
                }
            }
            ForecastIntent::Retry => {
                self.opened.store(true, Ordering::SeqCst);
                self.load();
            }
        }
    }

    fn load(&self) {
        let state = self.state.clone();
        let forecast = self.forecast.clone();
        let mut cities = self.last_city.execute();

        self.job.replace(async move {
            state.send_modify(|s| {
                s.is_loading = true;
                s.error = None;
            });

            while let Some(city) = cities.next().await {
                let Some(city) = city else {
                    state.send_modify(|s| {
                        s.error = Some(NO_CITY_FOUND.to_string());
                        s.is_loading = false;
                    });
                    continue;
                };

                state.send_modify(|s| s.city = Some(city.clone()));

                match forecast.execute(city).await {
                    Ok(days) => state.send_modify(|s| {
                        s.forecasts = days;
                        s.is_loading = false;
                        s.error = None;
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
