use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::watch;

use crate::usecase::{CheckNetworkAvailability, GetLastSearchedCity};

use super::JobSlot;

/// Where the app should go on start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaunchState {
    #[default]
    Loading,
    ShowCurrentWeather,
    ShowCityInput,
    ShowNoInternet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchIntent {
    CheckInitialState,
    /// The UI has navigated; stop following the cache.
    NavigationHandled,
}

#[derive(Debug)]
pub struct LaunchPresenter {
    state: Arc<watch::Sender<LaunchState>>,
    network: CheckNetworkAvailability,
    last_city: GetLastSearchedCity,
    job: JobSlot,
}

impl LaunchPresenter {
    pub fn new(network: CheckNetworkAvailability, last_city: GetLastSearchedCity) -> Self {
        let (state, _) = watch::channel(LaunchState::default());
        Self {
            state: Arc::new(state),
            network,
            last_city,
            job: JobSlot::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<LaunchState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> LaunchState {
        *self.state.borrow()
    }

    pub fn handle(&self, intent: LaunchIntent) {
        match intent {
            LaunchIntent::CheckInitialState => {
                let state = self.state.clone();
                let network = self.network.clone();
                let last_city = self.last_city.clone();
                // Repeated checks while one is active are ignored.
                self.job.start_if_idle(check_initial_state(state, network, last_city));
            }
            LaunchIntent::NavigationHandled => self.job.cancel(),
        }
    }
}

async fn check_initial_state(
    state: Arc<watch::Sender<LaunchState>>,
    network: CheckNetworkAvailability,
    last_city: GetLastSearchedCity,
) {
    state.send_replace(LaunchState::Loading);

    match network.execute().await {
        Ok(true) => {}
        Ok(false) => {
            state.send_replace(LaunchState::ShowNoInternet);
            return;
        }
        Err(err) => {
            tracing::warn!(%err, "network check failed");
            state.send_replace(LaunchState::ShowNoInternet);
            return;
        }
    }

    let mut cities = last_city.execute();
    while let Some(city) = cities.next().await {
        let next = if city.is_some() {
            LaunchState::ShowCurrentWeather
        } else {
            LaunchState::ShowCityInput
        };
        state.send_replace(next);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::{Result, WeatherError},
        model::City,
        repository::{CityRepository, NetworkRepository},
    };
    use async_trait::async_trait;
    use futures::stream::BoxStream;
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        time::Duration,
    };

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

    #[derive(Debug)]
    enum Network {
        Up,
        Down,
        Broken,
    }

    #[async_trait]
    impl NetworkRepository for Network {
        async fn is_network_available(&self) -> Result<bool> {
            match self {
                Network::Up => Ok(true),
                Network::Down => Ok(false),
                Network::Broken => Err(WeatherError::Config("no probe".into())),
            }
        }
    }

    #[derive(Debug, Default)]
    struct CountingNetwork {
        checks: AtomicUsize,
    }

    #[async_trait]
    impl NetworkRepository for CountingNetwork {
        async fn is_network_available(&self) -> Result<bool> {
            self.checks.fetch_add(1, Ordering::SeqCst);
            Ok(true)
        }
    }

    fn lima() -> City {
        City {
            name: "Lima".into(),
            country: "Peru".into(),
            latitude: -12.04,
            longitude: -77.03,
            id: 4,
        }
    }

    async fn route(network: Network, city: Option<City>) -> LaunchState {
        let presenter = LaunchPresenter::new(
            CheckNetworkAvailability::new(Arc::new(network)),
            GetLastSearchedCity::new(Arc::new(CachedCity(city))),
        );
        let mut rx = presenter.subscribe();

        presenter.handle(LaunchIntent::CheckInitialState);
        let state = *rx.wait_for(|s| *s != LaunchState::Loading).await.unwrap();
        presenter.handle(LaunchIntent::NavigationHandled);
        state
    }

    #[tokio::test]
    async fn cached_city_goes_to_current_weather() {
        assert_eq!(route(Network::Up, Some(lima())).await, LaunchState::ShowCurrentWeather);
    }

    #[tokio::test]
    async fn empty_cache_goes_to_city_input() {
        assert_eq!(route(Network::Up, None).await, LaunchState::ShowCityInput);
    }

    #[tokio::test]
    async fn offline_goes_to_no_internet() {
        assert_eq!(route(Network::Down, Some(lima())).await, LaunchState::ShowNoInternet);
    }

    #[tokio::test]
    async fn failed_check_counts_as_offline() {
        assert_eq!(route(Network::Broken, None).await, LaunchState::ShowNoInternet);
    }

    #[tokio::test(start_paused = true)]
    async fn check_runs_again_after_navigation_handled() {
        let network = Arc::new(CountingNetwork::default());
        let presenter = LaunchPresenter::new(
            CheckNetworkAvailability::new(network.clone()),
            GetLastSearchedCity::new(Arc::new(CachedCity(None))),
        );
        let mut rx = presenter.subscribe();

        presenter.handle(LaunchIntent::CheckInitialState);
        rx.wait_for(|s| *s == LaunchState::ShowCityInput).await.unwrap();

        // Still following the cache, so a second check is ignored.
        presenter.handle(LaunchIntent::CheckInitialState);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(network.checks.load(Ordering::SeqCst), 1);

        presenter.handle(LaunchIntent::NavigationHandled);
        presenter.handle(LaunchIntent::CheckInitialState);
        let state = *rx
            .wait_for(|s| {
                network.checks.load(Ordering::SeqCst) == 2 && *s == LaunchState::ShowCityInput
            })
            .await
            .unwrap();

        assert_eq!(state, LaunchState::ShowCityInput);
    }
}
