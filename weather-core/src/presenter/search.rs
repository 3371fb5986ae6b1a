use futures::{FutureExt, future::BoxFuture};
use std::{sync::Arc, time::Duration};
use tokio::{sync::watch, time::Instant};

use crate::{
    config::SearchConfig,
    model::City,
    usecase::{SaveLastSearchedCity, SearchCities},
};

use super::JobSlot;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CitySearchState {
    pub query: String,
    pub results: Vec<City>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Set once the chosen city is saved; the UI moves on and then calls
    /// [`CitySearchPresenter::on_selection_handled`].
    pub is_selection_made: bool,
    /// A search finished with zero matches.
    pub is_results_empty: bool,
}

impl CitySearchState {
    /// A search has completed (with results, no results, or an error) and nothing is running.
    pub fn is_settled(&self) -> bool {
        !self.is_loading
            && (!self.results.is_empty() || self.is_results_empty || self.error.is_some())
    }
}

/// Search-as-you-type over city names.
///
/// Queries are de-duplicated, filtered by minimum length and debounced; a new
/// search cancels the one in flight.
#[derive(Debug)]
pub struct CitySearchPresenter {
    state: Arc<watch::Sender<CitySearchState>>,
    search: SearchCities,
    save: SaveLastSearchedCity,
    min_query_len: usize,
    debounce: Duration,
    collector: JobSlot,
}

impl CitySearchPresenter {
    pub fn new(search: SearchCities, save: SaveLastSearchedCity, config: &SearchConfig) -> Self {
        let (state, _) = watch::channel(CitySearchState::default());
        Self {
            state: Arc::new(state),
            search,
            save,
            min_query_len: config.min_query_len,
            debounce: config.debounce(),
            collector: JobSlot::default(),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<CitySearchState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> CitySearchState {
        self.state.borrow().clone()
    }

    pub fn on_query_changed(&self, query: impl Into<String>) {
        let query = query.into();
        self.state.send_modify(|s| s.query = query);

        self.collector.start_if_idle(collect_queries(
            self.state.clone(),
            self.search.clone(),
            self.min_query_len,
            self.debounce,
        ));
    }

    pub async fn on_city_selected(&self, city: City) {
        match self.save.execute(city).await {
            Ok(()) => self.state.send_modify(|s| s.is_selection_made = true),
            Err(err) => self.state.send_modify(|s| s.error = Some(err.to_string())),
        }
    }

    /// The UI has acted on the selection; stop listening for queries.
    pub fn on_selection_handled(&self) {
        self.state.send_modify(|s| s.is_selection_made = false);
        self.collector.cancel();
    }
}

async fn collect_queries(
    state: Arc<watch::Sender<CitySearchState>>,
    search: SearchCities,
    min_query_len: usize,
    debounce: Duration,
) {
    let mut rx = state.subscribe();
    rx.mark_changed();

    let mut last_query: Option<String> = None;
    let mut pending: Option<String> = None;
    let mut in_flight: Option<BoxFuture<'static, ()>> = None;

    let timer = tokio::time::sleep(debounce);
    tokio::pin!(timer);

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let query = rx.borrow_and_update().query.clone();
                if last_query.as_deref() == Some(query.as_str()) {
                    continue;
                }
                last_query = Some(query.clone());

                if query.chars().count() < min_query_len {
                    continue;
                }
                pending = Some(query);
                timer.as_mut().reset(Instant::now() + debounce);
            }
            () = &mut timer, if pending.is_some() => {
                if let Some(query) = pending.take() {
                    // Dropping the previous future cancels it.
                    in_flight = Some(run_search(state.clone(), search.clone(), query).boxed());
                }
            }
            () = finish(&mut in_flight), if in_flight.is_some() => {
                in_flight = None;
            }
        }
    }
}

async fn finish(job: &mut Option<BoxFuture<'static, ()>>) {
    if let Some(job) = job.as_mut() {
        job.await;
    }
}

async fn run_search(
    state: Arc<watch::Sender<CitySearchState>>,
    search: SearchCities,
    query: String,
) {
    tracing::debug!(%query, "running city search");
    state.send_modify(|s| {
        s.is_loading = true;
        s.results.clear();
        s.is_results_empty = false;
    });

    match search.execute(query).await {
        Ok(cities) => state.send_modify(|s| {
            s.is_results_empty = cities.is_empty();
            s.results = cities;
            s.is_loading = false;
            s.error = None;
        }),
        Err(err) => state.send_modify(|s| {
            s.error = Some(err.to_string());
            s.is_loading = false;
        }),
    }
}
