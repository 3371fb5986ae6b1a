//! Presenters hold screen state on `watch` channels and turn user intents into use-case calls.

use std::{
    future::Future,
    sync::{Mutex, PoisonError},
};
use tokio::task::JoinHandle;

pub mod current;
pub mod forecast;
pub mod launch;
pub mod search;

pub use current::{CurrentWeatherPresenter, CurrentWeatherState};
pub use forecast::{ForecastIntent, ForecastPresenter, ForecastState};
pub use launch::{LaunchIntent, LaunchPresenter, LaunchState};
pub use search::{CitySearchPresenter, CitySearchState};

/// At most one background job; starting a new one cancels the previous.
#[derive(Debug, Default)]
pub(crate) struct JobSlot {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl JobSlot {
    pub(crate) fn replace<F>(&self, job: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut slot = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.take() {
            previous.abort();
        }
        *slot = Some(tokio::spawn(job));
    }

    /// Start `job` only if nothing has been started (or everything was cancelled).
    pub(crate) fn start_if_idle<F>(&self, job: F) -> bool
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut slot = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            return false;
        }
        *slot = Some(tokio::spawn(job));
        true
    }

    pub(crate) fn cancel(&self) {
        let mut slot = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}

impl Drop for JobSlot {
    fn drop(&mut self) {
        self.cancel();
    }
}
