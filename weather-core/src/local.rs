//! Local persistence: a small key/value preference file and the last-searched-city
//! cache on top of it.

use async_trait::async_trait;
use futures::{StreamExt, stream::BoxStream};
use std::{
    collections::HashMap,
    fmt::Debug,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::{Mutex, watch};
use tokio_stream::wrappers::WatchStream;

use crate::{
    error::{Result, WeatherError},
    model::City,
};

pub const LAST_SEARCHED_CITY_KEY: &str = "last_searched_city";

pub type Snapshot = Arc<HashMap<String, String>>;

/// String preferences stored as one JSON object on disk.
///
/// Every successful write is published to subscribers.
#[derive(Debug)]
pub struct Preferences {
    path: PathBuf,
    values: watch::Sender<Snapshot>,
    write_lock: Mutex<()>,
}

impl Preferences {
    /// Open the store at `path`. A missing file is an empty store; an unreadable one is an error.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let values = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(values) => values,
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "discarding corrupt preferences");
                    HashMap::new()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(cache_error("read", &path, err)),
        };

        let (values, _) = watch::channel(Arc::new(values));
        Ok(Self {
            path,
            values,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    /// Receiver that observes the current snapshot and every later write.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.values.subscribe()
    }

    pub async fn set(&self, key: &str, value: String) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        let mut next = HashMap::clone(&self.values.borrow());
        next.insert(key.to_string(), value);

        self.persist(&next).await?;
        self.values.send_replace(Arc::new(next));
        Ok(())
    }

    async fn persist(&self, values: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|err| cache_error("create directory for", &self.path, err))?;
        }

        let json = serde_json::to_vec_pretty(values)?;
        let tmp = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp, json).await.map_err(|err| cache_error("write", &tmp, err))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|err| cache_error("replace", &self.path, err))?;
        Ok(())
    }
}

fn cache_error(action: &str, path: &Path, err: std::io::Error) -> WeatherError {
    WeatherError::Cache(format!("Failed to {action} {}: {err}", path.display()))
}

#[async_trait]
pub trait CityLocalDataSource: Send + Sync + Debug {
    /// Emits the cached city right away, then again after every change.
    fn last_searched_city(&self) -> BoxStream<'static, Option<City>>;

    async fn save_city(&self, city: &City) -> Result<()>;
}

/// Keeps the last searched city as JSON under [`LAST_SEARCHED_CITY_KEY`].
#[derive(Debug, Clone)]
pub struct PreferencesCityStore {
    prefs: Arc<Preferences>,
}

impl PreferencesCityStore {
    pub fn new(prefs: Arc<Preferences>) -> Self {
        Self { prefs }
    }
}

#[async_trait]
impl CityLocalDataSource for PreferencesCityStore {
    fn last_searched_city(&self) -> BoxStream<'static, Option<City>> {
        WatchStream::new(self.prefs.subscribe())
            .map(|snapshot| decode_city(snapshot.get(LAST_SEARCHED_CITY_KEY)))
            .boxed()
    }

    async fn save_city(&self, city: &City) -> Result<()> {
        let encoded = serde_json::to_string(city)?;
        self.prefs.set(LAST_SEARCHED_CITY_KEY, encoded).await?;
        tracing::info!(city = %city.display_name(), "saved last searched city");
        Ok(())
    }
}

// Undecodable values read as "no city".
fn decode_city(encoded: Option<&String>) -> Option<City> {
    let encoded = encoded?;
    match serde_json::from_str(encoded) {
        Ok(city) => Some(city),
        Err(err) => {
            tracing::warn!(%err, "ignoring undecodable cached city");
            None
        }
    }
}
