use anyhow::{Context, anyhow, bail};
use clap::{Parser, Subcommand};
use inquire::{CustomType, Select, Text};
use std::{fmt, path::Path, time::Duration};
use tokio::sync::watch;
use weather_core::{
    AppContext, City, Config,
    config::{TemperatureUnit, WindSpeedUnit},
    presenter::{
        CitySearchState, CurrentWeatherState, ForecastIntent, ForecastState, LaunchIntent,
        LaunchState,
    },
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Look up current weather and forecasts by city")]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show weather for the remembered city, or ask for one. The default.
    Start,

    /// Search cities by name.
    Search {
        /// City name, at least a few characters.
        query: String,

        /// Remember the N-th result (1-based) as the current city.
        #[arg(long, value_name = "N")]
        select: Option<usize>,

        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Interactively search for a city, pick one and show its weather.
    Pick,

    /// Today's weather for the remembered city.
    Current {
        #[arg(long)]
        json: bool,
    },

    /// Multi-day forecast for the remembered city.
    Forecast {
        #[arg(long)]
        json: bool,
    },

    /// Set units and timezone interactively.
    Configure {
        /// Only print the config file location and contents.
        #[arg(long)]
        show: bool,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command.unwrap_or(Command::Start) {
            Command::Start => start(&open_app().await?).await,
            Command::Search {
                query,
                select,
                json,
            } => search(&open_app().await?, &query, select, json).await,
            Command::Pick => pick(&open_app().await?).await,
            Command::Current { json } => current(&open_app().await?, json).await,
            Command::Forecast { json } => forecast(&open_app().await?, json).await,
            Command::Configure { show } => {
                let path = Config::config_file_path()?;
                configure(load_or_default(&path), &path, show).await
            }
        }
    }
}

async fn open_app() -> anyhow::Result<AppContext> {
    let config = Config::load()?;
    let prefs = Config::preferences_file_path()?;
    AppContext::open(config, prefs)
        .await
        .context("Failed to initialise weather services")
}

/// A broken config file must not lock the user out of `configure`.
fn load_or_default(path: &Path) -> Config {
    Config::load_from(path).unwrap_or_else(|err| {
        tracing::warn!(path = %path.display(), "ignoring unreadable config: {err:#}");
        eprintln!("Warning: {err:#}. Starting from the default configuration.");
        Config::default()
    })
}

/// Upper bound for any single presenter round trip.
fn wait_limit(config: &Config) -> Duration {
    config.timeout() + config.search.debounce() + Duration::from_secs(2)
}

async fn wait_until<T: Clone>(
    rx: &mut watch::Receiver<T>,
    what: &str,
    limit: Duration,
    done: impl FnMut(&T) -> bool,
) -> anyhow::Result<T> {
    let state = tokio::time::timeout(limit, rx.wait_for(done))
        .await
        .with_context(|| format!("Timed out waiting for {what}"))?
        .with_context(|| format!("Stopped before {what} finished"))?;
    Ok(state.clone())
}

async fn start(app: &AppContext) -> anyhow::Result<()> {
    let launch = app.launch();
    let mut rx = launch.subscribe();

    launch.handle(LaunchIntent::CheckInitialState);
    let route = wait_until(&mut rx, "startup checks", wait_limit(app.config()), |s| {
        *s != LaunchState::Loading
    })
    .await?;
    launch.handle(LaunchIntent::NavigationHandled);

    tracing::debug!(?route, "launch route");
    match route {
        LaunchState::ShowCurrentWeather => current(app, false).await,
        LaunchState::ShowCityInput => pick(app).await,
        LaunchState::ShowNoInternet => {
            bail!("No internet connection. Check your network and try again.")
        }
        LaunchState::Loading => bail!("Startup checks did not finish."),
    }
}

async fn search_cities(app: &AppContext, query: &str) -> anyhow::Result<Vec<City>> {
    let min = app.config().search.min_query_len;
    if query.trim().chars().count() < min {
        bail!("Enter at least {min} characters to search.");
    }

    let presenter = app.city_search();
    let mut rx = presenter.subscribe();
    presenter.on_query_changed(query.trim());

    let limit = wait_limit(app.config());
    let state = wait_until(&mut rx, "city search", limit, CitySearchState::is_settled).await?;

    if let Some(error) = state.error {
        bail!(error);
    }
    Ok(state.results)
}

async fn save_city(app: &AppContext, city: City) -> anyhow::Result<City> {
    let presenter = app.city_search();
    presenter.on_city_selected(city.clone()).await;

    let state = presenter.state();
    if let Some(error) = state.error {
        bail!(error);
    }
    presenter.on_selection_handled();
    Ok(city)
}

async fn search(
    app: &AppContext,
    query: &str,
    select: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let cities = search_cities(app, query).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&cities)?);
    } else {
        print!("{}", render::cities(&cities));
    }

    if let Some(n) = select {
        let city = n
            .checked_sub(1)
            .and_then(|i| cities.get(i))
            .cloned()
            .ok_or_else(|| anyhow!("No result number {n}; pick between 1 and {}.", cities.len()))?;

        let city = save_city(app, city).await?;
        eprintln!("Saved {} as the current city.", city.display_name());
    }

    Ok(())
}

/// Display wrapper for the interactive city list.
struct CityChoice(City);

impl fmt::Display for CityChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.2}, {:.2})",
            self.0.display_name(),
            self.0.latitude,
            self.0.longitude
        )
    }
}

async fn pick(app: &AppContext) -> anyhow::Result<()> {
    let min = app.config().search.min_query_len;

    let cities = loop {
        let query = tokio::task::spawn_blocking(|| Text::new("City name:").prompt()).await??;

        match search_cities(app, &query).await {
            Ok(cities) if cities.is_empty() => eprintln!("No cities match '{query}'."),
            Ok(cities) => break cities,
            Err(err) if query.trim().chars().count() < min => eprintln!("{err}"),
            Err(err) => return Err(err),
        }
    };

    let options: Vec<CityChoice> = cities.into_iter().map(CityChoice).collect();
    let choice =
        tokio::task::spawn_blocking(move || Select::new("Choose a city:", options).prompt())
            .await??;

    save_city(app, choice.0).await?;
    current(app, false).await
}

async fn current(app: &AppContext, json: bool) -> anyhow::Result<()> {
    let presenter = app.current_weather();
    let mut rx = presenter.subscribe();
    presenter.open();

    let limit = wait_limit(app.config());
    let state =
        wait_until(&mut rx, "current weather", limit, CurrentWeatherState::is_settled).await?;

    if let Some(error) = state.error {
        bail!(error);
    }
    let (Some(city), Some(weather)) = (state.city, state.weather) else {
        bail!("Weather data unavailable.");
    };

    if json {
        let out = serde_json::json!({ "city": city, "weather": weather });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", render::current(&city, &weather));
    }
    Ok(())
}

async fn forecast(app: &AppContext, json: bool) -> anyhow::Result<()> {
    let presenter = app.forecast();
    let mut rx = presenter.subscribe();
    presenter.handle(ForecastIntent::ScreenOpened);

    let limit = wait_limit(app.config());
    let state = wait_until(&mut rx, "forecast", limit, ForecastState::is_settled).await?;

    if let Some(error) = state.error {
        bail!(error);
    }
    let city = state.city.ok_or_else(|| anyhow!("Forecast data unavailable."))?;

    if json {
        let out = serde_json::json!({ "city": city, "forecast": state.forecasts });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print!("{}", render::forecast(&city, &state.forecasts));
    }
    Ok(())
}

async fn configure(mut config: Config, path: &Path, show: bool) -> anyhow::Result<()> {
    if show {
        println!("# {}", path.display());
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    let current = config.clone();
    let answers = tokio::task::spawn_blocking(move || {
        let temperature = Select::new("Temperature unit:", TemperatureUnit::all().to_vec())
            .with_starting_cursor(index_of(TemperatureUnit::all(), current.units.temperature))
            .prompt()?;
        let wind_speed = Select::new("Wind speed unit:", WindSpeedUnit::all().to_vec())
            .with_starting_cursor(index_of(WindSpeedUnit::all(), current.units.wind_speed))
            .prompt()?;
        let timezone = Text::new("Timezone (IANA name or \"auto\"):")
            .with_default(&current.units.timezone)
            .prompt()?;
        let debounce_ms = CustomType::<u64>::new("Search debounce (ms):")
            .with_default(current.search.debounce_ms)
            .prompt()?;
        let result_count = CustomType::<u32>::new("Search results to fetch:")
            .with_default(current.search.result_count)
            .prompt()?;
        Ok::<_, inquire::InquireError>((
            temperature,
            wind_speed,
            timezone,
            debounce_ms,
            result_count,
        ))
    })
    .await??;

    let (temperature, wind_speed, timezone, debounce_ms, result_count) = answers;
    config.units.temperature = temperature;
    config.units.wind_speed = wind_speed;
    config.units.timezone = timezone.trim().to_string();
    config.search.debounce_ms = debounce_ms;
    config.search.result_count = result_count;
    config.save_to(path)?;

    println!("Saved configuration to {}", path.display());
    Ok(())
}

fn index_of<T: PartialEq>(all: &[T], value: T) -> usize {
    all.iter().position(|v| *v == value).unwrap_or(0)
}
