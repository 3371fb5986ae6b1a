use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::Path, path::PathBuf, time::Duration};

/// Endpoints and HTTP settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Full URL of the forecast endpoint.
    pub forecast_url: String,
    /// Base URL of the geocoding API; `/search` is appended.
    pub geocoding_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            forecast_url: "https://api.open-meteo.com/v1/forecast".to_string(),
            geocoding_url: "https://geocoding-api.open-meteo.com/v1".to_string(),
            timeout_secs: 10,
        }
    }
}

/// Search-as-you-type tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub min_query_len: usize,
    pub debounce_ms: u64,
    pub result_count: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: 3,
            debounce_ms: 250,
            result_count: 10,
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    pub const fn all() -> &'static [TemperatureUnit] {
        &[TemperatureUnit::Celsius, TemperatureUnit::Fahrenheit]
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WindSpeedUnit {
    #[default]
    Kmh,
    Ms,
    Mph,
    Kn,
}

impl WindSpeedUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindSpeedUnit::Kmh => "kmh",
            WindSpeedUnit::Ms => "ms",
            WindSpeedUnit::Mph => "mph",
            WindSpeedUnit::Kn => "kn",
        }
    }

    pub const fn all() -> &'static [WindSpeedUnit] {
        &[WindSpeedUnit::Kmh, WindSpeedUnit::Ms, WindSpeedUnit::Mph, WindSpeedUnit::Kn]
    }
}

impl fmt::Display for WindSpeedUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Units and timezone requested from the forecast API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitsConfig {
    pub temperature: TemperatureUnit,
    pub wind_speed: WindSpeedUnit,
    /// IANA name, or "auto" to use the city's local timezone.
    pub timezone: String,
}

impl Default for UnitsConfig {
    fn default() -> Self {
        Self {
            temperature: TemperatureUnit::default(),
            wind_speed: WindSpeedUnit::default(),
            timezone: "auto".to_string(),
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// [api]
/// forecast_url = "https://api.open-meteo.com/v1/forecast"
///
/// [units]
/// temperature = "fahrenheit"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub units: UnitsConfig,
}

impl Config {
    /// Load config from the platform config dir, or defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, use defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Save config to the platform config dir, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, self.to_toml()?)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    pub fn validate(&self) -> Result<()> {
        if self.api.timeout_secs == 0 {
            return Err(anyhow!("api.timeout_secs must be greater than zero"));
        }
        if self.search.min_query_len == 0 {
            return Err(anyhow!("search.min_query_len must be at least 1"));
        }
        if self.search.result_count == 0 {
            return Err(anyhow!("search.result_count must be at least 1"));
        }
        if self.units.timezone.trim().is_empty() {
            return Err(anyhow!("units.timezone must not be empty (use \"auto\")"));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.config_dir().join("config.toml"))
    }

    /// Path to the preference store holding the last searched city.
    pub fn preferences_file_path() -> Result<PathBuf> {
        Ok(project_dirs()?.data_dir().join("preferences.json"))
    }
}

fn project_dirs() -> Result<ProjectDirs> {
    ProjectDirs::from("dev", "weather-lookup", "weather")
        .ok_or_else(|| anyhow!("Could not determine platform config directory"))
}
