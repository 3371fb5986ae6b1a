//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Configuration handling
//! - Open-Meteo geocoding and forecast data sources
//! - A local preference store caching the last searched city
//! - Repositories, use cases and presenters holding observable screen state
//! - Domain models and the WMO weather-code mapping
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod app;
pub mod condition;
pub mod config;
pub mod error;
pub mod format;
pub mod local;
pub mod mapper;
pub mod model;
pub mod presenter;
pub mod remote;
pub mod repository;
pub mod usecase;

pub use app::AppContext;
pub use condition::WeatherCondition;
pub use config::Config;
pub use error::{Result, WeatherError};
pub use model::{City, DailyWeather};
