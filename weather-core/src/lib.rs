//! Core library for the `weather` advisor.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather client behind the [`WeatherProvider`] trait
//! - Shared domain models (upstream payloads, the normalized observation)
//! - The advisor: storm/hurricane/flood flags and an activity suggestion
//!
//! It is used by `weather-web`, both by its CLI and its HTTP front end.

pub mod advisor;
pub mod config;
pub mod model;
pub mod provider;
pub mod report;

pub use advisor::{Activity, Advisory, AdvisoryResult, advise};
pub use config::{Config, ProviderConfig, ServerConfig};
pub use model::{CurrentWeather, ForecastEntry, WeatherObservation};
pub use provider::{ProviderError, WeatherProvider, openweather::OpenWeatherProvider};
pub use report::{ReportError, WeatherReport, build_report};
