use async_trait::async_trait;
use reqwest::StatusCode;
use std::fmt::Debug;

use crate::{
    Config,
    model::{Coord, CurrentWeather, ForecastEntry},
    provider::openweather::OpenWeatherProvider,
};

pub mod openweather;

/// Failures talking to an upstream weather API.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("{what} request failed: {source}")]
    Request {
        what: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{what} request failed with status {status}: {body}")]
    Status {
        what: &'static str,
        status: StatusCode,
        body: String,
    },
    #[error("failed to parse {what} JSON: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{what} response is missing `{field}`")]
    MissingField {
        what: &'static str,
        field: &'static str,
    },
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current conditions for a city.
    async fn current(&self, city: &str) -> Result<CurrentWeather, ProviderError>;

    /// 3-hourly forecast for the next five days.
    async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, ProviderError>;

    /// Air quality index, 1 (good) to 5 (very poor).
    async fn air_quality(&self, coord: Coord) -> Result<u8, ProviderError>;

    async fn uv_index(&self, coord: Coord) -> Result<f64, ProviderError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.require_api_key()?;
    let provider = OpenWeatherProvider::new(api_key.to_owned())?;

    Ok(Box::new(provider))
}
