use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::model::{Coord, CurrentWeather, ForecastEntry};

use super::{ProviderError, WeatherProvider};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
const REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> anyhow::Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Point the provider at another host, e.g. a mock server in tests.
    pub fn with_base_url(api_key: String, base_url: &str) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client for OpenWeather")?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        what: &'static str,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!("GET {url} ({what})");

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| ProviderError::Request { what, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| ProviderError::Request { what, source })?;

        if !status.is_success() {
            return Err(ProviderError::Status {
                what,
                status,
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| ProviderError::Decode { what, source })
    }

    fn city_query(city: &str) -> [(&'static str, String); 2] {
        [("q", city.to_string()), ("units", "metric".to_string())]
    }

    fn coord_query(coord: Coord) -> [(&'static str, String); 2] {
        [("lat", coord.lat.to_string()), ("lon", coord.lon.to_string())]
    }
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct OwAqi {
    aqi: Option<u8>,
}

#[derive(Debug, Deserialize)]
struct OwAirEntry {
    main: Option<OwAqi>,
}

#[derive(Debug, Deserialize)]
struct OwAirPollutionResponse {
    #[serde(default)]
    list: Vec<OwAirEntry>,
}

#[derive(Debug, Deserialize)]
struct OwUviResponse {
    value: Option<f64>,
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current(&self, city: &str) -> Result<CurrentWeather, ProviderError> {
        self.get_json("OpenWeather current", "weather", &Self::city_query(city))
            .await
    }

    async fn forecast(&self, city: &str) -> Result<Vec<ForecastEntry>, ProviderError> {
        let parsed: OwForecastResponse = self
            .get_json("OpenWeather forecast", "forecast", &Self::city_query(city))
            .await?;

        Ok(parsed.list)
    }

    async fn air_quality(&self, coord: Coord) -> Result<u8, ProviderError> {
        const WHAT: &str = "OpenWeather air pollution";

        let parsed: OwAirPollutionResponse = self
            .get_json(WHAT, "air_pollution", &Self::coord_query(coord))
            .await?;

        parsed
            .list
            .into_iter()
            .next()
            .and_then(|entry| entry.main)
            .and_then(|main| main.aqi)
            .ok_or(ProviderError::MissingField {
                what: WHAT,
                field: "list[0].main.aqi",
            })
    }

    async fn uv_index(&self, coord: Coord) -> Result<f64, ProviderError> {
        const WHAT: &str = "OpenWeather UV index";

        let parsed: OwUviResponse = self.get_json(WHAT, "uvi", &Self::coord_query(coord)).await?;

        parsed.value.ok_or(ProviderError::MissingField {
            what: WHAT,
            field: "value",
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
