//! One city lookup: fetch everything the front end shows and run the advisor.
//!
//! Only the current-conditions call is required. Forecast, air quality and UV
//! index degrade to empty values so a flaky secondary endpoint never hides
//! the advisories.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    advisor::{AdvisoryResult, advise},
    model::{CurrentWeather, ForecastEntry, WeatherObservation, aqi_label},
    provider::{ProviderError, WeatherProvider},
};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Please enter a city name.")]
    EmptyCity,
    #[error("Could not retrieve weather data for '{city}'.")]
    Unavailable {
        city: String,
        #[source]
        source: ProviderError,
    },
}

#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    pub city: String,
    pub weather: CurrentWeather,
    pub forecast: Vec<ForecastEntry>,
    pub air_quality: Option<u8>,
    pub air_quality_label: Option<&'static str>,
    pub uv_index: Option<f64>,
    pub observation: WeatherObservation,
    pub advisory: AdvisoryResult,
    pub fetched_at: DateTime<Utc>,
}

pub async fn build_report(
    provider: &dyn WeatherProvider,
    city: &str,
) -> Result<WeatherReport, ReportError> {
    let city = city.trim();
    if city.is_empty() {
        return Err(ReportError::EmptyCity);
    }

    let (current, forecast) = tokio::join!(provider.current(city), provider.forecast(city));

    let weather = current.map_err(|source| {
        tracing::warn!("Weather lookup for '{city}' failed: {source}");
        ReportError::Unavailable {
            city: city.to_string(),
            source,
        }
    })?;

    let forecast = forecast.unwrap_or_else(|e| {
        tracing::warn!("Forecast lookup for '{city}' failed: {e}");
        Vec::new()
    });

    let (air_quality, uv_index) = match weather.coord {
        Some(coord) => {
            let (aqi, uvi) = tokio::join!(provider.air_quality(coord), provider.uv_index(coord));
            (
                aqi.inspect_err(|e| tracing::warn!("Air quality lookup failed: {e}")).ok(),
                uvi.inspect_err(|e| tracing::warn!("UV index lookup failed: {e}")).ok(),
            )
        }
        None => (None, None),
    };

    let observation = WeatherObservation::from(&weather);
    let advisory = advise(&observation);
    tracing::info!(
        city,
        storm = advisory.storm.detected,
        hurricane = advisory.hurricane.detected,
        flood = advisory.flood.detected,
        "Built weather report"
    );

    Ok(WeatherReport {
        city: city.to_string(),
        weather,
        forecast,
        air_quality,
        air_quality_label: air_quality.map(aqi_label),
        uv_index,
        observation,
        advisory,
        fetched_at: Utc::now(),
    })
}
