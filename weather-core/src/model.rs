use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic coordinates as reported by OpenWeather.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: Option<f64>,
    pub humidity: u8,
    #[serde(default)]
    pub pressure: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    #[serde(default)]
    pub main: String,
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wind {
    pub speed: f64,
}

/// Precipitation volume over the last hour, in millimeters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Rain {
    #[serde(rename = "1h", default)]
    pub one_hour: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sys {
    #[serde(default)]
    pub country: Option<String>,
}

/// Current conditions for a city, as returned by `/data/2.5/weather`.
///
/// Field names follow the upstream JSON so templates can address them the
/// same way the API documents them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub name: String,
    pub dt: i64,
    pub coord: Option<Coord>,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub wind: Wind,
    #[serde(default)]
    pub rain: Option<Rain>,
    #[serde(default)]
    pub sys: Option<Sys>,
}

/// One 3-hour step of the 5-day forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub dt: i64,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<Condition>,
    pub wind: Wind,
    #[serde(default)]
    pub dt_txt: Option<String>,
}

/// Normalized input to the advisor.
///
/// Only built through [`WeatherObservation::new`] or from a [`CurrentWeather`],
/// so readings are always clamped and the description always lower-cased.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherObservation {
    wind_speed: f64,
    humidity: u8,
    pressure: Option<f64>,
    rainfall_last_hour: f64,
    temperature: f64,
    description: String,
}

impl WeatherObservation {
    pub fn new(
        wind_speed: f64,
        humidity: u8,
        pressure: Option<f64>,
        rainfall_last_hour: f64,
        temperature: f64,
        description: &str,
    ) -> Self {
        Self {
            wind_speed: wind_speed.max(0.0),
            humidity: humidity.min(100),
            pressure,
            rainfall_last_hour: rainfall_last_hour.max(0.0),
            temperature,
            description: description.to_lowercase(),
        }
    }

    /// Meters per second.
    pub fn wind_speed(&self) -> f64 {
        self.wind_speed
    }

    /// Relative humidity in percent.
    pub fn humidity(&self) -> u8 {
        self.humidity
    }

    /// Sea-level pressure in hPa, when the upstream reported one.
    pub fn pressure(&self) -> Option<f64> {
        self.pressure
    }

    /// Millimeters over the last hour.
    pub fn rainfall_last_hour(&self) -> f64 {
        self.rainfall_last_hour
    }

    /// Degrees Celsius.
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Lower-cased condition text, e.g. "light rain".
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl From<&CurrentWeather> for WeatherObservation {
    fn from(current: &CurrentWeather) -> Self {
        let rainfall = current
            .rain
            .as_ref()
            .and_then(|r| r.one_hour)
            .unwrap_or(0.0);

        let description = current
            .weather
            .first()
            .map(|w| w.description.as_str())
            .unwrap_or("");

        WeatherObservation::new(
            current.wind.speed,
            current.main.humidity,
            current.main.pressure,
            rainfall,
            current.main.temp,
            description,
        )
    }
}

/// OpenWeather's qualitative name for an air quality index.
pub fn aqi_label(aqi: u8) -> &'static str {
    match aqi {
        1 => "Good",
        2 => "Fair",
        3 => "Moderate",
        4 => "Poor",
        5 => "Very Poor",
        _ => "Unknown",
    }
}

/// Render a unix timestamp as `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn format_unix(ts: i64) -> Option<String> {
    DateTime::<Utc>::from_timestamp(ts, 0).map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current_from(json: serde_json::Value) -> CurrentWeather {
        serde_json::from_value(json).expect("fixture should decode")
    }

    #[test]
    fn observation_uses_upstream_fields() {
        let current = current_from(serde_json::json!({
            "name": "Manila",
            "dt": 1_700_000_000,
            "coord": { "lat": 14.6, "lon": 120.98 },
            "main": { "temp": 29.5, "feels_like": 34.0, "humidity": 84, "pressure": 1004 },
            "weather": [{ "main": "Rain", "description": "Light Rain", "icon": "10d" }],
            "wind": { "speed": 6.2 },
            "rain": { "1h": 2.5 }
        }));

        let obs = WeatherObservation::from(&current);
        assert_eq!(obs.wind_speed(), 6.2);
        assert_eq!(obs.humidity(), 84);
        assert_eq!(obs.pressure(), Some(1004.0));
        assert_eq!(obs.rainfall_last_hour(), 2.5);
        assert_eq!(obs.temperature(), 29.5);
        assert_eq!(obs.description(), "light rain");
    }

    #[test]
    fn missing_rain_and_pressure_fall_back() {
        let current = current_from(serde_json::json!({
            "name": "Lima",
            "dt": 1_700_000_000,
            "main": { "temp": 18.0, "humidity": 70 },
            "weather": [],
            "wind": { "speed": 3.0 }
        }));

        let obs = WeatherObservation::from(&current);
        assert_eq!(obs.pressure(), None);
        assert_eq!(obs.rainfall_last_hour(), 0.0);
        assert_eq!(obs.description(), "");
        assert!(current.coord.is_none());
    }

    #[test]
    fn rain_block_without_one_hour_is_zero() {
        let current = current_from(serde_json::json!({
            "name": "Oslo",
            "dt": 1_700_000_000,
            "main": { "temp": 4.0, "humidity": 90, "pressure": 990 },
            "weather": [{ "description": "drizzle" }],
            "wind": { "speed": 1.0 },
            "rain": { "3h": 7.0 }
        }));

        assert_eq!(WeatherObservation::from(&current).rainfall_last_hour(), 0.0);
    }

    #[test]
    fn new_clamps_out_of_range_readings() {
        let obs = WeatherObservation::new(-1.0, 140, None, -3.0, 12.0, "CLEAR SKY");
        assert_eq!(obs.wind_speed(), 0.0);
        assert_eq!(obs.humidity(), 100);
        assert_eq!(obs.rainfall_last_hour(), 0.0);
        assert_eq!(obs.description(), "clear sky");
    }

    #[test]
    fn aqi_labels_cover_the_scale() {
        assert_eq!(aqi_label(1), "Good");
        assert_eq!(aqi_label(5), "Very Poor");
        assert_eq!(aqi_label(0), "Unknown");
    }

    #[test]
    fn format_unix_renders_utc() {
        assert_eq!(format_unix(0).as_deref(), Some("1970-01-01 00:00:00"));
        assert_eq!(format_unix(1_700_000_000).as_deref(), Some("2023-11-14 22:13:20"));
    }
}
