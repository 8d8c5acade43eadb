use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode};
use std::{
    fmt::{self, Write as _},
    net::IpAddr,
};
use weather_core::{
    Advisory, Config, WeatherReport, build_report, model::format_unix,
    provider::provider_from_config,
};

use crate::server::{self, AppState};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather conditions and hazard advisories")]
pub struct Cli {
    /// OpenWeather API key; takes precedence over the configured one.
    #[arg(long, global = true, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key in the config file.
    Configure,

    /// Print conditions and advisories for a city.
    Show {
        /// City name, e.g. "Manila" or "Paris,FR".
        city: String,
    },

    /// Run the web front end.
    Serve {
        #[arg(long)]
        address: Option<IpAddr>,

        #[arg(long)]
        port: Option<u16>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => {
                let mut config = config_or_default(Config::load());

                let api_key = match self.api_key {
                    Some(key) => key,
                    None => Password::new("OpenWeather API key:")
                        .with_display_mode(PasswordDisplayMode::Masked)
                        .without_confirmation()
                        .prompt()
                        .context("Failed to read API key")?,
                };

                config.set_api_key(api_key);
                config.require_api_key()?;
                let path = config.save()?;
                println!("Saved OpenWeather API key to {}", path.display());
            }
            Command::Show { city } => {
                let mut config = Config::load()?;
                if let Some(key) = self.api_key {
                    config.set_api_key(key);
                }

                let provider = provider_from_config(&config)?;
                let report = build_report(provider.as_ref(), &city).await?;
                print!("{}", render_report(&report)?);
            }
            Command::Serve { address, port } => {
                let mut config = Config::load()?;
                if let Some(key) = self.api_key {
                    config.set_api_key(key);
                }
                if let Some(address) = address {
                    config.server.address = address;
                }
                if let Some(port) = port {
                    config.server.port = port;
                }

                let provider = provider_from_config(&config)?;
                server::run(AppState::new(provider), &config.server).await?;
            }
        }

        Ok(())
    }
}

/// `configure` must be able to overwrite a config file that no longer parses.
fn config_or_default(loaded: anyhow::Result<Config>) -> Config {
    loaded.unwrap_or_else(|e| {
        tracing::warn!("Ignoring unreadable config, starting from defaults: {e:#}");
        Config::default()
    })
}

fn advisory_line(out: &mut String, label: &str, advisory: &Advisory) -> fmt::Result {
    let marker = if advisory.detected { "!!" } else { "ok" };
    writeln!(out, "  [{marker}] {label:<10} {}", advisory.message)
}

/// Human-readable summary of a report for the terminal.
fn render_report(report: &WeatherReport) -> Result<String, fmt::Error> {
    let w = &report.weather;
    let obs = &report.observation;
    let mut out = String::new();

    let country = w.sys.as_ref().and_then(|s| s.country.as_deref());
    let place = match country {
        Some(c) => format!("{}, {c}", w.name),
        None => w.name.clone(),
    };
    let observed = format_unix(w.dt).unwrap_or_else(|| w.dt.to_string());
    let fetched = report.fetched_at.with_timezone(&chrono::Local);
    let description = match obs.description() {
        "" => "unknown",
        d => d,
    };

    writeln!(out, "{place} (observed {observed} UTC, fetched {})", fetched.format("%H:%M"))?;
    writeln!(
        out,
        "  {description}, {:.1} °C, humidity {}%, wind {:.1} m/s",
        obs.temperature(),
        obs.humidity(),
        obs.wind_speed(),
    )?;
    let rain = obs.rainfall_last_hour();
    match obs.pressure() {
        Some(p) => writeln!(out, "  Pressure {p:.0} hPa, rain {rain:.1} mm/h")?,
        None => writeln!(out, "  Pressure unavailable, rain {rain:.1} mm/h")?,
    }
    if let (Some(aqi), Some(label)) = (report.air_quality, report.air_quality_label) {
        writeln!(out, "  Air quality {aqi} ({label})")?;
    }
    if let Some(uvi) = report.uv_index {
        writeln!(out, "  UV index {uvi:.1}")?;
    }

    writeln!(out, "\nAlerts")?;
    advisory_line(&mut out, "storm", &report.advisory.storm)?;
    advisory_line(&mut out, "hurricane", &report.advisory.hurricane)?;
    advisory_line(&mut out, "flood", &report.advisory.flood)?;

    writeln!(out, "\nSuggestion: {}", report.advisory.activity_suggestion)?;
    if !report.forecast.is_empty() {
        writeln!(out, "Forecast: {} entries over the next 5 days", report.forecast.len())?;
    }

    Ok(out)
}
