use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, net::IpAddr, path::PathBuf};

/// Credentials for the OpenWeather API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Where the web front end listens and where it finds its templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub address: IpAddr,
    pub port: u16,
    /// Directory holding `index.html.tera`; the bundled templates are used when unset.
    pub template_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: IpAddr::from([127, 0, 0, 1]),
            port: 5000,
            template_dir: None,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [openweather]
/// api_key = "..."
///
/// [server]
/// port = 5000
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub openweather: Option<ProviderConfig>,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-advisor", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.openweather = Some(ProviderConfig { api_key });
    }

    /// Returns the OpenWeather API key, if present and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.openweather
            .as_ref()
            .map(|cfg| cfg.api_key.trim())
            .filter(|key| !key.is_empty())
    }

    /// Like [`Config::api_key`], but with the hint users need when it is missing.
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key().ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `weather configure` or set OPENWEATHER_API_KEY."
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_api_key_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.require_api_key().unwrap_err();

        assert!(err.to_string().contains("No OpenWeather API key configured"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());

        assert_eq!(cfg.api_key(), None);
    }

    #[test]
    fn set_api_key_replaces_previous() {
        let mut cfg = Config::default();

        cfg.set_api_key("OLD".into());
        cfg.set_api_key("NEW".into());

        assert_eq!(cfg.require_api_key().expect("key must exist"), "NEW");
    }

    #[test]
    fn empty_file_uses_server_defaults() {
        let cfg = Config::from_toml("").expect("empty config should parse");

        assert!(cfg.openweather.is_none());
        assert_eq!(cfg.server.port, 5000);
        assert_eq!(cfg.server.address, IpAddr::from([127, 0, 0, 1]));
        assert!(cfg.server.template_dir.is_none());
    }

    #[test]
    fn partial_server_section_keeps_other_defaults() {
        let cfg = Config::from_toml(
            r#"
            [openweather]
            api_key = "KEY"

            [server]
            port = 8080
            "#,
        )
        .expect("config should parse");

        assert_eq!(cfg.api_key(), Some("KEY"));
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.address, IpAddr::from([127, 0, 0, 1]));
    }

    #[test]
    fn toml_roundtrip_preserves_values() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.server.port = 9000;
        cfg.server.template_dir = Some(PathBuf::from("/srv/templates"));

        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let back = Config::from_toml(&text).expect("parse");

        assert_eq!(back.api_key(), Some("KEY"));
        assert_eq!(back.server.port, 9000);
        assert_eq!(back.server.template_dir, Some(PathBuf::from("/srv/templates")));
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(Config::from_toml("[server]\nport = \"not a number\"").is_err());
    }
}
