use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, net::SocketAddr, path::PathBuf};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com";
pub const DEFAULT_FALLBACK_LOCATION: &str = "Kochi";

pub const ENV_API_KEY: &str = "WEATHER_API_KEY";
pub const ENV_BASE_URL: &str = "WEATHER_API_BASE_URL";
pub const ENV_BIND_ADDR: &str = "WEATHER_BIND_ADDR";
pub const ENV_LOG_LEVEL: &str = "WEATHER_LOG_LEVEL";

/// Upstream provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Absent until configured. A missing key surfaces per call, not at startup.
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self { api_key: None, base_url: DEFAULT_BASE_URL.to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)), log_level: "info".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Used when geolocation is unavailable or denied.
    pub fallback_location: String,
    /// `"lat,lon"` reported as the device position.
    pub home_coordinates: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { fallback_location: DEFAULT_FALLBACK_LOCATION.to_string(), home_coordinates: None }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [provider]
/// api_key = "..."
///
/// [server]
/// bind_addr = "0.0.0.0:3000"
///
/// [client]
/// fallback_location = "Kochi"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderConfig,
    pub server: ServerConfig,
    pub client: ClientConfig,
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// File config with process environment overrides on top.
    pub fn load_with_env() -> Result<Self> {
        let mut cfg = Self::load()?;
        cfg.apply_env(|key| std::env::var(key).ok())?;
        Ok(cfg)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid configuration TOML")
    }

    /// Apply `WEATHER_*` overrides. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = var(ENV_API_KEY) {
            self.provider.api_key = Some(key);
        }
        if let Some(url) = var(ENV_BASE_URL) {
            self.provider.base_url = url;
        }
        if let Some(addr) = var(ENV_BIND_ADDR) {
            self.server.bind_addr = addr
                .parse()
                .with_context(|| format!("{ENV_BIND_ADDR} is not a socket address: {addr}"))?;
        }
        if let Some(level) = var(ENV_LOG_LEVEL) {
            self.server.log_level = level;
        }
        Ok(())
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
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

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-task", "weather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.provider.api_key = Some(api_key);
    }

    /// Returns the API key, if present and non-blank.
    pub fn api_key(&self) -> Option<&str> {
        self.provider.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn is_provider_configured(&self) -> bool {
        self.api_key().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_have_no_credential() {
        let cfg = Config::default();

        assert!(!cfg.is_provider_configured());
        assert_eq!(cfg.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.client.fallback_location, "Kochi");
        assert_eq!(cfg.server.bind_addr.port(), 3000);
    }

    #[test]
    fn partial_toml_keeps_defaults_for_missing_sections() {
        let cfg = Config::from_toml("[provider]\napi_key = \"FILE_KEY\"\n").unwrap();

        assert_eq!(cfg.api_key(), Some("FILE_KEY"));
        assert_eq!(cfg.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.server, ServerConfig::default());
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = Config::from_toml("[provider]\napi_key = \"FILE_KEY\"\n").unwrap();
        cfg.apply_env(env(&[
            (ENV_API_KEY, "ENV_KEY"),
            (ENV_BIND_ADDR, "0.0.0.0:8080"),
            (ENV_LOG_LEVEL, "debug"),
        ]))
        .unwrap();

        assert_eq!(cfg.api_key(), Some("ENV_KEY"));
        assert_eq!(cfg.server.bind_addr.port(), 8080);
        assert_eq!(cfg.server.log_level, "debug");
    }

    #[test]
    fn blank_env_values_are_ignored() {
        let mut cfg = Config::default();
        cfg.set_api_key("FILE_KEY".into());
        cfg.apply_env(env(&[(ENV_API_KEY, "  ")])).unwrap();

        assert_eq!(cfg.api_key(), Some("FILE_KEY"));
    }

    #[test]
    fn invalid_bind_addr_is_reported() {
        let mut cfg = Config::default();
        let err = cfg.apply_env(env(&[(ENV_BIND_ADDR, "not-an-addr")])).unwrap_err();

        assert!(err.to_string().contains(ENV_BIND_ADDR));
    }

    #[test]
    fn blank_api_key_counts_as_unconfigured() {
        let mut cfg = Config::default();
        cfg.set_api_key("   ".into());

        assert!(!cfg.is_provider_configured());
    }

    #[test]
    fn config_roundtrips_through_toml() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".into());
        cfg.client.home_coordinates = Some("9.93,76.26".into());

        let text = toml::to_string_pretty(&cfg).unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), cfg);
    }
}
