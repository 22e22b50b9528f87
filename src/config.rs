// File: ./src/config.rs
use crate::storage::LocalStorage;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub const BASE_URL_ENV: &str = "MEALPREP_API_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3005";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_base_url")]
    pub api_base_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(default)]
    pub allow_insecure_certs: bool,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_meal_plan")]
    pub default_meal_plan: u64,
    #[serde(default)]
    pub demo: bool,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_meal_plan() -> u64 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_base_url(),
            access_token: None,
            allow_insecure_certs: false,
            request_timeout_secs: default_timeout(),
            default_meal_plan: default_meal_plan(),
            demo: false,
        }
    }
}

impl Config {
    pub fn path() -> Option<PathBuf> {
        LocalStorage::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Reads `config.toml`, then applies `MEALPREP_API_BASE_URL` if set.
    pub fn load() -> Result<Self> {
        let path = Self::path().context("Could not determine config directory")?;
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let mut config = Self::from_toml(&contents)?;
        config.apply_base_url_override(env::var(BASE_URL_ENV).ok());
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents).context("Failed to parse config.toml")?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::path().context("Could not determine config directory")?;
        let contents = toml::to_string_pretty(self)?;
        LocalStorage::atomic_write(path, contents)
    }

    pub fn apply_base_url_override(&mut self, value: Option<String>) {
        if let Some(url) = value.map(|v| v.trim().to_string())
            && !url.is_empty()
        {
            self.api_base_url = url;
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.api_base_url, "http://localhost:3005");
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn parses_full_file() {
        let toml = r#"
api_base_url = "https://meals.example.com/api"
access_token = "abc123"
allow_insecure_certs = true
request_timeout_secs = 5
default_meal_plan = 3
demo = true
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.api_base_url, "https://meals.example.com/api");
        assert_eq!(config.access_token.as_deref(), Some("abc123"));
        assert!(config.allow_insecure_certs);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
        assert_eq!(config.default_meal_plan, 3);
        assert!(config.demo);
    }

    #[test]
    fn malformed_file_is_an_error() {
        assert!(Config::from_toml("request_timeout_secs = \"soon\"").is_err());
    }

    #[test]
    fn base_url_override_ignores_blank_values() {
        let mut config = Config::default();
        config.apply_base_url_override(Some("   ".to_string()));
        assert_eq!(config.api_base_url, DEFAULT_BASE_URL);
        config.apply_base_url_override(Some("http://10.0.0.2:3005".to_string()));
        assert_eq!(config.api_base_url, "http://10.0.0.2:3005");
    }

    #[test]
    fn saved_config_round_trips_through_toml() {
        let config = Config {
            access_token: Some("t".to_string()),
            default_meal_plan: 2,
            ..Config::default()
        };
        let text = toml::to_string_pretty(&config).unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }
}
