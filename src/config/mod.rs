use anyhow::{Context, Result};
use serde::Deserialize;

/// Complete application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub map: MapConfig,
}

/// Manager REST API
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the map and asset resources
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    std::env::var("ASSETMAP_API_URL").unwrap_or_else(|_| "http://localhost:8080/api/master".to_string())
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Map presenter configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MapConfig {
    /// Timeout boundary of the map settings read (milliseconds)
    #[serde(default = "default_settings_timeout")]
    pub settings_timeout_ms: u64,
    /// Timeout boundary of asset reads (milliseconds)
    #[serde(default = "default_asset_timeout")]
    pub asset_timeout_ms: u64,
}

fn default_settings_timeout() -> u64 {
    200
}

fn default_asset_timeout() -> u64 {
    5000
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            settings_timeout_ms: default_settings_timeout(),
            asset_timeout_ms: default_asset_timeout(),
        }
    }
}

/// Load configuration from TOML file
pub fn load_config(path: &str) -> Result<AppConfig> {
    let contents =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read config '{}'", path))?;
    let config: AppConfig = toml::from_str(&contents).context("Failed to parse config")?;
    Ok(config)
}
