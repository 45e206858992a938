use crate::services::DEFAULT_LOCATION;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Backend serving `/lunar-data`
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Location requested when the input field is blank
    #[serde(default = "default_location")]
    pub default_location: String,
    /// Directory for JSON/CSV exports
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
    /// Use RGB colours and block glyphs for the moon
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

fn default_export_dir() -> String {
    ".".to_string()
}

fn default_enable_color() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_location: default_location(),
            export_dir: default_export_dir(),
            enable_color: default_enable_color(),
        }
    }
}

impl Config {
    pub fn config_dir() -> Option<PathBuf> {
        let home = env::var("HOME").ok()?;
        Some(PathBuf::from(home).join(".lunar-tui"))
    }

    fn config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.json"))
    }

    pub fn load() -> Option<Config> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            return None;
        }

        let contents = fs::read_to_string(&config_path).ok()?;
        serde_json::from_str(&contents).ok()
    }

    /// Saved config, or defaults when there is none (or it is unreadable)
    pub fn load_or_default() -> Config {
        Self::load().unwrap_or_default()
    }

    /// Save the config to disk
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let config_dir = Self::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)?;
        }

        let config_path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config path"))?;

        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&config_path, contents)?;

        Ok(config_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_location, "Los Angeles, CA");
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert!(config.enable_color);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"base_url": "http://moon:9000"}"#).unwrap();
        assert_eq!(config.base_url, "http://moon:9000");
        assert_eq!(config.default_location, "Los Angeles, CA");
        assert_eq!(config.export_dir, ".");
        assert!(config.enable_color);

        let config: Config =
            serde_json::from_str(r#"{"default_location": "Paris", "export_dir": "/tmp/x"}"#)
                .unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.default_location, "Paris");
        assert_eq!(config.export_dir, "/tmp/x");
    }
}
