//! Configuration file support

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Configuration for onde
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the knowledge/news server
    pub server_url: Option<String>,
    /// URL of the live audio stream
    pub stream_url: Option<String>,
    /// UI theme ("dark" or "light")
    pub theme: Option<String>,
}

impl Config {
    /// Get the config directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("onde")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        // Check for ONDE_CONFIG_PATH env var first
        if let Ok(path) = std::env::var("ONDE_CONFIG_PATH") {
            return PathBuf::from(path);
        }
        Self::config_dir().join("config.toml")
    }

    /// Load config from file
    pub fn load() -> Self {
        let path = Self::config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Failed to parse config file: {}", e);
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Failed to read config file: {}", e);
                Self::default()
            }
        }
    }

    /// Save config to file
    pub fn save(&self) -> std::io::Result<()> {
        let path = Self::config_path();
        let dir = path.parent().unwrap_or_else(|| std::path::Path::new("."));
        fs::create_dir_all(dir)?;

        let content = toml::to_string_pretty(self).map_err(std::io::Error::other)?;
        fs::write(path, content)
    }

    /// Create a default config file if it doesn't exist
    pub fn init() -> std::io::Result<PathBuf> {
        let path = Self::config_path();
        if path.exists() {
            return Ok(path);
        }

        let default_config = Config {
            server_url: Some(crate::DEFAULT_SERVER_URL.to_string()),
            stream_url: Some(crate::DEFAULT_STREAM_URL.to_string()),
            theme: Some("dark".to_string()),
        };

        default_config.save()?;
        Ok(path)
    }
}

/// Generate example config content
pub fn example_config() -> &'static str {
    r#"# onde configuration file
# Place at ~/.config/onde/config.toml (Linux/Mac) or %APPDATA%\onde\config.toml (Windows)

# Base URL of the knowledge/news server
server_url = "http://localhost:8000"

# URL of the live audio stream
stream_url = "https://listen.radioking.com/radio/722114/stream/787982"

# UI theme ("dark" or "light")
theme = "dark"
"#
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str(r#"server_url = "http://radio.example""#).unwrap();
        assert_eq!(config.server_url.as_deref(), Some("http://radio.example"));
        assert!(config.stream_url.is_none());
    }

    #[test]
    fn test_example_config_parses() {
        let config: Config = toml::from_str(example_config()).unwrap();
        assert!(config.server_url.is_some());
        assert!(config.stream_url.is_some());
        assert_eq!(config.theme.as_deref(), Some("dark"));
    }
}
