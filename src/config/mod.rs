//! Configuration management.
//!
//! Configuration is read from `~/.config/tweet-extractor/config.toml` unless a
//! path is given explicitly. If the file doesn't exist, a default configuration
//! with comments is created.

use crate::scraper::{RetryConfig, ScraperConfig};
use crate::server::ServerConfig;
use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable that overrides `server.port`.
pub const PORT_ENV: &str = "PORT";

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub scraper: ScraperConfig,
    pub retry: RetryConfig,
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;
        Self::load_from(&config_path)
    }

    /// Load configuration from `path`, creating a commented default there if absent.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            Self::create_default_config(path)?;
            info!("Wrote default configuration to {}", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/tweet-extractor/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("tweet-extractor").join("config.toml"))
    }

    /// Apply a `PORT` value as found in the environment. Unparsable values are
    /// ignored with a warning.
    pub fn with_port_override(mut self, port: Option<String>) -> Self {
        if let Some(raw) = port {
            match raw.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => warn!("Ignoring invalid {} value: {:?}", PORT_ENV, raw),
            }
        }
        self
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    /// Generate the default config file content with comments.
    fn default_config_content() -> String {
        r##"# Tweet Extractor Configuration
#
# Every key is optional; missing keys fall back to the values shown here.

[server]
# Interface and port for `tweet-extractor serve`.
# The PORT environment variable overrides `port`.
host = "0.0.0.0"
port = 8080

# Seconds a single /extract call may take before the caller gets a 500
request_timeout_secs = 180

[scraper]
# Run browser in headless mode (no visible window)
headless = true

# Viewport size in pixels
window_width = 1280
window_height = 720

# Page load timeout in seconds
navigation_timeout_secs = 30

# How long to wait for the tweet to render, in seconds
element_timeout_secs = 15

# Pause after closing a login/consent dialog (milliseconds)
dialog_pause_ms = 1000

# Browser user agent
user_agent = """\
Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
(KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"""

# Explicit Chrome/Chromium binary; auto-detected when unset
# chrome_executable = "/usr/bin/chromium"

[retry]
# Retries after the first attempt
max_retries = 2

# Base backoff in seconds; doubles after every failed attempt
retry_delay_secs = 1
"##
        .to_string()
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let content = Config::default_config_content();
        let config: Config = toml::from_str(&content).expect("Default config should be valid TOML");

        assert_eq!(config.server, ServerConfig::default());
        assert_eq!(config.retry, RetryConfig::default());
        assert_eq!(config.scraper.navigation_timeout_secs, 30);
        assert_eq!(config.scraper.user_agent, ScraperConfig::default().user_agent);
    }

    #[test]
    fn test_partial_config() {
        let content = r##"
[server]
port = 9000

[retry]
max_retries = 4
"##;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.retry.max_retries, 4);
        assert_eq!(config.retry.retry_delay_secs, 1);
        assert!(config.scraper.headless);
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config, Config::default());
        assert!(path.exists());

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_load_from_reads_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[scraper]\nheadless = false\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(!config.scraper.headless);
    }

    #[test]
    fn test_load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[server]\nport = \"eighty\"\n").unwrap();

        match Config::load_from(&path) {
            Err(ConfigError::Parse { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_port_override() {
        let config = Config::default().with_port_override(Some("3000".into()));
        assert_eq!(config.server.port, 3000);

        let config = Config::default().with_port_override(Some("not-a-port".into()));
        assert_eq!(config.server.port, 8080);

        let config = Config::default().with_port_override(None);
        assert_eq!(config.server.port, 8080);
    }
}
