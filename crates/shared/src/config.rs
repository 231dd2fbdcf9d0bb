//! Configuration management for the featured pictures scraper.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with defaults that reproduce the scraper's fixed behaviour when no file
//! is present.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory by both binaries
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Data directory settings
    #[serde(default)]
    pub data: DataConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Commons API settings
    #[serde(default)]
    pub commons: CommonsConfig,

    /// Output file settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory that relative output paths resolve against
    pub root_dir: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log directory path (relative to data directory or absolute)
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output (stderr)
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// Commons API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommonsConfig {
    /// MediaWiki `api.php` endpoint
    pub api_url: String,

    /// Prefix used to build page links from titles
    pub wiki_base: String,

    /// Contact-identifying user agent required by the API usage policy
    pub user_agent: String,

    /// Category whose file members are gathered
    pub category: String,

    /// Members requested per listing page
    pub page_size: u32,

    /// Titles resolved per imageinfo request
    pub batch_size: usize,

    /// `maxlag` value sent with every request (seconds)
    pub max_lag: u32,

    /// HTTP request timeout in seconds
    pub timeout_seconds: u64,

    /// Consecutive unusable listing responses tolerated before giving up
    pub max_malformed_retries: u32,

    /// Rate limiting settings
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Sleep before every request, in milliseconds
    pub request_delay_ms: u64,

    /// Extra sleep after a response reports database lag, in milliseconds
    pub lag_delay_ms: u64,

    /// Optional ceiling on requests per rolling minute
    #[serde(default)]
    pub requests_per_minute: Option<u32>,
}

/// Shape of each line in the URLs file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlLineFormat {
    /// `<url> <page link>`
    #[default]
    WithPageLink,
    /// `<url>`
    UrlOnly,
}

/// Output file configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Titles file (relative to data directory or absolute)
    pub titles_file: String,

    /// Resolved URLs file (relative to data directory or absolute)
    pub urls_file: String,

    /// Line format of the URLs file
    #[serde(default)]
    pub url_format: UrlLineFormat,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            root_dir: ".".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            default_level: "info".to_string(),
            console: true,
            file: false,
            json_format: false,
        }
    }
}

impl Default for CommonsConfig {
    fn default() -> Self {
        Self {
            api_url: "https://commons.wikimedia.org/w/api.php".to_string(),
            wiki_base: "https://commons.wikimedia.org/wiki/".to_string(),
            user_agent: "contact pommicket+jigsaw @ gmail.com ".to_string(),
            category: "Category:Featured_pictures_on_Wikimedia_Commons".to_string(),
            page_size: 500,
            batch_size: 30,
            max_lag: 5,
            timeout_seconds: 30,
            max_malformed_retries: 3,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            request_delay_ms: 1000,
            lag_delay_ms: 5000,
            requests_per_minute: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            titles_file: "featuredpictures_files.txt".to_string(),
            urls_file: "featuredpictures.txt".to_string(),
            url_format: UrlLineFormat::WithPageLink,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::debug!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::debug!(path = %path.display(), "Configuration loaded");

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self)
            .context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(path = %path.display(), "Configuration saved");

        Ok(())
    }

    /// Get the path of the data directory
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data.root_dir)
    }

    /// Get the path of the log directory
    pub fn log_dir(&self) -> PathBuf {
        self.resolve(&self.logging.log_dir)
    }

    /// Get the path of the titles file
    pub fn titles_path(&self) -> PathBuf {
        self.resolve(&self.output.titles_file)
    }

    /// Get the path of the URLs file
    pub fn urls_path(&self) -> PathBuf {
        self.resolve(&self.output.urls_file)
    }

    fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.data_dir().join(path)
        }
    }
}
