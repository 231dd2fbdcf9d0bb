//! Logging infrastructure for the scraper binaries.
//!
//! Console output goes to stderr so that stdout stays free for results
//! that other programs consume (the `potd` binary prints its answer there).

use crate::config::Config;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log directory path
    pub log_dir: String,
    /// Component name (used for log file naming and the default filter)
    pub component: String,
    /// Default log level
    pub default_level: Level,
    /// Enable console output
    pub console: bool,
    /// Enable file output
    pub file: bool,
    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            component: "commons-scraper".to_string(),
            default_level: Level::INFO,
            console: true,
            file: false,
            json_format: false,
        }
    }
}

impl LogConfig {
    /// Build the logging setup for `component` from the `[logging]` section
    pub fn from_config(component: &str, config: &Config) -> Result<Self> {
        let default_level: Level = config
            .logging
            .default_level
            .parse()
            .with_context(|| {
                format!("Invalid log level: {}", config.logging.default_level)
            })?;

        Ok(Self {
            log_dir: config.log_dir().to_string_lossy().to_string(),
            component: component.to_string(),
            default_level,
            console: config.logging.console,
            file: config.logging.file,
            json_format: config.logging.json_format,
        })
    }

    fn default_filter(&self) -> String {
        // binary targets log under their crate name with dashes replaced
        let target = self.component.replace('-', "_");
        format!(
            "{}={},shared={},commons_scraper={},hyper=warn,reqwest=warn,h2=warn",
            target, self.default_level, self.default_level, self.default_level
        )
    }
}

/// Initialize logging with the given configuration
///
/// `RUST_LOG` overrides the default filter when set.
pub fn init(config: LogConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_filter()));

    let mut layers = Vec::new();

    if config.console {
        let console_layer = fmt::layer()
            .with_target(true)
            .with_level(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_span_events(FmtSpan::NONE)
            .with_writer(std::io::stderr)
            .boxed();
        layers.push(console_layer);
    }

    if config.file {
        let log_dir = Path::new(&config.log_dir);
        std::fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {}", config.log_dir))?;

        let file_appender = tracing_appender::rolling::daily(log_dir, &config.component);

        let file_layer = if config.json_format {
            fmt::layer()
                .json()
                .with_target(true)
                .with_level(true)
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(file_appender)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_ansi(false)
                .with_span_events(FmtSpan::CLOSE)
                .with_writer(file_appender)
                .boxed()
        };

        layers.push(file_layer);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(layers)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    tracing::debug!(
        component = %config.component,
        file = config.file,
        "Logging initialized"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config() {
        let config = LogConfig::default();
        assert_eq!(config.default_level, Level::INFO);
        assert!(config.console);
        assert!(!config.file);
    }

    #[test]
    fn test_from_config() -> Result<()> {
        let mut config = Config::default();
        config.logging.default_level = "debug".to_string();
        config.logging.file = true;

        let log_config = LogConfig::from_config("potd", &config)?;
        assert_eq!(log_config.default_level, Level::DEBUG);
        assert_eq!(log_config.component, "potd");
        assert!(log_config.file);
        assert!(log_config.log_dir.ends_with("logs"));

        Ok(())
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let mut config = Config::default();
        config.logging.default_level = "loud".to_string();
        assert!(LogConfig::from_config("potd", &config).is_err());
    }

    #[test]
    fn test_default_filter_uses_crate_target() {
        let config = LogConfig {
            component: "featured-scraper".to_string(),
            ..Default::default()
        };
        let filter = config.default_filter();
        assert!(filter.starts_with("featured_scraper=INFO"));
        assert!(filter.contains("commons_scraper=INFO"));
    }
}
