//! Shared library for the featured pictures scraper workspace.
//!
//! This crate provides functionality used by both binaries:
//! - Configuration management
//! - Logging infrastructure

pub mod config;
pub mod logging;

// Re-export commonly used types
pub use config::{Config, UrlLineFormat, DEFAULT_CONFIG_FILE};
pub use logging::LogConfig;

/// Common result type using anyhow::Error
pub type Result<T> = anyhow::Result<T>;
